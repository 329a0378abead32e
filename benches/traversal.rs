use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sprig::prelude::*;

/// A scene with `groups` parallax groups of `per_group` sprites each
fn build_scene(groups: usize, per_group: usize) -> Scene {
    let scene = Scene::new(640.0, 480.0);
    let sprite = Graphic::new(16, 16).shared();

    for g in 0..groups {
        let group = Node::new()
            .at(0.0, g as f32 * 8.0)
            .with_parallax(1.0 + g as f32 * 0.25)
            .with_view_rect(Rect::new(0.0, 0.0, 640.0, 480.0))
            .into_handle();
        for i in 0..per_group {
            let x = (i * 24) as f32 % 1280.0;
            group
                .borrow_mut()
                .add_child(Node::with_graphic(sprite.clone()).at(x, 0.0).into_handle());
        }
        scene.add_child(group);
    }
    scene
}

fn bench_update(c: &mut Criterion) {
    let scene = build_scene(10, 100);
    c.bench_function("scene_update_1000_nodes", |b| {
        b.iter(|| {
            scene.camera_mut().pan(Vec2::new(0.5, 0.0));
            black_box(scene.update(black_box(1.0 / 60.0)))
        })
    });
}

fn bench_draw(c: &mut Criterion) {
    let scene = build_scene(10, 100);
    scene.update(1.0 / 60.0);
    let mut canvas = RecordingCanvas::new();
    c.bench_function("scene_draw_culled_1000_nodes", |b| {
        b.iter(|| {
            canvas.clear();
            scene.draw(&mut canvas);
            black_box(canvas.len())
        })
    });
}

fn bench_tweens(c: &mut Criterion) {
    c.bench_function("tween_engine_500_nodes", |b| {
        let nodes: Vec<_> = (0..500).map(|_| Node::new().into_handle()).collect();
        b.iter(|| {
            let mut tweens = TweenEngine::new();
            for node in &nodes {
                tweens
                    .to(
                        node,
                        &[("x", 100.0), ("y", 50.0)],
                        1.0,
                        TweenOptions::default().easing(EaseType::EaseInOut),
                    )
                    .expect("start tween");
            }
            for _ in 0..60 {
                tweens.update(1.0 / 60.0);
            }
            black_box(tweens.len())
        })
    });
}

criterion_group!(benches, bench_update, bench_draw, bench_tweens);
criterion_main!(benches);
