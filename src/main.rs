use clap::Parser;
use std::path::PathBuf;

use sprig::config::RuntimeConfig;
use sprig::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// RON config file (defaults to ./sprig.ron plus SPRIG_ environment overrides)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => RuntimeConfig::load_from(path)?,
        None => RuntimeConfig::load()?,
    };

    log::info!(
        "Starting sprig demo: {} frames at {:.4}s, view {}x{}",
        args.frames,
        args.dt,
        config.view.width,
        config.view.height
    );
    run(&config, &args)
}

/// Moves horizontally and bounces off the view edges
struct Bouncer {
    velocity: f32,
    limit: f32,
}

impl Behavior for Bouncer {
    fn update(&mut self, node: &mut Node, dt: f32) -> SceneResult<()> {
        let mut position = node.position();
        position.x += self.velocity * dt;

        let right = self.limit - node.size().x;
        if position.x > right {
            self.velocity = -self.velocity;
            position.x = right;
        }
        if position.x < 0.0 {
            self.velocity = -self.velocity;
            position.x = 0.0;
        }
        node.set_position(position);
        Ok(())
    }
}

fn pulse_track() -> SceneResult<Track> {
    Track::from_ron(
        r#"[
            {"default_length": 0.125},
            {"frame": 0, "length": 1.0},
            1, 2, 3,
            {"frame": 4, "length": 1.0},
            3, 2, 1,
        ]"#,
    )
}

fn run(config: &RuntimeConfig, args: &Args) -> anyhow::Result<()> {
    let width = config.view.width as f32;
    let height = config.view.height as f32;
    let scene = config.scene();

    // Parallax layers, furthest first
    for (scale, parallax) in [(0.75, 1.5), (0.85, 1.25), (1.0, 1.0)] {
        let field = Graphic::new((width * scale) as u32, (height * scale) as u32).shared();
        scene.add_child(
            Node::with_graphic(field)
                .named(format!("field x{parallax}"))
                .at(width * 0.5, height * 0.5)
                .anchored(Anchor::CENTER)
                .with_parallax(parallax)
                .into_handle(),
        );
    }

    let frames = (0..5u8)
        .map(|shade| Graphic::filled(64, 64, [shade * 50, shade * 50, shade * 50, 255]).shared())
        .collect();
    let mut animator = Animator::with_frame_length(frames, config.animation.default_frame_length);
    animator.add_track("pulse", pulse_track()?)?;
    animator.add_track("crazy", Track::sequential(4))?;

    let mut pulse = Node::animated(animator)
        .named("pulse")
        .at(width * 0.5, height * 0.5)
        .anchored(Anchor::CENTER)
        .with_parallax(2.0);
    pulse.set_animation("pulse")?;
    pulse.play()?;
    scene.add_child(pulse.into_handle());

    let circle = Graphic::filled(32, 32, [255, 255, 255, 255]).shared();
    for (x, y, velocity) in [(0.25, 0.75, 150.0), (0.0, 0.5, 120.0), (0.75, 0.25, 90.0)] {
        scene.add_child(
            Node::with_graphic(circle.clone())
                .named("circle")
                .at(width * x, height * y)
                .anchored(Anchor {
                    x: AnchorAxis::Absolute(0.0),
                    y: AnchorAxis::Fraction(0.5),
                })
                .with_behavior(Bouncer {
                    velocity,
                    limit: width,
                })
                .into_handle(),
        );
    }

    let mut tweens = TweenEngine::new();
    tweens.to(
        scene.camera_handle(),
        &[("x", -width * 0.25)],
        1.0,
        TweenOptions::default()
            .easing(EaseType::QuadOut)
            .bounce(true),
    )?;

    let mut canvas = RecordingCanvas::new();
    let mut total_draws = 0;
    let mut errors = 0;
    for frame in 0..args.frames {
        canvas.clear();
        let report = scene.update(args.dt);
        scene.draw(&mut canvas);
        tweens.update(args.dt);

        total_draws += canvas.len();
        errors += report.errors.len();
        if frame % 30 == 0 {
            log::info!(
                "Frame {}: updated={}, draws={}, camera={:?}",
                frame,
                report.updated,
                canvas.len(),
                scene.camera().position()
            );
        }
    }

    println!(
        "{} frames, {} draw calls ({:.1}/frame), {} errors",
        args.frames,
        total_draws,
        total_draws as f32 / args.frames.max(1) as f32,
        errors
    );
    Ok(())
}
