//! Runtime configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `sprig.ron` file (if exists)
//! 3. Environment variables prefixed with `SPRIG_`
//!
//! Example environment variable: `SPRIG_VIEW__WIDTH=1280`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::animation::DEFAULT_FRAME_LENGTH;
use crate::scene::Scene;

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Screen settings used for the scene's default view rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Sprite-sheet playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Seconds each frame stays on screen unless a track says otherwise
    pub default_frame_length: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_frame_length: DEFAULT_FRAME_LENGTH,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `sprig.ron` in the working directory (if exists)
    /// 3. Environment variables prefixed with `SPRIG_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("sprig")
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SPRIG_VIEW__WIDTH, etc.)
            .add_source(Environment::with_prefix("SPRIG").separator("__"));

        Self::finish(builder)
    }

    /// Load defaults overlaid with a specific RON file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let builder = Self::defaults()?.add_source(
            File::from(path)
                .format(config::FileFormat::Ron)
                .required(true),
        );

        Self::finish(builder)
    }

    /// Create a scene sized to the configured view
    pub fn scene(&self) -> Scene {
        Scene::new(self.view.width as f32, self.view.height as f32)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Self::default();
        Ok(Config::builder()
            .set_default("view.width", defaults.view.width as i64)?
            .set_default("view.height", defaults.view.height as i64)?
            .set_default(
                "animation.default_frame_length",
                defaults.animation.default_frame_length as f64,
            )?)
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
