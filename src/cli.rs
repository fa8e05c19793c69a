//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::GlobeConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "globe")]
#[command(about = "Procedural planet with atmosphere, sun and star field", long_about = None)]
pub struct Args {
    /// Window (or preview image) width in pixels
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window (or preview image) height in pixels
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Number of background stars
    #[arg(long, value_name = "N", default_value = "5000")]
    pub stars: usize,

    /// Render one frame on the CPU to this PNG and exit, no window
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,

    /// Elapsed time of the preview frame (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    pub time: f32,
}

impl Args {
    /// Fold the overrides into the default configuration
    pub fn to_config(&self) -> GlobeConfig {
        let mut config = GlobeConfig::default();
        config.render.window_width = self.width.max(1);
        config.render.window_height = self.height.max(1);
        config.stars.count = self.stars;
        config
    }
}
