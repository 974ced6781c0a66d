//! Lumen desktop client
//!
//! Opens a resizable window and runs the compositor at a fixed tick:
//!
//! ```text
//! cargo run -p lumen-client -- --width 1920 --height 1080
//! cargo run -p lumen-client -- --headless-frames 3 --screenshot frame.png
//! ```
//!
//! Hotkeys: F1 debug overlay, F2 mode, F3 scaling, F12 screenshot, Esc quit.

// Binary crate: no public API to document.
#![allow(missing_docs)]

mod app;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_scale::{CompositorConfig, PhysicalResolution};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Scaled-display compositor demo", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON compositor configuration (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Draw 1:1 with no offscreen pass
    #[arg(long)]
    no_scaling: bool,
    /// Initial window width in device pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,
    /// Initial window height in device pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,
    /// Render this many frames without a window, then exit
    #[arg(long, value_name = "N")]
    headless_frames: Option<u32>,
    /// PNG written after the last headless frame
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,
}

impl Cli {
    fn compositor_config(&self) -> Result<CompositorConfig> {
        let mut config = match &self.config {
            Some(path) => CompositorConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => CompositorConfig::default(),
        };
        if self.no_scaling {
            config.scaling_enabled = false;
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            config.window = PhysicalResolution::new(width, height).context("window size")?;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,winit=warn,softbuffer=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.compositor_config()?;
    tracing::info!(
        scaling = config.scaling_enabled,
        width = config.window.width(),
        height = config.window.height(),
        tick_hz = config.tick_rate_hz,
        "starting lumen"
    );

    match cli.headless_frames {
        Some(frames) => app::run_headless(config, frames, cli.screenshot.as_deref()),
        None => app::run_windowed(config),
    }
}
