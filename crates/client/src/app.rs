//! Fixed-tick frame loop, windowed and headless

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use lumen_compositor::{map_key, Compositor, DebugOverlay, HotKey, PlatformWindow};
use lumen_scale::{CompositorConfig, PointerState};

use crate::scene::Scene;

const WINDOW_TITLE: &str = "Lumen";

/// What the loop should do after a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn apply_hotkey(compositor: &mut Compositor, hotkey: HotKey, screenshots: &mut u32) -> Result<Flow> {
    match hotkey {
        HotKey::ToggleDebugOverlay => {
            compositor.toggle_debug_overlay();
        }
        HotKey::ToggleMode => {
            let mode = compositor.mode().toggled();
            tracing::info!(mode = mode.as_str(), "switching mode");
            compositor.set_mode(mode);
        }
        HotKey::ToggleScaling => {
            let enabled = !compositor.transform().is_scaling_enabled();
            tracing::info!(enabled, "switching scaling");
            compositor.set_scaling_enabled(enabled);
        }
        HotKey::Screenshot => {
            *screenshots = screenshots.saturating_add(1);
            let path = PathBuf::from(format!("lumen-{:03}.png", *screenshots));
            compositor
                .save_screenshot(&path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        HotKey::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Open a window and run until it closes or Escape is pressed
pub fn run_windowed(config: CompositorConfig) -> Result<()> {
    let tick = config.tick_interval();
    let mut window = PlatformWindow::new(WINDOW_TITLE, config.window)
        // WindowError is !Send (softbuffer boxes a non-Send source), so carry its message
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("opening window")?;
    let mut compositor = Compositor::new(config)?;
    let mut scene = Scene::build(&mut compositor);
    let mut screenshots = 0;

    if let Some(size) = window.inner_size() {
        compositor.notify_resize(size.width(), size.height());
    }

    'frames: loop {
        let started = Instant::now();
        let input = window.poll();
        if input.close_requested {
            break;
        }
        if let Some((width, height)) = input.resized {
            compositor.notify_resize(width, height);
        }
        for key in &input.keys {
            if let Some(hotkey) = map_key(*key) {
                // A failed screenshot is reported, not fatal
                match apply_hotkey(&mut compositor, hotkey, &mut screenshots) {
                    Ok(Flow::Quit) => break 'frames,
                    Ok(Flow::Continue) => {}
                    Err(error) => tracing::error!("hotkey failed: {error:#}"),
                }
            }
        }

        let (signals, report) = compositor.frame(input.pointer);
        scene.handle(&mut compositor, &signals);
        if report.failed > 0 {
            tracing::warn!(failed = report.failed, "elements failed to draw");
        }

        if input.resized.is_some() || !input.keys.is_empty() {
            window.set_title(&format!(
                "{WINDOW_TITLE} | {}",
                DebugOverlay::status_line(compositor.transform())
            ));
        }
        window
            .present(compositor.backbuffer())
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    let stats = compositor.stats();
    tracing::info!(
        frames = stats.frames(),
        slow = stats.slow_frames(),
        avg_us = u64::try_from(stats.average().as_micros()).unwrap_or(u64::MAX),
        "frame loop stopped"
    );
    Ok(())
}

/// Render `frames` frames into memory, optionally saving the last one
pub fn run_headless(config: CompositorConfig, frames: u32, screenshot: Option<&Path>) -> Result<()> {
    let mut compositor = Compositor::new(config)?;
    let mut scene = Scene::build(&mut compositor);

    for _ in 0..frames {
        let (signals, report) = compositor.frame(PointerState::default());
        scene.handle(&mut compositor, &signals);
        tracing::debug!(
            drawn = report.drawn,
            failed = report.failed,
            slow = report.slow,
            "headless frame"
        );
    }

    if let Some(path) = screenshot {
        compositor
            .save_screenshot(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    tracing::info!(frames = compositor.stats().frames(), "headless run finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_writes_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        run_headless(CompositorConfig::default(), 2, Some(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_quit_and_mode_hotkeys() {
        let mut compositor = Compositor::new(CompositorConfig::default()).unwrap();
        let mut shots = 0;
        assert_eq!(
            apply_hotkey(&mut compositor, HotKey::Quit, &mut shots).unwrap(),
            Flow::Quit
        );

        apply_hotkey(&mut compositor, HotKey::ToggleMode, &mut shots).unwrap();
        compositor.update(PointerState::default());
        assert_eq!(compositor.logical().width(), 800);
    }

    #[test]
    fn test_scaling_hotkey_flips_transform() {
        let mut compositor = Compositor::new(CompositorConfig::default()).unwrap();
        let mut shots = 0;
        apply_hotkey(&mut compositor, HotKey::ToggleScaling, &mut shots).unwrap();
        compositor.update(PointerState::default());
        assert!(!compositor.transform().is_scaling_enabled());
    }
}
