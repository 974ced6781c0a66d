//! Debug overlay
//!
//! Drawn after the post-scale pass at [`crate::DrawOrderKey::OVERLAY`]: a 1 px
//! outline around every visible element, coloured by [`crate::ElementKind`], plus a
//! status line with the current scale and offset. Everything is rasterized at
//! physical resolution so the outlines stay one device pixel wide.
//!
//! # Color Scheme
//!
//! - **Panel** - Blue
//! - **Window** - Cyan
//! - **Button** - Green
//! - **Label** - Red
//! - **Control** - Purple
//! - **Other** - Yellow

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_scale::ScaleTransform;

use crate::collect::FrameEntry;
use crate::framebuffer::Framebuffer;
use crate::paint::{self, DrawError};

/// Runtime-toggled element outline renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugOverlay {
    enabled: bool,
}

impl DebugOverlay {
    /// Disabled overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the overlay is drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the enabled state; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Status text for the current transform
    pub fn status_line(transform: &ScaleTransform) -> String {
        let (ox, oy) = transform.offset();
        format!(
            "{} -> {} scale {:.2} offset ({:.0},{:.0}){}",
            transform.logical(),
            transform.physical(),
            transform.scale(),
            ox,
            oy,
            if transform.is_scaling_enabled() {
                ""
            } else {
                " unscaled"
            }
        )
    }

    /// Outline `entries` and print the status line onto the backbuffer
    pub fn draw(
        &self,
        target: &mut Framebuffer,
        entries: &[FrameEntry<'_>],
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        if !self.enabled {
            return Ok(());
        }

        for entry in entries {
            let bounds = transform.to_physical_rect(entry.element.bounds());
            paint::stroke_rect(target, bounds, entry.element.kind().overlay_color(), 1)?;
        }

        let status = Self::status_line(transform);
        let size = paint::measure_text(&status, &FONT_6X10);
        paint::fill_rect(
            target,
            Rectangle::new(
                Point::zero(),
                Size::new(size.width.saturating_add(4), size.height.saturating_add(2)),
            ),
            Rgb888::BLACK,
        )?;
        paint::draw_text(target, &status, Point::new(2, 1), &FONT_6X10, Rgb888::YELLOW)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)] // Expected values are computed inline
mod tests {
    use super::*;
    use lumen_scale::{LogicalResolution, PhysicalResolution};

    #[test]
    fn test_toggle() {
        let mut overlay = DebugOverlay::new();
        assert!(!overlay.is_enabled());
        assert!(overlay.toggle());
        assert!(!overlay.toggle());
    }

    #[test]
    fn test_status_line() {
        let t = ScaleTransform::compute(
            PhysicalResolution::new(1000, 360).unwrap(),
            LogicalResolution::VGA,
            true,
        );
        assert_eq!(
            DebugOverlay::status_line(&t),
            "640x480 -> 1000x360 scale 0.75 offset (260,0)"
        );
    }

    #[test]
    fn test_disabled_draws_nothing() {
        let t = ScaleTransform::identity(LogicalResolution::VGA);
        let mut fb = Framebuffer::new(64, 64);
        fb.fill(Rgb888::WHITE);
        DebugOverlay::new().draw(&mut fb, &[], &t).unwrap();
        assert_eq!(fb.count_color(&fb.bounding_box(), Rgb888::WHITE), 64 * 64);
    }
}
