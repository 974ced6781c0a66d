//! Scale transform between logical and physical pixel space
//!
//! A [`ScaleTransform`] is a pure function of the physical window size, the
//! logical resolution and the "scaling enabled" switch. It is never mutated
//! in place: every resize or mode change produces a fresh value through
//! [`ScaleTransform::compute`].
//!
//! Scaling is uniform across both axes (`min` of the per-axis ratios) and the
//! scaled image is centred, so mismatched aspect ratios are letterboxed or
//! pillarboxed instead of stretched.
//!
//! # Example
//!
//! ```
//! use lumen_scale::{LogicalResolution, PhysicalResolution, ScaleTransform};
//!
//! let physical = PhysicalResolution::new(1280, 960).unwrap();
//! let t = ScaleTransform::compute(physical, LogicalResolution::VGA, true);
//! assert_eq!(t.scale(), 2.0);
//! assert_eq!(t.offset(), (0.0, 0.0));
//! ```

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::resolution::{LogicalResolution, PhysicalResolution};

/// Uniform scale factor and centring offset from logical to physical space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    logical: LogicalResolution,
    physical: PhysicalResolution,
    enabled: bool,
}

/// Round a physical coordinate to the nearest device pixel
// Coordinates are window-sized (< 2^24), well inside i32 and exactly
// representable in f32; `as` saturates on the impossible overflow.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn round_px(v: f32) -> i32 {
    v.round() as i32
}

impl ScaleTransform {
    /// Compute the transform for a physical window and logical resolution
    ///
    /// With scaling disabled the result is the identity (`scale = 1`,
    /// `offset = (0, 0)`): the UI draws 1:1 with no offscreen indirection.
    #[allow(clippy::cast_precision_loss)] // window dimensions are < 2^24
    pub fn compute(
        physical: PhysicalResolution,
        logical: LogicalResolution,
        scaling_enabled: bool,
    ) -> Self {
        if !scaling_enabled {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
                logical,
                physical,
                enabled: false,
            };
        }

        // Resolutions are non-zero by construction; max(1) keeps a bad
        // deserialized value from producing an infinite scale.
        let lw = logical.width().max(1) as f32;
        let lh = logical.height().max(1) as f32;
        let pw = physical.width() as f32;
        let ph = physical.height() as f32;

        let scale = (pw / lw).min(ph / lh);
        let offset_x = ((pw - lw * scale) / 2.0).max(0.0);
        let offset_y = ((ph - lh * scale) / 2.0).max(0.0);

        tracing::debug!(
            scale,
            offset_x,
            offset_y,
            physical_width = physical.width(),
            physical_height = physical.height(),
            logical_width = logical.width(),
            logical_height = logical.height(),
            "scale transform recomputed"
        );

        Self {
            scale,
            offset_x,
            offset_y,
            logical,
            physical,
            enabled: true,
        }
    }

    /// Identity transform over a logical grid drawn 1:1
    ///
    /// Used by the unified (unscaled) draw path, where borders and text land
    /// at their logical coordinates unchanged.
    pub fn identity(logical: LogicalResolution) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            logical,
            physical: PhysicalResolution::from(logical),
            enabled: false,
        }
    }

    /// Uniform scale factor (> 0)
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Centring offset in physical pixels (each axis >= 0)
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    /// Logical resolution this transform maps from
    pub fn logical(&self) -> LogicalResolution {
        self.logical
    }

    /// Physical resolution this transform maps into
    pub fn physical(&self) -> PhysicalResolution {
        self.physical
    }

    /// Whether the two-phase scaled path is active
    pub fn is_scaling_enabled(&self) -> bool {
        self.enabled
    }

    /// True exactly when scaling is enabled
    ///
    /// Elements seeing this flag draw only their fills during the offscreen
    /// pass and defer borders and text to the post-scale pass.
    pub fn should_skip_offscreen_pass(&self) -> bool {
        self.enabled
    }

    /// Map a logical position to continuous physical coordinates
    #[allow(clippy::cast_precision_loss)] // logical coordinates are small
    pub fn to_physical(&self, logical: Point) -> (f32, f32) {
        (
            logical.x as f32 * self.scale + self.offset_x,
            logical.y as f32 * self.scale + self.offset_y,
        )
    }

    /// Map a logical position to the nearest physical device pixel
    pub fn to_physical_point(&self, logical: Point) -> Point {
        let (x, y) = self.to_physical(logical);
        Point::new(round_px(x), round_px(y))
    }

    /// Map a logical rectangle into physical space
    ///
    /// Both corners are rounded independently, so rectangles that share an
    /// edge in logical space still share an edge after scaling.
    #[allow(clippy::cast_sign_loss)] // max(0) above each cast
    pub fn to_physical_rect(&self, logical: Rectangle) -> Rectangle {
        let top_left = self.to_physical_point(logical.top_left);
        let bottom_right = self.to_physical_point(Point::new(
            logical.top_left.x.saturating_add_unsigned(logical.size.width),
            logical.top_left.y.saturating_add_unsigned(logical.size.height),
        ));
        let w = bottom_right.x.saturating_sub(top_left.x).max(0) as u32;
        let h = bottom_right.y.saturating_sub(top_left.y).max(0) as u32;
        Rectangle::new(top_left, Size::new(w, h))
    }

    /// Scale a logical length (stroke width, corner radius, font height)
    ///
    /// Non-zero lengths never collapse to zero, so one-pixel borders stay visible
    /// when the window is smaller than the logical grid.
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn scale_length(&self, logical: u32) -> u32 {
        if logical == 0 {
            return 0;
        }
        (round_px(logical as f32 * self.scale).max(1)) as u32
    }

    /// Physical rectangle covered by the scaled logical grid
    ///
    /// Everything outside it is letterbox/pillarbox border.
    pub fn active_rect(&self) -> Rectangle {
        let full = self.to_physical_rect(Rectangle::new(Point::zero(), self.logical.size()));
        // Never exceed the backbuffer even with rounding at the far edge.
        let max_w = self
            .physical
            .width()
            .saturating_sub(full.top_left.x.max(0).unsigned_abs());
        let max_h = self
            .physical
            .height()
            .saturating_sub(full.top_left.y.max(0).unsigned_abs());
        Rectangle::new(
            full.top_left,
            Size::new(full.size.width.min(max_w), full.size.height.min(max_h)),
        )
    }
}
