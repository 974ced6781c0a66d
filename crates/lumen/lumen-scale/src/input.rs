//! Pointer input mapping from physical window space to logical UI space
//!
//! [`InputCoordinateMapper::to_logical`] is the one inverse transform every
//! interactive element hit-tests against. Elements never see physical
//! coordinates: the compositor maps the raw pointer once per frame through
//! [`PointerTracker`] and hands out a [`LogicalPointer`].
//!
//! Pointers outside the letterboxed active rectangle are clamped onto the
//! nearest logical edge pixel ("sticky" edges) instead of being rejected.

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use crate::transform::ScaleTransform;

/// Continuous pointer position in physical window pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalPoint {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl PhysicalPoint {
    /// Create a physical point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Raw per-frame pointer state as polled from the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Last known cursor position (kept when the cursor leaves the window)
    pub position: PhysicalPoint,
    /// Primary (left) button held down
    pub primary_down: bool,
}

/// Inverse of the [`ScaleTransform`] for pointer hit-testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputCoordinateMapper {
    transform: ScaleTransform,
}

impl InputCoordinateMapper {
    /// Create a mapper for the given transform
    pub fn new(transform: ScaleTransform) -> Self {
        Self { transform }
    }

    /// Transform this mapper inverts
    pub fn transform(&self) -> &ScaleTransform {
        &self.transform
    }

    /// Map a physical pointer position into logical coordinates
    ///
    /// Identity when scaling is disabled. When enabled, computes
    /// `(p - offset) / scale` and clamps each axis to `[0, dimension - 1]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn to_logical(&self, physical: PhysicalPoint) -> Point {
        if !self.transform.is_scaling_enabled() {
            return Point::new(physical.x.floor() as i32, physical.y.floor() as i32);
        }

        let (ox, oy) = self.transform.offset();
        let scale = self.transform.scale();
        let logical = self.transform.logical();

        let max_x = logical.width().saturating_sub(1) as f32;
        let max_y = logical.height().saturating_sub(1) as f32;

        // NaN from a bogus platform value clamps to 0 via max().
        let x = ((physical.x - ox) / scale).floor().max(0.0).min(max_x);
        let y = ((physical.y - oy) / scale).floor().max(0.0).min(max_y);

        Point::new(x as i32, y as i32)
    }

    /// Map a logical point to its physical position (`logical * scale + offset`)
    pub fn to_physical(&self, logical: Point) -> PhysicalPoint {
        let (x, y) = self.transform.to_physical(logical);
        PhysicalPoint::new(x, y)
    }
}

/// Pointer state in logical coordinates, as seen by UI elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPointer {
    /// Position in logical pixels
    pub position: Point,
    /// Primary button held this frame
    pub pressed: bool,
    /// Primary button went down this frame
    pub just_pressed: bool,
    /// Primary button went up this frame
    pub just_released: bool,
    /// A higher element already consumed this frame's pointer
    pub captured: bool,
}

impl LogicalPointer {
    /// Whether the pointer lies inside `bounds`
    pub fn is_over(&self, bounds: &Rectangle) -> bool {
        bounds.contains(self.position)
    }

    /// Press started inside `bounds` and no element above claimed it
    pub fn pressed_in(&self, bounds: &Rectangle) -> bool {
        self.just_pressed && !self.captured && self.is_over(bounds)
    }

    /// Release happened inside `bounds` and no element above claimed it
    pub fn released_in(&self, bounds: &Rectangle) -> bool {
        self.just_released && !self.captured && self.is_over(bounds)
    }

    /// Copy of this pointer marked as consumed
    pub fn into_captured(self) -> Self {
        Self {
            captured: true,
            ..self
        }
    }
}

/// Tracks button edges across frames and maps raw pointer state
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    was_down: bool,
}

impl PointerTracker {
    /// Create a tracker with the button released
    pub fn new() -> Self {
        Self::default()
    }

    /// Map this frame's raw pointer state through the shared mapper
    pub fn advance(&mut self, raw: PointerState, mapper: &InputCoordinateMapper) -> LogicalPointer {
        let pointer = LogicalPointer {
            position: mapper.to_logical(raw.position),
            pressed: raw.primary_down,
            just_pressed: raw.primary_down && !self.was_down,
            just_released: !raw.primary_down && self.was_down,
            captured: false,
        };
        self.was_down = raw.primary_down;
        pointer
    }
}
