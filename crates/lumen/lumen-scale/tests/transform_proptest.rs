//! Property-based tests for the scale transform and pointer mapping.
//! Verifies invariants hold for ALL window/logical sizes, not just fixed examples.

// Test files legitimately use arithmetic for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation
)]

use embedded_graphics::prelude::Point;
use lumen_scale::{
    InputCoordinateMapper, LogicalResolution, PhysicalPoint, PhysicalResolution, ScaleTransform,
};
use proptest::prelude::*;

const EPS: f32 = 0.01;

fn transform(pw: u32, ph: u32, lw: u32, lh: u32) -> ScaleTransform {
    ScaleTransform::compute(
        PhysicalResolution::new(pw, ph).unwrap(),
        LogicalResolution::new(lw, lh).unwrap(),
        true,
    )
}

proptest! {
    /// scale = min of the axis ratios, positive, and the scaled grid never
    /// overflows the physical window.
    #[test]
    fn scaled_grid_fits_window(
        pw in 1u32..4000, ph in 1u32..4000,
        lw in 1u32..2000, lh in 1u32..2000,
    ) {
        let t = transform(pw, ph, lw, lh);
        let expected = (pw as f32 / lw as f32).min(ph as f32 / lh as f32);
        prop_assert!(t.scale() > 0.0);
        prop_assert!((t.scale() - expected).abs() <= f32::EPSILON * expected.max(1.0));

        let (ox, oy) = t.offset();
        prop_assert!(ox >= 0.0 && oy >= 0.0);
        prop_assert!(ox + lw as f32 * t.scale() <= pw as f32 + EPS * pw as f32);
        prop_assert!(oy + lh as f32 * t.scale() <= ph as f32 + EPS * ph as f32);
    }

    /// The scaled grid is centred on the letterboxed axis.
    #[test]
    fn offset_is_centred(
        pw in 1u32..4000, ph in 1u32..4000,
        lw in 1u32..2000, lh in 1u32..2000,
    ) {
        let t = transform(pw, ph, lw, lh);
        let (ox, oy) = t.offset();
        let right = pw as f32 - (ox + lw as f32 * t.scale());
        let bottom = ph as f32 - (oy + lh as f32 * t.scale());
        prop_assert!((right - ox).abs() <= 1.0);
        prop_assert!((bottom - oy).abs() <= 1.0);
    }

    /// toLogical(toPhysical(Q)) lands within one logical pixel of Q.
    #[test]
    fn round_trip_within_one_pixel(
        pw in 1u32..4000, ph in 1u32..4000,
        lw in 1u32..2000, lh in 1u32..2000,
        fx in 0.0f64..1.0, fy in 0.0f64..1.0,
    ) {
        let mapper = InputCoordinateMapper::new(transform(pw, ph, lw, lh));
        let q = Point::new(
            ((lw as f64 * fx) as u32).min(lw - 1) as i32,
            ((lh as f64 * fy) as u32).min(lh - 1) as i32,
        );
        let back = mapper.to_logical(mapper.to_physical(q));
        prop_assert!((back.x - q.x).abs() <= 1, "{:?} -> {:?}", q, back);
        prop_assert!((back.y - q.y).abs() <= 1, "{:?} -> {:?}", q, back);
    }

    /// Any physical point, in or out of the active rectangle, maps inside
    /// the logical grid.
    #[test]
    fn to_logical_always_clamped(
        pw in 1u32..4000, ph in 1u32..4000,
        lw in 1u32..2000, lh in 1u32..2000,
        px in -10_000.0f32..10_000.0, py in -10_000.0f32..10_000.0,
    ) {
        let mapper = InputCoordinateMapper::new(transform(pw, ph, lw, lh));
        let p = mapper.to_logical(PhysicalPoint::new(px, py));
        prop_assert!(p.x >= 0 && p.x <= lw as i32 - 1);
        prop_assert!(p.y >= 0 && p.y <= lh as i32 - 1);
    }

    /// The active rectangle never leaves the backbuffer.
    #[test]
    fn active_rect_within_backbuffer(
        pw in 1u32..4000, ph in 1u32..4000,
        lw in 1u32..2000, lh in 1u32..2000,
    ) {
        let r = transform(pw, ph, lw, lh).active_rect();
        prop_assert!(r.top_left.x >= 0 && r.top_left.y >= 0);
        prop_assert!(r.top_left.x as u32 + r.size.width <= pw);
        prop_assert!(r.top_left.y as u32 + r.size.height <= ph);
    }
}
