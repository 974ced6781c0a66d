//! Nearest-neighbour blit from the logical offscreen target to the backbuffer
//!
//! Each physical pixel inside the active rectangle samples the logical pixel
//! under its centre. No filtering: magnified pixel edges stay hard.

use embedded_graphics::primitives::Rectangle;
use lumen_scale::ScaleTransform;

use crate::framebuffer::Framebuffer;

/// Source index for each destination coordinate along one axis
// Sample positions are clamped to `[0, src_len - 1]` before the cast.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_map(dst_start: u32, dst_len: u32, offset: f32, scale: f32, src_len: u32) -> Vec<u32> {
    let max = src_len.saturating_sub(1) as f32;
    (dst_start..dst_start.saturating_add(dst_len))
        .map(|d| (((d as f32 + 0.5 - offset) / scale).floor().max(0.0).min(max)) as u32)
        .collect()
}

/// Scale `src` into `dst` using `transform`, touching only the active rectangle
///
/// Pixels outside the active rectangle (letterbox/pillarbox) are left as they
/// are; the caller clears them beforehand.
pub fn blit_nearest(src: &Framebuffer, dst: &mut Framebuffer, transform: &ScaleTransform) {
    blit_nearest_clipped(src, dst, transform, transform.active_rect());
}

/// Re-blit the part of the scaled image under a logical rectangle
///
/// Restores the composited fills inside `logical` (and only there), erasing
/// whatever the post-scale pass has drawn over that area so far.
pub fn blit_nearest_region(
    src: &Framebuffer,
    dst: &mut Framebuffer,
    transform: &ScaleTransform,
    logical: Rectangle,
) {
    blit_nearest_clipped(src, dst, transform, transform.to_physical_rect(logical));
}

fn blit_nearest_clipped(
    src: &Framebuffer,
    dst: &mut Framebuffer,
    transform: &ScaleTransform,
    clip: Rectangle,
) {
    let area = transform.active_rect().intersection(&clip);
    if area.size.width == 0 || area.size.height == 0 || src.width() == 0 {
        return;
    }

    let x0 = area.top_left.x.max(0).unsigned_abs();
    let y0 = area.top_left.y.max(0).unsigned_abs();
    let (ox, oy) = transform.offset();
    let scale = transform.scale();

    let columns = sample_map(x0, area.size.width, ox, scale, src.width());
    let rows = sample_map(y0, area.size.height, oy, scale, src.height());
    let x_start = x0 as usize;

    for (dy, sy) in (y0..).zip(rows) {
        let Some(src_row) = src.row(sy) else {
            continue;
        };
        let Some(dst_span) = dst
            .row_mut(dy)
            .and_then(|row| row.get_mut(x_start..x_start.saturating_add(columns.len())))
        else {
            continue;
        };
        for (out, &sx) in dst_span.iter_mut().zip(&columns) {
            if let Some(&pixel) = src_row.get(sx as usize) {
                *out = pixel;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
    use embedded_graphics::prelude::{Point, Size};
    use lumen_scale::{LogicalResolution, PhysicalResolution};

    fn transform(pw: u32, ph: u32, lw: u32, lh: u32) -> ScaleTransform {
        ScaleTransform::compute(
            PhysicalResolution::new(pw, ph).unwrap(),
            LogicalResolution::new(lw, lh).unwrap(),
            true,
        )
    }

    #[test]
    fn test_integer_upscale_duplicates_pixels() {
        let mut src = Framebuffer::new(2, 2);
        src.set_pixel(0, 0, Rgb888::RED);
        src.set_pixel(1, 1, Rgb888::BLUE);
        let mut dst = Framebuffer::new(4, 4);

        blit_nearest(&src, &mut dst, &transform(4, 4, 2, 2));

        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(dst.get_pixel(x, y), Some(Rgb888::RED));
        }
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(dst.get_pixel(x, y), Some(Rgb888::BLUE));
        }
        assert_eq!(dst.get_pixel(2, 0), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_letterbox_untouched() {
        let mut src = Framebuffer::new(4, 4);
        src.fill(Rgb888::WHITE);
        let mut dst = Framebuffer::new(12, 8);
        dst.fill(Rgb888::GREEN);

        // scale 2, offset (2, 0): columns 0..2 and 10..12 are pillarbox
        blit_nearest(&src, &mut dst, &transform(12, 8, 4, 4));

        assert_eq!(dst.get_pixel(1, 4), Some(Rgb888::GREEN));
        assert_eq!(dst.get_pixel(2, 4), Some(Rgb888::WHITE));
        assert_eq!(dst.get_pixel(9, 7), Some(Rgb888::WHITE));
        assert_eq!(dst.get_pixel(10, 0), Some(Rgb888::GREEN));
    }

    #[test]
    fn test_downscale_samples_without_blending() {
        let mut src = Framebuffer::new(4, 1);
        src.set_pixel(0, 0, Rgb888::RED);
        src.set_pixel(1, 0, Rgb888::BLUE);
        src.set_pixel(2, 0, Rgb888::RED);
        src.set_pixel(3, 0, Rgb888::BLUE);
        let mut dst = Framebuffer::new(2, 1);

        // scale 0.5: destination centres 0.5, 1.5 sample source 1 and 3
        blit_nearest(&src, &mut dst, &transform(2, 1, 4, 1));

        assert_eq!(dst.get_pixel(0, 0), Some(Rgb888::BLUE));
        assert_eq!(dst.get_pixel(1, 0), Some(Rgb888::BLUE));
    }

    #[test]
    fn test_sample_map_clamps() {
        let map = sample_map(0, 5, 0.0, 1.5, 3);
        assert_eq!(map, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_region_restores_only_inside() {
        let mut src = Framebuffer::new(4, 4);
        src.fill(Rgb888::WHITE);
        let mut dst = Framebuffer::new(8, 8);
        dst.fill(Rgb888::RED);

        blit_nearest_region(
            &src,
            &mut dst,
            &transform(8, 8, 4, 4),
            Rectangle::new(Point::new(1, 1), Size::new(2, 1)),
        );

        assert_eq!(dst.get_pixel(2, 2), Some(Rgb888::WHITE));
        assert_eq!(dst.get_pixel(5, 3), Some(Rgb888::WHITE));
        assert_eq!(dst.get_pixel(6, 2), Some(Rgb888::RED));
        assert_eq!(dst.get_pixel(2, 4), Some(Rgb888::RED));
        assert_eq!(dst.get_pixel(1, 2), Some(Rgb888::RED));
    }
}
