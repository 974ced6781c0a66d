//! CPU framebuffer used for both the logical offscreen target and the
//! physical backbuffer
//!
//! Pixels are packed `0x00RRGGBB`, the layout softbuffer presents directly.
//! Implements embedded-graphics [`DrawTarget`], so every primitive the
//! rendering backend offers (filled/stroked rectangles, rounded rectangles,
//! mono-font text) can draw into it. Out-of-bounds pixels are clipped.

use std::path::Path;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Pack an [`Rgb888`] into `0x00RRGGBB`
pub fn pack(color: Rgb888) -> u32 {
    ((color.r() as u32) << 16) | ((color.g() as u32) << 8) | (color.b() as u32)
}

/// Unpack `0x00RRGGBB` into an [`Rgb888`]
// Each channel is masked to 8 bits before the cast.
#[allow(clippy::cast_possible_truncation)]
pub fn unpack(pixel: u32) -> Rgb888 {
    Rgb888::new(
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    )
}

/// CPU-side pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Framebuffer {
    /// Create a black framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            pixels: vec![0; len],
            width,
            height,
        }
    }

    /// Create a framebuffer of the given size
    pub fn with_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw packed pixels, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            (y as usize)
                .checked_mul(self.width as usize)?
                .checked_add(x as usize)
        } else {
            None
        }
    }

    /// Set pixel at coordinates (ignored when out of bounds)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if let Some(px) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) {
            *px = pack(color);
        }
    }

    /// Get pixel at coordinates
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.index(x, y)
            .and_then(|i| self.pixels.get(i))
            .map(|&p| unpack(p))
    }

    /// One row of packed pixels
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        let start = self.index(0, y)?;
        self.pixels.get(start..start.saturating_add(self.width as usize))
    }

    /// One mutable row of packed pixels
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        let start = self.index(0, y)?;
        let end = start.saturating_add(self.width as usize);
        self.pixels.get_mut(start..end)
    }

    /// Fill the whole buffer
    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(pack(color));
    }

    /// Count pixels inside `area` equal to `color`
    pub fn count_color(&self, area: &Rectangle, color: Rgb888) -> usize {
        let area = area.intersection(&self.bounding_box());
        area.points()
            .filter(|p| {
                // intersection() keeps every point inside the buffer
                self.get_pixel(p.x.unsigned_abs(), p.y.unsigned_abs()) == Some(color)
            })
            .count()
    }

    /// Convert to an RGB image
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.get_pixel(x, y).unwrap_or(Rgb888::BLACK);
            image::Rgb([c.r(), c.g(), c.b()])
        })
    }

    /// Save as PNG (screenshots and golden images)
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_rgb_image().save(path)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x.unsigned_abs(), point.y.unsigned_abs(), color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let packed = pack(color);
        let x0 = area.top_left.x.unsigned_abs() as usize;
        let x1 = bottom_right.x.unsigned_abs() as usize;
        for y in area.top_left.y..=bottom_right.y {
            if let Some(span) = self
                .row_mut(y.unsigned_abs())
                .and_then(|row| row.get_mut(x0..=x1))
            {
                span.fill(packed);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
