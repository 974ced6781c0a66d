//! Drawing helpers over the embedded-graphics backend
//!
//! Elements use these instead of building primitive styles by hand. The
//! `*_scaled` variants take a logical rectangle plus the current
//! [`ScaleTransform`] and rasterize at physical resolution, which is what the
//! post-scale pass needs for crisp borders and glyphs.
//!
//! Every helper draws on any [`Canvas`], so callers can hand in a
//! [`Framebuffer`](crate::Framebuffer) or a clipped view of one
//! (`DrawTargetExt::clipped`).
//!
//! # Scaled text
//!
//! Logical text is laid out on the base font's cell grid. In the post-scale
//! pass each character is placed at its own scaled cell and drawn with the
//! largest ASCII mono font fitting that cell ([`font_for_cell`]), centred in
//! it. Once the cell is at least twice as tall as the tallest font, glyphs are
//! also magnified by a whole factor, so text keeps filling its layout at 3x
//! and beyond.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::{
    FONT_10X20, FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X10, FONT_6X12, FONT_6X13, FONT_6X9, FONT_7X13,
    FONT_7X14, FONT_8X13, FONT_9X15, FONT_9X18,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment,
};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use lumen_scale::ScaleTransform;

/// Error raised by a single element's draw call
///
/// The compositor logs it and carries on with the next element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    /// A font, image or other resource the element needs is unavailable
    #[error("missing resource: {0}")]
    MissingResource(&'static str),
    /// Target has a zero dimension
    #[error("render target has zero size")]
    ZeroSizedTarget,
    /// Phase-1 draw requested while no offscreen target is allocated
    #[error("offscreen target not allocated")]
    NoTarget,
    /// Element-specific failure
    #[error("{0}")]
    Element(String),
}

impl From<Infallible> for DrawError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Infallible RGB surface the helpers draw on
pub trait Canvas: DrawTarget<Color = Rgb888, Error = Infallible> {}

impl<T> Canvas for T where T: DrawTarget<Color = Rgb888, Error = Infallible> {}

/// Fonts ordered by cell height, then width
static FONT_LADDER: [&MonoFont<'static>; 13] = [
    &FONT_4X6, &FONT_5X7, &FONT_5X8, &FONT_6X9, &FONT_6X10, &FONT_6X12, &FONT_6X13, &FONT_7X13,
    &FONT_8X13, &FONT_7X14, &FONT_9X15, &FONT_9X18, &FONT_10X20,
];

/// Cell height of the default logical text font
pub const BASE_TEXT_HEIGHT: u32 = 10;

/// Default font for logical-resolution text
pub fn base_font() -> &'static MonoFont<'static> {
    &FONT_6X10
}

/// Logical horizontal advance of one character of the base font
pub fn base_advance() -> u32 {
    let font = base_font();
    font.character_size.width.saturating_add(font.character_spacing)
}

/// Font and whole-pixel magnification for one physical glyph cell
///
/// The magnification is `cell.height / 20` (at least 1), so it only kicks in
/// once the tallest font would fill less than half of the cell. The font is
/// then the tallest (widest among equal heights) that fits the cell shrunk by
/// that factor, or the smallest font when none fits.
pub fn font_for_cell(cell: Size) -> Result<(&'static MonoFont<'static>, u32), DrawError> {
    if cell.width == 0 || cell.height == 0 {
        return Err(DrawError::MissingResource("font for zero-sized text cell"));
    }
    let tallest = FONT_10X20.character_size.height;
    let magnify = cell.height.checked_div(tallest).unwrap_or(1).max(1);
    let fit = Size::new(
        cell.width.checked_div(magnify).unwrap_or(cell.width),
        cell.height.checked_div(magnify).unwrap_or(cell.height),
    );
    let font = FONT_LADDER
        .iter()
        .rev()
        .find(|font| font.character_size.width <= fit.width && font.character_size.height <= fit.height)
        .or_else(|| FONT_LADDER.first())
        .copied()
        .ok_or(DrawError::MissingResource("font ladder"))?;
    Ok((font, magnify))
}

/// Size of `text` drawn with `font`
pub fn measure_text(text: &str, font: &MonoFont<'_>) -> Size {
    MonoTextStyle::new(font, Rgb888::WHITE)
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size
}

/// Filled rectangle
pub fn fill_rect<D: Canvas>(target: &mut D, rect: Rectangle, color: Rgb888) -> Result<(), DrawError> {
    rect.into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)?;
    Ok(())
}

/// Rectangle border drawn inside `rect`
pub fn stroke_rect<D: Canvas>(
    target: &mut D,
    rect: Rectangle,
    color: Rgb888,
    width: u32,
) -> Result<(), DrawError> {
    rect.into_styled(inside_stroke(color, width)).draw(target)?;
    Ok(())
}

/// Filled rounded rectangle
pub fn fill_rounded<D: Canvas>(
    target: &mut D,
    rect: Rectangle,
    radius: u32,
    color: Rgb888,
) -> Result<(), DrawError> {
    RoundedRectangle::with_equal_corners(rect, Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)?;
    Ok(())
}

/// Rounded rectangle border drawn inside `rect`
pub fn stroke_rounded<D: Canvas>(
    target: &mut D,
    rect: Rectangle,
    radius: u32,
    color: Rgb888,
    width: u32,
) -> Result<(), DrawError> {
    RoundedRectangle::with_equal_corners(rect, Size::new(radius, radius))
        .into_styled(inside_stroke(color, width))
        .draw(target)?;
    Ok(())
}

fn inside_stroke(color: Rgb888, width: u32) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(width)
        .stroke_alignment(StrokeAlignment::Inside)
        .build()
}

/// Text with its top-left corner at `top_left`; returns the position after the text
pub fn draw_text<D: Canvas>(
    target: &mut D,
    text: &str,
    top_left: Point,
    font: &MonoFont<'_>,
    color: Rgb888,
) -> Result<Point, DrawError> {
    let next = Text::with_baseline(text, top_left, MonoTextStyle::new(font, color), Baseline::Top)
        .draw(target)?;
    Ok(next)
}

/// Border of a logical rectangle, rasterized at physical resolution
pub fn stroke_rect_scaled<D: Canvas>(
    target: &mut D,
    logical: Rectangle,
    transform: &ScaleTransform,
    color: Rgb888,
    logical_width: u32,
) -> Result<(), DrawError> {
    stroke_rect(
        target,
        transform.to_physical_rect(logical),
        color,
        transform.scale_length(logical_width),
    )
}

/// Rounded border of a logical rectangle, rasterized at physical resolution
pub fn stroke_rounded_scaled<D: Canvas>(
    target: &mut D,
    logical: Rectangle,
    transform: &ScaleTransform,
    logical_radius: u32,
    color: Rgb888,
    logical_width: u32,
) -> Result<(), DrawError> {
    stroke_rounded(
        target,
        transform.to_physical_rect(logical),
        transform.scale_length(logical_radius),
        color,
        transform.scale_length(logical_width),
    )
}

/// Text positioned in logical space, glyphs rasterized at physical resolution
///
/// Characters sit on the base font's logical grid, stretched to
/// `logical_height` (`base_advance()` wide at [`BASE_TEXT_HEIGHT`]); each one
/// is drawn centred in its scaled cell, so the text spans the same physical
/// width its logical layout promises.
pub fn draw_text_scaled<D: Canvas>(
    target: &mut D,
    text: &str,
    logical_top_left: Point,
    logical_height: u32,
    transform: &ScaleTransform,
    color: Rgb888,
) -> Result<(), DrawError> {
    let advance = base_advance()
        .saturating_mul(logical_height)
        .checked_div(BASE_TEXT_HEIGHT)
        .unwrap_or(0)
        .max(1);
    let cell = Size::new(
        transform.scale_length(advance),
        transform.scale_length(logical_height),
    );
    let (font, magnify) = font_for_cell(cell)?;
    let glyph = Size::new(
        font.character_size.width.saturating_mul(magnify),
        font.character_size.height.saturating_mul(magnify),
    );
    let inset = Point::new(
        half_gap(cell.width, glyph.width),
        half_gap(cell.height, glyph.height),
    );

    let style = MonoTextStyle::new(font, color);
    let advance = i32::try_from(advance).unwrap_or(i32::MAX);
    let mut logical = logical_top_left;
    let mut utf8 = [0u8; 4];
    for ch in text.chars() {
        let cell_origin = transform.to_physical_point(logical);
        let origin = Point::new(
            cell_origin.x.saturating_add(inset.x),
            cell_origin.y.saturating_add(inset.y),
        );
        let glyph = Text::with_baseline(ch.encode_utf8(&mut utf8), origin, style, Baseline::Top);
        if magnify > 1 {
            glyph.draw(&mut Magnified::new(target, origin, magnify))?;
        } else {
            glyph.draw(target)?;
        }
        logical.x = logical.x.saturating_add(advance);
    }
    Ok(())
}

fn half_gap(outer: u32, inner: u32) -> i32 {
    i32::try_from(outer.saturating_sub(inner) / 2).unwrap_or(0)
}

/// `point` moved by (`dx`, `dy`), saturating at the coordinate range
pub fn offset(point: Point, dx: i32, dy: i32) -> Point {
    Point::new(point.x.saturating_add(dx), point.y.saturating_add(dy))
}

/// Logical width `text` occupies when drawn with the base font
pub fn logical_text_width(text: &str) -> u32 {
    measure_text(text, base_font()).width
}

/// View of a target that paints every pixel as a `factor`×`factor` block,
/// anchored at `origin`
struct Magnified<'a, D> {
    target: &'a mut D,
    origin: Point,
    factor: u32,
}

impl<'a, D: Canvas> Magnified<'a, D> {
    fn new(target: &'a mut D, origin: Point, factor: u32) -> Self {
        Self {
            target,
            origin,
            factor,
        }
    }
}

impl<D: Canvas> Dimensions for Magnified<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D: Canvas> DrawTarget for Magnified<'_, D> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let factor = i32::try_from(self.factor).unwrap_or(1);
        let block = Size::new(self.factor, self.factor);
        for Pixel(point, color) in pixels {
            let dx = point.x.saturating_sub(self.origin.x).saturating_mul(factor);
            let dy = point.y.saturating_sub(self.origin.y).saturating_mul(factor);
            let top_left = Point::new(
                self.origin.x.saturating_add(dx),
                self.origin.y.saturating_add(dy),
            );
            self.target.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
