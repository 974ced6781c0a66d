//! Label component for displaying text
//!
//! A label has no fills; its glyphs are drawn entirely in the post-scale
//! pass so they stay crisp at any window size.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    draw_two_phase, DrawContext, DrawError, DrawOrderKey, ElementKind, Framebuffer,
    PostScaleDrawable, UiElement, WindowZOrderManager,
};
use lumen_scale::ScaleTransform;

/// Text size variants
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TextSize {
    /// 10 px logical cell
    #[default]
    Small,
    /// 20 px logical cell
    Normal,
}

impl TextSize {
    /// Logical cell height
    pub fn line_height(self) -> u32 {
        match self {
            TextSize::Small => 10,
            TextSize::Normal => 20,
        }
    }
}

/// Static text
pub struct Label {
    name: String,
    text: String,
    position: Point,
    color: Rgb888,
    size: TextSize,
    key: DrawOrderKey,
    visible: bool,
}

impl Label {
    /// Create a label with its top-left corner at `position` (logical)
    pub fn new(name: impl Into<String>, text: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            position,
            color: Rgb888::WHITE,
            size: TextSize::Small,
            key: DrawOrderKey::fixed(10),
            visible: true,
        }
    }

    /// Set text color
    pub fn color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    /// Set text size
    pub fn size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    /// Set the fixed draw-order key (capped at [`DrawOrderKey::PANEL_MAX`])
    pub fn key(mut self, key: u64) -> Self {
        self.key = DrawOrderKey::fixed(key);
        self
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Logical text dimensions
    pub fn dimensions(&self) -> Size {
        let height = self.size.line_height();
        let width = paint::logical_text_width(&self.text)
            .saturating_mul(height)
            .checked_div(paint::BASE_TEXT_HEIGHT)
            .unwrap_or(0);
        Size::new(width, height)
    }
}

impl PostScaleDrawable for Label {
    fn draw_order_key(&self, _: &WindowZOrderManager) -> DrawOrderKey {
        self.key
    }

    fn draw_fills(&self, _target: &mut Framebuffer) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        paint::draw_text_scaled(
            target,
            &self.text,
            self.position,
            self.size.line_height(),
            transform,
            self.color,
        )
    }
}

impl UiElement for Label {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Label
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position, self.dimensions())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn draw(&self, target: &mut Framebuffer, ctx: &DrawContext) -> Result<(), DrawError> {
        draw_two_phase(self, target, ctx)
    }

    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        Some(self)
    }
}
