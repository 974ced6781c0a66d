//! Checkbox with a trailing label

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    draw_two_phase, DrawContext, DrawError, DrawOrderKey, ElementKind, Framebuffer,
    PointerResponse, PostScaleDrawable, UiElement, UiSignal, UpdateContext, WindowZOrderManager,
};
use lumen_scale::ScaleTransform;

/// Edge length of the box, logical
pub const BOX_SIZE: u32 = 10;

const LABEL_GAP: u32 = 4;
const MARK_INSET: u32 = 2;

/// Two-state toggle; emits [`UiSignal::Toggled`] on every change
pub struct Checkbox {
    name: &'static str,
    label: String,
    position: Point,
    checked: bool,
    key: DrawOrderKey,
    visible: bool,
    color: Rgb888,
}

impl Checkbox {
    /// Create an unchecked checkbox at `position` (logical)
    pub fn new(name: &'static str, label: impl Into<String>, position: Point) -> Self {
        Self {
            name,
            label: label.into(),
            position,
            checked: false,
            key: DrawOrderKey::fixed(20),
            visible: true,
            color: Rgb888::WHITE,
        }
    }

    /// Builder form of [`Self::set_checked`]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the fixed draw-order key (capped at [`DrawOrderKey::PANEL_MAX`])
    pub fn key(mut self, key: u64) -> Self {
        self.key = DrawOrderKey::fixed(key);
        self
    }

    /// Current state
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Change state without emitting a signal
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn box_rect(&self) -> Rectangle {
        Rectangle::new(self.position, Size::new(BOX_SIZE, BOX_SIZE))
    }

    fn mark_rect(&self) -> Rectangle {
        let inset = i32::try_from(MARK_INSET).unwrap_or(0);
        Rectangle::new(
            paint::offset(self.position, inset, inset),
            Size::new(
                BOX_SIZE.saturating_sub(MARK_INSET.saturating_mul(2)),
                BOX_SIZE.saturating_sub(MARK_INSET.saturating_mul(2)),
            ),
        )
    }

    fn label_origin(&self) -> Point {
        let offset = i32::try_from(BOX_SIZE.saturating_add(LABEL_GAP)).unwrap_or(0);
        paint::offset(self.position, offset, 0)
    }
}

impl PostScaleDrawable for Checkbox {
    fn draw_order_key(&self, _: &WindowZOrderManager) -> DrawOrderKey {
        self.key
    }

    fn draw_fills(&self, target: &mut Framebuffer) -> Result<(), DrawError> {
        if self.checked {
            paint::fill_rect(target, self.mark_rect(), self.color)?;
        }
        Ok(())
    }

    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        paint::stroke_rect_scaled(target, self.box_rect(), transform, self.color, 1)?;
        paint::draw_text_scaled(
            target,
            &self.label,
            self.label_origin(),
            paint::BASE_TEXT_HEIGHT,
            transform,
            self.color,
        )
    }
}

impl UiElement for Checkbox {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Control
    }

    /// Box plus label; the whole area is clickable
    fn bounds(&self) -> Rectangle {
        let width = BOX_SIZE
            .saturating_add(LABEL_GAP)
            .saturating_add(paint::logical_text_width(&self.label));
        Rectangle::new(self.position, Size::new(width, BOX_SIZE))
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

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        if !ctx.pointer.pressed_in(&self.bounds()) {
            return PointerResponse::Ignored;
        }
        self.checked = !self.checked;
        tracing::debug!(checkbox = self.name, checked = self.checked, "toggled");
        ctx.emit(UiSignal::Toggled(self.name, self.checked));
        PointerResponse::Consumed
    }

    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        Some(self)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)] // Expected values are computed inline
mod tests {
    use super::*;
    use lumen_scale::LogicalPointer;

    fn press(x: i32, y: i32) -> LogicalPointer {
        LogicalPointer {
            position: Point::new(x, y),
            pressed: true,
            just_pressed: true,
            just_released: false,
            captured: false,
        }
    }

    #[test]
    fn test_toggle_emits_state() {
        let mut checkbox = Checkbox::new("grid", "Grid", Point::new(10, 10));
        let mut signals = Vec::new();

        let mut ctx = UpdateContext::new(press(12, 12), Size::new(640, 480), &mut signals);
        assert_eq!(checkbox.update(&mut ctx), PointerResponse::Consumed);
        let mut ctx = UpdateContext::new(press(30, 12), Size::new(640, 480), &mut signals);
        assert_eq!(checkbox.update(&mut ctx), PointerResponse::Consumed);

        assert_eq!(
            signals,
            vec![UiSignal::Toggled("grid", true), UiSignal::Toggled("grid", false)]
        );
        assert!(!checkbox.is_checked());
    }

    #[test]
    fn test_press_outside_ignored() {
        let mut checkbox = Checkbox::new("grid", "Grid", Point::new(10, 10));
        let mut signals = Vec::new();
        let mut ctx = UpdateContext::new(press(5, 5), Size::new(640, 480), &mut signals);
        assert_eq!(checkbox.update(&mut ctx), PointerResponse::Ignored);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_bounds_include_label() {
        let checkbox = Checkbox::new("grid", "Grid", Point::zero());
        assert_eq!(checkbox.bounds().size, Size::new(10 + 4 + 24, 10));
    }

    #[test]
    fn test_mark_only_when_checked() {
        let mut fb = Framebuffer::new(16, 16);
        Checkbox::new("a", "", Point::zero()).draw_fills(&mut fb).unwrap();
        assert_eq!(fb.get_pixel(5, 5), Some(Rgb888::BLACK));

        Checkbox::new("a", "", Point::zero())
            .checked(true)
            .draw_fills(&mut fb)
            .unwrap();
        assert_eq!(fb.get_pixel(5, 5), Some(Rgb888::WHITE));
        assert_eq!(fb.get_pixel(1, 1), Some(Rgb888::BLACK));
    }
}
