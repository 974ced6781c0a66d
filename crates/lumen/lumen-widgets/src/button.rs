//! Button component
//!
//! Clicks follow the usual press-then-release rule: the press must start on
//! the button and the release must land on it for [`UiSignal::Clicked`] to
//! fire. A press that started on the button claims the pointer until release.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    draw_two_phase, DrawContext, DrawError, DrawOrderKey, ElementKind, Framebuffer,
    PointerResponse, PostScaleDrawable, UiElement, UiSignal, UpdateContext, WindowZOrderManager,
};
use lumen_scale::ScaleTransform;

/// Button style presets
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonStyle {
    /// Fill colour
    pub background: Rgb888,
    /// Fill colour while held down
    pub pressed: Rgb888,
    /// Label colour
    pub foreground: Rgb888,
    /// Border colour, if any
    pub border: Option<Rgb888>,
    /// Horizontal and vertical padding around the label
    pub padding: (u32, u32),
    /// Corner radius (logical)
    pub corner_radius: u32,
}

impl ButtonStyle {
    /// Primary button (dark background, light text)
    pub fn primary() -> Self {
        Self {
            background: Rgb888::new(0x28, 0x48, 0x80),
            pressed: Rgb888::new(0x18, 0x30, 0x58),
            foreground: Rgb888::WHITE,
            border: Some(Rgb888::new(0xA0, 0xA8, 0xB8)),
            padding: (8, 4),
            corner_radius: 3,
        }
    }

    /// Secondary button (light background, dark text)
    pub fn secondary() -> Self {
        Self {
            background: Rgb888::new(0xC8, 0xC8, 0xC8),
            pressed: Rgb888::new(0x90, 0x90, 0x90),
            foreground: Rgb888::BLACK,
            border: Some(Rgb888::new(0x80, 0x80, 0x80)),
            padding: (8, 4),
            corner_radius: 3,
        }
    }

    /// Text-only button (no background)
    pub fn text() -> Self {
        Self {
            background: Rgb888::BLACK,
            pressed: Rgb888::new(0x30, 0x30, 0x30),
            foreground: Rgb888::WHITE,
            border: None,
            padding: (4, 2),
            corner_radius: 0,
        }
    }
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self::primary()
    }
}

/// Clickable button with a text label
pub struct Button {
    name: &'static str,
    label: String,
    position: Point,
    style: ButtonStyle,
    min_width: Option<u32>,
    key: DrawOrderKey,
    visible: bool,
    held: bool,
}

impl Button {
    /// Create a button at `position` (logical); `name` is reported in [`UiSignal::Clicked`]
    pub fn new(name: &'static str, label: impl Into<String>, position: Point) -> Self {
        Self {
            name,
            label: label.into(),
            position,
            style: ButtonStyle::default(),
            min_width: None,
            key: DrawOrderKey::fixed(20),
            visible: true,
            held: false,
        }
    }

    /// Set button style
    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Set minimum width
    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the fixed draw-order key (capped at [`DrawOrderKey::PANEL_MAX`])
    pub fn key(mut self, key: u64) -> Self {
        self.key = DrawOrderKey::fixed(key);
        self
    }

    /// Whether the button is currently held down
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Calculate button size including padding
    fn calculate_size(&self) -> Size {
        let (pad_x, pad_y) = self.style.padding;
        let content_width = paint::logical_text_width(&self.label).saturating_add(pad_x.saturating_mul(2));
        let content_height = paint::BASE_TEXT_HEIGHT.saturating_add(pad_y.saturating_mul(2));
        let width = self.min_width.map_or(content_width, |min| content_width.max(min));
        Size::new(width, content_height)
    }

    fn label_origin(&self) -> Point {
        let size = self.calculate_size();
        let text_width = paint::logical_text_width(&self.label);
        let x = size.width.saturating_sub(text_width) / 2;
        let y = size.height.saturating_sub(paint::BASE_TEXT_HEIGHT) / 2;
        self.position
            .x
            .checked_add_unsigned(x)
            .zip(self.position.y.checked_add_unsigned(y))
            .map_or(self.position, |(x, y)| Point::new(x, y))
    }
}

impl PostScaleDrawable for Button {
    fn draw_order_key(&self, _: &WindowZOrderManager) -> DrawOrderKey {
        self.key
    }

    fn draw_fills(&self, target: &mut Framebuffer) -> Result<(), DrawError> {
        let fill = if self.held {
            self.style.pressed
        } else {
            self.style.background
        };
        paint::fill_rounded(target, self.bounds(), self.style.corner_radius, fill)
    }

    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        if let Some(border) = self.style.border {
            paint::stroke_rounded_scaled(
                target,
                self.bounds(),
                transform,
                self.style.corner_radius,
                border,
                1,
            )?;
        }
        paint::draw_text_scaled(
            target,
            &self.label,
            self.label_origin(),
            paint::BASE_TEXT_HEIGHT,
            transform,
            self.style.foreground,
        )
    }
}

impl UiElement for Button {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Button
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position, self.calculate_size())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.held = false;
        }
    }

    fn draw(&self, target: &mut Framebuffer, ctx: &DrawContext) -> Result<(), DrawError> {
        draw_two_phase(self, target, ctx)
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        let bounds = self.bounds();
        if self.held {
            if ctx.pointer.just_released || !ctx.pointer.pressed {
                self.held = false;
                // A window above took the release: no click underneath it
                if !ctx.pointer.captured && ctx.pointer.is_over(&bounds) {
                    tracing::debug!(button = self.name, "clicked");
                    ctx.emit(UiSignal::Clicked(self.name));
                }
            }
            return PointerResponse::Consumed;
        }
        if ctx.pointer.pressed_in(&bounds) {
            self.held = true;
            return PointerResponse::Consumed;
        }
        PointerResponse::Ignored
    }

    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_scale::LogicalPointer;

    fn pointer(x: i32, y: i32, pressed: bool, just_pressed: bool, just_released: bool) -> LogicalPointer {
        LogicalPointer {
            position: Point::new(x, y),
            pressed,
            just_pressed,
            just_released,
            captured: false,
        }
    }

    fn step(button: &mut Button, pointer: LogicalPointer) -> (PointerResponse, Vec<UiSignal>) {
        let mut signals = Vec::new();
        let mut ctx = UpdateContext::new(pointer, Size::new(640, 480), &mut signals);
        let response = button.update(&mut ctx);
        (response, signals)
    }

    #[test]
    fn test_button_size_calculation() {
        let button = Button::new("ok", "Test", Point::zero());
        // 4 chars * 6 px + 2 * 8 padding, 10 px text + 2 * 4 padding
        assert_eq!(button.calculate_size(), Size::new(40, 18));
    }

    #[test]
    fn test_min_width() {
        let button = Button::new("ok", "Hi", Point::zero()).min_width(100);
        assert_eq!(button.calculate_size().width, 100);
    }

    #[test]
    fn test_label_centred() {
        let button = Button::new("ok", "Hi", Point::new(10, 10)).min_width(52);
        // (52 - 12) / 2 = 20, (18 - 10) / 2 = 4
        assert_eq!(button.label_origin(), Point::new(30, 14));
    }

    #[test]
    fn test_style_presets() {
        assert_eq!(ButtonStyle::primary().foreground, Rgb888::WHITE);
        assert_eq!(ButtonStyle::secondary().foreground, Rgb888::BLACK);
        assert!(ButtonStyle::text().border.is_none());
    }

    #[test]
    fn test_press_release_inside_clicks() {
        let mut button = Button::new("ok", "OK", Point::new(10, 10));
        let (response, signals) = step(&mut button, pointer(15, 15, true, true, false));
        assert_eq!(response, PointerResponse::Consumed);
        assert!(signals.is_empty());
        assert!(button.is_held());

        let (response, signals) = step(&mut button, pointer(15, 15, false, false, true));
        assert_eq!(response, PointerResponse::Consumed);
        assert_eq!(signals, vec![UiSignal::Clicked("ok")]);
        assert!(!button.is_held());
    }

    #[test]
    fn test_release_captured_above_does_not_click() {
        let mut button = Button::new("ok", "OK", Point::new(10, 10));
        step(&mut button, pointer(15, 15, true, true, false));
        assert!(button.is_held());

        let released = pointer(15, 15, false, false, true).into_captured();
        let (response, signals) = step(&mut button, released);
        assert_eq!(response, PointerResponse::Consumed);
        assert!(signals.is_empty());
        assert!(!button.is_held());
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut button = Button::new("ok", "OK", Point::new(10, 10));
        step(&mut button, pointer(15, 15, true, true, false));
        let (_, signals) = step(&mut button, pointer(200, 200, false, false, true));
        assert!(signals.is_empty());
        assert!(!button.is_held());
    }

    #[test]
    fn test_captured_press_ignored() {
        let mut button = Button::new("ok", "OK", Point::new(10, 10));
        let mut p = pointer(15, 15, true, true, false);
        p.captured = true;
        let (response, _) = step(&mut button, p);
        assert_eq!(response, PointerResponse::Ignored);
        assert!(!button.is_held());
    }

    #[test]
    fn test_pressed_fill_colour() {
        let mut button = Button::new("ok", "OK", Point::new(0, 0)).style(ButtonStyle::text());
        let mut fb = Framebuffer::new(64, 32);
        step(&mut button, pointer(5, 5, true, true, false));
        button.draw_fills(&mut fb).unwrap();
        assert_eq!(fb.get_pixel(5, 5), Some(ButtonStyle::text().pressed));
    }
}
