//! Fixed container
//!
//! A panel sits at a fixed draw-order key in the `0..=50` range and owns child
//! elements. It draws only its own frame; the compositor walks the children
//! itself. Pointer input goes to the last child first (children later in the
//! list are painted on top). A press on the panel's own area is consumed so
//! elements underneath do not react to it.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    draw_two_phase, DrawContext, DrawError, DrawOrderKey, ElementKind, Framebuffer,
    PointerResponse, PostScaleDrawable, UiElement, UiSignal, UpdateContext, WindowZOrderManager,
};
use lumen_scale::ScaleTransform;

/// Height of the optional title strip, logical
pub const PANEL_TITLE_HEIGHT: u32 = 14;

/// Panel colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelStyle {
    /// Body fill
    pub background: Rgb888,
    /// Frame colour, if any
    pub border: Option<Rgb888>,
    /// Title text colour
    pub text: Rgb888,
    /// Corner radius (logical, 0 for square)
    pub corner_radius: u32,
}

impl PanelStyle {
    /// Dark grey body, light frame
    pub const DEFAULT: Self = Self {
        background: Rgb888::new(0x30, 0x32, 0x38),
        border: Some(Rgb888::new(0x70, 0x78, 0x88)),
        text: Rgb888::new(0xE0, 0xE0, 0xE0),
        corner_radius: 0,
    };
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fixed container with children
pub struct Panel {
    name: String,
    title: Option<String>,
    bounds: Rectangle,
    key: DrawOrderKey,
    style: PanelStyle,
    visible: bool,
    children: Vec<Box<dyn UiElement>>,
}

impl Panel {
    /// Create an empty panel at fixed key 0
    pub fn new(name: impl Into<String>, bounds: Rectangle) -> Self {
        Self {
            name: name.into(),
            title: None,
            bounds,
            key: DrawOrderKey::BACKGROUND,
            style: PanelStyle::default(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Set the fixed draw-order key (capped at [`DrawOrderKey::PANEL_MAX`])
    pub fn key(mut self, key: u64) -> Self {
        self.key = DrawOrderKey::fixed(key);
        self
    }

    /// Show a title strip at the top
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set panel colours
    pub fn style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder form of [`Self::push`]
    pub fn with_child(mut self, child: impl UiElement + 'static) -> Self {
        self.push(Box::new(child));
        self
    }

    /// Append a child (drawn above earlier children with an equal key)
    pub fn push(&mut self, child: Box<dyn UiElement>) {
        self.children.push(child);
    }

    /// Remove the first direct child named `name`
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn UiElement>> {
        let index = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(index))
    }

    fn title_rect(&self) -> Rectangle {
        Rectangle::new(
            self.bounds.top_left,
            Size::new(
                self.bounds.size.width,
                PANEL_TITLE_HEIGHT.min(self.bounds.size.height),
            ),
        )
    }
}

impl PostScaleDrawable for Panel {
    fn draw_order_key(&self, _: &WindowZOrderManager) -> DrawOrderKey {
        self.key
    }

    fn draw_fills(&self, target: &mut Framebuffer) -> Result<(), DrawError> {
        paint::fill_rounded(
            target,
            self.bounds,
            self.style.corner_radius,
            self.style.background,
        )
    }

    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        if let Some(border) = self.style.border {
            paint::stroke_rounded_scaled(
                target,
                self.bounds,
                transform,
                self.style.corner_radius,
                border,
                1,
            )?;
            if self.title.is_some() {
                paint::stroke_rect_scaled(target, self.title_rect(), transform, border, 1)?;
            }
        }
        if let Some(title) = &self.title {
            paint::draw_text_scaled(
                target,
                title,
                paint::offset(self.bounds.top_left, 4, 2),
                paint::BASE_TEXT_HEIGHT,
                transform,
                self.style.text,
            )?;
        }
        Ok(())
    }
}

impl UiElement for Panel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Panel
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
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

    fn fit_to_screen(&mut self, screen: Size) {
        for child in &mut self.children {
            child.fit_to_screen(screen);
        }
    }

    fn poll_signals(&mut self, out: &mut Vec<UiSignal>) {
        for child in &mut self.children {
            child.poll_signals(out);
        }
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        let mut response = PointerResponse::Ignored;
        for child in self.children.iter_mut().rev() {
            if !child.is_visible() {
                continue;
            }
            if child.update(ctx) == PointerResponse::Consumed {
                ctx.capture();
                response = PointerResponse::Consumed;
            }
        }
        if ctx.pointer.pressed_in(&self.bounds) {
            response = PointerResponse::Consumed;
        }
        response
    }

    fn children(&self) -> &[Box<dyn UiElement>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn UiElement>] {
        &mut self.children
    }

    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        Some(self)
    }
}
