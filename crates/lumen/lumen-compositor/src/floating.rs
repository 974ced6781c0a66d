//! Floating-window base
//!
//! [`FloatingWindow`] owns everything every draggable window shares: the
//! frame (background, title bar, close button), phase dispatch, the mapping
//! of logical positions to physical ones, dragging, activation and its
//! draw-order key proxy into the [`WindowZOrderManager`]. A concrete window
//! only supplies a [`WindowContent`] that draws the area below the title bar.
//!
//! ```text
//! ┌──────────────────────────┬───┐
//! │ Title                    │ x │  ← TITLE_BAR_HEIGHT, drag handle
//! ├──────────────────────────┴───┤
//! │                              │
//! │        content area          │  ← WindowContent
//! │                              │
//! └──────────────────────────────┘
//! ```

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{DrawTargetExt, Point, Size};
use embedded_graphics::primitives::Rectangle;
use lumen_scale::ScaleTransform;

use crate::element::{
    draw_two_phase, DrawContext, ElementKind, PointerResponse, PostScaleDrawable, UiElement,
    UiSignal, UpdateContext,
};
use crate::framebuffer::Framebuffer;
use crate::paint::{self, Canvas, DrawError, BASE_TEXT_HEIGHT};
use crate::zorder::{DrawOrderKey, WindowId, WindowZOrderManager};

/// Title bar height in logical pixels
pub const TITLE_BAR_HEIGHT: u32 = 14;

/// Close button edge length in logical pixels
pub const CLOSE_BUTTON_SIZE: u32 = 10;

/// Window body drawn by a concrete floating window
///
/// `area` is the logical content rectangle (below the title bar, inside the
/// border). Fills land on the logical offscreen target; borders and text go
/// straight to the backbuffer through `transform`. Both targets arrive
/// clipped to the content area, so long lines never spill over the frame.
pub trait WindowContent {
    /// Flat fills in logical coordinates
    fn draw_fills<D: Canvas>(&self, target: &mut D, area: Rectangle) -> Result<(), DrawError>;

    /// Borders and text at physical resolution
    fn draw_borders_and_text<D: Canvas>(
        &self,
        target: &mut D,
        area: Rectangle,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError>;

    /// Pointer handling inside the content area
    fn update(&mut self, _area: Rectangle, _ctx: &mut UpdateContext<'_>) -> PointerResponse {
        PointerResponse::Ignored
    }
}

/// Window frame colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStyle {
    /// Content background
    pub background: Rgb888,
    /// Title bar fill
    pub title_bar: Rgb888,
    /// Frame and separator lines
    pub border: Rgb888,
    /// Title text and close glyph
    pub text: Rgb888,
}

impl WindowStyle {
    /// Dark frame with a blue title bar
    pub const DARK: Self = Self {
        background: Rgb888::new(0x20, 0x22, 0x28),
        title_bar: Rgb888::new(0x28, 0x48, 0x80),
        border: Rgb888::new(0xA0, 0xA8, 0xB8),
        text: Rgb888::new(0xF0, 0xF0, 0xF0),
    };
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self::DARK
    }
}

/// Draggable, closable window wrapping a [`WindowContent`]
pub struct FloatingWindow<C> {
    id: WindowId,
    name: String,
    title: String,
    bounds: Rectangle,
    visible: bool,
    /// Pointer offset from the top-left corner while dragging
    grab: Option<Point>,
    style: WindowStyle,
    pending: Vec<UiSignal>,
    content: C,
}

impl<C: WindowContent> FloatingWindow<C> {
    /// Create a hidden window; call [`Self::show`] to register it
    pub fn new(id: WindowId, name: impl Into<String>, bounds: Rectangle, content: C) -> Self {
        let name = name.into();
        Self {
            id,
            title: name.clone(),
            name,
            bounds,
            visible: false,
            grab: None,
            style: WindowStyle::default(),
            pending: Vec::new(),
            content,
        }
    }

    /// Set the title bar text (defaults to the name)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set frame colours
    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder form of [`Self::show`]
    pub fn shown(mut self) -> Self {
        self.show();
        self
    }

    /// Make the window visible; queues [`UiSignal::Shown`] when it was hidden
    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.pending.push(UiSignal::Shown(self.id));
        }
    }

    /// Hide the window; queues [`UiSignal::Closed`] when it was visible
    pub fn close(&mut self) {
        if self.visible {
            self.visible = false;
            self.grab = None;
            self.pending.push(UiSignal::Closed(self.id));
        }
    }

    /// Window identity
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Content, for callers that feed it data
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Content, mutably
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Move the top-left corner, keeping the window on `screen`
    pub fn move_to(&mut self, top_left: Point, screen: Size) {
        let max_x = screen.width.saturating_sub(self.bounds.size.width);
        let max_y = screen.height.saturating_sub(self.bounds.size.height);
        self.bounds.top_left = Point::new(
            clamp_axis(top_left.x, max_x),
            clamp_axis(top_left.y, max_y),
        );
    }

    /// Title bar rectangle (drag handle), logical
    pub fn title_bar_rect(&self) -> Rectangle {
        Rectangle::new(
            self.bounds.top_left,
            Size::new(self.bounds.size.width, TITLE_BAR_HEIGHT.min(self.bounds.size.height)),
        )
    }

    /// Close button rectangle, logical
    pub fn close_button_rect(&self) -> Rectangle {
        let inset = TITLE_BAR_HEIGHT.saturating_sub(CLOSE_BUTTON_SIZE) / 2;
        let right = self
            .bounds
            .top_left
            .x
            .saturating_add_unsigned(self.bounds.size.width);
        Rectangle::new(
            Point::new(
                right
                    .saturating_sub_unsigned(CLOSE_BUTTON_SIZE)
                    .saturating_sub_unsigned(inset),
                self.bounds.top_left.y.saturating_add_unsigned(inset),
            ),
            Size::new(CLOSE_BUTTON_SIZE, CLOSE_BUTTON_SIZE),
        )
    }

    /// Title text area: inside the frame, left of the close button, logical
    pub fn title_text_rect(&self) -> Rectangle {
        let left = self.bounds.top_left.x.saturating_add(1);
        let right = self.close_button_rect().top_left.x;
        Rectangle::new(
            Point::new(left, self.bounds.top_left.y.saturating_add(1)),
            Size::new(
                right.saturating_sub(left).try_into().unwrap_or(0),
                TITLE_BAR_HEIGHT.saturating_sub(2),
            ),
        )
    }

    /// Content rectangle below the title bar, logical
    pub fn content_rect(&self) -> Rectangle {
        let top = self.bounds.top_left.y.saturating_add_unsigned(TITLE_BAR_HEIGHT);
        Rectangle::new(
            Point::new(self.bounds.top_left.x.saturating_add(1), top),
            Size::new(
                self.bounds.size.width.saturating_sub(2),
                self.bounds.size.height.saturating_sub(TITLE_BAR_HEIGHT.saturating_add(1)),
            ),
        )
    }
}

fn difference(a: Point, b: Point) -> Point {
    Point::new(a.x.saturating_sub(b.x), a.y.saturating_sub(b.y))
}

fn clamp_axis(value: i32, max: u32) -> i32 {
    let max = i32::try_from(max).unwrap_or(i32::MAX);
    value.clamp(0, max)
}

impl<C: WindowContent> PostScaleDrawable for FloatingWindow<C> {
    fn draw_order_key(&self, zorder: &WindowZOrderManager) -> DrawOrderKey {
        // Not yet registered (shown this frame): sit just above the panels.
        zorder.key_of(self.id).unwrap_or(DrawOrderKey::FLOATING_BASE)
    }

    fn draw_fills(&self, target: &mut Framebuffer) -> Result<(), DrawError> {
        paint::fill_rect(target, self.bounds, self.style.background)?;
        paint::fill_rect(target, self.title_bar_rect(), self.style.title_bar)?;
        let area = self.content_rect();
        self.content.draw_fills(&mut target.clipped(&area), area)
    }

    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        let style = &self.style;
        paint::stroke_rect_scaled(target, self.bounds, transform, style.border, 1)?;
        paint::stroke_rect_scaled(target, self.title_bar_rect(), transform, style.border, 1)?;

        let close = self.close_button_rect();
        paint::stroke_rect_scaled(target, close, transform, style.text, 1)?;
        paint::draw_text_scaled(
            target,
            "x",
            paint::offset(close.top_left, 2, 0),
            BASE_TEXT_HEIGHT,
            transform,
            style.text,
        )?;

        let title_clip = transform.to_physical_rect(self.title_text_rect());
        paint::draw_text_scaled(
            &mut target.clipped(&title_clip),
            &self.title,
            paint::offset(self.bounds.top_left, 4, 2),
            BASE_TEXT_HEIGHT,
            transform,
            style.text,
        )?;

        let area = self.content_rect();
        let clip = transform.to_physical_rect(area);
        self.content
            .draw_borders_and_text(&mut target.clipped(&clip), area, transform)
    }
}

impl<C: WindowContent> UiElement for FloatingWindow<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Window
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        if visible {
            self.show();
        } else {
            self.close();
        }
    }

    fn fit_to_screen(&mut self, screen: Size) {
        self.move_to(self.bounds.top_left, screen);
    }

    fn draw(&self, target: &mut Framebuffer, ctx: &DrawContext) -> Result<(), DrawError> {
        draw_two_phase(self, target, ctx)
    }

    fn poll_signals(&mut self, out: &mut Vec<UiSignal>) {
        out.append(&mut self.pending);
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        if !self.visible {
            return PointerResponse::Ignored;
        }

        let pointer = ctx.pointer;

        if let Some(grab) = self.grab {
            if pointer.pressed {
                self.move_to(difference(pointer.position, grab), ctx.screen);
            } else {
                self.grab = None;
            }
            return PointerResponse::Consumed;
        }

        if pointer.captured || !pointer.is_over(&self.bounds) {
            return PointerResponse::Ignored;
        }

        if pointer.just_pressed {
            ctx.emit(UiSignal::Activated(self.id));

            if pointer.is_over(&self.close_button_rect()) {
                self.close();
                for signal in self.pending.drain(..) {
                    ctx.emit(signal);
                }
                return PointerResponse::Consumed;
            }
            if pointer.is_over(&self.title_bar_rect()) {
                self.grab = Some(difference(pointer.position, self.bounds.top_left));
                return PointerResponse::Consumed;
            }
        }

        let area = self.content_rect();
        self.content.update(area, ctx);
        PointerResponse::Consumed
    }

    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        Some(self)
    }

    fn window_id(&self) -> Option<WindowId> {
        Some(self.id)
    }
}
