//! UI element contracts
//!
//! [`UiElement`] is the node type of the UI tree: anything the compositor can
//! draw and route pointer input to. [`PostScaleDrawable`] is the optional
//! capability an element exposes (through [`UiElement::as_post_scale`]) to
//! take part in the crisp second pass. Elements without it still show up,
//! but only through the magnified offscreen blit.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Size;
use embedded_graphics::primitives::Rectangle;
use lumen_scale::{LogicalPointer, LogicalResolution, ScaleTransform};

use crate::framebuffer::Framebuffer;
use crate::paint::DrawError;
use crate::zorder::{DrawOrderKey, WindowId, WindowZOrderManager};

/// Per-frame draw flags handed to [`UiElement::draw`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawContext {
    /// True exactly when scaling is enabled: draw fills only, borders and
    /// text come later in the post-scale pass
    pub should_skip_offscreen_pass: bool,
}

/// Event raised by an element during the update step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    /// Pointer went down inside a floating window
    Activated(WindowId),
    /// A floating window became visible
    Shown(WindowId),
    /// A floating window was closed
    Closed(WindowId),
    /// A button was clicked
    Clicked(&'static str),
    /// A checkbox changed state
    Toggled(&'static str, bool),
}

/// Whether an element claimed this frame's pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    /// Elements below must not react to the pointer
    Consumed,
    /// Pointer passes through
    Ignored,
}

impl PointerResponse {
    /// Combine two responses; consumed wins
    pub fn or(self, other: Self) -> Self {
        if self == Self::Consumed || other == Self::Consumed {
            Self::Consumed
        } else {
            Self::Ignored
        }
    }
}

/// State handed to [`UiElement::update`]
#[derive(Debug)]
pub struct UpdateContext<'a> {
    /// Pointer in logical coordinates, already mapped by the shared mapper
    pub pointer: LogicalPointer,
    /// Logical screen size (drag clamping)
    pub screen: Size,
    signals: &'a mut Vec<UiSignal>,
}

impl<'a> UpdateContext<'a> {
    /// Create a context that collects signals into `signals`
    pub fn new(pointer: LogicalPointer, screen: Size, signals: &'a mut Vec<UiSignal>) -> Self {
        Self {
            pointer,
            screen,
            signals,
        }
    }

    /// Raise a signal
    pub fn emit(&mut self, signal: UiSignal) {
        self.signals.push(signal);
    }

    /// Mark the pointer as consumed for the remaining elements
    pub fn capture(&mut self) {
        self.pointer = self.pointer.into_captured();
    }
}

/// Broad element category (debug overlay colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// Fixed container
    Panel,
    /// Floating window
    Window,
    /// Clickable button
    Button,
    /// Static text
    Label,
    /// Any other interactive control
    Control,
    /// Unclassified
    #[default]
    Other,
}

impl ElementKind {
    /// Outline colour used by the debug overlay
    pub fn overlay_color(self) -> Rgb888 {
        match self {
            ElementKind::Panel => Rgb888::new(0x00, 0x80, 0xFF),   // Blue
            ElementKind::Window => Rgb888::new(0x00, 0xE0, 0xE0),  // Cyan
            ElementKind::Button => Rgb888::new(0x00, 0xFF, 0x80),  // Green
            ElementKind::Label => Rgb888::new(0xFF, 0x40, 0x40),   // Red
            ElementKind::Control => Rgb888::new(0xC0, 0x40, 0xFF), // Purple
            ElementKind::Other => Rgb888::new(0xFF, 0xCC, 0x00),   // Yellow
        }
    }

    /// Short name for logs and assertions
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Panel => "Panel",
            ElementKind::Window => "Window",
            ElementKind::Button => "Button",
            ElementKind::Label => "Label",
            ElementKind::Control => "Control",
            ElementKind::Other => "Other",
        }
    }
}

/// Node of the UI tree
///
/// `draw` renders only this element, never its children: the compositor
/// walks [`UiElement::children`] itself so every node gets its own draw-order
/// slot and its own failure isolation.
pub trait UiElement {
    /// Identifier used in logs, lookups and draw-sequence assertions
    fn name(&self) -> &str;

    /// Category for the debug overlay
    fn kind(&self) -> ElementKind {
        ElementKind::Other
    }

    /// Bounds in logical coordinates
    fn bounds(&self) -> Rectangle;

    /// Invisible elements and their subtrees are neither drawn nor updated
    fn is_visible(&self) -> bool {
        true
    }

    /// Show or hide the element
    fn set_visible(&mut self, _visible: bool) {}

    /// The logical screen changed size; elements that move pull themselves
    /// back onto it. Composite elements forward to their children.
    fn fit_to_screen(&mut self, _screen: Size) {}

    /// Phase-1 draw (scaling enabled) or unified draw (scaling disabled)
    ///
    /// Coordinates are logical in both cases.
    fn draw(&self, target: &mut Framebuffer, ctx: &DrawContext) -> Result<(), DrawError>;

    /// Hand over signals queued outside the update step (show, close)
    ///
    /// Called for every element in tree order before pointer dispatch, hidden
    /// ones included. Composite elements forward to their children.
    fn poll_signals(&mut self, _out: &mut Vec<UiSignal>) {}

    /// React to this frame's pointer; composite elements forward to children
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) -> PointerResponse {
        PointerResponse::Ignored
    }

    /// Child elements, in paint order
    fn children(&self) -> &[Box<dyn UiElement>] {
        &[]
    }

    /// Child elements, mutably
    fn children_mut(&mut self) -> &mut [Box<dyn UiElement>] {
        &mut []
    }

    /// Post-scale capability, if this element draws crisp borders and text
    fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
        None
    }

    /// Floating-window identity, if this element is one
    fn window_id(&self) -> Option<WindowId> {
        None
    }
}

/// Contract for elements drawn in two phases
pub trait PostScaleDrawable {
    /// Position in the post-scale draw sequence
    fn draw_order_key(&self, zorder: &WindowZOrderManager) -> DrawOrderKey;

    /// Flat fills into the logical offscreen target
    fn draw_fills(&self, target: &mut Framebuffer) -> Result<(), DrawError>;

    /// Borders and glyph text directly onto the physical backbuffer
    ///
    /// Positions map through `transform` (`logical * scale + offset`).
    fn draw_borders_and_text(
        &self,
        target: &mut Framebuffer,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError>;

    /// Both passes at 1:1, used when scaling is disabled
    fn draw_unified(&self, target: &mut Framebuffer) -> Result<(), DrawError> {
        self.draw_fills(target)?;
        let logical = LogicalResolution::new(target.width(), target.height())
            .map_err(|_| DrawError::ZeroSizedTarget)?;
        self.draw_borders_and_text(target, &ScaleTransform::identity(logical))
    }
}

/// Standard [`UiElement::draw`] body for a [`PostScaleDrawable`]
pub fn draw_two_phase<P>(element: &P, target: &mut Framebuffer, ctx: &DrawContext) -> Result<(), DrawError>
where
    P: PostScaleDrawable + ?Sized,
{
    if ctx.should_skip_offscreen_pass {
        element.draw_fills(target)
    } else {
        element.draw_unified(target)
    }
}
