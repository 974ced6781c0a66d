//! Lumen UI Components
//!
//! Concrete elements for the Lumen compositor. Every component implements
//! both [`UiElement`](lumen_compositor::UiElement) and
//! [`PostScaleDrawable`](lumen_compositor::PostScaleDrawable): fills go through
//! the magnified offscreen pass, borders and text are drawn crisp at physical
//! resolution.
//!
//! # Components
//!
//! - `Label` - Static text display
//! - `Button` - Clickable button with label, emits `Clicked`
//! - `Checkbox` - Toggle with label, emits `Toggled`
//! - `Panel` - Fixed container with children
//! - `TextWindow` - Floating window content: scrolling text log
//! - `ListWindow` - Floating window content: selectable list
//!
//! # Example
//!
//! ```no_run
//! use lumen_widgets::prelude::*;
//! use lumen_compositor::embedded_graphics::prelude::*;
//! use lumen_compositor::embedded_graphics::primitives::Rectangle;
//!
//! let toolbar = Panel::new("toolbar", Rectangle::new(Point::zero(), Size::new(640, 24)))
//!     .key(10)
//!     .with_child(Button::new("play", "Play", Point::new(4, 3)).style(ButtonStyle::primary()));
//! ```

pub mod button;
pub mod checkbox;
pub mod label;
pub mod list_window;
pub mod panel;
pub mod text_window;

pub mod prelude {
    //! Glob import of every component
    pub use crate::button::*;
    pub use crate::checkbox::*;
    pub use crate::label::*;
    pub use crate::list_window::*;
    pub use crate::panel::*;
    pub use crate::text_window::*;
}
