//! Lumen scaled-display compositor
//!
//! Renders a UI authored against a fixed logical resolution crisply at any
//! window size:
//!
//! - **Phase 1**: flat fills are drawn at logical resolution into an
//!   [`OffscreenTarget`] and blitted nearest-neighbour into the backbuffer
//! - **Phase 2**: every [`PostScaleDrawable`] draws its borders and text
//!   directly at physical resolution, sorted by [`DrawOrderKey`]
//! - Floating windows get their keys from a [`WindowZOrderManager`], so they
//!   always draw above fixed panels and the last-activated one draws on top
//!
//! # Example
//!
//! ```no_run
//! use lumen_compositor::Compositor;
//! use lumen_scale::{CompositorConfig, PointerState};
//!
//! let mut compositor = Compositor::new(CompositorConfig::default()).unwrap();
//! compositor.notify_resize(1920, 1080);
//! let signals = compositor.update(PointerState::default());
//! let report = compositor.draw();
//! assert!(signals.is_empty());
//! assert_eq!(report.failed, 0);
//! ```
//!
//! # Feature flags
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `headless` | Drops the [`window`] module (winit + softbuffer surface) for CI |

pub mod blit;
pub mod collect;
pub mod compositor;
pub mod element;
pub mod floating;
pub mod framebuffer;
pub mod hotkeys;
pub mod overlay;
pub mod paint;
pub mod render_target;
pub mod stats;
pub mod zorder;

#[cfg(not(feature = "headless"))]
pub mod window;

pub use blit::{blit_nearest, blit_nearest_region};
pub use collect::{collect_frame, collect_post_scale, DrawnElement, FrameEntry};
pub use compositor::Compositor;
pub use element::{
    draw_two_phase, DrawContext, ElementKind, PointerResponse, PostScaleDrawable, UiElement,
    UiSignal, UpdateContext,
};
pub use floating::{FloatingWindow, WindowContent, WindowStyle};
pub use framebuffer::Framebuffer;
pub use hotkeys::{map_key, HotKey};
pub use overlay::DebugOverlay;
pub use paint::{Canvas, DrawError};
pub use render_target::OffscreenTarget;
pub use stats::{FrameReport, FrameStats};
pub use zorder::{DrawOrderKey, WindowId, WindowZOrderManager};

#[cfg(not(feature = "headless"))]
pub use window::{PlatformInput, PlatformWindow, WindowError};

// Re-export so downstream crates draw with the same embedded-graphics version.
pub use embedded_graphics;
pub use lumen_scale;
