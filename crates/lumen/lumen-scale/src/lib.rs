//! Lumen scale space
//!
//! Geometry shared by every part of the scaled-display compositor:
//!
//! - [`LogicalResolution`] / [`PhysicalResolution`] / [`AppMode`]
//! - [`ScaleTransform`]: uniform scale + centring offset, recomputed on resize
//!   and mode change
//! - [`InputCoordinateMapper`]: the single physical → logical pointer mapping
//! - [`CompositorConfig`]: presets and JSON loading
//!
//! This crate has no windowing or rendering code, so it can be tested in
//! isolation.

pub mod config;
pub mod input;
pub mod resolution;
pub mod transform;

pub use config::{CompositorConfig, ConfigError};
pub use input::{
    InputCoordinateMapper, LogicalPointer, PhysicalPoint, PointerState, PointerTracker,
};
pub use resolution::{AppMode, LogicalResolution, PhysicalResolution, ResolutionError};
pub use transform::ScaleTransform;
