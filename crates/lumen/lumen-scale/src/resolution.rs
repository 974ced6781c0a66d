//! Logical and physical resolutions
//!
//! The UI is authored against a fixed [`LogicalResolution`] selected per
//! [`AppMode`]; the platform window has a [`PhysicalResolution`] that changes
//! whenever the user resizes it. Both are plain pixel grids, kept as distinct
//! types so a logical size can never be passed where a physical one is expected.

use embedded_graphics::prelude::Size;
use serde::{Deserialize, Serialize};

/// Error raised when a resolution would have a zero dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Width or height was zero
    #[error("resolution must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

fn check_non_zero(width: u32, height: u32) -> Result<(), ResolutionError> {
    if width == 0 || height == 0 {
        Err(ResolutionError::ZeroDimension { width, height })
    } else {
        Ok(())
    }
}

/// Fixed virtual pixel grid the UI is authored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalResolution {
    width: u32,
    height: u32,
}

impl LogicalResolution {
    /// 640×480, the pre-session (login / character select) grid
    pub const VGA: Self = Self {
        width: 640,
        height: 480,
    };

    /// 800×600, the in-session (gameplay) grid
    pub const SVGA: Self = Self {
        width: 800,
        height: 600,
    };

    /// Create a logical resolution, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Result<Self, ResolutionError> {
        check_non_zero(width, height)?;
        Ok(Self { width, height })
    }

    /// Width in logical pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in logical pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Size as an embedded-graphics [`Size`]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check both dimensions are non-zero (deserialized values bypass [`Self::new`])
    pub fn validate(&self) -> Result<(), ResolutionError> {
        check_non_zero(self.width, self.height)
    }
}

impl core::fmt::Display for LogicalResolution {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Actual output window / backbuffer size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalResolution {
    width: u32,
    height: u32,
}

impl PhysicalResolution {
    /// 640×480 window
    pub const VGA: Self = Self {
        width: 640,
        height: 480,
    };

    /// 1280×960 window (exactly 2× the pre-session grid)
    pub const DOUBLE_VGA: Self = Self {
        width: 1280,
        height: 960,
    };

    /// Create a physical resolution, rejecting zero dimensions
    ///
    /// Platform layers report 0×0 while a window is minimized; callers should
    /// skip such notifications rather than propagate them.
    pub fn new(width: u32, height: u32) -> Result<Self, ResolutionError> {
        check_non_zero(width, height)?;
        Ok(Self { width, height })
    }

    /// Width in device pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Size as an embedded-graphics [`Size`]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check both dimensions are non-zero (deserialized values bypass [`Self::new`])
    pub fn validate(&self) -> Result<(), ResolutionError> {
        check_non_zero(self.width, self.height)
    }
}

impl core::fmt::Display for PhysicalResolution {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<LogicalResolution> for PhysicalResolution {
    /// Window exactly the size of the logical grid (1:1)
    fn from(logical: LogicalResolution) -> Self {
        Self {
            width: logical.width,
            height: logical.height,
        }
    }
}

/// Application mode, each with its own logical resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppMode {
    /// Login, server and character selection screens
    #[default]
    PreSession,
    /// Connected and playing
    InSession,
}

impl AppMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            AppMode::PreSession => AppMode::InSession,
            AppMode::InSession => AppMode::PreSession,
        }
    }

    /// Short name for logs and window titles
    pub fn as_str(self) -> &'static str {
        match self {
            AppMode::PreSession => "pre-session",
            AppMode::InSession => "in-session",
        }
    }
}
