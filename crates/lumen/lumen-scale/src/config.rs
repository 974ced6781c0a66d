//! Compositor configuration
//!
//! Presets follow the usual pattern: [`CompositorConfig::DEFAULT`] for the
//! scaled path, [`CompositorConfig::NATIVE`] for a 1:1 draw with no offscreen
//! indirection. Configurations can also be loaded from JSON:
//!
//! ```json
//! {
//!   "scaling_enabled": true,
//!   "pre_session": { "width": 640, "height": 480 },
//!   "in_session": { "width": 800, "height": 600 },
//!   "window": { "width": 1280, "height": 960 },
//!   "tick_rate_hz": 60,
//!   "slow_frame_budget_ms": 16,
//!   "clear_color": 0
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolution::{AppMode, LogicalResolution, PhysicalResolution, ResolutionError};

/// Errors raised while loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Config text is not valid JSON for [`CompositorConfig`]
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A resolution field has a zero dimension
    #[error("invalid resolution in `{field}`: {source}")]
    Resolution {
        /// Offending field name
        field: &'static str,
        /// Validation failure
        #[source]
        source: ResolutionError,
    },
    /// Tick rate must be at least 1 Hz
    #[error("tick_rate_hz must be non-zero")]
    ZeroTickRate,
}

/// Compositor and frame loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Two-phase scaled rendering (false = direct 1:1 unified draw)
    pub scaling_enabled: bool,
    /// Logical grid for [`AppMode::PreSession`]
    pub pre_session: LogicalResolution,
    /// Logical grid for [`AppMode::InSession`]
    pub in_session: LogicalResolution,
    /// Initial physical window size
    pub window: PhysicalResolution,
    /// Fixed update/draw rate
    pub tick_rate_hz: u32,
    /// Draw duration above which a frame is reported as slow
    pub slow_frame_budget_ms: u32,
    /// Backbuffer clear / letterbox colour as `0xRRGGBB`
    pub clear_color: u32,
}

impl CompositorConfig {
    /// Scaled rendering, VGA/SVGA logical grids, 2× initial window
    pub const DEFAULT: Self = Self {
        scaling_enabled: true,
        pre_session: LogicalResolution::VGA,
        in_session: LogicalResolution::SVGA,
        window: PhysicalResolution::DOUBLE_VGA,
        tick_rate_hz: 60,
        slow_frame_budget_ms: 16,
        clear_color: 0x000000,
    };

    /// No scaling: logical pixels map 1:1 onto the window
    pub const NATIVE: Self = Self {
        scaling_enabled: false,
        window: PhysicalResolution::VGA,
        ..Self::DEFAULT
    };

    /// Parse a configuration from JSON text and validate it
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "loaded compositor config");
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject zero-sized resolutions and a zero tick rate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("pre_session", self.pre_session.validate()),
            ("in_session", self.in_session.validate()),
            ("window", self.window.validate()),
        ];
        for (field, result) in checks {
            result.map_err(|source| ConfigError::Resolution { field, source })?;
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Logical resolution for an application mode
    pub fn logical_for(&self, mode: AppMode) -> LogicalResolution {
        match mode {
            AppMode::PreSession => self.pre_session,
            AppMode::InSession => self.in_session,
        }
    }

    /// Duration of one fixed tick
    pub fn tick_interval(&self) -> Duration {
        let second = Duration::from_secs(1);
        second.checked_div(self.tick_rate_hz).unwrap_or(second)
    }

    /// Slow-frame budget as a duration
    pub fn slow_frame_budget(&self) -> Duration {
        Duration::from_millis(u64::from(self.slow_frame_budget_ms))
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CompositorConfig::default().validate().is_ok());
        assert!(CompositorConfig::NATIVE.validate().is_ok());
        assert!(!CompositorConfig::NATIVE.scaling_enabled);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CompositorConfig::from_json_str(r#"{ "scaling_enabled": false }"#).unwrap();
        assert!(!config.scaling_enabled);
        assert_eq!(config.pre_session, LogicalResolution::VGA);
        assert_eq!(config.tick_rate_hz, 60);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let err = CompositorConfig::from_json_str(r#"{ "in_session": { "width": 0, "height": 600 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Resolution {
                field: "in_session",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let err = CompositorConfig::from_json_str(r#"{ "tick_rate_hz": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTickRate));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CompositorConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_logical_for_mode() {
        let config = CompositorConfig::default();
        assert_eq!(config.logical_for(AppMode::PreSession), LogicalResolution::VGA);
        assert_eq!(config.logical_for(AppMode::InSession), LogicalResolution::SVGA);
    }

    #[test]
    fn test_tick_interval() {
        let config = CompositorConfig {
            tick_rate_hz: 50,
            ..CompositorConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.json");
        let config = CompositorConfig::NATIVE;
        std::fs::write(&path, config.to_json_string().unwrap()).unwrap();
        assert_eq!(CompositorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompositorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
