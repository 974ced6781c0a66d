//! Runtime hotkeys
//!
//! - F1: Toggle debug overlay
//! - F2: Switch pre-session / in-session mode
//! - F3: Toggle two-phase scaling
//! - F12: Save a screenshot
//! - Escape: Quit

use winit::keyboard::KeyCode;

/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotKey {
    /// Outline every element and show the transform
    ToggleDebugOverlay,
    /// Flip [`lumen_scale::AppMode`]
    ToggleMode,
    /// Switch between scaled and 1:1 rendering
    ToggleScaling,
    /// Write the backbuffer to a PNG
    Screenshot,
    /// Leave the frame loop
    Quit,
}

/// Map a physical key to its hotkey
pub fn map_key(key: KeyCode) -> Option<HotKey> {
    match key {
        KeyCode::F1 => Some(HotKey::ToggleDebugOverlay),
        KeyCode::F2 => Some(HotKey::ToggleMode),
        KeyCode::F3 => Some(HotKey::ToggleScaling),
        KeyCode::F12 => Some(HotKey::Screenshot),
        KeyCode::Escape => Some(HotKey::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(map_key(KeyCode::F1), Some(HotKey::ToggleDebugOverlay));
        assert_eq!(map_key(KeyCode::F3), Some(HotKey::ToggleScaling));
        assert_eq!(map_key(KeyCode::Escape), Some(HotKey::Quit));
        assert_eq!(map_key(KeyCode::KeyA), None);
    }
}
