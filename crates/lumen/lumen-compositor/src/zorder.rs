//! Draw-order keys and floating-window z-order
//!
//! Every element taking part in the post-scale pass reports a [`DrawOrderKey`].
//! Fixed panels use small constants (`0..=50`); floating windows get keys from
//! the [`WindowZOrderManager`] counter, which starts at
//! [`DrawOrderKey::FLOATING_BASE`] and only ever grows. Floating windows
//! therefore always draw above fixed panels, and the most recently activated
//! window draws above every other floating window.
//!
//! The manager is an owned value, not a global: the compositor holds one, and
//! tests construct a fresh one per case.

use std::collections::BTreeMap;

/// Last key the floating counter hands out; the overlay keeps the top slot
const COUNTER_CEILING: u64 = DrawOrderKey::OVERLAY.0.saturating_sub(1);

/// Stable identity of a floating window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl core::fmt::Display for WindowId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Position of an element in the post-scale draw sequence (ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DrawOrderKey(pub u64);

impl DrawOrderKey {
    /// Screen background
    pub const BACKGROUND: Self = Self(0);
    /// Highest key a fixed panel may use
    pub const PANEL_MAX: Self = Self(50);
    /// Floating-window counter seed; first assigned key is one above this
    pub const FLOATING_BASE: Self = Self(100);
    /// Always drawn last (debug overlay)
    pub const OVERLAY: Self = Self(u64::MAX);

    /// Key for a fixed panel, capped at [`Self::PANEL_MAX`]
    pub fn fixed(key: u64) -> Self {
        Self(key.min(Self::PANEL_MAX.0))
    }

    /// Whether this key belongs to the floating-window range
    pub fn is_floating(self) -> bool {
        self > Self::FLOATING_BASE && self != Self::OVERLAY
    }
}

/// Registry of floating windows and their current draw-order keys
#[derive(Debug, Clone)]
pub struct WindowZOrderManager {
    keys: BTreeMap<WindowId, DrawOrderKey>,
    counter: u64,
}

impl Default for WindowZOrderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowZOrderManager {
    /// Empty registry with the counter at [`DrawOrderKey::FLOATING_BASE`]
    pub fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
            counter: DrawOrderKey::FLOATING_BASE.0,
        }
    }

    /// Pre-increment the counter and return the new key
    ///
    /// Keys are strictly increasing and never reused. The counter saturates
    /// one below [`DrawOrderKey::OVERLAY`]; at one activation per frame at
    /// 60 Hz that is billions of years away.
    pub fn next_z_order(&mut self) -> DrawOrderKey {
        self.counter = self.counter.saturating_add(1).min(COUNTER_CEILING);
        DrawOrderKey(self.counter)
    }

    /// Track `window`, assigning it the next key
    ///
    /// Already-tracked windows keep their key. Returns the window's key.
    pub fn register(&mut self, window: WindowId) -> DrawOrderKey {
        if let Some(&key) = self.keys.get(&window) {
            return key;
        }
        let key = self.next_z_order();
        self.keys.insert(window, key);
        tracing::debug!(window = window.0, key = key.0, "window registered");
        key
    }

    /// Stop tracking `window`; no-op when it was never registered
    pub fn unregister(&mut self, window: WindowId) {
        if let Some(key) = self.keys.remove(&window) {
            tracing::debug!(window = window.0, key = key.0, "window unregistered");
        }
    }

    /// Give `window` the next key so it draws above every other window
    ///
    /// No-op for untracked windows. Returns the new key when one was assigned.
    pub fn bring_to_front(&mut self, window: WindowId) -> Option<DrawOrderKey> {
        if !self.keys.contains_key(&window) {
            return None;
        }
        let key = self.next_z_order();
        self.keys.insert(window, key);
        tracing::debug!(window = window.0, key = key.0, "window brought to front");
        Some(key)
    }

    /// Current key of `window`
    pub fn key_of(&self, window: WindowId) -> Option<DrawOrderKey> {
        self.keys.get(&window).copied()
    }

    /// Whether `window` is tracked
    pub fn contains(&self, window: WindowId) -> bool {
        self.keys.contains_key(&window)
    }

    /// Number of tracked windows
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no windows are tracked
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Tracked windows, bottom to top
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut order: Vec<(WindowId, DrawOrderKey)> =
            self.keys.iter().map(|(&id, &key)| (id, key)).collect();
        order.sort_by_key(|&(_, key)| key);
        order.into_iter().map(|(id, _)| id).collect()
    }

    /// Window drawn on top, if any
    pub fn topmost(&self) -> Option<WindowId> {
        self.keys
            .iter()
            .max_by_key(|entry| *entry.1)
            .map(|(&id, _)| id)
    }
}
