//! Offscreen render target lifecycle
//!
//! The phase-1 fills pass draws into a framebuffer sized at the logical
//! resolution. The target is (re)allocated only between frames, when the
//! compositor applies a queued resize or mode change, and the previous buffer
//! is always released before its replacement is created.

use lumen_scale::LogicalResolution;

use crate::framebuffer::Framebuffer;

/// Logical-resolution framebuffer used by the fills pass
#[derive(Debug, Default)]
pub struct OffscreenTarget {
    buffer: Option<Framebuffer>,
    allocations: u64,
    releases: u64,
}

impl OffscreenTarget {
    /// Create an empty target (nothing allocated)
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a buffer of exactly `logical` size exists
    ///
    /// No-op when the current buffer already matches. Otherwise the old buffer
    /// is released first, then the replacement allocated.
    pub fn ensure(&mut self, logical: LogicalResolution) {
        if let Some(buffer) = &self.buffer {
            if buffer.width() == logical.width() && buffer.height() == logical.height() {
                return;
            }
        }

        self.release_with_reason("resolution changed");

        self.buffer = Some(Framebuffer::with_size(logical.size()));
        self.allocations = self.allocations.saturating_add(1);
        tracing::info!(
            width = logical.width(),
            height = logical.height(),
            allocations = self.allocations,
            "offscreen target allocated"
        );
    }

    /// Drop the buffer (scaling disabled or shutting down)
    pub fn release(&mut self) {
        self.release_with_reason("scaling disabled");
    }

    fn release_with_reason(&mut self, reason: &'static str) {
        if let Some(old) = self.buffer.take() {
            self.releases = self.releases.saturating_add(1);
            tracing::info!(
                width = old.width(),
                height = old.height(),
                reason,
                "offscreen target released"
            );
            drop(old);
        }
    }

    /// Whether a buffer is currently allocated
    pub fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }

    /// The allocated buffer
    pub fn get(&self) -> Option<&Framebuffer> {
        self.buffer.as_ref()
    }

    /// The allocated buffer, mutably
    pub fn get_mut(&mut self) -> Option<&mut Framebuffer> {
        self.buffer.as_mut()
    }

    /// Number of allocations over the target's lifetime
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Number of releases over the target's lifetime
    pub fn releases(&self) -> u64 {
        self.releases
    }
}
