//! Lumen UI Testing Utilities
//!
//! Playwright-inspired headless testing API for scaled-display UIs.
//!
//! # Quick start
//!
//! ```no_run
//! use lumen_testing::TestCompositor;
//! use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
//!
//! let mut t = TestCompositor::new();
//! // t.add_element(Box::new(my_panel));
//! t.frame();
//!
//! // Logical point (50, 25) at the default 2× scale
//! t.click_logical(Point::new(50, 25));
//! t.assert_pixel(0, 0, Rgb888::BLACK).unwrap();
//! t.assert_draw_order(&["toolbar", "inventory", "chat"]).unwrap();
//! ```
//!
//! # Golden screenshot testing
//!
//! ```no_run
//! # use lumen_testing::TestCompositor;
//! # let t = TestCompositor::new();
//! // First run: set UPDATE_GOLDEN=1 to create/update the reference file.
//! t.assert_matches_golden("tests/golden/my_screen.png", 0).unwrap();
//! ```
//!
//! # Feature flags
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `headless` | Builds the compositor without its winit/softbuffer window module |

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::Rectangle};

pub use lumen_compositor::{Compositor, ElementKind, UiElement, UiSignal};
pub use lumen_scale::{CompositorConfig, PhysicalPoint, PointerState};

// ─────────────────────────────────────────────────────────────────────────────
// ComponentRef
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of one element found in the compositor's UI tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    /// Element name (the test identifier).
    pub name: String,
    /// Broad element category.
    pub kind: ElementKind,
    /// Bounds in logical coordinates.
    pub bounds: Rectangle,
    /// Whether the element is visible.
    pub visible: bool,
}

impl ComponentRef {
    /// Centre of the element's logical bounding box.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TestCompositor
// ─────────────────────────────────────────────────────────────────────────────

/// Headless compositor for UI testing.
///
/// Wraps [`Compositor`] and adds:
/// - Pointer simulation in logical or physical coordinates
/// - Pixel and region assertions on the physical backbuffer
/// - Draw-order assertions on the post-scale pass
/// - Screenshot capture and golden-file comparison
///
/// Every simulated pointer action runs one full frame (update + draw), so
/// assertions always see the pixels the user would see.
pub struct TestCompositor {
    inner: Compositor,
    pointer: PointerState,
    signals: Vec<UiSignal>,
}

impl Default for TestCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCompositor {
    /// Scaled compositor: 640×480 logical in a 1280×960 window.
    pub fn new() -> Self {
        Self::with_config(CompositorConfig::default())
    }

    /// Compositor for `config`.
    ///
    /// An invalid config falls back to the default one; tests that exercise
    /// validation should use [`Compositor::new`] directly.
    pub fn with_config(config: CompositorConfig) -> Self {
        let inner = match Compositor::new(config) {
            Ok(compositor) => compositor,
            Err(_) => Self::default_compositor(),
        };
        Self {
            inner,
            pointer: PointerState::default(),
            signals: Vec::new(),
        }
    }

    /// Scaled compositor with a different window size, already applied.
    pub fn with_window(width: u32, height: u32) -> Self {
        let mut t = Self::new();
        t.resize(width, height);
        t
    }

    #[allow(clippy::expect_used)] // DEFAULT is a constant known to validate
    fn default_compositor() -> Compositor {
        Compositor::new(CompositorConfig::DEFAULT).expect("default config is valid")
    }

    // ── Frames ───────────────────────────────────────────────────────────────

    /// Run one update + draw with the current pointer state.
    ///
    /// Returns the signals raised this frame; they are also kept for
    /// [`Self::take_signals`].
    pub fn frame(&mut self) -> Vec<UiSignal> {
        let (signals, _report) = self.inner.frame(self.pointer);
        self.signals.extend(signals.iter().cloned());
        signals
    }

    /// Queue a window resize and run a frame so it takes effect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.inner.notify_resize(width, height);
        self.frame();
    }

    /// Drain every signal collected since the last call.
    pub fn take_signals(&mut self) -> Vec<UiSignal> {
        std::mem::take(&mut self.signals)
    }

    // ── Pointer simulation ───────────────────────────────────────────────────

    /// Physical position of a logical point under the current transform.
    pub fn to_physical(&self, logical: Point) -> PhysicalPoint {
        self.inner.mapper().to_physical(logical)
    }

    /// Move the pointer to a physical position and run a frame.
    pub fn move_physical(&mut self, x: f32, y: f32) -> Vec<UiSignal> {
        self.pointer.position = PhysicalPoint::new(x, y);
        self.frame()
    }

    /// Move the pointer to the centre of a logical pixel and run a frame.
    pub fn move_logical(&mut self, logical: Point) -> Vec<UiSignal> {
        let p = self.pixel_center(logical);
        self.move_physical(p.x, p.y)
    }

    /// Press the primary button at the current position and run a frame.
    pub fn press(&mut self) -> Vec<UiSignal> {
        self.pointer.primary_down = true;
        self.frame()
    }

    /// Release the primary button and run a frame.
    pub fn release(&mut self) -> Vec<UiSignal> {
        self.pointer.primary_down = false;
        self.frame()
    }

    /// Move, press and release at a physical position (three frames).
    pub fn click_physical(&mut self, x: f32, y: f32) -> Vec<UiSignal> {
        let mut signals = self.move_physical(x, y);
        signals.extend(self.press());
        signals.extend(self.release());
        signals
    }

    /// Move, press and release at a logical point (three frames).
    pub fn click_logical(&mut self, logical: Point) -> Vec<UiSignal> {
        let p = self.pixel_center(logical);
        self.click_physical(p.x, p.y)
    }

    /// Press at `from`, move to `to` and release there (logical points).
    pub fn drag_logical(&mut self, from: Point, to: Point) -> Vec<UiSignal> {
        let mut signals = self.move_logical(from);
        signals.extend(self.press());
        signals.extend(self.move_logical(to));
        signals.extend(self.release());
        signals
    }

    /// Click the centre of the named element.
    pub fn click_component(&mut self, name: &str) -> Result<Vec<UiSignal>, String> {
        let target = self
            .query_by_name(name)
            .ok_or_else(|| format!("Component '{name}' not found"))?;
        Ok(self.click_logical(target.center()))
    }

    fn pixel_center(&self, logical: Point) -> PhysicalPoint {
        // Aim at the middle of the logical pixel so floor() in the mapper
        // lands back on it at any scale.
        let top_left = self.to_physical(logical);
        let half = self.inner.transform().scale() / 2.0;
        PhysicalPoint::new(top_left.x + half, top_left.y + half)
    }

    // ── Framebuffer access ───────────────────────────────────────────────────

    /// Backbuffer colour at physical `(x, y)`, or `None` if out of bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.inner.backbuffer().get_pixel(x, y)
    }

    /// Physical rectangle a logical rectangle covers.
    pub fn physical_rect(&self, logical: Rectangle) -> Rectangle {
        self.inner.transform().to_physical_rect(logical)
    }

    // ── Pixel assertions ─────────────────────────────────────────────────────

    /// Assert that physical pixel `(x, y)` has the expected colour.
    ///
    /// Returns `Err` with a descriptive message on mismatch.
    pub fn assert_pixel(&self, x: u32, y: u32, expected: Rgb888) -> Result<(), String> {
        let actual = self
            .pixel_at(x, y)
            .ok_or_else(|| format!("Pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_pixel({x}, {y}): expected {}, got {}",
                hex(expected),
                hex(actual)
            ))
        }
    }

    /// Assert that every physical pixel inside `rect` has the given colour.
    pub fn assert_region_uniform(&self, rect: Rectangle, color: Rgb888) -> Result<(), String> {
        let fb = self.inner.backbuffer();
        let area = rect.intersection(&fb.bounding_box());
        if area.size != rect.size {
            return Err(format!(
                "assert_region_uniform: region {} extends past the backbuffer",
                describe(rect)
            ));
        }
        let total = (area.size.width as usize).saturating_mul(area.size.height as usize);
        let matching = fb.count_color(&area, color);
        if matching == total {
            Ok(())
        } else {
            Err(format!(
                "assert_region_uniform failed in {}: {} of {total} pixels are not {}",
                describe(rect),
                total.saturating_sub(matching),
                hex(color)
            ))
        }
    }

    /// Assert that `rect` contains **at least one** pixel with the given colour.
    pub fn assert_region_contains(&self, rect: Rectangle, color: Rgb888) -> Result<(), String> {
        if self.pixel_count_of_color(rect, color) > 0 {
            Ok(())
        } else {
            Err(format!(
                "assert_region_contains: no {} pixel found in {}",
                hex(color),
                describe(rect)
            ))
        }
    }

    /// Count how many physical pixels in `rect` match `color`.
    pub fn pixel_count_of_color(&self, rect: Rectangle, color: Rgb888) -> usize {
        self.inner.backbuffer().count_color(&rect, color)
    }

    // ── Tree queries ─────────────────────────────────────────────────────────

    /// Find an element anywhere in the tree by name.
    pub fn query_by_name(&self, name: &str) -> Option<ComponentRef> {
        self.inner.find(name).map(|element| ComponentRef {
            name: element.name().to_string(),
            kind: element.kind(),
            bounds: element.bounds(),
            visible: element.is_visible(),
        })
    }

    /// Assert that an element named `name` exists.
    pub fn assert_has_component(&self, name: &str) -> Result<(), String> {
        self.query_by_name(name)
            .ok_or_else(|| format!("Component '{name}' not found"))
            .map(|_| ())
    }

    // ── Draw-order assertions ────────────────────────────────────────────────

    /// Names of the post-scale pass, bottom to top.
    pub fn draw_order(&self) -> Vec<String> {
        self.inner
            .draw_sequence()
            .into_iter()
            .map(|drawn| drawn.name)
            .collect()
    }

    /// Assert that `expected` appear in the post-scale pass in this relative
    /// order (other elements may be interleaved).
    pub fn assert_draw_order(&self, expected: &[&str]) -> Result<(), String> {
        let actual = self.draw_order();
        let mut remaining = actual.iter();
        for name in expected {
            if !remaining.any(|drawn| drawn == name) {
                return Err(format!(
                    "assert_draw_order: expected {expected:?} in order, got {actual:?}"
                ));
            }
        }
        Ok(())
    }

    /// Assert that `name` is drawn after every other post-scale element.
    pub fn assert_topmost(&self, name: &str) -> Result<(), String> {
        let actual = self.draw_order();
        match actual.last() {
            Some(last) if last == name => Ok(()),
            _ => Err(format!("assert_topmost: expected '{name}' last, got {actual:?}")),
        }
    }

    /// Assert that `name` takes no part in the post-scale pass this frame.
    pub fn assert_not_drawn(&self, name: &str) -> Result<(), String> {
        if self.draw_order().iter().any(|drawn| drawn == name) {
            Err(format!("assert_not_drawn: '{name}' is in the draw sequence"))
        } else {
            Ok(())
        }
    }

    // ── Screenshot utilities ─────────────────────────────────────────────────

    /// Save the current backbuffer as a PNG.
    pub fn screenshot(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        self.inner.save_screenshot(path)?;
        Ok(())
    }

    /// Save the current backbuffer as the golden reference PNG.
    ///
    /// Parent directories are created automatically.
    pub fn save_golden(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let p = path.as_ref();
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.screenshot(p)
    }

    /// Assert the current backbuffer matches a golden reference PNG.
    ///
    /// `threshold` is the maximum per-channel absolute difference that is still
    /// considered equal (0 = exact match).
    ///
    /// Set the `UPDATE_GOLDEN=1` environment variable to **update** the golden
    /// file instead of asserting:
    ///
    /// ```bash
    /// UPDATE_GOLDEN=1 cargo test
    /// ```
    pub fn assert_matches_golden(
        &self,
        golden_path: impl AsRef<Path>,
        threshold: u8,
    ) -> Result<(), String> {
        let golden_path = golden_path.as_ref();

        if std::env::var("UPDATE_GOLDEN").is_ok() {
            return self.save_golden(golden_path).map_err(|e| {
                format!(
                    "Failed to save golden '{p}': {e}",
                    p = golden_path.display()
                )
            });
        }

        let current = self.inner.backbuffer().to_rgb_image();
        let golden = image::open(golden_path)
            .map_err(|e| {
                format!(
                    "Failed to open golden '{}': {e}\nRun with UPDATE_GOLDEN=1 to create it.",
                    golden_path.display()
                )
            })?
            .to_rgb8();

        if current.dimensions() != golden.dimensions() {
            let (cw, ch) = current.dimensions();
            let (gw, gh) = golden.dimensions();
            return Err(format!(
                "Dimension mismatch: screenshot is {cw}×{ch}, golden is {gw}×{gh}"
            ));
        }

        let diff_pixels = current
            .pixels()
            .zip(golden.pixels())
            .filter(|(cp, gp)| {
                cp.0.iter()
                    .zip(gp.0.iter())
                    .any(|(&a, &b)| a.abs_diff(b) > threshold)
            })
            .count();

        if diff_pixels > 0 {
            Err(format!(
                "{diff_pixels} pixels differ from golden '{}' (threshold={threshold})",
                golden_path.display()
            ))
        } else {
            Ok(())
        }
    }

    // ── Compositor access ────────────────────────────────────────────────────

    /// Wrapped compositor.
    pub fn compositor(&self) -> &Compositor {
        &self.inner
    }

    /// Wrapped compositor, mutably.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.inner
    }
}

impl std::ops::Deref for TestCompositor {
    type Target = Compositor;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for TestCompositor {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

fn hex(color: Rgb888) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

fn describe(rect: Rectangle) -> String {
    format!(
        "({}, {}) {}×{}",
        rect.top_left.x, rect.top_left.y, rect.size.width, rect.size.height
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
