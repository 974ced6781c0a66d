//! Frame driver
//!
//! One [`Compositor`] owns the UI tree, the z-order registry, the offscreen
//! target and the physical backbuffer. A frame is one [`Compositor::update`]
//! followed by one [`Compositor::draw`]:
//!
//! 1. **update**: apply queued resize / mode / scaling changes (recompute the
//!    transform, reallocate the offscreen target), map the raw pointer once
//!    through the shared [`InputCoordinateMapper`], dispatch it topmost first,
//!    and apply window lifecycle signals to the [`WindowZOrderManager`].
//! 2. **draw**, scaling enabled: clear, fills into the logical offscreen
//!    target, nearest-neighbour blit into the active rectangle, then borders
//!    and text of every post-scale element straight onto the backbuffer. A
//!    floating window's area is re-blitted just before its own borders, so
//!    it covers the crisp output of everything below it.
//! 3. **draw**, scaling disabled: one unified 1:1 pass onto the backbuffer.
//!
//! Render targets are only ever reallocated inside `update`, never while a
//! frame is being drawn. Each element's draw call is isolated: a failure is
//! logged and the frame carries on with the next element.

use std::path::Path;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Size;
use lumen_scale::{
    AppMode, CompositorConfig, ConfigError, InputCoordinateMapper, LogicalResolution,
    PhysicalResolution, PointerState, PointerTracker, ScaleTransform,
};

use crate::blit::{blit_nearest, blit_nearest_region};
use crate::collect::{self, own_key, DrawnElement};
use crate::element::{DrawContext, PointerResponse, UiElement, UiSignal, UpdateContext};
use crate::framebuffer::{unpack, Framebuffer};
use crate::overlay::DebugOverlay;
use crate::paint::DrawError;
use crate::render_target::OffscreenTarget;
use crate::stats::{FrameReport, FrameStats};
use crate::zorder::{DrawOrderKey, WindowId, WindowZOrderManager};

/// Scaled-display compositor
pub struct Compositor {
    config: CompositorConfig,
    mode: AppMode,
    physical: PhysicalResolution,
    scaling_enabled: bool,
    transform: ScaleTransform,
    offscreen: OffscreenTarget,
    backbuffer: Framebuffer,
    zorder: WindowZOrderManager,
    roots: Vec<Box<dyn UiElement>>,
    tracker: PointerTracker,
    pending_resize: Option<PhysicalResolution>,
    pending_mode: Option<AppMode>,
    pending_scaling: Option<bool>,
    stats: FrameStats,
    overlay: DebugOverlay,
}

impl core::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("mode", &self.mode)
            .field("transform", &self.transform)
            .field("elements", &self.roots.len())
            .field("windows", &self.zorder.len())
            .finish_non_exhaustive()
    }
}

fn record(report: &mut FrameReport, element: &str, phase: &'static str, result: Result<(), DrawError>) {
    match result {
        Ok(()) => report.drawn = report.drawn.saturating_add(1),
        Err(error) => {
            report.failed = report.failed.saturating_add(1);
            tracing::warn!(element, phase, %error, "element draw failed, continuing frame");
        }
    }
}

fn collect_window_ids(element: &dyn UiElement, out: &mut Vec<WindowId>) {
    if let Some(id) = element.window_id() {
        out.push(id);
    }
    for child in element.children() {
        collect_window_ids(child.as_ref(), out);
    }
}

impl Compositor {
    /// Create a compositor for a validated configuration
    ///
    /// Starts in [`AppMode::PreSession`] with the configured window size.
    pub fn new(config: CompositorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mode = AppMode::default();
        let physical = config.window;
        let scaling_enabled = config.scaling_enabled;
        let transform = ScaleTransform::compute(physical, config.logical_for(mode), scaling_enabled);

        let mut offscreen = OffscreenTarget::new();
        if scaling_enabled {
            offscreen.ensure(transform.logical());
        }

        tracing::info!(
            mode = mode.as_str(),
            logical = %transform.logical(),
            physical = %physical,
            scaling_enabled,
            "compositor created"
        );

        Ok(Self {
            stats: FrameStats::new(config.slow_frame_budget()),
            config,
            mode,
            physical,
            scaling_enabled,
            transform,
            offscreen,
            backbuffer: Framebuffer::with_size(physical.size()),
            zorder: WindowZOrderManager::new(),
            roots: Vec::new(),
            tracker: PointerTracker::new(),
            pending_resize: None,
            pending_mode: None,
            pending_scaling: None,
            overlay: DebugOverlay::new(),
        })
    }

    // ── Tree ────────────────────────────────────────────────────────────────

    /// Add a top-level element (drawn above earlier ones with an equal key)
    pub fn add_element(&mut self, element: Box<dyn UiElement>) {
        tracing::debug!(element = element.name(), "element added");
        self.roots.push(element);
    }

    /// Remove the first top-level element named `name`
    ///
    /// Floating windows in the removed subtree are unregistered.
    pub fn remove_element(&mut self, name: &str) -> Option<Box<dyn UiElement>> {
        let index = self.roots.iter().position(|e| e.name() == name)?;
        let removed = self.roots.remove(index);
        let mut ids = Vec::new();
        collect_window_ids(removed.as_ref(), &mut ids);
        for id in ids {
            self.zorder.unregister(id);
        }
        tracing::debug!(element = name, "element removed");
        Some(removed)
    }

    /// Top-level elements
    pub fn elements(&self) -> &[Box<dyn UiElement>] {
        &self.roots
    }

    /// Find an element anywhere in the tree
    pub fn find(&self, name: &str) -> Option<&dyn UiElement> {
        fn search<'a>(elements: &'a [Box<dyn UiElement>], name: &str) -> Option<&'a dyn UiElement> {
            elements.iter().find_map(|e| {
                if e.name() == name {
                    Some(e.as_ref())
                } else {
                    search(e.children(), name)
                }
            })
        }
        search(&self.roots, name)
    }

    /// Find an element anywhere in the tree, mutably
    pub fn find_mut(&mut self, name: &str) -> Option<&mut dyn UiElement> {
        fn search<'a>(
            elements: &'a mut [Box<dyn UiElement>],
            name: &str,
        ) -> Option<&'a mut dyn UiElement> {
            for element in elements.iter_mut() {
                if element.name() == name {
                    return Some(element.as_mut());
                }
                if let Some(found) = search(element.children_mut(), name) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.roots, name)
    }

    /// Show or hide an element by name; returns false when not found
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.find_mut(name) {
            Some(element) => {
                element.set_visible(visible);
                true
            }
            None => false,
        }
    }

    // ── Queued display changes ──────────────────────────────────────────────

    /// Queue a physical window resize, applied at the next update
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn notify_resize(&mut self, width: u32, height: u32) {
        match PhysicalResolution::new(width, height) {
            Ok(physical) => self.pending_resize = Some(physical),
            Err(error) => tracing::debug!(%error, "ignoring resize"),
        }
    }

    /// Queue an application mode change, applied at the next update
    pub fn set_mode(&mut self, mode: AppMode) {
        self.pending_mode = Some(mode);
    }

    /// Queue switching the two-phase scaled path on or off
    pub fn set_scaling_enabled(&mut self, enabled: bool) {
        self.pending_scaling = Some(enabled);
    }

    fn apply_pending(&mut self) {
        let resize = self.pending_resize.take();
        let mode = self.pending_mode.take();
        let scaling = self.pending_scaling.take();
        if resize.is_none() && mode.is_none() && scaling.is_none() {
            return;
        }

        let physical = resize.unwrap_or(self.physical);
        let mode = mode.unwrap_or(self.mode);
        let scaling_enabled = scaling.unwrap_or(self.scaling_enabled);
        let logical = self.config.logical_for(mode);

        if physical == self.physical
            && mode == self.mode
            && scaling_enabled == self.scaling_enabled
        {
            return;
        }

        self.transform = ScaleTransform::compute(physical, logical, scaling_enabled);
        if logical != self.config.logical_for(self.mode) {
            for element in &mut self.roots {
                element.fit_to_screen(logical.size());
            }
        }
        if scaling_enabled {
            self.offscreen.ensure(logical);
        } else {
            self.offscreen.release();
        }
        if physical != self.physical {
            self.backbuffer = Framebuffer::with_size(physical.size());
        }

        tracing::info!(
            mode = mode.as_str(),
            logical = %logical,
            physical = %physical,
            scaling_enabled,
            scale = self.transform.scale(),
            "display reconfigured"
        );

        self.physical = physical;
        self.mode = mode;
        self.scaling_enabled = scaling_enabled;
    }

    // ── Frame ───────────────────────────────────────────────────────────────

    /// Update step: apply queued changes, route the pointer, handle window signals
    ///
    /// Window lifecycle signals are applied to the z-order registry
    /// (`Activated` → bring to front, `Shown` → register, `Closed` →
    /// unregister) before every signal is returned to the caller.
    pub fn update(&mut self, raw: PointerState) -> Vec<UiSignal> {
        self.apply_pending();

        let mapper = self.mapper();
        let mut pointer = self.tracker.advance(raw, &mapper);
        let screen = self.transform.logical().size();

        // Topmost first; later roots win ties, as they draw later.
        let mut order: Vec<(DrawOrderKey, usize)> = self
            .roots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_visible())
            .map(|(i, e)| (own_key(e.as_ref(), &self.zorder), i))
            .collect();
        order.sort_unstable_by(|a, b| b.cmp(a));

        let mut signals = Vec::new();
        for root in &mut self.roots {
            root.poll_signals(&mut signals);
        }
        for (_, index) in order {
            let Some(root) = self.roots.get_mut(index) else {
                continue;
            };
            let mut ctx = UpdateContext::new(pointer, screen, &mut signals);
            if root.update(&mut ctx) == PointerResponse::Consumed {
                pointer = pointer.into_captured();
            }
        }

        for signal in &signals {
            match *signal {
                UiSignal::Activated(id) => {
                    self.zorder.bring_to_front(id);
                }
                UiSignal::Shown(id) => {
                    self.zorder.register(id);
                }
                UiSignal::Closed(id) => self.zorder.unregister(id),
                UiSignal::Clicked(_) | UiSignal::Toggled(..) => {}
            }
        }
        signals
    }

    /// Draw step: render the whole tree into the backbuffer
    pub fn draw(&mut self) -> FrameReport {
        let start = Instant::now();
        let mut report = FrameReport::default();
        let clear = unpack(self.config.clear_color);

        let entries = collect::collect_frame(&self.roots, &self.zorder);
        self.backbuffer.fill(clear);

        if self.transform.should_skip_offscreen_pass() {
            let ctx = DrawContext {
                should_skip_offscreen_pass: true,
            };
            match self.offscreen.get_mut() {
                Some(offscreen) => {
                    offscreen.fill(clear);
                    for entry in &entries {
                        let result = entry.element.draw(offscreen, &ctx);
                        record(&mut report, entry.element.name(), "fills", result);
                    }
                    blit_nearest(offscreen, &mut self.backbuffer, &self.transform);
                }
                None => {
                    tracing::warn!(error = %DrawError::NoTarget, "skipping fills pass");
                }
            }

            for entry in &entries {
                if let Some(post_scale) = entry.post_scale() {
                    // Floating windows are opaque: restore their composited
                    // fills so lower elements' borders and text end up beneath.
                    if let (Some(_), Some(offscreen)) = (entry.element.window_id(), self.offscreen.get()) {
                        blit_nearest_region(
                            offscreen,
                            &mut self.backbuffer,
                            &self.transform,
                            entry.element.bounds(),
                        );
                    }
                    let result = post_scale.draw_borders_and_text(&mut self.backbuffer, &self.transform);
                    record(&mut report, entry.element.name(), "borders-and-text", result);
                }
            }
        } else {
            let ctx = DrawContext {
                should_skip_offscreen_pass: false,
            };
            for entry in &entries {
                let result = entry.element.draw(&mut self.backbuffer, &ctx);
                record(&mut report, entry.element.name(), "unified", result);
            }
        }

        if self.overlay.is_enabled() {
            let result = self.overlay.draw(&mut self.backbuffer, &entries, &self.transform);
            record(&mut report, "debug-overlay", "overlay", result);
        }

        report.duration = start.elapsed();
        report.slow = self.stats.record(report.duration);
        report
    }

    /// One update + draw
    pub fn frame(&mut self, raw: PointerState) -> (Vec<UiSignal>, FrameReport) {
        let signals = self.update(raw);
        let report = self.draw();
        (signals, report)
    }

    /// Names and keys of the post-scale pass this frame would use
    pub fn draw_sequence(&self) -> Vec<DrawnElement> {
        collect::draw_sequence(&self.roots, &self.zorder)
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    /// Pointer mapper for the current transform
    pub fn mapper(&self) -> InputCoordinateMapper {
        InputCoordinateMapper::new(self.transform)
    }

    /// Current scale transform
    pub fn transform(&self) -> &ScaleTransform {
        &self.transform
    }

    /// Current application mode
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Current logical resolution
    pub fn logical(&self) -> LogicalResolution {
        self.transform.logical()
    }

    /// Current physical resolution
    pub fn physical(&self) -> PhysicalResolution {
        self.physical
    }

    /// Logical screen size
    pub fn screen(&self) -> Size {
        self.logical().size()
    }

    /// Configuration in use
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Physical backbuffer (what gets presented)
    pub fn backbuffer(&self) -> &Framebuffer {
        &self.backbuffer
    }

    /// Offscreen fills target
    pub fn offscreen(&self) -> &OffscreenTarget {
        &self.offscreen
    }

    /// Floating-window registry
    pub fn zorder(&self) -> &WindowZOrderManager {
        &self.zorder
    }

    /// Floating-window registry, mutably
    pub fn zorder_mut(&mut self) -> &mut WindowZOrderManager {
        &mut self.zorder
    }

    /// Frame statistics
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Debug overlay state
    pub fn debug_overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    /// Toggle the debug overlay; returns the new state
    pub fn toggle_debug_overlay(&mut self) -> bool {
        let enabled = self.overlay.toggle();
        tracing::info!(enabled, "debug overlay toggled");
        enabled
    }

    /// Backbuffer clear colour
    pub fn clear_color(&self) -> Rgb888 {
        unpack(self.config.clear_color)
    }

    /// Save the backbuffer as PNG
    pub fn save_screenshot(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let path = path.as_ref();
        self.backbuffer.save_png(path)?;
        tracing::info!(path = %path.display(), "screenshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;
    use embedded_graphics::prelude::Dimensions;

    #[test]
    fn test_new_allocates_offscreen_when_scaling() {
        let c = Compositor::new(CompositorConfig::default()).unwrap();
        assert!(c.offscreen().is_allocated());
        assert_eq!(c.transform().scale(), 2.0);
        assert_eq!(c.backbuffer().width(), 1280);
    }

    #[test]
    fn test_native_has_no_offscreen() {
        let c = Compositor::new(CompositorConfig::NATIVE).unwrap();
        assert!(!c.offscreen().is_allocated());
        assert!(!c.transform().is_scaling_enabled());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CompositorConfig {
            tick_rate_hz: 0,
            ..CompositorConfig::default()
        };
        assert!(Compositor::new(config).is_err());
    }

    #[test]
    fn test_resize_is_deferred_until_update() {
        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        c.notify_resize(1000, 360);
        assert_eq!(c.transform().scale(), 2.0);

        c.update(PointerState::default());
        assert_eq!(c.transform().scale(), 0.75);
        assert_eq!(c.transform().offset(), (260.0, 0.0));
        assert_eq!(c.backbuffer().width(), 1000);
        // Same logical size: offscreen untouched
        assert_eq!(c.offscreen().allocations(), 1);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        c.notify_resize(0, 0);
        c.update(PointerState::default());
        assert_eq!(c.physical(), PhysicalResolution::DOUBLE_VGA);
    }

    #[test]
    fn test_mode_change_reallocates_offscreen() {
        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        c.set_mode(AppMode::InSession);
        c.update(PointerState::default());

        assert_eq!(c.logical(), LogicalResolution::SVGA);
        assert_eq!(c.offscreen().allocations(), 2);
        assert_eq!(c.offscreen().releases(), 1);
        assert_eq!(c.offscreen().get().map(Framebuffer::width), Some(800));
    }

    #[test]
    fn test_disable_scaling_releases_offscreen() {
        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        c.set_scaling_enabled(false);
        c.update(PointerState::default());
        assert!(!c.offscreen().is_allocated());
        assert_eq!(c.transform().scale(), 1.0);
    }

    #[test]
    fn test_empty_frame_is_clear_color() {
        let config = CompositorConfig {
            clear_color: 0x102030,
            ..CompositorConfig::default()
        };
        let mut c = Compositor::new(config).unwrap();
        let report = c.draw();
        assert_eq!(report.drawn, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(c.backbuffer().get_pixel(640, 480), Some(Rgb888::new(0x10, 0x20, 0x30)));
        assert_eq!(c.stats().frames(), 1);
    }

    #[test]
    fn test_overlay_toggle() {
        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        assert!(c.toggle_debug_overlay());
        c.draw();
        // Status line background is drawn in black over the clear colour,
        // text in yellow.
        assert!(c.backbuffer().count_color(&c.backbuffer().bounding_box(), Rgb888::YELLOW) > 0);
    }

    struct Blank;

    impl crate::WindowContent for Blank {
        fn draw_fills<D: crate::Canvas>(
            &self,
            _: &mut D,
            _: embedded_graphics::primitives::Rectangle,
        ) -> Result<(), DrawError> {
            Ok(())
        }

        fn draw_borders_and_text<D: crate::Canvas>(
            &self,
            _: &mut D,
            _: embedded_graphics::primitives::Rectangle,
            _: &ScaleTransform,
        ) -> Result<(), DrawError> {
            Ok(())
        }
    }

    #[test]
    fn test_smaller_mode_pulls_windows_on_screen() {
        use crate::FloatingWindow;
        use embedded_graphics::prelude::Point;
        use embedded_graphics::primitives::Rectangle;

        let mut c = Compositor::new(CompositorConfig::default()).unwrap();
        c.set_mode(AppMode::InSession);
        c.update(PointerState::default());
        assert_eq!(c.logical(), LogicalResolution::SVGA);

        let at = |x, y| Rectangle::new(Point::new(x, y), Size::new(120, 80));
        c.add_element(Box::new(FloatingWindow::new(WindowId(1), "far", at(700, 500), Blank).shown()));
        c.add_element(Box::new(FloatingWindow::new(WindowId(2), "near", at(40, 40), Blank).shown()));
        c.update(PointerState::default());

        c.set_mode(AppMode::PreSession);
        c.update(PointerState::default());
        assert_eq!(c.logical(), LogicalResolution::VGA);
        assert_eq!(c.find("far").unwrap().bounds(), at(520, 400));
        assert_eq!(c.find("near").unwrap().bounds(), at(40, 40));
    }
}
