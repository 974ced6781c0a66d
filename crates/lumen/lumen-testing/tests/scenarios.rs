//! End-to-end compositor scenarios driven through the headless harness.

// Test files legitimately use arithmetic for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::cast_sign_loss
)]

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    Canvas, DrawContext, DrawError, FloatingWindow, Framebuffer, UiElement, UiSignal, WindowContent,
    WindowId,
};
use lumen_scale::{CompositorConfig, ScaleTransform};
use lumen_testing::TestCompositor;

struct Empty;

impl WindowContent for Empty {
    fn draw_fills<D: Canvas>(&self, _: &mut D, _: Rectangle) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_borders_and_text<D: Canvas>(
        &self,
        _: &mut D,
        _: Rectangle,
        _: &ScaleTransform,
    ) -> Result<(), DrawError> {
        Ok(())
    }
}

/// Content whose body is pure text, drawn in the crisp pass
struct Caption;

impl WindowContent for Caption {
    fn draw_fills<D: Canvas>(&self, _: &mut D, _: Rectangle) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_borders_and_text<D: Canvas>(
        &self,
        target: &mut D,
        area: Rectangle,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        paint::draw_text_scaled(
            target,
            "Hello",
            area.top_left + Point::new(4, 4),
            paint::BASE_TEXT_HEIGHT,
            transform,
            Rgb888::WHITE,
        )
    }
}

/// Same text, but drawn at logical resolution and only ever magnified
struct BlurryText;

impl UiElement for BlurryText {
    fn name(&self) -> &str {
        "blurry"
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::new(300, 300), Size::new(40, 12))
    }

    fn draw(&self, target: &mut Framebuffer, _: &DrawContext) -> Result<(), DrawError> {
        paint::draw_text(
            target,
            "Hello",
            Point::new(300, 300),
            paint::base_font(),
            Rgb888::WHITE,
        )?;
        Ok(())
    }
}

fn window<C: WindowContent>(id: u64, name: &'static str, at: Point, content: C) -> Box<FloatingWindow<C>> {
    Box::new(
        FloatingWindow::new(WindowId(id), name, Rectangle::new(at, Size::new(200, 150)), content)
            .shown(),
    )
}

/// True when every 2×2 physical block inside `rect` is one colour
fn is_pixel_doubled(t: &TestCompositor, rect: Rectangle) -> bool {
    let x0 = rect.top_left.x as u32;
    let y0 = rect.top_left.y as u32;
    (0..rect.size.height / 2).all(|by| {
        (0..rect.size.width / 2).all(|bx| {
            let (x, y) = (x0 + bx * 2, y0 + by * 2);
            let c = t.pixel_at(x, y);
            c == t.pixel_at(x + 1, y) && c == t.pixel_at(x, y + 1) && c == t.pixel_at(x + 1, y + 1)
        })
    })
}

// ── Scenario A ──────────────────────────────────────────────────────────────

#[test]
fn scenario_a_double_scale_click_mapping() {
    let t = TestCompositor::new();
    assert_eq!(t.transform().scale(), 2.0);
    assert_eq!(t.transform().offset(), (0.0, 0.0));
    assert_eq!(
        t.mapper().to_logical(lumen_scale::PhysicalPoint::new(100.0, 50.0)),
        Point::new(50, 25)
    );
}

// ── Scenario B ──────────────────────────────────────────────────────────────

#[test]
fn scenario_b_pillarbox_keeps_clear_color() {
    let mut t = TestCompositor::with_window(1000, 360);
    assert_eq!(t.transform().scale(), 0.75);
    assert_eq!(t.transform().offset(), (260.0, 0.0));

    t.add_element(window(1, "A", Point::new(0, 0), Empty));
    t.frame();

    // Pillarbox columns stay black; the window's fill starts at x = 260.
    t.assert_region_uniform(Rectangle::new(Point::zero(), Size::new(260, 360)), Rgb888::BLACK)
        .unwrap();
    t.assert_region_uniform(Rectangle::new(Point::new(740, 0), Size::new(260, 360)), Rgb888::BLACK)
        .unwrap();
    t.assert_region_contains(Rectangle::new(Point::new(260, 0), Size::new(150, 112)), Rgb888::new(0x20, 0x22, 0x28))
        .unwrap();
}

// ── Scenario C ──────────────────────────────────────────────────────────────

#[test]
fn scenario_c_activation_order() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.add_element(window(2, "B", Point::new(100, 100), Empty));
    t.frame();
    t.assert_draw_order(&["A", "B"]).unwrap();

    // A's content, clear of B
    let signals = t.click_logical(Point::new(60, 120));
    assert_eq!(signals, vec![UiSignal::Activated(WindowId(1))]);
    t.assert_draw_order(&["B", "A"]).unwrap();
    t.assert_topmost("A").unwrap();
}

#[test]
fn overlapping_click_only_reaches_topmost() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.add_element(window(2, "B", Point::new(100, 100), Empty));
    t.frame();

    let signals = t.click_logical(Point::new(150, 130));
    assert_eq!(signals, vec![UiSignal::Activated(WindowId(2))]);
    t.assert_topmost("B").unwrap();
}

#[test]
fn topmost_window_covers_lower_one() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.add_element(window(2, "B", Point::new(100, 100), Empty));
    t.frame();

    // B's frame border crosses A's body at logical (100, 140)
    let border = Rgb888::new(0xA0, 0xA8, 0xB8);
    t.assert_pixel(200, 280, border).unwrap();

    t.click_logical(Point::new(60, 120));
    // A on top now: its body fill replaces B's border there
    t.assert_pixel(200, 280, Rgb888::new(0x20, 0x22, 0x28)).unwrap();
}

// ── Dragging and closing ────────────────────────────────────────────────────

#[test]
fn drag_title_bar_moves_window() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.frame();

    t.drag_logical(Point::new(60, 55), Point::new(160, 155));
    assert_eq!(t.query_by_name("A").unwrap().bounds.top_left, Point::new(150, 150));

    // Dragged far past the corner: clamped to the logical screen
    t.drag_logical(Point::new(160, 155), Point::new(639, 479));
    assert_eq!(t.query_by_name("A").unwrap().bounds.top_left, Point::new(440, 330));
}

#[test]
fn close_button_hides_and_unregisters() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.frame();

    // Close button: 10×10 at (238, 52)
    let signals = t.click_logical(Point::new(243, 57));
    assert_eq!(
        signals,
        vec![UiSignal::Activated(WindowId(1)), UiSignal::Closed(WindowId(1))]
    );
    assert!(!t.query_by_name("A").unwrap().visible);
    assert!(t.zorder().is_empty());
    t.assert_not_drawn("A").unwrap();
    t.assert_region_uniform(Rectangle::new(Point::new(100, 100), Size::new(400, 300)), Rgb888::BLACK)
        .unwrap();
}

// ── Crisp text ──────────────────────────────────────────────────────────────

#[test]
fn post_scale_text_is_rasterized_at_physical_resolution() {
    let mut t = TestCompositor::new();
    t.add_element(window(1, "captioned", Point::new(0, 0), Caption));
    t.add_element(Box::new(BlurryText));
    t.frame();

    // Content area starts at logical (1, 14); text at (5, 18) → physical (10, 36)
    let crisp = Rectangle::new(Point::new(10, 36), Size::new(100, 20));
    let blurry = Rectangle::new(Point::new(600, 600), Size::new(60, 20));

    t.assert_region_contains(crisp, Rgb888::WHITE).unwrap();
    t.assert_region_contains(blurry, Rgb888::WHITE).unwrap();
    assert!(is_pixel_doubled(&t, blurry), "logical-resolution text is magnified 2×");
    assert!(!is_pixel_doubled(&t, crisp), "post-scale text has single-pixel strokes");
}

#[test]
fn native_mode_draws_unified_at_one_to_one() {
    let mut t = TestCompositor::with_config(CompositorConfig::NATIVE);
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.frame();

    assert!(!t.offscreen().is_allocated());
    // 1 px border at (50, 50), body inside
    t.assert_pixel(50, 50, Rgb888::new(0xA0, 0xA8, 0xB8)).unwrap();
    t.assert_pixel(100, 100, Rgb888::new(0x20, 0x22, 0x28)).unwrap();

    let signals = t.click_logical(Point::new(60, 120));
    assert_eq!(signals, vec![UiSignal::Activated(WindowId(1))]);
}

#[test]
fn slow_frames_are_counted_not_aborted() {
    let config = CompositorConfig {
        slow_frame_budget_ms: 0,
        ..CompositorConfig::default()
    };
    let mut t = TestCompositor::with_config(config);
    t.add_element(window(1, "A", Point::new(50, 50), Empty));
    t.frame();
    t.frame();
    assert_eq!(t.stats().frames(), 2);
    t.assert_region_contains(
        Rectangle::new(Point::new(100, 100), Size::new(400, 300)),
        Rgb888::new(0x20, 0x22, 0x28),
    )
    .unwrap();
}
