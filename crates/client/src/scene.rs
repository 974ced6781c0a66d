//! Demo scene: toolbar, event log window, track list window

use std::cell::RefCell;
use std::rc::Rc;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::{
    Canvas, Compositor, DrawError, FloatingWindow, PointerResponse, UiSignal, UpdateContext,
    WindowContent, WindowId,
};
use lumen_scale::ScaleTransform;
use lumen_widgets::prelude::*;

pub const LOG_WINDOW: WindowId = WindowId(1);
pub const TRACKS_WINDOW: WindowId = WindowId(2);

const TRACKS: [&str; 6] = [
    "Intro",
    "Low Tide",
    "Glass Harbour",
    "Signal Fire",
    "North Light",
    "Outro",
];

/// Text log shared between the scene and its floating window
#[derive(Clone)]
pub struct EventLog(Rc<RefCell<TextWindow>>);

impl EventLog {
    fn new(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(TextWindow::new(capacity))))
    }

    pub fn push(&self, line: impl Into<String>) {
        self.0.borrow_mut().push_line(line);
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl WindowContent for EventLog {
    fn draw_fills<D: Canvas>(&self, target: &mut D, area: Rectangle) -> Result<(), DrawError> {
        self.0.borrow().draw_fills(target, area)
    }

    fn draw_borders_and_text<D: Canvas>(
        &self,
        target: &mut D,
        area: Rectangle,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        self.0.borrow().draw_borders_and_text(target, area, transform)
    }

    fn update(&mut self, area: Rectangle, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        self.0.borrow_mut().update(area, ctx)
    }
}

/// Elements owned by the compositor plus the handles the client keeps
pub struct Scene {
    log: EventLog,
}

impl Scene {
    /// Populate `compositor` with the demo elements
    pub fn build(compositor: &mut Compositor) -> Self {
        let log = EventLog::new(64);
        let scaling = compositor.config().scaling_enabled;

        let toolbar = Panel::new("toolbar", Rectangle::new(Point::zero(), Size::new(640, 32)))
            .key(10)
            .with_child(Button::new("show_log", "Log", Point::new(6, 7)).style(ButtonStyle::primary()))
            .with_child(Button::new("show_tracks", "Tracks", Point::new(60, 7)))
            .with_child(Button::new("clear", "Clear", Point::new(136, 7)).style(ButtonStyle::text()))
            .with_child(Checkbox::new("scaling", "Crisp", Point::new(210, 11)).checked(scaling))
            .with_child(Label::new("status", "Ready", Point::new(300, 11)));
        compositor.add_element(Box::new(toolbar));

        let log_window = FloatingWindow::new(
            LOG_WINDOW,
            "log",
            Rectangle::new(Point::new(24, 56), Size::new(300, 180)),
            log.clone(),
        )
        .with_title("Events")
        .shown();
        compositor.add_element(Box::new(log_window));

        let tracks = ListWindow::window(
            TRACKS_WINDOW,
            "tracks",
            Rectangle::new(Point::new(260, 140), Size::new(220, 110)),
            TRACKS,
        )
        .with_title("Tracks")
        .shown();
        compositor.add_element(Box::new(tracks));

        log.push("lumen ready");
        Self { log }
    }

    /// Apply this frame's signals and record them in the event log
    pub fn handle(&mut self, compositor: &mut Compositor, signals: &[UiSignal]) {
        for signal in signals {
            let line = describe(signal);
            tracing::debug!(signal = %line, "ui signal");

            match *signal {
                UiSignal::Clicked("show_log") => {
                    compositor.set_visible("log", true);
                }
                UiSignal::Clicked("show_tracks") => {
                    compositor.set_visible("tracks", true);
                }
                UiSignal::Clicked("clear") => {
                    self.log.clear();
                    continue;
                }
                UiSignal::Toggled("scaling", enabled) => {
                    compositor.set_scaling_enabled(enabled);
                }
                _ => {}
            }
            self.log.push(line);
        }
    }
}

fn describe(signal: &UiSignal) -> String {
    match signal {
        UiSignal::Activated(id) => format!("activated {id}"),
        UiSignal::Shown(id) => format!("shown {id}"),
        UiSignal::Closed(id) => format!("closed {id}"),
        UiSignal::Clicked(name) => format!("clicked {name}"),
        UiSignal::Toggled(name, on) => format!("{name} {}", if *on { "on" } else { "off" }),
    }
}
