//! Scrolling text log shown in a floating window

use std::collections::VecDeque;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{Canvas, DrawError, FloatingWindow, WindowContent, WindowId};
use lumen_scale::ScaleTransform;

/// Logical line pitch
pub const LINE_HEIGHT: u32 = 12;

const MARGIN: i32 = 3;

/// Window body showing the most recent lines that fit
#[derive(Debug, Clone)]
pub struct TextWindow {
    lines: VecDeque<String>,
    capacity: usize,
    color: Rgb888,
}

impl TextWindow {
    /// Empty log keeping at most `capacity` lines
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            color: Rgb888::new(0xD0, 0xD0, 0xD0),
        }
    }

    /// Floating window with this content
    pub fn window(
        id: WindowId,
        name: impl Into<String>,
        bounds: Rectangle,
        capacity: usize,
    ) -> FloatingWindow<Self> {
        FloatingWindow::new(id, name, bounds, Self::new(capacity))
    }

    /// Set text colour
    pub fn with_color(mut self, color: Rgb888) -> Self {
        self.color = color;
        self
    }

    /// Append a line, dropping the oldest beyond capacity
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Remove all lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Stored lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Lines shown in `area`, oldest first (the tail of the log)
    pub fn visible_lines(&self, area: Rectangle) -> impl Iterator<Item = &str> {
        let rows = area.size.height.saturating_sub(2).checked_div(LINE_HEIGHT).unwrap_or(0);
        let rows = usize::try_from(rows).unwrap_or(usize::MAX);
        let skip = self.lines.len().saturating_sub(rows);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}

impl WindowContent for TextWindow {
    fn draw_fills<D: Canvas>(&self, _target: &mut D, _area: Rectangle) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_borders_and_text<D: Canvas>(
        &self,
        target: &mut D,
        area: Rectangle,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        let mut origin = paint::offset(area.top_left, MARGIN, 2);
        let pitch = i32::try_from(LINE_HEIGHT).unwrap_or(i32::MAX);
        for line in self.visible_lines(area) {
            paint::draw_text_scaled(
                target,
                line,
                origin,
                paint::BASE_TEXT_HEIGHT,
                transform,
                self.color,
            )?;
            origin.y = origin.y.saturating_add(pitch);
        }
        Ok(())
    }
}
