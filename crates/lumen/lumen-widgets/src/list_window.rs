//! Selectable list shown in a floating window

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use lumen_compositor::paint;
use lumen_compositor::{
    Canvas, DrawError, FloatingWindow, PointerResponse, UpdateContext, WindowContent,
    WindowId,
};
use lumen_scale::ScaleTransform;

/// Logical row height
pub const ROW_HEIGHT: u32 = 14;

/// Window body listing items; a press on a row selects it
#[derive(Debug, Clone)]
pub struct ListWindow {
    items: Vec<String>,
    selected: Option<usize>,
    text: Rgb888,
    highlight: Rgb888,
    separator: Rgb888,
}

impl ListWindow {
    /// List with no selection
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            selected: None,
            text: Rgb888::new(0xE0, 0xE0, 0xE0),
            highlight: Rgb888::new(0x38, 0x60, 0xA0),
            separator: Rgb888::new(0x48, 0x4C, 0x58),
        }
    }

    /// Floating window with this content
    pub fn window<I, S>(id: WindowId, name: impl Into<String>, bounds: Rectangle, items: I) -> FloatingWindow<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FloatingWindow::new(id, name, bounds, Self::new(items))
    }

    /// Items, top to bottom
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the selected row
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Text of the selected row
    pub fn selected_item(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    /// Select a row; out-of-range indices clear the selection
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.items.len());
    }

    /// Logical rectangle of `row` inside `area`, if the row is on screen
    pub fn row_rect(&self, area: Rectangle, row: usize) -> Option<Rectangle> {
        let row = u32::try_from(row).ok()?;
        let top = row.checked_mul(ROW_HEIGHT)?;
        if top.checked_add(ROW_HEIGHT)? > area.size.height {
            return None;
        }
        let y = area.top_left.y.checked_add_unsigned(top)?;
        Some(Rectangle::new(
            Point::new(area.top_left.x, y),
            Size::new(area.size.width, ROW_HEIGHT),
        ))
    }

    /// Row under a logical point
    pub fn row_at(&self, area: Rectangle, point: Point) -> Option<usize> {
        if !area.contains(point) {
            return None;
        }
        let dy = u32::try_from(point.y.checked_sub(area.top_left.y)?).ok()?;
        let row = usize::try_from(dy.checked_div(ROW_HEIGHT)?).ok()?;
        (row < self.items.len() && self.row_rect(area, row).is_some()).then_some(row)
    }

    fn visible_rows(&self, area: Rectangle) -> impl Iterator<Item = (usize, Rectangle, &str)> {
        self.items
            .iter()
            .enumerate()
            .map_while(move |(i, item)| self.row_rect(area, i).map(|r| (i, r, item.as_str())))
    }
}

impl WindowContent for ListWindow {
    fn draw_fills<D: Canvas>(&self, target: &mut D, area: Rectangle) -> Result<(), DrawError> {
        if let Some(rect) = self.selected.and_then(|i| self.row_rect(area, i)) {
            paint::fill_rect(target, rect, self.highlight)?;
        }
        Ok(())
    }

    fn draw_borders_and_text<D: Canvas>(
        &self,
        target: &mut D,
        area: Rectangle,
        transform: &ScaleTransform,
    ) -> Result<(), DrawError> {
        for (_, rect, item) in self.visible_rows(area) {
            paint::draw_text_scaled(
                target,
                item,
                paint::offset(rect.top_left, 4, 2),
                paint::BASE_TEXT_HEIGHT,
                transform,
                self.text,
            )?;
            if let Some(bottom) = rect.bottom_right() {
                let line = Rectangle::new(
                    Point::new(rect.top_left.x, bottom.y),
                    Size::new(rect.size.width, 1),
                );
                paint::stroke_rect_scaled(target, line, transform, self.separator, 1)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, area: Rectangle, ctx: &mut UpdateContext<'_>) -> PointerResponse {
        if !ctx.pointer.pressed_in(&area) {
            return PointerResponse::Ignored;
        }
        if let Some(row) = self.row_at(area, ctx.pointer.position) {
            self.selected = Some(row);
            tracing::debug!(row, "list row selected");
        }
        PointerResponse::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_compositor::Framebuffer;
    use lumen_scale::LogicalPointer;

    fn area() -> Rectangle {
        Rectangle::new(Point::new(10, 20), Size::new(100, 50))
    }

    fn list() -> ListWindow {
        ListWindow::new(["alpha", "beta", "gamma", "delta"])
    }

    #[test]
    fn test_row_geometry() {
        let list = list();
        assert_eq!(
            list.row_rect(area(), 1),
            Some(Rectangle::new(Point::new(10, 34), Size::new(100, 14)))
        );
        // 50 / 14 = 3 full rows fit
        assert!(list.row_rect(area(), 3).is_none());
    }

    #[test]
    fn test_row_at() {
        let list = list();
        assert_eq!(list.row_at(area(), Point::new(20, 20)), Some(0));
        assert_eq!(list.row_at(area(), Point::new(20, 47)), Some(1));
        assert_eq!(list.row_at(area(), Point::new(20, 65)), None);
        assert_eq!(list.row_at(area(), Point::new(5, 25)), None);
    }

    #[test]
    fn test_press_selects_row() {
        let mut list = list();
        let mut signals = Vec::new();
        let pointer = LogicalPointer {
            position: Point::new(20, 50),
            pressed: true,
            just_pressed: true,
            just_released: false,
            captured: false,
        };
        let mut ctx = UpdateContext::new(pointer, Size::new(640, 480), &mut signals);
        assert_eq!(list.update(area(), &mut ctx), PointerResponse::Consumed);
        assert_eq!(list.selected_item(), Some("gamma"));
    }

    #[test]
    fn test_select_out_of_range_clears() {
        let mut list = list();
        list.select(Some(1));
        assert_eq!(list.selected(), Some(1));
        list.select(Some(9));
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_highlight_fill() {
        let mut list = list();
        list.select(Some(0));
        let mut fb = Framebuffer::new(120, 80);
        list.draw_fills(&mut fb, area()).unwrap();
        assert_eq!(fb.get_pixel(50, 25), Some(Rgb888::new(0x38, 0x60, 0xA0)));
        assert_eq!(fb.get_pixel(50, 40), Some(Rgb888::new(0, 0, 0)));
    }
}
