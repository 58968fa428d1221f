//! Mapping widget geometry into window coordinates.

use horizon_frameless_core::{Point, Rect};

use crate::widget::Widget;
use crate::window::TopLevelWindow;

/// Offset of `widget`'s origin inside `window`.
///
/// Walks the parent chain summing parent-relative positions until the window
/// is reached. Returns `None` when the widget is not contained in the window.
pub fn widget_origin_in_window(widget: &dyn Widget, window: &dyn TopLevelWindow) -> Option<Point> {
    let target = window.widget_id();
    if widget.widget_id() == target {
        return Some(Point::ZERO);
    }

    let mut origin = widget.pos();
    let mut parent = widget.parent_widget();
    while let Some(current) = parent {
        if current.widget_id() == target {
            return Some(origin);
        }
        origin += current.pos();
        parent = current.parent_widget();
    }
    None
}

/// The widget's rectangle in `window` coordinates.
///
/// Widgets outside the window map to [`Rect::ZERO`], which is empty and
/// therefore excluded from every hit-test.
pub fn map_widget_geometry(widget: &dyn Widget, window: &dyn TopLevelWindow) -> Rect {
    match widget_origin_in_window(widget, window) {
        Some(origin) => Rect::from_origin_size(origin, widget.size()),
        None => Rect::ZERO,
    }
}

/// The window's own client rectangle, anchored at the origin.
pub fn window_rect(window: &dyn TopLevelWindow) -> Rect {
    Rect::from_origin_size(Point::ZERO, window.size())
}
