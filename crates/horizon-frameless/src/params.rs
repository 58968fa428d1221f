//! The capability record handed to the frameless window manager.
//!
//! [`SystemParameters`] is the only surface the platform layer uses to talk
//! back to the toolkit: a set of closures bound to one window at attach time.
//! Every closure holds weak references, so a record that outlives its window
//! or helper degrades to neutral answers instead of touching freed state.

use std::sync::Arc;
use std::time::Duration;

use cursor_icon::CursorIcon;
use horizon_frameless_core::{Point, Size};

use crate::buttons::{ButtonState, SystemButtonType};
use crate::window::{PropertyValue, ScreenInfo, WindowFlags, WindowIdentity, WindowState};

pub type Getter<T> = Arc<dyn Fn() -> T + Send + Sync>;
pub type Setter<T> = Arc<dyn Fn(T) + Send + Sync>;
pub type PointQuery<T> = Arc<dyn Fn(Point) -> T + Send + Sync>;

/// Window capabilities exposed to the platform layer.
#[derive(Clone)]
pub struct SystemParameters {
    pub get_window_id: Getter<Option<WindowIdentity>>,
    pub get_window_flags: Getter<WindowFlags>,
    pub set_window_flags: Setter<WindowFlags>,
    pub get_window_size: Getter<Size>,
    pub set_window_size: Setter<Size>,
    pub get_window_position: Getter<Point>,
    pub set_window_position: Setter<Point>,
    pub get_window_screen: Getter<Option<ScreenInfo>>,
    pub is_window_fixed_size: Getter<bool>,
    pub set_window_fixed_size: Setter<bool>,
    pub get_window_state: Getter<WindowState>,
    pub set_window_state: Setter<WindowState>,
    /// Window-local point to desktop coordinates.
    pub window_to_screen: PointQuery<Point>,
    /// Desktop point to window-local coordinates.
    pub screen_to_window: PointQuery<Point>,
    pub is_inside_system_buttons: PointQuery<Option<SystemButtonType>>,
    pub is_inside_title_bar_draggable_area: PointQuery<bool>,
    pub get_window_device_pixel_ratio: Getter<f64>,
    pub set_system_button_state: Arc<dyn Fn(SystemButtonType, ButtonState) + Send + Sync>,
    pub should_ignore_mouse_events: PointQuery<bool>,
    /// Show the native system menu at a window-local point.
    pub show_system_menu: Setter<Point>,
    pub set_property: Arc<dyn Fn(&str, PropertyValue) + Send + Sync>,
    /// Read a named property, falling back to the supplied default.
    pub get_property: Arc<dyn Fn(&str, PropertyValue) -> PropertyValue + Send + Sync>,
    pub set_cursor: Setter<CursorIcon>,
    pub unset_cursor: Getter<()>,
    /// Repaint the window and its children after the given delay.
    pub force_children_repaint: Setter<Duration>,
}

impl SystemParameters {
    /// Whether the bound window still exists and has a native handle.
    pub fn is_alive(&self) -> bool {
        (self.get_window_id)().is_some()
    }
}

impl std::fmt::Debug for SystemParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemParameters")
            .field("window_id", &(self.get_window_id)())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(SystemParameters: Send, Sync, Clone);
