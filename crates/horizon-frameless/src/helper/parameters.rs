use std::sync::{Arc, Weak};

use horizon_frameless_core::{Point, Size};

use super::HelperInner;
use crate::params::SystemParameters;
use crate::window::{PropertyValue, TopLevelWindow, WindowFlags, WindowState};

fn on_window<T>(
    window: &Weak<dyn TopLevelWindow>,
    fallback: T,
    f: impl FnOnce(&dyn TopLevelWindow) -> T,
) -> T {
    match window.upgrade() {
        Some(window) => f(&*window),
        None => fallback,
    }
}

fn on_helper<T>(helper: &Weak<HelperInner>, fallback: T, f: impl FnOnce(&HelperInner) -> T) -> T {
    match helper.upgrade() {
        Some(helper) => f(&helper),
        None => fallback,
    }
}

impl HelperInner {
    /// Capability record for `window`, answering through weak references.
    pub(super) fn build_system_parameters(&self, window: &Arc<dyn TopLevelWindow>) -> SystemParameters {
        let w = Arc::downgrade(window);
        let h = self.self_ref.clone();

        SystemParameters {
            get_window_id: Arc::new({
                let w = w.clone();
                move || on_window(&w, None, |window| window.native_id())
            }),
            get_window_flags: Arc::new({
                let w = w.clone();
                move || on_window(&w, WindowFlags::NONE, |window| window.window_flags())
            }),
            set_window_flags: Arc::new({
                let w = w.clone();
                move |flags| on_window(&w, (), |window| window.set_window_flags(flags))
            }),
            get_window_size: Arc::new({
                let w = w.clone();
                move || on_window(&w, Size::ZERO, |window| window.size())
            }),
            set_window_size: Arc::new({
                let w = w.clone();
                move |size| on_window(&w, (), |window| window.resize(size))
            }),
            get_window_position: Arc::new({
                let w = w.clone();
                move || on_window(&w, Point::ZERO, |window| window.pos())
            }),
            set_window_position: Arc::new({
                let w = w.clone();
                move |pos| on_window(&w, (), |window| window.move_to(pos))
            }),
            get_window_screen: Arc::new({
                let w = w.clone();
                move || on_window(&w, None, |window| window.screen())
            }),
            is_window_fixed_size: Arc::new({
                let h = h.clone();
                move || on_helper(&h, false, |helper| helper.is_window_fixed_size())
            }),
            set_window_fixed_size: Arc::new({
                let h = h.clone();
                move |value| on_helper(&h, (), |helper| helper.set_window_fixed_size(value))
            }),
            get_window_state: Arc::new({
                let w = w.clone();
                move || on_window(&w, WindowState::Normal, |window| window.window_state())
            }),
            set_window_state: Arc::new({
                let w = w.clone();
                move |state| on_window(&w, (), |window| window.set_window_state(state))
            }),
            window_to_screen: Arc::new({
                let w = w.clone();
                move |pos| on_window(&w, pos, |window| window.map_to_global(pos))
            }),
            screen_to_window: Arc::new({
                let w = w.clone();
                move |pos| on_window(&w, pos, |window| window.map_from_global(pos))
            }),
            is_inside_system_buttons: Arc::new({
                let h = h.clone();
                move |pos| on_helper(&h, None, |helper| helper.is_in_system_buttons(pos))
            }),
            is_inside_title_bar_draggable_area: Arc::new({
                let h = h.clone();
                move |pos| on_helper(&h, false, |helper| helper.is_in_title_bar_draggable_area(pos))
            }),
            get_window_device_pixel_ratio: Arc::new({
                let w = w.clone();
                move || on_window(&w, 1.0, |window| window.device_pixel_ratio())
            }),
            set_system_button_state: Arc::new({
                let h = h.clone();
                move |kind, state| on_helper(&h, (), |helper| helper.set_system_button_state(kind, state))
            }),
            should_ignore_mouse_events: Arc::new({
                let h = h.clone();
                move |pos| on_helper(&h, false, |helper| helper.should_ignore_mouse_events(pos))
            }),
            show_system_menu: Arc::new({
                let h = h.clone();
                move |pos| on_helper(&h, (), |helper| helper.show_system_menu(pos))
            }),
            set_property: Arc::new({
                let h = h.clone();
                move |name: &str, value: PropertyValue| {
                    on_helper(&h, (), |helper| helper.set_property(name, value))
                }
            }),
            get_property: Arc::new({
                let h = h.clone();
                move |name: &str, default: PropertyValue| match h.upgrade() {
                    Some(helper) => helper.get_property(name, default),
                    None => default,
                }
            }),
            set_cursor: Arc::new({
                let w = w.clone();
                move |cursor| on_window(&w, (), |window| window.set_cursor(cursor))
            }),
            unset_cursor: Arc::new({
                let w = w.clone();
                move || on_window(&w, (), |window| window.unset_cursor())
            }),
            force_children_repaint: Arc::new(move |delay| {
                on_helper(&h, (), |helper| helper.repaint_all_children(delay))
            }),
        }
    }
}
