use std::sync::Arc;
use std::time::Duration;

use horizon_frameless_core::logging::targets;
use horizon_frameless_core::{Color, Point, Size};
use winit::window::ResizeDirection;

use super::{HelperInner, HelperSignal};
use crate::backdrop::SharedHelper;
use crate::config::FramelessOption;
use crate::platform::BlurMode;
use crate::widget::SizePolicyPair;
use crate::window::{Edges, PropertyValue, TopLevelWindow, WindowFlags, WindowState};

/// Minimum size restored when a window stops being fixed-size.
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(160.0, 160.0);

/// Maximum size restored when a window stops being fixed-size.
pub const MAX_WINDOW_SIZE: Size = Size::new(16_777_215.0, 16_777_215.0);

fn is_widget_fixed_size(window: &dyn TopLevelWindow) -> bool {
    if window.window_flags().has(WindowFlags::FIXED_SIZE_DIALOG_HINT) {
        return true;
    }
    let min = window.minimum_size();
    let max = window.maximum_size();
    if !min.is_empty() && !max.is_empty() && min == max {
        return true;
    }
    window.size_policy().is_fixed()
}

impl HelperInner {
    // ========================================================================
    // Fixed size
    // ========================================================================

    pub(crate) fn is_window_fixed_size(&self) -> bool {
        self.bound()
            .is_some_and(|(window, _)| is_widget_fixed_size(&*window))
    }

    pub(crate) fn set_window_fixed_size(&self, value: bool) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        if is_widget_fixed_size(&*window) == value {
            tracing::trace!(target: targets::HELPER, value, "fixed size unchanged");
            return;
        }

        if value {
            self.record.lock().saved_size_policy = window.size_policy();
            window.set_size_policy(SizePolicyPair::FIXED);
            window.set_fixed_size(window.size());
        } else {
            let saved = self.record.lock().saved_size_policy;
            window.set_size_policy(saved);
            window.set_minimum_size(DEFAULT_WINDOW_SIZE);
            window.set_maximum_size(MAX_WINDOW_SIZE);
        }

        if let Err(error) = self.context.platform().set_aero_snapping_enabled(id, !value) {
            if error.is_unsupported() {
                tracing::debug!(target: targets::HELPER, %id, "edge snapping not supported");
            } else {
                tracing::warn!(target: targets::HELPER, %id, %error, "failed to toggle edge snapping");
            }
        }
        self.emit_for_all_instances(HelperSignal::WindowFixedSizeChanged);
    }

    // ========================================================================
    // Blur
    // ========================================================================

    pub(crate) fn is_blur_behind_window_enabled(&self) -> bool {
        self.record.lock().blur_enabled
    }

    pub(crate) fn set_blur_behind_window_enabled(&self, enable: bool, tint: Option<Color>) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        if self.is_blur_behind_window_enabled() == enable {
            return;
        }

        let config = self.context.config();
        let platform = self.context.platform();
        if platform.is_blur_behind_window_supported()
            && !config.is_set(FramelessOption::ForceNonNativeBackgroundBlur)
        {
            if enable {
                self.record.lock().saved_background = Some(window.background_color());
                window.set_background_color(Color::TRANSPARENT);
            } else {
                self.restore_background(&*window);
            }

            let mode = if enable {
                BlurMode::Default
            } else {
                BlurMode::Disable
            };
            match platform.set_blur_behind_window_enabled(id, mode, tint) {
                Ok(()) => {
                    self.record.lock().blur_enabled = enable;
                    self.emit_for_all_instances(HelperSignal::BlurBehindWindowEnabledChanged);
                }
                Err(error) => {
                    tracing::warn!(target: targets::HELPER, %id, %error, "failed to toggle native blur");
                    if enable {
                        self.restore_background(&*window);
                    }
                }
            }
            return;
        }

        if config.is_set(FramelessOption::ForceNativeBackgroundBlur) {
            tracing::debug!(target: targets::HELPER, %id, "native blur forced but unavailable");
            return;
        }

        let Some(backdrop) = self.resolve_shared_helper(&window) else {
            tracing::debug!(target: targets::HELPER, %id, "blur behind window not supported");
            return;
        };
        backdrop.set_mica_enabled(enable);
        self.record.lock().blur_enabled = enable;
        self.emit_for_all_instances(HelperSignal::BlurBehindWindowEnabledChanged);
    }

    fn restore_background(&self, window: &dyn TopLevelWindow) {
        let saved = self.record.lock().saved_background.take();
        if let Some(color) = saved {
            window.set_background_color(color);
        }
    }

    fn resolve_shared_helper(&self, window: &Arc<dyn TopLevelWindow>) -> Option<Arc<dyn SharedHelper>> {
        let cached = self.record.lock().shared_helper.clone();
        if cached.is_some() {
            return cached;
        }
        let created = self.context.find_or_create_shared_helper(window)?;
        self.record.lock().shared_helper = Some(created.clone());
        Some(created)
    }

    pub(crate) fn shared_helper(&self) -> Option<Arc<dyn SharedHelper>> {
        let (window, _) = self.bound()?;
        self.resolve_shared_helper(&window)
    }

    // ========================================================================
    // Window operations
    // ========================================================================

    pub(crate) fn show_system_menu(&self, pos: Point) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        let Some(params) = self.context.store().with(id, |data| data.params.clone()) else {
            return;
        };
        let platform = self.context.platform();
        let native_pos = platform.to_native_global_position(&*window, pos);
        if let Err(error) = platform.show_system_menu(id, native_pos, &params) {
            tracing::debug!(target: targets::HELPER, %id, %error, "system menu not shown");
        }
    }

    pub(crate) fn window_start_system_move2(&self, pos: Point) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        if let Err(error) = self.context.platform().start_system_move(&*window, pos) {
            tracing::debug!(target: targets::HELPER, %id, %error, "system move not started");
        }
    }

    pub(crate) fn window_start_system_resize2(&self, edges: Edges, pos: Point) {
        let Some(direction) = edges.to_resize_direction() else {
            tracing::trace!(target: targets::HELPER, ?edges, "no resize direction");
            return;
        };
        self.window_start_system_resize(direction, pos);
    }

    pub(crate) fn window_start_system_resize(&self, direction: ResizeDirection, pos: Point) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        if let Err(error) = self
            .context
            .platform()
            .start_system_resize(&*window, direction, pos)
        {
            tracing::debug!(target: targets::HELPER, %id, %error, "system resize not started");
        }
    }

    pub(crate) fn move_window_to_desktop_center(&self) {
        let Some((_, id)) = self.bound() else {
            return;
        };
        let Some(params) = self.context.store().with(id, |data| data.params.clone()) else {
            return;
        };
        self.context
            .platform()
            .move_window_to_desktop_center(&params, true);
    }

    pub(crate) fn bring_window_to_front(&self) {
        let Some((window, id)) = self.bound() else {
            return;
        };
        match self.context.platform().bring_window_to_front(&*window) {
            Ok(()) => {}
            Err(error) => {
                tracing::trace!(target: targets::HELPER, %id, %error, "falling back to toolkit activation");
                if window.is_hidden() {
                    window.show();
                }
                if window.window_state().is_minimized() {
                    window.set_window_state(WindowState::Normal);
                }
                window.raise();
                window.activate_window();
            }
        }
    }

    // ========================================================================
    // Properties and repaint
    // ========================================================================

    pub(crate) fn set_property(&self, name: &str, value: PropertyValue) {
        if name.is_empty() {
            return;
        }
        if let Some((window, _)) = self.bound() {
            window.set_property(name, value);
        }
    }

    pub(crate) fn get_property(&self, name: &str, default: PropertyValue) -> PropertyValue {
        if name.is_empty() {
            return default;
        }
        self.bound()
            .and_then(|(window, _)| window.property(name))
            .unwrap_or(default)
    }

    pub(crate) fn repaint_all_children(&self, delay: Duration) {
        let Some((window, _)) = self.bound() else {
            return;
        };
        let platform = self.context.platform().clone();
        let window = Arc::downgrade(&window);
        let repaint = move || {
            let Some(window) = window.upgrade() else {
                return;
            };
            window.request_repaint();
            if let Err(error) = platform.update_internal_window_frame_margins(&*window, true) {
                tracing::trace!(target: targets::HELPER, %error, "frame margins not updated");
            }
            for child in window.descendants() {
                child.request_repaint();
            }
        };

        if delay.is_zero() {
            repaint();
        } else {
            self.context.event_loop().single_shot(delay, repaint);
        }
    }
}
