use std::sync::Arc;

use horizon_frameless_core::logging::targets;
use horizon_frameless_core::{Point, Rect};

use super::{HelperInner, HelperSignal};
use crate::buttons::{ButtonState, SystemButtonType, locate_system_button};
use crate::config::FramelessOption;
use crate::hit_test::is_in_draggable_area;
use crate::synthesizer::synthesize_button_state;
use crate::widget::{Widget, WidgetHandle};

// ============================================================================
// Registration
// ============================================================================

impl HelperInner {
    pub(crate) fn title_bar_widget(&self) -> Option<Arc<dyn Widget>> {
        let (_, id) = self.bound()?;
        self.context
            .store()
            .with(id, |data| data.title_bar_widget.clone())?
            .upgrade()
    }

    pub(crate) fn set_title_bar_widget(&self, widget: &Arc<dyn Widget>) {
        let Some((_, id)) = self.bound() else {
            tracing::debug!(target: targets::HELPER, "not attached; title bar widget ignored");
            return;
        };
        let handle = WidgetHandle::new(widget);
        let changed = self.context.store().with_mut(id, |data| {
            if data.title_bar_widget.as_ref() == Some(&handle) {
                return false;
            }
            data.title_bar_widget = Some(handle);
            true
        });
        if changed {
            self.emit_for_all_instances(HelperSignal::TitleBarWidgetChanged);
        }
    }

    pub(crate) fn set_system_button(&self, widget: &Arc<dyn Widget>, kind: SystemButtonType) {
        let Some((_, id)) = self.bound() else {
            tracing::debug!(target: targets::HELPER, ?kind, "not attached; system button ignored");
            return;
        };
        let handle = WidgetHandle::new(widget);
        self.context
            .store()
            .with_mut(id, |data| data.system_buttons.set(kind.slot_kind(), handle));
    }

    pub(crate) fn set_hit_test_visible(&self, widget: &Arc<dyn Widget>, visible: bool) {
        let Some((_, id)) = self.bound() else {
            return;
        };
        let handle = WidgetHandle::new(widget);
        self.context.store().with_mut(id, |data| {
            let widgets = &mut data.hit_test_visible_widgets;
            if visible {
                widgets.push(handle);
            } else {
                widgets.retain(|existing| *existing != handle);
            }
        });
    }

    pub(crate) fn set_hit_test_visible_rect(&self, rect: Rect, visible: bool) {
        if !rect.is_valid() {
            tracing::debug!(target: targets::HELPER, ?rect, "invalid hit-test rectangle ignored");
            return;
        }
        let Some((_, id)) = self.bound() else {
            return;
        };
        self.context.store().with_mut(id, |data| {
            let rects = &mut data.hit_test_visible_rects;
            if visible {
                rects.push(rect);
            } else {
                rects.retain(|existing| *existing != rect);
            }
        });
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub(crate) fn is_in_system_buttons(&self, pos: Point) -> Option<SystemButtonType> {
        let (window, id) = self.bound()?;
        let data = self.context.store().get(id);
        locate_system_button(&data.system_buttons, &*window, pos)
    }

    pub(crate) fn is_in_title_bar_draggable_area(&self, pos: Point) -> bool {
        let Some((window, id)) = self.bound() else {
            return false;
        };
        let data = self.context.store().get(id);
        is_in_draggable_area(&data, &*window, pos)
    }

    pub(crate) fn should_ignore_mouse_events(&self, pos: Point) -> bool {
        let Some((window, _)) = self.bound() else {
            return false;
        };
        let config = self.context.config();
        let border = config.resize_border_thickness();
        let frame_border_visible = (self.context.platform().is_window_frame_border_visible()
            || config.is_set(FramelessOption::ForceShowWindowFrameBorder))
            && !config.is_set(FramelessOption::ForceHideWindowFrameBorder);

        let within_border = pos.y < border
            || (!frame_border_visible
                && (pos.x < border || pos.x >= window.size().width - border));
        window.window_state().is_normal() && within_border
    }

    pub(crate) fn set_system_button_state(&self, kind: SystemButtonType, state: ButtonState) {
        let Some((_, id)) = self.bound() else {
            return;
        };
        let button = self
            .context
            .store()
            .with(id, |data| data.system_buttons.get(kind.slot_kind()).cloned())
            .and_then(|handle| handle.upgrade());
        let Some(button) = button else {
            tracing::trace!(target: targets::HELPER, ?kind, "no button registered for state change");
            return;
        };
        synthesize_button_state(&*button, state, &**self.context.platform());
    }
}
