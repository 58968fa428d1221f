//! Per-window state store.
//!
//! Every native window that has been extended into its title bar owns one
//! [`WindowData`] record, shared by every helper instance attached to that
//! window. Records are keyed by [`WindowIdentity`] and created lazily on
//! first access, by reads as well as writes.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_frameless_core::Rect;
use horizon_frameless_core::logging::targets;
use parking_lot::Mutex;

use crate::buttons::SystemButtons;
use crate::params::SystemParameters;
use crate::widget::WidgetHandle;
use crate::window::WindowIdentity;

/// Shared per-window state.
#[derive(Clone, Default)]
pub struct WindowData {
    /// The window has been registered with the frameless manager.
    pub ready: bool,
    /// Capability record handed to the manager at registration.
    pub params: Option<SystemParameters>,
    /// The widget acting as title bar.
    pub title_bar_widget: Option<WidgetHandle>,
    /// Widgets inside the title bar that receive pointer input normally.
    pub hit_test_visible_widgets: Vec<WidgetHandle>,
    /// Raw rectangles (window coordinates) excluded from the draggable area.
    pub hit_test_visible_rects: Vec<Rect>,
    pub system_buttons: SystemButtons,
}

impl std::fmt::Debug for WindowData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowData")
            .field("ready", &self.ready)
            .field("has_params", &self.params.is_some())
            .field("title_bar_widget", &self.title_bar_widget)
            .field("hit_test_visible_widgets", &self.hit_test_visible_widgets)
            .field("hit_test_visible_rects", &self.hit_test_visible_rects)
            .field("system_buttons", &self.system_buttons)
            .finish()
    }
}

/// Map from window identity to [`WindowData`].
#[derive(Default)]
pub struct WindowStateStore {
    entries: Mutex<HashMap<WindowIdentity, Arc<WindowData>>>,
}

impl WindowStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the record for `id`, creating an empty one if absent.
    ///
    /// Callers inspect the snapshot without holding the store lock, so host
    /// widget callbacks made while hit-testing may freely re-enter the store.
    /// Snapshots are shared; the record is only copied when it is mutated
    /// while a snapshot is still alive.
    pub fn get(&self, id: WindowIdentity) -> Arc<WindowData> {
        self.entries.lock().entry(id).or_default().clone()
    }

    /// Read the record for `id` in place, creating an empty one if absent.
    ///
    /// The store is locked while `f` runs; `f` must not call back into host
    /// widgets or the store.
    pub fn with<R>(&self, id: WindowIdentity, f: impl FnOnce(&WindowData) -> R) -> R {
        let mut entries = self.entries.lock();
        f(entries.entry(id).or_default())
    }

    /// Mutate the record for `id`, creating an empty one if absent.
    pub fn with_mut<R>(&self, id: WindowIdentity, f: impl FnOnce(&mut WindowData) -> R) -> R {
        let mut entries = self.entries.lock();
        f(Arc::make_mut(entries.entry(id).or_default()))
    }

    /// Whether a record exists, without creating one.
    pub fn contains(&self, id: WindowIdentity) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Remove the record for `id`. Returns whether one existed.
    pub fn erase(&self, id: WindowIdentity) -> bool {
        let removed = self.entries.lock().remove(&id).is_some();
        tracing::trace!(target: targets::STORE, %id, removed, "erased window state");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for WindowStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowStateStore")
            .field("windows", &self.entries.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(WindowStateStore: Send, Sync);
