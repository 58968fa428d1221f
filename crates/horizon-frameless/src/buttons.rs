//! System button registry and locator.
//!
//! A frameless window draws its own window-icon, help, minimize, maximize
//! and close buttons. The helper keeps one weak slot per button kind and,
//! for a point in window coordinates, reports which button (if any) is under
//! it, checking in a fixed priority order so overlapping buttons resolve
//! deterministically.

use std::sync::Arc;

use horizon_frameless_core::Point;
use horizon_frameless_core::logging::targets;

use crate::geometry::map_widget_geometry;
use crate::widget::{Widget, WidgetHandle};
use crate::window::TopLevelWindow;

/// Kinds of system buttons.
///
/// `Restore` shares the maximize slot: a maximize/restore toggle is a single
/// widget whose role depends on the window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemButtonType {
    WindowIcon,
    Help,
    Minimize,
    Maximize,
    Restore,
    Close,
}

impl SystemButtonType {
    /// Hit-test order. Earlier kinds win when button rectangles overlap.
    pub const PRIORITY: [SystemButtonType; 5] = [
        SystemButtonType::WindowIcon,
        SystemButtonType::Help,
        SystemButtonType::Minimize,
        SystemButtonType::Maximize,
        SystemButtonType::Close,
    ];

    /// The kind whose slot stores this button.
    pub fn slot_kind(self) -> SystemButtonType {
        match self {
            SystemButtonType::Restore => SystemButtonType::Maximize,
            other => other,
        }
    }

    fn slot(self) -> usize {
        match self.slot_kind() {
            SystemButtonType::WindowIcon => 0,
            SystemButtonType::Help => 1,
            SystemButtonType::Minimize => 2,
            SystemButtonType::Maximize | SystemButtonType::Restore => 3,
            SystemButtonType::Close => 4,
        }
    }
}

/// Visual interaction state requested for a system button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Pointer left the button.
    #[default]
    Normal,
    /// Pointer entered the button.
    Hovered,
    Pressed,
    Released,
}

/// Weak references to the registered system buttons of one window.
#[derive(Debug, Clone, Default)]
pub struct SystemButtons {
    slots: [Option<WidgetHandle>; 5],
}

impl SystemButtons {
    pub fn get(&self, kind: SystemButtonType) -> Option<&WidgetHandle> {
        self.slots[kind.slot()].as_ref()
    }

    /// Register `button` for `kind`, replacing any previous registration.
    pub fn set(&mut self, kind: SystemButtonType, button: WidgetHandle) {
        self.slots[kind.slot()] = Some(button);
    }

    pub fn clear(&mut self, kind: SystemButtonType) {
        self.slots[kind.slot()] = None;
    }

    /// The live, visible and enabled button registered for `kind`.
    pub fn interactive(&self, kind: SystemButtonType) -> Option<Arc<dyn Widget>> {
        self.get(kind).and_then(WidgetHandle::upgrade_interactive)
    }

    /// Registered buttons in hit-test priority order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemButtonType, &WidgetHandle)> {
        SystemButtonType::PRIORITY
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|handle| (kind, handle)))
    }

    /// Whether `widget` is registered in any slot.
    pub fn contains(&self, widget: &WidgetHandle) -> bool {
        self.slots.iter().flatten().any(|handle| handle == widget)
    }
}

/// Which system button contains `point` (window coordinates), if any.
///
/// Stale, hidden and disabled buttons are skipped. The first match in
/// [`SystemButtonType::PRIORITY`] order wins.
pub fn locate_system_button(
    buttons: &SystemButtons,
    window: &dyn TopLevelWindow,
    point: Point,
) -> Option<SystemButtonType> {
    let found = SystemButtonType::PRIORITY.into_iter().find(|&kind| {
        buttons
            .interactive(kind)
            .is_some_and(|button| map_widget_geometry(&*button, window).contains(point))
    });
    tracing::trace!(target: targets::HIT_TEST, ?point, ?found, "system button lookup");
    found
}
