//! Synthesized pointer events for system buttons.
//!
//! When the platform layer handles pointer input in the non-client area
//! itself, the toolkit's buttons never see the pointer. The platform layer
//! then asks the helper to put a button into a given [`ButtonState`], and the
//! helper builds a [`SyntheticMouseEvent`] from the current cursor position
//! and hands it to the button.

use horizon_frameless_core::Point;
use horizon_frameless_core::logging::targets;

use crate::buttons::ButtonState;
use crate::geometry::{map_widget_geometry, widget_origin_in_window};
use crate::platform::PlatformIntegration;
use crate::widget::Widget;

/// A pointer event fabricated for a system button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticMouseEvent {
    /// Requested button state.
    pub state: ButtonState,
    /// Cursor position in desktop coordinates.
    pub global_pos: Point,
    /// Cursor position in window coordinates.
    pub window_pos: Point,
    /// Cursor position relative to the button.
    pub local_pos: Point,
    /// Whether the cursor is geometrically over the button.
    pub under_mouse: bool,
    /// Whether the button tracks hover.
    pub hover_enabled: bool,
}

/// Build a [`SyntheticMouseEvent`] for `button` and deliver it.
///
/// Returns the delivered event, or `None` when the button is not inside a
/// top-level window.
pub fn synthesize_button_state(
    button: &dyn Widget,
    state: ButtonState,
    platform: &dyn PlatformIntegration,
) -> Option<SyntheticMouseEvent> {
    let Some(window) = button.window() else {
        tracing::debug!(target: targets::HIT_TEST, "button has no window; state change dropped");
        return None;
    };
    let origin = widget_origin_in_window(button, &*window)?;

    let screen = window.screen();
    let global_pos = platform.cursor_position(screen.as_ref());
    let window_pos = window.map_from_global(global_pos);
    let local_pos = window_pos - origin;

    let event = SyntheticMouseEvent {
        state,
        global_pos,
        window_pos,
        local_pos,
        under_mouse: map_widget_geometry(button, &*window).contains(window_pos),
        hover_enabled: button.has_hover_tracking(),
    };
    tracing::trace!(target: targets::HIT_TEST, ?event, "delivering synthetic button event");
    button.handle_synthetic_mouse_event(&event);
    Some(event)
}
