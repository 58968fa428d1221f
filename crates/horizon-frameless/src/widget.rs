//! Host widget seam.
//!
//! The frameless helper never owns widgets. The host toolkit exposes its
//! widgets through the [`Widget`] trait and the helper refers to them through
//! weak [`WidgetHandle`]s, so a widget destroyed by its owner simply stops
//! participating in hit-testing.
//!
//! # Implementing
//!
//! ```ignore
//! use horizon_frameless::widget::{Widget, WidgetId};
//!
//! struct Button {
//!     id: WidgetId,
//!     // geometry, visibility, parent link ...
//! }
//!
//! impl Widget for Button {
//!     fn widget_id(&self) -> WidgetId { self.id }
//!     fn pos(&self) -> Point { self.geometry.origin }
//!     // ...
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use horizon_frameless_core::{Point, Size};

use crate::synthesizer::SyntheticMouseEvent;
use crate::window::TopLevelWindow;

/// Stable identity of a host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

impl WidgetId {
    /// Allocate a process-unique id.
    pub fn new_unique() -> Self {
        Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an id assigned by the host toolkit.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// A UI element of the host toolkit.
///
/// Geometry is in logical pixels. `pos` is relative to the parent widget; for
/// a top-level window it is the window's position on the desktop.
pub trait Widget: Send + Sync {
    fn widget_id(&self) -> WidgetId;

    /// Position relative to the parent widget.
    fn pos(&self) -> Point;

    fn size(&self) -> Size;

    fn is_visible(&self) -> bool;

    fn is_enabled(&self) -> bool;

    /// The containing widget, `None` for top-level windows.
    fn parent_widget(&self) -> Option<Arc<dyn Widget>>;

    /// The top-level window this widget belongs to (itself for a window).
    fn window(&self) -> Option<Arc<dyn TopLevelWindow>>;

    /// Whether the widget reacts to hover (enter/leave) events.
    fn has_hover_tracking(&self) -> bool {
        false
    }

    /// Receive a synthesized pointer event for a system button.
    fn handle_synthetic_mouse_event(&self, _event: &SyntheticMouseEvent) {}

    /// Schedule an unconditional repaint.
    fn request_repaint(&self) {}
}

/// Weak reference to a host widget.
///
/// Two handles are equal when they name the same widget id, whether or not
/// the widget is still alive.
#[derive(Clone)]
pub struct WidgetHandle {
    id: WidgetId,
    widget: Weak<dyn Widget>,
}

impl WidgetHandle {
    pub fn new(widget: &Arc<dyn Widget>) -> Self {
        Self {
            id: widget.widget_id(),
            widget: Arc::downgrade(widget),
        }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget, if it has not been destroyed.
    pub fn upgrade(&self) -> Option<Arc<dyn Widget>> {
        self.widget.upgrade()
    }

    /// The widget, if it is alive, visible and enabled.
    pub fn upgrade_interactive(&self) -> Option<Arc<dyn Widget>> {
        self.upgrade()
            .filter(|widget| widget.is_visible() && widget.is_enabled())
    }

    pub fn is_alive(&self) -> bool {
        self.widget.strong_count() > 0
    }
}

impl PartialEq for WidgetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WidgetHandle {}

impl std::fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ============================================================================
// Size Policy
// ============================================================================

/// How a widget may grow or shrink along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// The size hint is the only acceptable size.
    Fixed,
    Minimum,
    Maximum,
    #[default]
    Preferred,
    Expanding,
    MinimumExpanding,
    Ignored,
}

/// Horizontal and vertical size policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePolicyPair {
    pub horizontal: SizePolicy,
    pub vertical: SizePolicy,
}

impl SizePolicyPair {
    pub const FIXED: Self = Self::new(SizePolicy::Fixed, SizePolicy::Fixed);

    pub const fn new(horizontal: SizePolicy, vertical: SizePolicy) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Both axes are [`SizePolicy::Fixed`].
    pub fn is_fixed(&self) -> bool {
        self.horizontal == SizePolicy::Fixed && self.vertical == SizePolicy::Fixed
    }
}
