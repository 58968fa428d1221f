//! Top-level window seam and window vocabulary types.
//!
//! [`TopLevelWindow`] extends [`Widget`] with everything the frameless helper
//! reads from or applies to a native window: identity, flags, geometry,
//! state, screen, cursor, size constraints, background and named
//! properties. The host toolkit implements it for its window type.

use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::sync::Arc;

use cursor_icon::CursorIcon;
use horizon_frameless_core::{Color, Point, Rect, Size};
use winit::window::ResizeDirection;

use crate::backdrop::SharedHelper;
use crate::error::{FramelessError, FramelessResult};
use crate::widget::{SizePolicyPair, Widget};

// ============================================================================
// Window Identity
// ============================================================================

/// Identity of a native window.
///
/// Keys the per-window state store and the frameless window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowIdentity(u64);

impl WindowIdentity {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl From<winit::window::WindowId> for WindowIdentity {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

impl std::fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// ============================================================================
// Window State
// ============================================================================

/// The show state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

impl WindowState {
    pub fn is_normal(&self) -> bool {
        matches!(self, WindowState::Normal)
    }

    pub fn is_minimized(&self) -> bool {
        matches!(self, WindowState::Minimized)
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self, WindowState::Maximized)
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self, WindowState::Fullscreen)
    }
}

// ============================================================================
// Window Flags
// ============================================================================

/// Flags that control window appearance and behavior.
///
/// ```
/// use horizon_frameless::WindowFlags;
///
/// let flags = WindowFlags::FRAMELESS | WindowFlags::STAYS_ON_TOP;
/// assert!(flags.has(WindowFlags::FRAMELESS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowFlags(u16);

impl WindowFlags {
    pub const NONE: WindowFlags = WindowFlags(0);
    /// No native title bar or border.
    pub const FRAMELESS: WindowFlags = WindowFlags(1 << 0);
    pub const STAYS_ON_TOP: WindowFlags = WindowFlags(1 << 1);
    pub const MINIMIZE_BUTTON: WindowFlags = WindowFlags(1 << 2);
    pub const MAXIMIZE_BUTTON: WindowFlags = WindowFlags(1 << 3);
    pub const CLOSE_BUTTON: WindowFlags = WindowFlags(1 << 4);
    pub const HELP_BUTTON: WindowFlags = WindowFlags(1 << 5);
    pub const SYSTEM_MENU: WindowFlags = WindowFlags(1 << 6);
    /// The window is a fixed-size dialog regardless of its size policy.
    pub const FIXED_SIZE_DIALOG_HINT: WindowFlags = WindowFlags(1 << 7);

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Whether all bits of `flag` are set.
    #[inline]
    pub fn has(&self, flag: WindowFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Return a copy with `flag` set or cleared.
    #[inline]
    pub fn with(self, flag: WindowFlags, on: bool) -> Self {
        if on {
            Self(self.0 | flag.0)
        } else {
            Self(self.0 & !flag.0)
        }
    }
}

impl BitOr for WindowFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        WindowFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WindowFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WindowFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        WindowFlags(self.0 & rhs.0)
    }
}

/// Attributes that force a native handle to exist for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAttribute {
    /// Give the window its own native handle.
    NativeWindow,
    /// Do not create native handles for ancestors as a side effect.
    DontCreateNativeAncestors,
}

// ============================================================================
// Edges
// ============================================================================

/// A set of window edges, used to start an interactive resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edges(u8);

impl Edges {
    pub const NONE: Edges = Edges(0);
    pub const TOP: Edges = Edges(1 << 0);
    pub const LEFT: Edges = Edges(1 << 1);
    pub const RIGHT: Edges = Edges(1 << 2);
    pub const BOTTOM: Edges = Edges(1 << 3);

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(&self, edge: Edges) -> bool {
        edge.0 != 0 && (self.0 & edge.0) == edge.0
    }

    /// The resize direction these edges describe.
    ///
    /// Returns `None` for an empty set or for contradictory edges such as
    /// left together with right.
    pub fn to_resize_direction(self) -> Option<ResizeDirection> {
        let top = self.contains(Edges::TOP);
        let bottom = self.contains(Edges::BOTTOM);
        let left = self.contains(Edges::LEFT);
        let right = self.contains(Edges::RIGHT);
        if (top && bottom) || (left && right) {
            return None;
        }
        match (top, bottom, left, right) {
            (true, _, true, _) => Some(ResizeDirection::NorthWest),
            (true, _, _, true) => Some(ResizeDirection::NorthEast),
            (_, true, true, _) => Some(ResizeDirection::SouthWest),
            (_, true, _, true) => Some(ResizeDirection::SouthEast),
            (true, _, _, _) => Some(ResizeDirection::North),
            (_, true, _, _) => Some(ResizeDirection::South),
            (_, _, true, _) => Some(ResizeDirection::West),
            (_, _, _, true) => Some(ResizeDirection::East),
            _ => None,
        }
    }
}

impl BitOr for Edges {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Edges(self.0 | rhs.0)
    }
}

// ============================================================================
// Screen / Properties
// ============================================================================

/// The screen a window is shown on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    /// Full screen geometry in desktop coordinates.
    pub geometry: Rect,
    /// Geometry minus task bars and docks.
    pub available_geometry: Rect,
    pub device_pixel_ratio: f64,
}

/// Value of a named window property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Point(Point),
    Size(Size),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

// ============================================================================
// Top-level Window
// ============================================================================

/// A native top-level window of the host toolkit.
pub trait TopLevelWindow: Widget {
    /// Native identity, `None` while no native handle exists.
    fn native_id(&self) -> Option<WindowIdentity>;

    /// Native identity, failing with [`FramelessError::NoNativeHandle`].
    fn require_native_id(&self) -> FramelessResult<WindowIdentity> {
        self.native_id().ok_or(FramelessError::NoNativeHandle)
    }

    fn test_attribute(&self, attribute: WindowAttribute) -> bool;

    fn set_attribute(&self, attribute: WindowAttribute, on: bool);

    fn window_flags(&self) -> WindowFlags;

    fn set_window_flags(&self, flags: WindowFlags);

    fn resize(&self, size: Size);

    /// Move the window to a desktop position.
    fn move_to(&self, pos: Point);

    fn window_state(&self) -> WindowState;

    fn set_window_state(&self, state: WindowState);

    fn screen(&self) -> Option<ScreenInfo>;

    /// Map a window-local point to desktop coordinates.
    fn map_to_global(&self, pos: Point) -> Point {
        self.pos() + pos
    }

    /// Map a desktop point to window-local coordinates.
    fn map_from_global(&self, pos: Point) -> Point {
        pos - self.pos()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.screen().map_or(1.0, |screen| screen.device_pixel_ratio)
    }

    fn set_cursor(&self, cursor: CursorIcon);

    fn unset_cursor(&self);

    fn size_policy(&self) -> SizePolicyPair;

    fn set_size_policy(&self, policy: SizePolicyPair);

    fn minimum_size(&self) -> Size;

    fn maximum_size(&self) -> Size;

    fn set_minimum_size(&self, size: Size);

    fn set_maximum_size(&self, size: Size);

    /// Pin both minimum and maximum size to `size`.
    fn set_fixed_size(&self, size: Size) {
        self.set_minimum_size(size);
        self.set_maximum_size(size);
    }

    fn background_color(&self) -> Color;

    fn set_background_color(&self, color: Color);

    /// A named dynamic property, `None` if unset.
    fn property(&self, name: &str) -> Option<PropertyValue>;

    fn set_property(&self, name: &str, value: PropertyValue);

    fn is_hidden(&self) -> bool {
        !self.is_visible()
    }

    fn show(&self);

    fn raise(&self);

    fn activate_window(&self);

    /// Every widget contained in this window, at any depth.
    fn descendants(&self) -> Vec<Arc<dyn Widget>> {
        Vec::new()
    }

    /// The window's own backdrop helper, if it provides one.
    fn shared_helper(&self) -> Option<Arc<dyn SharedHelper>> {
        None
    }
}
