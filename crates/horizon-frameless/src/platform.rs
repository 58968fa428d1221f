//! Platform integration seam.
//!
//! The helper delegates every operation that needs the native windowing
//! system to a [`PlatformIntegration`]: interactive move and resize, blur,
//! snapping, the system menu, cursor queries and similar. Each method has a
//! default that reports [`FramelessError::Unsupported`], so an integration
//! only implements what its platform can do.
//!
//! [`HeadlessPlatform`] implements nothing and is used when no integration is
//! supplied, for example in tests or on platforms without native support.

use horizon_frameless_core::logging::targets;
use horizon_frameless_core::{Color, Point};
use parking_lot::Mutex;
use winit::window::ResizeDirection;

use crate::error::{FramelessError, FramelessResult};
use crate::params::SystemParameters;
use crate::window::{ScreenInfo, TopLevelWindow, WindowIdentity};

/// Native blur behind the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurMode {
    /// Enable the platform's default blur material.
    #[default]
    Default,
    /// Remove any blur.
    Disable,
}

/// Operations the helper consumes from the native platform layer.
pub trait PlatformIntegration: Send + Sync {
    /// Begin an interactive, platform-driven window move.
    fn start_system_move(&self, _window: &dyn TopLevelWindow, _pos: Point) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("system move"))
    }

    /// Begin an interactive, platform-driven window resize.
    fn start_system_resize(
        &self,
        _window: &dyn TopLevelWindow,
        _direction: ResizeDirection,
        _pos: Point,
    ) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("system resize"))
    }

    fn is_blur_behind_window_supported(&self) -> bool {
        false
    }

    fn set_blur_behind_window_enabled(
        &self,
        _id: WindowIdentity,
        _mode: BlurMode,
        _tint: Option<Color>,
    ) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("blur behind window"))
    }

    /// Enable or disable edge snapping for the window.
    fn set_aero_snapping_enabled(&self, _id: WindowIdentity, _enabled: bool) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("aero snapping"))
    }

    /// Recompute the native frame margins, e.g. after a forced repaint.
    fn update_internal_window_frame_margins(
        &self,
        _window: &dyn TopLevelWindow,
        _force: bool,
    ) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("frame margins"))
    }

    /// Center the window on its screen.
    ///
    /// The default uses the screen's available geometry when
    /// `consider_taskbar` is set, its full geometry otherwise.
    fn move_window_to_desktop_center(&self, params: &SystemParameters, consider_taskbar: bool) {
        let Some(screen) = (params.get_window_screen)() else {
            tracing::debug!(target: targets::PLATFORM, "window has no screen; not centering");
            return;
        };
        let area = if consider_taskbar {
            screen.available_geometry
        } else {
            screen.geometry
        };
        let size = (params.get_window_size)();
        let x = area.left() + ((area.width() - size.width) / 2.0).round();
        let y = area.top() + ((area.height() - size.height) / 2.0).round();
        (params.set_window_position)(Point::new(x, y));
    }

    /// Bring the window to the foreground by native means.
    fn bring_window_to_front(&self, _window: &dyn TopLevelWindow) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("bring to front"))
    }

    /// Open the native system menu at `native_pos` (physical desktop pixels).
    fn show_system_menu(
        &self,
        _id: WindowIdentity,
        _native_pos: Point,
        _params: &SystemParameters,
    ) -> FramelessResult<()> {
        Err(FramelessError::Unsupported("system menu"))
    }

    /// Convert a window-local logical point to physical desktop pixels.
    fn to_native_global_position(&self, window: &dyn TopLevelWindow, pos: Point) -> Point {
        let global = window.map_to_global(pos);
        let ratio = window.device_pixel_ratio() as f32;
        Point::new((global.x * ratio).round(), (global.y * ratio).round())
    }

    /// Whether the platform draws a visible frame border around frameless windows.
    fn is_window_frame_border_visible(&self) -> bool {
        false
    }

    /// Current cursor position in desktop coordinates.
    fn cursor_position(&self, screen: Option<&ScreenInfo>) -> Point;
}

/// A platform integration that supports nothing.
///
/// The cursor position is whatever was last stored with
/// [`set_cursor_position`](Self::set_cursor_position).
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    cursor: Mutex<Point>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(pos: Point) -> Self {
        Self {
            cursor: Mutex::new(pos),
        }
    }

    pub fn set_cursor_position(&self, pos: Point) {
        *self.cursor.lock() = pos;
    }
}

impl PlatformIntegration for HeadlessPlatform {
    fn cursor_position(&self, _screen: Option<&ScreenInfo>) -> Point {
        *self.cursor.lock()
    }
}
