//! Blur fallback strategy.
//!
//! When the platform cannot blur behind a window natively, the helper falls
//! back to a [`SharedHelper`]: a per-window object that fakes a translucent
//! backdrop material. A window may provide its own through
//! [`TopLevelWindow::shared_helper`]; otherwise the context's
//! [`BackdropFactory`] creates one, [`SoftwareBackdrop`] by default.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_frameless_core::Color;
use horizon_frameless_core::logging::targets;
use parking_lot::Mutex;

use crate::window::TopLevelWindow;

/// A per-window backdrop material used when native blur is unavailable.
pub trait SharedHelper: Send + Sync {
    fn set_mica_enabled(&self, enabled: bool);

    fn is_mica_enabled(&self) -> bool;
}

/// Creates the fallback [`SharedHelper`] for a window that has none.
pub type BackdropFactory =
    Arc<dyn Fn(&Arc<dyn TopLevelWindow>) -> Option<Arc<dyn SharedHelper>> + Send + Sync>;

/// The default [`BackdropFactory`]: a [`SoftwareBackdrop`] per window.
pub fn software_backdrop_factory() -> BackdropFactory {
    Arc::new(|window| Some(Arc::new(SoftwareBackdrop::new(window)) as Arc<dyn SharedHelper>))
}

/// Tint used by [`SoftwareBackdrop`] in place of a blurred wallpaper.
pub const SOFTWARE_BACKDROP_TINT: Color = Color::new(0.95, 0.95, 0.95, 0.9);

/// Swaps the window background for a translucent tint.
pub struct SoftwareBackdrop {
    window: Weak<dyn TopLevelWindow>,
    enabled: AtomicBool,
    saved_background: Mutex<Option<Color>>,
}

impl SoftwareBackdrop {
    pub fn new(window: &Arc<dyn TopLevelWindow>) -> Self {
        Self {
            window: Arc::downgrade(window),
            enabled: AtomicBool::new(false),
            saved_background: Mutex::new(None),
        }
    }
}

impl SharedHelper for SoftwareBackdrop {
    fn set_mica_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::AcqRel) == enabled {
            return;
        }
        let Some(window) = self.window.upgrade() else {
            return;
        };

        if enabled {
            *self.saved_background.lock() = Some(window.background_color());
            window.set_background_color(SOFTWARE_BACKDROP_TINT);
        } else if let Some(saved) = self.saved_background.lock().take() {
            window.set_background_color(saved);
        }
        window.request_repaint();
        tracing::debug!(target: targets::PLATFORM, enabled, "software backdrop toggled");
    }

    fn is_mica_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
