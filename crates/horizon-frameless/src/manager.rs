//! Frameless window manager seam.
//!
//! Once a window's content is extended into its title bar, the helper
//! registers the window's [`SystemParameters`] with a [`FramelessManager`].
//! The manager is what the native message hooks consult to answer hit-test
//! and cursor queries for that window.
//!
//! [`FramelessWindowRegistry`] is an in-memory manager suitable for
//! platforms whose native hooks look windows up by identity.
//!
//! # Example
//!
//! ```ignore
//! use horizon_frameless::FramelessWindowRegistry;
//!
//! let registry = Arc::new(FramelessWindowRegistry::new());
//! registry.window_added().connect(|id| tracing::info!(%id, "frameless window"));
//!
//! if let Some(params) = registry.parameters(id) {
//!     let over_button = (params.is_inside_system_buttons)(cursor);
//! }
//! ```

use std::collections::HashMap;

use horizon_frameless_core::Signal;
use horizon_frameless_core::logging::targets;
use parking_lot::RwLock;

use crate::params::SystemParameters;
use crate::window::WindowIdentity;

/// Receives frameless window registrations.
pub trait FramelessManager: Send + Sync {
    /// Start managing the window described by `params`.
    fn add_window(&self, params: &SystemParameters);

    /// Stop managing the window.
    fn remove_window(&self, id: WindowIdentity);
}

/// In-memory registry of frameless windows.
pub struct FramelessWindowRegistry {
    windows: RwLock<HashMap<WindowIdentity, SystemParameters>>,
    window_added: Signal<WindowIdentity>,
    window_removed: Signal<WindowIdentity>,
}

impl Default for FramelessWindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FramelessWindowRegistry {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            window_added: Signal::new(),
            window_removed: Signal::new(),
        }
    }

    pub fn contains(&self, id: WindowIdentity) -> bool {
        self.windows.read().contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.windows.read().len()
    }

    pub fn window_ids(&self) -> Vec<WindowIdentity> {
        self.windows.read().keys().copied().collect()
    }

    /// The capability record registered for `id`.
    pub fn parameters(&self, id: WindowIdentity) -> Option<SystemParameters> {
        self.windows.read().get(&id).cloned()
    }

    /// Emitted after a window is registered.
    pub fn window_added(&self) -> &Signal<WindowIdentity> {
        &self.window_added
    }

    /// Emitted after a window is unregistered.
    pub fn window_removed(&self) -> &Signal<WindowIdentity> {
        &self.window_removed
    }
}

impl FramelessManager for FramelessWindowRegistry {
    fn add_window(&self, params: &SystemParameters) {
        let Some(id) = (params.get_window_id)() else {
            tracing::warn!(target: targets::MANAGER, "refusing to add a window without native identity");
            return;
        };

        {
            let mut windows = self.windows.write();
            if windows.contains_key(&id) {
                tracing::trace!(target: targets::MANAGER, %id, "window already managed");
                return;
            }
            windows.insert(id, params.clone());
        }
        tracing::debug!(target: targets::MANAGER, %id, "window added");
        self.window_added.emit(id);
    }

    fn remove_window(&self, id: WindowIdentity) {
        if self.windows.write().remove(&id).is_none() {
            tracing::trace!(target: targets::MANAGER, %id, "window was not managed");
            return;
        }
        tracing::debug!(target: targets::MANAGER, %id, "window removed");
        self.window_removed.emit(id);
    }
}

impl std::fmt::Debug for FramelessWindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramelessWindowRegistry")
            .field("windows", &self.window_ids())
            .finish()
    }
}
