//! Shared services for frameless helpers.
//!
//! A [`FramelessContext`] bundles everything helper instances share: the
//! per-window state store, the frameless window manager, the platform
//! integration, configuration, the event loop used for deferred work, the
//! blur fallback factory, and the registry of live helper instances.
//!
//! # Example
//!
//! ```ignore
//! use horizon_frameless::{FramelessConfig, FramelessContext, FramelessOption};
//!
//! let context = FramelessContext::builder()
//!     .platform(Arc::new(MyPlatform::new()))
//!     .config(FramelessConfig::from_env().with_option(FramelessOption::CenterWindowBeforeShow))
//!     .event_loop(app.event_loop().clone())
//!     .build();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use horizon_frameless_core::EventLoop;
use horizon_frameless_core::logging::targets;
use parking_lot::Mutex;

use crate::backdrop::{BackdropFactory, SharedHelper, software_backdrop_factory};
use crate::config::FramelessConfig;
use crate::helper::HelperInner;
use crate::manager::{FramelessManager, FramelessWindowRegistry};
use crate::platform::{HeadlessPlatform, PlatformIntegration};
use crate::store::WindowStateStore;
use crate::widget::WidgetId;
use crate::window::TopLevelWindow;

/// Fallback backdrop helper created for a window without its own.
struct CachedSharedHelper {
    window: Weak<dyn TopLevelWindow>,
    helper: Arc<dyn SharedHelper>,
}

/// Services shared by every helper instance.
pub struct FramelessContext {
    store: WindowStateStore,
    manager: Arc<dyn FramelessManager>,
    platform: Arc<dyn PlatformIntegration>,
    config: FramelessConfig,
    event_loop: EventLoop,
    backdrop_factory: BackdropFactory,
    shared_helpers: Mutex<HashMap<WidgetId, CachedSharedHelper>>,
    helpers: Mutex<Vec<Weak<HelperInner>>>,
}

impl FramelessContext {
    pub fn builder() -> FramelessContextBuilder {
        FramelessContextBuilder::default()
    }

    pub fn store(&self) -> &WindowStateStore {
        &self.store
    }

    pub fn manager(&self) -> &Arc<dyn FramelessManager> {
        &self.manager
    }

    pub fn platform(&self) -> &Arc<dyn PlatformIntegration> {
        &self.platform
    }

    pub fn config(&self) -> &FramelessConfig {
        &self.config
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// The blur fallback helper for `window`.
    ///
    /// Prefers the window's own helper; otherwise creates one with the
    /// backdrop factory, once per window. Cached helpers live until the
    /// window detaches or is destroyed.
    pub fn find_or_create_shared_helper(
        &self,
        window: &Arc<dyn TopLevelWindow>,
    ) -> Option<Arc<dyn SharedHelper>> {
        if let Some(own) = window.shared_helper() {
            return Some(own);
        }
        let key = window.widget_id();
        if let Some(existing) = self.shared_helpers.lock().get(&key) {
            return Some(existing.helper.clone());
        }

        let created = (self.backdrop_factory)(window)?;
        let helper = {
            let mut cache = self.shared_helpers.lock();
            cache.retain(|_, cached| cached.window.strong_count() > 0);
            cache
                .entry(key)
                .or_insert_with(|| CachedSharedHelper {
                    window: Arc::downgrade(window),
                    helper: created,
                })
                .helper
                .clone()
        };
        tracing::debug!(target: targets::HELPER, window = ?key, "created shared backdrop helper");
        Some(helper)
    }

    /// Forget the cached fallback helper of a window.
    pub fn release_shared_helper(&self, window: WidgetId) {
        if self.shared_helpers.lock().remove(&window).is_some() {
            tracing::trace!(target: targets::HELPER, ?window, "released shared backdrop helper");
        }
    }

    /// Number of cached fallback helpers.
    pub fn shared_helper_count(&self) -> usize {
        self.shared_helpers.lock().len()
    }

    pub(crate) fn register_helper(&self, helper: Weak<HelperInner>) {
        let mut helpers = self.helpers.lock();
        helpers.retain(|existing| existing.strong_count() > 0);
        helpers.push(helper);
    }

    /// Live helper instances, in creation order.
    pub(crate) fn live_helpers(&self) -> Vec<Arc<HelperInner>> {
        self.helpers.lock().iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of live helper instances.
    pub fn helper_count(&self) -> usize {
        self.helpers
            .lock()
            .iter()
            .filter(|helper| helper.strong_count() > 0)
            .count()
    }
}

impl std::fmt::Debug for FramelessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramelessContext")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("event_loop", &self.event_loop)
            .field("helpers", &self.helper_count())
            .finish_non_exhaustive()
    }
}

/// Builder for [`FramelessContext`].
///
/// Unset services default to an in-memory [`FramelessWindowRegistry`], a
/// [`HeadlessPlatform`], [`FramelessConfig::default`], a new [`EventLoop`]
/// owned by the building thread, and the software backdrop factory.
#[derive(Default)]
pub struct FramelessContextBuilder {
    manager: Option<Arc<dyn FramelessManager>>,
    platform: Option<Arc<dyn PlatformIntegration>>,
    config: Option<FramelessConfig>,
    event_loop: Option<EventLoop>,
    backdrop_factory: Option<BackdropFactory>,
}

impl FramelessContextBuilder {
    pub fn manager(mut self, manager: Arc<dyn FramelessManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn PlatformIntegration>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn config(mut self, config: FramelessConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn event_loop(mut self, event_loop: EventLoop) -> Self {
        self.event_loop = Some(event_loop);
        self
    }

    pub fn backdrop_factory(mut self, factory: BackdropFactory) -> Self {
        self.backdrop_factory = Some(factory);
        self
    }

    pub fn build(self) -> Arc<FramelessContext> {
        Arc::new(FramelessContext {
            store: WindowStateStore::new(),
            manager: self
                .manager
                .unwrap_or_else(|| Arc::new(FramelessWindowRegistry::new())),
            platform: self
                .platform
                .unwrap_or_else(|| Arc::new(HeadlessPlatform::new())),
            config: self.config.unwrap_or_default(),
            event_loop: self.event_loop.unwrap_or_default(),
            backdrop_factory: self
                .backdrop_factory
                .unwrap_or_else(software_backdrop_factory),
            shared_helpers: Mutex::new(HashMap::new()),
            helpers: Mutex::new(Vec::new()),
        })
    }
}

static_assertions::assert_impl_all!(FramelessContext: Send, Sync);
