//! The frameless widgets helper.
//!
//! A [`FramelessWidgetsHelper`] attaches frameless-window behavior to the
//! top-level window containing its parent widget: it registers the window
//! with the frameless window manager, answers hit-test queries for the custom
//! title bar, drives the custom system buttons, and forwards window
//! operations (move, resize, system menu, blur, fixed size) to the platform
//! integration.
//!
//! # Lifecycle
//!
//! ```text
//! Detached ──attach──▶ Attaching ──▶ AttachedPendingPlatformReady ──timer──▶ Ready
//!    ▲                                         │                               │
//!    └────────────────────detach───────────────┴───────────────────────────────┘
//! ```
//!
//! Attaching registers the window immediately but only declares it
//! platform-ready after a short, configurable delay: the native windowing
//! system may still apply its own default geometry right after the handle is
//! created, silently overriding anything set before then. Callers that need
//! certainty use [`FramelessWidgetsHelper::wait_for_ready`] or connect to
//! [`FramelessWidgetsHelper::ready`].
//!
//! # Example
//!
//! ```ignore
//! use horizon_frameless::{FramelessContext, FramelessWidgetsHelper, SystemButtonType};
//!
//! let context = FramelessContext::builder().platform(platform).build();
//!
//! let helper = FramelessWidgetsHelper::get_or_create(&context, &main_window);
//! helper.set_title_bar_widget(&title_bar);
//! helper.set_system_button(&minimize_button, SystemButtonType::Minimize);
//! helper.set_system_button(&maximize_button, SystemButtonType::Maximize);
//! helper.set_system_button(&close_button, SystemButtonType::Close);
//! helper.set_hit_test_visible(&search_box, true);
//!
//! helper.wait_for_ready();
//! ```

mod parameters;
mod title_bar;
mod window_ops;

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use horizon_frameless_core::logging::targets;
use horizon_frameless_core::{Color, Point, Rect, Signal};
use parking_lot::Mutex;
use winit::window::ResizeDirection;

use crate::backdrop::SharedHelper;
use crate::buttons::{ButtonState, SystemButtonType};
use crate::config::FramelessOption;
use crate::context::FramelessContext;
use crate::widget::{SizePolicyPair, Widget, WidgetHandle, WidgetId};
use crate::window::{Edges, PropertyValue, TopLevelWindow, WindowAttribute, WindowIdentity};

pub use window_ops::{DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};

/// Lifecycle state of one helper instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Detached,
    /// Bound to a window, registration in progress.
    Attaching,
    /// Registered; waiting for the platform-ready delay to elapse.
    AttachedPendingPlatformReady,
    /// Registered and platform-ready.
    Ready,
}

/// Notifications a helper emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HelperSignal {
    TitleBarWidgetChanged,
    WindowChanged,
    Ready,
    ExtendsContentIntoTitleBarChanged,
    WindowFixedSizeChanged,
    BlurBehindWindowEnabledChanged,
}

#[derive(Default)]
struct HelperSignals {
    title_bar_widget_changed: Signal<()>,
    window_changed: Signal<()>,
    ready: Signal<()>,
    extends_content_into_title_bar_changed: Signal<()>,
    window_fixed_size_changed: Signal<()>,
    blur_behind_window_enabled_changed: Signal<()>,
}

impl HelperSignals {
    fn get(&self, kind: HelperSignal) -> &Signal<()> {
        match kind {
            HelperSignal::TitleBarWidgetChanged => &self.title_bar_widget_changed,
            HelperSignal::WindowChanged => &self.window_changed,
            HelperSignal::Ready => &self.ready,
            HelperSignal::ExtendsContentIntoTitleBarChanged => {
                &self.extends_content_into_title_bar_changed
            }
            HelperSignal::WindowFixedSizeChanged => &self.window_fixed_size_changed,
            HelperSignal::BlurBehindWindowEnabledChanged => &self.blur_behind_window_enabled_changed,
        }
    }
}

/// Per-instance lifecycle record.
struct LifecycleRecord {
    state: LifecycleState,
    window: Option<Weak<dyn TopLevelWindow>>,
    window_id: Option<WindowIdentity>,
    /// Bumped on every attach; readiness callbacks from older attaches are stale.
    generation: u64,
    destroying: bool,
    ready_wait_time: Duration,
    saved_size_policy: SizePolicyPair,
    saved_background: Option<Color>,
    blur_enabled: bool,
    shared_helper: Option<Arc<dyn SharedHelper>>,
}

pub(crate) struct HelperInner {
    context: Arc<FramelessContext>,
    parent: WidgetHandle,
    self_ref: Weak<HelperInner>,
    record: Mutex<LifecycleRecord>,
    signals: HelperSignals,
}

impl HelperInner {
    fn new(context: &Arc<FramelessContext>, parent: &Arc<dyn Widget>) -> Arc<Self> {
        let ready_wait_time = context.config().ready_wait_time();
        let inner = Arc::new_cyclic(|self_ref| HelperInner {
            context: context.clone(),
            parent: WidgetHandle::new(parent),
            self_ref: self_ref.clone(),
            record: Mutex::new(LifecycleRecord {
                state: LifecycleState::Detached,
                window: None,
                window_id: None,
                generation: 0,
                destroying: false,
                ready_wait_time,
                saved_size_policy: SizePolicyPair::default(),
                saved_background: None,
                blur_enabled: false,
                shared_helper: None,
            }),
            signals: HelperSignals::default(),
        });
        context.register_helper(Arc::downgrade(&inner));
        inner
    }

    /// The top-level window containing the parent widget.
    pub(crate) fn find_top_level_window(&self) -> Option<Arc<dyn TopLevelWindow>> {
        self.parent.upgrade()?.window()
    }

    fn top_level_widget_id(&self) -> Option<WidgetId> {
        self.find_top_level_window().map(|window| window.widget_id())
    }

    /// The bound window and its identity, if bound and alive.
    pub(crate) fn bound(&self) -> Option<(Arc<dyn TopLevelWindow>, WindowIdentity)> {
        let record = self.record.lock();
        let window = record.window.as_ref()?.upgrade()?;
        Some((window, record.window_id?))
    }

    pub(crate) fn window_id(&self) -> Option<WindowIdentity> {
        self.record.lock().window_id
    }

    pub(crate) fn lifecycle_state(&self) -> LifecycleState {
        self.record.lock().state
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.lifecycle_state() == LifecycleState::Ready
    }

    pub(crate) fn is_content_extended_into_title_bar(&self) -> bool {
        match self.window_id() {
            Some(id) => self.context.store().with(id, |data| data.ready),
            None => false,
        }
    }

    pub(crate) fn extends_content_into_title_bar(&self, value: bool) {
        if self.is_content_extended_into_title_bar() == value {
            tracing::trace!(target: targets::HELPER, value, "content extension unchanged");
            return;
        }
        if value {
            self.attach();
        } else {
            self.detach();
        }
        let destroying = self.record.lock().destroying;
        if !destroying {
            self.emit_for_all_instances(HelperSignal::ExtendsContentIntoTitleBarChanged);
        }
    }

    fn attach(&self) {
        let Some(window) = self.find_top_level_window() else {
            tracing::warn!(target: targets::HELPER, "cannot attach: parent is not inside a top-level window");
            return;
        };

        if let Some((bound, id)) = self.bound()
            && bound.widget_id() == window.widget_id()
            && self.context.store().with(id, |data| data.ready)
        {
            tracing::trace!(target: targets::HELPER, %id, "already attached to this window");
            return;
        }

        for attribute in [
            WindowAttribute::DontCreateNativeAncestors,
            WindowAttribute::NativeWindow,
        ] {
            if !window.test_attribute(attribute) {
                window.set_attribute(attribute, true);
            }
        }

        let id = match window.require_native_id() {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(target: targets::HELPER, error = %err, "cannot attach");
                return;
            }
        };

        let generation = {
            let mut record = self.record.lock();
            record.state = LifecycleState::Attaching;
            record.window = Some(Arc::downgrade(&window));
            record.window_id = Some(id);
            record.shared_helper = window.shared_helper();
            record.generation += 1;
            record.generation
        };
        tracing::debug!(target: targets::HELPER, %id, generation, "attaching to window");

        if self.context.store().with(id, |data| data.ready) {
            let sibling_ready = self.context.live_helpers().iter().any(|helper| {
                !std::ptr::eq(Arc::as_ptr(helper), self)
                    && helper.window_id() == Some(id)
                    && helper.is_ready()
            });
            let state = if sibling_ready {
                LifecycleState::Ready
            } else {
                LifecycleState::AttachedPendingPlatformReady
            };
            self.record.lock().state = state;
            tracing::debug!(target: targets::HELPER, %id, ?state, "window already extended by another helper");
            return;
        }

        let params = self.build_system_parameters(&window);
        self.context.manager().add_window(&params);
        self.context.store().with_mut(id, |data| {
            data.params = Some(params);
            data.ready = true;
        });

        let wait = {
            let mut record = self.record.lock();
            record.state = LifecycleState::AttachedPendingPlatformReady;
            record.ready_wait_time
        };
        let helper = self.self_ref.clone();
        self.context.event_loop().single_shot(wait, move || {
            if let Some(helper) = helper.upgrade() {
                helper.on_platform_ready(generation);
            }
        });
    }

    fn on_platform_ready(&self, generation: u64) {
        {
            let mut record = self.record.lock();
            if record.generation != generation
                || record.state != LifecycleState::AttachedPendingPlatformReady
            {
                tracing::trace!(target: targets::HELPER, generation, "stale readiness callback ignored");
                return;
            }
            record.state = LifecycleState::Ready;
        }
        tracing::debug!(target: targets::HELPER, id = ?self.window_id(), "window is platform-ready");

        let config = self.context.config();
        if config.is_set(FramelessOption::CenterWindowBeforeShow) {
            self.move_window_to_desktop_center();
        }
        if config.is_set(FramelessOption::EnableBlurBehindWindow) {
            self.set_blur_behind_window_enabled(true, None);
        }

        self.emit_for_all_instances(HelperSignal::WindowChanged);
        self.emit_for_all_instances(HelperSignal::Ready);
    }

    fn detach(&self) {
        let Some(id) = self.window_id() else {
            tracing::trace!(target: targets::HELPER, "not attached");
            return;
        };
        if !self.context.store().contains(id) {
            tracing::trace!(target: targets::HELPER, %id, "no window state to detach");
            return;
        }

        let window_key = self.bound().map(|(window, _)| window.widget_id());
        self.context.store().erase(id);
        self.context.manager().remove_window(id);
        if let Some(key) = window_key {
            self.context.release_shared_helper(key);
        }

        // The window state is shared, so every helper bound to it detaches too.
        self.clear_binding();
        let mut siblings = 0usize;
        for helper in self.context.live_helpers() {
            if helper.window_id() == Some(id) {
                helper.clear_binding();
                siblings += 1;
            }
        }
        tracing::debug!(target: targets::HELPER, %id, siblings, "detached from window");
        self.emit_for_all_instances(HelperSignal::WindowChanged);
    }

    fn clear_binding(&self) {
        let mut record = self.record.lock();
        record.state = LifecycleState::Detached;
        record.window = None;
        record.window_id = None;
        record.shared_helper = None;
    }

    fn mark_platform_ready(&self) {
        let mut record = self.record.lock();
        if record.state == LifecycleState::AttachedPendingPlatformReady {
            record.state = LifecycleState::Ready;
        }
    }

    /// Emit `kind` on every live helper whose parent is in the same window.
    pub(crate) fn emit_for_all_instances(&self, kind: HelperSignal) {
        let Some(target) = self.top_level_widget_id() else {
            return;
        };
        for helper in self.context.live_helpers() {
            if helper.top_level_widget_id() != Some(target) {
                continue;
            }
            if kind == HelperSignal::Ready {
                helper.mark_platform_ready();
            }
            helper.signals.get(kind).emit(());
        }
    }

    pub(crate) fn wait_for_ready(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            if self.is_ready() {
                return true;
            }
            if self.lifecycle_state() == LifecycleState::Detached {
                tracing::debug!(target: targets::HELPER, "not attached; nothing to wait for");
                return false;
            }

            let nested = self.context.event_loop().nested();
            let quit_on_ready = nested.quit_handle();
            let quit_on_change = nested.quit_handle();
            let ready = self.signals.ready.connect(move |_| quit_on_ready.quit());
            let changed = self.signals.window_changed.connect(move |_| quit_on_change.quit());

            let quit = match deadline {
                Some(deadline) => nested.exec_for(deadline.saturating_duration_since(Instant::now())),
                None => {
                    nested.exec();
                    true
                }
            };

            self.signals.ready.disconnect(ready);
            self.signals.window_changed.disconnect(changed);
            if !quit {
                return self.is_ready();
            }
        }
    }

    pub(crate) fn ready_wait_time(&self) -> Duration {
        self.record.lock().ready_wait_time
    }

    pub(crate) fn set_ready_wait_time(&self, wait: Duration) {
        let mut record = self.record.lock();
        if record.ready_wait_time == wait {
            tracing::trace!(target: targets::HELPER, ?wait, "ready wait time unchanged");
            return;
        }
        record.ready_wait_time = wait;
    }
}

impl Drop for HelperInner {
    fn drop(&mut self) {
        self.record.get_mut().destroying = true;
        self.extends_content_into_title_bar(false);
    }
}

// ============================================================================
// Public handle
// ============================================================================

/// Frameless-window behavior for the top-level window containing a widget.
///
/// Cloning yields another handle to the same helper. When the last handle is
/// dropped the helper detaches from its window.
#[derive(Clone)]
pub struct FramelessWidgetsHelper {
    inner: Arc<HelperInner>,
}

impl FramelessWidgetsHelper {
    /// Create a detached helper for the window containing `parent`.
    pub fn new(context: &Arc<FramelessContext>, parent: &Arc<dyn Widget>) -> Self {
        Self {
            inner: HelperInner::new(context, parent),
        }
    }

    /// The helper already serving `widget`'s window, or a new one that has
    /// extended the window's content into its title bar.
    pub fn get_or_create(context: &Arc<FramelessContext>, widget: &Arc<dyn Widget>) -> Self {
        let parent: Arc<dyn Widget> = match widget.window() {
            Some(window) => window,
            None => widget.clone(),
        };
        let target = parent.widget_id();

        let existing = context.live_helpers().into_iter().find(|helper| {
            helper.top_level_widget_id() == Some(target)
        });
        if let Some(inner) = existing {
            return Self { inner };
        }

        let helper = Self::new(context, &parent);
        helper.extends_content_into_title_bar(true);
        helper
    }

    pub fn context(&self) -> &Arc<FramelessContext> {
        &self.inner.context
    }

    /// The bound window, if attached and alive.
    pub fn window(&self) -> Option<Arc<dyn TopLevelWindow>> {
        self.inner.bound().map(|(window, _)| window)
    }

    pub fn window_id(&self) -> Option<WindowIdentity> {
        self.inner.window_id()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.inner.lifecycle_state()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Whether the window is registered as frameless.
    pub fn is_content_extended_into_title_bar(&self) -> bool {
        self.inner.is_content_extended_into_title_bar()
    }

    /// Attach to (`true`) or detach from (`false`) the window.
    ///
    /// Setting the current value again does nothing.
    pub fn extends_content_into_title_bar(&self, value: bool) {
        self.inner.extends_content_into_title_bar(value);
    }

    /// Whether the platform-ready delay has elapsed since attaching.
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Pump the event loop until the window is platform-ready.
    ///
    /// Returns immediately if already ready, or if the helper is not
    /// attached. Other queued work runs while waiting.
    pub fn wait_for_ready(&self) {
        self.inner.wait_for_ready(None);
    }

    /// Like [`wait_for_ready`](Self::wait_for_ready) with an upper bound.
    ///
    /// Returns whether the window became ready.
    pub fn wait_for_ready_timeout(&self, timeout: Duration) -> bool {
        self.inner.wait_for_ready(Some(timeout))
    }

    pub fn ready_wait_time(&self) -> Duration {
        self.inner.ready_wait_time()
    }

    /// Delay used by the next attach before declaring the window ready.
    pub fn set_ready_wait_time(&self, wait: Duration) {
        self.inner.set_ready_wait_time(wait);
    }

    // ------------------------------------------------------------------------
    // Title bar configuration
    // ------------------------------------------------------------------------

    pub fn title_bar_widget(&self) -> Option<Arc<dyn Widget>> {
        self.inner.title_bar_widget()
    }

    /// Use `widget` as the title bar, the positive area for window dragging.
    pub fn set_title_bar_widget(&self, widget: &Arc<dyn Widget>) {
        self.inner.set_title_bar_widget(widget);
    }

    /// Register `widget` as the system button of `kind`.
    pub fn set_system_button(&self, widget: &Arc<dyn Widget>, kind: SystemButtonType) {
        self.inner.set_system_button(widget, kind);
    }

    /// Exclude (`true`) or stop excluding (`false`) `widget` from the
    /// draggable area, so it receives pointer input normally.
    pub fn set_hit_test_visible(&self, widget: &Arc<dyn Widget>, visible: bool) {
        self.inner.set_hit_test_visible(widget, visible);
    }

    /// Rectangle form of [`set_hit_test_visible`](Self::set_hit_test_visible),
    /// in window coordinates. Invalid rectangles are ignored.
    pub fn set_hit_test_visible_rect(&self, rect: Rect, visible: bool) {
        self.inner.set_hit_test_visible_rect(rect, visible);
    }

    // ------------------------------------------------------------------------
    // Hit-testing
    // ------------------------------------------------------------------------

    /// The system button under `pos` (window coordinates).
    pub fn is_in_system_buttons(&self, pos: Point) -> Option<SystemButtonType> {
        self.inner.is_in_system_buttons(pos)
    }

    /// Whether `pos` (window coordinates) drags the window.
    pub fn is_in_title_bar_draggable_area(&self, pos: Point) -> bool {
        self.inner.is_in_title_bar_draggable_area(pos)
    }

    /// Whether pointer input at `pos` should be left to native edge resizing.
    pub fn should_ignore_mouse_events(&self, pos: Point) -> bool {
        self.inner.should_ignore_mouse_events(pos)
    }

    /// Drive the visual state of a system button from the real cursor.
    pub fn set_system_button_state(&self, kind: SystemButtonType, state: ButtonState) {
        self.inner.set_system_button_state(kind, state);
    }

    // ------------------------------------------------------------------------
    // Window operations
    // ------------------------------------------------------------------------

    /// Open the native system menu at `pos` (window coordinates).
    pub fn show_system_menu(&self, pos: Point) {
        self.inner.show_system_menu(pos);
    }

    /// Start a platform-driven move from `pos` (window coordinates).
    pub fn window_start_system_move2(&self, pos: Point) {
        self.inner.window_start_system_move2(pos);
    }

    /// Start a platform-driven resize on `edges`. Empty edges do nothing.
    pub fn window_start_system_resize2(&self, edges: Edges, pos: Point) {
        self.inner.window_start_system_resize2(edges, pos);
    }

    /// Start a platform-driven resize in `direction`.
    pub fn window_start_system_resize(&self, direction: ResizeDirection, pos: Point) {
        self.inner.window_start_system_resize(direction, pos);
    }

    pub fn move_window_to_desktop_center(&self) {
        self.inner.move_window_to_desktop_center();
    }

    pub fn bring_window_to_front(&self) {
        self.inner.bring_window_to_front();
    }

    pub fn is_window_fixed_size(&self) -> bool {
        self.inner.is_window_fixed_size()
    }

    /// Pin the window to its current size, or release it.
    pub fn set_window_fixed_size(&self, value: bool) {
        self.inner.set_window_fixed_size(value);
    }

    pub fn is_blur_behind_window_enabled(&self) -> bool {
        self.inner.is_blur_behind_window_enabled()
    }

    /// Toggle blur behind the window, falling back to a software backdrop
    /// when the platform cannot blur.
    pub fn set_blur_behind_window_enabled(&self, enable: bool) {
        self.inner.set_blur_behind_window_enabled(enable, None);
    }

    /// Like [`set_blur_behind_window_enabled`](Self::set_blur_behind_window_enabled)
    /// with a tint color for the native blur.
    pub fn set_blur_behind_window_enabled_with_tint(&self, enable: bool, tint: Color) {
        self.inner.set_blur_behind_window_enabled(enable, Some(tint));
    }

    /// The blur fallback helper of the bound window.
    pub fn shared_helper(&self) -> Option<Arc<dyn SharedHelper>> {
        self.inner.shared_helper()
    }

    pub fn set_property(&self, name: &str, value: PropertyValue) {
        self.inner.set_property(name, value);
    }

    /// A named window property, or `default` if unset.
    pub fn get_property(&self, name: &str, default: PropertyValue) -> PropertyValue {
        self.inner.get_property(name, default)
    }

    /// Repaint the window and all its descendants, after `delay` if nonzero.
    pub fn repaint_all_children(&self, delay: Duration) {
        self.inner.repaint_all_children(delay);
    }

    // ------------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------------

    pub fn title_bar_widget_changed(&self) -> &Signal<()> {
        &self.inner.signals.title_bar_widget_changed
    }

    /// Emitted when the helper binds to or unbinds from a window.
    pub fn window_changed(&self) -> &Signal<()> {
        &self.inner.signals.window_changed
    }

    /// Emitted when the bound window becomes platform-ready.
    pub fn ready(&self) -> &Signal<()> {
        &self.inner.signals.ready
    }

    pub fn extends_content_into_title_bar_changed(&self) -> &Signal<()> {
        &self.inner.signals.extends_content_into_title_bar_changed
    }

    pub fn window_fixed_size_changed(&self) -> &Signal<()> {
        &self.inner.signals.window_fixed_size_changed
    }

    pub fn blur_behind_window_enabled_changed(&self) -> &Signal<()> {
        &self.inner.signals.blur_behind_window_enabled_changed
    }
}

impl std::fmt::Debug for FramelessWidgetsHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramelessWidgetsHelper")
            .field("parent", &self.inner.parent)
            .field("window_id", &self.window_id())
            .field("state", &self.lifecycle_state())
            .finish()
    }
}

static_assertions::assert_impl_all!(FramelessWidgetsHelper: Send, Sync);
