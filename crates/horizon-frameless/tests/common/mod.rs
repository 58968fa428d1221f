//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use cursor_icon::CursorIcon;
use horizon_frameless::{
    BlurMode, Color, FramelessConfig, FramelessContext, FramelessError, FramelessResult,
    FramelessWindowRegistry, PlatformIntegration, Point, PropertyValue, Rect, ScreenInfo,
    SizePolicyPair, Size, SyntheticMouseEvent, SystemParameters, TopLevelWindow, Widget, WidgetId,
    WindowAttribute, WindowFlags, WindowIdentity, WindowState,
};
use parking_lot::Mutex;
use winit::window::ResizeDirection;

/// Route `tracing` output to the test harness. `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Widgets
// ============================================================================

pub struct MockWidget {
    id: WidgetId,
    parent: Weak<dyn Widget>,
    geometry: Mutex<Rect>,
    visible: AtomicBool,
    enabled: AtomicBool,
    repaints: AtomicUsize,
    events: Mutex<Vec<SyntheticMouseEvent>>,
}

impl MockWidget {
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_geometry(&self, rect: Rect) {
        *self.geometry.lock() = rect;
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<SyntheticMouseEvent> {
        self.events.lock().clone()
    }

    pub fn as_widget(self: &Arc<Self>) -> Arc<dyn Widget> {
        self.clone()
    }
}

impl Widget for MockWidget {
    fn widget_id(&self) -> WidgetId {
        self.id
    }

    fn pos(&self) -> Point {
        self.geometry.lock().origin
    }

    fn size(&self) -> Size {
        self.geometry.lock().size
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn parent_widget(&self) -> Option<Arc<dyn Widget>> {
        self.parent.upgrade()
    }

    fn window(&self) -> Option<Arc<dyn TopLevelWindow>> {
        self.parent_widget()?.window()
    }

    fn handle_synthetic_mouse_event(&self, event: &SyntheticMouseEvent) {
        self.events.lock().push(*event);
    }

    fn request_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Window
// ============================================================================

struct WindowProps {
    pos: Point,
    size: Size,
    visible: bool,
    flags: WindowFlags,
    state: WindowState,
    attributes: Vec<WindowAttribute>,
    background: Color,
    policy: SizePolicyPair,
    minimum: Size,
    maximum: Size,
    properties: HashMap<String, PropertyValue>,
    cursor: Option<CursorIcon>,
}

pub struct MockWindow {
    id: WidgetId,
    self_ref: Weak<MockWindow>,
    has_native_handle: bool,
    props: Mutex<WindowProps>,
    children: Mutex<Vec<Weak<MockWidget>>>,
    repaints: AtomicUsize,
}

impl MockWindow {
    pub fn new(width: f32, height: f32) -> Arc<Self> {
        Self::build(width, height, true)
    }

    /// A window whose native handle has not been created.
    pub fn without_native_handle(width: f32, height: f32) -> Arc<Self> {
        Self::build(width, height, false)
    }

    fn build(width: f32, height: f32, has_native_handle: bool) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            id: WidgetId::new_unique(),
            self_ref: self_ref.clone(),
            has_native_handle,
            props: Mutex::new(WindowProps {
                pos: Point::ZERO,
                size: Size::new(width, height),
                visible: true,
                flags: WindowFlags::FRAMELESS,
                state: WindowState::Normal,
                attributes: Vec::new(),
                background: Color::WHITE,
                policy: SizePolicyPair::default(),
                minimum: Size::ZERO,
                maximum: Size::new(16_777_215.0, 16_777_215.0),
                properties: HashMap::new(),
                cursor: None,
            }),
            children: Mutex::new(Vec::new()),
            repaints: AtomicUsize::new(0),
        })
    }

    /// Add a child widget, inside `parent` or directly in the window.
    pub fn add_widget(self: &Arc<Self>, parent: Option<&Arc<MockWidget>>, rect: Rect) -> Arc<MockWidget> {
        let parent: Arc<dyn Widget> = match parent {
            Some(parent) => parent.clone(),
            None => self.clone(),
        };
        let widget = Arc::new(MockWidget {
            id: WidgetId::new_unique(),
            parent: Arc::downgrade(&parent),
            geometry: Mutex::new(rect),
            visible: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            repaints: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        });
        self.children.lock().push(Arc::downgrade(&widget));
        widget
    }

    pub fn as_widget(self: &Arc<Self>) -> Arc<dyn Widget> {
        self.clone()
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }
}

impl Widget for MockWindow {
    fn widget_id(&self) -> WidgetId {
        self.id
    }

    fn pos(&self) -> Point {
        self.props.lock().pos
    }

    fn size(&self) -> Size {
        self.props.lock().size
    }

    fn is_visible(&self) -> bool {
        self.props.lock().visible
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn parent_widget(&self) -> Option<Arc<dyn Widget>> {
        None
    }

    fn window(&self) -> Option<Arc<dyn TopLevelWindow>> {
        let window: Arc<dyn TopLevelWindow> = self.self_ref.upgrade()?;
        Some(window)
    }

    fn request_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
    }
}

impl TopLevelWindow for MockWindow {
    fn native_id(&self) -> Option<WindowIdentity> {
        self.has_native_handle
            .then(|| WindowIdentity::from_raw(self.id.as_raw()))
    }

    fn test_attribute(&self, attribute: WindowAttribute) -> bool {
        self.props.lock().attributes.contains(&attribute)
    }

    fn set_attribute(&self, attribute: WindowAttribute, on: bool) {
        let mut props = self.props.lock();
        props.attributes.retain(|existing| *existing != attribute);
        if on {
            props.attributes.push(attribute);
        }
    }

    fn window_flags(&self) -> WindowFlags {
        self.props.lock().flags
    }

    fn set_window_flags(&self, flags: WindowFlags) {
        self.props.lock().flags = flags;
    }

    fn resize(&self, size: Size) {
        self.props.lock().size = size;
    }

    fn move_to(&self, pos: Point) {
        self.props.lock().pos = pos;
    }

    fn window_state(&self) -> WindowState {
        self.props.lock().state
    }

    fn set_window_state(&self, state: WindowState) {
        self.props.lock().state = state;
    }

    fn screen(&self) -> Option<ScreenInfo> {
        Some(ScreenInfo {
            geometry: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            available_geometry: Rect::new(0.0, 0.0, 1920.0, 1040.0),
            device_pixel_ratio: 1.0,
        })
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        self.props.lock().cursor = Some(cursor);
    }

    fn unset_cursor(&self) {
        self.props.lock().cursor = None;
    }

    fn size_policy(&self) -> SizePolicyPair {
        self.props.lock().policy
    }

    fn set_size_policy(&self, policy: SizePolicyPair) {
        self.props.lock().policy = policy;
    }

    fn minimum_size(&self) -> Size {
        self.props.lock().minimum
    }

    fn maximum_size(&self) -> Size {
        self.props.lock().maximum
    }

    fn set_minimum_size(&self, size: Size) {
        self.props.lock().minimum = size;
    }

    fn set_maximum_size(&self, size: Size) {
        self.props.lock().maximum = size;
    }

    fn background_color(&self) -> Color {
        self.props.lock().background
    }

    fn set_background_color(&self, color: Color) {
        self.props.lock().background = color;
    }

    fn property(&self, name: &str) -> Option<PropertyValue> {
        self.props.lock().properties.get(name).cloned()
    }

    fn set_property(&self, name: &str, value: PropertyValue) {
        self.props.lock().properties.insert(name.to_owned(), value);
    }

    fn show(&self) {
        self.props.lock().visible = true;
    }

    fn raise(&self) {}

    fn activate_window(&self) {}

    fn descendants(&self) -> Vec<Arc<dyn Widget>> {
        self.children
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|child| child as Arc<dyn Widget>)
            .collect()
    }
}

// ============================================================================
// Platform
// ============================================================================

/// A native operation requested by the helper.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    SystemMove(Point),
    SystemResize(ResizeDirection, Point),
    Blur(BlurMode, Option<Color>),
    Snapping(bool),
    FrameMargins,
    SystemMenu(Point),
}

/// A platform that records every request and supports native blur.
#[derive(Default)]
pub struct RecordingPlatform {
    cursor: Mutex<Point>,
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_cursor_position(&self, pos: Point) {
        *self.cursor.lock() = pos;
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: PlatformCall) -> FramelessResult<()> {
        self.calls.lock().push(call);
        Ok(())
    }
}

impl PlatformIntegration for RecordingPlatform {
    fn start_system_move(&self, _window: &dyn TopLevelWindow, pos: Point) -> FramelessResult<()> {
        self.record(PlatformCall::SystemMove(pos))
    }

    fn start_system_resize(
        &self,
        _window: &dyn TopLevelWindow,
        direction: ResizeDirection,
        pos: Point,
    ) -> FramelessResult<()> {
        self.record(PlatformCall::SystemResize(direction, pos))
    }

    fn is_blur_behind_window_supported(&self) -> bool {
        true
    }

    fn set_blur_behind_window_enabled(
        &self,
        _id: WindowIdentity,
        mode: BlurMode,
        tint: Option<Color>,
    ) -> FramelessResult<()> {
        self.record(PlatformCall::Blur(mode, tint))
    }

    fn set_aero_snapping_enabled(&self, _id: WindowIdentity, enabled: bool) -> FramelessResult<()> {
        self.record(PlatformCall::Snapping(enabled))
    }

    fn update_internal_window_frame_margins(
        &self,
        _window: &dyn TopLevelWindow,
        _force: bool,
    ) -> FramelessResult<()> {
        self.record(PlatformCall::FrameMargins)
    }

    fn bring_window_to_front(&self, _window: &dyn TopLevelWindow) -> FramelessResult<()> {
        Err(FramelessError::Platform("no foreground permission".into()))
    }

    fn show_system_menu(
        &self,
        _id: WindowIdentity,
        native_pos: Point,
        _params: &SystemParameters,
    ) -> FramelessResult<()> {
        self.record(PlatformCall::SystemMenu(native_pos))
    }

    fn cursor_position(&self, _screen: Option<&ScreenInfo>) -> Point {
        *self.cursor.lock()
    }
}

// ============================================================================
// Context
// ============================================================================

pub struct Harness {
    pub context: Arc<FramelessContext>,
    pub registry: Arc<FramelessWindowRegistry>,
    pub platform: Arc<RecordingPlatform>,
}

/// A context with a recording platform and a short ready delay.
pub fn harness() -> Harness {
    harness_with(FramelessConfig::new().with_ready_wait_time(Duration::from_millis(10)))
}

pub fn harness_with(config: FramelessConfig) -> Harness {
    init_tracing();
    let registry = Arc::new(FramelessWindowRegistry::new());
    let platform = RecordingPlatform::new();
    let context = FramelessContext::builder()
        .manager(registry.clone())
        .platform(platform.clone())
        .config(config)
        .build();
    Harness {
        context,
        registry,
        platform,
    }
}

/// Count emissions of a `()` signal.
pub fn counter() -> (Arc<AtomicUsize>, impl Fn(&()) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move |_: &()| {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}
