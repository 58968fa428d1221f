//! In-memory widgets and windows for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use cursor_icon::CursorIcon;
use horizon_frameless_core::{Color, Point, Rect, Size};
use parking_lot::Mutex;

use crate::synthesizer::SyntheticMouseEvent;
use crate::widget::{SizePolicyPair, Widget, WidgetId};
use crate::window::{
    PropertyValue, ScreenInfo, TopLevelWindow, WindowAttribute, WindowFlags, WindowIdentity,
    WindowState,
};

pub struct TestWidget {
    id: WidgetId,
    parent: Option<Weak<dyn Widget>>,
    geometry: Mutex<Rect>,
    visible: AtomicBool,
    enabled: AtomicBool,
    hover_tracking: AtomicBool,
    events: Mutex<Vec<SyntheticMouseEvent>>,
}

impl TestWidget {
    pub fn new(parent: Option<Arc<dyn Widget>>, x: f32, y: f32, width: f32, height: f32) -> Arc<Self> {
        Arc::new(Self {
            id: WidgetId::new_unique(),
            parent: parent.as_ref().map(Arc::downgrade),
            geometry: Mutex::new(Rect::new(x, y, width, height)),
            visible: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            hover_tracking: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn as_widget(self: &Arc<Self>) -> Arc<dyn Widget> {
        self.clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_hover_tracking(&self, on: bool) {
        self.hover_tracking.store(on, Ordering::SeqCst);
    }

    pub fn set_geometry(&self, rect: Rect) {
        *self.geometry.lock() = rect;
    }

    pub fn events(&self) -> Vec<SyntheticMouseEvent> {
        self.events.lock().clone()
    }
}

impl Widget for TestWidget {
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
        self.parent.as_ref()?.upgrade()
    }

    fn window(&self) -> Option<Arc<dyn TopLevelWindow>> {
        self.parent_widget()?.window()
    }

    fn has_hover_tracking(&self) -> bool {
        self.hover_tracking.load(Ordering::SeqCst)
    }

    fn handle_synthetic_mouse_event(&self, event: &SyntheticMouseEvent) {
        self.events.lock().push(*event);
    }
}

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
    screen: ScreenInfo,
}

/// A top-level window on a 1920x1080 screen with a 40px taskbar.
pub struct TestWindow {
    id: WidgetId,
    self_ref: Weak<TestWindow>,
    native: AtomicBool,
    props: Mutex<WindowProps>,
    repaints: AtomicUsize,
    activations: AtomicUsize,
}

impl TestWindow {
    pub fn new(width: f32, height: f32) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            id: WidgetId::new_unique(),
            self_ref: self_ref.clone(),
            native: AtomicBool::new(true),
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
                screen: ScreenInfo {
                    geometry: Rect::new(0.0, 0.0, 1920.0, 1080.0),
                    available_geometry: Rect::new(0.0, 0.0, 1920.0, 1040.0),
                    device_pixel_ratio: 1.0,
                },
            }),
            repaints: AtomicUsize::new(0),
            activations: AtomicUsize::new(0),
        })
    }

    pub fn as_widget(self: &Arc<Self>) -> Arc<dyn Widget> {
        self.clone()
    }

    pub fn as_window(self: &Arc<Self>) -> Arc<dyn TopLevelWindow> {
        self.clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.props.lock().visible = visible;
    }

    pub fn set_native_handle(&self, present: bool) {
        self.native.store(present, Ordering::SeqCst);
    }

    pub fn set_device_pixel_ratio(&self, ratio: f64) {
        self.props.lock().screen.device_pixel_ratio = ratio;
    }

    pub fn cursor(&self) -> Option<CursorIcon> {
        self.props.lock().cursor
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }

    pub fn activation_count(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl Widget for TestWindow {
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

impl TopLevelWindow for TestWindow {
    fn native_id(&self) -> Option<WindowIdentity> {
        self.native
            .load(Ordering::SeqCst)
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
        Some(self.props.lock().screen)
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

    fn activate_window(&self) {
        self.activations.fetch_add(1, Ordering::SeqCst);
    }
}
