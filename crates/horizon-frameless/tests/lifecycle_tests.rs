//! Tests for attaching, readiness and detaching of frameless helpers.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{MockWindow, PlatformCall, counter, harness, harness_with};
use horizon_frameless::{
    BlurMode, Color, FramelessConfig, FramelessOption, FramelessWidgetsHelper, LifecycleState,
    Point, Rect, SharedHelper, TopLevelWindow, Widget, WindowAttribute,
};

#[test]
fn test_attach_registers_window() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    assert_eq!(helper.lifecycle_state(), LifecycleState::Detached);

    helper.extends_content_into_title_bar(true);

    let id = helper.window_id().unwrap();
    assert!(helper.is_content_extended_into_title_bar());
    assert!(h.registry.contains(id));
    assert!(h.context.store().get(id).ready);
    assert_eq!(helper.lifecycle_state(), LifecycleState::AttachedPendingPlatformReady);
    assert!(!helper.is_ready());
    assert!(window.test_attribute(WindowAttribute::NativeWindow));
    assert!(window.test_attribute(WindowAttribute::DontCreateNativeAncestors));
}

#[test]
fn test_wait_for_ready_pumps_until_ready() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    let (ready, on_ready) = counter();
    helper.ready().connect(on_ready);

    helper.extends_content_into_title_bar(true);
    assert!(helper.wait_for_ready_timeout(Duration::from_secs(2)));

    assert!(helper.is_ready());
    assert_eq!(helper.lifecycle_state(), LifecycleState::Ready);
    assert_eq!(ready.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wait_for_ready_when_detached_returns_immediately() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());

    assert!(!helper.wait_for_ready_timeout(Duration::from_secs(5)));
    helper.wait_for_ready();
    assert!(!helper.is_ready());
}

#[test]
fn test_extends_twice_attaches_once() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    let (added, on_added) = counter();
    h.registry.window_added().connect(move |_| on_added(&()));
    let (changed, on_changed) = counter();
    helper.extends_content_into_title_bar_changed().connect(on_changed);

    helper.extends_content_into_title_bar(true);
    helper.extends_content_into_title_bar(true);

    assert_eq!(added.load(Ordering::SeqCst), 1);
    assert_eq!(changed.load(Ordering::SeqCst), 1);
    assert_eq!(h.registry.count(), 1);
}

#[test]
fn test_detach_erases_window_state() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);
    let id = helper.window_id().unwrap();

    let (window_changed, on_window_changed) = counter();
    helper.window_changed().connect(on_window_changed);
    helper.extends_content_into_title_bar(false);

    assert!(!helper.is_content_extended_into_title_bar());
    assert!(!h.context.store().contains(id));
    assert!(!h.registry.contains(id));
    assert_eq!(helper.lifecycle_state(), LifecycleState::Detached);
    assert_eq!(helper.window_id(), None);
    assert_eq!(window_changed.load(Ordering::SeqCst), 1);

    helper.extends_content_into_title_bar(false);
    assert_eq!(window_changed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stale_ready_callback_is_ignored() {
    let h = harness_with(FramelessConfig::new().with_ready_wait_time(Duration::from_millis(5)));
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());

    helper.extends_content_into_title_bar(true);
    helper.extends_content_into_title_bar(false);
    helper.set_ready_wait_time(Duration::from_secs(30));
    helper.extends_content_into_title_bar(true);

    h.context.event_loop().run_for(Duration::from_millis(50));
    assert_eq!(helper.lifecycle_state(), LifecycleState::AttachedPendingPlatformReady);
    assert!(!helper.wait_for_ready_timeout(Duration::from_millis(20)));
}

#[test]
fn test_window_without_native_handle_stays_detached() {
    let h = harness();
    let window = MockWindow::without_native_handle(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());

    helper.extends_content_into_title_bar(true);

    assert_eq!(helper.lifecycle_state(), LifecycleState::Detached);
    assert!(!helper.is_content_extended_into_title_bar());
    assert_eq!(h.registry.count(), 0);
}

#[test]
fn test_second_helper_shares_window_state() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let title_bar = window.add_widget(None, Rect::new(0.0, 0.0, 800.0, 40.0));

    let first = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    first.extends_content_into_title_bar(true);
    let second = FramelessWidgetsHelper::new(&h.context, &title_bar.as_widget());
    second.extends_content_into_title_bar(true);

    assert_eq!(h.registry.count(), 1);
    assert_eq!(second.window_id(), first.window_id());
    assert_eq!(second.lifecycle_state(), LifecycleState::AttachedPendingPlatformReady);

    second.set_title_bar_widget(&title_bar.as_widget());
    let seen = first.title_bar_widget().unwrap();
    assert_eq!(seen.widget_id(), title_bar.widget_id());

    assert!(first.wait_for_ready_timeout(Duration::from_secs(2)));
    assert!(second.is_ready());
}

#[test]
fn test_dropping_pending_sibling_detaches_survivor() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let title_bar = window.add_widget(None, Rect::new(0.0, 0.0, 800.0, 40.0));

    let first = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    first.extends_content_into_title_bar(true);
    let second = FramelessWidgetsHelper::new(&h.context, &title_bar.as_widget());
    second.extends_content_into_title_bar(true);
    assert_eq!(second.lifecycle_state(), LifecycleState::AttachedPendingPlatformReady);

    let (window_changed, on_window_changed) = counter();
    second.window_changed().connect(on_window_changed);
    drop(first);

    assert_eq!(second.lifecycle_state(), LifecycleState::Detached);
    assert!(!second.is_content_extended_into_title_bar());
    assert_eq!(second.window_id(), None);
    assert_eq!(h.registry.count(), 0);
    assert_eq!(window_changed.load(Ordering::SeqCst), 1);

    // Nothing is pending any more, so both waits return at once.
    assert!(!second.wait_for_ready_timeout(Duration::from_millis(500)));
    second.wait_for_ready();

    second.extends_content_into_title_bar(true);
    assert_eq!(h.registry.count(), 1);
    assert!(second.wait_for_ready_timeout(Duration::from_secs(2)));
}

#[test]
fn test_detaching_one_helper_detaches_ready_siblings() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let title_bar = window.add_widget(None, Rect::new(0.0, 0.0, 800.0, 40.0));

    let first = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    first.extends_content_into_title_bar(true);
    let second = FramelessWidgetsHelper::new(&h.context, &title_bar.as_widget());
    second.extends_content_into_title_bar(true);
    assert!(first.wait_for_ready_timeout(Duration::from_secs(2)));
    assert!(second.is_ready());

    second.extends_content_into_title_bar(false);

    assert_eq!(first.lifecycle_state(), LifecycleState::Detached);
    assert!(!first.is_content_extended_into_title_bar());
    assert!(!first.is_in_title_bar_draggable_area(Point::new(10.0, 10.0)));
}

#[test]
fn test_get_or_create_reuses_window_helper() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let button = window.add_widget(None, Rect::new(10.0, 10.0, 20.0, 20.0));

    let a = FramelessWidgetsHelper::get_or_create(&h.context, &button.as_widget());
    let b = FramelessWidgetsHelper::get_or_create(&h.context, &window.as_widget());

    assert!(a.is_content_extended_into_title_bar());
    assert_eq!(a.window_id(), b.window_id());
    assert_eq!(h.context.helper_count(), 1);
}

#[test]
fn test_dropping_last_handle_detaches() {
    let h = harness();
    let window = MockWindow::new(800.0, 600.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);
    let id = helper.window_id().unwrap();

    let clone = helper.clone();
    drop(helper);
    assert!(h.registry.contains(id));

    drop(clone);
    assert!(!h.registry.contains(id));
    assert!(!h.context.store().contains(id));
    assert_eq!(h.context.helper_count(), 0);
}

#[test]
fn test_center_before_show_runs_on_ready() {
    let config = FramelessConfig::new()
        .with_ready_wait_time(Duration::from_millis(5))
        .with_option(FramelessOption::CenterWindowBeforeShow);
    let h = harness_with(config);
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());

    helper.extends_content_into_title_bar(true);
    assert_eq!(window.pos(), Point::ZERO);
    assert!(helper.wait_for_ready_timeout(Duration::from_secs(2)));
    assert_eq!(window.pos(), Point::new(760.0, 370.0));
}

#[test]
fn test_blur_on_ready_uses_native_blur() {
    let config = FramelessConfig::new()
        .with_ready_wait_time(Duration::from_millis(5))
        .with_option(FramelessOption::EnableBlurBehindWindow);
    let h = harness_with(config);
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    let (blur_changed, on_blur_changed) = counter();
    helper.blur_behind_window_enabled_changed().connect(on_blur_changed);

    helper.extends_content_into_title_bar(true);
    assert!(helper.wait_for_ready_timeout(Duration::from_secs(2)));

    assert!(helper.is_blur_behind_window_enabled());
    assert_eq!(window.background_color(), Color::TRANSPARENT);
    assert_eq!(h.platform.calls(), vec![PlatformCall::Blur(BlurMode::Default, None)]);

    helper.set_blur_behind_window_enabled(false);
    assert!(!helper.is_blur_behind_window_enabled());
    assert_eq!(window.background_color(), Color::WHITE);
    assert_eq!(blur_changed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_forced_software_blur_skips_platform() {
    let config = FramelessConfig::new().with_option(FramelessOption::ForceNonNativeBackgroundBlur);
    let h = harness_with(config);
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);

    helper.set_blur_behind_window_enabled(true);

    assert!(helper.is_blur_behind_window_enabled());
    assert!(h.platform.calls().is_empty());
    assert!(helper.shared_helper().unwrap().is_mica_enabled());
}

#[test]
fn test_software_backdrop_is_released_on_detach() {
    let config = FramelessConfig::new().with_option(FramelessOption::ForceNonNativeBackgroundBlur);
    let h = harness_with(config);
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());

    helper.extends_content_into_title_bar(true);
    helper.set_blur_behind_window_enabled(true);
    assert_eq!(h.context.shared_helper_count(), 1);

    helper.extends_content_into_title_bar(false);
    assert_eq!(h.context.shared_helper_count(), 0);

    helper.extends_content_into_title_bar(true);
    helper.set_blur_behind_window_enabled(true);
    assert_eq!(h.context.shared_helper_count(), 1);

    drop(helper);
    assert_eq!(h.context.shared_helper_count(), 0);
}

#[test]
fn test_software_backdrops_of_destroyed_windows_are_pruned() {
    let config = FramelessConfig::new().with_option(FramelessOption::ForceNonNativeBackgroundBlur);
    let h = harness_with(config);

    let gone = MockWindow::new(400.0, 300.0);
    let gone_widget = gone.as_widget();
    let helper = FramelessWidgetsHelper::new(&h.context, &gone_widget);
    helper.extends_content_into_title_bar(true);
    helper.set_blur_behind_window_enabled(true);
    assert_eq!(h.context.shared_helper_count(), 1);
    drop(gone_widget);
    drop(gone);

    let window = MockWindow::new(400.0, 300.0);
    let other = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    other.extends_content_into_title_bar(true);
    other.set_blur_behind_window_enabled(true);

    assert_eq!(h.context.shared_helper_count(), 1);
    drop(helper);
}

#[test]
fn test_fixed_size_toggles_snapping() {
    let h = harness();
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);

    helper.set_window_fixed_size(true);
    helper.set_window_fixed_size(false);

    assert_eq!(
        h.platform.calls(),
        vec![PlatformCall::Snapping(false), PlatformCall::Snapping(true)]
    );
}

#[test]
fn test_repaint_reaches_descendants() {
    let h = harness();
    let window = MockWindow::new(400.0, 300.0);
    let bar = window.add_widget(None, Rect::new(0.0, 0.0, 400.0, 40.0));
    let button = window.add_widget(Some(&bar), Rect::new(360.0, 0.0, 40.0, 40.0));
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);

    helper.repaint_all_children(Duration::ZERO);

    assert_eq!(window.repaint_count(), 1);
    assert_eq!(bar.repaint_count(), 1);
    assert_eq!(button.repaint_count(), 1);
    assert_eq!(h.platform.calls(), vec![PlatformCall::FrameMargins]);
}

#[test]
fn test_helper_is_usable_from_another_thread() {
    let h = harness();
    let window = MockWindow::new(400.0, 300.0);
    let helper = FramelessWidgetsHelper::new(&h.context, &window.as_widget());
    helper.extends_content_into_title_bar(true);

    let remote = helper.clone();
    let answer = std::thread::spawn(move || remote.is_in_title_bar_draggable_area(Point::new(5.0, 5.0)))
        .join()
        .unwrap();
    assert!(!answer);
}
