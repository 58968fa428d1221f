//! Horizon Frameless - custom title bars for frameless top-level windows.
//!
//! A frameless window draws its own title bar, so the application has to tell
//! the native windowing system which parts of that title bar drag the window,
//! where the minimize, maximize and close buttons are, and which child
//! controls (search boxes, menus) still receive ordinary pointer input.
//! [`FramelessWidgetsHelper`] keeps that information per native window and
//! answers the platform layer's hit-test queries through a
//! [`SystemParameters`] record registered with a [`FramelessManager`].
//!
//! The host toolkit plugs in through three seams:
//!
//! - [`Widget`] and [`TopLevelWindow`] expose its widgets and windows
//! - [`PlatformIntegration`] performs native operations (system move and
//!   resize, blur, system menu, cursor position)
//! - [`FramelessManager`] receives window registrations
//!
//! # Example
//!
//! ```ignore
//! use horizon_frameless::{
//!     FramelessConfig, FramelessContext, FramelessWidgetsHelper, SystemButtonType,
//! };
//!
//! let context = FramelessContext::builder()
//!     .platform(platform)
//!     .config(FramelessConfig::load(None)?)
//!     .build();
//!
//! let helper = FramelessWidgetsHelper::get_or_create(&context, &window);
//! helper.set_title_bar_widget(&title_bar);
//! helper.set_system_button(&close_button, SystemButtonType::Close);
//! helper.wait_for_ready();
//! ```

pub mod backdrop;
pub mod buttons;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod helper;
pub mod manager;
pub mod params;
pub mod platform;
pub mod store;
pub mod synthesizer;
pub mod widget;
pub mod window;

#[cfg(test)]
mod test_support;

pub use backdrop::{BackdropFactory, SharedHelper, SoftwareBackdrop};
pub use buttons::{ButtonState, SystemButtonType, SystemButtons, locate_system_button};
pub use config::{FramelessConfig, FramelessOption};
pub use context::{FramelessContext, FramelessContextBuilder};
pub use error::{FramelessError, FramelessResult};
pub use helper::{FramelessWidgetsHelper, LifecycleState};
pub use hit_test::{draggable_region, is_in_draggable_area};
pub use manager::{FramelessManager, FramelessWindowRegistry};
pub use params::SystemParameters;
pub use platform::{BlurMode, HeadlessPlatform, PlatformIntegration};
pub use store::{WindowData, WindowStateStore};
pub use synthesizer::{SyntheticMouseEvent, synthesize_button_state};
pub use widget::{SizePolicy, SizePolicyPair, Widget, WidgetHandle, WidgetId};
pub use window::{
    Edges, PropertyValue, ScreenInfo, TopLevelWindow, WindowAttribute, WindowFlags,
    WindowIdentity, WindowState,
};

pub use horizon_frameless_core::{Color, EventLoop, Point, Rect, Region, Signal, Size};
