//! Logging facilities for Horizon Frameless.
//!
//! Horizon Frameless uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_frameless=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Event loop target.
    pub const EVENT_LOOP: &str = "horizon_frameless_core::event_loop";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_frameless_core::signal";
    /// Frameless helper lifecycle target.
    pub const HELPER: &str = "horizon_frameless::helper";
    /// Hit-testing (draggable area, system buttons) target.
    pub const HIT_TEST: &str = "horizon_frameless::hit_test";
    /// Per-window state store target.
    pub const STORE: &str = "horizon_frameless::store";
    /// Frameless window manager target.
    pub const MANAGER: &str = "horizon_frameless::manager";
    /// Platform integration target.
    pub const PLATFORM: &str = "horizon_frameless::platform";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_frameless::config";
}
