//! Core systems for Horizon Frameless.
//!
//! This crate provides the toolkit-independent building blocks the frameless
//! window helper is assembled from:
//!
//! - **Event Loop**: a cooperative, single-threaded task and timer queue with
//!   nested loops for blocking waits
//! - **Signals**: connect/emit notifications
//! - **Geometry**: points, sizes, rectangles and colors
//! - **Regions**: rectangle algebra for hit-test areas
//! - **Thread Affinity**: debug checks for UI-thread-only operations
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_frameless_core::{EventLoop, Signal};
//!
//! let event_loop = EventLoop::new();
//! let fired = Arc::new(Signal::<()>::new());
//!
//! let nested = event_loop.nested();
//! let quit = nested.quit_handle();
//! fired.connect(move |_| quit.quit());
//!
//! let signal = fired.clone();
//! event_loop.single_shot(Duration::from_millis(1), move || signal.emit(()));
//! nested.exec();
//! ```

pub mod error;
pub mod event_loop;
pub mod logging;
pub mod region;
pub mod signal;
pub mod thread_check;
pub mod types;

pub use error::{CoreError, Result};
pub use event_loop::{EventLoop, NestedLoop, QuitHandle, TimerId};
pub use region::Region;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use types::{Color, Point, Rect, Size};
