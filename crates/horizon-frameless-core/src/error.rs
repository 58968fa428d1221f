//! Error types for Horizon Frameless core.

use thiserror::Error;

use crate::event_loop::TimerId;

/// Errors produced by the core event loop and timer system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The timer was never scheduled, already fired, or was cancelled.
    #[error("invalid timer id: {0:?}")]
    InvalidTimerId(TimerId),
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
