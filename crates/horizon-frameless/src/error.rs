//! Error types for the frameless helper.
//!
//! Public helper operations never return these: they absorb failures and log
//! them. Errors surface from the seams the helper consumes (platform
//! integration, configuration loading).

use thiserror::Error;

/// Errors raised by platform integrations and configuration loading.
#[derive(Error, Debug)]
pub enum FramelessError {
    /// The platform does not provide this capability.
    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),

    /// The window has no native handle yet.
    #[error("window has no native handle")]
    NoNativeHandle,

    /// A platform call was attempted and failed.
    #[error("platform call failed: {0}")]
    Platform(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`FramelessConfig`](crate::FramelessConfig).
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An option name did not match any [`FramelessOption`](crate::FramelessOption).
    #[error("unknown frameless option: {0:?}")]
    UnknownOption(String),
}

impl FramelessError {
    /// Whether the error only reports a missing capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// A specialized Result type for frameless operations.
pub type FramelessResult<T> = std::result::Result<T, FramelessError>;
