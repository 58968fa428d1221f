//! Process-wide frameless configuration.
//!
//! [`FramelessConfig`] carries the option flags that change helper behavior
//! (centering on first show, blur, frame border handling) and two tunables:
//! the default platform-ready wait and the resize border thickness.
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! environment variables.
//!
//! ```toml
//! ready_wait_time_ms = 50
//! resize_border_thickness = 8.0
//! options = ["center_window_before_show", "enable_blur_behind_window"]
//! ```
//!
//! Each option can also be toggled with `HORIZON_FRAMELESS_<OPTION>`, e.g.
//! `HORIZON_FRAMELESS_CENTER_WINDOW_BEFORE_SHOW=1`.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use horizon_frameless_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{FramelessError, FramelessResult};

/// Prefix of every environment variable read by [`FramelessConfig::from_env`].
pub const ENV_PREFIX: &str = "HORIZON_FRAMELESS_";

/// Border band, in logical pixels, in which the helper yields pointer input
/// to native resizing.
pub const DEFAULT_RESIZE_BORDER_THICKNESS: f32 = 8.0;

/// Delay between attaching and declaring the window platform-ready.
pub const DEFAULT_READY_WAIT_TIME: Duration = Duration::from_millis(50);

/// Behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramelessOption {
    /// Center the window on its screen when it becomes ready.
    CenterWindowBeforeShow,
    /// Enable blur behind the window when it becomes ready.
    EnableBlurBehindWindow,
    /// Treat the native frame border as absent.
    ForceHideWindowFrameBorder,
    /// Treat the native frame border as present.
    ForceShowWindowFrameBorder,
    /// Never fall back to a software backdrop.
    ForceNativeBackgroundBlur,
    /// Always use the software backdrop, even if native blur is available.
    ForceNonNativeBackgroundBlur,
}

impl FramelessOption {
    pub const ALL: [FramelessOption; 6] = [
        FramelessOption::CenterWindowBeforeShow,
        FramelessOption::EnableBlurBehindWindow,
        FramelessOption::ForceHideWindowFrameBorder,
        FramelessOption::ForceShowWindowFrameBorder,
        FramelessOption::ForceNativeBackgroundBlur,
        FramelessOption::ForceNonNativeBackgroundBlur,
    ];

    /// The snake_case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            FramelessOption::CenterWindowBeforeShow => "center_window_before_show",
            FramelessOption::EnableBlurBehindWindow => "enable_blur_behind_window",
            FramelessOption::ForceHideWindowFrameBorder => "force_hide_window_frame_border",
            FramelessOption::ForceShowWindowFrameBorder => "force_show_window_frame_border",
            FramelessOption::ForceNativeBackgroundBlur => "force_native_background_blur",
            FramelessOption::ForceNonNativeBackgroundBlur => "force_non_native_background_blur",
        }
    }

    /// The environment variable toggling this option.
    pub fn env_var(self) -> String {
        format!("{ENV_PREFIX}{}", self.name().to_ascii_uppercase())
    }
}

impl FromStr for FramelessOption {
    type Err = FramelessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|option| option.name() == wanted)
            .ok_or_else(|| FramelessError::UnknownOption(s.to_owned()))
    }
}

/// On-disk representation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    options: Vec<FramelessOption>,
    ready_wait_time_ms: Option<u64>,
    resize_border_thickness: Option<f32>,
}

/// Frameless helper configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FramelessConfig {
    options: BTreeSet<FramelessOption>,
    ready_wait_time: Duration,
    resize_border_thickness: f32,
}

impl Default for FramelessConfig {
    fn default() -> Self {
        Self {
            options: BTreeSet::new(),
            ready_wait_time: DEFAULT_READY_WAIT_TIME,
            resize_border_thickness: DEFAULT_RESIZE_BORDER_THICKNESS,
        }
    }
}

impl FramelessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> FramelessResult<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_toml_str(&std::fs::read_to_string(path)?)?;
        }
        config.apply_vars(std::env::vars());
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_vars(std::env::vars());
        config
    }

    pub fn from_toml_str(text: &str) -> FramelessResult<Self> {
        let mut config = Self::default();
        config.apply_toml_str(text)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> FramelessResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Layer a TOML document on top of this configuration.
    ///
    /// Listed options are enabled; tunables present in the document replace
    /// the current values.
    pub fn apply_toml_str(&mut self, text: &str) -> FramelessResult<()> {
        let file: ConfigFile = toml::from_str(text)?;
        self.options.extend(file.options);
        if let Some(ms) = file.ready_wait_time_ms {
            self.ready_wait_time = Duration::from_millis(ms);
        }
        if let Some(thickness) = file.resize_border_thickness {
            self.resize_border_thickness = thickness.max(0.0);
        }
        tracing::debug!(target: targets::CONFIG, config = ?self, "applied configuration file");
        Ok(())
    }

    /// Layer `HORIZON_FRAMELESS_*` variables on top of this configuration.
    ///
    /// Option variables accept `1/true/yes/on` and `0/false/no/off`;
    /// `HORIZON_FRAMELESS_READY_WAIT_TIME_MS` and
    /// `HORIZON_FRAMELESS_RESIZE_BORDER_THICKNESS` set the tunables.
    /// Unparseable values are logged and ignored.
    pub fn apply_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();

            match name {
                "READY_WAIT_TIME_MS" => match value.parse::<u64>() {
                    Ok(ms) => self.ready_wait_time = Duration::from_millis(ms),
                    Err(_) => warn_ignored(key.as_ref(), value),
                },
                "RESIZE_BORDER_THICKNESS" => match value.parse::<f32>() {
                    Ok(thickness) if thickness >= 0.0 => self.resize_border_thickness = thickness,
                    _ => warn_ignored(key.as_ref(), value),
                },
                _ => match (FramelessOption::from_str(name), parse_switch(value)) {
                    (Ok(option), Some(on)) => self.set(option, on),
                    (Err(_), _) => {
                        tracing::warn!(target: targets::CONFIG, var = key.as_ref(), "unknown frameless variable");
                    }
                    (Ok(_), None) => warn_ignored(key.as_ref(), value),
                },
            }
        }
    }

    pub fn is_set(&self, option: FramelessOption) -> bool {
        self.options.contains(&option)
    }

    pub fn set(&mut self, option: FramelessOption, on: bool) {
        if on {
            self.options.insert(option);
        } else {
            self.options.remove(&option);
        }
    }

    /// Builder-style [`set`](Self::set) enabling `option`.
    pub fn with_option(mut self, option: FramelessOption) -> Self {
        self.set(option, true);
        self
    }

    pub fn options(&self) -> impl Iterator<Item = FramelessOption> + '_ {
        self.options.iter().copied()
    }

    pub fn ready_wait_time(&self) -> Duration {
        self.ready_wait_time
    }

    pub fn set_ready_wait_time(&mut self, wait: Duration) {
        self.ready_wait_time = wait;
    }

    pub fn with_ready_wait_time(mut self, wait: Duration) -> Self {
        self.ready_wait_time = wait;
        self
    }

    pub fn resize_border_thickness(&self) -> f32 {
        self.resize_border_thickness
    }

    pub fn with_resize_border_thickness(mut self, thickness: f32) -> Self {
        self.resize_border_thickness = thickness.max(0.0);
        self
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn warn_ignored(var: &str, value: &str) {
    tracing::warn!(target: targets::CONFIG, var, value, "ignoring unparseable value");
}
