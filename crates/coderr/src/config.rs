//! Capture configuration.
//!
//! Provides library defaults with runtime environment overrides, resolved
//! once per process on the first capture.
//!
//! # Environment Variables
//!
//! - `CODERR_BACKTRACE=0` - Disable stack capture (accepts 1/0, true/false, yes/no, on/off)
//! - `CODERR_DEPTH=<n>` - Keep at most `n` frames per origin, `1..=32`
//!
//! # Example
//!
//! ```rust
//! use coderr::config::CaptureConfig;
//!
//! let config = CaptureConfig::default().depth(8);
//! assert!(config.enabled);
//! assert_eq!(config.depth, 8);
//! ```

use std::sync::OnceLock;

use thiserror::Error;

use crate::capture::MAX_DEPTH;

pub const ENV_BACKTRACE: &str = "CODERR_BACKTRACE";
pub const ENV_DEPTH: &str = "CODERR_DEPTH";

/// Why an environment override was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var}: expected a frame count, got {value:?}")]
    InvalidDepth { var: &'static str, value: String },

    #[error("{var}: depth {depth} outside 1..={max}")]
    DepthOutOfRange { var: &'static str, depth: usize, max: usize },
}

/// How stack capture behaves at chain origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Walk the stack at all. When false every error has empty frames.
    pub enabled: bool,
    /// Frame ceiling per capture, `1..=MAX_DEPTH`.
    pub depth: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: MAX_DEPTH,
        }
    }
}

impl CaptureConfig {
    /// Library defaults with environment overrides applied.
    ///
    /// Never fails: a malformed variable is logged and that field keeps its
    /// default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BACKTRACE) {
            match parse_bool(ENV_BACKTRACE, &raw) {
                Ok(enabled) => config.enabled = enabled,
                Err(e) => tracing::warn!(error = %e, "ignoring capture override"),
            }
        }

        if let Some(raw) = lookup(ENV_DEPTH) {
            match parse_depth(ENV_DEPTH, &raw) {
                Ok(depth) => config.depth = depth,
                Err(e) => tracing::warn!(error = %e, "ignoring capture override"),
            }
        }

        if config.enabled {
            tracing::debug!(depth = config.depth, "capture config resolved");
        } else {
            tracing::debug!("stack capture disabled");
        }
        config
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the frame ceiling, clamped to `1..=MAX_DEPTH`.
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth.clamp(1, MAX_DEPTH);
        self
    }
}

static GLOBAL: OnceLock<CaptureConfig> = OnceLock::new();

/// Process-wide configuration, read from the environment on first use
/// unless [`init`] installed one earlier.
pub fn global() -> &'static CaptureConfig {
    GLOBAL.get_or_init(CaptureConfig::from_env)
}

/// Install the process-wide configuration, bypassing the environment.
///
/// Must run before the first error is constructed. Once a configuration is
/// in place (installed here or resolved by [`global`]) the call is rejected
/// and `config` is handed back. Depth is clamped to `1..=MAX_DEPTH`.
///
/// ```rust
/// use coderr::config::{self, CaptureConfig};
///
/// let installed = config::init(CaptureConfig::default().depth(8));
/// if installed.is_ok() {
///     assert_eq!(config::global().depth, 8);
/// }
/// ```
pub fn init(config: CaptureConfig) -> Result<(), CaptureConfig> {
    let config = config.depth(config.depth);
    GLOBAL.set(config)?;
    tracing::debug!(enabled = config.enabled, depth = config.depth, "capture config installed");
    Ok(())
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

fn parse_depth(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let depth: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidDepth {
        var,
        value: raw.to_string(),
    })?;

    if depth == 0 || depth > MAX_DEPTH {
        return Err(ConfigError::DepthOutOfRange {
            var,
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(depth)
}

// ============================================================================
// Tests
// ============================================================================
