//! Picker configuration schema.
//!
//! Every field is optional in the file; `defaults::apply_all_defaults` fills
//! the gaps and the accessors fall back to the same defaults.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_COPIED_PREFIX, DEFAULT_EXTENSION, DEFAULT_LOG_LEVEL, DEFAULT_MAX_DURATION_MS,
    DEFAULT_PICKED_PREFIX, DEFAULT_REQUEST_CODE,
};

/// What to do when a clip's duration cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDurationPolicy {
    /// Treat the clip as 0 ms long and accept it.
    #[default]
    Accept,
    /// Fail the pick with `duration_unavailable`.
    Reject,
}

impl FromStr for UnknownDurationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duration policy '{other}' (expected accept|reject)")),
        }
    }
}

/// Root configuration for the picker plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// Clips longer than this are reported as too long.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_duration: Option<UnknownDurationPolicy>,

    /// Subdirectory of the host cache directory for picked copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_subdir: Option<String>,

    /// File name prefix for clips copied by `pickVideo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_prefix: Option<String>,

    /// File name prefix for `copyVideoToPath` without a file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copied_prefix: Option<String>,

    /// Extension of generated file names, without the dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Android activity request code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_code: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `vidpick_plugin=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling JSON logs; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl PickerConfig {
    pub fn max_duration_ms(&self) -> u64 {
        self.max_duration_ms.unwrap_or(DEFAULT_MAX_DURATION_MS)
    }

    pub fn unknown_duration(&self) -> UnknownDurationPolicy {
        self.unknown_duration.unwrap_or_default()
    }

    pub fn cache_subdir(&self) -> Option<&str> {
        self.cache_subdir.as_deref().filter(|s| !s.is_empty())
    }

    pub fn picked_prefix(&self) -> &str {
        self.picked_prefix.as_deref().unwrap_or(DEFAULT_PICKED_PREFIX)
    }

    pub fn copied_prefix(&self) -> &str {
        self.copied_prefix.as_deref().unwrap_or(DEFAULT_COPIED_PREFIX)
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    pub fn request_code(&self) -> i32 {
        self.request_code.unwrap_or(DEFAULT_REQUEST_CODE)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging.as_ref()?.dir.as_deref().map(PathBuf::from)
    }
}
