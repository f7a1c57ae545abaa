//! Config validation with field paths and user-friendly messages.

use std::path::{Component, Path};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::PickerConfig;

static PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,31}$").unwrap());

static EXTENSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,8}$").unwrap());

const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

pub fn validate(config: &PickerConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_policy(config, &mut report);
    validate_naming(config, &mut report);
    validate_cache_subdir(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_policy(config: &PickerConfig, report: &mut ValidationReport) {
    if config.max_duration_ms == Some(0) {
        report.error("maxDurationMs", "Must be greater than zero; every clip would be too long");
    }
    if config.request_code.is_some_and(|code| !(0..=0xFFFF).contains(&code)) {
        report.error("requestCode", "Android only accepts request codes in 0..=65535");
    }
}

fn validate_naming(config: &PickerConfig, report: &mut ValidationReport) {
    for (path, value) in [
        ("pickedPrefix", &config.picked_prefix),
        ("copiedPrefix", &config.copied_prefix),
    ] {
        if let Some(prefix) = value {
            if !PREFIX_PATTERN.is_match(prefix) {
                report.error(path, format!("'{prefix}' is not a safe file name prefix"));
            }
        }
    }
    if let Some(ext) = &config.extension {
        if !EXTENSION_PATTERN.is_match(ext) {
            report.error("extension", format!("'{ext}' must be 1-8 alphanumerics without a dot"));
        }
    }
    if config.picked_prefix() == config.copied_prefix() {
        report.warn("copiedPrefix", "Same prefix as pickedPrefix; cache copies and manual copies look alike");
    }
}

fn validate_cache_subdir(config: &PickerConfig, report: &mut ValidationReport) {
    let Some(subdir) = config.cache_subdir() else { return };
    let path = Path::new(subdir);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        report.error("cacheSubdir", "Must be a relative path inside the cache directory");
    }
}

fn validate_logging(config: &PickerConfig, report: &mut ValidationReport) {
    let level = config.log_level();
    // Directives like `vidpick_plugin=debug` are passed through untouched.
    if !level.contains('=') && !KNOWN_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown level '{level}'; falling back to RUST_LOG or info"));
    }
}
