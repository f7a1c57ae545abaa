//! `vidpick-config`: runtime configuration for the video picker.
//!
//! Provides:
//! - Typed config schema (duration policy, cache naming, logging)
//! - YAML read/write with atomic replace
//! - `VIDPICK_*` environment overrides
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{LoggingConfig, PickerConfig, UnknownDurationPolicy};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{bail, Result};

/// Load, apply env overrides and defaults, then validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<PickerConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);
    check(&config)?;
    Ok(config)
}

/// Log warnings and fail on the first validation error.
pub fn check(config: &PickerConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }
    Ok(())
}
