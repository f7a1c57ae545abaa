//! Config defaults: applies the built-in picker policy to parsed config.

use crate::schema::{LoggingConfig, PickerConfig, UnknownDurationPolicy};

/// Longest clip accepted without a `tooLong` answer.
pub const DEFAULT_MAX_DURATION_MS: u64 = vidpick_core::DEFAULT_MAX_DURATION_MS;

/// Android activity request code.
pub const DEFAULT_REQUEST_CODE: i32 = vidpick_core::DEFAULT_REQUEST_CODE;

pub const DEFAULT_PICKED_PREFIX: &str = "picked";
pub const DEFAULT_COPIED_PREFIX: &str = "copied";
pub const DEFAULT_EXTENSION: &str = "mp4";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PickerConfig) -> PickerConfig {
    let config = apply_policy_defaults(config);
    let config = apply_naming_defaults(config);
    apply_logging_defaults(config)
}

fn apply_policy_defaults(mut config: PickerConfig) -> PickerConfig {
    config.max_duration_ms.get_or_insert(DEFAULT_MAX_DURATION_MS);
    config.unknown_duration.get_or_insert(UnknownDurationPolicy::Accept);
    config.request_code.get_or_insert(DEFAULT_REQUEST_CODE);
    config
}

fn apply_naming_defaults(mut config: PickerConfig) -> PickerConfig {
    config.picked_prefix.get_or_insert_with(|| DEFAULT_PICKED_PREFIX.to_string());
    config.copied_prefix.get_or_insert_with(|| DEFAULT_COPIED_PREFIX.to_string());
    config.extension.get_or_insert_with(|| DEFAULT_EXTENSION.to_string());
    config
}

fn apply_logging_defaults(mut config: PickerConfig) -> PickerConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
