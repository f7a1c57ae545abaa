//! `VIDPICK_*` environment overrides, applied on top of the config file.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::{LoggingConfig, PickerConfig, UnknownDurationPolicy};

pub const ENV_MAX_DURATION_MS: &str = "VIDPICK_MAX_DURATION_MS";
pub const ENV_UNKNOWN_DURATION: &str = "VIDPICK_UNKNOWN_DURATION";
pub const ENV_LOG_LEVEL: &str = "VIDPICK_LOG_LEVEL";
pub const ENV_CACHE_SUBDIR: &str = "VIDPICK_CACHE_SUBDIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: PickerConfig) -> Result<PickerConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: PickerConfig,
    env: &HashMap<String, String>,
) -> Result<PickerConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(raw) = get(ENV_MAX_DURATION_MS) {
        let ms: u64 = raw
            .parse()
            .with_context(|| format!("{ENV_MAX_DURATION_MS} must be an integer, got '{raw}'"))?;
        debug!(max_duration_ms = ms, "Env override");
        config.max_duration_ms = Some(ms);
    }

    if let Some(raw) = get(ENV_UNKNOWN_DURATION) {
        let policy: UnknownDurationPolicy = raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {ENV_UNKNOWN_DURATION}: {e}"))?;
        debug!(?policy, "Env override");
        config.unknown_duration = Some(policy);
    }

    if let Some(raw) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(raw.to_string());
    }

    if let Some(raw) = get(ENV_CACHE_SUBDIR) {
        config.cache_subdir = Some(raw.to_string());
    }

    Ok(config)
}
