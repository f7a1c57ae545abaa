//! `vidpick probe`: duration and MIME type of a local file.

use std::path::Path;

use anyhow::{bail, Result};
use serde_json::{json, Value};
use vidpick_config::PickerConfig;
use vidpick_core::{DurationInspector, MediaReference};
use vidpick_media::{detect_mime_type, is_video, ContainerInspector, FsContentResolver};

use crate::host::file_reference;

pub async fn run(config: &PickerConfig, file: &Path) -> Result<Value> {
    if !file.is_file() {
        bail!("no such file: {}", file.display());
    }
    let mime = detect_mime_type(file);
    let reference = MediaReference::new(file_reference(file));
    let duration_ms = ContainerInspector.inspect(&FsContentResolver::new(), &reference).await;

    Ok(json!({
        "uri": reference.as_str(),
        "mimeType": mime,
        "isVideo": is_video(mime),
        "durationMs": duration_ms,
        "tooLong": duration_ms.map(|d| d > config.max_duration_ms()),
    }))
}
