//! `vidpick copy`: direct copy, no picker.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use vidpick_config::PickerConfig;
use vidpick_core::Platform;
use vidpick_plugin::{handle_call, MethodCall, MethodResponse, VideoPicker, METHOD_COPY_VIDEO_TO_PATH};

use crate::host::{file_reference, DesktopHost};

pub async fn run(
    config: PickerConfig,
    uri: String,
    dest_dir: String,
    file_name: Option<String>,
) -> Result<MethodResponse> {
    let picker = VideoPicker::new(Platform::Ios, config);
    let (host, _presented) = DesktopHost::new(DesktopHost::default_cache_dir());
    picker.attach_context(Arc::new(host));

    // Local paths are accepted for convenience.
    let path = PathBuf::from(&uri);
    let uri = if path.exists() { file_reference(&path) } else { uri };
    let arguments = json!({ "uri": uri, "destDir": dest_dir, "fileName": file_name });
    Ok(handle_call(&picker, MethodCall::new(METHOD_COPY_VIDEO_TO_PATH, arguments)).await)
}
