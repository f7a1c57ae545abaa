//! `vidpick pick`: one full pick cycle against the desktop host.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;
use vidpick_config::PickerConfig;
use vidpick_core::{Platform, PresentationRequest, RESULT_CANCELED, RESULT_OK, VIDEO_MIME_FILTER};
use vidpick_media::{detect_mime_type, matches_filter};
use vidpick_plugin::{spawn_channel, MethodResponse, VideoPicker, METHOD_PICK_VIDEO};

use crate::host::{file_reference, DesktopHost};

pub struct PickArgs {
    pub source: Option<PathBuf>,
    pub platform: Platform,
    pub cache_dir: PathBuf,
}

pub async fn run(config: PickerConfig, args: PickArgs) -> Result<MethodResponse> {
    // The real pickers only offer videos; the simulated user may not pick anything else.
    if let Some(source) = &args.source {
        let mime = detect_mime_type(source);
        if !matches_filter(mime, VIDEO_MIME_FILTER) {
            bail!("{} is {mime}, not a video", source.display());
        }
    }

    let picker = Arc::new(VideoPicker::new(args.platform, config));
    let (host, mut presented) = DesktopHost::new(args.cache_dir);
    picker.attach_context(Arc::new(host));

    let (channel, _server) = spawn_channel(Arc::clone(&picker), 4);
    let mut call =
        tokio::spawn(async move { channel.invoke_method(METHOD_PICK_VIDEO, Value::Null).await });

    // Play the user: wait for the picker, then answer it. A pick that fails
    // before presenting finishes on its own.
    let reference = args.source.as_deref().map(file_reference);
    let finished = tokio::select! {
        done = &mut call => done,
        Some(request) = presented.recv() => {
            info!(?request, "Picker shown");
            answer(&picker, &request, reference.as_deref());
            call.await
        }
    };
    let response = finished.context("pick task panicked")??;
    picker.detach_context();
    Ok(response)
}

fn answer(picker: &VideoPicker, request: &PresentationRequest, reference: Option<&str>) {
    match request.request_code() {
        Some(code) => {
            let result_code = if reference.is_some() { RESULT_OK } else { RESULT_CANCELED };
            picker.on_activity_result(code, result_code, reference);
        }
        None => match reference {
            Some(url) => {
                picker.on_picker_finished(Some(url));
            }
            None => {
                picker.on_picker_cancelled();
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        out
    }

    fn movie(duration_ms: u32) -> Vec<u8> {
        let mut mvhd = vec![0u8; 12];
        mvhd.extend_from_slice(&1000u32.to_be_bytes());
        mvhd.extend_from_slice(&duration_ms.to_be_bytes());
        mvhd.extend_from_slice(&[0u8; 80]);
        [boxed(b"ftyp", b"isom\0\0\0\0isom"), boxed(b"moov", &boxed(b"mvhd", &mvhd))].concat()
    }

    #[tokio::test]
    async fn ios_pick_of_a_local_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clip.mov");
        std::fs::write(&source, movie(12_000)).unwrap();

        let args = PickArgs {
            source: Some(source),
            platform: Platform::Ios,
            cache_dir: dir.path().join("cache"),
        };
        let MethodResponse::Success { result } = run(PickerConfig::default(), args).await.unwrap() else {
            panic!("expected success");
        };
        assert_eq!(result["tooLong"], false);
        assert_eq!(result["durationMs"], 12_000);
        assert!(PathBuf::from(result["localPath"].as_str().unwrap()).exists());
    }

    #[tokio::test]
    async fn non_video_source_is_refused_before_the_picker() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        std::fs::write(&source, b"\xff\xd8\xff").unwrap();

        let args = PickArgs {
            source: Some(source),
            platform: Platform::Android { sdk_int: 34 },
            cache_dir: dir.path().join("cache"),
        };
        let err = run(PickerConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("not a video"));
        assert!(!dir.path().join("cache").exists());
    }

    #[tokio::test]
    async fn cancelled_android_pick_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let args = PickArgs {
            source: None,
            platform: Platform::Android { sdk_int: 28 },
            cache_dir: dir.path().to_path_buf(),
        };
        let response = run(PickerConfig::default(), args).await.unwrap();
        assert_eq!(response, MethodResponse::Success { result: Value::Null });
    }
}
