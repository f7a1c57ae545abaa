use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, PickError};

/// Clips strictly longer than this are rejected without copying.
pub const DEFAULT_MAX_DURATION_MS: u64 = 60_000;

/// First Android API level that ships the system photo picker (Tiramisu).
pub const ANDROID_PHOTO_PICKER_SDK: u32 = 33;

/// Opaque, permission-scoped locator for a media item (`content://`, `file://`
/// or a bare path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaReference(String);

impl MediaReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme, if the reference has one.
    pub fn scheme(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once("://")?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return None;
        }
        Some(scheme)
    }

    /// Local filesystem path for `file://` URIs and bare paths.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        match self.scheme() {
            Some("file") => {
                let rest = &self.0["file://".len()..];
                // file://localhost/tmp/a.mp4 and file:///tmp/a.mp4 are the same file
                let rest = rest.strip_prefix("localhost").unwrap_or(rest);
                if rest.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(rest))
                }
            }
            Some(_) => None,
            None if self.0.is_empty() => None,
            None => Some(PathBuf::from(&self.0)),
        }
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaReference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Terminal outcome of one `pickVideo` cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// The user dismissed the picker without choosing anything.
    Cancelled,
    /// Over the duration limit; nothing was copied.
    TooLong {
        source: MediaReference,
        duration_ms: u64,
    },
    /// Within the limit and copied into the cache directory.
    Accepted {
        source: MediaReference,
        duration_ms: u64,
        local_path: PathBuf,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
}

impl PickResult {
    pub fn label(&self) -> &'static str {
        match self {
            PickResult::Cancelled => "cancelled",
            PickResult::TooLong { .. } => "too_long",
            PickResult::Accepted { .. } => "accepted",
            PickResult::Failed { .. } => "failed",
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            PickResult::TooLong { duration_ms, .. } | PickResult::Accepted { duration_ms, .. } => {
                Some(*duration_ms)
            }
            _ => None,
        }
    }
}

impl From<PickError> for PickResult {
    fn from(err: PickError) -> Self {
        PickResult::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Arguments of a direct `copyVideoToPath` request, as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub dest_dir: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl CopyRequest {
    pub fn new(uri: impl Into<String>, dest_dir: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            dest_dir: Some(dest_dir.into()),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// The operating system the plugin is hosted on, as reported at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "os", rename_all = "snake_case")]
pub enum Platform {
    Android { sdk_int: u32 },
    Ios,
}

impl Platform {
    pub fn has_photo_picker(&self) -> bool {
        matches!(self, Platform::Android { sdk_int } if *sdk_int >= ANDROID_PHOTO_PICKER_SDK)
    }
}

/// Which native picker a launcher drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    /// Android 13+ visual media picker, video only.
    PhotoPicker,
    /// `ACTION_PICK` gallery intent on older Android.
    GalleryIntent,
    /// iOS image picker restricted to movies.
    MoviePicker,
}

impl fmt::Display for PickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PickerKind::PhotoPicker => "photo_picker",
            PickerKind::GalleryIntent => "gallery_intent",
            PickerKind::MoviePicker => "movie_picker",
        };
        f.write_str(name)
    }
}

/// Non-terminal phases of a pick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPhase {
    #[default]
    Idle,
    Launching,
    AwaitingUserChoice,
    Evaluating,
    Copying,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_uri_maps_to_path() {
        let r = MediaReference::new("file:///var/mobile/tmp/clip.MOV");
        assert_eq!(r.scheme(), Some("file"));
        assert_eq!(r.to_file_path(), Some(PathBuf::from("/var/mobile/tmp/clip.MOV")));

        let local = MediaReference::new("file://localhost/tmp/a.mp4");
        assert_eq!(local.to_file_path(), Some(PathBuf::from("/tmp/a.mp4")));
    }

    #[test]
    fn content_uri_has_no_path() {
        let r = MediaReference::new("content://media/external/video/media/42");
        assert_eq!(r.scheme(), Some("content"));
        assert!(r.to_file_path().is_none());
    }

    #[test]
    fn bare_path_is_a_file() {
        let r = MediaReference::new("/sdcard/DCIM/a.mp4");
        assert_eq!(r.scheme(), None);
        assert_eq!(r.to_file_path(), Some(PathBuf::from("/sdcard/DCIM/a.mp4")));
        assert!(MediaReference::new("").to_file_path().is_none());
    }

    #[test]
    fn photo_picker_gate_is_api_33() {
        assert!(Platform::Android { sdk_int: 33 }.has_photo_picker());
        assert!(Platform::Android { sdk_int: 34 }.has_photo_picker());
        assert!(!Platform::Android { sdk_int: 32 }.has_photo_picker());
        assert!(!Platform::Ios.has_photo_picker());
    }

    #[test]
    fn copy_request_reads_host_arguments() {
        let req: CopyRequest = serde_json::from_value(serde_json::json!({
            "uri": "content://media/1",
            "destDir": "/data/out"
        }))
        .unwrap();
        assert_eq!(req.uri.as_deref(), Some("content://media/1"));
        assert_eq!(req.dest_dir.as_deref(), Some("/data/out"));
        assert!(req.file_name.is_none());
    }

    #[test]
    fn failed_result_carries_kind() {
        let result = PickResult::from(PickError::NoContext);
        assert_eq!(
            result,
            PickResult::Failed {
                kind: ErrorKind::NoContext,
                message: "No foreground activity".into()
            }
        );
        assert_eq!(result.duration_ms(), None);
    }
}
