//! MIME type detection for picked media files.
//!
//! Used by the filesystem resolver to answer `mime_type` queries and by the
//! desktop harness to refuse non-video sources under the picker's `video/*`
//! filter.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Video
        "mp4" | "m4v"  => "video/mp4",
        "mov" | "qt"   => "video/quicktime",
        "3gp"          => "video/3gpp",
        "3g2"          => "video/3gpp2",
        "webm"         => "video/webm",
        "mkv"          => "video/x-matroska",
        "avi"          => "video/x-msvideo",
        "ogv"          => "video/ogg",
        "ts"           => "video/mp2t",

        // Stills and audio that show up in camera rolls
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "heic"         => "image/heic",
        "gif"          => "image/gif",
        "m4a"          => "audio/mp4",
        "mp3"          => "audio/mpeg",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for video.
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}

/// Whether the container is ISO-BMFF, i.e. readable by [`crate::container`].
pub fn is_iso_bmff(mime: &str) -> bool {
    matches!(mime, "video/mp4" | "video/quicktime" | "video/3gpp" | "video/3gpp2" | "audio/mp4")
}

/// Match a MIME type against an intent-style filter such as `video/*`.
pub fn matches_filter(mime: &str, filter: &str) -> bool {
    match filter.split_once('/') {
        Some(("*", "*")) => true,
        Some((top, "*")) => mime.split_once('/').is_some_and(|(t, _)| t.eq_ignore_ascii_case(top)),
        _ => mime.eq_ignore_ascii_case(filter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_quicktime() {
        assert_eq!(detect_mime_type(&PathBuf::from("IMG_0042.MOV")), "video/quicktime");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("clip.xyz")), "application/octet-stream");
    }

    #[test]
    fn video_filter_rejects_images() {
        assert!(matches_filter("video/mp4", "video/*"));
        assert!(!matches_filter("image/jpeg", "video/*"));
        assert!(matches_filter("image/jpeg", "*/*"));
        assert!(matches_filter("video/webm", "video/webm"));
    }

    #[test]
    fn webm_is_video_but_not_bmff() {
        let mime = detect_mime_type(&PathBuf::from("a.webm"));
        assert!(is_video(mime));
        assert!(!is_iso_bmff(mime));
    }
}
