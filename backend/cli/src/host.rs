//! Desktop stand-in for the host activity.
//!
//! Presentations are forwarded to the command loop, which plays the user.
//! Content resolution goes to the local filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;
use vidpick_core::{ContentResolver, DisplayContext, HostError, PresentationRequest};
use vidpick_media::FsContentResolver;

pub const DESKTOP_PACKAGE: &str = "vidpick.desktop";

pub struct DesktopHost {
    cache_dir: PathBuf,
    resolver: Arc<FsContentResolver>,
    presented: mpsc::UnboundedSender<PresentationRequest>,
}

impl DesktopHost {
    pub fn new(cache_dir: PathBuf) -> (Self, mpsc::UnboundedReceiver<PresentationRequest>) {
        let (presented, rx) = mpsc::unbounded_channel();
        let host = Self { cache_dir, resolver: Arc::new(FsContentResolver::new()), presented };
        (host, rx)
    }

    pub fn default_cache_dir() -> PathBuf {
        std::env::temp_dir().join("vidpick-cache")
    }
}

impl DisplayContext for DesktopHost {
    fn package_name(&self) -> &str {
        DESKTOP_PACKAGE
    }

    fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    fn content_resolver(&self) -> Option<Arc<dyn ContentResolver>> {
        Some(self.resolver.clone() as Arc<dyn ContentResolver>)
    }

    fn present(&self, request: &PresentationRequest) -> Result<(), HostError> {
        debug!(?request, "Presenting picker");
        self.presented
            .send(request.clone())
            .map_err(|_| HostError::Rejected("desktop host is shutting down".into()))
    }
}

/// `file://` reference for a local path, made absolute first.
pub fn file_reference(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentations_reach_the_loop() {
        let (host, mut rx) = DesktopHost::new(PathBuf::from("/tmp/cache"));
        let request = PresentationRequest::ImagePicker { media_types: vec!["public.movie".into()], animated: true };
        host.present(&request).unwrap();
        assert_eq!(rx.try_recv().unwrap(), request);
    }

    #[test]
    fn references_are_absolute_file_uris() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"x").unwrap();
        let reference = file_reference(&path);
        assert!(reference.starts_with("file:///"));
        assert!(reference.ends_with("clip.mp4"));
    }
}
