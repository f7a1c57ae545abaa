//! Byte copier: streams a media reference into a local file.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use vidpick_core::{ContentResolver, MediaReference, PickError, ResolverError};
use vidpick_logging::redact_reference;

/// Give up on generated names after this many collisions.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("could not grant read permission: {0}")]
    Permission(#[source] ResolverError),

    #[error("could not open source: {0}")]
    Open(#[source] ResolverError),

    #[error("provider returned no stream for {0}")]
    NoStream(String),

    #[error("could not create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("transfer to {path} failed: {source}")]
    Transfer { path: PathBuf, source: io::Error },
}

impl From<CopyError> for PickError {
    fn from(err: CopyError) -> Self {
        PickError::Copy(err.to_string())
    }
}

/// Where the copied bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Exactly this file; an existing file is overwritten.
    Exact(PathBuf),
    /// A fresh `<prefix>_<unix millis>.<extension>` file inside `dir`.
    Generated { dir: PathBuf, prefix: String, extension: String },
}

/// Result of a finished copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Timestamped file name; `attempt > 0` adds a collision suffix.
pub fn generated_file_name(prefix: &str, extension: &str, millis: i64, attempt: u32) -> String {
    if attempt == 0 {
        format!("{prefix}_{millis}.{extension}")
    } else {
        format!("{prefix}_{millis}_{attempt}.{extension}")
    }
}

/// Copy every byte behind `reference` into `destination`.
///
/// Read permission is granted to `package` first. See [`copy_granted`] for
/// the transfer itself.
pub async fn copy_reference(
    resolver: &dyn ContentResolver,
    package: &str,
    reference: &MediaReference,
    destination: Destination,
) -> Result<CopyReport, CopyError> {
    resolver
        .grant_read_permission(package, reference)
        .await
        .map_err(CopyError::Permission)?;
    copy_granted(resolver, reference, destination).await
}

/// Copy a reference the caller already holds read permission on.
///
/// Parent directories are created as needed. Both streams are closed on
/// every exit path, and a partially written file is removed when the
/// transfer fails.
pub async fn copy_granted(
    resolver: &dyn ContentResolver,
    reference: &MediaReference,
    destination: Destination,
) -> Result<CopyReport, CopyError> {
    let mut input = resolver
        .open_input_stream(reference)
        .await
        .map_err(CopyError::Open)?
        .ok_or_else(|| CopyError::NoStream(reference.to_string()))?;

    let (mut output, path) = open_destination(destination).await?;
    debug!(reference = %redact_reference(reference.as_str()), path = %path.display(), "Copying media");

    let transfer = async {
        let bytes = tokio::io::copy(&mut input, &mut output).await?;
        output.flush().await?;
        Ok::<u64, io::Error>(bytes)
    };
    let bytes = match transfer.await {
        Ok(bytes) => bytes,
        Err(source) => {
            drop(output);
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Could not remove partial copy");
            }
            return Err(CopyError::Transfer { path, source });
        }
    };
    drop(output);

    let path = absolute(&path).await;
    info!(path = %path.display(), bytes, "Copied media");
    Ok(CopyReport { path, bytes })
}

async fn open_destination(destination: Destination) -> Result<(File, PathBuf), CopyError> {
    match destination {
        Destination::Exact(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir(parent).await?;
            }
            let file = File::create(&path)
                .await
                .map_err(|source| CopyError::Create { path: path.clone(), source })?;
            Ok((file, path))
        }
        Destination::Generated { dir, prefix, extension } => {
            create_dir(&dir).await?;
            let millis = Utc::now().timestamp_millis();
            for attempt in 0..MAX_NAME_ATTEMPTS {
                let path = dir.join(generated_file_name(&prefix, &extension, millis, attempt));
                match OpenOptions::new().write(true).create_new(true).open(&path).await {
                    Ok(file) => return Ok((file, path)),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                    Err(source) => return Err(CopyError::Create { path, source }),
                }
            }
            Err(CopyError::Create {
                path: dir,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "no free file name"),
            })
        }
    }
}

async fn create_dir(dir: &Path) -> Result<(), CopyError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| CopyError::Create { path: dir.to_path_buf(), source })
}

async fn absolute(path: &Path) -> PathBuf {
    match fs::canonicalize(path).await {
        Ok(p) => p,
        Err(_) => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}
