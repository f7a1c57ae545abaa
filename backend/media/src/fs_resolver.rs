//! Content resolver backed by the local filesystem.
//!
//! Resolves `file://` URIs and bare paths. Metadata queries answer the
//! `duration` column from the container header and `mime_type` from the file
//! extension, which is enough for a desktop host and for tests.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::File;
use tracing::debug;
use vidpick_core::{
    ContentResolver, MediaReference, MediaStream, MetadataCursor, ResolverError, DURATION_COLUMN,
};

use crate::container;
use crate::mime_detect::{detect_mime_type, is_iso_bmff};

pub const MIME_TYPE_COLUMN: &str = "mime_type";

#[derive(Debug, Default, Clone)]
pub struct FsContentResolver;

impl FsContentResolver {
    pub fn new() -> Self {
        Self
    }

    fn path_of(&self, reference: &MediaReference) -> Result<PathBuf, ResolverError> {
        reference
            .to_file_path()
            .ok_or_else(|| ResolverError::Unsupported(reference.to_string()))
    }
}

#[async_trait]
impl ContentResolver for FsContentResolver {
    async fn grant_read_permission(
        &self,
        package: &str,
        reference: &MediaReference,
    ) -> Result<(), ResolverError> {
        let path = self.path_of(reference)?;
        // Plain files need no grant, but a missing one should fail here.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!(package, path = %path.display(), "Read access granted");
                Ok(())
            }
            Ok(_) => Err(ResolverError::Unsupported(reference.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResolverError::NotFound(reference.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(ResolverError::PermissionDenied(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn open_input_stream(
        &self,
        reference: &MediaReference,
    ) -> Result<Option<MediaStream>, ResolverError> {
        let path = self.path_of(reference)?;
        match File::open(&path).await {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResolverError::NotFound(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn query(
        &self,
        reference: &MediaReference,
        projection: &[&str],
    ) -> Result<Option<Box<dyn MetadataCursor>>, ResolverError> {
        let path = self.path_of(reference)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let mime = detect_mime_type(&path);

        let mut columns = Vec::with_capacity(projection.len());
        let mut row = Vec::with_capacity(projection.len());
        for column in projection {
            let value = match *column {
                DURATION_COLUMN if is_iso_bmff(mime) => {
                    let mut file = File::open(&path).await?;
                    container::read_duration_ms(&mut file)
                        .await
                        .ok()
                        .flatten()
                        .and_then(|ms| i64::try_from(ms).ok())
                        .map(Cell::Int)
                }
                MIME_TYPE_COLUMN => Some(Cell::Text(mime.to_string())),
                _ => None,
            };
            columns.push(column.to_string());
            row.push(value);
        }
        Ok(Some(Box::new(RowCursor { columns, row, positioned: false })))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Int(i64),
    Text(String),
}

/// Single-row cursor over the projected columns.
struct RowCursor {
    columns: Vec<String>,
    row: Vec<Option<Cell>>,
    positioned: bool,
}

impl MetadataCursor for RowCursor {
    fn move_to_first(&mut self) -> bool {
        self.positioned = true;
        true
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn get_i64(&self, index: usize) -> Option<i64> {
        if !self.positioned {
            return None;
        }
        match self.row.get(index)? {
            Some(Cell::Int(v)) => Some(*v),
            Some(Cell::Text(s)) => s.parse().ok(),
            None => None,
        }
    }
}
