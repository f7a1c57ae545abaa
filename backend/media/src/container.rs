//! Duration reader for ISO-BMFF containers (MP4 / QuickTime MOV).
//!
//! Walks top-level boxes on a forward-only stream, buffers `moov` and reads the
//! movie header (`mvhd`). Anything in between (typically `mdat`) is skipped
//! without being buffered.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

const MOOV: [u8; 4] = *b"moov";
const MVHD: [u8; 4] = *b"mvhd";

/// Refuse to buffer absurd `moov` boxes.
const MAX_MOOV_BYTES: u64 = 64 * 1024 * 1024;

/// Movie timescale and duration as stored in `mvhd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieHeader {
    pub timescale: u32,
    pub duration: u64,
}

impl MovieHeader {
    /// Duration in milliseconds, `None` when the header says "unknown".
    pub fn duration_ms(&self) -> Option<u64> {
        if self.timescale == 0 || self.duration == u64::MAX || self.duration == u32::MAX as u64 {
            return None;
        }
        let ms = self.duration as u128 * 1000 / self.timescale as u128;
        u64::try_from(ms).ok()
    }
}

/// Read the movie duration from the start of a container stream.
///
/// Returns `Ok(None)` if the stream ends before a usable `mvhd` is found and
/// `Err` for malformed box headers.
pub async fn read_duration_ms<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Option<u64>> {
    Ok(read_movie_header(reader).await?.and_then(|h| h.duration_ms()))
}

pub async fn read_movie_header<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Option<MovieHeader>> {
    loop {
        let mut header = [0u8; 8];
        match reader.read_exact(&mut header).await {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let kind = [header[4], header[5], header[6], header[7]];

        let body_len = match size32 {
            // Box runs to the end of the stream.
            0 => None,
            1 => {
                let mut large = [0u8; 8];
                reader.read_exact(&mut large).await?;
                let size = u64::from_be_bytes(large);
                Some(size.checked_sub(16).ok_or_else(|| malformed(kind, size))?)
            }
            n => Some((n as u64).checked_sub(8).ok_or_else(|| malformed(kind, n as u64))?),
        };

        if kind == MOOV {
            let mut body = Vec::new();
            match body_len {
                Some(len) if len > MAX_MOOV_BYTES => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "moov box too large"));
                }
                Some(len) => {
                    (&mut *reader).take(len).read_to_end(&mut body).await?;
                }
                None => {
                    (&mut *reader).take(MAX_MOOV_BYTES).read_to_end(&mut body).await?;
                }
            }
            return Ok(find_movie_header(&body));
        }

        match body_len {
            Some(len) => {
                let skipped = tokio::io::copy(&mut (&mut *reader).take(len), &mut tokio::io::sink()).await?;
                if skipped < len {
                    return Ok(None);
                }
            }
            None => return Ok(None),
        }
    }
}

fn malformed(kind: [u8; 4], size: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("box '{}' declares impossible size {size}", String::from_utf8_lossy(&kind)),
    )
}

/// Scan the children of a buffered `moov` body for `mvhd`.
fn find_movie_header(moov: &[u8]) -> Option<MovieHeader> {
    let mut pos = 0usize;
    while pos + 8 <= moov.len() {
        let size = u32::from_be_bytes(moov[pos..pos + 4].try_into().ok()?) as usize;
        let kind: [u8; 4] = moov[pos + 4..pos + 8].try_into().ok()?;
        let (header_len, size) = match size {
            0 => (8, moov.len() - pos),
            1 => {
                let large = u64::from_be_bytes(moov.get(pos + 8..pos + 16)?.try_into().ok()?);
                (16, usize::try_from(large).ok()?)
            }
            n => (8, n),
        };
        let end = pos.checked_add(size)?;
        if size < header_len || end > moov.len() {
            return None;
        }
        if kind == MVHD {
            return parse_mvhd(&moov[pos + header_len..end]);
        }
        pos = end;
    }
    None
}

fn parse_mvhd(body: &[u8]) -> Option<MovieHeader> {
    let version = *body.first()?;
    // version(1) + flags(3), then creation/modification times
    if version == 1 {
        let timescale = u32::from_be_bytes(body.get(20..24)?.try_into().ok()?);
        let duration = u64::from_be_bytes(body.get(24..32)?.try_into().ok()?);
        Some(MovieHeader { timescale, duration })
    } else {
        let timescale = u32::from_be_bytes(body.get(12..16)?.try_into().ok()?);
        let duration = u32::from_be_bytes(body.get(16..20)?.try_into().ok()?) as u64;
        Some(MovieHeader { timescale, duration })
    }
}
