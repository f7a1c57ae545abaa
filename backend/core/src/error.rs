use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories reported back over the method channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoContext,
    NoResolver,
    BadArguments,
    LaunchFailure,
    CopyFailure,
    PickInProgress,
    DurationUnavailable,
}

impl ErrorKind {
    /// Wire code understood by the host application.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NoContext => "no_activity",
            ErrorKind::NoResolver => "no_resolver",
            ErrorKind::BadArguments => "bad_args",
            ErrorKind::LaunchFailure => "intent_fail",
            ErrorKind::CopyFailure => "copy_fail",
            ErrorKind::PickInProgress => "already_active",
            ErrorKind::DurationUnavailable => "duration_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Top-level error type for pick and copy requests.
#[derive(Debug, Error)]
pub enum PickError {
    #[error("No foreground activity")]
    NoContext,

    #[error("No content resolver")]
    NoResolver,

    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("Could not launch picker: {0}")]
    Launch(String),

    #[error("copy failed: {0}")]
    Copy(String),

    #[error("a video pick is already in progress")]
    InProgress,

    #[error("could not determine duration of {0}")]
    DurationUnavailable(String),
}

impl PickError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PickError::NoContext => ErrorKind::NoContext,
            PickError::NoResolver => ErrorKind::NoResolver,
            PickError::BadArguments(_) => ErrorKind::BadArguments,
            PickError::Launch(_) => ErrorKind::LaunchFailure,
            PickError::Copy(_) => ErrorKind::CopyFailure,
            PickError::InProgress => ErrorKind::PickInProgress,
            PickError::DurationUnavailable(_) => ErrorKind::DurationUnavailable,
        }
    }
}

/// Errors raised by a content-resolution service.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("no content at {0}")]
    NotFound(String),

    #[error("permission denied for {0}")]
    PermissionDenied(String),

    #[error("unsupported reference: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by the host when asked to present UI.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no activity found to handle {0}")]
    NoHandler(String),

    #[error("presentation rejected: {0}")]
    Rejected(String),
}

impl From<HostError> for PickError {
    fn from(err: HostError) -> Self {
        PickError::Launch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_match_host_contract() {
        assert_eq!(PickError::NoContext.kind().code(), "no_activity");
        assert_eq!(PickError::BadArguments("x".into()).kind().code(), "bad_args");
        assert_eq!(PickError::Copy("disk full".into()).kind().code(), "copy_fail");
    }

    #[test]
    fn host_error_becomes_launch_failure() {
        let err: PickError = HostError::NoHandler("video/*".into()).into();
        assert_eq!(err.kind(), ErrorKind::LaunchFailure);
        assert!(err.to_string().starts_with("Could not launch picker"));
    }
}
