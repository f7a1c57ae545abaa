//! The `native_video_picker` method channel.
//!
//! Calls arrive as [`MethodCall`]s on an mpsc queue, each with a oneshot
//! responder. Every call is served on its own task so a pick that waits on
//! the user never blocks copies or the rejection of overlapping picks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vidpick_core::{CopyRequest, PickError, PickResult};

use crate::orchestrator::VideoPicker;

pub const CHANNEL_NAME: &str = "native_video_picker";
pub const METHOD_PICK_VIDEO: &str = "pickVideo";
pub const METHOD_COPY_VIDEO_TO_PATH: &str = "copyVideoToPath";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self { method: method.into(), arguments }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The error code, if this is an error response.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<PickError> for MethodResponse {
    fn from(err: PickError) -> Self {
        Self::Error { code: err.kind().code().into(), message: err.to_string(), details: None }
    }
}

/// Wire shape of a finished pick. Cancellation is a plain `null`.
pub fn pick_result_to_response(result: PickResult) -> MethodResponse {
    match result {
        PickResult::Cancelled => MethodResponse::success(Value::Null),
        PickResult::TooLong { source, duration_ms } => MethodResponse::success(json!({
            "uri": source.as_str(),
            "tooLong": true,
            "durationMs": duration_ms,
        })),
        PickResult::Accepted { source, duration_ms, local_path } => MethodResponse::success(json!({
            "uri": source.as_str(),
            "tooLong": false,
            "durationMs": duration_ms,
            "localPath": local_path.to_string_lossy(),
        })),
        PickResult::Failed { kind, message } => {
            MethodResponse::Error { code: kind.code().into(), message, details: None }
        }
    }
}

/// Dispatch one call to the picker.
pub async fn handle_call(picker: &VideoPicker, call: MethodCall) -> MethodResponse {
    debug!(method = %call.method, "Method call");
    match call.method.as_str() {
        METHOD_PICK_VIDEO => pick_result_to_response(picker.pick_video().await),
        METHOD_COPY_VIDEO_TO_PATH => {
            let request = match parse_copy_request(call.arguments) {
                Ok(request) => request,
                Err(err) => return err.into(),
            };
            match picker.copy_video_to_path(request).await {
                Ok(path) => MethodResponse::success(Value::String(path.to_string_lossy().into_owned())),
                Err(err) => err.into(),
            }
        }
        other => {
            warn!(method = other, "Unknown method");
            MethodResponse::NotImplemented
        }
    }
}

fn parse_copy_request(arguments: Value) -> Result<CopyRequest, PickError> {
    if arguments.is_null() {
        return Ok(CopyRequest::default());
    }
    serde_json::from_value(arguments).map_err(|e| PickError::BadArguments(e.to_string()))
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("method channel is closed")]
    Closed,

    #[error("method channel dropped the call without answering")]
    NoResponse,
}

struct Envelope {
    call: MethodCall,
    responder: oneshot::Sender<MethodResponse>,
}

/// Caller side of the channel.
#[derive(Clone)]
pub struct MethodChannel {
    tx: mpsc::Sender<Envelope>,
}

impl MethodChannel {
    pub async fn invoke(&self, call: MethodCall) -> Result<MethodResponse, ChannelError> {
        let (responder, rx) = oneshot::channel();
        self.tx
            .send(Envelope { call, responder })
            .await
            .map_err(|_| ChannelError::Closed)?;
        rx.await.map_err(|_| ChannelError::NoResponse)
    }

    pub async fn invoke_method(
        &self,
        method: &str,
        arguments: Value,
    ) -> Result<MethodResponse, ChannelError> {
        self.invoke(MethodCall::new(method, arguments)).await
    }
}

/// Start serving calls for `picker`. The server stops once every
/// [`MethodChannel`] clone is dropped.
pub fn spawn_channel(picker: Arc<VideoPicker>, buffer: usize) -> (MethodChannel, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(buffer.max(1));

    let handle = tokio::spawn(async move {
        info!(channel = CHANNEL_NAME, "Method channel serving");
        while let Some(Envelope { call, responder }) = rx.recv().await {
            let picker = Arc::clone(&picker);
            tokio::spawn(async move {
                let response = handle_call(&picker, call).await;
                if responder.send(response).is_err() {
                    debug!("Caller went away before the response");
                }
            });
        }
        info!(channel = CHANNEL_NAME, "Method channel closed");
    });

    (MethodChannel { tx }, handle)
}
