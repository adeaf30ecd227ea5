use crate::resize::models::OutputFormat;
use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeErrorResponse {
    pub error: bool,
    pub reason: ResizeErrorReason,
}

/// Machine-readable failure kinds returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeErrorReason {
    MissingFile,
    InvalidDimensions,
    InvalidPolicy,
    FileTooLarge,
    UnsupportedFormat,
    MalformedUpload,
    DecodeError,
    EncodeError,
    InternalError,
}

/// Encoded output of a finished job.
#[derive(Debug)]
pub struct ResizedImage {
    pub job_id: Uuid,
    pub format: OutputFormat,
    pub bytes: Bytes,
}

impl ResizedImage {
    pub fn file_name(&self) -> String {
        format!("resized-{}.{}", self.job_id, self.format.extension())
    }
}

impl IntoResponse for ResizedImage {
    fn into_response(self) -> Response {
        let content_disposition = format!("inline; filename=\"{}\"", self.file_name());
        (
            [
                (header::CONTENT_TYPE, self.format.mime_type().to_string()),
                (header::CONTENT_DISPOSITION, content_disposition),
                (header::CACHE_CONTROL, String::from("no-store")),
            ],
            self.bytes,
        )
            .into_response()
    }
}
