use crate::resize::responses::{ResizeErrorReason, ResizeErrorResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("no image file was uploaded")]
    MissingFile,
    #[error("width and height must be positive integers within the configured bound")]
    InvalidDimensions,
    #[error("unknown resize policy")]
    InvalidPolicy,
    #[error("the uploaded file exceeds the configured size limits")]
    FileTooLarge,
    #[error("the uploaded file is not in a supported image format")]
    UnsupportedFormat,
    #[error("the multipart body could not be read")]
    MalformedUpload,
    #[error("failed to decode the uploaded image")]
    DecodeError(#[source] image::ImageError),
    #[error("failed to encode the resized image")]
    EncodeError(#[source] image::ImageError),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ResizeError {
    pub fn reason(&self) -> ResizeErrorReason {
        match self {
            Self::MissingFile => ResizeErrorReason::MissingFile,
            Self::InvalidDimensions => ResizeErrorReason::InvalidDimensions,
            Self::InvalidPolicy => ResizeErrorReason::InvalidPolicy,
            Self::FileTooLarge => ResizeErrorReason::FileTooLarge,
            Self::UnsupportedFormat => ResizeErrorReason::UnsupportedFormat,
            Self::MalformedUpload => ResizeErrorReason::MalformedUpload,
            Self::DecodeError(_) => ResizeErrorReason::DecodeError,
            Self::EncodeError(_) => ResizeErrorReason::EncodeError,
            Self::InternalError(_) => ResizeErrorReason::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Whether the failure was caused by what the client sent.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::EncodeError(_) | Self::InternalError(_))
    }
}

impl IntoResponse for ResizeError {
    fn into_response(self) -> Response {
        let reason = self.reason();
        if self.is_client_error() {
            tracing::warn!(reason = ?reason, "Rejected resize request: {}.", self);
        } else {
            tracing::error!(reason = ?reason, error = ?self, "Resize request failed.");
        }
        (
            self.status(),
            Json(ResizeErrorResponse {
                error: true,
                reason,
            }),
        )
            .into_response()
    }
}
