use crate::app_context::AppContext;
use crate::resize::codec::IImageCodec;
use crate::resize::consts::{FORMAT_FIELD, HEIGHT_FIELD, IMAGE_FIELD, POLICY_FIELD, WIDTH_FIELD};
use crate::resize::errors::ResizeError;
use crate::resize::models::{UploadedFile, UploadedForm};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

/// Reads the multipart body field by field. The file is consumed chunk by chunk
/// and the upload is abandoned as soon as it grows past the configured cap.
#[async_trait]
impl<C> FromRequest<AppContext<C>> for UploadedForm
where
    C: IImageCodec,
{
    type Rejection = ResizeError;

    async fn from_request(req: Request, state: &AppContext<C>) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "Request body isn't a multipart form.");
                ResizeError::MalformedUpload
            })?;
        let max_upload_bytes = state.limits.max_upload_bytes;

        let mut form = UploadedForm::default();
        while let Some(field) = multipart.next_field().await.map_err(from_multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                IMAGE_FIELD if form.image.is_none() => {
                    form.image = Some(read_file(field, max_upload_bytes).await?);
                }
                WIDTH_FIELD => form.width = Some(read_text(field).await?),
                HEIGHT_FIELD => form.height = Some(read_text(field).await?),
                POLICY_FIELD => form.policy = Some(read_text(field).await?),
                FORMAT_FIELD => form.format = Some(read_text(field).await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

async fn read_file(mut field: Field<'_>, max_bytes: usize) -> Result<UploadedFile, ResizeError> {
    let content_type = field.content_type().map(str::to_owned);
    let file_name = field.file_name().map(str::to_owned);
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(from_multipart_error)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(ResizeError::FileTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(UploadedFile {
        bytes: Bytes::from(bytes),
        content_type,
        file_name,
    })
}

async fn read_text(field: Field<'_>) -> Result<String, ResizeError> {
    field.text().await.map_err(from_multipart_error)
}

fn from_multipart_error(err: MultipartError) -> ResizeError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ResizeError::FileTooLarge
    } else {
        tracing::debug!(error = %err, "Failed to read multipart body.");
        ResizeError::MalformedUpload
    }
}
