use crate::resize::codec::IImageCodec;
use crate::resize::engine;
use crate::resize::errors::ResizeError;
use crate::resize::models::{RasterImage, ResizeLimits, ResizeRequest, UploadedForm};
use crate::resize::responses::ResizedImage;
use crate::resize::validation;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Received,
    Validated,
    Decoded,
    Resized,
    Encoded,
    Responded,
}

/// One pass of an upload through validation, decoding, resizing and encoding.
///
/// A job owns every buffer it produces, so nothing is shared between requests.
/// Any step may fail; the stage reached at that point is logged with the error.
pub struct ResizeJob<C: IImageCodec> {
    id: Uuid,
    codec: C,
    stage: JobStage,
    started_at: Instant,
}

impl<C> ResizeJob<C>
where
    C: IImageCodec,
{
    pub fn new(codec: C) -> Self {
        Self {
            id: Uuid::new_v4(),
            codec,
            stage: JobStage::Received,
            started_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    #[cfg(test)]
    pub fn stage(&self) -> JobStage {
        self.stage
    }

    pub fn validate(
        &mut self,
        form: UploadedForm,
        limits: &ResizeLimits,
    ) -> Result<ResizeRequest, ResizeError> {
        let request = validation::validate(form, limits).map_err(|err| self.fail(err))?;
        self.advance(JobStage::Validated);
        Ok(request)
    }

    /// Runs the CPU-bound part of the job. Blocks the calling thread.
    pub fn run(mut self, request: ResizeRequest) -> Result<ResizedImage, ResizeError> {
        let file = request.file();
        let decoded = self
            .codec
            .decode(&file.bytes, file.content_type.as_deref())
            .map_err(|err| self.fail(err))?;
        let (source_width, source_height) = (decoded.width(), decoded.height());
        let source_format = decoded.source_format();
        let source_color = decoded.color();
        self.advance(JobStage::Decoded);

        let resized = engine::resize(decoded, request.dimensions(), request.policy());
        self.advance(JobStage::Resized);

        let bytes = self.encode(resized, &request)?;
        self.advance(JobStage::Encoded);

        tracing::info!(
            task = "image_resize",
            job_id = %self.id,
            source_format = ?source_format,
            source_color = ?source_color,
            source_width,
            source_height,
            target = %request.dimensions(),
            policy = %request.policy(),
            output_format = request.format().mime_type(),
            input_bytes = file.bytes.len(),
            output_bytes = bytes.len(),
            processing_time_us = self.started_at.elapsed().as_micros(),
        );
        self.advance(JobStage::Responded);

        Ok(ResizedImage {
            job_id: self.id,
            format: request.format(),
            bytes: bytes.into(),
        })
    }

    fn encode(&self, image: RasterImage, request: &ResizeRequest) -> Result<Vec<u8>, ResizeError> {
        self.codec
            .encode(image, request.format())
            .map_err(|err| self.fail(err))
    }

    fn advance(&mut self, stage: JobStage) {
        tracing::debug!(job_id = %self.id, from = ?self.stage, to = ?stage, "Resize job advanced.");
        self.stage = stage;
    }

    fn fail(&self, error: ResizeError) -> ResizeError {
        tracing::debug!(
            job_id = %self.id,
            failed_at = ?self.stage,
            reason = ?error.reason(),
            "Resize job failed."
        );
        error
    }
}
