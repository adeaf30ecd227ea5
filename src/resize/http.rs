use crate::app_context::AppContext;
use crate::resize::codec::IImageCodec;
use crate::resize::errors::ResizeError;
use crate::resize::job::ResizeJob;
use crate::resize::models::UploadedForm;
use crate::resize::responses::ResizedImage;

pub struct ResizeHttpHandler<C: IImageCodec> {
    app_context: AppContext<C>,
}

impl<C> ResizeHttpHandler<C>
where
    C: IImageCodec,
{
    pub fn new(app_context: AppContext<C>) -> Self {
        Self { app_context }
    }

    pub async fn process(&self, form: UploadedForm) -> Result<ResizedImage, ResizeError> {
        let mut job = ResizeJob::new(self.app_context.codec.clone());
        let file_name = form
            .image
            .as_ref()
            .and_then(|file| file.file_name.clone())
            .unwrap_or_default();
        tracing::debug!(job_id = %job.id(), file_name = %file_name, "Received resize request.");

        let request = job.validate(form, &self.app_context.limits)?;

        let permit = self
            .app_context
            .jobs
            .clone()
            .acquire_owned()
            .await
            .map_err(|err| ResizeError::InternalError(format!("job queue closed: {err}")))?;
        // The permit and the upload move into the worker together, so both are
        // released when the work finishes even if the client is gone by then.
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job.run(request)
        })
        .await
        .map_err(|err| ResizeError::InternalError(format!("resize worker failed: {err}")))?
    }
}
