use crate::app_context::AppContext;
use crate::resize::codec::IImageCodec;
use crate::resize::errors::ResizeError;
use crate::resize::http::ResizeHttpHandler;
use crate::resize::models::UploadedForm;
use crate::resize::responses::ResizedImage;
use axum::extract::State;

pub async fn process<C>(
    State(app_context): State<AppContext<C>>,
    form: UploadedForm,
) -> Result<ResizedImage, ResizeError>
where
    C: IImageCodec,
{
    ResizeHttpHandler::new(app_context).process(form).await
}
