use crate::app_context::AppContext;
use crate::cli::Args;
use crate::resize::codec::IImageCodec;
use crate::resize::consts::FORM_FIELDS_ALLOWANCE;
use crate::{form, http::cors, resize};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

pub fn new<C: IImageCodec>(args: &Args, app_context: AppContext<C>) -> Router {
    let cors_policy = cors::layer(args);
    let body_limit = app_context
        .limits
        .max_upload_bytes
        .saturating_add(FORM_FIELDS_ALLOWANCE);
    tracing::info!(body_limit, "Initialized HTTP configuration.");

    let resize_routes = Router::new()
        .route("/process", post(resize::handlers::process::<C>))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(form::handlers::index))
        .merge(resize_routes)
        .with_state(app_context)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(crate::http::middleware::tracing))
                .layer(cors_policy)
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(args.request_timeout_secs),
                )),
        )
}
