use crate::cli::Args;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn layer(args: &Args) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(args))
        .allow_headers([
            http::header::USER_AGENT,
            http::header::REFERER,
            http::header::ORIGIN,
            http::header::ACCESS_CONTROL_REQUEST_METHOD,
            http::header::ACCESS_CONTROL_REQUEST_HEADERS,
            http::header::CONTENT_TYPE,
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .expose_headers([http::header::CONTENT_DISPOSITION])
}

fn allowed_origins(args: &Args) -> AllowOrigin {
    if args.allowed_origin.iter().any(|origin| origin == "*") {
        return AllowOrigin::any();
    }
    let origins = args
        .allowed_origin
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring malformed allowed origin `{}`.", origin);
                None
            }
        })
        .collect::<Vec<_>>();
    AllowOrigin::list(origins)
}
