use crate::cli::Args;
use crate::logging::consts::{DEFAULT_LOGGING_BATCH_SIZE, DEFAULT_LOG_DIRECTIVE};
use crate::logging::quickwit::QuickwitLoggingLayerBuilder;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub mod consts;
pub mod quickwit;

/// Must be called from within a Tokio runtime when Quickwit shipping is enabled.
pub fn init(args: &Args) {
    let quickwit_logging_layer = args.quickwit_url.clone().map(|quickwit_url| {
        QuickwitLoggingLayerBuilder::new(quickwit_url)
            .marker_field("task")
            .map_marker_to_index("http_request", "http_requests")
            .map_marker_to_index("image_resize", "image_resizes")
            .with_batch_size(DEFAULT_LOGGING_BATCH_SIZE)
            .build()
    });
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(
            DEFAULT_LOG_DIRECTIVE
                .parse()
                .expect("The default log directive is malformed."),
        )
    });
    tracing_subscriber::registry()
        .with(quickwit_logging_layer)
        .with(env_filter)
        .with(fmt::layer())
        .init();
    if args.quickwit_url.is_none() {
        tracing::info!("No Quickwit URL given, logging to stdout only.");
    }
}
