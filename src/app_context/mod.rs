use crate::cli::Args;
use crate::resize::codec::{IImageCodec, ImageCrateCodec};
use crate::resize::models::ResizeLimits;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct AppContext<C: IImageCodec> {
    pub codec: C,
    pub limits: ResizeLimits,
    /// Bounds how many decode/resize/encode jobs run at the same time.
    pub jobs: Arc<Semaphore>,
}

pub fn init(args: &Args) -> AppContext<ImageCrateCodec> {
    let limits = limits_of(args);
    with_codec(args, ImageCrateCodec::new(&limits))
}

pub fn with_codec<C: IImageCodec>(args: &Args, codec: C) -> AppContext<C> {
    let max_concurrent_jobs = args
        .max_concurrent_jobs
        .filter(|&jobs| jobs > 0)
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZeroUsize::get));
    tracing::info!(max_concurrent_jobs, "Initialized application context.");
    AppContext {
        codec,
        limits: limits_of(args),
        jobs: Arc::new(Semaphore::new(max_concurrent_jobs)),
    }
}

pub fn limits_of(args: &Args) -> ResizeLimits {
    ResizeLimits {
        max_upload_bytes: args.max_upload_bytes,
        max_dimension: args.max_dimension,
        max_source_dimension: args.max_source_dimension,
        max_decode_alloc: args.max_decode_alloc,
    }
}
