use clap::Parser;
use std::net::SocketAddr;
use url::Url;
#[cfg(test)]
pub mod tests;

#[derive(Debug, Parser)]
#[command(version, about = "Resizes uploaded images over HTTP.")]
pub struct Args {
    #[arg(long, env)]
    #[arg(default_value = "0.0.0.0:3030")]
    pub listen_address: SocketAddr,
    /// Quickwit instance to ship request and resize job logs to.
    #[arg(long, env)]
    pub quickwit_url: Option<Url>,
    /// Origin allowed to call the service from a browser. May be repeated.
    #[arg(long, env, value_delimiter = ',')]
    pub allowed_origin: Vec<String>,
    #[arg(long, env)]
    #[arg(default_value_t = 10_000_000)]
    pub max_upload_bytes: usize,
    /// Upper bound for the requested width and height.
    #[arg(long, env)]
    #[arg(default_value_t = 10_000)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub max_dimension: u32,
    /// Upper bound for each side of a decoded source image.
    #[arg(long, env)]
    #[arg(default_value_t = 16_384)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub max_source_dimension: u32,
    #[arg(long, env)]
    #[arg(default_value_t = 512 * 1024 * 1024)]
    pub max_decode_alloc: u64,
    /// Defaults to the number of available CPUs.
    #[arg(long, env)]
    pub max_concurrent_jobs: Option<usize>,
    #[arg(long, env)]
    #[arg(default_value_t = 30)]
    pub request_timeout_secs: u64,
}
