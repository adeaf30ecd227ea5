use crate::cli::Args;
use clap::Parser;
use std::{net::SocketAddr, str::FromStr};

pub fn fake_args() -> Args {
    Args {
        listen_address: SocketAddr::from_str("0.0.0.0:3030")
            .expect("Failed to construct fake listen address."),
        quickwit_url: None,
        allowed_origin: vec![String::from("http://localhost:3000")],
        max_upload_bytes: 10_000_000,
        max_dimension: 10_000,
        max_source_dimension: 16_384,
        max_decode_alloc: 512 * 1024 * 1024,
        max_concurrent_jobs: Some(2),
        request_timeout_secs: 30,
    }
}

#[test]
fn test_defaults_need_no_flags() {
    let args = Args::try_parse_from(["image-resize-server"]).expect("Defaults should parse.");

    assert_eq!(args.max_dimension, 10_000);
    assert_eq!(args.max_upload_bytes, 10_000_000);
    assert!(args.quickwit_url.is_none());
}

#[test]
fn test_allowed_origins_are_comma_separated() {
    let args = Args::try_parse_from([
        "image-resize-server",
        "--allowed-origin",
        "http://localhost:3000,https://resize.example.com",
    ])
    .expect("Origins should parse.");

    assert_eq!(
        args.allowed_origin,
        vec!["http://localhost:3000", "https://resize.example.com"]
    );
}

#[test]
fn test_zero_max_dimension_is_rejected() {
    let result = Args::try_parse_from(["image-resize-server", "--max-dimension", "0"]);

    assert!(result.is_err());
}
