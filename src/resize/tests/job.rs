use crate::resize::errors::ResizeError;
use crate::resize::job::{JobStage, ResizeJob};
use crate::resize::models::{OutputFormat, UploadedFile, UploadedForm};
use crate::resize::tests::{solid_jpeg, test_limits, BrokenEncoderCodec, CountingCodec};
use axum::body::Bytes;

fn form(bytes: Vec<u8>, width: &str, height: &str) -> UploadedForm {
    UploadedForm {
        image: Some(UploadedFile {
            bytes: Bytes::from(bytes),
            content_type: Some(String::from("image/jpeg")),
            file_name: None,
        }),
        width: Some(width.to_string()),
        height: Some(height.to_string()),
        ..UploadedForm::default()
    }
}

#[test]
fn test_job_walks_every_stage() {
    let codec = CountingCodec::new(&test_limits());
    let mut job = ResizeJob::new(codec.clone());
    let job_id = job.id();
    assert_eq!(job.stage(), JobStage::Received);

    let request = job
        .validate(form(solid_jpeg(100, 100), "50", "25"), &test_limits())
        .expect("Form should be valid.");
    assert_eq!(job.stage(), JobStage::Validated);

    let resized = job.run(request).expect("Job should succeed.");

    assert_eq!(resized.job_id, job_id);
    assert_eq!(resized.format, OutputFormat::Jpeg);
    assert_eq!(codec.decodes(), 1);
    let decoded = image::load_from_memory(&resized.bytes).expect("Output should decode.");
    assert_eq!((decoded.width(), decoded.height()), (50, 25));
}

#[test]
fn test_invalid_dimensions_never_reach_the_decoder() {
    let codec = CountingCodec::new(&test_limits());
    let mut job = ResizeJob::new(codec.clone());

    let result = job.validate(form(solid_jpeg(10, 10), "-3", "10"), &test_limits());

    assert!(matches!(result, Err(ResizeError::InvalidDimensions)));
    assert_eq!(job.stage(), JobStage::Received);
    assert_eq!(codec.decodes(), 0);
}

#[test]
fn test_non_image_fails_cleanly() {
    let mut job = ResizeJob::new(CountingCodec::new(&test_limits()));
    let mut form = form(b"just some text, not pixels".to_vec(), "10", "10");
    if let Some(file) = form.image.as_mut() {
        file.content_type = None;
    }
    let request = job
        .validate(form, &test_limits())
        .expect("Validation doesn't look at the bytes.");

    let result = job.run(request);

    assert!(matches!(result, Err(ResizeError::UnsupportedFormat)));
}

#[test]
fn test_encoder_failure_is_a_server_error() {
    let mut job = ResizeJob::new(BrokenEncoderCodec::new(&test_limits()));
    let request = job
        .validate(form(solid_jpeg(20, 20), "10", "10"), &test_limits())
        .expect("Form should be valid.");

    let error = job.run(request).expect_err("Encoding should fail.");

    assert!(matches!(error, ResizeError::EncodeError(_)));
    assert!(!error.is_client_error());
}

#[test]
fn test_jobs_get_distinct_ids() {
    let first = ResizeJob::new(CountingCodec::new(&test_limits()));
    let second = ResizeJob::new(CountingCodec::new(&test_limits()));

    assert_ne!(first.id(), second.id());
}
