use crate::resize::codec::{IImageCodec, ImageCrateCodec};
use crate::resize::errors::ResizeError;
use crate::resize::models::{OutputFormat, RasterImage, ResizeLimits};
use image::{DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use std::io::{self, Cursor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod job;

pub const RED: [u8; 3] = [220, 20, 20];
pub const BLUE: [u8; 3] = [20, 20, 220];

pub fn test_limits() -> ResizeLimits {
    ResizeLimits {
        max_upload_bytes: 1_000_000,
        max_dimension: 10_000,
        max_source_dimension: 4096,
        max_decode_alloc: 64 * 1024 * 1024,
    }
}

pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .expect("Failed to encode fixture image.");
    buffer.into_inner()
}

pub fn solid_jpeg(width: u32, height: u32) -> Vec<u8> {
    encoded(&solid_image(width, height, RED), ImageFormat::Jpeg)
}

/// A binary PPM header declaring a 0x0 image.
pub const EMPTY_PPM: &[u8] = b"P6\n0 0\n255\n";

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encoded(&solid_image(width, height, color), ImageFormat::Png)
}

/// Counts decode calls and otherwise behaves like the real codec.
#[derive(Clone)]
pub struct CountingCodec {
    inner: ImageCrateCodec,
    decodes: Arc<AtomicUsize>,
}

impl CountingCodec {
    pub fn new(limits: &ResizeLimits) -> Self {
        Self {
            inner: ImageCrateCodec::new(limits),
            decodes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn decodes(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl IImageCodec for CountingCodec {
    fn decode(&self, bytes: &[u8], declared: Option<&str>) -> Result<RasterImage, ResizeError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.inner.decode(bytes, declared)
    }

    fn encode(&self, image: RasterImage, format: OutputFormat) -> Result<Vec<u8>, ResizeError> {
        self.inner.encode(image, format)
    }
}

/// Decodes normally and fails every encode.
#[derive(Clone)]
pub struct BrokenEncoderCodec {
    inner: ImageCrateCodec,
}

impl BrokenEncoderCodec {
    pub fn new(limits: &ResizeLimits) -> Self {
        Self {
            inner: ImageCrateCodec::new(limits),
        }
    }
}

impl IImageCodec for BrokenEncoderCodec {
    fn decode(&self, bytes: &[u8], declared: Option<&str>) -> Result<RasterImage, ResizeError> {
        self.inner.decode(bytes, declared)
    }

    fn encode(&self, _image: RasterImage, _format: OutputFormat) -> Result<Vec<u8>, ResizeError> {
        Err(ResizeError::EncodeError(ImageError::IoError(io::Error::other(
            "/var/lib/encoder/socket is gone",
        ))))
    }
}

/// Holds every decode for `delay` and records how many ran at once.
#[derive(Clone)]
pub struct SlowCodec {
    inner: ImageCrateCodec,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowCodec {
    pub fn new(limits: &ResizeLimits, delay: Duration) -> Self {
        Self {
            inner: ImageCrateCodec::new(limits),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl IImageCodec for SlowCodec {
    fn decode(&self, bytes: &[u8], declared: Option<&str>) -> Result<RasterImage, ResizeError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.decode(bytes, declared)
    }

    fn encode(&self, image: RasterImage, format: OutputFormat) -> Result<Vec<u8>, ResizeError> {
        self.inner.encode(image, format)
    }
}
