use crate::resize::errors::ResizeError;
use crate::resize::models::{OutputFormat, RasterImage, ResizeLimits};
use image::error::{DecodingError, ImageFormatHint};
use image::{ColorType, DynamicImage, ImageError, ImageFormat, ImageReader, Limits};
use std::io::Cursor;

/// Boundary to the image codec library.
pub trait IImageCodec: Clone + Send + Sync + 'static {
    /// Decodes `bytes`, establishing the format from the data itself.
    ///
    /// `declared` is the client-supplied MIME type. It is only used to fail
    /// closed when it names a concrete format other than the detected one.
    fn decode(&self, bytes: &[u8], declared: Option<&str>) -> Result<RasterImage, ResizeError>;

    fn encode(&self, image: RasterImage, format: OutputFormat) -> Result<Vec<u8>, ResizeError>;
}

/// [`IImageCodec`] backed by the `image` crate, with decode limits applied.
#[derive(Debug, Clone)]
pub struct ImageCrateCodec {
    max_source_dimension: u32,
    max_decode_alloc: u64,
}

impl ImageCrateCodec {
    pub fn new(limits: &ResizeLimits) -> Self {
        Self {
            max_source_dimension: limits.max_source_dimension,
            max_decode_alloc: limits.max_decode_alloc,
        }
    }

    fn decode_limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_source_dimension);
        limits.max_image_height = Some(self.max_source_dimension);
        limits.max_alloc = Some(self.max_decode_alloc);
        limits
    }
}

impl IImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8], declared: Option<&str>) -> Result<RasterImage, ResizeError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| ResizeError::InternalError(format!("format sniffing failed: {err}")))?;

        let format = reader
            .format()
            .filter(ImageFormat::reading_enabled)
            .ok_or(ResizeError::UnsupportedFormat)?;
        if let Some(declared_format) = declared.and_then(declared_image_format) {
            if declared_format != format {
                tracing::debug!(
                    declared = ?declared_format,
                    detected = ?format,
                    "Declared content type doesn't match the uploaded data."
                );
                return Err(ResizeError::UnsupportedFormat);
            }
        }

        reader.limits(self.decode_limits());
        let pixels = reader.decode().map_err(|err| match err {
            ImageError::Limits(_) => ResizeError::FileTooLarge,
            ImageError::Unsupported(_) => ResizeError::UnsupportedFormat,
            other => ResizeError::DecodeError(other),
        })?;
        // PNM and farbfeld headers may declare a 0x0 image.
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ResizeError::DecodeError(ImageError::Decoding(
                DecodingError::new(ImageFormatHint::Exact(format), "image has no pixels"),
            )));
        }

        Ok(RasterImage::new(pixels, Some(format)))
    }

    fn encode(&self, image: RasterImage, format: OutputFormat) -> Result<Vec<u8>, ResizeError> {
        let pixels = encodable_pixels(image.into_pixels(), format);
        let estimated_size = (pixels.width() as usize)
            * (pixels.height() as usize)
            * usize::from(pixels.color().bytes_per_pixel());
        let mut buffer = Cursor::new(Vec::with_capacity(estimated_size));
        pixels
            .write_to(&mut buffer, format.image_format())
            .map_err(ResizeError::EncodeError)?;
        Ok(buffer.into_inner())
    }
}

fn declared_image_format(content_type: &str) -> Option<ImageFormat> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    ImageFormat::from_mime_type(essence)
}

/// Converts the buffer into a color mode the target encoder accepts.
/// Alpha is dropped for JPEG, which leaves letterbox bars black.
fn encodable_pixels(pixels: DynamicImage, format: OutputFormat) -> DynamicImage {
    let color = pixels.color();
    match format {
        OutputFormat::Jpeg => match color {
            ColorType::L8 | ColorType::Rgb8 => pixels,
            _ => DynamicImage::ImageRgb8(pixels.into_rgb8()),
        },
        OutputFormat::WebP => match color {
            ColorType::Rgb8 | ColorType::Rgba8 => pixels,
            _ if color.has_alpha() => DynamicImage::ImageRgba8(pixels.into_rgba8()),
            _ => DynamicImage::ImageRgb8(pixels.into_rgb8()),
        },
        OutputFormat::Png => match color {
            ColorType::Rgb32F | ColorType::Rgba32F => {
                DynamicImage::ImageRgba16(pixels.into_rgba16())
            }
            _ => pixels,
        },
    }
}
