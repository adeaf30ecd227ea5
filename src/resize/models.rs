use crate::resize::errors::ResizeError;
use axum::body::Bytes;
use image::{ColorType, DynamicImage, ImageFormat};
use std::fmt;
use std::str::FromStr;

/// A file as it arrived in the multipart body. Nothing about it is trusted yet.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Raw multipart fields of a `POST /process` request.
#[derive(Debug, Clone, Default)]
pub struct UploadedForm {
    pub image: Option<UploadedFile>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub policy: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Returns `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Scale both axes independently, ignoring the aspect ratio.
    #[default]
    Stretch,
    /// Keep the aspect ratio and letterbox the rest of the box.
    FitWithin,
    /// Keep the aspect ratio and crop whatever overflows the box.
    CropToFill,
}

impl FromStr for ResizePolicy {
    type Err = ResizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stretch" => Ok(Self::Stretch),
            "fit" | "fit-within" => Ok(Self::FitWithin),
            "crop" | "crop-to-fill" => Ok(Self::CropToFill),
            _ => Err(ResizeError::InvalidPolicy),
        }
    }
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stretch => "stretch",
            Self::FitWithin => "fit-within",
            Self::CropToFill => "crop-to-fill",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ResizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            _ => Err(ResizeError::UnsupportedFormat),
        }
    }
}

/// Validated input of a single resize job. Only the validator builds these.
#[derive(Debug, Clone)]
pub struct ResizeRequest {
    dimensions: Dimensions,
    policy: ResizePolicy,
    format: OutputFormat,
    file: UploadedFile,
}

impl ResizeRequest {
    pub(crate) fn new(
        dimensions: Dimensions,
        policy: ResizePolicy,
        format: OutputFormat,
        file: UploadedFile,
    ) -> Self {
        Self {
            dimensions,
            policy,
            format,
            file,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }
}

/// Decoded pixels. Width, height and color mode are always read off the buffer.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: DynamicImage,
    source_format: Option<ImageFormat>,
}

impl RasterImage {
    pub fn new(pixels: DynamicImage, source_format: Option<ImageFormat>) -> Self {
        Self {
            pixels,
            source_format,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn color(&self) -> ColorType {
        self.pixels.color()
    }

    pub fn source_format(&self) -> Option<ImageFormat> {
        self.source_format
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> DynamicImage {
        self.pixels
    }

    pub fn map_pixels(self, transform: impl FnOnce(DynamicImage) -> DynamicImage) -> Self {
        Self {
            pixels: transform(self.pixels),
            source_format: self.source_format,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_upload_bytes: usize,
    pub max_dimension: u32,
    pub max_source_dimension: u32,
    pub max_decode_alloc: u64,
}
