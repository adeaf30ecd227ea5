//! Pure resizing of decoded images.
//!
//! Every policy produces an image of exactly the requested dimensions using
//! [`RESIZE_FILTER`]. Apart from the decoded source, a job allocates at most three
//! output-sized buffers plus, for [`ResizePolicy::CropToFill`], one copy no
//! larger than the source.

use crate::resize::consts::RESIZE_FILTER;
use crate::resize::models::{Dimensions, RasterImage, ResizePolicy};
use image::{imageops, DynamicImage, RgbaImage};

pub fn resize(image: RasterImage, dimensions: Dimensions, policy: ResizePolicy) -> RasterImage {
    let (width, height) = (dimensions.width(), dimensions.height());
    image.map_pixels(|pixels| match policy {
        ResizePolicy::Stretch => pixels.resize_exact(width, height, RESIZE_FILTER),
        ResizePolicy::FitWithin => letterbox(&pixels, width, height),
        ResizePolicy::CropToFill => crop_to_fill(&pixels, width, height),
    })
}

fn letterbox(pixels: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (fitted_width, fitted_height) = fitted_size(pixels.width(), pixels.height(), width, height);
    let scaled = pixels.resize_exact(fitted_width, fitted_height, RESIZE_FILTER);
    if (fitted_width, fitted_height) == (width, height) {
        return scaled;
    }

    // Zeroed RGBA is fully transparent.
    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(
        &mut canvas,
        &scaled.into_rgba8(),
        i64::from((width - fitted_width) / 2),
        i64::from((height - fitted_height) / 2),
    );
    DynamicImage::ImageRgba8(canvas)
}

fn crop_to_fill(pixels: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (x, y, crop_width, crop_height) = crop_region(pixels.width(), pixels.height(), width, height);
    if (crop_width, crop_height) == (pixels.width(), pixels.height()) {
        return pixels.resize_exact(width, height, RESIZE_FILTER);
    }
    pixels
        .crop_imm(x, y, crop_width, crop_height)
        .resize_exact(width, height, RESIZE_FILTER)
}

/// Largest size with the source aspect ratio that fits inside the box.
pub(crate) fn fitted_size(
    source_width: u32,
    source_height: u32,
    box_width: u32,
    box_height: u32,
) -> (u32, u32) {
    let (sw, sh) = (u64::from(source_width), u64::from(source_height));
    let (bw, bh) = (u64::from(box_width), u64::from(box_height));
    if sw * bh <= bw * sh {
        (scale(sw, bh, sh).min(bw) as u32, box_height)
    } else {
        (box_width, scale(sh, bw, sw).min(bh) as u32)
    }
}

/// Centered region of the source with the aspect ratio of the target, as
/// `(x, y, width, height)`.
pub(crate) fn crop_region(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32, u32, u32) {
    let (sw, sh) = (u64::from(source_width), u64::from(source_height));
    let (tw, th) = (u64::from(target_width), u64::from(target_height));
    let (crop_width, crop_height) = if sw * th > tw * sh {
        (scale(sh, tw, th).min(sw) as u32, source_height)
    } else {
        (source_width, scale(sw, th, tw).min(sh) as u32)
    };
    (
        (source_width - crop_width) / 2,
        (source_height - crop_height) / 2,
        crop_width,
        crop_height,
    )
}

/// `value * numerator / denominator`, rounded to nearest and never below one.
fn scale(value: u64, numerator: u64, denominator: u64) -> u64 {
    ((value * numerator + denominator / 2) / denominator).max(1)
}
