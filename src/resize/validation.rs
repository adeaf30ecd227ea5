use crate::resize::errors::ResizeError;
use crate::resize::models::{
    Dimensions, OutputFormat, ResizeLimits, ResizePolicy, ResizeRequest, UploadedForm,
};

/// Turns raw form fields into a [`ResizeRequest`] without looking at the pixels.
///
/// Checks run in a fixed order: file presence, dimensions, file size, declared
/// content type, policy and output format. The image bytes are never decoded here.
pub fn validate(form: UploadedForm, limits: &ResizeLimits) -> Result<ResizeRequest, ResizeError> {
    let file = match form.image {
        Some(file) if !file.bytes.is_empty() => file,
        _ => return Err(ResizeError::MissingFile),
    };

    let width = parse_dimension(form.width.as_deref(), limits.max_dimension)?;
    let height = parse_dimension(form.height.as_deref(), limits.max_dimension)?;
    let dimensions = Dimensions::new(width, height).ok_or(ResizeError::InvalidDimensions)?;

    if file.bytes.len() > limits.max_upload_bytes {
        return Err(ResizeError::FileTooLarge);
    }

    if let Some(content_type) = file.content_type.as_deref() {
        if !is_acceptable_content_type(content_type) {
            return Err(ResizeError::UnsupportedFormat);
        }
    }

    let policy = parse_optional::<ResizePolicy>(form.policy.as_deref())?;
    let format = parse_optional::<OutputFormat>(form.format.as_deref())?;

    Ok(ResizeRequest::new(dimensions, policy, format, file))
}

fn parse_dimension(raw: Option<&str>, max: u32) -> Result<u32, ResizeError> {
    let value = raw
        .map(str::trim)
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or(ResizeError::InvalidDimensions)?;
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ResizeError::InvalidDimensions)
    }
}

fn parse_optional<T>(raw: Option<&str>) -> Result<T, ResizeError>
where
    T: std::str::FromStr<Err = ResizeError> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse(),
    }
}

/// The declared type only filters out uploads that claim to be something other
/// than an image. The actual format is established by the decoder.
fn is_acceptable_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/") || essence == "application/octet-stream"
}
