use image::imageops::FilterType;

/// Resampling filter used by every resize policy.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Room left in the request body limit for the non-file multipart fields.
pub const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

pub const IMAGE_FIELD: &str = "image";
pub const WIDTH_FIELD: &str = "width";
pub const HEIGHT_FIELD: &str = "height";
pub const POLICY_FIELD: &str = "policy";
pub const FORMAT_FIELD: &str = "format";
