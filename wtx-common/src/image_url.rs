//! Image URL validation for the submission form
//!
//! A URL is accepted when it contains an `http://` or `https://` URL ending
//! in `.png` or `.jpg` (case-insensitive). The pattern is searched, not
//! anchored, so surrounding text is tolerated.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static IMAGE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://.*\.(?:png|jpg)").expect("image URL pattern is a valid regex")
});

/// Form validation failures, shown inline under the input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageUrlError {
    #[error("Image URL is required")]
    Required,

    #[error("Invalid URL")]
    Invalid,
}

/// Validate form input before any network call
pub fn validate_image_url(input: &str) -> Result<&str, ImageUrlError> {
    if input.trim().is_empty() {
        return Err(ImageUrlError::Required);
    }
    if !IMAGE_URL_PATTERN.is_match(input) {
        return Err(ImageUrlError::Invalid);
    }
    Ok(input)
}
