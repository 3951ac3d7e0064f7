//! Pre-flight checks applied to an uploaded image before it reaches the
//! pipeline. The orchestrator itself assumes its input already passed these.

use image::{GenericImageView, ImageFormat};

use crate::error::ValidationError;

pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Checks format (PNG, JPEG, BMP), byte size, then pixel dimensions.
pub fn validate_image(bytes: &[u8]) -> Result<ImageInfo, ValidationError> {
    let format = image::guess_format(bytes).map_err(|e| ValidationError::Invalid(e.to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp) {
        return Err(ValidationError::UnsupportedFormat);
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ValidationError::Invalid(e.to_string()))?;
    let (width, height) = decoded.dimensions();
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ValidationError::DimensionsTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}
