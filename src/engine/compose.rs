//! Split-preview and mask-based partial application.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{Image, Percentage};

const BLACK: [u8; 3] = [0, 0, 0];

/// Take `transformed` in columns `j <= split_index` and `original` to the
/// right.
pub fn split_preview(
    original: &Image,
    transformed: &Image,
    split: Percentage,
) -> ImagingResult<Image> {
    ensure_same_size("Split preview", original, transformed)?;
    let split_index = split.split_index(original.width());
    Ok(original.derive(|i, j| {
        if j <= split_index {
            transformed.pixel(i, j)
        } else {
            original.pixel(i, j)
        }
    }))
}

/// Take `transformed` where `mask` is pure black and `original` elsewhere.
pub fn mask_partial(original: &Image, transformed: &Image, mask: &Image) -> ImagingResult<Image> {
    ensure_same_size("Mask", original, mask)?;
    ensure_same_size("Masked effect", original, transformed)?;
    Ok(original.derive(|i, j| {
        if mask.pixel(i, j) == BLACK {
            transformed.pixel(i, j)
        } else {
            original.pixel(i, j)
        }
    }))
}

fn ensure_same_size(context: &str, expected: &Image, actual: &Image) -> ImagingResult<()> {
    if expected.same_size(actual) {
        return Ok(());
    }
    Err(ImagingError::DimensionMismatch {
        context: format!("{} dimensions must match the source image", context),
        expected_width: expected.width(),
        expected_height: expected.height(),
        width: actual.width(),
        height: actual.height(),
    })
}
