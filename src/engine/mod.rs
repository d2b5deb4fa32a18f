//! The transformation engine.
//!
//! Every function here is pure: it takes images by reference and returns a
//! new [`Image`](crate::core::Image). Failures are always invalid arguments
//! ([`ImagingError`](crate::core::ImagingError)); nothing touches the store or
//! the filesystem.

pub mod compose;
pub mod effect;
pub mod haar;
pub mod histogram;
pub mod kernel;
pub mod levels;
pub mod render;
pub mod resample;
pub mod tone;

pub use compose::{mask_partial, split_preview};
pub use effect::Effect;
pub use haar::compress;
pub use histogram::{color_correct, Histogram};
pub use kernel::{convolve, Kernel};
pub use levels::{adjust_levels, Levels};
pub use render::render_histogram;
pub use resample::downscale;
pub use tone::{
    brighten, component, flip_horizontal, flip_vertical, greyscale, rgb_combine, rgb_split, sepia,
    GreyscaleMode,
};

/// Round to nearest with halves going up: `floor(x + 0.5)`.
#[inline]
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Clamp to the channel range and narrow.
#[inline]
pub(crate) fn clamp_channel(value: f64) -> u8 {
    // NaN clamps to 0
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Clamp an integer to the channel range and narrow.
#[inline]
pub(crate) fn clamp_int(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}
