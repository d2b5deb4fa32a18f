//! Bilinear downscaling by backward mapping.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::Image;
use crate::engine::{clamp_channel, round_half_up};

/// Downscale `image` to `new_width`×`new_height`.
///
/// Both targets must be positive and no larger than the source. Each
/// destination pixel samples the source at `(i' * H/H', j' * W/W')` and
/// interpolates between the four surrounding pixels.
pub fn downscale(image: &Image, new_width: i64, new_height: i64) -> ImagingResult<Image> {
    let (width, height) = image.dimensions();
    if new_width <= 0
        || new_height <= 0
        || new_width > i64::from(width)
        || new_height > i64::from(height)
    {
        return Err(ImagingError::InvalidTargetSize {
            width,
            height,
            new_width,
            new_height,
        });
    }

    let x_scale = f64::from(width) / new_width as f64;
    let y_scale = f64::from(height) / new_height as f64;

    log::debug!(
        "Downscaling {}x{} to {}x{}",
        width,
        height,
        new_width,
        new_height
    );

    Image::from_fn(new_width as u32, new_height as u32, |row, col| {
        let x = f64::from(col) * x_scale;
        let y = f64::from(row) * y_scale;

        let xf = x.floor() as u32;
        let yf = y.floor() as u32;
        let xc = (xf + 1).min(width - 1);
        let yc = (yf + 1).min(height - 1);

        let a = image.pixel(yf, xf);
        let b = image.pixel(yf, xc);
        let c = image.pixel(yc, xf);
        let d = image.pixel(yc, xc);

        let mut out = [0u8; 3];
        for k in 0..3 {
            let (a, b, c, d) = (
                f64::from(a[k]),
                f64::from(b[k]),
                f64::from(c[k]),
                f64::from(d[k]),
            );
            let (m, n) = if xc == xf {
                (a, c)
            } else {
                (
                    b * (x - f64::from(xf)) + a * (f64::from(xc) - x),
                    d * (x - f64::from(xf)) + c * (f64::from(xc) - x),
                )
            };
            let value = if yc == yf {
                m
            } else {
                n * (y - f64::from(yf)) + m * (f64::from(yc) - y)
            };
            out[k] = clamp_channel(round_half_up(value));
        }
        out
    })
}
