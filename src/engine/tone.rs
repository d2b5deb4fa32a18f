//! Per-pixel channel and tone operators, plus flips.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{Channel, Image, Pixel};
use crate::engine::clamp_int;

/// Sepia matrix rows, applied to (R, G, B).
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Rec. 709 luma weights.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Greyscale reduction of a pixel to one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreyscaleMode {
    /// max(R, G, B)
    Value,
    /// Rounded mean of the channels
    Intensity,
    /// Weighted sum with the Rec. 709 luma coefficients
    Luma,
}

impl GreyscaleMode {
    /// Reduce one pixel to its grey level.
    pub fn level(self, [r, g, b]: Pixel) -> u8 {
        match self {
            GreyscaleMode::Value => r.max(g).max(b),
            GreyscaleMode::Intensity => {
                let sum = u32::from(r) + u32::from(g) + u32::from(b);
                round_f32(sum as f32 / 3.0)
            }
            GreyscaleMode::Luma => round_f32(
                LUMA[0] * f32::from(r) + LUMA[1] * f32::from(g) + LUMA[2] * f32::from(b),
            ),
        }
    }
}

/// Single-precision round half up, then clamp.
fn round_f32(x: f32) -> u8 {
    clamp_int((x + 0.5).floor() as i64)
}

/// Add `delta` to every channel, clamping to `[0, 255]`.
pub fn brighten(image: &Image, delta: i64) -> Image {
    image.map_pixels(|pixel| pixel.map(|c| clamp_int(i64::from(c) + delta)))
}

/// Copy channel `channel` into all three output channels.
pub fn component(image: &Image, channel: Channel) -> Image {
    image.map_pixels(|pixel| [pixel[channel.index()]; 3])
}

/// Reduce to grey with the given mode.
pub fn greyscale(image: &Image, mode: GreyscaleMode) -> Image {
    image.map_pixels(|pixel| [mode.level(pixel); 3])
}

/// Apply the sepia matrix.
pub fn sepia(image: &Image) -> Image {
    image.map_pixels(|[r, g, b]| {
        SEPIA.map(|row| round_f32(row[0] * f32::from(r) + row[1] * f32::from(g) + row[2] * f32::from(b)))
    })
}

/// Mirror left to right.
pub fn flip_horizontal(image: &Image) -> Image {
    let last = image.width() - 1;
    image.derive(|i, j| image.pixel(i, last - j))
}

/// Mirror top to bottom.
pub fn flip_vertical(image: &Image) -> Image {
    let last = image.height() - 1;
    image.derive(|i, j| image.pixel(last - i, j))
}

/// Split into red, green and blue component images.
pub fn rgb_split(image: &Image) -> [Image; 3] {
    Channel::ALL.map(|channel| component(image, channel))
}

/// Combine the red channel of `red`, the green of `green` and the blue of
/// `blue`. All three must have the same dimensions.
pub fn rgb_combine(red: &Image, green: &Image, blue: &Image) -> ImagingResult<Image> {
    for (other, name) in [(green, "green"), (blue, "blue")] {
        if !other.same_size(red) {
            return Err(ImagingError::DimensionMismatch {
                context: format!("Cannot combine channels: {} image differs from red", name),
                expected_width: red.width(),
                expected_height: red.height(),
                width: other.width(),
                height: other.height(),
            });
        }
    }

    Ok(red.derive(|i, j| {
        [
            red.pixel(i, j)[0],
            green.pixel(i, j)[1],
            blue.pixel(i, j)[2],
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Image {
        Image::from_rows(&[
            vec![[255, 0, 0], [0, 255, 0]],
            vec![[0, 0, 255], [255, 255, 0]],
        ])
        .unwrap()
    }

    #[test]
    fn test_brighten_clamps() {
        let expected = Image::from_rows(&[
            vec![[255, 50, 50], [50, 255, 50]],
            vec![[50, 50, 255], [255, 255, 50]],
        ])
        .unwrap();
        assert_eq!(brighten(&scenario(), 50), expected);
        assert_eq!(brighten(&scenario(), -300), Image::filled(2, 2, [0, 0, 0]).unwrap());
    }

    #[test]
    fn test_luma() {
        let expected = Image::from_rows(&[
            vec![[54; 3], [182; 3]],
            vec![[18; 3], [237; 3]],
        ])
        .unwrap();
        assert_eq!(greyscale(&scenario(), GreyscaleMode::Luma), expected);
    }

    #[test]
    fn test_value_and_intensity() {
        assert_eq!(GreyscaleMode::Value.level([10, 200, 30]), 200);
        // 241 / 3 = 80.33
        assert_eq!(GreyscaleMode::Intensity.level([10, 200, 31]), 80);
        // 242 / 3 = 80.67
        assert_eq!(GreyscaleMode::Intensity.level([10, 200, 32]), 81);
        assert_eq!(GreyscaleMode::Intensity.level([255, 255, 255]), 255);
    }

    #[test]
    fn test_sepia() {
        let expected = Image::from_rows(&[
            vec![[100, 89, 69], [196, 175, 136]],
            vec![[48, 43, 33], [255, 255, 206]],
        ])
        .unwrap();
        assert_eq!(sepia(&scenario()), expected);
    }

    #[test]
    fn test_component() {
        let green = component(&scenario(), Channel::Green);
        assert_eq!(green.pixel(0, 1), [255, 255, 255]);
        assert_eq!(green.pixel(1, 0), [0, 0, 0]);
    }

    #[test]
    fn test_flips() {
        let image = Image::from_rows(&[
            vec![[1; 3], [2; 3], [3; 3]],
            vec![[4; 3], [5; 3], [6; 3]],
        ])
        .unwrap();

        let horizontal = flip_horizontal(&image);
        assert_eq!(horizontal.pixel(0, 0), [3; 3]);
        assert_eq!(horizontal.pixel(1, 2), [4; 3]);

        let vertical = flip_vertical(&image);
        assert_eq!(vertical.pixel(0, 0), [4; 3]);
        assert_eq!(vertical.pixel(1, 1), [2; 3]);
    }

    #[test]
    fn test_split_then_combine() {
        let [r, g, b] = rgb_split(&scenario());
        assert_eq!(r.pixel(0, 0), [255, 255, 255]);
        assert_eq!(b.pixel(1, 0), [255, 255, 255]);
        assert_eq!(rgb_combine(&r, &g, &b).unwrap(), scenario());
    }

    #[test]
    fn test_combine_rejects_mismatch() {
        let small = Image::filled(1, 1, [0; 3]).unwrap();
        let result = rgb_combine(&scenario(), &scenario(), &small);
        assert!(matches!(result, Err(ImagingError::DimensionMismatch { .. })));
    }
}
