//! Named single-input effects.
//!
//! Every effect can be applied to the whole image, to a column split, or
//! through a black mask. Kernel effects filter only the split region; the
//! others transform the whole image and composite.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{Channel, Image, Percentage};
use crate::engine::compose::{mask_partial, split_preview};
use crate::engine::kernel::{convolve, Kernel};
use crate::engine::tone::{self, GreyscaleMode};
use std::fmt;

/// A single-input, same-size transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Blur,
    Sharpen,
    Sepia,
    Greyscale(GreyscaleMode),
    Component(Channel),
    FlipHorizontal,
    FlipVertical,
}

impl Effect {
    /// Every effect paired with its command word.
    pub const NAMED: [(&'static str, Effect); 12] = [
        ("blur", Effect::Blur),
        ("sharpen", Effect::Sharpen),
        ("sepia", Effect::Sepia),
        ("grayscale", Effect::Greyscale(GreyscaleMode::Luma)),
        ("luma-component", Effect::Greyscale(GreyscaleMode::Luma)),
        ("value-component", Effect::Greyscale(GreyscaleMode::Value)),
        ("intensity-component", Effect::Greyscale(GreyscaleMode::Intensity)),
        ("red-component", Effect::Component(Channel::Red)),
        ("green-component", Effect::Component(Channel::Green)),
        ("blue-component", Effect::Component(Channel::Blue)),
        ("horizontal-flip", Effect::FlipHorizontal),
        ("flip", Effect::FlipVertical),
    ];

    /// Look an effect up by command word (case-insensitive).
    pub fn from_name(name: &str) -> ImagingResult<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::NAMED
            .iter()
            .find(|(word, _)| *word == lowered)
            .map(|(_, effect)| *effect)
            .ok_or_else(|| ImagingError::UnsupportedFilter(name.to_string()))
    }

    /// Canonical command word.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Blur => "blur",
            Effect::Sharpen => "sharpen",
            Effect::Sepia => "sepia",
            Effect::Greyscale(GreyscaleMode::Luma) => "luma-component",
            Effect::Greyscale(GreyscaleMode::Value) => "value-component",
            Effect::Greyscale(GreyscaleMode::Intensity) => "intensity-component",
            Effect::Component(Channel::Red) => "red-component",
            Effect::Component(Channel::Green) => "green-component",
            Effect::Component(Channel::Blue) => "blue-component",
            Effect::FlipHorizontal => "horizontal-flip",
            Effect::FlipVertical => "flip",
        }
    }

    fn kernel(self) -> Option<Kernel> {
        match self {
            Effect::Blur => Some(Kernel::blur()),
            Effect::Sharpen => Some(Kernel::sharpen()),
            _ => None,
        }
    }

    /// Apply to the whole image.
    pub fn apply(self, image: &Image) -> Image {
        match self {
            Effect::Blur => convolve(image, &Kernel::blur(), None),
            Effect::Sharpen => convolve(image, &Kernel::sharpen(), None),
            Effect::Sepia => tone::sepia(image),
            Effect::Greyscale(mode) => tone::greyscale(image, mode),
            Effect::Component(channel) => tone::component(image, channel),
            Effect::FlipHorizontal => tone::flip_horizontal(image),
            Effect::FlipVertical => tone::flip_vertical(image),
        }
    }

    /// Apply to columns `j <= split_index`; the rest keep the input.
    pub fn apply_split(self, image: &Image, split: Percentage) -> ImagingResult<Image> {
        match self.kernel() {
            Some(kernel) => Ok(convolve(image, &kernel, Some(split))),
            None => split_preview(image, &self.apply(image), split),
        }
    }

    /// Apply where `mask` is pure black; elsewhere keep the input.
    pub fn apply_masked(self, image: &Image, mask: &Image) -> ImagingResult<Image> {
        mask_partial(image, &self.apply(image), mask)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Image {
        Image::from_fn(6, 4, |i, j| [(i * 40) as u8, (j * 30) as u8, 90]).unwrap()
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Effect::from_name("grayscale").unwrap(), Effect::Greyscale(GreyscaleMode::Luma));
        assert_eq!(Effect::from_name("FLIP").unwrap(), Effect::FlipVertical);
        assert_eq!(
            Effect::from_name("blue-component").unwrap(),
            Effect::Component(Channel::Blue)
        );
        assert!(matches!(
            Effect::from_name("emboss"),
            Err(ImagingError::UnsupportedFilter(_))
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for (_, effect) in Effect::NAMED {
            assert_eq!(Effect::from_name(effect.name()).unwrap(), effect);
        }
    }

    #[test]
    fn test_split_matches_kernel_split_for_every_effect() {
        let image = gradient();
        let split = Percentage::new(40).unwrap();
        let split_index = split.split_index(image.width());

        for (_, effect) in Effect::NAMED {
            let full = effect.apply(&image);
            let partial = effect.apply_split(&image, split).unwrap();
            for i in 0..image.height() {
                for j in 0..image.width() {
                    let expected = if j <= split_index { full.pixel(i, j) } else { image.pixel(i, j) };
                    assert_eq!(partial.pixel(i, j), expected, "{} at ({}, {})", effect, i, j);
                }
            }
        }
    }

    #[test]
    fn test_black_mask_is_full_effect() {
        let image = gradient();
        let black = Image::filled(6, 4, [0, 0, 0]).unwrap();
        let white = Image::filled(6, 4, [255, 255, 255]).unwrap();

        for (_, effect) in Effect::NAMED {
            assert_eq!(effect.apply_masked(&image, &black).unwrap(), effect.apply(&image));
            assert_eq!(effect.apply_masked(&image, &white).unwrap(), image);
        }
    }

    #[test]
    fn test_mask_must_match() {
        let mask = Image::filled(2, 2, [0, 0, 0]).unwrap();
        for effect in [Effect::Sepia, Effect::Blur] {
            match effect.apply_masked(&gradient(), &mask) {
                Err(ImagingError::DimensionMismatch {
                    expected_width,
                    expected_height,
                    width,
                    height,
                    ..
                }) => assert_eq!((expected_width, expected_height, width, height), (6, 4, 2, 2)),
                other => panic!("expected a dimension mismatch, got {:?}", other),
            }
        }
    }
}
