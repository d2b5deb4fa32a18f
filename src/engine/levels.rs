//! Black/mid/white levels remapping.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{Image, Percentage};
use crate::engine::clamp_channel;

/// A validated (shadow, mid, white) triple with `0 <= s < m < w <= 255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Levels {
    shadow: u8,
    mid: u8,
    white: u8,
}

impl Levels {
    /// Validate a triple.
    pub fn new(shadow: i64, mid: i64, white: i64) -> ImagingResult<Self> {
        let invalid = |reason: &str| ImagingError::InvalidLevels {
            shadow,
            mid,
            white,
            reason: reason.to_string(),
        };

        for value in [shadow, mid, white] {
            if !(0..=255).contains(&value) {
                return Err(invalid("each level must be within 0 - 255"));
            }
        }
        if shadow >= mid || mid >= white {
            return Err(invalid("levels must satisfy shadow < mid < white"));
        }

        Ok(Self {
            shadow: shadow as u8,
            mid: mid as u8,
            white: white as u8,
        })
    }

    pub fn shadow(&self) -> u8 {
        self.shadow
    }

    pub fn mid(&self) -> u8 {
        self.mid
    }

    pub fn white(&self) -> u8 {
        self.white
    }

    /// Map one level. The result is clamped, then truncated.
    pub fn map(&self, value: u8) -> u8 {
        let shadow = f64::from(self.shadow);
        let mid = f64::from(self.mid);
        let scale = 255.0 / (f64::from(self.white) - shadow);
        let mid_point = (mid - shadow) * scale;

        let adjusted = (f64::from(value) - shadow) * scale;
        let adjusted = if adjusted < mid_point {
            adjusted * (mid_point / (mid_point - shadow))
        } else {
            adjusted * (255.0 - mid_point) / (255.0 - mid)
        };

        clamp_channel(adjusted)
    }

    /// Precompute [`map`](Self::map) for every level.
    pub fn lut(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (level, slot) in lut.iter_mut().enumerate() {
            *slot = self.map(level as u8);
        }
        lut
    }
}

/// Remap every channel through `levels`.
///
/// With a split percentage columns right of the split index pass through.
pub fn adjust_levels(image: &Image, levels: Levels, split: Option<Percentage>) -> Image {
    let split_index = split.unwrap_or(Percentage::FULL).split_index(image.width());
    let lut = levels.lut();

    log::debug!(
        "Levels ({}, {}, {}) up to column {}",
        levels.shadow,
        levels.mid,
        levels.white,
        split_index
    );

    image.derive(|i, j| {
        let pixel = image.pixel(i, j);
        if j > split_index {
            pixel
        } else {
            pixel.map(|c| lut[usize::from(c)])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(Levels::new(0, 128, 255).is_ok());
        assert!(Levels::new(24, 67, 100).is_ok());
        assert!(Levels::new(10, 10, 20).is_err());
        assert!(Levels::new(30, 20, 10).is_err());
        assert!(Levels::new(-1, 20, 30).is_err());
        assert!(Levels::new(10, 20, 256).is_err());
    }

    #[test]
    fn test_map_truncates() {
        let levels = Levels::new(24, 67, 100).unwrap();
        assert_eq!(levels.map(124), 197);
        assert_eq!(levels.map(60), 144);
        assert_eq!(levels.map(26), 8);
        assert_eq!(levels.map(0), 0);
        assert_eq!(levels.map(255), 255);
    }

    #[test]
    fn test_scenario() {
        let image = Image::from_rows(&[
            vec![[255, 124, 70], [0, 60, 0]],
            vec![[0, 50, 26], [54, 93, 0]],
        ])
        .unwrap();
        let expected = Image::from_rows(&[
            vec![[255, 197, 90], [0, 144, 0]],
            vec![[0, 104, 8], [120, 136, 0]],
        ])
        .unwrap();

        let levels = Levels::new(24, 67, 100).unwrap();
        assert_eq!(adjust_levels(&image, levels, None), expected);
    }

    #[test]
    fn test_lut_matches_map() {
        let levels = Levels::new(5, 120, 240).unwrap();
        let lut = levels.lut();
        for level in 0..=255u8 {
            assert_eq!(lut[usize::from(level)], levels.map(level));
        }
    }

    #[test]
    fn test_split() {
        let image = Image::filled(4, 1, [60, 60, 60]).unwrap();
        let levels = Levels::new(24, 67, 100).unwrap();
        let result = adjust_levels(&image, levels, Some(Percentage::new(50).unwrap()));

        assert_eq!(result.pixel(0, 2), [144; 3]);
        assert_eq!(result.pixel(0, 3), [60; 3]);
    }
}
