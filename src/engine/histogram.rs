//! Per-channel histograms and peak-alignment color correction.

use crate::core::types::{Channel, Image, Percentage};
use crate::engine::clamp_int;

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Three 256-bin histograms, one per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [[u32; BINS]; 3],
}

impl Histogram {
    /// Count every pixel of `image`.
    pub fn compute(image: &Image) -> Self {
        Self::compute_columns(image, image.width() - 1)
    }

    /// Count pixels in columns `0..=last_column`, clamped to the image.
    pub fn compute_columns(image: &Image, last_column: u32) -> Self {
        let last_column = last_column.min(image.width() - 1);
        let mut counts = [[0u32; BINS]; 3];
        for i in 0..image.height() {
            for j in 0..=last_column {
                let pixel = image.pixel(i, j);
                for (channel, &level) in counts.iter_mut().zip(pixel.iter()) {
                    channel[usize::from(level)] += 1;
                }
            }
        }
        Self { counts }
    }

    /// Bin counts for one channel.
    pub fn channel(&self, channel: Channel) -> &[u32; BINS] {
        &self.counts[channel.index()]
    }

    /// Most frequent level of a channel. Ties go to the lowest level.
    pub fn peak(&self, channel: Channel) -> u8 {
        let mut best = 0usize;
        for (level, &count) in self.channel(channel).iter().enumerate() {
            if count > self.channel(channel)[best] {
                best = level;
            }
        }
        best as u8
    }

    /// Largest bin of a channel.
    pub fn max_count(&self, channel: Channel) -> u32 {
        self.channel(channel).iter().copied().max().unwrap_or(0)
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> u64 {
        self.counts[0].iter().map(|&c| u64::from(c)).sum()
    }
}

/// Shift each channel so its histogram peak lands on the mean peak.
///
/// With a split percentage the histogram is taken over columns
/// `j <= split_index` only, and columns to the right pass through.
pub fn color_correct(image: &Image, split: Option<Percentage>) -> Image {
    let split_index = split.unwrap_or(Percentage::FULL).split_index(image.width());
    let histogram = Histogram::compute_columns(image, split_index);

    let peaks = Channel::ALL.map(|c| i64::from(histogram.peak(c)));
    let average = (peaks[0] + peaks[1] + peaks[2]) / 3;
    let offsets = peaks.map(|peak| average - peak);

    log::debug!("Color correction peaks {:?}, offsets {:?}", peaks, offsets);

    image.derive(|i, j| {
        let pixel = image.pixel(i, j);
        if j > split_index {
            return pixel;
        }
        [
            clamp_int(i64::from(pixel[0]) + offsets[0]),
            clamp_int(i64::from(pixel[1]) + offsets[1]),
            clamp_int(i64::from(pixel[2]) + offsets[2]),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_total() {
        let image = Image::from_rows(&[
            vec![[0, 10, 255], [0, 20, 255]],
            vec![[5, 10, 255], [0, 10, 0]],
        ])
        .unwrap();
        let histogram = Histogram::compute(&image);

        assert_eq!(histogram.channel(Channel::Red)[0], 3);
        assert_eq!(histogram.channel(Channel::Green)[10], 3);
        assert_eq!(histogram.max_count(Channel::Blue), 3);
        assert_eq!(histogram.total(), 4);
    }

    #[test]
    fn test_peak_ties_prefer_lowest() {
        let image = Image::from_rows(&[vec![[200, 1, 1], [100, 1, 1]]]).unwrap();
        assert_eq!(Histogram::compute(&image).peak(Channel::Red), 100);
    }

    #[test]
    fn test_column_window_is_clamped() {
        let image = Image::filled(3, 2, [7, 7, 7]).unwrap();
        assert_eq!(Histogram::compute_columns(&image, 0).total(), 2);
        assert_eq!(Histogram::compute_columns(&image, 99).total(), 6);
    }

    #[test]
    fn test_color_correct_aligns_peaks() {
        // Peaks at 100, 130, 160: average 130
        let image = Image::from_rows(&[
            vec![[100, 130, 160], [100, 130, 160]],
            vec![[90, 140, 200], [100, 130, 160]],
        ])
        .unwrap();
        let corrected = color_correct(&image, None);

        assert_eq!(corrected.pixel(0, 0), [130, 130, 130]);
        assert_eq!(corrected.pixel(1, 0), [120, 140, 170]);
    }

    #[test]
    fn test_color_correct_split_passes_right_columns() {
        let image = Image::from_fn(4, 2, |_, j| [50 + j as u8, 100, 150]).unwrap();
        let corrected = color_correct(&image, Some(Percentage::new(25).unwrap()));

        // Split index 1: columns 0 and 1 corrected, 2 and 3 untouched
        assert_ne!(corrected.pixel(0, 0), image.pixel(0, 0));
        assert_ne!(corrected.pixel(0, 1), image.pixel(0, 1));
        assert_eq!(corrected.pixel(0, 2), image.pixel(0, 2));
        assert_eq!(corrected.pixel(1, 3), image.pixel(1, 3));
    }
}
