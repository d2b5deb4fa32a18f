//! Haar-wavelet compression.
//!
//! Each channel is copied into a zero-padded square plane whose side is the
//! smallest power of two covering the image. The plane is transformed in
//! place, small coefficients are zeroed, and the inverse transform restores
//! pixel values. Planes hold integers: every 1-D step is rounded half-up as
//! it is stored back.

use crate::config::CompressionMode;
use crate::core::types::{Image, Percentage};
use crate::engine::{clamp_int, round_half_up};
use std::f64::consts::SQRT_2;

/// Percentile used by [`CompressionMode::Reference`].
pub const REFERENCE_PERCENTILE: u8 = 90;

/// One 1-D Haar step: pairwise averages followed by pairwise differences,
/// both scaled by `1/sqrt(2)`. Odd-length input is zero-padded to the next
/// power of two.
pub fn haar_1d(sequence: &[f64]) -> Vec<f64> {
    let padded = pad_to_even(sequence);
    let half = padded.len() / 2;
    let mut result = vec![0.0; padded.len()];
    for (k, pair) in padded.chunks_exact(2).enumerate() {
        result[k] = (pair[0] + pair[1]) / SQRT_2;
        result[half + k] = (pair[0] - pair[1]) / SQRT_2;
    }
    result
}

/// Invert [`haar_1d`]: interleave `(A[k] + D[k]) / sqrt(2)` and
/// `(A[k] - D[k]) / sqrt(2)`.
pub fn inverse_haar_1d(sequence: &[f64]) -> Vec<f64> {
    let padded = pad_to_even(sequence);
    let (averages, differences) = padded.split_at(padded.len() / 2);
    averages
        .iter()
        .zip(differences)
        .flat_map(|(a, d)| [(a + d) / SQRT_2, (a - d) / SQRT_2])
        .collect()
}

fn pad_to_even(sequence: &[f64]) -> Vec<f64> {
    let mut padded = sequence.to_vec();
    if padded.len() % 2 != 0 {
        padded.resize(padded.len().next_power_of_two().max(2), 0.0);
    }
    padded
}

/// A square integer plane of power-of-two side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaarPlane {
    size: usize,
    cells: Vec<i64>,
}

impl HaarPlane {
    /// An all-zero plane.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.cells[row * self.size + col] = value;
    }

    /// Forward transform: for `c = size, size/2, .., 2` transform the
    /// leading `c` entries of rows `0..c`, then of columns `0..c`.
    pub fn forward(&mut self) {
        let mut c = self.size;
        while c >= 2 {
            self.transform_rows(c, haar_1d);
            self.transform_columns(c, haar_1d);
            c /= 2;
        }
    }

    /// Inverse transform: for `c = 2, 4, .., size` invert columns, then rows,
    /// of the leading `c`×`c` block.
    pub fn inverse(&mut self) {
        let mut c = 2;
        while c <= self.size {
            self.transform_columns(c, inverse_haar_1d);
            self.transform_rows(c, inverse_haar_1d);
            c *= 2;
        }
    }

    fn transform_rows(&mut self, c: usize, step: fn(&[f64]) -> Vec<f64>) {
        for i in 0..c {
            let row: Vec<f64> = (0..c).map(|j| self.get(i, j) as f64).collect();
            for (j, value) in step(&row).into_iter().take(c).enumerate() {
                self.set(i, j, round_half_up(value) as i64);
            }
        }
    }

    fn transform_columns(&mut self, c: usize, step: fn(&[f64]) -> Vec<f64>) {
        for j in 0..c {
            let column: Vec<f64> = (0..c).map(|i| self.get(i, j) as f64).collect();
            for (i, value) in step(&column).into_iter().take(c).enumerate() {
                self.set(i, j, round_half_up(value) as i64);
            }
        }
    }

    /// The signed value at percentile `percentage` of all cells.
    ///
    /// Index is `ceil(p/100 * N) - 1`, clamped to the plane.
    pub fn percentile(&self, percentage: u8) -> i64 {
        let mut sorted = self.cells.clone();
        sorted.sort_unstable();
        let n = sorted.len();
        let rank = (u64::from(percentage) * n as u64).div_ceil(100) as i64 - 1;
        sorted[rank.clamp(0, n as i64 - 1) as usize]
    }

    /// Zero every cell whose magnitude is below `threshold`.
    pub fn apply_threshold(&mut self, threshold: i64) {
        for cell in &mut self.cells {
            if cell.abs() < threshold {
                *cell = 0;
            }
        }
    }

    /// Zero every cell outside the leading `width`×`height` window.
    pub fn crop_window(&mut self, width: usize, height: usize) {
        for i in 0..self.size {
            for j in 0..self.size {
                if i >= height || j >= width {
                    self.set(i, j, 0);
                }
            }
        }
    }
}

/// Side of the padded square for an image: the smallest power of two
/// covering both dimensions.
pub fn padded_size(width: u32, height: u32) -> usize {
    (width.max(height) as usize).next_power_of_two()
}

/// Compress `image` by zeroing Haar coefficients below a percentile.
///
/// [`CompressionMode::Percentile`] thresholds at `percentage`.
/// [`CompressionMode::Reference`] ignores `percentage`, thresholds at the
/// 90th percentile and discards coefficients outside the image window
/// before inverting.
pub fn compress(image: &Image, percentage: Percentage, mode: CompressionMode) -> Image {
    let (width, height) = image.dimensions();
    let size = padded_size(width, height);
    let percentile = match mode {
        CompressionMode::Percentile => percentage.value(),
        CompressionMode::Reference => REFERENCE_PERCENTILE,
    };

    let mut planes: [HaarPlane; 3] = std::array::from_fn(|_| HaarPlane::zeros(size));
    for i in 0..height {
        for j in 0..width {
            let pixel = image.pixel(i, j);
            for (plane, &level) in planes.iter_mut().zip(pixel.iter()) {
                plane.set(i as usize, j as usize, i64::from(level));
            }
        }
    }

    for plane in &mut planes {
        plane.forward();
        let threshold = plane.percentile(percentile);
        log::debug!("Haar plane {}x{}: threshold {} at {}%", size, size, threshold, percentile);
        plane.apply_threshold(threshold);
        if mode == CompressionMode::Reference {
            plane.crop_window(width as usize, height as usize);
        }
        plane.inverse();
    }

    image.derive(|i, j| {
        let (i, j) = (i as usize, j as usize);
        [
            clamp_int(planes[0].get(i, j)),
            clamp_int(planes[1].get(i, j)),
            clamp_int(planes[2].get(i, j)),
        ]
    })
}
