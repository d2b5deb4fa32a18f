//! Odd-sized 2-D convolution with a zero boundary.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{Image, Percentage};
use crate::engine::{clamp_channel, round_half_up};

/// A square convolution kernel with an odd side.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

/// 3×3 blur weights.
const BLUR_WEIGHTS: [f64; 9] = [
    0.0625, 0.125, 0.0625, //
    0.125, 0.25, 0.125, //
    0.0625, 0.125, 0.0625,
];

/// 5×5 sharpen weights.
const SHARPEN_WEIGHTS: [f64; 25] = [
    -0.125, -0.125, -0.125, -0.125, -0.125, //
    -0.125, 0.25, 0.25, 0.25, -0.125, //
    -0.125, 0.25, 1.0, 0.25, -0.125, //
    -0.125, 0.25, 0.25, 0.25, -0.125, //
    -0.125, -0.125, -0.125, -0.125, -0.125,
];

impl Kernel {
    /// Build a kernel from row-major weights.
    pub fn new(size: usize, weights: Vec<f64>) -> ImagingResult<Self> {
        if size % 2 == 0 || weights.len() != size * size {
            return Err(ImagingError::InvalidKernel {
                size,
                len: weights.len(),
            });
        }
        Ok(Self { size, weights })
    }

    /// The 3×3 blur kernel.
    pub fn blur() -> Self {
        Self {
            size: 3,
            weights: BLUR_WEIGHTS.to_vec(),
        }
    }

    /// The 5×5 sharpen kernel.
    pub fn sharpen() -> Self {
        Self {
            size: 5,
            weights: SHARPEN_WEIGHTS.to_vec(),
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Half the side length, rounded down.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at (row, col) of the kernel.
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.size + col]
    }
}

/// Convolve `image` with `kernel`.
///
/// With a split percentage only columns `j <= split_index` are filtered and
/// the rest are copied from the input. Neighbours outside the image
/// contribute zero. Sums are clamped to `[0, 255]` before rounding.
pub fn convolve(image: &Image, kernel: &Kernel, split: Option<Percentage>) -> Image {
    let (width, height) = image.dimensions();
    let split_index = split.unwrap_or(Percentage::FULL).split_index(width);
    let radius = kernel.radius() as i64;

    log::debug!(
        "Convolving {}x{} image with {}x{} kernel up to column {}",
        width,
        height,
        kernel.size(),
        kernel.size(),
        split_index
    );

    image.derive(|i, j| {
        if j > split_index {
            return image.pixel(i, j);
        }

        let mut sums = [0.0f64; 3];
        for ki in -radius..=radius {
            for kj in -radius..=radius {
                let ni = i64::from(i) + ki;
                let nj = i64::from(j) + kj;
                if ni < 0 || nj < 0 || ni >= i64::from(height) || nj >= i64::from(width) {
                    continue;
                }
                let neighbour = image.pixel(ni as u32, nj as u32);
                let weight = kernel.weight((ki + radius) as usize, (kj + radius) as usize);
                for (sum, &channel) in sums.iter_mut().zip(neighbour.iter()) {
                    *sum += f64::from(channel) * weight;
                }
            }
        }

        sums.map(|sum| clamp_channel(round_half_up(sum.clamp(0.0, 255.0))))
    })
}
