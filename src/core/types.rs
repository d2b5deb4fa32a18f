//! Core value types: the pixel buffer and the small typed values that
//! parameterize transformations.
//!
//! [`Image`] wraps an `image::RgbImage` behind an `Arc`. Images are immutable
//! once built, so cloning one (for example when the store snapshots an
//! original) only bumps a reference count.

use crate::core::error::{ImagingError, ImagingResult};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One RGB pixel as `[r, g, b]`.
pub type Pixel = [u8; 3];

/// An immutable 8-bit RGB raster addressed by (row, col).
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    buffer: Arc<RgbImage>,
}

impl Image {
    /// Wrap a decoded buffer. Zero-sized buffers are rejected.
    pub fn from_buffer(buffer: RgbImage) -> ImagingResult<Self> {
        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return Err(ImagingError::EmptyImage { width, height });
        }
        Ok(Self {
            buffer: Arc::new(buffer),
        })
    }

    /// Wrap a buffer the crate built itself with known non-zero dimensions.
    pub(crate) fn from_canvas(buffer: RgbImage) -> Self {
        debug_assert!(buffer.width() > 0 && buffer.height() > 0);
        Self {
            buffer: Arc::new(buffer),
        }
    }

    /// Build an image from row-major interleaved RGB samples.
    pub fn from_raw(width: u32, height: u32, samples: Vec<u8>) -> ImagingResult<Self> {
        let expected = width as usize * height as usize * 3;
        if samples.len() != expected {
            return Err(ImagingError::BufferLength {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        let buffer = RgbImage::from_raw(width, height, samples).ok_or(ImagingError::BufferLength {
            width,
            height,
            expected,
            actual: expected,
        })?;
        Self::from_buffer(buffer)
    }

    /// Build an image from rows of pixels. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<Pixel>]) -> ImagingResult<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        if let Some(row) = rows.iter().find(|row| row.len() as u32 != width) {
            return Err(ImagingError::DimensionMismatch {
                context: "Rows must have equal length".to_string(),
                expected_width: width,
                expected_height: height,
                width: row.len() as u32,
                height,
            });
        }
        let samples = rows.iter().flatten().flatten().copied().collect();
        Self::from_raw(width, height, samples)
    }

    /// Build an image by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> ImagingResult<Self>
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        Self::from_buffer(RgbImage::from_fn(width, height, |x, y| Rgb(f(y, x))))
    }

    /// A single-color image.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> ImagingResult<Self> {
        Self::from_fn(width, height, |_, _| pixel)
    }

    /// Width in pixels (number of columns).
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height in pixels (number of rows).
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Whether `other` has the same width and height.
    pub fn same_size(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Pixel at (row, col). Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, row: u32, col: u32) -> Pixel {
        self.buffer.get_pixel(col, row).0
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.buffer.pixels().map(|p| p.0)
    }

    /// Map every pixel through `f`, keeping the dimensions.
    pub fn map_pixels<F>(&self, mut f: F) -> Image
    where
        F: FnMut(Pixel) -> Pixel,
    {
        Self::from_canvas(RgbImage::from_fn(self.width(), self.height(), |x, y| {
            Rgb(f(self.buffer.get_pixel(x, y).0))
        }))
    }

    /// Build an image of the same size by evaluating `f(row, col)`.
    pub(crate) fn derive<F>(&self, mut f: F) -> Image
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        Self::from_canvas(RgbImage::from_fn(self.width(), self.height(), |x, y| Rgb(f(y, x))))
    }

    /// Borrow the underlying buffer (for encoders).
    pub fn as_buffer(&self) -> &RgbImage {
        &self.buffer
    }

    /// Whether both handles point at the same pixel storage.
    pub fn shares_storage(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width() * self.height() <= 16 {
            let rows: Vec<Vec<Pixel>> = (0..self.height())
                .map(|i| (0..self.width()).map(|j| self.pixel(i, j)).collect())
                .collect();
            f.debug_struct("Image")
                .field("width", &self.width())
                .field("height", &self.height())
                .field("rows", &rows)
                .finish()
        } else {
            f.debug_struct("Image")
                .field("width", &self.width())
                .field("height", &self.height())
                .finish_non_exhaustive()
        }
    }
}

/// One of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in R, G, B order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Index of this channel inside a [`Pixel`].
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// The pure color of this channel.
    pub const fn pure_color(self) -> Pixel {
        match self {
            Channel::Red => [255, 0, 0],
            Channel::Green => [0, 255, 0],
            Channel::Blue => [0, 0, 255],
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

/// An integer percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(u8);

impl Percentage {
    /// 100%: the whole image.
    pub const FULL: Percentage = Percentage(100);

    /// Validate and wrap a percentage.
    pub fn new(value: i64) -> ImagingResult<Self> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ImagingError::PercentageOutOfRange(value))
        }
    }

    /// The raw value.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Rightmost column still inside a split preview: `floor(width * p / 100)`.
    ///
    /// May equal `width` when the percentage is 100.
    pub fn split_index(self, width: u32) -> u32 {
        (u64::from(width) * u64::from(self.0) / 100) as u32
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A parsed operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed integer argument (deltas, percentages, levels, sizes)
    Integer(i64),
    /// Free-form text argument (file paths)
    String(String),
}

impl Value {
    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}
