//! Reading and writing images on disk.
//!
//! The file extension picks the codec: `.ppm` goes through the plain-text
//! reader in [`ppm`], everything else the `image` crate recognises is decoded
//! by it and converted to 8-bit RGB.

pub mod ppm;

use crate::config::PpmOptions;
use crate::core::error::{CodecError, CodecResult};
use crate::core::types::Image;
use image::ImageFormat;
use std::fs;
use std::path::Path;

/// The codec selected for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Plain-text PPM.
    Ppm,
    /// A raster format handled by the `image` crate.
    Raster(ImageFormat),
}

impl FileFormat {
    /// Pick the codec from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> CodecResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if extension == "ppm" {
            return Ok(FileFormat::Ppm);
        }
        ImageFormat::from_extension(&extension)
            .map(FileFormat::Raster)
            .ok_or_else(|| CodecError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
    }
}

/// Load an image, dropping any alpha channel.
pub fn load_image(path: &Path, options: &PpmOptions) -> CodecResult<Image> {
    let image = match FileFormat::from_path(path)? {
        FileFormat::Ppm => ppm::read(path, options.transpose_on_read)?,
        FileFormat::Raster(format) => {
            let bytes = fs::read(path).map_err(|source| CodecError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let decoded = image::load_from_memory_with_format(&bytes, format)?;
            Image::from_buffer(decoded.to_rgb8())?
        }
    };

    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Save an image in the format named by the path's extension.
pub fn save_image(path: &Path, image: &Image) -> CodecResult<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Ppm => ppm::write(path, image)?,
        FileFormat::Raster(format) => image.as_buffer().save_with_format(path, format)?,
    }

    log::debug!("Saved {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}
