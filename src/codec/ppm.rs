//! Plain-text PPM (P3) reading and writing.
//!
//! The reader drops blank lines and lines starting with `#`, then reads
//! whitespace-separated tokens: the `P3` magic, width, height, max value and
//! `width * height` RGB triples in row-major order. Samples are taken as-is;
//! a sample above the declared max value is an error.

use crate::core::error::{CodecError, CodecResult};
use crate::core::types::Image;
use std::fs;
use std::path::Path;

const MAGIC: &str = "P3";
const MAX_VALUE: u32 = 255;

/// Parse P3 text.
///
/// With `transpose` set, sample (row r, col c) is stored at (row c, col r),
/// so a W×H file yields an H×W image.
pub fn parse(text: &str, transpose: bool) -> CodecResult<Image> {
    let mut tokens = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace);

    match tokens.next() {
        Some(MAGIC) => {}
        Some(other) => {
            return Err(CodecError::Ppm(format!(
                "plain PPM must begin with {}, found '{}'",
                MAGIC, other
            )))
        }
        None => return Err(CodecError::Ppm("file is empty".to_string())),
    }

    let mut next_number = |what: &str| -> CodecResult<u32> {
        let token = tokens
            .next()
            .ok_or_else(|| CodecError::Ppm(format!("missing {}", what)))?;
        token
            .parse::<u32>()
            .map_err(|_| CodecError::Ppm(format!("{} '{}' is not a number", what, token)))
    };

    let width = next_number("width")?;
    let height = next_number("height")?;
    let max_value = next_number("max value")?;
    if !(1..=MAX_VALUE).contains(&max_value) {
        return Err(CodecError::Ppm(format!(
            "max value {} must be within 1 - {}",
            max_value, MAX_VALUE
        )));
    }

    let count = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| CodecError::Ppm(format!("{}x{} image is too large", width, height)))?;

    // Grows with the samples actually present; the header may lie.
    let mut samples = Vec::new();
    for _ in 0..count {
        let sample = next_number("sample")?;
        if sample > max_value {
            return Err(CodecError::Ppm(format!(
                "sample {} exceeds max value {}",
                sample, max_value
            )));
        }
        samples.push(sample as u8);
    }

    let image = Image::from_raw(width, height, samples)?;
    if transpose {
        return Ok(Image::from_fn(height, width, |row, col| image.pixel(col, row))?);
    }
    Ok(image)
}

/// Render P3 text with max value 255, one image row per line.
pub fn encode(image: &Image) -> String {
    let mut out = format!("{}\n{} {}\n{}\n", MAGIC, image.width(), image.height(), MAX_VALUE);
    for i in 0..image.height() {
        let row: Vec<String> = (0..image.width())
            .flat_map(|j| image.pixel(i, j))
            .map(|sample| sample.to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Read a P3 file.
pub fn read(path: &Path, transpose: bool) -> CodecResult<Image> {
    let text = fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, transpose)
}

/// Write a P3 file.
pub fn write(path: &Path, image: &Image) -> CodecResult<()> {
    fs::write(path, encode(image)).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ImagingError;

    const SAMPLE: &str = "P3\n# made by hand\n3 2\n255\n\n\
        255 0 0   0 255 0   0 0 255\n\
        10 20 30  40 50 60  70 80 90\n";

    #[test]
    fn test_parse_with_comments_and_blanks() {
        let image = parse(SAMPLE, false).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.pixel(0, 1), [0, 255, 0]);
        assert_eq!(image.pixel(1, 2), [70, 80, 90]);
    }

    #[test]
    fn test_parse_transposed() {
        let image = parse(SAMPLE, true).unwrap();
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(image.pixel(1, 0), [0, 255, 0]);
        assert_eq!(image.pixel(2, 1), [70, 80, 90]);
    }

    #[test]
    fn test_tokens_may_span_lines() {
        let image = parse("P3 1\n1 255 7\n8\n9", false).unwrap();
        assert_eq!(image.pixel(0, 0), [7, 8, 9]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(matches!(parse("P6\n1 1\n255\n0 0 0", false), Err(CodecError::Ppm(_))));
        assert!(matches!(parse("", false), Err(CodecError::Ppm(_))));
    }

    #[test]
    fn test_rejects_missing_and_bad_tokens() {
        assert!(matches!(parse("P3\n2 1\n255\n1 2 3 4 5", false), Err(CodecError::Ppm(_))));
        assert!(matches!(parse("P3\n1 1\n255\n1 x 3", false), Err(CodecError::Ppm(_))));
        assert!(matches!(parse("P3\n1 1\n15\n1 16 3", false), Err(CodecError::Ppm(_))));
        assert!(matches!(parse("P3\n1 1\n0\n0 0 0", false), Err(CodecError::Ppm(_))));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        assert!(matches!(
            parse("P3 200000 200000 255 1 2 3", false),
            Err(CodecError::Ppm(_))
        ));
        assert!(matches!(
            parse("P3 4294967295 4294967295 255 1 2 3", false),
            Err(CodecError::Ppm(_))
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            parse("P3\n0 4\n255\n", false),
            Err(CodecError::Imaging(ImagingError::EmptyImage { .. }))
        ));
    }

    #[test]
    fn test_encode_layout() {
        let image = Image::from_rows(&[vec![[1, 2, 3], [4, 5, 6]]]).unwrap();
        assert_eq!(encode(&image), "P3\n2 1\n255\n1 2 3 4 5 6\n");
        assert_eq!(parse(&encode(&image), false).unwrap(), image);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.ppm");
        let image = parse(SAMPLE, false).unwrap();

        write(&path, &image).unwrap();
        assert_eq!(read(&path, false).unwrap(), image);
        assert!(matches!(
            read(&dir.path().join("absent.ppm"), false),
            Err(CodecError::Io { .. })
        ));
    }
}
