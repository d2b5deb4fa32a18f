//! Histogram line-plot rendering.

use crate::core::types::{Channel, Image};
use crate::engine::histogram::{Histogram, BINS};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Side of the rendered plot in pixels.
pub const PLOT_SIZE: u32 = 256;

/// Grid spacing in pixels.
const GRID_STEP: u32 = 10;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([192, 192, 192]);

/// Scale a channel's bins so the largest maps to 255 (integer division).
pub fn normalize(counts: &[u32; BINS]) -> [u32; BINS] {
    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    counts.map(|count| (u64::from(count) * 255 / u64::from(max)) as u32)
}

/// Render the R, G and B histograms of `image` as a 256×256 line plot.
///
/// White background, light-grey grid every 10 pixels, then one polyline per
/// channel in its pure color. Later channels paint over earlier ones.
pub fn render_histogram(image: &Image) -> Image {
    let histogram = Histogram::compute(image);
    let mut canvas = RgbImage::from_fn(PLOT_SIZE, PLOT_SIZE, |x, y| {
        if x % GRID_STEP == 0 || y % GRID_STEP == 0 {
            GRID
        } else {
            BACKGROUND
        }
    });

    for channel in Channel::ALL {
        let heights = normalize(histogram.channel(channel));
        let color = Rgb(channel.pure_color());
        for (i, pair) in heights.windows(2).enumerate() {
            let start = (i as f32, (255 - pair[0]) as f32);
            let end = ((i + 1) as f32, (255 - pair[1]) as f32);
            draw_line_segment_mut(&mut canvas, start, end, color);
        }
    }

    log::debug!("Rendered histogram of {}x{} image", image.width(), image.height());

    Image::from_canvas(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut counts = [0u32; BINS];
        counts[3] = 4;
        counts[7] = 2;
        counts[9] = 1;
        let normalized = normalize(&counts);

        assert_eq!(normalized[3], 255);
        assert_eq!(normalized[7], 127);
        assert_eq!(normalized[9], 63);
        assert_eq!(normalize(&[0; BINS]), [0; BINS]);
    }

    #[test]
    fn test_plot_size_and_background() {
        let image = Image::filled(3, 5, [128, 128, 128]).unwrap();
        let plot = render_histogram(&image);

        assert_eq!(plot.dimensions(), (PLOT_SIZE, PLOT_SIZE));
        assert_eq!(plot.pixel(5, 5), [255, 255, 255]);
        assert_eq!(plot.pixel(20, 15), [192, 192, 192]);
    }

    #[test]
    fn test_blue_paints_last() {
        // Every channel is zero except at level 128; the baseline row 255 is
        // shared by all three polylines, so blue wins there.
        let image = Image::filled(2, 2, [128, 128, 128]).unwrap();
        let plot = render_histogram(&image);

        assert_eq!(plot.pixel(255, 5), [0, 0, 255]);
        assert_eq!(plot.pixel(0, 128), [0, 0, 255]);
    }

    #[test]
    fn test_channels_separate_when_levels_differ() {
        let image = Image::filled(2, 2, [10, 20, 30]).unwrap();
        let plot = render_histogram(&image);

        assert_eq!(plot.pixel(0, 10), [255, 0, 0]);
        assert_eq!(plot.pixel(0, 20), [0, 255, 0]);
        assert_eq!(plot.pixel(0, 30), [0, 0, 255]);
    }
}
