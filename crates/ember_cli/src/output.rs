//! Image writers: plain PPM and PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ember_math::Color;
use ember_renderer::ImageBuffer;

/// Gamma-correct (gamma 2) the mean of `sum` and quantize to 8 bits.
pub fn to_rgb8(sum: Color, samples: u32) -> [u8; 3] {
    let mean = sum / samples.max(1) as f32;
    mean.to_array().map(|c| {
        let c = if c.is_nan() { 0.0 } else { c.max(0.0).sqrt() };
        (256.0 * c.clamp(0.0, 0.999)) as u8
    })
}

/// Write a plain-text `P3` PPM, rows top to bottom.
pub fn write_ppm<W: Write>(image: &ImageBuffer, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "P3\n{} {}\n255", image.width, image.height)?;
    for row in image.rows() {
        for &sum in row {
            let [r, g, b] = to_rgb8(sum, image.samples_per_pixel);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
    }
    Ok(())
}

/// Convert to an 8-bit RGB image for the `image` crate encoders.
pub fn to_rgb_image(image: &ImageBuffer) -> image::RgbImage {
    image::RgbImage::from_fn(image.width, image.height, |x, y| {
        image::Rgb(to_rgb8(image.get(x, y), image.samples_per_pixel))
    })
}

/// Save `image` to `path`. `.ppm` is written as plain text, anything else
/// goes through the `image` crate and is chosen by extension.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_ppm(image, &mut out)
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        to_rgb_image(image)
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    log::info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
