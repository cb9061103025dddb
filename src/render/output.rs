use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};

/// Whitespace kept around the content when trimming (0.1 inch).
pub const TRIM_PAD: u32 = 10;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Bounding box `(x0, y0, x1, y1)` of the non-background pixels, exclusive
/// on the far edges. `None` for a blank image.
pub fn content_bounds(img: &RgbImage) -> Option<(u32, u32, u32, u32)> {
    img.enumerate_pixels()
        .filter(|(_, _, p)| **p != BACKGROUND)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x + 1, y + 1)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1))),
        })
}

/// Crop `img` to its content plus `pad` pixels on each side.
///
/// A blank image is returned whole.
pub fn trim(img: &RgbImage, pad: u32) -> RgbImage {
    let Some((x0, y0, x1, y1)) = content_bounds(img) else {
        return img.clone();
    };
    let (w, h) = img.dimensions();
    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + pad).min(w);
    let bottom = (y1 + pad).min(h);
    image::imageops::crop_imm(img, left, top, right - left, bottom - top).to_image()
}

/// Encoders compiled into this build.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Gif,
];

/// Image format implied by the extension of `path`; PNG when there is none.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let Some(ext) = path.extension() else {
        return Ok(ImageFormat::Png);
    };
    ImageFormat::from_extension(ext)
        .filter(|format| SUPPORTED_FORMATS.contains(format))
        .with_context(|| format!("unsupported output format '.{}'", ext.to_string_lossy()))
}

/// Encode `img` to `path` in the format chosen by its extension.
pub fn save(img: &RgbImage, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    img.save_with_format(path, format)
        .with_context(|| format!("writing {}", path.display()))
}
