//! Frame export through the `image` crate.

use crate::Result;
use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, ImageFormat, Rgb, RgbImage};
use specscope_core::Framebuffer;
use std::path::Path;

/// Convert a framebuffer to an RGB image, reading colors as `0xRRGGBB`.
pub fn frame_to_rgb(frame: &Framebuffer) -> Result<RgbImage> {
    let width = dimension(frame.width())?;
    let height = dimension(frame.height())?;
    let pixels = frame.pixels();
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let color = pixels[y as usize * frame.width() + x as usize];
        Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
    }))
}

/// Write a framebuffer to `path`.
///
/// The extension picks the format (`.png`, `.ppm`); anything else is
/// written as PNG.
pub fn write_frame<P: AsRef<Path>>(path: P, frame: &Framebuffer) -> Result<()> {
    let path = path.as_ref();
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Pnm)) => format,
        _ => ImageFormat::Png,
    };
    frame_to_rgb(frame)?.save_with_format(path, format)?;
    tracing::debug!(path = %path.display(), ?format, "frame written");
    Ok(())
}

fn dimension(len: usize) -> Result<u32> {
    let dim = u32::try_from(len)
        .map_err(|_| ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))?;
    Ok(dim)
}
