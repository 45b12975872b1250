use std::path::Path;

use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::raster::buffer::Raster;

/// Decode an encoded image (PNG, JPEG, ...) into a straight-alpha [`Raster`].
pub fn decode_image(bytes: &[u8]) -> PixmorphResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PixmorphError::input(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> PixmorphResult<Raster> {
    let bytes = std::fs::read(path)
        .map_err(|e| PixmorphError::input(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
        .map_err(|e| PixmorphError::input(format!("'{}': {e}", path.display())))
}

/// Letterbox `src` into `canvas`: scale preserving aspect ratio until it fits, then center it.
///
/// Uncovered bars are fully transparent, so the sampler's alpha threshold drops them.
pub fn fit_into(src: &Raster, canvas: Canvas) -> PixmorphResult<Raster> {
    let transparent = Raster::filled(canvas.width, canvas.height, [0, 0, 0, 0]);
    if canvas.is_empty() || src.canvas().is_empty() {
        return Ok(transparent);
    }

    let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));
    let scale = (f64::from(canvas.width) / sw).min(f64::from(canvas.height) / sh);
    let fw = ((sw * scale).round() as u32).clamp(1, canvas.width);
    let fh = ((sh * scale).round() as u32).clamp(1, canvas.height);

    let img = image::RgbaImage::from_raw(src.width(), src.height(), src.as_bytes().to_vec())
        .ok_or_else(|| PixmorphError::validation("raster buffer does not match its dimensions"))?;
    let fitted = if (fw, fh) == (src.width(), src.height()) {
        img
    } else {
        image::imageops::resize(&img, fw, fh, FilterType::Triangle)
    };

    let mut out = image::RgbaImage::from_raw(
        canvas.width,
        canvas.height,
        transparent.into_bytes(),
    )
    .ok_or_else(|| PixmorphError::validation("canvas buffer does not match its dimensions"))?;
    let ox = (canvas.width - fw) / 2;
    let oy = (canvas.height - fh) / 2;
    image::imageops::replace(&mut out, &fitted, i64::from(ox), i64::from(oy));

    tracing::debug!(
        src_w = src.width(),
        src_h = src.height(),
        fit_w = fw,
        fit_h = fh,
        "fitted raster into canvas"
    );
    Raster::from_rgba8(canvas.width, canvas.height, out.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/fit.rs"]
mod tests;
