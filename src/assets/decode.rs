use std::path::Path;

use image::{RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::{PxRect, PxSize},
    error::{TreasureError, TreasureResult},
};

/// Decode a card image into RGBA and resample it to `size` when it differs.
///
/// The format is sniffed from the file contents, falling back to the
/// extension. Cards are never cropped or letterboxed here; a scan at another
/// resolution is stretched to the reference size with Lanczos3.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_card(path: &Path, size: PxSize) -> TreasureResult<RgbaImage> {
    let img = decode_file(path).map_err(|source| TreasureError::image_load(path, source))?;
    let rgba = img.to_rgba8();
    Ok(normalize_card(rgba, size))
}

fn decode_file(path: &Path) -> image::ImageResult<image::DynamicImage> {
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
}

/// Resample `img` to exactly `size` unless it already matches.
pub fn normalize_card(img: RgbaImage, size: PxSize) -> RgbaImage {
    if img.dimensions() == (size.width, size.height) {
        return img;
    }
    tracing::debug!(
        from_w = img.width(),
        from_h = img.height(),
        to_w = size.width,
        to_h = size.height,
        "resampling card"
    );
    image::imageops::resize(&img, size.width, size.height, FilterType::Lanczos3)
}

/// Copy out the `rect` region of `img`.
pub fn crop_card(img: &RgbaImage, rect: PxRect) -> TreasureResult<RgbaImage> {
    let bounds = PxRect::new(0, 0, img.width() as i32, img.height() as i32);
    if !bounds.contains_rect(rect) || rect.width() == 0 || rect.height() == 0 {
        return Err(TreasureError::render(format!(
            "crop box {rect:?} outside {}x{} card",
            img.width(),
            img.height()
        )));
    }
    Ok(image::imageops::crop_imm(
        img,
        rect.left as u32,
        rect.top as u32,
        rect.width(),
        rect.height(),
    )
    .to_image())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
