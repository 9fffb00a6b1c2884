use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::TreasureResult;

/// Write `img` as PNG, creating missing parent directories.
///
/// Filesystem and encoder failures surface as [`TreasureError::Other`] with
/// the offending path in the context chain.
///
/// [`TreasureError::Other`]: crate::TreasureError::Other
#[tracing::instrument(skip_all, fields(path = %path.display(), w = img.width(), h = img.height()))]
pub fn save_png(img: &RgbaImage, path: &Path) -> TreasureResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
