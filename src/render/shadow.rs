use kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Point, PxPoint, PxSize, Rect, RoundedRect},
        error::{TreasureError, TreasureResult},
    },
    render::{layout::ShadowStyle, surface::AlphaMask},
};

const SUPERSAMPLE: u32 = 4;

/// Blurred rounded-rectangle silhouette, ready to be painted under an element.
#[derive(Clone, Debug)]
pub struct Shadow {
    mask: AlphaMask,
    /// Blur margin added around the silhouette on every side.
    pad: u32,
}

impl Shadow {
    /// Build the shadow for an element of `size` with rounded corners.
    pub fn new(size: PxSize, corner_radius: u32, blur: u32) -> TreasureResult<Self> {
        let pad = blur_radius(blur);
        let silhouette = rounded_rect_mask(size, corner_radius, pad)?;
        let mask = blur_alpha(&silhouette, pad, blur as f32)?;
        Ok(Self { mask, pad })
    }

    /// Blurred coverage including the padding.
    pub fn mask(&self) -> &AlphaMask {
        &self.mask
    }

    /// Where to paint the mask so the silhouette sits under an element at `element`.
    pub fn origin_for(&self, element: PxPoint, style: &ShadowStyle) -> PxPoint {
        element.offset(
            style.offset.x - self.pad as i32,
            style.offset.y - self.pad as i32,
        )
    }
}

/// Kernel radius covering three sigmas.
pub fn blur_radius(sigma: u32) -> u32 {
    sigma.saturating_mul(3)
}

/// Anti-aliased coverage of a rounded rectangle of `size`, surrounded by `pad`
/// empty pixels on each side.
pub fn rounded_rect_mask(size: PxSize, radius: u32, pad: u32) -> TreasureResult<AlphaMask> {
    let size = size.non_empty()?;
    let full = PxSize::new(
        size.width
            .checked_add(2 * pad)
            .ok_or_else(|| TreasureError::render("shadow mask too large"))?,
        size.height
            .checked_add(2 * pad)
            .ok_or_else(|| TreasureError::render("shadow mask too large"))?,
    );
    let len = (full.width as usize)
        .checked_mul(full.height as usize)
        .ok_or_else(|| TreasureError::render("shadow mask too large"))?;
    let mut data = vec![0u8; len];

    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let r = f64::from(radius).min(w / 2.0).min(h / 2.0);
    let shape = RoundedRect::from_rect(Rect::new(0.0, 0.0, w, h), r);
    // Pixels farther than this from both edges of an axis are never in a corner.
    let corner = r.ceil() as u32;

    for y in 0..size.height {
        let in_band_y = y >= corner && y + corner < size.height;
        for x in 0..size.width {
            let in_band_x = x >= corner && x + corner < size.width;
            let cov = if in_band_x || in_band_y {
                255
            } else {
                pixel_coverage(&shape, x, y)
            };
            let idx = ((y + pad) as usize) * (full.width as usize) + (x + pad) as usize;
            data[idx] = cov;
        }
    }

    Ok(AlphaMask { size: full, data })
}

fn pixel_coverage(shape: &RoundedRect, x: u32, y: u32) -> u8 {
    let step = 1.0 / f64::from(SUPERSAMPLE);
    let mut hits = 0u32;
    for sy in 0..SUPERSAMPLE {
        for sx in 0..SUPERSAMPLE {
            let p = Point::new(
                f64::from(x) + (f64::from(sx) + 0.5) * step,
                f64::from(y) + (f64::from(sy) + 0.5) * step,
            );
            if shape.contains(p) {
                hits += 1;
            }
        }
    }
    ((hits * 255 + SUPERSAMPLE * SUPERSAMPLE / 2) / (SUPERSAMPLE * SUPERSAMPLE)) as u8
}

/// Separable Gaussian blur of a coverage mask, Q16 fixed point, edge-clamped.
pub fn blur_alpha(src: &AlphaMask, radius: u32, sigma: f32) -> TreasureResult<AlphaMask> {
    let PxSize { width, height } = src.size;
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| TreasureError::render("blur buffer size overflow"))?;
    if src.data.len() != expected_len {
        return Err(TreasureError::render(
            "blur_alpha expects a mask matching width*height",
        ));
    }
    if radius == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(&src.data, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(AlphaMask {
        size: src.size,
        data: out,
    })
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TreasureResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TreasureError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(TreasureError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Rounding drift goes into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                acc += u64::from(kw) * u64::from(src[row + sx as usize]);
            }
            dst[row + x as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                acc += u64::from(kw) * u64::from(src[(sy * w + x) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
