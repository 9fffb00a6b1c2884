use image::RgbaImage;

use crate::foundation::{
    core::{PxPoint, PxRect, PxSize, Rgba8},
    error::{TreasureError, TreasureResult},
};

/// Premultiplied `[r, g, b, a]`.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied RGBA8 pixel buffer that layout elements are painted onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    size: PxSize,
    data: Vec<u8>,
}

/// Single-channel coverage mask (0 = empty, 255 = full).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    /// Mask dimensions.
    pub size: PxSize,
    /// Row-major coverage, one byte per pixel.
    pub data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(size: PxSize) -> TreasureResult<Self> {
        let len = size.non_empty()?.rgba_len()?;
        Ok(Self {
            size,
            data: vec![0; len],
        })
    }

    /// Surface filled with `color`.
    pub fn filled(size: PxSize, color: Rgba8) -> TreasureResult<Self> {
        let mut out = Self::new(size)?;
        let px = color.to_premul();
        for d in out.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
        Ok(out)
    }

    /// Wrap an already premultiplied RGBA8 buffer.
    pub fn from_premul(size: PxSize, data: Vec<u8>) -> TreasureResult<Self> {
        if data.len() != size.non_empty()?.rgba_len()? {
            return Err(TreasureError::render(
                "premultiplied buffer does not match its size",
            ));
        }
        Ok(Self { size, data })
    }

    /// Premultiply a straight-alpha image.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            let [r, g, b, a] = [px[0], px[1], px[2], px[3]];
            px.copy_from_slice(&Rgba8 { r, g, b, a }.to_premul());
        }
        Self {
            size: PxSize::new(width, height),
            data,
        }
    }

    /// Un-premultiply into a straight-alpha image.
    pub fn into_rgba_image(self) -> TreasureResult<RgbaImage> {
        let Self { size, mut data } = self;
        for px in data.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        RgbaImage::from_raw(size.width, size.height, data)
            .ok_or_else(|| TreasureError::render("surface buffer does not match its size"))
    }

    /// Surface dimensions.
    pub fn size(&self) -> PxSize {
        self.size
    }

    /// Row-major premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, `None` outside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Paint `src` with its top-left corner at `at`, source-over, clipped.
    pub fn draw_over(&mut self, src: &Surface, at: PxPoint) {
        let Some(span) = self.clip(at, src.size) else {
            return;
        };
        let dst_w = self.size.width as usize;
        let src_w = src.size.width as usize;
        for row in 0..span.rows {
            let d0 = ((span.dst_y + row) * dst_w + span.dst_x) * 4;
            let s0 = ((span.src_y + row) * src_w + span.src_x) * 4;
            let dst = &mut self.data[d0..d0 + span.cols * 4];
            let src = &src.data[s0..s0 + span.cols * 4];
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Paint `color` through `mask` at `at`, source-over, clipped.
    pub fn draw_mask(&mut self, mask: &AlphaMask, at: PxPoint, color: Rgba8) {
        let Some(span) = self.clip(at, mask.size) else {
            return;
        };
        let px = color.to_premul();
        let dst_w = self.size.width as usize;
        let mask_w = mask.size.width as usize;
        for row in 0..span.rows {
            let d0 = ((span.dst_y + row) * dst_w + span.dst_x) * 4;
            let m0 = (span.src_y + row) * mask_w + span.src_x;
            let dst = &mut self.data[d0..d0 + span.cols * 4];
            let cov = &mask.data[m0..m0 + span.cols];
            for (d, &m) in dst.chunks_exact_mut(4).zip(cov) {
                if m == 0 {
                    continue;
                }
                let m = u16::from(m);
                let src = [
                    mul_div255(u16::from(px[0]), m),
                    mul_div255(u16::from(px[1]), m),
                    mul_div255(u16::from(px[2]), m),
                    mul_div255(u16::from(px[3]), m),
                ];
                let out = over([d[0], d[1], d[2], d[3]], src);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Source-over fill of an axis-aligned rectangle, clipped.
    pub fn fill_rect(&mut self, rect: PxRect, color: Rgba8) {
        let origin = PxPoint::new(rect.left, rect.top);
        let Some(span) = self.clip(origin, rect.size()) else {
            return;
        };
        let px = color.to_premul();
        let dst_w = self.size.width as usize;
        for row in 0..span.rows {
            let d0 = ((span.dst_y + row) * dst_w + span.dst_x) * 4;
            for d in self.data[d0..d0 + span.cols * 4].chunks_exact_mut(4) {
                let out = over([d[0], d[1], d[2], d[3]], px);
                d.copy_from_slice(&out);
            }
        }
    }

    fn clip(&self, at: PxPoint, size: PxSize) -> Option<ClipSpan> {
        let dst = PxRect::new(0, 0, self.size.width as i32, self.size.height as i32);
        let src = PxRect::at(at, size);
        let left = src.left.max(dst.left);
        let top = src.top.max(dst.top);
        let right = src.right.min(dst.right);
        let bottom = src.bottom.min(dst.bottom);
        if left >= right || top >= bottom {
            return None;
        }
        Some(ClipSpan {
            dst_x: left as usize,
            dst_y: top as usize,
            src_x: (left - at.x) as usize,
            src_y: (top - at.y) as usize,
            cols: (right - left) as usize,
            rows: (bottom - top) as usize,
        })
    }
}

struct ClipSpan {
    dst_x: usize,
    dst_y: usize,
    src_x: usize,
    src_y: usize,
    cols: usize,
    rows: usize,
}

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
