//! Fitting the full-resolution treasure into a display area.

use std::{
    borrow::Cow,
    time::{Duration, Instant},
};

use image::{RgbaImage, imageops::FilterType};

/// Idle time after the last resize before the display is refreshed.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(80);

/// Largest size with the image's aspect ratio that fits `view`, never larger
/// than the image itself and never smaller than 1x1.
pub fn fit_size(image_w: u32, image_h: u32, view_w: u32, view_h: u32) -> (u32, u32) {
    if image_w == 0 || image_h == 0 {
        return (1, 1);
    }
    let scale = (f64::from(view_w) / f64::from(image_w))
        .min(f64::from(view_h) / f64::from(image_h))
        .min(1.0);
    let w = (f64::from(image_w) * scale).floor() as u32;
    let h = (f64::from(image_h) * scale).floor() as u32;
    (w.max(1), h.max(1))
}

/// Downscale `img` to fit the view. Borrows when it already fits.
pub fn fit_for_display(img: &RgbaImage, view_w: u32, view_h: u32) -> Cow<'_, RgbaImage> {
    let (w, h) = fit_size(img.width(), img.height(), view_w, view_h);
    if (w, h) == img.dimensions() {
        return Cow::Borrowed(img);
    }
    tracing::debug!(from_w = img.width(), from_h = img.height(), w, h, "fitting for display");
    Cow::Owned(image::imageops::resize(img, w, h, FilterType::Lanczos3))
}

/// Collapses a burst of resize events into one refresh once the window has
/// been still for [`RESIZE_DEBOUNCE`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ResizeDebouncer {
    pending_since: Option<Instant>,
}

impl ResizeDebouncer {
    /// Idle debouncer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resize event; restarts the idle timer.
    pub fn note_resize(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// `true` between a resize and the refresh it triggers.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// `true` exactly once per burst, when the idle interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(at) if now.saturating_duration_since(at) >= RESIZE_DEBOUNCE => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/view.rs"]
mod tests;
