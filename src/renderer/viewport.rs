//! Logical-to-device mapping for a canvas
//!
//! The backing store follows the container's CSS size times the device
//! pixel ratio (capped). The world is then stretched onto it with
//! independent x/y scales.

use crate::consts::MAX_PIXEL_RATIO;

/// Backing-store size for a container plus the scale into it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Container size in CSS pixels
    pub css_width: f64,
    pub css_height: f64,
    /// Device pixel ratio actually applied (after capping)
    pub pixel_ratio: f64,
    /// Canvas backing-store size in device pixels, never zero
    pub backing_width: u32,
    pub backing_height: u32,
}

impl Viewport {
    /// Fit a container of `css_width × css_height` at `device_ratio`, capped at `max_ratio`
    pub fn fit(css_width: f64, css_height: f64, device_ratio: f64, max_ratio: f64) -> Self {
        let pixel_ratio = if device_ratio.is_finite() && device_ratio > 0.0 {
            device_ratio.min(max_ratio.max(1.0))
        } else {
            1.0
        };
        let css_width = sanitize(css_width);
        let css_height = sanitize(css_height);
        Self {
            css_width,
            css_height,
            pixel_ratio,
            backing_width: backing(css_width, pixel_ratio),
            backing_height: backing(css_height, pixel_ratio),
        }
    }

    /// Fit with the default ratio cap
    pub fn with_default_cap(css_width: f64, css_height: f64, device_ratio: f64) -> Self {
        Self::fit(css_width, css_height, device_ratio, MAX_PIXEL_RATIO)
    }

    /// Device pixels per logical unit on each axis
    pub fn scale(&self, world_width: f32, world_height: f32) -> (f64, f64) {
        (
            self.backing_width as f64 / world_width.max(1.0) as f64,
            self.backing_height as f64 / world_height.max(1.0) as f64,
        )
    }

    /// Whether a canvas of the given size must be resized to match
    pub fn differs_from(&self, width: u32, height: u32) -> bool {
        self.backing_width != width || self.backing_height != height
    }

    /// Map a pointer offset from the container's left edge (CSS px) to a world x
    pub fn to_world_x(&self, offset_x: f64, world_width: f32) -> f32 {
        if self.css_width <= 0.0 {
            return 0.0;
        }
        ((offset_x / self.css_width) * world_width as f64) as f32
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn backing(css: f64, ratio: f64) -> u32 {
    ((css * ratio).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_capped() {
        let vp = Viewport::with_default_cap(360.0, 640.0, 3.0);
        assert_eq!(vp.pixel_ratio, 2.0);
        assert_eq!((vp.backing_width, vp.backing_height), (720, 1280));
    }

    #[test]
    fn test_backing_never_zero() {
        let vp = Viewport::with_default_cap(0.0, 0.2, 1.0);
        assert_eq!((vp.backing_width, vp.backing_height), (1, 1));
    }

    #[test]
    fn test_bad_ratio_falls_back() {
        let vp = Viewport::with_default_cap(100.0, 100.0, f64::NAN);
        assert_eq!(vp.pixel_ratio, 1.0);
    }

    #[test]
    fn test_anisotropic_scale() {
        let vp = Viewport::with_default_cap(180.0, 640.0, 1.0);
        let (sx, sy) = vp.scale(360.0, 640.0);
        assert!((sx - 0.5).abs() < 1e-9);
        assert!((sy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_mapping() {
        let vp = Viewport::with_default_cap(180.0, 320.0, 2.0);
        assert_eq!(vp.to_world_x(90.0, 360.0), 180.0);
        assert_eq!(vp.to_world_x(0.0, 360.0), 0.0);
    }
}
