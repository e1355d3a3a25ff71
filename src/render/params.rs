//! Render geometry: image/patch sizing and the complex-plane viewport.

use serde::{Deserialize, Serialize};

/// Rectangular region of the complex plane mapped onto the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge (real axis).
    pub x_min: f64,
    /// Right edge (real axis).
    pub x_max: f64,
    /// Bottom edge (imaginary axis).
    pub y_min: f64,
    /// Top edge (imaginary axis).
    pub y_max: f64,
}

impl Viewport {
    /// Map a pixel to its point in the plane.
    ///
    /// The step is `extent / size` rather than `extent / (size - 1)`, so
    /// the right/top edges fall one step outside the last pixel column/row.
    #[inline]
    pub fn map_pixel(&self, x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
        let re = self.x_min + x as f64 * (self.x_max - self.x_min) / width as f64;
        let im = self.y_min + y as f64 * (self.y_max - self.y_min) / height as f64;
        (re, im)
    }
}

/// Sizing options for a render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Side of the initial tiling; each tile is an independently recursable
    /// unit of work.
    pub initial_patch: usize,
    /// Recursion floor: mixed patches at or below this side are evaluated
    /// per pixel.
    pub min_patch: usize,
}

impl RenderOptions {
    /// Options for a width × height image with the usual tiling policy:
    /// initial patches of `width / 32` (at least 8) and a recursion floor
    /// of 8.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            initial_patch: (width / 32).max(8),
            min_patch: 8,
        }
    }

    /// Set the initial tile side.
    pub fn initial_patch(mut self, side: usize) -> Self {
        assert!(side >= 1, "initial_patch must be at least 1");
        self.initial_patch = side;
        self
    }

    /// Set the recursion floor.
    pub fn min_patch(mut self, side: usize) -> Self {
        assert!(side >= 1, "min_patch must be at least 1");
        self.min_patch = side;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_map_pixel_corners() {
        let view = Viewport {
            x_min: -2.0,
            x_max: 1.0,
            y_min: -1.7,
            y_max: 1.3,
        };
        let (re, im) = view.map_pixel(0, 0, 64, 64);
        assert_relative_eq!(re, -2.0);
        assert_relative_eq!(im, -1.7);

        // Last pixel sits one step inside the max edge.
        let (re, im) = view.map_pixel(63, 63, 64, 64);
        assert_relative_eq!(re, -2.0 + 63.0 * 3.0 / 64.0);
        assert_relative_eq!(im, -1.7 + 63.0 * 3.0 / 64.0);
    }

    #[test]
    fn test_default_tiling_policy() {
        let opts = RenderOptions::new(4096, 4096);
        assert_eq!(opts.initial_patch, 128);
        assert_eq!(opts.min_patch, 8);

        // Small images still get a usable tile side.
        assert_eq!(RenderOptions::new(64, 64).initial_patch, 8);
    }
}
