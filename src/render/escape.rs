//! Escape-time kernels for quadratic Julia/Mandelbrot iteration.

use super::params::Viewport;

/// The classic full-set view of the Mandelbrot set.
pub const MANDELBROT_VIEW: Viewport = Viewport {
    x_min: -2.0,
    x_max: 1.0,
    y_min: -1.7,
    y_max: 1.3,
};

/// Escape time of `c = (cx, cy)` under z → z² + c.
///
/// Returns 0 if the orbit stays bounded for `max_iter` iterations ("inside
/// the set"), otherwise the iteration count (≥ 1) at which |z|² first
/// exceeded 4. The squared-magnitude form keeps the loop friendly to
/// auto-vectorization.
#[inline]
pub fn escape_time(cx: f64, cy: f64, max_iter: u32) -> u32 {
    let mut zx = 0.0f64;
    let mut zy = 0.0f64;
    let mut zx_sq = 0.0f64;
    let mut zy_sq = 0.0f64;
    let mut iter = 0u32;

    while iter < max_iter && zx_sq + zy_sq <= 4.0 {
        zy = 2.0 * zx * zy + cy;
        zx = zx_sq - zy_sq + cx;
        zx_sq = zx * zx;
        zy_sq = zy * zy;
        iter += 1;
    }

    if iter == max_iter {
        0
    } else {
        iter
    }
}

/// Compose viewport mapping with the escape kernel into a pixel kernel for
/// the patch solver.
pub fn mandelbrot_kernel(
    view: Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
) -> impl Fn(usize, usize) -> u32 + Sync {
    move |x, y| {
        let (re, im) = view.map_pixel(x, y, width, height);
        escape_time(re, im, max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_never_escapes() {
        assert_eq!(escape_time(0.0, 0.0, 1000), 0);
    }

    #[test]
    fn test_far_point_escapes_immediately() {
        // |c| > 2 leaves the threshold on the first iteration.
        assert_eq!(escape_time(2.0, 2.0, 1000), 1);
        assert_eq!(escape_time(-2.0, -1.7, 1000), 1);
    }

    #[test]
    fn test_cardioid_interior_is_inside() {
        assert_eq!(escape_time(-0.125, 0.0, 1000), 0);
        assert_eq!(escape_time(0.25, 0.0, 1000), 0);
    }

    #[test]
    fn test_near_boundary_point_escapes_slowly() {
        // Just outside the cardioid cusp.
        let iters = escape_time(0.26, 0.0, 1000);
        assert!(iters > 10, "expected a slow escape, got {iters}");
    }
}
