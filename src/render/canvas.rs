//! Shared output grid for concurrent patch evaluation.

use std::sync::atomic::{AtomicU32, Ordering};

/// A width × height grid of escape-iteration counts.
///
/// Patches evaluated in parallel write disjoint pixel ranges; that
/// disjointness is a structural property of the quadrisection, not something
/// enforced at runtime. Cells are relaxed atomics purely so the concurrent
/// writes are well-defined: there is no contention and no locking, and
/// relaxed stores compile to plain stores on the usual targets.
#[derive(Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Box<[AtomicU32]>,
}

impl Canvas {
    /// Allocate a zeroed canvas.
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        pixels.resize_with(width * height, || AtomicU32::new(0));
        Self {
            width,
            height,
            pixels: pixels.into_boxed_slice(),
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Write one pixel.
    #[inline]
    pub fn set(&self, x: usize, y: usize, value: u32) {
        self.pixels[y * self.width + x].store(value, Ordering::Relaxed);
    }

    /// Read one pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x].load(Ordering::Relaxed)
    }

    /// Fill a square region with one value.
    pub fn fill_square(&self, x0: usize, y0: usize, side: usize, value: u32) {
        for y in y0..y0 + side {
            let row = y * self.width;
            for x in x0..x0 + side {
                self.pixels[row + x].store(value, Ordering::Relaxed);
            }
        }
    }

    /// Consume the canvas into a plain row-major count vector.
    ///
    /// Call only after all spawned evaluations have joined.
    pub fn into_counts(self) -> Vec<u32> {
        Vec::from(self.pixels)
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let canvas = Canvas::new(4, 3);
        canvas.set(3, 2, 99);
        assert_eq!(canvas.get(3, 2), 99);
        assert_eq!(canvas.get(0, 0), 0);
    }

    #[test]
    fn test_fill_square_stays_in_bounds() {
        let canvas = Canvas::new(8, 8);
        canvas.fill_square(2, 2, 4, 7);
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (2..6).contains(&y);
                assert_eq!(canvas.get(x, y), if inside { 7 } else { 0 });
            }
        }
    }

    #[test]
    fn test_into_counts_row_major() {
        let canvas = Canvas::new(2, 2);
        canvas.set(1, 0, 1);
        canvas.set(0, 1, 2);
        assert_eq!(canvas.into_counts(), vec![0, 1, 2, 0]);
    }
}
