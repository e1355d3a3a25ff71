//! Patches and border classification.

/// A square sub-region of the canvas under recursive evaluation.
///
/// Transient: exists only while one recursive call runs, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Origin column.
    pub x: usize,
    /// Origin row.
    pub y: usize,
    /// Side length in pixels.
    pub side: usize,
}

impl Patch {
    /// Create a patch at `(x, y)` with the given side length.
    pub fn new(x: usize, y: usize, side: usize) -> Self {
        Self { x, y, side }
    }

    /// Quadrisect into four children of half the side, tiling this patch
    /// exactly: no overlap, no gap.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the side is odd; an odd side cannot be
    /// tiled by four half-sided children.
    pub fn split(self) -> [Patch; 4] {
        debug_assert!(self.side % 2 == 0, "cannot quadrisect an odd side");
        let h = self.side / 2;
        [
            Patch::new(self.x, self.y, h),
            Patch::new(self.x + h, self.y, h),
            Patch::new(self.x, self.y + h, h),
            Patch::new(self.x + h, self.y + h, h),
        ]
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        self.side * self.side
    }

    /// Number of border pixels (the ones classification samples).
    pub fn perimeter(self) -> usize {
        match self.side {
            0 => 0,
            1 => 1,
            s => 4 * s - 4,
        }
    }
}

/// Outcome of sampling a patch border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderClass {
    /// Every border sample was 0 (non-escaping). The interior is treated as
    /// entirely inside the set.
    AllInside,
    /// Every border sample escaped. The interior is filled with the mean
    /// border escape count, floored to 1 so it can never be confused with
    /// the inside marker 0.
    AllOutside {
        /// Mean of the border samples' escape counts, at least 1.
        mean: u32,
    },
    /// The border saw both escaping and non-escaping points; the interior
    /// must be resolved by subdivision or direct evaluation.
    Mixed,
}

/// Sample `kernel` at every border pixel of `patch` and classify it.
///
/// Walks the top and bottom rows in full and the left and right columns
/// excluding the corners already visited, so each border pixel is sampled
/// exactly once: `4·side − 4` kernel calls for side ≥ 2.
pub fn classify_border<K>(patch: Patch, kernel: &K) -> BorderClass
where
    K: Fn(usize, usize) -> u32 + ?Sized,
{
    debug_assert!(patch.side >= 2, "border classification needs side >= 2");

    let mut all_in = true;
    let mut all_out = true;
    let mut total: u64 = 0;
    let mut count: u64 = 0;

    let mut look = |x: usize, y: usize| {
        let v = kernel(x, y);
        if v == 0 {
            all_out = false;
        } else {
            all_in = false;
        }
        total += u64::from(v);
        count += 1;
    };

    let last = patch.side - 1;
    for i in 0..patch.side {
        look(patch.x + i, patch.y);
        look(patch.x + i, patch.y + last);
    }
    for i in 1..last {
        look(patch.x, patch.y + i);
        look(patch.x + last, patch.y + i);
    }

    if all_in {
        BorderClass::AllInside
    } else if all_out {
        let mean = (total / count).max(1);
        BorderClass::AllOutside { mean: mean as u32 }
    } else {
        BorderClass::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_partitions_parent_exactly() {
        let parent = Patch::new(8, 16, 32);
        let children = parent.split();

        let mut covered: HashSet<(usize, usize)> = HashSet::new();
        for child in children {
            for y in child.y..child.y + child.side {
                for x in child.x..child.x + child.side {
                    // No overlap between siblings.
                    assert!(covered.insert((x, y)), "pixel ({x},{y}) covered twice");
                }
            }
        }
        // No gap: union equals the parent footprint.
        assert_eq!(covered.len(), parent.area());
        for y in parent.y..parent.y + parent.side {
            for x in parent.x..parent.x + parent.side {
                assert!(covered.contains(&(x, y)));
            }
        }
    }

    #[test]
    fn test_split_halves_side() {
        let children = Patch::new(0, 0, 16).split();
        assert!(children.iter().all(|c| c.side == 8));
    }

    #[test]
    fn test_perimeter_counts() {
        assert_eq!(Patch::new(0, 0, 2).perimeter(), 4);
        assert_eq!(Patch::new(0, 0, 8).perimeter(), 28);
        assert_eq!(Patch::new(0, 0, 1).perimeter(), 1);
    }

    #[test]
    fn test_classify_all_inside() {
        let kernel = |_: usize, _: usize| 0u32;
        assert_eq!(
            classify_border(Patch::new(0, 0, 8), &kernel),
            BorderClass::AllInside
        );
    }

    #[test]
    fn test_classify_all_outside_mean() {
        let kernel = |_: usize, _: usize| 6u32;
        assert_eq!(
            classify_border(Patch::new(0, 0, 8), &kernel),
            BorderClass::AllOutside { mean: 6 }
        );
    }

    #[test]
    fn test_classify_mixed() {
        // One non-escaping corner among escaping border points.
        let kernel = |x: usize, y: usize| u32::from(!(x == 0 && y == 0));
        assert_eq!(
            classify_border(Patch::new(0, 0, 4), &kernel),
            BorderClass::Mixed
        );
    }

    #[test]
    fn test_classification_samples_each_border_pixel_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = AtomicUsize::new(0);
        let kernel = |_: usize, _: usize| {
            calls.fetch_add(1, Ordering::Relaxed);
            1u32
        };
        let patch = Patch::new(3, 5, 16);
        classify_border(patch, &kernel);
        assert_eq!(calls.load(Ordering::Relaxed), patch.perimeter());
    }
}
