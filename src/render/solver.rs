//! Recursive patch evaluation and the top-level tiling loop.

use super::canvas::Canvas;
use super::params::RenderOptions;
use super::patch::{classify_border, BorderClass, Patch};

/// Evaluate one patch into the canvas, recursing on mixed borders.
///
/// - an all-inside border fills the patch with 0
/// - an all-outside border fills it with the mean border escape count
/// - a mixed border quadrisects into four half-sided children evaluated via
///   nested [`rayon::join`], unless the side has reached `min_side` (or is
///   odd and cannot quadrisect exactly), in which case every pixel is
///   evaluated directly
///
/// Children tile the parent exactly, so parallel evaluations write disjoint
/// canvas regions; the joins form the implicit barrier before the caller can
/// observe the patch as complete. Terminates because the side strictly
/// halves each level and the floor forces direct evaluation.
pub fn evaluate_patch<K>(canvas: &Canvas, patch: Patch, min_side: usize, kernel: &K)
where
    K: Fn(usize, usize) -> u32 + Sync + ?Sized,
{
    if patch.side == 0 {
        return;
    }
    if patch.side == 1 {
        canvas.set(patch.x, patch.y, kernel(patch.x, patch.y));
        return;
    }

    match classify_border(patch, kernel) {
        BorderClass::AllInside => {
            canvas.fill_square(patch.x, patch.y, patch.side, 0);
        }
        BorderClass::AllOutside { mean } => {
            canvas.fill_square(patch.x, patch.y, patch.side, mean);
        }
        BorderClass::Mixed => {
            if patch.side <= min_side || patch.side % 2 != 0 {
                fill_direct(canvas, patch.x, patch.y, patch.side, patch.side, kernel);
            } else {
                let [a, b, c, d] = patch.split();
                rayon::join(
                    || {
                        rayon::join(
                            || evaluate_patch(canvas, a, min_side, kernel),
                            || evaluate_patch(canvas, b, min_side, kernel),
                        )
                    },
                    || {
                        rayon::join(
                            || evaluate_patch(canvas, c, min_side, kernel),
                            || evaluate_patch(canvas, d, min_side, kernel),
                        )
                    },
                );
            }
        }
    }
}

/// Evaluate every pixel of a rectangle directly with the point kernel.
fn fill_direct<K>(canvas: &Canvas, x0: usize, y0: usize, w: usize, h: usize, kernel: &K)
where
    K: Fn(usize, usize) -> u32 + ?Sized,
{
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            canvas.set(x, y, kernel(x, y));
        }
    }
}

/// Render the full image into an existing canvas.
///
/// Tiles the image into `initial_patch`-sided squares, each spawned as an
/// independent unit of work on a rayon scope. Tiles clipped by the image
/// edge cannot be quadrisected exactly, so the tiling loop resolves those
/// ragged remainders by direct evaluation itself rather than handing them to
/// the recursion. The scope joins all spawned work before returning.
///
/// # Panics
///
/// Panics if the canvas dimensions do not match the options.
pub fn render_into<K>(canvas: &Canvas, opts: &RenderOptions, kernel: &K)
where
    K: Fn(usize, usize) -> u32 + Sync + ?Sized,
{
    assert_eq!(canvas.width(), opts.width, "canvas width mismatch");
    assert_eq!(canvas.height(), opts.height, "canvas height mismatch");

    let side = opts.initial_patch.max(1);

    rayon::scope(|scope| {
        let mut y = 0;
        while y < opts.height {
            let mut x = 0;
            let tile_h = side.min(opts.height - y);
            while x < opts.width {
                let tile_w = side.min(opts.width - x);
                if tile_w == side && tile_h == side {
                    let patch = Patch::new(x, y, side);
                    scope.spawn(move |_| evaluate_patch(canvas, patch, opts.min_patch, kernel));
                } else {
                    // Ragged edge tile.
                    scope.spawn(move |_| fill_direct(canvas, x, y, tile_w, tile_h, kernel));
                }
                x += tile_w;
            }
            y += tile_h;
        }
    });
}

/// Allocate a canvas and render the full image into it.
pub fn render<K>(opts: &RenderOptions, kernel: &K) -> Canvas
where
    K: Fn(usize, usize) -> u32 + Sync + ?Sized,
{
    let canvas = Canvas::new(opts.width, opts.height);
    render_into(&canvas, opts, kernel);
    canvas
}
