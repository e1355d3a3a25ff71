//! Adaptive spatial-subdivision renderer for escape-time kernels.
//!
//! Escape-time images have large uniform regions (deep interior, deep
//! exterior); evaluating every pixel is wasteful. The solver samples only the
//! border of each square patch:
//!
//! - border entirely non-escaping → fill the patch with 0
//! - border entirely escaping → fill with the mean border escape count
//! - mixed border → quadrisect and recurse, down to a minimum patch side
//!   where every pixel is evaluated directly
//!
//! Sub-patches tile their parent exactly, so concurrent evaluations write
//! disjoint canvas regions and need no locking; the fan-out maps onto
//! rayon's fork-join primitives.
//!
//! The two uniform-border shortcuts are deliberate approximations: a patch
//! containing filament structure that misses the sampled border will be
//! misfilled. That trade-off is the point of the algorithm, not a defect.

mod canvas;
mod params;
mod patch;
mod solver;

pub mod escape;

pub use canvas::Canvas;
pub use params::{RenderOptions, Viewport};
pub use patch::{classify_border, BorderClass, Patch};
pub use solver::{evaluate_patch, render, render_into};
