//! # perflab
//!
//! Two reusable cores extracted from a debugging-and-profiling teaching lab:
//!
//! - [`timing`]: an adaptive, cold-cache microbenchmark harness. Each trial
//!   evicts the CPU cache, warms the code path once, times the kernel (growing
//!   an odd repeat count until the signal dominates timing overhead), and keeps
//!   the k smallest observations. The session stops once those k agree within a
//!   relative tolerance, or when a hard sample cap is hit.
//! - [`render`]: an adaptive spatial-subdivision renderer for escape-time
//!   kernels. Each square patch samples its border; uniform borders fill the
//!   patch cheaply, mixed borders quadrisect into four independent sub-patches
//!   dispatched fork-join style until a minimum patch size forces direct
//!   per-pixel evaluation.
//!
//! The two components are independent: no shared state, no runtime coupling.
//!
//! ## Quick Start
//!
//! ```ignore
//! use perflab::{ConvergenceTimer, TimerConfig};
//!
//! let mut session = ConvergenceTimer::new(TimerConfig::default());
//! let m = session.measure(|| expensive_kernel(&data));
//! println!("best: {:.3e} s over {} trials", m.best, m.samples);
//! ```
//!
//! ```ignore
//! use perflab::render::{self, RenderOptions};
//! use perflab::render::escape::{mandelbrot_kernel, MANDELBROT_VIEW};
//!
//! let opts = RenderOptions::new(4096, 4096);
//! let kernel = mandelbrot_kernel(MANDELBROT_VIEW, 4096, 4096, 1000);
//! let counts = render::render(&opts, &kernel).into_counts();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;

// Functional modules
pub mod mountain;
pub mod output;
pub mod render;
pub mod timing;

// Re-exports for public API
pub use config::{TimeSource, TimerConfig};
pub use error::Error;
pub use render::{Canvas, Patch, RenderOptions, Viewport};
pub use timing::{black_box, ConvergenceTimer, Measurement, SampleSet};
