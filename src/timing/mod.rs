//! Cold-cache convergence timing harness.
//!
//! This module provides:
//! - A [`Timer`] over a monotonic clock or the x86_64 TSC, with one-shot
//!   bracket-overhead estimation
//! - A [`CacheEvictor`] that flushes cache contents between trials so every
//!   trial starts cold
//! - A [`SampleSet`] holding the k smallest timings seen so far, kept sorted
//!   by insertion
//! - The [`ConvergenceTimer`] session driving the trial loop until the best
//!   samples stabilize or a hard cap is reached
//!
//! The session object owns all mutable state; there are no process-wide
//! singletons, so independent sessions can coexist.

mod affinity;
mod evict;
mod sample_set;
mod session;
mod timer;

pub use affinity::{current_core, pin_to_core};
pub use evict::CacheEvictor;
pub use sample_set::SampleSet;
pub use session::{ConvergenceTimer, Measurement};
pub use timer::{black_box, Stamp, Timer};
