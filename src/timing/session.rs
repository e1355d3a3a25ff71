//! The convergence timing session.
//!
//! One session measures one kernel configuration: it estimates the timing
//! overhead once, then repeats cold-cache trials until the k best timings
//! stabilize within a relative tolerance or a hard sample cap is reached.
//! The result is the smallest observed timing, the standard minimum-of-many
//! variance-reduction technique for microbenchmarks, where every noise source
//! (frequency scaling, interrupts, cache state) only ever adds time.

use serde::Serialize;

use crate::config::TimerConfig;

use super::evict::CacheEvictor;
use super::sample_set::SampleSet;
use super::timer::{black_box, Timer};

/// Grow the timed repeat count while overhead exceeds this fraction of the
/// measured bracket.
const OVERHEAD_RATIO: f64 = 0.05;

/// Upper bound on the repeat count inside one timed bracket. A kernel the
/// optimizer reduced to nearly nothing would otherwise grow the bracket
/// forever.
const MAX_REPEATS: u32 = 0xFFFF;

/// Outcome of one timing session.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    /// Smallest corrected timing observed, in seconds.
    pub best: f64,
    /// Estimated fixed cost of one timing bracket, in seconds.
    pub overhead: f64,
    /// Number of trials actually run.
    pub samples: usize,
    /// Whether the best-sample set stabilized within epsilon (as opposed to
    /// stopping on the sample cap).
    pub converged: bool,
    /// The retained best timings, sorted ascending.
    pub best_samples: Vec<f64>,
}

/// Adaptive cold-cache timing session.
///
/// Owns all session state: configuration, clock, eviction buffer, the
/// one-shot overhead estimate, and the best-sample set. Trials run strictly
/// sequentially; the ordering of eviction, warm-up, and the timed bracket
/// matters.
///
/// # Example
///
/// ```ignore
/// let mut session = ConvergenceTimer::new(TimerConfig::default());
/// let m = session.measure(|| strided_sum(&data, 4));
/// assert!(m.best > 0.0);
/// ```
pub struct ConvergenceTimer {
    config: TimerConfig,
    timer: Timer,
    evictor: CacheEvictor,
    overhead: f64,
    samples: SampleSet,
}

impl ConvergenceTimer {
    /// Create a session, calibrating the clock and estimating the bracket
    /// overhead once up front.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`TimerConfig::validate`].
    pub fn new(config: TimerConfig) -> Self {
        if let Err(msg) = config.validate() {
            panic!("invalid TimerConfig: {msg}");
        }
        let timer = Timer::new(config.source);
        let evictor = CacheEvictor::new(config.eviction_bytes, config.cache_line_bytes);
        let overhead = timer.overhead();
        let samples = SampleSet::new(config.max_count);
        Self {
            config,
            timer,
            evictor,
            overhead,
            samples,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// The overhead estimate applied to this session's trials, in seconds.
    pub fn overhead(&self) -> f64 {
        self.overhead
    }

    /// Measure a kernel until convergence or the sample cap.
    ///
    /// Each trial evicts the cache, runs the kernel once unmeasured to warm
    /// the code path, then times it. When the bracket is too close to the
    /// timing overhead, the kernel is repeated an increasing odd number of
    /// times inside a single bracket and the result divided by the repeat
    /// count, so the per-call signal dominates.
    ///
    /// The kernel's return value is routed through [`black_box`]; kernels
    /// must return something derived from their work or the optimizer may
    /// discard them.
    pub fn measure<R, F>(&mut self, mut kernel: F) -> Measurement
    where
        F: FnMut() -> R,
    {
        self.samples.clear();

        let mut nsamples = 0usize;
        let mut converged = false;

        loop {
            nsamples += 1;
            self.evictor.evict();

            // Warm the code path; not timed.
            black_box(kernel());

            let mut rep = 1u32;
            let stamp = self.timer.start();
            black_box(kernel());
            let mut timing = self.timer.elapsed(stamp);

            while self.overhead / timing > OVERHEAD_RATIO && rep < MAX_REPEATS {
                rep += 2;
                let stamp = self.timer.start();
                for _ in 0..rep {
                    black_box(kernel());
                }
                timing = self.timer.elapsed(stamp);
            }
            timing /= f64::from(rep);

            if self.config.correct_overhead && timing > self.overhead {
                timing -= self.overhead;
            }

            self.samples.insert(timing);

            // Convergence is only evaluated once max_count trials have run;
            // when max_count exceeds max_samples the set never fills and the
            // cap alone terminates the loop.
            if nsamples >= self.config.max_count {
                converged = self.samples.converged(self.config.epsilon);
            }
            if converged || nsamples >= self.config.max_samples {
                break;
            }
        }

        Measurement {
            best: self.samples.best().unwrap_or(0.0),
            overhead: self.overhead,
            samples: nsamples,
            converged,
            best_samples: self.samples.as_slice().to_vec(),
        }
    }
}
