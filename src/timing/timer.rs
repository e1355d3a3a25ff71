//! Elapsed-time measurement over a monotonic clock or the x86_64 TSC.
//!
//! The TSC path mirrors the classic serialized read pattern: `lfence; rdtsc`
//! to open the bracket and `rdtscp` to close it, with the tick rate
//! calibrated once against the monotonic clock across a short sleep.

use std::time::{Duration, Instant};

use crate::config::TimeSource;

/// Prevent the compiler from optimizing away a computed value.
///
/// Kernels measured by the harness must route their result through this so
/// the timed work cannot be dead-code eliminated.
#[inline]
pub fn black_box<T>(value: T) -> T {
    std::hint::black_box(value)
}

/// An opaque point in time captured by [`Timer::start`].
#[derive(Debug, Clone, Copy)]
pub enum Stamp {
    /// Monotonic clock reading.
    Instant(Instant),
    /// Raw TSC reading.
    Tsc(u64),
}

/// Elapsed-time source for a timing session.
///
/// Construction calibrates the TSC frequency when the `Cycles` source is
/// requested; on non-x86_64 targets `Cycles` silently degrades to the
/// monotonic clock.
#[derive(Debug, Clone)]
pub struct Timer {
    source: TimeSource,
    /// TSC ticks per second; only meaningful for `TimeSource::Cycles`.
    tsc_hz: f64,
}

impl Timer {
    /// Create a timer over the given source, calibrating the TSC if needed.
    pub fn new(source: TimeSource) -> Self {
        let source = effective_source(source);
        let tsc_hz = match source {
            TimeSource::Cycles => calibrate_tsc_hz(),
            TimeSource::Monotonic => 0.0,
        };
        Self { source, tsc_hz }
    }

    /// The source actually in use (after any platform fallback).
    pub fn source(&self) -> TimeSource {
        self.source
    }

    /// Calibrated TSC frequency in Hz, or 0 for the monotonic source.
    pub fn tsc_hz(&self) -> f64 {
        self.tsc_hz
    }

    /// Open a timing bracket.
    #[inline]
    pub fn start(&self) -> Stamp {
        match self.source {
            TimeSource::Monotonic => Stamp::Instant(Instant::now()),
            TimeSource::Cycles => Stamp::Tsc(tsc_start()),
        }
    }

    /// Close a timing bracket, returning elapsed seconds.
    #[inline]
    pub fn elapsed(&self, stamp: Stamp) -> f64 {
        match (self.source, stamp) {
            (TimeSource::Monotonic, Stamp::Instant(t0)) => t0.elapsed().as_secs_f64(),
            (TimeSource::Cycles, Stamp::Tsc(c0)) => {
                let c1 = tsc_end();
                c1.wrapping_sub(c0) as f64 / self.tsc_hz
            }
            // A stamp from a different source is a caller error; the cheap
            // recovery is a zero reading rather than a panic mid-trial.
            _ => 0.0,
        }
    }

    /// Estimate the fixed cost of one empty start/stop bracket, in seconds.
    ///
    /// Spins briefly first so frequency scaling has settled, then times an
    /// empty bracket twice and keeps the last reading (the first may include
    /// cold-path effects in the clock read itself).
    pub fn overhead(&self) -> f64 {
        let mut acc = 1.0f64;
        for _ in 0..100_000 {
            acc += acc;
            acc = black_box(acc);
        }

        let mut overhead = 0.0;
        for _ in 0..2 {
            let stamp = self.start();
            overhead = self.elapsed(stamp);
        }
        overhead
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(TimeSource::Monotonic)
    }
}

fn effective_source(requested: TimeSource) -> TimeSource {
    if cfg!(target_arch = "x86_64") {
        requested
    } else {
        TimeSource::Monotonic
    }
}

// =============================================================================
// TSC readers (x86_64)
// =============================================================================

#[cfg(target_arch = "x86_64")]
#[inline]
fn tsc_start() -> u64 {
    use std::arch::x86_64::{_mm_lfence, _rdtsc};
    // lfence orders the read after earlier instructions without the full
    // pipeline flush of cpuid.
    unsafe {
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn tsc_end() -> u64 {
    use std::arch::x86_64::__rdtscp;
    let mut aux = 0u32;
    unsafe { __rdtscp(&mut aux) }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
fn tsc_start() -> u64 {
    0
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
fn tsc_end() -> u64 {
    0
}

/// Calibrate TSC ticks per second against the monotonic clock.
///
/// Sleeps ~100 ms between two serialized TSC reads and divides tick delta by
/// wall-clock delta. Good to well under a percent on invariant-TSC parts,
/// which is plenty for converting trial timings to seconds.
fn calibrate_tsc_hz() -> f64 {
    let t0 = Instant::now();
    let c0 = tsc_start();

    std::thread::sleep(Duration::from_millis(100));

    let c1 = tsc_end();
    let dt = t0.elapsed().as_secs_f64();

    c1.wrapping_sub(c0) as f64 / dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_elapsed_positive() {
        let timer = Timer::new(TimeSource::Monotonic);
        let stamp = timer.start();
        let mut acc = 0u64;
        for i in 0..10_000u64 {
            acc = acc.wrapping_add(black_box(i));
        }
        black_box(acc);
        assert!(timer.elapsed(stamp) > 0.0);
    }

    #[test]
    fn test_overhead_is_small_and_nonnegative() {
        let timer = Timer::default();
        let overhead = timer.overhead();
        assert!(overhead >= 0.0);
        // An empty bracket should cost well under a millisecond anywhere.
        assert!(overhead < 1e-3);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_cycles_source_calibrates() {
        let timer = Timer::new(TimeSource::Cycles);
        assert_eq!(timer.source(), TimeSource::Cycles);
        // Any plausible TSC runs between 100 MHz and 10 GHz.
        assert!(timer.tsc_hz() > 1e8 && timer.tsc_hz() < 1e10);

        let stamp = timer.start();
        std::thread::sleep(Duration::from_millis(1));
        let dt = timer.elapsed(stamp);
        assert!(dt > 5e-4 && dt < 1.0);
    }
}
