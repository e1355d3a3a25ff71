//! Configuration for the convergence timing harness.

/// Clock backing a timing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSource {
    /// Monotonic wall clock (`std::time::Instant`). Portable default.
    #[default]
    Monotonic,

    /// Invariant TSC via `rdtsc`/`rdtscp`, converted to seconds with a
    /// sleep-calibrated frequency. Lower overhead than the monotonic clock
    /// on x86_64; falls back to `Monotonic` on other architectures.
    Cycles,
}

/// Configuration options for [`ConvergenceTimer`](crate::ConvergenceTimer).
///
/// A session repeats cold-cache trials of a kernel until the `max_count`
/// smallest timings agree within a relative spread of `epsilon`, or until
/// `max_samples` trials have run. The defaults are the ones the memory
/// mountain sweep uses.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// How many best samples must agree before declaring convergence.
    ///
    /// Convergence is only evaluated once this many trials have run. Must be
    /// at least 1; a value of 1 makes convergence trivially immediate after
    /// the first sample.
    pub max_count: usize,

    /// Hard cap on the number of trials.
    ///
    /// Guarantees termination even without convergence. `max_count` larger
    /// than `max_samples` is legal: the best-sample set then never fills and
    /// the session terminates purely on this cap.
    pub max_samples: usize,

    /// Relative spread tolerance for convergence.
    ///
    /// The session converges when `(worst_of_best - best) <= epsilon * best`.
    pub epsilon: f64,

    /// Subtract the measured timing overhead from each trial.
    ///
    /// Only applied when the raw timing exceeds the overhead, so corrected
    /// timings stay positive.
    pub correct_overhead: bool,

    /// Size of the cache-eviction buffer touched before every trial.
    ///
    /// Should exceed the last-level cache of interest. Default: 1 MiB.
    pub eviction_bytes: usize,

    /// Stride of the eviction walk, in bytes. Default: 64 (one cache line).
    pub cache_line_bytes: usize,

    /// Clock used for the trials.
    pub source: TimeSource,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            max_count: 5,
            max_samples: 500,
            epsilon: 0.01,
            correct_overhead: false,
            eviction_bytes: 1 << 20,
            cache_line_bytes: 64,
            source: TimeSource::Monotonic,
        }
    }
}

impl TimerConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal settings for fast iteration and tests.
    ///
    /// Loose tolerance, small caps, small eviction buffer.
    pub fn quick() -> Self {
        Self {
            max_count: 3,
            max_samples: 50,
            epsilon: 0.05,
            eviction_bytes: 1 << 16,
            ..Default::default()
        }
    }

    /// Generous settings for publication-quality numbers.
    pub fn thorough() -> Self {
        Self {
            max_count: 10,
            max_samples: 5_000,
            epsilon: 0.005,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the number of best samples that must agree.
    pub fn max_count(mut self, count: usize) -> Self {
        assert!(count >= 1, "max_count must be at least 1");
        self.max_count = count;
        self
    }

    /// Set the hard trial cap.
    pub fn max_samples(mut self, samples: usize) -> Self {
        assert!(samples >= 1, "max_samples must be at least 1");
        self.max_samples = samples;
        self
    }

    /// Set the relative spread tolerance.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "epsilon must be positive");
        self.epsilon = epsilon;
        self
    }

    /// Enable or disable overhead correction.
    pub fn correct_overhead(mut self, correct: bool) -> Self {
        self.correct_overhead = correct;
        self
    }

    /// Set the eviction buffer size in bytes.
    pub fn eviction_bytes(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "eviction_bytes must be positive");
        self.eviction_bytes = bytes;
        self
    }

    /// Set the time source.
    pub fn source(mut self, source: TimeSource) -> Self {
        self.source = source;
        self
    }

    /// Check that the configuration is valid.
    ///
    /// Note that `max_count > max_samples` is deliberately *not* an error:
    /// the session must still terminate via the sample cap, without the
    /// convergence test ever firing.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_count == 0 {
            return Err("max_count must be at least 1".to_string());
        }
        if self.max_samples == 0 {
            return Err("max_samples must be at least 1".to_string());
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err("epsilon must be positive".to_string());
        }
        if self.cache_line_bytes == 0 {
            return Err("cache_line_bytes must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimerConfig::default();
        assert_eq!(config.max_count, 5);
        assert_eq!(config.max_samples, 500);
        assert_eq!(config.epsilon, 0.01);
        assert!(!config.correct_overhead);
        assert_eq!(config.eviction_bytes, 1 << 20);
    }

    #[test]
    fn test_builder_methods() {
        let config = TimerConfig::new()
            .max_count(7)
            .max_samples(1_000)
            .epsilon(0.02)
            .correct_overhead(true)
            .source(TimeSource::Cycles);

        assert_eq!(config.max_count, 7);
        assert_eq!(config.max_samples, 1_000);
        assert_eq!(config.epsilon, 0.02);
        assert!(config.correct_overhead);
        assert_eq!(config.source, TimeSource::Cycles);
    }

    #[test]
    fn test_count_above_cap_is_valid() {
        // Terminates on the cap instead of converging; must pass validation.
        let config = TimerConfig::new().max_count(100).max_samples(10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_epsilon() {
        let mut config = TimerConfig::default();
        config.epsilon = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[should_panic]
    fn test_invalid_max_count() {
        TimerConfig::new().max_count(0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_epsilon() {
        TimerConfig::new().epsilon(-0.5);
    }
}
