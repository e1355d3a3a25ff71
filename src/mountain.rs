//! Memory-mountain bandwidth sweep.
//!
//! Sweeps read bandwidth over a grid of working-set sizes and access
//! strides, one cold-cache convergence session per cell. Plotted, the grid
//! shows the cache hierarchy as a "mountain": ridges at each cache capacity,
//! slopes as stride defeats prefetching.

use serde::Serialize;

use crate::config::TimerConfig;
use crate::timing::{black_box, ConvergenceTimer};

/// Element type of the swept array.
pub type Elem = i64;

/// Configuration for a mountain sweep.
#[derive(Debug, Clone)]
pub struct MountainConfig {
    /// Smallest working-set size in bytes. Default: 16 KiB.
    pub min_bytes: usize,
    /// Largest working-set size in bytes; also the allocation size.
    /// Default: 128 MiB.
    pub max_bytes: usize,
    /// Strides 1..=max_stride are swept, in elements. Default: 15.
    pub max_stride: usize,
    /// Timing session settings shared by every cell.
    pub timer: TimerConfig,
}

impl Default for MountainConfig {
    fn default() -> Self {
        Self {
            min_bytes: 1 << 14,
            max_bytes: 1 << 27,
            max_stride: 15,
            timer: TimerConfig::default(),
        }
    }
}

impl MountainConfig {
    /// Create a configuration with the standard sweep bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shrunken sweep for tests and demos (64 KiB ceiling, strides to 4).
    pub fn quick() -> Self {
        Self {
            min_bytes: 1 << 13,
            max_bytes: 1 << 16,
            max_stride: 4,
            timer: TimerConfig::quick(),
        }
    }

    /// Set the sweep bounds in bytes.
    pub fn byte_range(mut self, min_bytes: usize, max_bytes: usize) -> Self {
        assert!(
            min_bytes >= std::mem::size_of::<Elem>() && min_bytes <= max_bytes,
            "byte range must hold at least one element and be ordered"
        );
        self.min_bytes = min_bytes;
        self.max_bytes = max_bytes;
        self
    }

    /// Set the largest stride swept.
    pub fn max_stride(mut self, stride: usize) -> Self {
        assert!(stride >= 1, "max_stride must be at least 1");
        self.max_stride = stride;
        self
    }

    /// Set the timer settings used for every cell.
    pub fn timer(mut self, timer: TimerConfig) -> Self {
        self.timer = timer;
        self
    }
}

/// One row of the mountain: a working-set size swept across all strides.
#[derive(Debug, Clone, Serialize)]
pub struct MountainRow {
    /// Working-set size in bytes.
    pub size_bytes: usize,
    /// log2 of the size in KiB, the conventional row label.
    pub log2_kb: u32,
    /// Read bandwidth in MB/s, indexed by stride − 1.
    pub bandwidth_mb_s: Vec<f64>,
}

/// Result of a full sweep.
#[derive(Debug, Clone, Serialize)]
pub struct MountainReport {
    /// The strides swept, in elements.
    pub strides: Vec<usize>,
    /// Rows from the largest working set down to the smallest.
    pub rows: Vec<MountainRow>,
}

/// Strided read reduction over `data`, combining four elements per step.
///
/// The 4×4 unrolling gives the compiler independent accumulator chains so
/// the measurement reflects memory throughput rather than add latency.
pub fn strided_sum(data: &[Elem], stride: usize) -> Elem {
    let sx2 = stride * 2;
    let sx3 = stride * 3;
    let sx4 = stride * 4;

    let mut acc0: Elem = 0;
    let mut acc1: Elem = 0;
    let mut acc2: Elem = 0;
    let mut acc3: Elem = 0;

    let limit = data.len().saturating_sub(sx4);
    let mut i = 0;
    while i < limit {
        acc0 = acc0.wrapping_add(data[i]);
        acc1 = acc1.wrapping_add(data[i + stride]);
        acc2 = acc2.wrapping_add(data[i + sx2]);
        acc3 = acc3.wrapping_add(data[i + sx3]);
        i += sx4;
    }
    // The tail keeps stepping by `stride` so the result equals a plain
    // strided reduction; a contiguous tail would touch elements the
    // unrolled body never reads.
    while i < data.len() {
        acc0 = acc0.wrapping_add(data[i]);
        i += stride;
    }

    acc0.wrapping_add(acc1)
        .wrapping_add(acc2)
        .wrapping_add(acc3)
}

/// Run the sweep, halving the working set from `max_bytes` down to
/// `min_bytes` and measuring every stride at each size.
pub fn run(config: &MountainConfig) -> MountainReport {
    let max_elems = config.max_bytes / std::mem::size_of::<Elem>();
    let data: Vec<Elem> = (0..max_elems as Elem).collect();

    let mut session = ConvergenceTimer::new(config.timer.clone());

    let strides: Vec<usize> = (1..=config.max_stride).collect();
    let mut rows = Vec::new();

    let mut size = config.max_bytes;
    while size >= config.min_bytes {
        let elems = size / std::mem::size_of::<Elem>();
        let log2_kb = (size as f64 / 1024.0).log2() as u32;

        let mut bandwidth_mb_s = Vec::with_capacity(strides.len());
        for &stride in &strides {
            let slice = &data[..elems];
            let m = session.measure(|| black_box(strided_sum(slice, stride)));
            // MB read per traversal, over the best observed traversal time.
            let mb = size as f64 / (1024.0 * 1024.0) / stride as f64;
            bandwidth_mb_s.push(mb / m.best);
        }

        rows.push(MountainRow {
            size_bytes: size,
            log2_kb,
            bandwidth_mb_s,
        });
        size >>= 1;
    }

    MountainReport { strides, rows }
}
