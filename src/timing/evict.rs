//! Cache eviction between trials.

use super::timer::black_box;

/// Evicts cache contents by strided reads over a large buffer.
///
/// Touching one word per cache line across a buffer larger than the cache of
/// interest displaces whatever the previous trial left resident, so every
/// trial starts from a cold cache. The buffer is allocated once per session
/// and reused; it is the act of walking it that evicts, not the allocation.
#[derive(Debug)]
pub struct CacheEvictor {
    buffer: Vec<i32>,
    /// Walk stride in elements (one cache line).
    stride: usize,
    /// Accumulator kept live across calls so the walk cannot be elided.
    sink: i32,
}

impl CacheEvictor {
    /// Create an evictor over `bytes` of memory, walking one read per
    /// `line_bytes`.
    pub fn new(bytes: usize, line_bytes: usize) -> Self {
        let elems = (bytes / std::mem::size_of::<i32>()).max(1);
        let stride = (line_bytes / std::mem::size_of::<i32>()).max(1);
        // Non-constant contents, so the sum cannot be folded at compile time.
        let buffer = (0..elems).map(|i| i as i32).collect();
        Self {
            buffer,
            stride,
            sink: 0,
        }
    }

    /// Walk the buffer, displacing cached data.
    pub fn evict(&mut self) {
        let mut x = self.sink;
        let mut i = 0;
        while i < self.buffer.len() {
            x = x.wrapping_add(self.buffer[i]);
            i += self.stride;
        }
        self.sink = black_box(x);
    }

    /// Size of the eviction buffer in bytes.
    pub fn bytes(&self) -> usize {
        self.buffer.len() * std::mem::size_of::<i32>()
    }
}
