//! Result reporting and file encoding.
//!
//! - [`terminal`]: colored, human-readable summaries for interactive runs
//! - [`ppm`]: PPM image encoding for rendered canvases and the
//!   tab-separated data format of the mountain sweep

pub mod ppm;
pub mod terminal;
