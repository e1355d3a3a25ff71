//! Crate-level error type for I/O and configuration surfaces.

use thiserror::Error;

/// Errors surfaced by the export helpers and CLI drivers.
///
/// The core algorithms themselves are infallible by design: the timing
/// session always terminates via the sample cap, and the patch solver's
/// recursion is bounded by the minimum patch side. Errors only arise at the
/// edges: writing result files and validating caller configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying I/O operation failed (PPM or data-file output).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The requested operation is not available on this platform
    /// (e.g. core pinning outside Linux).
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),
}
