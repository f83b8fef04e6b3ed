//! Error types for the checked kernel entry points and configuration.

use thiserror::Error;

use crate::config::Backend;

/// Buffer geometry rejected by a checked kernel call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// The destination cannot hold the region the kernel writes.
    #[error("output buffer too small: need {needed} elements, have {actual}")]
    OutputTooSmall {
        /// Elements the kernel would write up to.
        needed: usize,
        /// Elements actually available.
        actual: usize,
    },

    /// A source buffer is shorter than the region the kernel reads.
    #[error("input buffer too small: need {needed} elements, have {actual}")]
    InputTooSmall {
        /// Elements the kernel would read up to.
        needed: usize,
        /// Elements actually available.
        actual: usize,
    },

    /// Row stride is narrower than the row it must hold.
    #[error("stride {stride} is smaller than row width {width}")]
    InvalidStride {
        /// Requested stride in elements.
        stride: usize,
        /// Elements per row.
        width: usize,
    },

    /// Width overflowed when converted to an element count.
    #[error("row width overflows the address space")]
    InvalidWidth,
}

/// Invalid kernel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Backend name not recognized.
    #[error("unknown backend {0:?} (expected auto, scalar, portable or avx2)")]
    UnknownBackend(alloc::string::String),

    /// The backend was requested explicitly but the host cannot run it.
    #[error("backend {0:?} is not available on this host")]
    BackendUnavailable(Backend),

    /// Vector width override outside the supported range.
    #[error("vector width of {0} bytes is outside 16..=64")]
    InvalidVectorBytes(usize),
}
