//! Error types.
//!
//! Only start-up problems and capture output are errors. Degenerate geometry
//! and numerical trouble inside a tick are recovered where they happen.

/// Simulation error types
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("{0}")]
    UnsupportedCapability(String),
    #[error("GPU probe failed: {0}")]
    GpuProbe(String),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
