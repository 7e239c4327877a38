use thiserror::Error;

/// Rejected pipeline configuration. Any of these is fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be a positive finite number of degrees, got {0}")]
    InvalidGridSize(f64),

    #[error("proximity threshold must be a non-negative finite number of degrees, got {0}")]
    InvalidThreshold(f64),

    /// The 3x3 cell scan only covers a threshold of at most half a cell.
    #[error(
        "proximity threshold {threshold} exceeds half the grid size {grid_size}; the neighbor scan would miss matches"
    )]
    ThresholdExceedsHalfCell { threshold: f64, grid_size: f64 },

    #[error("worker thread count must be at least 1")]
    ZeroThreads,
}
