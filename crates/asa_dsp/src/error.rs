//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during DSP operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Invalid distribution of {bins} bins to {lines} lines (need 1 <= lines <= bins)")]
    InvalidLineCount { bins: usize, lines: usize },

    #[error("Distribution power must be within 1.0..=2.0, got {0}")]
    InvalidPower(f64),

    #[error("Distribution sums to {sum} instead of {bins} bins")]
    DistributionMismatch { sum: usize, bins: usize },

    #[error("Line {0} has no bins to fold")]
    EmptyLine(usize),

    #[error("FFT size must be at least 2, got {0}")]
    InvalidFftSize(usize),

    #[error("Window of {samples} samples does not fit FFT size {fft_size}")]
    InvalidWindowSize { samples: usize, fft_size: usize },

    #[error("Buffer size mismatch: expected {expected}, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("Unknown window '{0}' (expected boxcar, hann, flattop or blackmanharris)")]
    UnknownWindow(String),
}
