//! asa DSP - Digital Signal Processing Module
//!
//! This crate provides the signal path of the spectrum analyser:
//! - Power-law distribution of FFT bins to output lines
//! - Zero-padding and window functions (boxcar, hann, flattop, blackmanharris)
//! - Forward real-to-complex FFT via rustfft
//! - Folding of bin magnitudes into lines
//! - 8-bit quantization relative to the spectrum maximum
//!
//! # Architecture
//!
//! ```text
//! i16[s] ──Windower──▶ f64[n] ──RealFft──▶ Complex[m] ──SpectralBinner──▶ f64[l] ──quantize──▶ u8[l]
//! ```
//!
//! Every stage writes into caller-owned buffers that are allocated once, so
//! the per-sequence path does not allocate.

mod binner;
mod distribution;
mod error;
mod fft;
mod quantize;
mod window;

pub use binner::{fold_magnitudes, SpectralBinner};
pub use distribution::{distribute, LineDistribution, MAX_POWER, MIN_POWER};
pub use error::DspError;
pub use fft::{bin_count, RealFft};
pub use quantize::quantize;
pub use window::{Window, Windower};

pub use rustfft::num_complex::Complex;
