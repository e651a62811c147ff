//! Window Functions
//!
//! Zero-pads a sequence of `s` samples to the FFT size `n` (centered) and
//! weights the samples to reduce spectral leakage.
//!
//! All weights share the angular base `π / (n - 1)` and are evaluated at the
//! sample's index within the padded FFT input.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DspError;

const FLATTOP: [f64; 5] = [0.21557895, 0.41663158, 0.277263158, 0.083578947, 0.006947368];

const BLACKMAN_HARRIS: [f64; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

/// Window function applied before the FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// Rectangular, leaves samples untouched
    Boxcar,
    #[default]
    Hann,
    /// 5-term cosine sum, accurate amplitudes
    Flattop,
    /// 4-term cosine sum, low sidelobes
    BlackmanHarris,
}

impl Window {
    /// Every window, in option order
    pub const ALL: [Window; 4] = [
        Window::Boxcar,
        Window::Hann,
        Window::Flattop,
        Window::BlackmanHarris,
    ];

    /// Name used on the command line and in config files
    pub fn name(self) -> &'static str {
        match self {
            Window::Boxcar => "boxcar",
            Window::Hann => "hann",
            Window::Flattop => "flattop",
            Window::BlackmanHarris => "blackmanharris",
        }
    }

    /// Weight of index `i` in an FFT input of size `n` (`n >= 2`)
    pub fn weight(self, i: usize, n: usize) -> f64 {
        let x = i as f64 * PI / (n - 1) as f64;
        match self {
            Window::Boxcar => 1.0,
            Window::Hann => 0.5 - 0.5 * (2.0 * x).cos(),
            Window::Flattop => {
                let [a0, a1, a2, a3, a4] = FLATTOP;
                a0 - a1 * (2.0 * x).cos() + a2 * (4.0 * x).cos() - a3 * (6.0 * x).cos()
                    + a4 * (8.0 * x).cos()
            }
            Window::BlackmanHarris => {
                let [a0, a1, a2, a3] = BLACKMAN_HARRIS;
                a0 - a1 * (2.0 * x).cos() + a2 * (4.0 * x).cos() - a3 * (6.0 * x).cos()
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Window::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| DspError::UnknownWindow(s.to_string()))
    }
}

/// Pre-computed window for a fixed sequence length and FFT size
pub struct Windower {
    window: Window,
    /// Weights of the `s` samples, already offset into the padded range
    coeffs: Vec<f64>,
    /// First index of the samples within the FFT input
    offset: usize,
    fft_size: usize,
}

impl Windower {
    /// Create a windower for `samples` samples padded to `fft_size`
    pub fn new(window: Window, samples: usize, fft_size: usize) -> Result<Self, DspError> {
        if fft_size < 2 {
            return Err(DspError::InvalidFftSize(fft_size));
        }
        if samples == 0 || samples > fft_size {
            return Err(DspError::InvalidWindowSize { samples, fft_size });
        }

        let offset = (fft_size - samples) / 2;
        let coeffs = (offset..offset + samples)
            .map(|i| window.weight(i, fft_size))
            .collect();

        Ok(Self {
            window,
            coeffs,
            offset,
            fft_size,
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Pad and window `sequence` into `out`
    ///
    /// `out` is caller-owned scratch of length `fft_size`, fully overwritten
    /// on every call so the pipeline never allocates per sequence.
    pub fn apply(&self, sequence: &[i16], out: &mut [f64]) -> Result<(), DspError> {
        if sequence.len() != self.coeffs.len() {
            return Err(DspError::BufferSizeMismatch {
                expected: self.coeffs.len(),
                got: sequence.len(),
            });
        }
        if out.len() != self.fft_size {
            return Err(DspError::BufferSizeMismatch {
                expected: self.fft_size,
                got: out.len(),
            });
        }

        let end = self.offset + sequence.len();
        out[..self.offset].fill(0.0);
        out[end..].fill(0.0);
        for ((o, &sample), &coeff) in out[self.offset..end]
            .iter_mut()
            .zip(sequence)
            .zip(&self.coeffs)
        {
            *o = f64::from(sample) * coeff;
        }

        Ok(())
    }
}
