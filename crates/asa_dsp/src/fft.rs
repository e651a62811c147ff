//! Forward FFT
//!
//! Real-to-complex transform of a fixed size `n`, producing `m = 1 + n / 2`
//! bins. The plan, work buffer and scratch are allocated once in `new()` and
//! reused for every sequence.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::DspError;

/// Number of complex bins produced by a real FFT of size `fft_size`
pub const fn bin_count(fft_size: usize) -> usize {
    1 + fft_size / 2
}

/// Planned forward transform with its own buffers
pub struct RealFft {
    fft: Arc<dyn Fft<f64>>,
    /// Complex work buffer of length `n`, transformed in place
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl RealFft {
    /// Plan a forward transform of `fft_size` real samples
    pub fn new(fft_size: usize) -> Result<Self, DspError> {
        if fft_size < 2 {
            return Err(DspError::InvalidFftSize(fft_size));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
        })
    }

    /// Transform size `n`
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Number of output bins `m`
    pub fn bins(&self) -> usize {
        bin_count(self.buffer.len())
    }

    /// Transform `input` (length `n`) and return the `m` non-negative frequency bins
    ///
    /// The returned slice borrows the internal buffer and is overwritten by
    /// the next call.
    pub fn process(&mut self, input: &[f64]) -> Result<&[Complex<f64>], DspError> {
        if input.len() != self.buffer.len() {
            return Err(DspError::BufferSizeMismatch {
                expected: self.buffer.len(),
                got: input.len(),
            });
        }

        for (c, &re) in self.buffer.iter_mut().zip(input) {
            *c = Complex::new(re, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let bins = self.bins();
        Ok(&self.buffer[..bins])
    }
}
