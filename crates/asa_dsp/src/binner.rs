//! Spectral Binning
//!
//! Folds the retained FFT bins `b0..=b1` into output lines according to a
//! [`LineDistribution`]: line `j` is the mean magnitude of the next `g[j]`
//! bins, consumed in index order with no gaps or overlaps.

use rustfft::num_complex::Complex;

use crate::distribution::LineDistribution;
use crate::error::DspError;

/// Folds FFT output into lines for a fixed bin range and distribution
pub struct SpectralBinner {
    first_bin: usize,
    distribution: LineDistribution,
}

impl SpectralBinner {
    /// Create a binner for bins starting at `first_bin`
    ///
    /// The number of retained bins is `distribution.bins()`.
    pub fn new(first_bin: usize, distribution: LineDistribution) -> Self {
        Self {
            first_bin,
            distribution,
        }
    }

    pub fn distribution(&self) -> &LineDistribution {
        &self.distribution
    }

    /// Fold `spectrum` into `scratch` and return the largest line value
    ///
    /// `scratch` is caller-owned, at least `b` long, and is overwritten on
    /// every call: first with bin magnitudes, then in place with the line
    /// values, which end up in `scratch[..l]`.
    pub fn fold(&self, spectrum: &[Complex<f64>], scratch: &mut [f64]) -> Result<f64, DspError> {
        let bins = self.distribution.bins();
        let last = self.first_bin + bins;
        if spectrum.len() < last {
            return Err(DspError::BufferSizeMismatch {
                expected: last,
                got: spectrum.len(),
            });
        }
        if scratch.len() < bins {
            return Err(DspError::BufferSizeMismatch {
                expected: bins,
                got: scratch.len(),
            });
        }

        for (m, c) in scratch.iter_mut().zip(&spectrum[self.first_bin..last]) {
            *m = c.norm();
        }

        fold_magnitudes(self.distribution.counts(), scratch)
    }
}

/// Average consecutive runs of `magnitudes` in place and return the maximum
///
/// Line `j` is written to `magnitudes[j]`. Every count must be at least 1 so
/// each run starts at or after its line index, and the in-place overwrite
/// never clobbers unread bins.
pub fn fold_magnitudes(counts: &[usize], magnitudes: &mut [f64]) -> Result<f64, DspError> {
    if let Some(line) = counts.iter().position(|&count| count == 0) {
        return Err(DspError::EmptyLine(line));
    }
    let total: usize = counts.iter().sum();
    if total > magnitudes.len() {
        return Err(DspError::BufferSizeMismatch {
            expected: total,
            got: magnitudes.len(),
        });
    }

    let mut max = 0.0_f64;
    let mut start = 0;

    for (line, &count) in counts.iter().enumerate() {
        let end = start + count;
        let sum: f64 = magnitudes[start..end].iter().sum();
        let value = sum / count as f64;
        magnitudes[line] = value;
        max = max.max(value);
        start = end;
    }

    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::distribute;

    #[test]
    fn test_fold_pairs() {
        let mut mags = [2.0, 4.0, 6.0, 8.0];
        let max = fold_magnitudes(&[2, 2], &mut mags).unwrap();
        assert_eq!(&mags[..2], &[3.0, 7.0]);
        assert_eq!(max, 7.0);
    }

    #[test]
    fn test_fold_uneven_runs() {
        let mut mags = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let max = fold_magnitudes(&[1, 2, 3], &mut mags).unwrap();
        assert_eq!(&mags[..3], &[1.0, 2.5, 5.0]);
        assert_eq!(max, 5.0);
    }

    #[test]
    fn test_fold_silence() {
        let mut mags = [0.0; 8];
        assert_eq!(fold_magnitudes(&[4, 4], &mut mags).unwrap(), 0.0);
    }

    #[test]
    fn test_fold_rejects_bad_counts() {
        let mut mags = [1.0, 2.0, 3.0];
        assert_eq!(
            fold_magnitudes(&[2, 2], &mut mags),
            Err(DspError::BufferSizeMismatch {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(
            fold_magnitudes(&[1, 0, 2], &mut mags),
            Err(DspError::EmptyLine(1))
        );
        // Rejected calls leave the magnitudes untouched
        assert_eq!(mags, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_binner_uses_bin_range() {
        // Bins 0 and 5 are outside the retained range 1..=4
        let spectrum = [
            Complex::new(100.0, 0.0),
            Complex::new(0.0, 2.0),
            Complex::new(4.0, 0.0),
            Complex::new(3.6, 4.8),
            Complex::new(-8.0, 0.0),
            Complex::new(100.0, 0.0),
        ];
        let binner = SpectralBinner::new(1, distribute(4, 2, 1.0).unwrap());
        let mut scratch = vec![0.0; 4];
        let max = binner.fold(&spectrum, &mut scratch).unwrap();

        assert!((scratch[0] - 3.0).abs() < 1e-12);
        assert!((scratch[1] - 7.0).abs() < 1e-12);
        assert!((max - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_binner_rejects_short_buffers() {
        let binner = SpectralBinner::new(2, distribute(4, 2, 1.0).unwrap());
        let spectrum = vec![Complex::new(0.0, 0.0); 5];
        let mut scratch = vec![0.0; 4];
        assert!(binner.fold(&spectrum, &mut scratch).is_err());

        let spectrum = vec![Complex::new(0.0, 0.0); 6];
        let mut scratch = vec![0.0; 3];
        assert!(binner.fold(&spectrum, &mut scratch).is_err());
    }
}
