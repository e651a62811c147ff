//! Analyzer Configuration
//!
//! [`AnalyzerConfig`] carries the option values as given by the user;
//! [`AnalyzerConfig::validate`] checks them and resolves defaults into the
//! immutable [`AnalyzerParams`] record the pipeline runs on.

use std::fmt;
use std::str::FromStr;

use asa_dsp::{bin_count, Window, MAX_POWER, MIN_POWER};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Upper bound for sequence length, FFT size and stride
pub const MAX_SIZE: usize = 65536;

/// Upper bound for the number of sequences per spectrum
pub const MAX_REPEAT: usize = 100_000;

/// Distance between the starts of consecutive sequences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stride {
    /// Absolute number of samples
    Samples(usize),
    /// Percentage of the sequence length
    Percent(f64),
}

impl Default for Stride {
    fn default() -> Self {
        Stride::Percent(100.0)
    }
}

impl Stride {
    /// Resolve to samples for a sequence of `sequence_len` samples
    pub fn to_samples(self, sequence_len: usize) -> AnalyzerResult<usize> {
        match self {
            Stride::Samples(d) => Ok(d),
            Stride::Percent(pct) if pct.is_finite() && pct > 0.0 => {
                Ok((sequence_len as f64 * pct / 100.0).round() as usize)
            }
            Stride::Percent(pct) => Err(AnalyzerError::Config(format!(
                "stride percentage must be positive, got {}",
                pct
            ))),
        }
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stride::Samples(d) => write!(f, "{}", d),
            Stride::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

impl FromStr for Stride {
    type Err = AnalyzerError;

    /// Parse `"1024"` (samples) or `"50%"` (of the sequence length)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyzerError::Config(format!("invalid stride '{}'", s));
        match s.trim().strip_suffix('%') {
            Some(pct) => pct.trim().parse().map(Stride::Percent).map_err(|_| invalid()),
            None => s.trim().parse().map(Stride::Samples).map_err(|_| invalid()),
        }
    }
}

/// Analyzer options as supplied by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Samples per sequence (`s`)
    pub sequence_len: usize,

    /// FFT size (`n`), defaults to the sequence length
    pub fft_size: Option<usize>,

    /// Index of the first retained bin (`b0`)
    pub first_bin: usize,

    /// Index of the last retained bin (`b1`), defaults to the last FFT bin
    pub last_bin: Option<usize>,

    /// Number of output lines (`l`)
    pub lines: usize,

    /// Distribution power (`p`), 1.0 is uniform
    pub power: f64,

    /// Sequences per spectrum (`r`)
    pub repeat: usize,

    /// Distance between sequence starts (`d`)
    pub stride: Stride,

    /// Window function (`w`)
    pub window: Window,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sequence_len: 2048,
            fft_size: None,
            // Skip DC
            first_bin: 1,
            last_bin: None,
            lines: 32,
            power: 1.0,
            repeat: 1,
            stride: Stride::default(),
            window: Window::default(),
        }
    }
}

/// Validated, fully resolved analyzer parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerParams {
    /// Samples per sequence (`s`)
    pub sequence_len: usize,
    /// FFT size (`n`)
    pub fft_size: usize,
    /// FFT output bins (`m = 1 + n / 2`)
    pub fft_bins: usize,
    /// First retained bin (`b0`)
    pub first_bin: usize,
    /// Last retained bin (`b1`)
    pub last_bin: usize,
    /// Retained bins (`b = b1 - b0 + 1`)
    pub bins: usize,
    /// Output lines (`l`)
    pub lines: usize,
    /// Distribution power (`p`)
    pub power: f64,
    /// Sequences per spectrum (`r`)
    pub repeat: usize,
    /// Samples between sequence starts (`d`)
    pub stride: usize,
    /// Window function (`w`)
    pub window: Window,
}

fn check(ok: bool, msg: impl FnOnce() -> String) -> AnalyzerResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AnalyzerError::Config(msg()))
    }
}

impl AnalyzerConfig {
    /// Validate the options and resolve defaults
    pub fn validate(&self) -> AnalyzerResult<AnalyzerParams> {
        let s = self.sequence_len;
        check((1..=MAX_SIZE).contains(&s), || {
            format!("sequence length {} out of range 1-{}", s, MAX_SIZE)
        })?;

        let n = self.fft_size.unwrap_or(s);
        check((2..=MAX_SIZE).contains(&n), || {
            format!("fft size {} out of range 2-{}", n, MAX_SIZE)
        })?;
        check(s <= n, || {
            format!("sequence length {} exceeds fft size {}", s, n)
        })?;

        let m = bin_count(n);
        let b0 = self.first_bin;
        let b1 = self.last_bin.unwrap_or(m - 1);
        check(b1 < m, || {
            format!("last bin {} out of range, fft size {} has {} bins", b1, n, m)
        })?;
        check(b0 <= b1, || {
            format!("first bin {} is after last bin {}", b0, b1)
        })?;
        let b = b1 - b0 + 1;

        let l = self.lines;
        check((1..=b).contains(&l), || {
            format!("number of lines {} out of range 1-{}", l, b)
        })?;

        let p = self.power;
        check((MIN_POWER..=MAX_POWER).contains(&p), || {
            format!("power {} out of range {}-{}", p, MIN_POWER, MAX_POWER)
        })?;

        let r = self.repeat;
        check((1..=MAX_REPEAT).contains(&r), || {
            format!("repeat {} out of range 1-{}", r, MAX_REPEAT)
        })?;

        let d = self.stride.to_samples(s)?;
        check((1..=MAX_SIZE).contains(&d), || {
            format!("stride {} ({} samples) out of range 1-{}", self.stride, d, MAX_SIZE)
        })?;

        Ok(AnalyzerParams {
            sequence_len: s,
            fft_size: n,
            fft_bins: m,
            first_bin: b0,
            last_bin: b1,
            bins: b,
            lines: l,
            power: p,
            repeat: r,
            stride: d,
            window: self.window,
        })
    }
}
