//! Command-line argument parsing.

use std::path::PathBuf;
use std::str::FromStr;

use asa_core::{AnalyzerConfig, Stride, Window};
use clap::Parser;

/// Inclusive range of FFT bins, `B0:B1`, either side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinRange {
    pub first: Option<usize>,
    pub last: Option<usize>,
}

impl FromStr for BinRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .split_once(':')
            .ok_or_else(|| format!("expected B0:B1, got '{}'", s))?;
        let bound = |side: &str| -> Result<Option<usize>, String> {
            match side.trim() {
                "" => Ok(None),
                digits => digits
                    .parse()
                    .map(Some)
                    .map_err(|_| format!("invalid bin index '{}'", digits)),
            }
        };
        Ok(Self {
            first: bound(first)?,
            last: bound(last)?,
        })
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "asa-s16le", version)]
#[command(
    about = "Analyses audio and generates spectrums",
    long_about = "Analyses audio and generates spectrums.\n\
                  Input is PCM s16le (default stdin), output is 8-bit spectrum \
                  data, one byte per line (default stdout)."
)]
pub struct Args {
    /// Samples per sequence [default: 2048]
    #[arg(short = 's', long = "samples", value_name = "SAMPLES")]
    pub sequence_len: Option<usize>,

    /// FFT size, at least the sequence length [default: sequence length]
    #[arg(short = 'n', long = "fft-size", value_name = "SIZE")]
    pub fft_size: Option<usize>,

    /// Retained FFT bins B0:B1, either side may be empty [default: 1:last]
    #[arg(short = 'b', long = "bins", value_name = "B0:B1")]
    pub bins: Option<BinRange>,

    /// Number of output lines [default: 32]
    #[arg(short = 'l', long, value_name = "LINES")]
    pub lines: Option<usize>,

    /// Distribution of bins to lines, 1 (uniform) to 2 [default: 1]
    #[arg(short = 'p', long, value_name = "POWER")]
    pub power: Option<f64>,

    /// Sequences per spectrum [default: 1]
    #[arg(short = 'r', long, value_name = "COUNT")]
    pub repeat: Option<usize>,

    /// Distance between sequence starts, samples or percent of SAMPLES [default: 100%]
    #[arg(short = 'd', long, value_name = "STRIDE")]
    pub stride: Option<Stride>,

    /// Window function: boxcar, hann, flattop, blackmanharris [default: hann]
    #[arg(short = 'w', long, value_name = "WINDOW")]
    pub window: Option<Window>,

    /// Input file of PCM s16le samples
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file for spectrums, appended to
    #[arg(value_name = "OUTPUT", requires = "input")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Fill unset options from the analyzer defaults
    pub fn to_config(&self) -> AnalyzerConfig {
        let defaults = AnalyzerConfig::default();
        let bins = self.bins.unwrap_or_default();

        AnalyzerConfig {
            sequence_len: self.sequence_len.unwrap_or(defaults.sequence_len),
            fft_size: self.fft_size.or(defaults.fft_size),
            first_bin: bins.first.unwrap_or(defaults.first_bin),
            last_bin: bins.last.or(defaults.last_bin),
            lines: self.lines.unwrap_or(defaults.lines),
            power: self.power.unwrap_or(defaults.power),
            repeat: self.repeat.unwrap_or(defaults.repeat),
            stride: self.stride.unwrap_or(defaults.stride),
            window: self.window.unwrap_or(defaults.window),
        }
    }
}
