//! asa Core - Spectrum Analyser Engine
//!
//! This crate turns a stream of s16le PCM into a stream of 8-bit spectrums:
//! - Validated configuration record ([`AnalyzerConfig`] -> [`AnalyzerParams`])
//! - Streaming sequencer with overlap and skip, safe on pipes
//! - Single-owner pipeline driving the DSP stages from `asa_dsp`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  s16le   ┌───────────┐  i16[s]  ┌──────────────────────────┐  u8[l]   ┌──────────┐
//! │  Reader  │ ───────▶ │ Sequencer │ ───────▶ │ window ▸ fft ▸ fold ▸ u8 │ ───────▶ │  Writer  │
//! └──────────┘          └───────────┘          └──────────────────────────┘          └──────────┘
//!                          (the only blocking point, no allocation per cycle)
//! ```

mod analyzer;
mod config;
mod error;
mod sequencer;

pub use analyzer::{Analyzer, RunSummary};
pub use config::{AnalyzerConfig, AnalyzerParams, Stride, MAX_REPEAT, MAX_SIZE};
pub use error::{AnalyzerError, AnalyzerResult};
pub use sequencer::Sequencer;

// Re-export DSP types for convenience
pub use asa_dsp::{DspError, Window};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Verify public API is accessible
        let _config = AnalyzerConfig::default();
        let _window = Window::default();
    }
}
