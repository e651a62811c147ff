//! Spectrum Analyzer Pipeline
//!
//! The [`Analyzer`] owns every buffer and counter of the pipeline and runs
//! one cycle per sequence:
//!
//! ```text
//! Sequencer::next ─▶ Windower::apply ─▶ RealFft::process ─▶ SpectralBinner::fold
//!        ▲                                                           │
//!        └──────── r sequences per spectrum ◀── aggregate lines ◀────┘
//!                                  │
//!                                  ▼
//!                         quantize ─▶ write u8[l]
//! ```
//!
//! All buffers are allocated in [`Analyzer::new`]; `run()` only blocks on
//! the reader and never allocates.

use std::io::{Read, Write};

use asa_dsp::{distribute, quantize, RealFft, SpectralBinner, Windower};
use tracing::{debug, trace};

use crate::config::AnalyzerParams;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::sequencer::Sequencer;

/// Counters reported when the input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sequences_read: u64,
    pub spectrums_written: u64,
    pub bytes_discarded: u64,
}

/// Streaming PCM-to-spectrum pipeline
pub struct Analyzer<R, W> {
    params: AnalyzerParams,
    sequencer: Sequencer<R>,
    windower: Windower,
    fft: RealFft,
    binner: SpectralBinner,
    writer: W,
    /// FFT input, `n` values
    real: Vec<f64>,
    /// Bin magnitudes, then folded lines, `b` values
    scratch: Vec<f64>,
    /// Lines summed over the sequences of one spectrum, `l` values
    aggregate: Vec<f64>,
    /// Largest aggregate line of the current spectrum
    peak: f64,
    /// Quantized spectrum, `l` bytes
    spectrum: Vec<u8>,
    /// Spectrums written (`num_out`)
    num_out: u64,
}

impl<R: Read, W: Write> Analyzer<R, W> {
    /// Build the pipeline: distribution, FFT plan and all buffers
    ///
    /// `params` normally comes from `AnalyzerConfig::validate`; hand-built
    /// records without samples, stride or repeat are rejected here.
    pub fn new(params: AnalyzerParams, reader: R, writer: W) -> AnalyzerResult<Self> {
        if params.sequence_len == 0 || params.stride == 0 || params.repeat == 0 {
            return Err(AnalyzerError::Config(format!(
                "sequence length {}, stride {} and repeat {} must all be at least 1",
                params.sequence_len, params.stride, params.repeat
            )));
        }

        let distribution = distribute(params.bins, params.lines, params.power)?;
        debug!(
            "distribution of {} bins to {} lines with power {}: {:?}",
            params.bins,
            params.lines,
            params.power,
            distribution.counts()
        );

        let windower = Windower::new(params.window, params.sequence_len, params.fft_size)?;
        let fft = RealFft::new(params.fft_size)?;
        if fft.bins() != params.fft_bins {
            return Err(AnalyzerError::Config(format!(
                "fft of size {} yields {} bins, expected {}",
                params.fft_size,
                fft.bins(),
                params.fft_bins
            )));
        }

        Ok(Self {
            sequencer: Sequencer::new(reader, params.sequence_len, params.stride),
            windower,
            fft,
            binner: SpectralBinner::new(params.first_bin, distribution),
            writer,
            real: vec![0.0; params.fft_size],
            scratch: vec![0.0; params.bins],
            aggregate: vec![0.0; params.lines],
            peak: 0.0,
            spectrum: vec![0; params.lines],
            num_out: 0,
            params,
        })
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    /// Number of sequences read so far
    pub fn num_in(&self) -> u64 {
        self.sequencer.num_in()
    }

    /// Number of spectrums written so far
    pub fn num_out(&self) -> u64 {
        self.num_out
    }

    /// Process the input until end of stream
    ///
    /// Read and write failures are returned immediately; end of stream is not
    /// an error.
    pub fn run(&mut self) -> AnalyzerResult<RunSummary> {
        debug!("{:?}", self.params);

        'spectrums: loop {
            self.aggregate.fill(0.0);
            self.peak = 0.0;

            for pending in 0..self.params.repeat {
                if !self.sequencer.next()? {
                    if pending > 0 {
                        debug!(
                            "dropping incomplete spectrum of {} of {} sequences",
                            pending, self.params.repeat
                        );
                    }
                    break 'spectrums;
                }
                self.analyze_sequence()?;
            }

            self.emit()?;
        }

        let summary = RunSummary {
            sequences_read: self.sequencer.num_in(),
            spectrums_written: self.num_out,
            bytes_discarded: self.sequencer.bytes_discarded(),
        };
        debug!("number of sequences read: {}", summary.sequences_read);
        debug!("number of spectrums written: {}", summary.spectrums_written);
        Ok(summary)
    }

    fn analyze_sequence(&mut self) -> AnalyzerResult<()> {
        self.windower
            .apply(self.sequencer.sequence(), &mut self.real)?;
        let bins = self.fft.process(&self.real)?;
        let max = self.binner.fold(bins, &mut self.scratch)?;
        trace!("sequence #{} max magnitude {:.1}", self.sequencer.num_in(), max);

        // Aggregates only grow, so the running max ends as the final max
        for (sum, &line) in self.aggregate.iter_mut().zip(&self.scratch) {
            *sum += line;
            self.peak = self.peak.max(*sum);
        }
        Ok(())
    }

    fn emit(&mut self) -> AnalyzerResult<()> {
        quantize(&self.aggregate, self.peak, &mut self.spectrum)?;
        self.writer
            .write_all(&self.spectrum)
            .and_then(|()| self.writer.flush())
            .map_err(AnalyzerError::Write)?;

        self.num_out += 1;
        trace!("spectrum #{} written", self.num_out);
        Ok(())
    }

    /// Tear down the pipeline and hand back the output
    pub fn into_writer(self) -> W {
        self.writer
    }
}
