//! Streaming Sequencer
//!
//! Cuts a stream of s16le PCM into sequences of `s` samples whose starts are
//! `d` samples apart.
//!
//! ```text
//! d < s (overlap):  keep the last s - d samples, read d new ones
//! d = s:            read s new samples
//! d > s (skip):     read and drop d - s samples, then read s new ones
//! ```
//!
//! The input may be a pipe, so skipping reads instead of seeking, and every
//! read may come back short.

use std::io::{ErrorKind, Read};

use tracing::{info, trace, warn};

use crate::error::{AnalyzerError, AnalyzerResult};

const SAMPLE_BYTES: usize = std::mem::size_of::<i16>();

/// Produces overlapping or skip-spaced sequences from a PCM reader
pub struct Sequencer<R> {
    reader: R,
    /// Current sequence, shifted or replaced in place
    samples: Vec<i16>,
    /// Raw read buffer, also used as the sink for skipped samples
    bytes: Vec<u8>,
    stride: usize,
    /// Whether a first sequence has been read
    primed: bool,
    finished: bool,
    /// Sequences read (`num_in`)
    num_in: u64,
    bytes_discarded: u64,
}

impl<R: Read> Sequencer<R> {
    /// Create a sequencer for `sequence_len` samples, `stride` samples apart
    pub fn new(reader: R, sequence_len: usize, stride: usize) -> Self {
        debug_assert!(sequence_len >= 1 && stride >= 1, "empty sequence or stride");
        Self {
            reader,
            samples: vec![0; sequence_len],
            bytes: vec![0; sequence_len * SAMPLE_BYTES],
            stride,
            primed: false,
            finished: false,
            num_in: 0,
            bytes_discarded: 0,
        }
    }

    /// Advance to the next sequence
    ///
    /// Returns `Ok(false)` at end of stream. Bytes consumed for an incomplete
    /// sequence, skipped samples included, are dropped and counted in
    /// [`bytes_discarded`](Self::bytes_discarded).
    pub fn next(&mut self) -> AnalyzerResult<bool> {
        if self.finished {
            return Ok(false);
        }

        let len = self.samples.len();
        let (skip, keep) = match (self.primed, self.stride) {
            (false, _) => (0, 0),
            (true, d) if d < len => (0, len - d),
            (true, d) => (d - len, 0),
        };

        // Bytes consumed for this sequence, skipped samples included
        let mut consumed = 0;
        let mut remaining = skip * SAMPLE_BYTES;
        while remaining > 0 {
            let chunk = remaining.min(self.bytes.len());
            let got = read_full(&mut self.reader, &mut self.bytes[..chunk])?;
            consumed += got;
            if got < chunk {
                return Ok(self.end_of_stream(consumed));
            }
            remaining -= chunk;
        }

        if keep > 0 {
            self.samples.copy_within(len - keep.., 0);
        }

        let wanted = (len - keep) * SAMPLE_BYTES;
        let got = read_full(&mut self.reader, &mut self.bytes[..wanted])?;
        if got < wanted {
            return Ok(self.end_of_stream(consumed + got));
        }

        for (sample, raw) in self.samples[keep..]
            .iter_mut()
            .zip(self.bytes[..wanted].chunks_exact(SAMPLE_BYTES))
        {
            *sample = i16::from_le_bytes([raw[0], raw[1]]);
        }

        self.primed = true;
        self.num_in += 1;
        trace!("sequence #{} read", self.num_in);
        Ok(true)
    }

    fn end_of_stream(&mut self, partial: usize) -> bool {
        info!("end of stream after reading {} sequence(s)", self.num_in);
        if partial > 0 {
            warn!("{} bytes discarded", partial);
            self.bytes_discarded += partial as u64;
        }
        self.finished = true;
        false
    }

    /// The current sequence, valid after `next()` returned `true`
    pub fn sequence(&self) -> &[i16] {
        &self.samples
    }

    /// Number of sequences read so far
    pub fn num_in(&self) -> u64 {
        self.num_in
    }

    /// Trailing bytes (skipped or partially read) dropped because the stream
    /// ended before a full sequence
    pub fn bytes_discarded(&self) -> u64 {
        self.bytes_discarded
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Read until `buf` is full or the reader hits end of stream
///
/// Returns the number of bytes read; less than `buf.len()` means end of stream.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> AnalyzerResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                trace!("read({}): {}", buf.len() - filled, n);
                filled += n;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(AnalyzerError::Read(e)),
        }
    }
    Ok(filled)
}
