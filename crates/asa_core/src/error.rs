//! Analyzer Error Types

use std::io;

use thiserror::Error;

/// Errors that can occur in the analyzer pipeline
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Read PCM: {0}")]
    Read(#[source] io::Error),

    #[error("Write spectrum: {0}")]
    Write(#[source] io::Error),

    #[error("DSP error: {0}")]
    Dsp(#[from] asa_dsp::DspError),
}

/// Result type alias for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyzerError::Config("lines out of range".into());
        assert!(err.to_string().contains("lines out of range"));

        let err = AnalyzerError::Read(io::Error::new(io::ErrorKind::Other, "broken pipe"));
        assert!(err.to_string().contains("broken pipe"));
    }

    #[test]
    fn test_error_from_dsp() {
        let dsp_err = asa_dsp::DspError::InvalidFftSize(1);
        let err: AnalyzerError = dsp_err.into();
        assert!(matches!(err, AnalyzerError::Dsp(_)));
    }
}
