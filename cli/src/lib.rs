//! asa-s16le - Command Line Front End
//!
//! Opens the input and output, validates the options and drives the
//! analyzer until the input ends.

mod args;
mod logging;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use asa_core::Analyzer;
use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing::{debug, info};

pub use args::{Args, BinRange};

/// Program name used in the version banner
pub const PROGRAM: &str = "asa-s16le";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        None => {
            info!("stdin used as input");
            Ok(Box::new(io::stdin().lock()))
        }
        Some(path) => {
            let file = File::open(path).with_context(|| format!("input: {}", path.display()))?;
            debug!("'{}' opened readonly", path.display());
            Ok(Box::new(file))
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        None => {
            info!("stdout used as output");
            Ok(Box::new(io::stdout().lock()))
        }
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("output: {}", path.display()))?;
            debug!("'{}' opened writeonly", path.display());
            Ok(Box::new(file))
        }
    }
}

/// Run the analyzer with the process arguments
///
/// Invalid options exit through clap's usage error; everything else that
/// fails is returned.
pub fn run() -> Result<()> {
    logging::init();

    let args = Args::parse();
    debug!("{} {}", PROGRAM, VERSION);

    let params = match args.to_config().validate() {
        Ok(params) => params,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    let input = open_input(args.input.as_deref())?;
    let output = open_output(args.output.as_deref())?;

    let mut analyzer = Analyzer::new(params, input, output)?;
    let summary = analyzer.run()?;
    info!(
        "{} sequence(s) read, {} spectrum(s) written",
        summary.sequences_read, summary.spectrums_written
    );

    debug!("cleaning up");
    Ok(())
}
