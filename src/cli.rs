//! Command-line driver: `persistence1d <filename> [threshold] [-MATLAB]`
//!
//! Reads the samples, runs the engine once, and writes the filtered pairs to
//! `<filename without extension>_res.txt`.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::{textfile, IndexBase, Persistence1D, PersistenceError, QueryOptions, Result, Threshold};

pub const USAGE: &str = "persistence1d <filename> [threshold] [-MATLAB]";

const ONE_BASED_FLAGS: [&str; 3] = ["-MATLAB", "-Matlab", "-matlab"];

/// Parsed driver arguments
#[derive(Debug, Clone, PartialEq)]
pub struct DriverArgs {
    pub input: PathBuf,
    pub options: QueryOptions,
}

impl DriverArgs {
    /// Parse arguments, program name excluded
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let input = args
            .next()
            .map(|s| PathBuf::from(s.as_ref()))
            .ok_or_else(|| PersistenceError::Usage("missing input file name".to_string()))?;

        let mut options = QueryOptions::default();
        for arg in args {
            let arg = arg.as_ref();
            if ONE_BASED_FLAGS.contains(&arg) {
                options.index_base = IndexBase::One;
            } else if arg.starts_with('-') && arg.parse::<f64>().is_err() {
                return Err(PersistenceError::Usage(format!("unknown flag {arg}")));
            } else {
                // Signed numbers included, so `-0` passes and `-1` is range-checked
                options.threshold = parse_threshold(arg)?;
            }
        }

        Ok(Self { input, options })
    }

    pub fn output_path(&self) -> PathBuf {
        textfile::result_path(&self.input)
    }
}

/// Parse a threshold argument (finite, >= 0)
pub fn parse_threshold(arg: &str) -> Result<Threshold> {
    let invalid = |reason| PersistenceError::InvalidThreshold {
        input: arg.to_string(),
        reason,
    };
    let value = arg.trim().parse::<f64>().map_err(|_| invalid("not a number"))?;
    Threshold::new(value).map_err(|_| invalid("threshold must be a finite value >= 0"))
}

/// Outcome of a driver run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output: PathBuf,
    pub samples: usize,
    pub pairs_written: usize,
}

/// Execute the driver for parsed arguments
pub fn run(args: &DriverArgs) -> Result<RunReport> {
    let samples = textfile::read_samples(&args.input)?;
    let engine = Persistence1D::from_samples(&samples)?;
    write_results(&engine, args)
}

/// Write the filtered pairs of a computed engine.
///
/// Results that fail [`Persistence1D::check`] are reported as
/// [`PersistenceError::Inconsistent`] and no output file is written.
pub fn write_results(engine: &Persistence1D, args: &DriverArgs) -> Result<RunReport> {
    engine.check().inspect_err(|e| {
        warn!(input = %args.input.display(), error = %e, "results failed verification");
    })?;

    let pairs = engine.paired_extrema(args.options.threshold, args.options.index_base);
    let output = args.output_path();
    textfile::write_pairs_to_file(&output, &pairs)?;

    info!(
        input = %args.input.display(),
        output = %output.display(),
        pairs = pairs.len(),
        "wrote persistence pairs"
    );

    Ok(RunReport {
        output,
        samples: engine.samples().len(),
        pairs_written: pairs.len(),
    })
}
