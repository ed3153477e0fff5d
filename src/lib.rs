//! # persistence1d - Topological persistence for 1D data
//!
//! Finds the local minima and maxima of an ordered sequence of samples and
//! ranks them by *persistence*: every extremum is paired with an extremum of
//! the opposite kind such that smoothing away the pair changes the signal by
//! the least amount, and that amount is the pair's persistence. Filtering by a
//! persistence threshold keeps the strong features and drops noise.
//!
//! ## Quick Start
//!
//! ```rust
//! use persistence1d::prelude::*;
//!
//! let mut engine = Persistence1D::new();
//! engine.compute(&[2.0, 5.0, 7.0, -12.0, -13.0, -7.0, 10.0, 18.0, 6.0, 8.0, 7.0, 4.0])?;
//!
//! // Most persistent pairs first
//! let threshold = Threshold::new(10.0)?;
//! let pairs = engine.paired_extrema(threshold, IndexBase::Zero);
//! assert_eq!(pairs.len(), 1);
//! assert_eq!((pairs[0].min_index, pairs[0].max_index), (11, 7));
//!
//! // The global minimum is never paired
//! assert_eq!(engine.global_minimum_index(IndexBase::Zero), 4);
//! assert!(engine.verify());
//! # Ok::<(), persistence1d::PersistenceError>(())
//! ```

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod cli;
pub mod extrema;
pub mod pairing;
pub mod regions;
pub mod textfile;

pub mod prelude {
    pub use crate::{
        // Driver
        cli::DriverArgs,
        // Engine
        Persistence1D,
        PersistenceColumns,
        RunState,
        Summary,
        // Types
        Extremum,
        ExtremumKind,
        GlobalMinimum,
        IndexBase,
        PairedExtrema,
        QueryOptions,
        Threshold,
        // Errors
        PersistenceError,
        Result,
        UNDEFINED_INDEX,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors raised by the engine and the text driver
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Non-finite sample at index {index}: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    #[error("Inconsistent result: {0}")]
    Inconsistent(String),

    #[error("Cannot parse line {line} as a number: {content:?}")]
    Parse { line: usize, content: String },

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error("Invalid threshold {input:?}: {reason}")]
    InvalidThreshold { input: String, reason: &'static str },
}

impl PersistenceError {
    /// Process exit status for the text driver, one per failure category
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::InvalidValue(_) => 1,
            Self::InvalidThreshold { .. } | Self::OutOfRange { .. } => 2,
            Self::Read { .. } | Self::Parse { .. } | Self::NonFiniteSample { .. } => 3,
            Self::Write { .. } => 4,
            Self::Inconsistent(_) => 5,
        }
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Persistence threshold (finite, >= 0). Pairs pass when `persistence > threshold`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Keeps every pair with non-zero persistence
    pub const ZERO: Self = Self(0.0);

    /// Create a new Threshold, validating the value is finite and >= 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PersistenceError::InvalidValue(
                "Threshold cannot be NaN or infinite",
            ));
        }
        if value < 0.0 {
            return Err(PersistenceError::OutOfRange {
                field: "Threshold",
                value,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Strict comparison: a pair exactly at the threshold is dropped
    #[inline]
    pub fn passes(self, persistence: f64) -> bool {
        persistence > self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = PersistenceError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl Serialize for Threshold {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Threshold::new(value).map_err(serde::de::Error::custom)
    }
}

/// Index convention of reported positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexBase {
    /// Rust slice positions
    #[default]
    Zero,
    /// Matlab-style, every index shifted by one
    One,
}

impl IndexBase {
    #[inline]
    pub fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }

    #[inline]
    pub fn apply(self, index: usize) -> usize {
        index + self.offset()
    }
}

/// Query configuration shared by the driver and bindings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub threshold: Threshold,
    pub index_base: IndexBase,
}

// ============================================================
// RESULT TYPES
// ============================================================

/// Reported in place of an index when no global minimum exists
pub const UNDEFINED_INDEX: i64 = -1;

/// Kind of local extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremumKind {
    Minimum,
    Maximum,
}

/// A detected local extremum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub value: f64,
    pub kind: ExtremumKind,
}

/// A minimum and a maximum that cancel out when the signal is smoothed by
/// `persistence`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedExtrema {
    pub min_index: usize,
    pub max_index: usize,
    /// `|value(max_index) - value(min_index)|`
    pub persistence: f64,
}

impl PairedExtrema {
    #[inline]
    pub fn rebased(self, base: IndexBase) -> Self {
        Self {
            min_index: base.apply(self.min_index),
            max_index: base.apply(self.max_index),
            persistence: self.persistence,
        }
    }
}

/// The overall lowest sample, left unpaired by the merge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalMinimum {
    pub index: usize,
    pub value: f64,
}

/// Column layout for binding layers: parallel vectors plus the global minimum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceColumns {
    pub min_indices: Vec<usize>,
    pub max_indices: Vec<usize>,
    pub persistence: Vec<f64>,
    /// [`UNDEFINED_INDEX`] when the run had no samples
    pub global_min_index: i64,
    pub global_min_value: f64,
}

// ============================================================
// RUN STATE
// ============================================================

/// Everything one run produced. Built in full, then swapped in by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    samples: Vec<f64>,
    extrema: Vec<Extremum>,
    /// Most persistent first, see [`pairing::sort_pairs`]
    pairs: Vec<PairedExtrema>,
    global_minimum: Option<GlobalMinimum>,
}

impl RunState {
    /// Detect and pair the extrema of `samples`. Non-finite samples are rejected.
    pub fn compute(samples: &[f64]) -> Result<Self> {
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PersistenceError::NonFiniteSample { index, value });
        }

        let samples = samples.to_vec();
        let extrema = extrema::detect(&samples);

        // Fewer than three samples: nothing to pair, the lowest one anchors
        let pairing = if extrema.is_empty() {
            pairing::Pairing {
                pairs: Vec::new(),
                global_minimum: extrema::lowest_sample(&samples).map(|index| GlobalMinimum {
                    index,
                    value: samples[index],
                }),
            }
        } else {
            pairing::pair_extrema(&samples, &extrema)
        };

        Ok(Self {
            samples,
            extrema,
            pairs: pairing.pairs,
            global_minimum: pairing.global_minimum,
        })
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[inline]
    pub fn extrema(&self) -> &[Extremum] {
        &self.extrema
    }

    #[inline]
    pub fn pairs(&self) -> &[PairedExtrema] {
        &self.pairs
    }

    #[inline]
    pub fn global_minimum(&self) -> Option<GlobalMinimum> {
        self.global_minimum
    }

    /// Pairs with `persistence > threshold`; a prefix because pairs are sorted
    #[inline]
    pub fn passing(&self, threshold: Threshold) -> &[PairedExtrema] {
        let count = self
            .pairs
            .partition_point(|p| threshold.passes(p.persistence));
        &self.pairs[..count]
    }
}

// ============================================================
// ENGINE
// ============================================================

/// Persistence engine holding the results of the latest run.
///
/// Every query is valid before the first run and then behaves as on empty
/// input. A new [`compute`](Self::compute) replaces the previous results.
#[derive(Debug, Clone, Default)]
pub struct Persistence1D {
    state: RunState,
    ready: bool,
}

impl Persistence1D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine and run it once
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        let mut engine = Self::new();
        engine.compute(samples)?;
        Ok(engine)
    }

    /// Run the full computation on `samples`, replacing the previous results.
    ///
    /// Empty input is legal. On error the previous results are kept.
    pub fn compute(&mut self, samples: &[f64]) -> Result<()> {
        let state = RunState::compute(samples).inspect_err(|e| {
            warn!(error = %e, samples = samples.len(), "rejected persistence input");
        })?;

        debug!(
            samples = state.samples.len(),
            extrema = state.extrema.len(),
            pairs = state.pairs.len(),
            "persistence run complete"
        );

        self.state = state;
        self.ready = true;
        Ok(())
    }

    /// True once a run has completed
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        self.state.samples()
    }

    /// All detected extrema ordered by index, the global minimum included
    #[inline]
    pub fn extrema(&self) -> &[Extremum] {
        self.state.extrema()
    }

    // ===========================================
    // Queries
    // ===========================================

    /// Pairs with `persistence > threshold`, most persistent first.
    ///
    /// The comparison is strict even at [`Threshold::ZERO`], so pairs of zero
    /// persistence (a flat shoulder such as `[1, 1, 0]`) are never returned and
    /// the result may hold fewer than `(extrema().len() - 1) / 2` pairs. The
    /// unfiltered list is [`RunState::pairs`].
    pub fn paired_extrema(&self, threshold: Threshold, base: IndexBase) -> Vec<PairedExtrema> {
        self.state
            .passing(threshold)
            .iter()
            .map(|p| p.rebased(base))
            .collect()
    }

    /// Minima and maxima indices of the filtered pairs, in pair order
    pub fn extrema_indices(&self, threshold: Threshold, base: IndexBase) -> (Vec<usize>, Vec<usize>) {
        self.state
            .passing(threshold)
            .iter()
            .map(|p| (base.apply(p.min_index), base.apply(p.max_index)))
            .unzip()
    }

    #[inline]
    pub fn global_minimum(&self) -> Option<GlobalMinimum> {
        self.state.global_minimum()
    }

    /// Index of the global minimum, or [`UNDEFINED_INDEX`] (never shifted)
    pub fn global_minimum_index(&self, base: IndexBase) -> i64 {
        self.global_minimum()
            .map_or(UNDEFINED_INDEX, |g| base.apply(g.index) as i64)
    }

    /// Value of the global minimum, 0 when undefined
    pub fn global_minimum_value(&self) -> f64 {
        self.global_minimum().map_or(0.0, |g| g.value)
    }

    /// Export filtered results as parallel columns
    pub fn columns(&self, threshold: Threshold, base: IndexBase) -> PersistenceColumns {
        let passing = self.state.passing(threshold);
        let (min_indices, max_indices) = self.extrema_indices(threshold, base);
        PersistenceColumns {
            min_indices,
            max_indices,
            persistence: passing.iter().map(|p| p.persistence).collect(),
            global_min_index: self.global_minimum_index(base),
            global_min_value: self.global_minimum_value(),
        }
    }

    // ===========================================
    // Verification
    // ===========================================

    /// Cross-check the results against the stored samples
    pub fn check(&self) -> Result<()> {
        let state = &self.state;
        let samples = state.samples();
        let len = samples.len();

        let fail = |msg: String| Err(PersistenceError::Inconsistent(msg));

        let mut kind_at: Vec<Option<ExtremumKind>> = vec![None; len];
        for e in state.extrema() {
            if e.index >= len {
                return fail(format!("extremum index {} out of range {len}", e.index));
            }
            if samples[e.index] != e.value {
                return fail(format!("extremum {} does not match its sample", e.index));
            }
            kind_at[e.index] = Some(e.kind);
        }

        match (state.global_minimum(), extrema::lowest_sample(samples)) {
            (None, None) => {}
            (Some(g), None) => {
                return fail(format!("global minimum {} recorded for empty input", g.index));
            }
            (None, Some(_)) => return fail("global minimum missing".to_string()),
            (Some(g), Some(lowest)) => {
                if g.index >= len {
                    return fail(format!("global minimum index {} out of range {len}", g.index));
                }
                if samples[g.index] != g.value || g.value != samples[lowest] {
                    return fail(format!(
                        "global minimum {} is not the lowest sample {lowest}",
                        g.index
                    ));
                }
                if !state.extrema().is_empty() && kind_at[g.index] != Some(ExtremumKind::Minimum) {
                    return fail(format!("global minimum {} is not a detected minimum", g.index));
                }
            }
        }

        let extrema_count = state.extrema().len();
        if extrema_count > 0 && state.pairs().len() * 2 + 1 != extrema_count {
            return fail(format!(
                "{} pairs for {extrema_count} extrema",
                state.pairs().len()
            ));
        }

        let mut used = vec![false; len];
        if let Some(g) = state.global_minimum() {
            used[g.index] = true;
        }

        for p in state.pairs() {
            if p.min_index >= len || p.max_index >= len {
                return fail(format!(
                    "pair ({}, {}) out of range {len}",
                    p.min_index, p.max_index
                ));
            }
            if kind_at[p.min_index] != Some(ExtremumKind::Minimum) {
                return fail(format!("pair minimum {} is not a minimum", p.min_index));
            }
            if kind_at[p.max_index] != Some(ExtremumKind::Maximum) {
                return fail(format!("pair maximum {} is not a maximum", p.max_index));
            }

            let expected = (samples[p.max_index] - samples[p.min_index]).abs();
            if p.persistence.is_sign_negative() || p.persistence != expected {
                return fail(format!(
                    "pair ({}, {}) persistence {} != {expected}",
                    p.min_index, p.max_index, p.persistence
                ));
            }

            for index in [p.min_index, p.max_index] {
                if used[index] {
                    return fail(format!("index {index} used twice"));
                }
                used[index] = true;
            }
        }

        if !pairing::is_sorted(state.pairs()) {
            return fail("pairs are not in persistence order".to_string());
        }

        Ok(())
    }

    /// Run [`check`](Self::check) and report only whether it passed
    pub fn verify(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "persistence results failed verification");
                false
            }
        }
    }

    // ===========================================
    // Printing
    // ===========================================

    /// Text rendering of the filtered pairs and the global minimum
    pub fn summary(&self, threshold: Threshold) -> Summary<'_> {
        Summary {
            pairs: self.state.passing(threshold),
            global_min_index: self.global_minimum_index(IndexBase::Zero),
            global_min_value: self.global_minimum_value(),
        }
    }

    /// Write [`summary`](Self::summary) to `sink`
    pub fn print_summary<W: io::Write>(&self, threshold: Threshold, mut sink: W) -> io::Result<()> {
        write!(sink, "{}", self.summary(threshold))
    }
}

/// Printable view over filtered results. The global minimum is always shown.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pairs: &'a [PairedExtrema],
    global_min_index: i64,
    global_min_value: f64,
}

impl std::fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for p in self.pairs {
            writeln!(
                f,
                "Persistence: {}, minimum index: {}, maximum index: {}",
                p.persistence, p.min_index, p.max_index
            )?;
        }
        writeln!(
            f,
            "Global minimum value: {}, index: {}",
            self.global_min_value, self.global_min_index
        )
    }
}

// ============================================================
// TESTS
// ============================================================
