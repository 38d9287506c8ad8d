//! CSV export of approximation tables
//!
//! One row per time point, the time first and then every state component.
//! The output opens in spreadsheets, pandas or any plotting tool.
//!
//! # Quick Examples
//!
//! ## Minimal Export
//!
//! ```rust,ignore
//! use ode_rs::output::export::{CsvExporter, Exporter};
//!
//! CsvExporter::default().export(&result, None, "trajectory.csv".as_ref())?;
//! ```
//!
//! **Output** (`trajectory.csv`):
//! ```csv
//! time,y1,y2
//! 0.000000,1.000000,0.000000
//! 0.100000,1.000000,-0.100000
//! ...
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! use ode_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
//! CsvExporter::new(config).export(&result, None, "trajectory.csv".as_ref())?;
//! ```
//!
//! **Output**:
//! ```csv
//! # ODE Simulation Data
//! # Generated: 2026-10-19T15:30:00+00:00
//! # System: Expression System
//! # Solver: Backward Euler
//! # Interval: [0, 1]
//! # Step Size: 0.1
//! # Time Points: 11
//! #
//! time,y1,y2
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use super::{sample_indices, Exporter};
use crate::solver::SimulationResult;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("empty data: the result has no time point")]
    EmptyResult,

    #[error("data length mismatch: {time_points} time points for {columns} columns")]
    LengthMismatch { time_points: usize, columns: usize },

    #[error("{expected} component names expected, got {got}")]
    NameMismatch { expected: usize, got: usize },

    #[error("invalid data: NaN or Inf at column {0}")]
    NonFinite(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use ode_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(10);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "time")
    pub time_header: String,

    /// Prefix of the component headers when no names are given (default: "y")
    pub component_prefix: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "time".to_string(),
            component_prefix: "y".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter and comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// 12 decimal places
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only the fields that are set are written.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    pub system_name: Option<String>,
    pub solver_name: Option<String>,
    pub initial_time: Option<f64>,
    pub final_time: Option<f64>,
    pub step_size: Option<f64>,
    pub time_points: Option<usize>,

    /// Additional `key: value` lines
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect what a solver recorded in its result
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            system_name: result.metadata("system").map(str::to_string),
            solver_name: result.metadata("solver").map(str::to_string),
            initial_time: result.time_points.first().copied(),
            final_time: result.time_points.last().copied(),
            step_size: result.metadata("step size").and_then(|h| h.parse().ok()),
            time_points: Some(result.len()),
            custom: Vec::new(),
        }
    }

    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# ODE Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(system) = &metadata.system_name {
        writeln!(out, "# System: {system}")?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {solver}")?;
    }
    if let (Some(t0), Some(tf)) = (metadata.initial_time, metadata.final_time) {
        writeln!(out, "# Interval: [{t0}, {tf}]")?;
    }
    if let Some(h) = metadata.step_size {
        writeln!(out, "# Step Size: {h}")?;
    }
    if let Some(count) = metadata.time_points {
        writeln!(out, "# Time Points: {count}")?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {key}: {value}")?;
    }

    writeln!(out, "#")
}

fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

fn validate(result: &SimulationResult) -> Result<(), CsvError> {
    if result.is_empty() {
        return Err(CsvError::EmptyResult);
    }
    if result.time_points.len() != result.len() {
        return Err(CsvError::LengthMismatch {
            time_points: result.time_points.len(),
            columns: result.len(),
        });
    }
    for (index, column) in result.approximations.column_iter().enumerate() {
        if !result.time_points[index].is_finite() || column.iter().any(|v| !v.is_finite()) {
            return Err(CsvError::NonFinite(index));
        }
    }
    Ok(())
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Clone, Debug, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Write `result` to any writer
    ///
    /// `names` labels the state components, `y1..yn` by default.
    pub fn write<W: Write>(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        names: Option<&[&str]>,
        out: &mut W,
    ) -> Result<(), CsvError> {
        validate(result)?;

        let dimension = result.dimension();
        if let Some(names) = names
            && names.len() != dimension
        {
            return Err(CsvError::NameMismatch { expected: dimension, got: names.len() });
        }

        let config = &self.config;

        // ====== Metadata ======

        if config.include_metadata
            && let Some(metadata) = &config.metadata
        {
            write_metadata_header(out, metadata)?;
        }

        // ====== Header ======

        let mut header = vec![config.time_header.clone()];
        match names {
            Some(names) => header.extend(names.iter().map(|name| name.to_string())),
            None => header.extend((1..=dimension).map(|i| format!("{}{i}", config.component_prefix))),
        }
        writeln!(out, "{}", header.join(config.delimiter.to_string().as_str()))?;

        // ====== Data ======

        for index in sample_indices(result.len(), n_points) {
            write!(out, "{}", format_number(result.time_points[index], config))?;
            for value in result.approximations.column(index).iter() {
                write!(out, "{}{}", config.delimiter, format_number(*value, config))?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn write_file(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        names: Option<&[&str]>,
        path: &Path,
    ) -> Result<(), CsvError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(result, n_points, names, &mut out)?;
        out.flush()?;
        debug!("exported {} time points to {}", result.len(), path.display());
        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error> {
        self.write_file(result, n_points, None, path)
    }

    fn export_named(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        names: &[&str],
        path: &Path,
    ) -> Result<(), Self::Error> {
        self.write_file(result, n_points, Some(names), path)
    }
}

/// Export `result` with an optional configuration
pub fn export_result_csv(
    result: &SimulationResult,
    path: impl AsRef<Path>,
    config: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let exporter = CsvExporter::new(config.cloned().unwrap_or_default());
    exporter.export(result, None, path.as_ref())
}

// =================================================================================================
// Tests
// =================================================================================================
