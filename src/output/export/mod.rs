//! Export of simulation results to files
//!
//! # Architecture
//!
//! The [`Exporter`] trait abstracts the file format. Each format is an
//! independent implementation in its own sub-module.
//!
//! # Available formats
//!
//! | Format  | Module  |
//! |---------|---------|
//! | CSV     | [`csv`] |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use ode_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//!
//! // Every time point
//! exporter.export(&result, None, "run.csv".as_ref())?;
//!
//! // Downsampled to 500 points
//! exporter.export(&result, Some(500), "run_light.csv".as_ref())?;
//!
//! // Labelled components
//! exporter.export_named(&result, None, &["x", "v"], "oscillator.csv".as_ref())?;
//! ```

pub mod csv;

pub use csv::{export_result_csv, CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::solver::SimulationResult;

/// Abstraction trait for all export formats
///
/// # Parameter `n_points`
///
/// - `None`: exports every time point
/// - `Some(n)`: uniformly downsamples to `n` points, the first and last
///   points are always kept
pub trait Exporter {
    /// Error type specific to this export format
    type Error: std::error::Error;

    /// Export with generated component names
    fn export(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Export with one name per state component
    fn export_named(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        names: &[&str],
        path: &Path,
    ) -> Result<(), Self::Error>;
}

/// Column indices kept when downsampling `len` columns to `n_points`
pub(crate) fn sample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n < len && len > 1 => {
            let n = n.max(2);
            let mut indices: Vec<usize> = (0..n)
                .map(|i| ((i * (len - 1)) as f64 / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        _ => (0..len).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(5, None), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample_indices(5, Some(10)), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample_indices(11, Some(3)), vec![0, 5, 10]);
        assert_eq!(sample_indices(11, Some(1)), vec![0, 10]);
        assert_eq!(sample_indices(1, Some(1)), vec![0]);
    }
}
