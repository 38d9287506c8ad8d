//! Approximation table
//!
//! The table is the single piece of state a solve owns. It is allocated
//! once with one column per time point, seeded from the scenario, and then
//! extended one column at a time. Columns are never rewritten, so a scheme
//! can only read what it has already produced.

use nalgebra::{DMatrix, DVector};

use crate::solver::{SimulationResult, SolverConfiguration, SolverError};

/// Growing column-indexed table of states
#[derive(Debug, Clone)]
pub struct ApproximationTable {
    values: DMatrix<f64>,
    filled: usize,
    initial_time: f64,
    step_size: f64,
}

impl ApproximationTable {
    /// Allocate the table for `config` and copy the seed columns
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidArgument`] when the grid has fewer columns than
    /// there are seeds.
    pub fn new(config: &SolverConfiguration, seeds: &DMatrix<f64>) -> Result<Self, SolverError> {
        let columns = config.column_count();
        let k = seeds.ncols();

        if k > columns {
            return Err(SolverError::invalid(format!(
                "{k} seed columns do not fit in a time grid of {columns} columns"
            )));
        }

        let mut values = DMatrix::zeros(seeds.nrows(), columns);
        values.columns_mut(0, k).copy_from(seeds);

        Ok(Self {
            values,
            filled: k,
            initial_time: config.initial_time,
            step_size: config.step_size,
        })
    }

    /// Number of equations
    pub fn dimension(&self) -> usize {
        self.values.nrows()
    }

    /// Total number of columns
    pub fn capacity(&self) -> usize {
        self.values.ncols()
    }

    /// Number of columns written so far
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.capacity()
    }

    /// Index of the next column to compute
    pub fn next_index(&self) -> Option<usize> {
        (!self.is_complete()).then_some(self.filled)
    }

    /// Time of column `index`
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.initial_time + index as f64 * self.step_size
    }

    /// Copy of a filled column
    ///
    /// # Panics
    ///
    /// When column `index` has not been written yet.
    #[track_caller]
    pub fn state(&self, index: usize) -> DVector<f64> {
        assert!(index < self.filled, "column {index} read before being written");
        self.values.column(index).into_owned()
    }

    /// Most recently written column
    #[track_caller]
    pub fn last_state(&self) -> DVector<f64> {
        self.state(self.filled.saturating_sub(1))
    }

    /// Append the next column
    ///
    /// # Errors
    ///
    /// - [`SolverError::NonFinite`] when the state holds NaN or Inf
    /// - [`SolverError::InvalidArgument`] when the table is already full or
    ///   the state has the wrong size
    pub fn push(&mut self, state: &DVector<f64>) -> Result<(), SolverError> {
        let Some(index) = self.next_index() else {
            return Err(SolverError::invalid("approximation table is already full"));
        };

        if state.len() != self.dimension() {
            return Err(SolverError::invalid(format!(
                "state has {} components, table has {} rows",
                state.len(),
                self.dimension()
            )));
        }

        if state.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFinite {
                column: index,
                time: self.time_at(index),
            });
        }

        self.values.set_column(index, state);
        self.filled += 1;
        Ok(())
    }

    /// Hand the table over as a result
    pub fn into_result(self) -> SimulationResult {
        let time_points = (0..self.capacity()).map(|i| self.time_at(i)).collect();
        SimulationResult::new(time_points, self.values)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
