//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - `Solver`: one trait for every time-stepping scheme
//! - `SolverConfiguration`: the time grid and Newton settings (HOW to solve)
//! - `SimulationResult`: the filled approximation table plus metadata
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: the only entry point used by drivers and tests
//! - Core structures: fields are public and won't be removed

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::solver::newton::NewtonSettings;
use crate::solver::{Scenario, SolverError};

// =================================================================================================
// Solver trait
// =================================================================================================

/// Fixed-step time integrator
///
/// A solver is immutable: its coefficients are fixed at construction and a
/// single instance can run any number of independent solves.
///
/// # Contract
///
/// `solve` must:
/// 1. validate the configuration and the scenario
/// 2. check that the scenario supplies exactly `history_len()` seed columns
/// 3. fill the remaining columns left to right
/// 4. return the whole table, seed columns included
pub trait Solver {
    /// Integrate `scenario` over the time grid of `config`
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SolverError>;

    /// Human-readable method name
    fn name(&self) -> &str;

    /// Number of seed columns the scheme needs before its first step
    fn history_len(&self) -> usize;
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Default upper bound on the number of table columns
pub const DEFAULT_MAX_COLUMNS: usize = 10_000_000;

/// Time grid and nonlinear-solver settings
///
/// The grid has `floor((final_time - initial_time) / step_size) + 1`
/// columns, column `i` sitting at `initial_time + i·step_size`. The final
/// time is only reached when the interval is a multiple of the step.
///
/// # Example
///
/// ```rust
/// use ode_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1).unwrap();
/// assert_eq!(config.column_count(), 11);
///
/// assert!(SolverConfiguration::time_evolution(1.0, 0.0, 0.1).is_err());
/// assert!(SolverConfiguration::time_evolution(0.0, 1.0, 0.0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Start of the interval
    pub initial_time: f64,

    /// End of the interval
    pub final_time: f64,

    /// Fixed step size
    pub step_size: f64,

    /// Settings of the Newton iteration used by implicit schemes
    pub newton: NewtonSettings,

    /// Refuse grids with more columns than this
    pub max_columns: usize,
}

impl SolverConfiguration {
    /// Create a validated time-evolution configuration
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidArgument`] when `step_size <= 0`,
    /// `initial_time >= final_time` or a value is not finite.
    pub fn time_evolution(
        initial_time: f64,
        final_time: f64,
        step_size: f64,
    ) -> Result<Self, SolverError> {
        let config = Self {
            initial_time,
            final_time,
            step_size,
            newton: NewtonSettings::default(),
            max_columns: DEFAULT_MAX_COLUMNS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder pattern: set Newton settings
    pub fn with_newton(mut self, newton: NewtonSettings) -> Self {
        self.newton = newton;
        self
    }

    /// Builder pattern: set the column limit
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.initial_time.is_finite() || !self.final_time.is_finite() {
            return Err(SolverError::invalid("initial and final time must be finite"));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(SolverError::invalid(format!(
                "step size must be positive, got {}",
                self.step_size
            )));
        }
        if self.initial_time >= self.final_time {
            return Err(SolverError::invalid(format!(
                "initial time {} must be smaller than final time {}",
                self.initial_time, self.final_time
            )));
        }

        let intervals = ((self.final_time - self.initial_time) / self.step_size).floor();
        if intervals + 1.0 > self.max_columns as f64 {
            return Err(SolverError::invalid(format!(
                "time grid needs {} columns, limit is {}",
                intervals + 1.0,
                self.max_columns
            )));
        }

        self.newton.validate()
    }

    /// Number of columns of the approximation table
    pub fn column_count(&self) -> usize {
        ((self.final_time - self.initial_time) / self.step_size).floor() as usize + 1
    }

    /// Time of column `index`
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.initial_time + index as f64 * self.step_size
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Filled approximation table
///
/// Column `i` of `approximations` is the state at `time_points[i]`.
/// Metadata holds free-form solver information (name, step size,
/// Newton iteration count...).
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Time of every column
    pub time_points: Vec<f64>,

    /// One column per time point, one row per equation
    pub approximations: DMatrix<f64>,

    /// Solver information
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(time_points: Vec<f64>, approximations: DMatrix<f64>) -> Self {
        Self {
            time_points,
            approximations,
            metadata: HashMap::new(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.approximations.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of equations
    pub fn dimension(&self) -> usize {
        self.approximations.nrows()
    }

    /// State at column `index`
    pub fn state(&self, index: usize) -> Option<DVector<f64>> {
        (index < self.len()).then(|| self.approximations.column(index).into_owned())
    }

    /// State at the last column
    pub fn final_state(&self) -> Option<DVector<f64>> {
        self.len().checked_sub(1).and_then(|last| self.state(last))
    }

    /// Time series of one state component
    pub fn component(&self, row: usize) -> Option<Vec<f64>> {
        (row < self.dimension()).then(|| self.approximations.row(row).iter().copied().collect())
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
