//! Simulation scenario definition
//!
//! A scenario pairs a system of equations with the seed columns of the
//! approximation table.
use nalgebra::{DMatrix, DVector};

use crate::expression::OdeSystem;
use crate::solver::SolverError;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - System of equations `dy/dt = f(t, y)`
/// - Initial condition: one column per seed state, oldest first
///
/// # Design
///
/// The same scenario can be solved with different numerical methods as
/// long as the number of seed columns matches the method's history length.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust,ignore
/// // Single initial state, usable by one-step methods
/// let scenario = Scenario::from_state(Box::new(system), state);
///
/// // Three seed columns for a 3-step Adams-Bashforth method
/// let scenario = Scenario::new(Box::new(system), seeds);
/// let result = MultistepSolver::adams_bashforth(3)?.solve(&scenario, &config)?;
/// ```
pub struct Scenario {
    /// System of equations
    pub system: Box<dyn OdeSystem>,

    /// Seed columns (rows = equations)
    pub initial_condition: DMatrix<f64>,
}

impl Scenario {
    /// Create a scenario
    pub fn new(system: Box<dyn OdeSystem>, initial_condition: DMatrix<f64>) -> Self {
        Self { system, initial_condition }
    }

    /// Create a scenario seeded with a single state
    pub fn from_state(system: Box<dyn OdeSystem>, state: DVector<f64>) -> Self {
        let n = state.len();
        Self::new(system, DMatrix::from_column_slice(n, 1, state.as_slice()))
    }

    /// Check the initial condition against the system
    pub fn validate(&self) -> Result<(), SolverError> {
        let n = self.system.dimension();

        if n == 0 {
            return Err(SolverError::invalid("system has no equations"));
        }
        if self.initial_condition.nrows() != n {
            return Err(SolverError::invalid(format!(
                "initial condition has {} rows, system has {n} equations",
                self.initial_condition.nrows()
            )));
        }
        if self.initial_condition.ncols() == 0 {
            return Err(SolverError::invalid("initial condition has no columns"));
        }
        if self.initial_condition.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::invalid("initial condition contains NaN or Inf"));
        }

        Ok(())
    }

    /// Get system name
    pub fn get_system_name(&self) -> &str {
        self.system.name()
    }

    /// Number of equations
    pub fn dimension(&self) -> usize {
        self.system.dimension()
    }

    /// Number of seed columns
    pub fn seed_columns(&self) -> usize {
        self.initial_condition.ncols()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_system_name())
            .field("dimension", &self.dimension())
            .field("seed columns", &self.seed_columns())
            .field("initial condition", &self.initial_condition)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
