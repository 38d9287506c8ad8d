//! Seed columns for multistep methods
//!
//! A `k`-step method cannot start from a single initial state. This module
//! builds the missing columns with classical RK4, whose fourth-order
//! accuracy does not degrade the multistep methods provided here.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::expression::OdeSystem;
use crate::solver::methods::runge_kutta::ButcherTableau;
use crate::solver::{Scenario, SolverConfiguration, SolverError};

/// Build `columns` seed columns starting from `initial_state`
///
/// Column 0 is `initial_state`, column `i` is RK4 advanced `i` steps on
/// the grid of `config`.
///
/// # Errors
///
/// [`SolverError::InvalidArgument`] when `columns` is zero or exceeds the
/// grid, evaluation errors from the system otherwise.
pub fn bootstrap_history(
    system: &dyn OdeSystem,
    initial_state: &DVector<f64>,
    config: &SolverConfiguration,
    columns: usize,
) -> Result<DMatrix<f64>, SolverError> {
    if columns == 0 {
        return Err(SolverError::invalid("at least one seed column is required"));
    }
    if columns > config.column_count() {
        return Err(SolverError::invalid(format!(
            "{columns} seed columns do not fit in a time grid of {} columns",
            config.column_count()
        )));
    }

    let tableau = ButcherTableau::classic_rk4();
    let mut seeds = DMatrix::zeros(initial_state.len(), columns);
    seeds.set_column(0, initial_state);

    let mut state = initial_state.clone();
    for i in 1..columns {
        state = tableau.step(system, config.time_at(i - 1), &state, config.step_size)?;
        if state.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFinite { column: i, time: config.time_at(i) });
        }
        seeds.set_column(i, &state);
    }

    debug!("bootstrapped {columns} seed columns for {} with RK4", system.name());
    Ok(seeds)
}

impl Scenario {
    /// Create a scenario whose first `columns` seed columns are generated
    /// from `initial_state` with RK4
    ///
    /// # Example
    ///
    /// ```rust
    /// use ode_rs::expression::ExpressionSystem;
    /// use ode_rs::solver::{MultistepSolver, Scenario, Solver, SolverConfiguration};
    /// use nalgebra::DVector;
    ///
    /// let system = ExpressionSystem::from_strs(&[&["0", "-1_6_1"]], None).unwrap();
    /// let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1).unwrap();
    /// let ab4 = MultistepSolver::adams_bashforth(4).unwrap();
    ///
    /// let scenario = Scenario::bootstrapped(
    ///     Box::new(system),
    ///     &DVector::from_vec(vec![1.0]),
    ///     &config,
    ///     ab4.history_len(),
    /// ).unwrap();
    ///
    /// let result = ab4.solve(&scenario, &config).unwrap();
    /// assert!((result.final_state().unwrap()[0] - (-1.0f64).exp()).abs() < 1e-4);
    /// ```
    pub fn bootstrapped(
        system: Box<dyn OdeSystem>,
        initial_state: &DVector<f64>,
        config: &SolverConfiguration,
        columns: usize,
    ) -> Result<Self, SolverError> {
        if initial_state.len() != system.dimension() {
            return Err(SolverError::invalid(format!(
                "initial state has {} components, system has {} equations",
                initial_state.len(),
                system.dimension()
            )));
        }
        let seeds = bootstrap_history(system.as_ref(), initial_state, config, columns)?;
        Ok(Self::new(system, seeds))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ExpressionSystem;
    use approx::assert_relative_eq;

    fn decay() -> ExpressionSystem {
        // y' = -y
        ExpressionSystem::from_strs(&[&["0", "-1_6_1"]], None).unwrap()
    }

    #[test]
    fn test_bootstrap_columns_follow_exact_solution() {
        let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1).unwrap();
        let seeds = bootstrap_history(&decay(), &DVector::from_vec(vec![1.0]), &config, 4).unwrap();

        assert_eq!(seeds.ncols(), 4);
        assert_eq!(seeds[(0, 0)], 1.0);
        for i in 1..4 {
            assert_relative_eq!(seeds[(0, i)], (-0.1 * i as f64).exp(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bootstrap_bounds() {
        let config = SolverConfiguration::time_evolution(0.0, 0.2, 0.1).unwrap();
        let y0 = DVector::from_vec(vec![1.0]);

        assert!(bootstrap_history(&decay(), &y0, &config, 0).is_err());
        assert!(bootstrap_history(&decay(), &y0, &config, 4).is_err());
        assert!(bootstrap_history(&decay(), &y0, &config, 3).is_ok());
    }

    #[test]
    fn test_bootstrapped_scenario_dimension_checked() {
        let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1).unwrap();
        let result = Scenario::bootstrapped(Box::new(decay()), &DVector::zeros(2), &config, 2);
        assert!(result.is_err());
    }
}
