//! Method codes and problem assembly

use std::fmt;

use log::{debug, info};
use nalgebra::DVector;

use super::{InputError, InputParameters};
use crate::expression::{ExpressionGrid, ExpressionSystem};
use crate::solver::{
    MultistepSolver, RungeKuttaSolver, Scenario, SimulationResult, Solver, SolverConfiguration,
    SolverError,
};

/// Numerical method selected by the `Method` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodCode {
    /// `1`: explicit Runge-Kutta from `A`, `B`, `C` (classic RK4 when all absent)
    RungeKutta = 1,
    /// `2`
    ForwardEuler = 2,
    /// `3`: `Beta`, or the fixed table for `Number of Steps`
    AdamsBashforth = 3,
    /// `4`: `Beta`, or the fixed table with `Number of Steps` history columns
    AdamsMoulton = 4,
    /// `5`
    BackwardEuler = 5,
    /// `6`: `Alpha`, or the fixed table of order `Number of Steps`
    Bdf = 6,
}

impl MethodCode {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Self::AdamsMoulton | Self::BackwardEuler | Self::Bdf)
    }
}

impl TryFrom<i64> for MethodCode {
    type Error = InputError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::RungeKutta),
            2 => Ok(Self::ForwardEuler),
            3 => Ok(Self::AdamsBashforth),
            4 => Ok(Self::AdamsMoulton),
            5 => Ok(Self::BackwardEuler),
            6 => Ok(Self::Bdf),
            other => Err(InputError::UnknownMethod(other)),
        }
    }
}

impl fmt::Display for MethodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RungeKutta => "Runge-Kutta",
            Self::ForwardEuler => "Forward Euler",
            Self::AdamsBashforth => "Adams-Bashforth",
            Self::AdamsMoulton => "Adams-Moulton",
            Self::BackwardEuler => "Backward Euler",
            Self::Bdf => "BDF",
        };
        write!(f, "{label}")
    }
}

/// A solver with everything it needs to run
pub struct Problem {
    pub solver: Box<dyn Solver>,
    pub scenario: Scenario,
    pub config: SolverConfiguration,
}

impl Problem {
    /// Run the solver over the whole grid
    pub fn run(&self) -> Result<SimulationResult, SolverError> {
        info!(
            "solving {} with {} on [{}, {}], h = {}",
            self.scenario.get_system_name(),
            self.solver.name(),
            self.config.initial_time,
            self.config.final_time,
            self.config.step_size
        );
        self.solver.solve(&self.scenario, &self.config)
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("solver", &self.solver.name())
            .field("scenario", &self.scenario)
            .field("config", &self.config)
            .finish()
    }
}

impl InputParameters {
    pub fn method_code(&self) -> Result<MethodCode, InputError> {
        MethodCode::try_from(self.method)
    }

    /// Build the equation system from the function and derivative grids
    pub fn build_system(&self) -> Result<ExpressionSystem, InputError> {
        if self.function_matrix.len() != self.num_equations {
            return Err(InputError::InvalidValue {
                key: "Function combination".to_string(),
                message: format!(
                    "expected {} rows, got {}",
                    self.num_equations,
                    self.function_matrix.len()
                ),
            });
        }

        let functions = ExpressionGrid::new(&self.function_matrix)?;
        let derivatives = self
            .derivative_matrix
            .as_ref()
            .map(|rows| ExpressionGrid::new(rows))
            .transpose()?;

        Ok(ExpressionSystem::new(functions, derivatives)?)
    }

    pub fn build_config(&self) -> Result<SolverConfiguration, InputError> {
        let config =
            SolverConfiguration::time_evolution(self.initial_time, self.final_time, self.step_size)?
                .with_newton(self.newton);
        config.validate()?;
        Ok(config)
    }

    /// Build the solver named by the method code
    pub fn build_solver(&self) -> Result<Box<dyn Solver>, InputError> {
        let solver: Box<dyn Solver> = match self.method_code()? {
            MethodCode::RungeKutta => Box::new(self.runge_kutta()?),
            MethodCode::ForwardEuler => Box::new(MultistepSolver::forward_euler()),
            MethodCode::AdamsBashforth => Box::new(match &self.beta {
                Some(beta) => MultistepSolver::adams_bashforth_with(beta.clone())?,
                None => MultistepSolver::adams_bashforth(self.num_steps)?,
            }),
            MethodCode::AdamsMoulton => Box::new(match &self.beta {
                Some(beta) => MultistepSolver::adams_moulton(beta.clone())?,
                None => MultistepSolver::adams_moulton_order(self.num_steps + 1)?,
            }),
            MethodCode::BackwardEuler => Box::new(MultistepSolver::backward_euler()),
            MethodCode::Bdf => Box::new(match &self.alpha {
                Some(alpha) => MultistepSolver::bdf(alpha.clone())?,
                None => MultistepSolver::bdf_order(self.num_steps)?,
            }),
        };
        Ok(solver)
    }

    fn runge_kutta(&self) -> Result<RungeKuttaSolver, InputError> {
        match (&self.a, &self.b, &self.c) {
            (None, None, None) => Ok(RungeKuttaSolver::classic_rk4()),
            (Some(a), Some(b), Some(c)) => Ok(RungeKuttaSolver::from_coefficients(
                a.clone(),
                DVector::from_column_slice(b),
                DVector::from_column_slice(c),
            )?),
            (None, _, _) => Err(InputError::MissingKey("A".to_string())),
            (_, None, _) => Err(InputError::MissingKey("B".to_string())),
            (_, _, None) => Err(InputError::MissingKey("C".to_string())),
        }
    }

    /// Assemble solver, scenario and configuration
    ///
    /// A single initial column is extended with RK4 when the method needs
    /// more history.
    pub fn build(&self) -> Result<Problem, InputError> {
        let solver = self.build_solver()?;
        let config = self.build_config()?;
        let system = Box::new(self.build_system()?);

        let needed = solver.history_len();
        let given = self.initial_condition.ncols();
        let scenario = if given == 1 && needed > 1 {
            debug!("{} needs {needed} columns, bootstrapping from one", solver.name());
            let state = self.initial_condition.column(0).into_owned();
            Scenario::bootstrapped(system, &state, &config, needed)?
        } else {
            Scenario::new(system, self.initial_condition.clone())
        };
        scenario.validate()?;

        Ok(Problem { solver, scenario, config })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCALAR_INPUT: &str = "\
Number of equations: 1
Function combination: +1_3_-1 1_2_1
Derivative combination: -1_1_1
Method: 5
Initial Time: 0
Final Time: 2
Step Size: 0.1
Initial Condition: 0
";

    fn with_method(method: &str) -> InputParameters {
        InputParameters::parse(&SCALAR_INPUT.replace("Method: 5", method)).unwrap()
    }

    #[test]
    fn test_method_codes() {
        for code in 1..=6 {
            assert_eq!(MethodCode::try_from(code).unwrap().code(), code);
        }
        assert!(matches!(MethodCode::try_from(0), Err(InputError::UnknownMethod(0))));
        assert!(matches!(MethodCode::try_from(7), Err(InputError::UnknownMethod(7))));
        assert!(MethodCode::Bdf.is_implicit());
        assert!(!MethodCode::AdamsBashforth.is_implicit());
    }

    #[test]
    fn test_backward_euler_problem() {
        let problem = with_method("Method: 5").build().unwrap();
        let result = problem.run().unwrap();

        assert_eq!(result.len(), 21);
        assert_relative_eq!(result.final_state().unwrap()[0], 1.5740877289, epsilon = 1e-4);
    }

    #[test]
    fn test_default_runge_kutta_is_rk4() {
        let problem = with_method("Method: 1").build().unwrap();
        let result = problem.run().unwrap();

        assert_relative_eq!(result.state(1).unwrap()[0], 0.1945236136, epsilon = 1e-6);
        assert_relative_eq!(result.final_state().unwrap()[0], 1.6057419589, epsilon = 1e-6);
    }

    #[test]
    fn test_partial_tableau_rejected() {
        let mut params = with_method("Method: 1");
        params.b = Some(vec![1.0]);
        assert!(matches!(params.build_solver(), Err(InputError::MissingKey(key)) if key == "A"));
    }

    #[test]
    fn test_single_column_is_bootstrapped() {
        let problem = with_method("Method: 6\nNumber of Steps: 3").build().unwrap();

        assert_eq!(problem.solver.history_len(), 3);
        assert_eq!(problem.scenario.seed_columns(), 3);
        assert!(problem.run().is_ok());
    }

    #[test]
    fn test_unknown_method() {
        let params = with_method("Method: 9");
        assert!(matches!(params.build(), Err(InputError::UnknownMethod(9))));
    }

    #[test]
    fn test_row_count_checked() {
        let mut params = with_method("Method: 2");
        params.num_equations = 2;
        assert!(matches!(params.build_system(), Err(InputError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_step_size() {
        let text = SCALAR_INPUT.replace("Step Size: 0.1", "Step Size: -0.1");
        let params = InputParameters::parse(&text).unwrap();
        assert!(matches!(params.build(), Err(InputError::Solver(_))));
    }
}
