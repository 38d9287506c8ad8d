//! Newton root-finder for implicit steps
//!
//! # Mathematical Background
//!
//! Every implicit step reduces to a nonlinear equation `F(y) = 0` for the
//! new column. Two shapes appear:
//!
//! ```text
//! Backward (BDF):        F(y) = α·y − S − h·f(t, y)
//! Moulton  (Adams):      F(y) = y − y_prev − h·(β·f(t, y) + C)
//! ```
//!
//! `S` is a weighted sum of past *states* and `C` a weighted sum of past
//! *derivatives*. Both share the Newton matrix
//!
//! ```text
//! J = α·I − h·β·∂f/∂y        (β = 1 for Backward, α = 1 for Moulton)
//! ```
//!
//! and the plain update `J·Δ = −F`, `y ← y + Δ`, repeated until
//! `‖Δ‖₂ < tolerance`. There is no damping and no line search.
//!
//! # Characteristics
//!
//! - **Linear solve**: full-pivoting LU from nalgebra
//! - **Jacobian**: re-evaluated at every iteration
//! - **Budget**: bounded by `max_iterations`, exhausting it is an error

use log::{trace, warn};
use nalgebra::{DMatrix, DVector};

use crate::expression::OdeSystem;
use crate::solver::SolverError;

// =================================================================================================
// Settings
// =================================================================================================

/// Convergence settings of the Newton iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSettings {
    /// Stop once the correction norm drops below this value
    pub tolerance: f64,

    /// Give up after this many iterations
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

impl NewtonSettings {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self { tolerance, max_iterations }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolverError::invalid("Newton tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::invalid("Newton iteration limit must be positive"));
        }
        Ok(())
    }
}

// =================================================================================================
// Problem definition
// =================================================================================================

/// Shape of the implicit equation
#[derive(Clone, Copy, Debug)]
pub enum ImplicitEquation<'a> {
    /// `alpha·y − history − h·f(t, y) = 0`
    Backward {
        alpha: f64,
        history: &'a DVector<f64>,
    },

    /// `y − previous − h·(beta·f(t, y) + forcing) = 0`
    Moulton {
        beta: f64,
        previous: &'a DVector<f64>,
        forcing: &'a DVector<f64>,
    },
}

impl ImplicitEquation<'_> {
    fn residual(&self, y: &DVector<f64>, f: &DVector<f64>, h: f64) -> DVector<f64> {
        match *self {
            ImplicitEquation::Backward { alpha, history } => y * alpha - history - f * h,
            ImplicitEquation::Moulton { beta, previous, forcing } => {
                y - previous - (f * beta + forcing) * h
            }
        }
    }

    /// `(α, β)` of the Newton matrix `α·I − h·β·∂f/∂y`
    fn matrix_coefficients(&self) -> (f64, f64) {
        match *self {
            ImplicitEquation::Backward { alpha, .. } => (alpha, 1.0),
            ImplicitEquation::Moulton { beta, .. } => (1.0, beta),
        }
    }
}

/// One implicit step to solve
pub struct NewtonProblem<'a> {
    pub system: &'a dyn OdeSystem,
    pub equation: ImplicitEquation<'a>,
    pub time: f64,
    pub step_size: f64,
}

impl NewtonProblem<'_> {
    /// Residual `F(y)`
    pub fn residual(&self, y: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        let f = self.system.right_hand_side(self.time, y)?;
        Ok(self.equation.residual(y, &f, self.step_size))
    }

    /// Newton matrix `α·I − h·β·∂f/∂y`
    pub fn newton_matrix(&self, y: &DVector<f64>) -> Result<DMatrix<f64>, SolverError> {
        let (alpha, beta) = self.equation.matrix_coefficients();
        let jacobian = self.system.jacobian(self.time, y)?;
        let n = y.len();
        Ok(DMatrix::identity(n, n) * alpha - jacobian * (self.step_size * beta))
    }
}

/// Converged Newton iterate
#[derive(Clone, Debug)]
pub struct NewtonSolution {
    pub state: DVector<f64>,
    pub iterations: usize,
    /// Norm of the last correction
    pub correction: f64,
}

// =================================================================================================
// Iteration
// =================================================================================================

/// Solve `problem` starting from `guess`
///
/// # Errors
///
/// - [`SolverError::SingularJacobian`] when the Newton matrix cannot be inverted
/// - [`SolverError::NonConvergence`] when the budget is exhausted or the
///   correction stops being finite
/// - evaluation errors from the system
pub fn solve(
    problem: &NewtonProblem<'_>,
    guess: DVector<f64>,
    settings: &NewtonSettings,
) -> Result<NewtonSolution, SolverError> {
    let mut state = guess;
    let mut correction = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        let residual = problem.residual(&state)?;
        let matrix = problem.newton_matrix(&state)?;

        let delta = matrix
            .full_piv_lu()
            .solve(&(-residual))
            .ok_or(SolverError::SingularJacobian { time: problem.time })?;

        state += &delta;
        correction = delta.norm();

        trace!("Newton t = {}: iteration {iteration}, |Δ| = {correction:e}", problem.time);

        if !correction.is_finite() {
            return Err(SolverError::NonConvergence {
                time: problem.time,
                iterations: iteration,
                correction,
            });
        }

        if correction < settings.tolerance {
            if iteration > settings.max_iterations / 2 {
                warn!(
                    "Newton at t = {} needed {iteration} of {} iterations",
                    problem.time, settings.max_iterations
                );
            }
            return Ok(NewtonSolution { state, iterations: iteration, correction });
        }
    }

    Err(SolverError::NonConvergence {
        time: problem.time,
        iterations: settings.max_iterations,
        correction,
    })
}

// =================================================================================================
// Tests
// =================================================================================================
