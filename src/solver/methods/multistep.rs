//! Linear multistep solvers
//!
//! # Mathematical Background
//!
//! One engine runs three families of fixed-step multistep methods. They
//! differ only in how the new column `yₙ` is obtained from the last `k`
//! columns:
//!
//! ```text
//! Adams-Bashforth (explicit):
//!     yₙ = yₙ₋₁ + h·Σᵢ₌₀..ₖ₋₁ βᵢ·f(tₙ₋₁₋ᵢ, yₙ₋₁₋ᵢ)
//!
//! Adams-Moulton (implicit):
//!     yₙ = yₙ₋₁ + h·(β₀·f(tₙ, yₙ) + C),   C = Σᵢ₌₁..ₖ βᵢ·f(tₙ₋ᵢ, yₙ₋ᵢ)
//!
//! BDF (implicit):
//!     α₀·yₙ − S = h·f(tₙ, yₙ),            S = Σᵢ₌₁..ₖ αᵢ·yₙ₋ᵢ
//! ```
//!
//! Implicit families hand the equation to the [Newton root-finder](crate::solver::newton),
//! starting from `yₙ₋₁`. Adams methods combine past *derivatives*, BDF
//! combines past *states*.
//!
//! # History length
//!
//! | Family          | Coefficients         | Seed columns `k` |
//! |-----------------|----------------------|------------------|
//! | Adams-Bashforth | `β`, length `k`      | `len(β)`         |
//! | Adams-Moulton   | `β`, length `k + 1`  | `len(β) − 1`     |
//! | BDF             | `α`, length `k + 1`  | `len(α) − 1`     |
//!
//! Both coefficient vectors always have the same length. The unused one is
//! filled with the trivial values (`α = 0` for Adams-Bashforth,
//! `α = [1, −1, 0…]` for Adams-Moulton, `β = [1, 0…]` for BDF).
//!
//! # Characteristics
//!
//! - **Adams-Bashforth**: one new evaluation per step, conditionally stable
//! - **Adams-Moulton**: one Newton solve per step, larger stability region
//! - **BDF**: one Newton solve per step, A-stable up to order 2, suited to
//!   stiff problems
//!
//! # Example
//!
//! ```rust,ignore
//! use ode_rs::solver::{MultistepSolver, Solver, SolverConfiguration};
//!
//! let bdf = MultistepSolver::bdf_order(2)?;
//! let config = SolverConfiguration::time_evolution(0.0, 10.0, 0.01)?;
//!
//! // scenario must provide bdf.history_len() = 2 seed columns
//! let result = bdf.solve(&scenario, &config)?;
//! ```

use std::collections::VecDeque;
use std::fmt;

use log::debug;
use nalgebra::DVector;

use crate::solver::history::ApproximationTable;
use crate::solver::methods::coefficients;
use crate::solver::newton::{self, ImplicitEquation, NewtonProblem};
use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration, SolverError};

// =================================================================================================
// Family
// =================================================================================================

/// Which update rule the engine applies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MultistepFamily {
    AdamsBashforth,
    AdamsMoulton,
    Bdf,
}

impl MultistepFamily {
    pub fn is_implicit(self) -> bool {
        !matches!(self, MultistepFamily::AdamsBashforth)
    }

    /// Whether the update combines past right-hand side evaluations
    fn uses_derivatives(self) -> bool {
        !matches!(self, MultistepFamily::Bdf)
    }
}

impl fmt::Display for MultistepFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MultistepFamily::AdamsBashforth => "Adams-Bashforth",
            MultistepFamily::AdamsMoulton => "Adams-Moulton",
            MultistepFamily::Bdf => "BDF",
        })
    }
}

// =================================================================================================
// Multistep Solver
// =================================================================================================

/// Fixed-step linear multistep solver
///
/// Coefficients are validated once and never change, so one instance can
/// be reused for any number of solves.
///
/// # Example
///
/// ```rust
/// use ode_rs::solver::{MultistepSolver, Solver};
///
/// let ab3 = MultistepSolver::adams_bashforth(3).unwrap();
/// assert_eq!(ab3.history_len(), 3);
///
/// let backward_euler = MultistepSolver::backward_euler();
/// assert_eq!(backward_euler.history_len(), 1);
///
/// let bdf4 = MultistepSolver::bdf_order(4).unwrap();
/// assert_eq!(bdf4.history_len(), 4);
///
/// // α and β must have the same length
/// assert!(MultistepSolver::adams_moulton(vec![1.0]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct MultistepSolver {
    family: MultistepFamily,
    alpha: DVector<f64>,
    beta: DVector<f64>,
    name: String,
}

impl MultistepSolver {
    /// Build a solver from raw coefficient vectors
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidArgument`] when:
    /// - `alpha` and `beta` differ in length
    /// - the vectors are empty, or shorter than 2 for implicit families
    /// - a coefficient is not finite
    /// - the leading BDF coefficient `α₀` is zero
    pub fn new(
        family: MultistepFamily,
        alpha: Vec<f64>,
        beta: Vec<f64>,
    ) -> Result<Self, SolverError> {
        if alpha.len() != beta.len() {
            return Err(SolverError::invalid(format!(
                "alpha and beta must have the same length, got {} and {}",
                alpha.len(),
                beta.len()
            )));
        }

        let minimum = if family.is_implicit() { 2 } else { 1 };
        if beta.len() < minimum {
            return Err(SolverError::invalid(format!(
                "{family} needs at least {minimum} coefficients, got {}",
                beta.len()
            )));
        }

        if alpha.iter().chain(beta.iter()).any(|v| !v.is_finite()) {
            return Err(SolverError::invalid("multistep coefficients must be finite"));
        }

        if family == MultistepFamily::Bdf && alpha[0] == 0.0 {
            return Err(SolverError::invalid("leading BDF coefficient must not be zero"));
        }

        let steps = match family {
            MultistepFamily::AdamsBashforth => beta.len(),
            _ => beta.len() - 1,
        };
        let name = format!("{family} ({steps}-step)");

        Ok(Self {
            family,
            alpha: DVector::from_vec(alpha),
            beta: DVector::from_vec(beta),
            name,
        })
    }

    // ====== Adams-Bashforth ======

    /// Adams-Bashforth with the fixed table for 1 to 4 steps
    pub fn adams_bashforth(steps: usize) -> Result<Self, SolverError> {
        let beta = coefficients::adams_bashforth(steps).ok_or_else(|| {
            SolverError::invalid(format!("Adams-Bashforth tables cover 1 to 4 steps, got {steps}"))
        })?;
        Self::adams_bashforth_with(beta.to_vec())
    }

    /// Adams-Bashforth with user-supplied `β`
    pub fn adams_bashforth_with(beta: Vec<f64>) -> Result<Self, SolverError> {
        let alpha = vec![0.0; beta.len()];
        Self::new(MultistepFamily::AdamsBashforth, alpha, beta)
    }

    /// One-step Adams-Bashforth
    pub fn forward_euler() -> Self {
        Self {
            family: MultistepFamily::AdamsBashforth,
            alpha: DVector::zeros(1),
            beta: DVector::from_element(1, 1.0),
            name: "Forward Euler".to_string(),
        }
    }

    // ====== Adams-Moulton ======

    /// Adams-Moulton with user-supplied `β` (`β₀` multiplies the new point)
    pub fn adams_moulton(beta: Vec<f64>) -> Result<Self, SolverError> {
        let mut alpha = vec![0.0; beta.len()];
        if let [first, second, ..] = alpha.as_mut_slice() {
            *first = 1.0;
            *second = -1.0;
        }
        Self::new(MultistepFamily::AdamsMoulton, alpha, beta)
    }

    /// Adams-Moulton with the fixed table of order 1 to 5
    pub fn adams_moulton_order(order: usize) -> Result<Self, SolverError> {
        let beta = coefficients::adams_moulton(order).ok_or_else(|| {
            SolverError::invalid(format!("Adams-Moulton tables cover orders 1 to 5, got {order}"))
        })?;
        Self::adams_moulton(beta.to_vec())
    }

    /// Adams-Moulton with `β = [1, 0]`
    pub fn backward_euler() -> Self {
        Self {
            family: MultistepFamily::AdamsMoulton,
            alpha: DVector::from_vec(vec![1.0, -1.0]),
            beta: DVector::from_vec(vec![1.0, 0.0]),
            name: "Backward Euler".to_string(),
        }
    }

    /// Adams-Moulton with `β = [1/2, 1/2]`
    pub fn trapezoidal() -> Self {
        Self {
            family: MultistepFamily::AdamsMoulton,
            alpha: DVector::from_vec(vec![1.0, -1.0]),
            beta: DVector::from_vec(vec![0.5, 0.5]),
            name: "Trapezoidal".to_string(),
        }
    }

    // ====== BDF ======

    /// BDF with user-supplied `α` (`α₀` multiplies the new point)
    pub fn bdf(alpha: Vec<f64>) -> Result<Self, SolverError> {
        let mut beta = vec![0.0; alpha.len()];
        if let Some(first) = beta.first_mut() {
            *first = 1.0;
        }
        Self::new(MultistepFamily::Bdf, alpha, beta)
    }

    /// BDF with the fixed table of order 1 to 6
    pub fn bdf_order(order: usize) -> Result<Self, SolverError> {
        let alpha = coefficients::bdf(order).ok_or_else(|| {
            SolverError::invalid(format!("BDF tables cover orders 1 to 6, got {order}"))
        })?;
        Self::bdf(alpha.to_vec())
    }

    // ====== Accessors ======

    /// Replace the reported name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn family(&self) -> MultistepFamily {
        self.family
    }

    pub fn alpha(&self) -> &DVector<f64> {
        &self.alpha
    }

    pub fn beta(&self) -> &DVector<f64> {
        &self.beta
    }

    // ====== Update rules ======

    /// `yₙ₋₁ + h·Σ βᵢ·fₙ₋₁₋ᵢ`
    fn adams_bashforth_step(
        &self,
        previous: &DVector<f64>,
        derivatives: &VecDeque<DVector<f64>>,
        h: f64,
    ) -> DVector<f64> {
        let mut next = previous.clone();
        for (f, &weight) in derivatives.iter().zip(self.beta.iter()) {
            next.axpy(h * weight, f, 1.0);
        }
        next
    }

    /// `C = Σᵢ₌₁..ₖ βᵢ·fₙ₋ᵢ`
    fn moulton_forcing(&self, derivatives: &VecDeque<DVector<f64>>, n: usize) -> DVector<f64> {
        let mut forcing = DVector::zeros(n);
        for (f, &weight) in derivatives.iter().zip(self.beta.iter().skip(1)) {
            forcing.axpy(weight, f, 1.0);
        }
        forcing
    }

    /// `S = Σᵢ₌₁..ₖ αᵢ·yₙ₋ᵢ`
    fn backward_history(&self, table: &ApproximationTable, index: usize) -> DVector<f64> {
        let mut history = DVector::zeros(table.dimension());
        for (i, &weight) in self.alpha.iter().skip(1).enumerate() {
            history.axpy(weight, &table.state(index - 1 - i), 1.0);
        }
        history
    }
}

impl Solver for MultistepSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SolverError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let k = self.history_len();
        if scenario.seed_columns() != k {
            return Err(SolverError::invalid(format!(
                "{} needs {k} initial columns, got {}",
                self.name,
                scenario.seed_columns()
            )));
        }

        // ====== Step 2: Setup ======

        let h = config.step_size;
        let system = scenario.system.as_ref();
        let mut table = ApproximationTable::new(config, &scenario.initial_condition)?;

        debug!(
            "{}: integrating {} over {} columns ({k} seeded), h = {h}",
            self.name,
            system.name(),
            table.capacity()
        );

        // f at the last k columns, newest first
        let mut derivatives = VecDeque::with_capacity(k);
        if self.family.uses_derivatives() && !table.is_complete() {
            for j in (0..k).rev() {
                derivatives.push_back(system.right_hand_side(table.time_at(j), &table.state(j))?);
            }
        }

        // ====== Step 3: Time Integration ======

        let mut newton_iterations = 0;

        while let Some(n) = table.next_index() {
            let t = table.time_at(n);
            let previous = table.state(n - 1);

            let next = match self.family {
                MultistepFamily::AdamsBashforth => {
                    self.adams_bashforth_step(&previous, &derivatives, h)
                }
                MultistepFamily::AdamsMoulton => {
                    let forcing = self.moulton_forcing(&derivatives, table.dimension());
                    let problem = NewtonProblem {
                        system,
                        equation: ImplicitEquation::Moulton {
                            beta: self.beta[0],
                            previous: &previous,
                            forcing: &forcing,
                        },
                        time: t,
                        step_size: h,
                    };
                    let solution = newton::solve(&problem, previous.clone(), &config.newton)?;
                    newton_iterations += solution.iterations;
                    solution.state
                }
                MultistepFamily::Bdf => {
                    let history = self.backward_history(&table, n);
                    let problem = NewtonProblem {
                        system,
                        equation: ImplicitEquation::Backward {
                            alpha: self.alpha[0],
                            history: &history,
                        },
                        time: t,
                        step_size: h,
                    };
                    let solution = newton::solve(&problem, previous.clone(), &config.newton)?;
                    newton_iterations += solution.iterations;
                    solution.state
                }
            };

            table.push(&next)?;

            if self.family.uses_derivatives() && !table.is_complete() {
                derivatives.pop_back();
                derivatives.push_front(system.right_hand_side(t, &next)?);
            }
        }

        // ====== Step 4: Build Result ======

        let computed = table.capacity() - k;
        let mut result = table.into_result();

        result.add_metadata("solver", &self.name);
        result.add_metadata("family", &self.family.to_string());
        result.add_metadata("system", system.name());
        result.add_metadata("step size", &h.to_string());
        result.add_metadata("history columns", &k.to_string());
        result.add_metadata("time steps", &computed.to_string());
        if self.family.is_implicit() {
            result.add_metadata("newton iterations", &newton_iterations.to_string());
        }

        debug!(
            "{}: done, {computed} steps, {newton_iterations} Newton iterations",
            self.name
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn history_len(&self) -> usize {
        match self.family {
            MultistepFamily::AdamsBashforth => self.beta.len(),
            MultistepFamily::AdamsMoulton => self.beta.len() - 1,
            MultistepFamily::Bdf => self.alpha.len() - 1,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ExpressionError, OdeSystem};
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    // ====== Mock systems ======

    /// dy/dt = λ·y with analytic Jacobian
    struct Linear {
        lambda: f64,
    }

    impl OdeSystem for Linear {
        fn dimension(&self) -> usize {
            1
        }

        fn right_hand_side(&self, _t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
            Ok(y * self.lambda)
        }

        fn jacobian(&self, _t: f64, _y: &DVector<f64>) -> Result<DMatrix<f64>, ExpressionError> {
            Ok(DMatrix::from_element(1, 1, self.lambda))
        }

        fn name(&self) -> &str {
            "Linear"
        }
    }

    /// dy/dt = 1, exact solution y₀ + t
    struct ConstantGrowth;

    impl OdeSystem for ConstantGrowth {
        fn dimension(&self) -> usize {
            1
        }

        fn right_hand_side(&self, _t: f64, _y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
            Ok(DVector::from_element(1, 1.0))
        }

        fn name(&self) -> &str {
            "Constant Growth"
        }
    }

    fn seeds(values: &[f64]) -> DMatrix<f64> {
        DMatrix::from_row_slice(1, values.len(), values)
    }

    fn config(h: f64) -> SolverConfiguration {
        SolverConfiguration::time_evolution(0.0, 1.0, h).unwrap()
    }

    // ====== Construction ======

    #[test]
    fn test_history_lengths() {
        for steps in 1..=4 {
            assert_eq!(MultistepSolver::adams_bashforth(steps).unwrap().history_len(), steps);
        }
        for order in 1..=5 {
            let expected = if order == 1 { 1 } else { order - 1 };
            assert_eq!(MultistepSolver::adams_moulton_order(order).unwrap().history_len(), expected);
        }
        for order in 1..=6 {
            assert_eq!(MultistepSolver::bdf_order(order).unwrap().history_len(), order);
        }
        assert_eq!(MultistepSolver::trapezoidal().history_len(), 1);
    }

    #[test]
    fn test_invalid_coefficients() {
        assert!(MultistepSolver::adams_bashforth(0).is_err());
        assert!(MultistepSolver::adams_bashforth(5).is_err());
        assert!(MultistepSolver::adams_bashforth_with(vec![]).is_err());
        assert!(MultistepSolver::adams_moulton(vec![1.0]).is_err());
        assert!(MultistepSolver::bdf(vec![0.0, 1.0]).is_err());
        assert!(MultistepSolver::bdf_order(7).is_err());
        assert!(
            MultistepSolver::new(MultistepFamily::Bdf, vec![1.0, 1.0], vec![1.0, 0.0, 0.0]).is_err()
        );
        assert!(MultistepSolver::adams_bashforth_with(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_trivial_coefficients() {
        let am = MultistepSolver::adams_moulton(vec![5.0 / 12.0, 8.0 / 12.0, -1.0 / 12.0]).unwrap();
        assert_eq!(am.alpha().as_slice(), &[1.0, -1.0, 0.0]);

        let bdf = MultistepSolver::bdf_order(2).unwrap();
        assert_eq!(bdf.beta().as_slice(), &[1.0, 0.0, 0.0]);

        let ab = MultistepSolver::adams_bashforth(2).unwrap();
        assert_eq!(ab.alpha().as_slice(), &[0.0, 0.0]);
        assert_eq!(ab.family(), MultistepFamily::AdamsBashforth);
    }

    // ====== Solve contract ======

    #[test]
    fn test_seed_count_must_match() {
        let scenario = Scenario::new(Box::new(ConstantGrowth), seeds(&[0.0]));
        let solver = MultistepSolver::adams_bashforth(2).unwrap();

        let result = solver.solve(&scenario, &config(0.1));
        assert!(matches!(result, Err(SolverError::InvalidArgument(_))));
    }

    #[test]
    fn test_seed_columns_preserved() {
        let scenario = Scenario::new(Box::new(Linear { lambda: -1.0 }), seeds(&[1.0, 0.9, 0.8]));
        let solver = MultistepSolver::bdf_order(3).unwrap();

        let result = solver.solve(&scenario, &config(0.1)).unwrap();

        assert_eq!(result.len(), 11);
        assert_eq!(&result.component(0).unwrap()[..3], &[1.0, 0.9, 0.8]);
        assert_eq!(result.metadata("history columns"), Some("3"));
    }

    #[test]
    fn test_grid_shorter_than_history() {
        let scenario = Scenario::new(Box::new(ConstantGrowth), seeds(&[0.0, 0.1, 0.2, 0.3]));
        let solver = MultistepSolver::adams_bashforth(4).unwrap();
        let config = SolverConfiguration::time_evolution(0.0, 0.2, 0.1).unwrap();

        assert!(solver.solve(&scenario, &config).is_err());
    }

    #[test]
    fn test_seeds_fill_whole_grid() {
        let scenario = Scenario::new(Box::new(ConstantGrowth), seeds(&[0.0, 0.1]));
        let solver = MultistepSolver::adams_bashforth(2).unwrap();
        let config = SolverConfiguration::time_evolution(0.0, 0.1, 0.1).unwrap();

        let result = solver.solve(&scenario, &config).unwrap();
        assert_eq!(result.component(0).unwrap(), vec![0.0, 0.1]);
    }

    // ====== Exactness on linear growth ======

    #[test]
    fn test_all_families_exact_for_constant_rhs() {
        let solvers = vec![
            (MultistepSolver::adams_bashforth(3).unwrap(), vec![0.0, 0.1, 0.2]),
            (MultistepSolver::adams_moulton_order(3).unwrap(), vec![0.0, 0.1]),
            (MultistepSolver::bdf_order(2).unwrap(), vec![0.0, 0.1]),
            (MultistepSolver::backward_euler(), vec![0.0]),
        ];

        for (solver, seed) in solvers {
            let scenario = Scenario::new(Box::new(ConstantGrowth), seeds(&seed));
            let result = solver.solve(&scenario, &config(0.1)).unwrap();

            for (t, y) in result.time_points.iter().zip(result.component(0).unwrap()) {
                assert_relative_eq!(y, *t, epsilon = 1e-10);
            }
        }
    }

    // ====== Update formulas ======

    #[test]
    fn test_backward_euler_linear_closed_form() {
        // y_{n+1} = y_n / (1 - hλ)
        let scenario = Scenario::new(Box::new(Linear { lambda: -2.0 }), seeds(&[1.0]));

        let result = MultistepSolver::backward_euler().solve(&scenario, &config(0.1)).unwrap();

        for (i, y) in result.component(0).unwrap().iter().enumerate() {
            assert_relative_eq!(*y, 1.2f64.powi(-(i as i32)), epsilon = 1e-8);
        }
        assert!(result.metadata("newton iterations").is_some());
    }

    #[test]
    fn test_bdf1_matches_backward_euler() {
        let make = || Scenario::new(Box::new(Linear { lambda: -3.0 }), seeds(&[2.0]));

        let be = MultistepSolver::backward_euler().solve(&make(), &config(0.05)).unwrap();
        let bdf = MultistepSolver::bdf_order(1).unwrap().solve(&make(), &config(0.05)).unwrap();

        for (a, b) in be.component(0).unwrap().iter().zip(bdf.component(0).unwrap()) {
            assert_relative_eq!(*a, b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_adams_bashforth_two_step_by_hand() {
        // y2 = y1 + h(3/2 λ y1 − 1/2 λ y0)
        let scenario = Scenario::new(Box::new(Linear { lambda: 1.0 }), seeds(&[1.0, 1.1]));
        let solver = MultistepSolver::adams_bashforth(2).unwrap();

        let result = solver.solve(&scenario, &config(0.1)).unwrap();

        let expected = 1.1 + 0.1 * (1.5 * 1.1 - 0.5 * 1.0);
        assert_relative_eq!(result.state(2).unwrap()[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_newton_failure_propagates() {
        let scenario = Scenario::new(Box::new(Linear { lambda: 10.0 }), seeds(&[1.0]));
        // 1 − hλ = 0 makes the Newton matrix singular
        let result = MultistepSolver::backward_euler().solve(&scenario, &config(0.1));
        assert!(matches!(result, Err(SolverError::SingularJacobian { .. })));
    }
}
