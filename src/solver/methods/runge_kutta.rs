//! Explicit Runge-Kutta solver
//!
//! # Mathematical Background
//!
//! An explicit Runge-Kutta method is described by its Butcher tableau
//! `(a, b, c)` with `a` strictly lower triangular:
//!
//! ```text
//! c₁ |
//! c₂ | a₂₁
//! c₃ | a₃₁  a₃₂
//! ⋮  |  ⋮         ⋱
//! ───┼──────────────────
//!    | b₁   b₂  …  b_s
//! ```
//!
//! Each step evaluates `s` stages and combines them:
//!
//! ```text
//! kᵢ = f(tₙ + cᵢ·h, yₙ + h·Σⱼ<ᵢ aᵢⱼ·kⱼ)
//!
//! yₙ₊₁ = yₙ + h·Σᵢ bᵢ·kᵢ
//! ```
//!
//! # Characteristics
//!
//! - **History**: one seed column (the initial state)
//! - **Cost**: `s` right-hand side evaluations per step
//! - **Explicit**: no Newton solve, stability limited by the step size
//!
//! # Presets
//!
//! | Tableau                              | Stages | Order |
//! |--------------------------------------|--------|-------|
//! | [`ButcherTableau::forward_euler`]    | 1      | 1     |
//! | [`ButcherTableau::classic_rk4`]      | 4      | 4     |
//!
//! # Example
//!
//! ```rust,ignore
//! use ode_rs::solver::{RungeKuttaSolver, Solver, SolverConfiguration};
//!
//! let solver = RungeKuttaSolver::classic_rk4();
//! let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1)?;
//!
//! let result = solver.solve(&scenario, &config)?;
//! ```

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::expression::OdeSystem;
use crate::solver::history::ApproximationTable;
use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration, SolverError};

// =================================================================================================
// Butcher tableau
// =================================================================================================

/// Coefficients `(a, b, c)` of an explicit Runge-Kutta method
#[derive(Clone, Debug, PartialEq)]
pub struct ButcherTableau {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
}

impl ButcherTableau {
    /// Create a validated tableau
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidArgument`] when `a` is not square, is not
    /// strictly lower triangular, or when `b`/`c` do not have one entry per
    /// stage.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: DVector<f64>) -> Result<Self, SolverError> {
        let stages = a.nrows();

        if stages == 0 || !a.is_square() {
            return Err(SolverError::invalid(format!(
                "Runge-Kutta matrix must be square and non-empty, got {} x {}",
                a.nrows(),
                a.ncols()
            )));
        }

        for i in 0..stages {
            for j in i..stages {
                if a[(i, j)] != 0.0 {
                    return Err(SolverError::invalid(format!(
                        "Runge-Kutta matrix must be strictly lower triangular, a[{i}][{j}] = {}",
                        a[(i, j)]
                    )));
                }
            }
        }

        if b.len() != stages || c.len() != stages {
            return Err(SolverError::invalid(format!(
                "Runge-Kutta vectors must have {stages} entries, got b: {}, c: {}",
                b.len(),
                c.len()
            )));
        }

        if a.iter().chain(b.iter()).chain(c.iter()).any(|v| !v.is_finite()) {
            return Err(SolverError::invalid("Runge-Kutta coefficients must be finite"));
        }

        Ok(Self { a, b, c })
    }

    /// Single stage, `b = [1]`
    pub fn forward_euler() -> Self {
        Self {
            a: DMatrix::zeros(1, 1),
            b: DVector::from_element(1, 1.0),
            c: DVector::zeros(1),
        }
    }

    /// Classical fourth-order tableau
    pub fn classic_rk4() -> Self {
        Self {
            a: DMatrix::from_row_slice(
                4,
                4,
                &[
                    0.0, 0.0, 0.0, 0.0, //
                    0.5, 0.0, 0.0, 0.0, //
                    0.0, 0.5, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0,
                ],
            ),
            b: DVector::from_vec(vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0]),
            c: DVector::from_vec(vec![0.0, 0.5, 0.5, 1.0]),
        }
    }

    /// Number of stages
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    /// Advance `y` from `t` to `t + h`
    pub fn step(
        &self,
        system: &dyn OdeSystem,
        t: f64,
        y: &DVector<f64>,
        h: f64,
    ) -> Result<DVector<f64>, SolverError> {
        let s = self.stages();
        let mut slopes: Vec<DVector<f64>> = Vec::with_capacity(s);

        for i in 0..s {
            // Stage input: yₙ + h·Σⱼ<ᵢ aᵢⱼ·kⱼ
            let mut stage = y.clone();
            for (j, k) in slopes.iter().enumerate() {
                let weight = self.a[(i, j)];
                if weight != 0.0 {
                    stage.axpy(h * weight, k, 1.0);
                }
            }
            slopes.push(system.right_hand_side(t + self.c[i] * h, &stage)?);
        }

        let mut next = y.clone();
        for (k, &weight) in slopes.iter().zip(self.b.iter()) {
            next.axpy(h * weight, k, 1.0);
        }
        Ok(next)
    }
}

// =================================================================================================
// Runge-Kutta Solver
// =================================================================================================

/// Explicit Runge-Kutta solver for an arbitrary tableau
///
/// # Example
///
/// ```rust
/// use ode_rs::solver::{RungeKuttaSolver, Solver};
///
/// let solver = RungeKuttaSolver::classic_rk4();
/// assert_eq!(solver.name(), "Runge-Kutta (4 stages)");
/// assert_eq!(solver.history_len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RungeKuttaSolver {
    tableau: ButcherTableau,
    name: String,
}

impl RungeKuttaSolver {
    /// Create a solver for a validated tableau
    pub fn new(tableau: ButcherTableau) -> Self {
        let name = format!("Runge-Kutta ({} stages)", tableau.stages());
        Self { tableau, name }
    }

    /// Validate raw coefficients and build a solver
    pub fn from_coefficients(
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: DVector<f64>,
    ) -> Result<Self, SolverError> {
        Ok(Self::new(ButcherTableau::new(a, b, c)?))
    }

    pub fn classic_rk4() -> Self {
        Self::new(ButcherTableau::classic_rk4())
    }

    pub fn forward_euler() -> Self {
        Self::new(ButcherTableau::forward_euler()).with_name("Forward Euler (Runge-Kutta)")
    }

    /// Replace the reported name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn tableau(&self) -> &ButcherTableau {
        &self.tableau
    }
}

impl Solver for RungeKuttaSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SolverError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        if scenario.seed_columns() != self.history_len() {
            return Err(SolverError::invalid(format!(
                "{} needs {} initial column, got {}",
                self.name,
                self.history_len(),
                scenario.seed_columns()
            )));
        }

        // ====== Step 2: Setup ======

        let h = config.step_size;
        let system = scenario.system.as_ref();
        let mut table = ApproximationTable::new(config, &scenario.initial_condition)?;

        debug!(
            "{}: integrating {} over {} columns, h = {h}",
            self.name,
            system.name(),
            table.capacity()
        );

        // ====== Step 3: Time Integration ======

        let mut state = table.last_state();
        while let Some(n) = table.next_index() {
            let t_previous = table.time_at(n - 1);
            state = self.tableau.step(system, t_previous, &state, h)?;
            table.push(&state)?;
        }

        // ====== Step 4: Build Result ======

        let steps = table.capacity() - 1;
        let mut result = table.into_result();

        result.add_metadata("solver", &self.name);
        result.add_metadata("system", system.name());
        result.add_metadata("step size", &h.to_string());
        result.add_metadata("time steps", &steps.to_string());
        result.add_metadata(
            "function evaluations",
            &(self.tableau.stages() * steps).to_string(),
        );

        debug!("{}: done, {steps} steps", self.name);

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn history_len(&self) -> usize {
        1
    }
}

// =================================================================================================
// Tests
// =================================================================================================
