//! Numerical solvers
//!
//! This module provides the time-stepping schemes and everything they
//! share: configuration, scenario, approximation table, Newton root-finder
//! and error type.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - System of equations (`OdeSystem`)
//!    - Seed columns of the approximation table
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Time interval and fixed step size
//!    - Newton tolerance and iteration limit
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - Applies the numerical scheme
//!    - Returns the whole approximation table
//!    - Independent of the system
//!
//! This separation allows:
//! - Same solver for different systems
//! - Different solvers for same scenario (given matching seed columns)
//! - Easy benchmarking and method comparison
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SolverConfiguration`, `SimulationResult`
//! - **`scenario`**: `Scenario`, system + initial condition
//! - **`history`**: `ApproximationTable`, the column buffer filled by a solve
//! - **`newton`**: Newton root-finder used by implicit steps
//! - **`error`**: `SolverError`
//! - **`methods`**: `MultistepSolver`, `RungeKuttaSolver`, coefficient tables
//!
//! # Quick Start Example
//!
//! ```rust
//! use ode_rs::expression::ExpressionSystem;
//! use ode_rs::solver::{MultistepSolver, Scenario, Solver, SolverConfiguration};
//! use nalgebra::DVector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Create scenario (WHAT to solve): y' = e^{-t} + cos(y), y(0) = 0
//! let system = ExpressionSystem::from_strs(&[&["+1_3_-1", "1_2_1"]], Some(&[&["-1_1_1"]]))?;
//! let scenario = Scenario::from_state(Box::new(system), DVector::from_vec(vec![0.0]));
//!
//! // 2. Create configuration (HOW to solve)
//! let config = SolverConfiguration::time_evolution(0.0, 2.0, 0.1)?;
//!
//! // 3. Create solver and solve
//! let solver = MultistepSolver::backward_euler();
//! let result = solver.solve(&scenario, &config)?;
//!
//! // 4. Access results
//! assert_eq!(result.len(), 21);
//! assert!((result.final_state().unwrap()[0] - 1.5741).abs() < 1e-3);
//! # Ok(())
//! # }
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │  OdeSystem      │  (equations)
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ Scenario        │ ← WHAT to solve
//! │ (system + seeds)│
//! └────────┬────────┘
//!          │
//! ┌────────▼─────────────┐
//! │ Solver Configuration │ ← HOW to solve
//! │ (grid + Newton)      │
//! └────────┬─────────────┘
//!          │
//! ┌────────▼────────┐        ┌──────────────────┐
//! │ Numerical Solver│ ─────► │ Newton (implicit)│
//! │ (AB, AM, BDF,RK)│        └──────────────────┘
//! └────────┬────────┘
//!          │
//! ┌────────▼────────────┐
//! │ Simulation Result   │ ← The approximation table
//! │ (columns + meta)    │
//! └─────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! All solver methods return `Result<T, SolverError>`:
//!
//! - `InvalidArgument`: bad step size, interval, coefficients or seed count
//! - `Expression`: malformed grid entry or unknown function id
//! - `NonConvergence` / `SingularJacobian`: Newton failure in an implicit step
//! - `NonFinite`: NaN or Inf produced, usually a step size too large for
//!   an explicit method

// =================================================================================================
// Module Declarations
// =================================================================================================
mod error;
mod history;
pub mod methods;
pub mod newton;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use error::SolverError;
pub use history::ApproximationTable;
pub use methods::{
    bootstrap_history, ButcherTableau, MultistepFamily, MultistepSolver, RungeKuttaSolver,
};
pub use newton::{NewtonSettings, NewtonSolution};
pub use scenario::Scenario;
pub use traits::{SimulationResult, Solver, SolverConfiguration, DEFAULT_MAX_COLUMNS};
