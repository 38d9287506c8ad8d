//! ode-rs: fixed-step solvers for initial-value ODE problems
//!
//! Systems of ordinary differential equations `y' = F(t, y)` are described
//! by grids of short text codes, then integrated on a uniform time grid
//! with Adams-Bashforth, Adams-Moulton, BDF or explicit Runge-Kutta
//! methods. Implicit methods solve each step with Newton's method.
//!
//! # Architecture
//!
//! ode-rs is built on two core principles:
//!
//! 1. **Separation of Equations and Numerics**
//!    - Expression systems define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Methods as Data**
//!    - One multistep solver driven by coefficient vectors
//!    - One Runge-Kutta solver driven by a Butcher tableau
//!
//! # Quick Start
//!
//! ```rust
//! use ode_rs::prelude::*;
//! use nalgebra::DVector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Describe the system: y1' = t + y2, y2' = sin(t) - y1
//! let system = ExpressionSystem::from_strs(
//!     &[&["+1_6_1", "0", "+1_6_1"], &["+1_1_1", "-1_6_1", "0"]],
//!     Some(&[&["0", "+1_7_1"], &["-1_7_1", "0"]]),
//! )?;
//! let scenario = Scenario::from_state(Box::new(system), DVector::from_vec(vec![1.0, 0.0]));
//!
//! // 2. Configure the time grid
//! let config = SolverConfiguration::time_evolution(0.0, 1.0, 0.1)?;
//!
//! // 3. Run simulation
//! let solver = MultistepSolver::backward_euler();
//! let result = solver.solve(&scenario, &config)?;
//!
//! // 4. Access results
//! assert_eq!(result.len(), 11);
//! println!("{}", result.table("Approximations"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`expression`]: grid codes, elementary functions, `OdeSystem`
//! - [`solver`]: numerical methods, Newton iteration, approximation table
//! - [`input`]: `Key: value` problem files
//! - [`output`]: text tables and CSV export

pub mod expression;
pub mod input;
pub mod output;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use ode_rs::prelude::*;
    //! ```
    pub use crate::expression::{ExpressionGrid, ExpressionSystem, OdeSystem, Term};
    pub use crate::input::{InputParameters, MethodCode, Problem};
    pub use crate::solver::{
        MultistepSolver, NewtonSettings, RungeKuttaSolver, Scenario, SimulationResult, Solver,
        SolverConfiguration, SolverError,
    };
}
