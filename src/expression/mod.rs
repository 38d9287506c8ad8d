//! Right-hand side descriptions
//!
//! This module describes WHAT is integrated: a system `dy/dt = f(t, y)`
//! together with its Jacobian `∂f/∂y`. The solvers in [`crate::solver`]
//! only ever see the [`OdeSystem`] trait, so any hand-written Rust system
//! can be integrated the same way as the string-encoded ones.
//!
//! # String-encoded systems
//!
//! The [`ExpressionSystem`] evaluator reads two grids of short codes:
//!
//! ```text
//! code    := sign? decimal "_" id "_" "("? sign? decimal ")"?
//! decimal := [0-9]* "."? [0-9]+
//! id      := 1 | 2 | 3 | 4 | 5 | 6 | 7
//! ```
//!
//! The literal `"0"` marks an empty cell. Every other cell is one term
//! `coefficient · g_id(x, parameter)` where `g_id` is one of the seven
//! [`ElementaryFunction`]s:
//!
//! | id | function        |
//! |----|-----------------|
//! | 1  | sin(p·x)        |
//! | 2  | cos(p·x)        |
//! | 3  | exp(p·x)        |
//! | 4  | x^p             |
//! | 5  | ln(p·x)         |
//! | 6  | p·x             |
//! | 7  | p               |
//!
//! ## Function grid (n × (n+1))
//!
//! Row `i` describes `f_i`. Column 0 takes the time `t` as argument and
//! column `j ≥ 1` takes the state component `y[j-1]`. All terms of a row
//! are summed.
//!
//! ## Derivative grid (n × n)
//!
//! Entry `(i, j)` is `∂f_i/∂y_j` and is evaluated at `y[j]`. When no
//! derivative grid is given the Jacobian falls back to central finite
//! differences (see [`numerical_jacobian`]).
//!
//! # Example
//!
//! ```rust
//! use ode_rs::expression::{ExpressionSystem, OdeSystem};
//! use nalgebra::DVector;
//!
//! // y1' = t + y2,  y2' = sin(t) - y1
//! let system = ExpressionSystem::from_strs(
//!     &[&["+1_6_1", "0", "+1_6_1"], &["+1_1_1", "-1_6_1", "0"]],
//!     Some(&[&["0", "+1_7_1"], &["-1_7_1", "0"]]),
//! ).unwrap();
//!
//! let y = DVector::from_vec(vec![1.0, 0.0]);
//! let f = system.right_hand_side(0.0, &y).unwrap();
//! assert_eq!(f[0], 0.0);
//! assert_eq!(f[1], -1.0);
//! ```

mod elementary;
mod grid;
mod system;
mod term;
mod traits;

pub use elementary::{evaluate_elementary, ElementaryFunction};
pub use grid::{Cell, ExpressionGrid};
pub use system::ExpressionSystem;
pub use term::Term;
pub use traits::{numerical_jacobian, OdeSystem};

use thiserror::Error;

/// Errors raised while building or evaluating a right-hand side
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Grid shapes or state sizes that do not fit together
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A cell that is neither `"0"` nor a well-formed code
    #[error("invalid expression entry `{code}`")]
    InvalidEntry { code: String },

    /// Function identifier outside `1..=7`
    #[error("invalid function id {0}, expected a value in 1..=7")]
    InvalidFunctionId(u32),
}
