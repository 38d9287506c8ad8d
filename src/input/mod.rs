//! Text input files
//!
//! A problem can be described in a plain `Key: value` file and turned into
//! a ready-to-run solver, scenario and configuration:
//!
//! ```text
//! Number of equations: 2
//! Function combination: +1_6_1 0 +1_6_1
//!                       +1_1_1 -1_6_1 0
//! Derivative combination: 0 +1_7_1
//!                         -1_7_1 0
//! Method: 3
//! Initial Time: 0
//! Final Time: 1
//! Step Size: 1/10
//! Number of Steps: 2
//! Initial Condition: 1 0
//!                    1 -0.1
//! Beta: 3/2 -1/2
//! ```
//!
//! # Format
//!
//! - A line starting with a letter opens a key (text before the first `:`)
//! - Following lines that do not start with a letter continue that key
//! - Blank lines are ignored
//! - `NA` as the first value marks an optional key as absent
//!
//! # Keys
//!
//! | Key                      | Value                                            |
//! |--------------------------|--------------------------------------------------|
//! | `Number of equations`    | `n`                                              |
//! | `Function combination`   | `n` rows of `n + 1` codes                        |
//! | `Derivative combination` | `n` rows of `n` codes, or `NA`                   |
//! | `Method`                 | method code, see [`MethodCode`]                  |
//! | `Initial Time`, `Final Time`, `Step Size` | numbers, fractions `p/q` allowed |
//! | `Number of Steps`        | columns of the initial condition (default 1)     |
//! | `Initial Condition`      | `n × steps` values, one column after the other   |
//! | `Number of Stages`       | `s`, required with `A`                           |
//! | `A`                      | `s × s` values, row by row                       |
//! | `B`, `C`                 | `s` values each                                  |
//! | `Alpha`, `Beta`          | multistep coefficients                           |
//! | `Newton Tolerance`       | optional, defaults to `1e-4`                     |
//! | `Newton Iterations`      | optional, defaults to `100`                      |

mod method;
mod parser;

pub use method::{MethodCode, Problem};
pub use parser::{parse_fraction, InputParameters};

use thiserror::Error;

use crate::expression::ExpressionError;
use crate::solver::SolverError;

/// Errors raised while reading an input file or building its problem
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid format at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("missing required key `{0}`")]
    MissingKey(String),

    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("denominator cannot be zero: {0}")]
    ZeroDenominator(String),

    #[error("unknown method code {0}")]
    UnknownMethod(i64),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}
