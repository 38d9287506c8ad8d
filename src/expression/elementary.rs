//! The seven elementary functions a term can reference

use std::fmt;

use super::ExpressionError;

/// Elementary function selected by the middle field of a code
///
/// Every function takes the argument `x` and the parameter `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementaryFunction {
    /// `sin(p·x)`
    Sine,
    /// `cos(p·x)`
    Cosine,
    /// `exp(p·x)`
    Exponential,
    /// `x^p`
    Power,
    /// `ln(p·x)`
    Logarithm,
    /// `p·x`
    Linear,
    /// `p`
    Constant,
}

impl ElementaryFunction {
    /// All functions, ordered by identifier
    pub const ALL: [ElementaryFunction; 7] = [
        ElementaryFunction::Sine,
        ElementaryFunction::Cosine,
        ElementaryFunction::Exponential,
        ElementaryFunction::Power,
        ElementaryFunction::Logarithm,
        ElementaryFunction::Linear,
        ElementaryFunction::Constant,
    ];

    /// Look up a function from its numeric identifier
    pub fn from_id(id: u32) -> Result<Self, ExpressionError> {
        match id {
            1 => Ok(Self::Sine),
            2 => Ok(Self::Cosine),
            3 => Ok(Self::Exponential),
            4 => Ok(Self::Power),
            5 => Ok(Self::Logarithm),
            6 => Ok(Self::Linear),
            7 => Ok(Self::Constant),
            other => Err(ExpressionError::InvalidFunctionId(other)),
        }
    }

    /// Numeric identifier used in codes
    pub fn id(self) -> u32 {
        match self {
            Self::Sine => 1,
            Self::Cosine => 2,
            Self::Exponential => 3,
            Self::Power => 4,
            Self::Logarithm => 5,
            Self::Linear => 6,
            Self::Constant => 7,
        }
    }

    /// Evaluate the function at `x` with parameter `p`
    ///
    /// No domain checks are made: `ln` of a non-positive value or a
    /// fractional power of a negative base yields NaN, which the solvers
    /// report as a non-finite state.
    #[inline]
    pub fn evaluate(self, x: f64, p: f64) -> f64 {
        match self {
            Self::Sine => (p * x).sin(),
            Self::Cosine => (p * x).cos(),
            Self::Exponential => (p * x).exp(),
            Self::Power => x.powf(p),
            Self::Logarithm => (p * x).ln(),
            Self::Linear => p * x,
            Self::Constant => p,
        }
    }
}

impl fmt::Display for ElementaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sine => "sin(p·x)",
            Self::Cosine => "cos(p·x)",
            Self::Exponential => "exp(p·x)",
            Self::Power => "x^p",
            Self::Logarithm => "ln(p·x)",
            Self::Linear => "p·x",
            Self::Constant => "p",
        };
        f.write_str(label)
    }
}

/// Evaluate elementary function `id` at `x` with parameter `p`
///
/// # Errors
///
/// [`ExpressionError::InvalidFunctionId`] when `id` is not in `1..=7`.
///
/// # Example
///
/// ```rust
/// use ode_rs::expression::evaluate_elementary;
///
/// assert_eq!(evaluate_elementary(6, 3.0, 2.0).unwrap(), 6.0);
/// assert_eq!(evaluate_elementary(7, 3.0, 2.0).unwrap(), 2.0);
/// assert!(evaluate_elementary(8, 1.0, 1.0).is_err());
/// ```
pub fn evaluate_elementary(id: u32, x: f64, p: f64) -> Result<f64, ExpressionError> {
    Ok(ElementaryFunction::from_id(id)?.evaluate(x, p))
}

// =================================================================================================
// Tests
// =================================================================================================
