//! System trait shared by all right-hand sides
//!
//! # Stability Guarantee
//!
//! `OdeSystem` is the only contact point between a problem definition and
//! the solvers. New providers (closures, generated code, string grids)
//! implement it, solvers never depend on a concrete provider.

use nalgebra::{DMatrix, DVector};

use super::ExpressionError;

// =================================================================================================
// OdeSystem trait
// =================================================================================================

/// First-order system `dy/dt = f(t, y)`
///
/// # Required Methods
///
/// - `dimension`: number of equations `n`
/// - `right_hand_side`: evaluates `f(t, y)`
/// - `name`: human-readable name used in logs and result metadata
///
/// # Provided Methods
///
/// - `jacobian`: `∂f/∂y`, by default approximated with central differences.
///   Implicit solvers call it once per Newton iteration, so systems that
///   know their Jacobian should override it.
///
/// # Thread Safety
///
/// `Send + Sync` so that a system can be shared between independent solves.
/// Implementations must not keep mutable state between evaluations.
///
/// # Example
///
/// ```rust
/// use ode_rs::expression::{ExpressionError, OdeSystem};
/// use nalgebra::DVector;
///
/// /// dy/dt = -k·y
/// struct Decay { rate: f64 }
///
/// impl OdeSystem for Decay {
///     fn dimension(&self) -> usize { 1 }
///
///     fn right_hand_side(&self, _t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
///         Ok(y * -self.rate)
///     }
///
///     fn name(&self) -> &str { "Decay" }
/// }
///
/// let system = Decay { rate: 2.0 };
/// let jacobian = system.jacobian(0.0, &DVector::from_vec(vec![1.0])).unwrap();
/// assert!((jacobian[(0, 0)] + 2.0).abs() < 1e-6);
/// ```
pub trait OdeSystem: Send + Sync {
    /// Number of equations
    fn dimension(&self) -> usize;

    /// Evaluate `f(t, y)`
    fn right_hand_side(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError>;

    /// Evaluate `∂f/∂y` at `(t, y)`
    fn jacobian(&self, t: f64, y: &DVector<f64>) -> Result<DMatrix<f64>, ExpressionError> {
        numerical_jacobian(self, t, y)
    }

    /// System name
    fn name(&self) -> &str;
}

// =================================================================================================
// Finite differences
// =================================================================================================

/// Relative perturbation for central differences
const RELATIVE_STEP: f64 = 1e-6;

/// Smallest absolute perturbation, used around zero components
const MINIMUM_STEP: f64 = 1e-6;

/// Central-difference approximation of `∂f/∂y`
///
/// Column `j` is `(f(t, y + h e_j) - f(t, y - h e_j)) / 2h` with
/// `h = max(1e-6·|y_j|, 1e-6)`. Costs `2n` right-hand side evaluations.
pub fn numerical_jacobian<S>(system: &S, t: f64, y: &DVector<f64>) -> Result<DMatrix<f64>, ExpressionError>
where
    S: OdeSystem + ?Sized,
{
    let n = y.len();
    let mut jacobian = DMatrix::zeros(n, n);

    for j in 0..n {
        let h = (RELATIVE_STEP * y[j].abs()).max(MINIMUM_STEP);

        let mut y_plus = y.clone();
        let mut y_minus = y.clone();
        y_plus[j] += h;
        y_minus[j] -= h;

        let f_plus = system.right_hand_side(t, &y_plus)?;
        let f_minus = system.right_hand_side(t, &y_minus)?;

        if f_plus.len() != n {
            return Err(ExpressionError::InvalidArgument(format!(
                "right-hand side returned {} components for a state of size {n}",
                f_plus.len()
            )));
        }

        jacobian.set_column(j, &((f_plus - f_minus) / (2.0 * h)));
    }

    Ok(jacobian)
}

// =================================================================================================
// Tests
// =================================================================================================
