//! Hand-written systems with closed-form solutions

use nalgebra::{DMatrix, DVector};
use ode_rs::expression::{ExpressionError, OdeSystem};

/// y' = λ·y, y(t) = y0·exp(λt)
pub struct LinearDecay {
    pub rate: f64,
}

impl LinearDecay {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn exact(&self, y0: f64, t: f64) -> f64 {
        y0 * (self.rate * t).exp()
    }
}

impl OdeSystem for LinearDecay {
    fn dimension(&self) -> usize {
        1
    }

    fn right_hand_side(&self, _t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
        Ok(y * self.rate)
    }

    fn jacobian(&self, _t: f64, _y: &DVector<f64>) -> Result<DMatrix<f64>, ExpressionError> {
        Ok(DMatrix::from_element(1, 1, self.rate))
    }

    fn name(&self) -> &str {
        "LinearDecay"
    }
}

/// x' = v, v' = -ω²·x, no analytic Jacobian
pub struct Oscillator {
    pub omega: f64,
}

impl Oscillator {
    /// Exact state from x(0) = 1, v(0) = 0
    pub fn exact(&self, t: f64) -> DVector<f64> {
        DVector::from_vec(vec![(self.omega * t).cos(), -self.omega * (self.omega * t).sin()])
    }
}

impl OdeSystem for Oscillator {
    fn dimension(&self) -> usize {
        2
    }

    fn right_hand_side(&self, _t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
        Ok(DVector::from_vec(vec![y[1], -self.omega * self.omega * y[0]]))
    }

    fn name(&self) -> &str {
        "Oscillator"
    }
}
