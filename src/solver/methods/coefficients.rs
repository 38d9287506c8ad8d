//! Fixed coefficient tables
//!
//! Conventions (index 0 is the leading coefficient):
//!
//! - Adams-Bashforth `β`: `y_n = y_{n-1} + h Σ β_i f_{n-1-i}`
//! - Adams-Moulton `β`: `y_n = y_{n-1} + h (β_0 f_n + Σ β_i f_{n-i})`
//! - BDF `α`: `α_0 y_n − Σ α_i y_{n-i} = h f_n`

/// Adams-Bashforth, 1 to 4 steps
pub static ADAMS_BASHFORTH: [&[f64]; 4] = [
    &[1.0],
    &[3.0 / 2.0, -1.0 / 2.0],
    &[23.0 / 12.0, -16.0 / 12.0, 5.0 / 12.0],
    &[55.0 / 24.0, -59.0 / 24.0, 37.0 / 24.0, -9.0 / 24.0],
];

/// Adams-Moulton, orders 1 (backward Euler) to 5
pub static ADAMS_MOULTON: [&[f64]; 5] = [
    &[1.0, 0.0],
    &[1.0 / 2.0, 1.0 / 2.0],
    &[5.0 / 12.0, 8.0 / 12.0, -1.0 / 12.0],
    &[9.0 / 24.0, 19.0 / 24.0, -5.0 / 24.0, 1.0 / 24.0],
    &[251.0 / 720.0, 646.0 / 720.0, -264.0 / 720.0, 106.0 / 720.0, -19.0 / 720.0],
];

/// BDF, orders 1 to 6
pub static BDF: [&[f64]; 6] = [
    &[1.0, 1.0],
    &[3.0 / 2.0, 2.0, -1.0 / 2.0],
    &[11.0 / 6.0, 3.0, -3.0 / 2.0, 1.0 / 3.0],
    &[25.0 / 12.0, 4.0, -3.0, 4.0 / 3.0, -1.0 / 4.0],
    &[137.0 / 60.0, 5.0, -5.0, 10.0 / 3.0, -5.0 / 4.0, 1.0 / 5.0],
    &[147.0 / 60.0, 6.0, -15.0 / 2.0, 20.0 / 3.0, -15.0 / 4.0, 6.0 / 5.0, -1.0 / 6.0],
];

/// `β` for the `steps`-step Adams-Bashforth method
pub fn adams_bashforth(steps: usize) -> Option<&'static [f64]> {
    steps.checked_sub(1).and_then(|i| ADAMS_BASHFORTH.get(i)).copied()
}

/// `β` for the Adams-Moulton method of the given order
pub fn adams_moulton(order: usize) -> Option<&'static [f64]> {
    order.checked_sub(1).and_then(|i| ADAMS_MOULTON.get(i)).copied()
}

/// `α` for the BDF method of the given order
pub fn bdf(order: usize) -> Option<&'static [f64]> {
    order.checked_sub(1).and_then(|i| BDF.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_adams_weights_sum_to_one() {
        for beta in ADAMS_BASHFORTH.iter().chain(ADAMS_MOULTON.iter()) {
            assert_relative_eq!(beta.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_bdf_consistency() {
        // Constant solutions: α_0 = Σ α_i
        for alpha in BDF.iter() {
            let history: f64 = alpha[1..].iter().sum();
            assert_relative_eq!(alpha[0], history, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_lookup_bounds() {
        assert!(adams_bashforth(0).is_none());
        assert_eq!(adams_bashforth(2).unwrap().len(), 2);
        assert!(adams_bashforth(5).is_none());
        assert_eq!(adams_moulton(1).unwrap(), &[1.0, 0.0]);
        assert_eq!(bdf(6).unwrap().len(), 7);
        assert!(bdf(7).is_none());
    }
}
