//! Helper functions for integration tests

use nalgebra::DVector;
use ode_rs::expression::ExpressionSystem;
use ode_rs::solver::SimulationResult;

/// y1' = t + y2, y2' = sin(t) - y1 with its analytic Jacobian
pub fn vector_system() -> ExpressionSystem {
    ExpressionSystem::from_strs(
        &[&["+1_6_1", "0", "+1_6_1"], &["+1_1_1", "-1_6_1", "0"]],
        Some(&[&["0", "+1_7_1"], &["-1_7_1", "0"]]),
    )
    .unwrap()
}

/// y' = exp(-t) + cos(y) with its analytic Jacobian
pub fn scalar_system() -> ExpressionSystem {
    ExpressionSystem::from_strs(&[&["+1_3_-1", "1_2_1"]], Some(&[&["-1_1_1"]])).unwrap()
}

/// Assert that column `index` of `result` matches `expected`
pub fn assert_column_close(
    result: &SimulationResult,
    index: usize,
    expected: &[f64],
    tolerance: f64,
    message: &str,
) {
    let state = result
        .state(index)
        .unwrap_or_else(|| panic!("{message}: column {index} out of range"));
    let expected = DVector::from_column_slice(expected);

    assert_eq!(state.len(), expected.len(), "{message}: dimension mismatch");
    for (i, (&actual, &wanted)) in state.iter().zip(expected.iter()).enumerate() {
        let diff = (actual - wanted).abs();
        assert!(
            diff < tolerance,
            "{message}: component {i} of column {index} is {actual}, expected {wanted} (diff {diff})"
        );
    }
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Observed order from errors at step sizes h and h/2
pub fn convergence_order(coarse_error: f64, fine_error: f64) -> f64 {
    (coarse_error / fine_error).log2()
}
