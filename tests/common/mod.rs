//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_systems;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_systems::{LinearDecay, Oscillator};
pub use test_helpers::{
    assert_column_close,
    convergence_order,
    relative_error,
    scalar_system,
    vector_system,
};
