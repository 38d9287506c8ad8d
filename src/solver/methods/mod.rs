//! Numerical methods for solving initial-value problems
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Architecture
//!
//! The per-method classes of a classic design are collapsed into data:
//! - **[`MultistepSolver`]** runs Adams-Bashforth, Adams-Moulton and BDF,
//!   selected by a [`MultistepFamily`] tag and a coefficient pair `(α, β)`
//! - **[`RungeKuttaSolver`]** runs any explicit [`ButcherTableau`]
//!
//! Named methods are constructors over fixed tables from [`coefficients`].
//!
//! # Available Methods
//!
//! ## Explicit
//!
//! - **Forward Euler**: [`MultistepSolver::forward_euler`] or [`RungeKuttaSolver::forward_euler`]
//!   - Order 1, one evaluation per step
//! - **Adams-Bashforth 1–4**: [`MultistepSolver::adams_bashforth`]
//!   - Order `k`, one new evaluation per step, needs `k` seed columns
//! - **Runge-Kutta**: [`RungeKuttaSolver::classic_rk4`] or any custom tableau
//!   - Order up to 4 for the presets, `s` evaluations per step
//!
//! ## Implicit
//!
//! - **Backward Euler**: [`MultistepSolver::backward_euler`]
//! - **Adams-Moulton 1–5**: [`MultistepSolver::adams_moulton_order`]
//! - **BDF 1–6**: [`MultistepSolver::bdf_order`]
//!   - The choice for stiff problems
//!
//! # Seeding
//!
//! Multistep methods need `history_len()` initial columns.
//! [`bootstrap_history`] produces them from a single state with RK4.
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Self-contained**: No shared mutable state
//! - **Stateless**: Can be reused for multiple simulations
//! - **Deterministic**: the same inputs give bit-identical tables

pub mod coefficients;
mod multistep;
mod runge_kutta;
mod startup;

// Re-exports for convenience
pub use multistep::{MultistepFamily, MultistepSolver};
pub use runge_kutta::{ButcherTableau, RungeKuttaSolver};
pub use startup::bootstrap_history;
