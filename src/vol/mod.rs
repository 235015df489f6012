//! Module `vol`.
//!
//! Implied-volatility inversion and two-expiry term-structure analytics.
//!
//! Primary API surface: [`implied::implied_vol`] for best-effort Newton
//! inversion with an explicit convergence signal, and the
//! [`forward`] routines for forward-vol and forward-factor derivation.
//!
//! Numerical considerations: volatilities are decimals everywhere in this
//! crate; the solver clamps iterates to one shared band and never raises on
//! non-convergence, while the forward decomposition reports negative forward
//! variance as a distinct, named error instead of clamping it away.

pub mod forward;
pub mod implied;

pub use forward::{ForwardFactorResult, ForwardVolInputs, ForwardVolResult};
pub use implied::{ImpliedVolSolve, SolverConfig};
