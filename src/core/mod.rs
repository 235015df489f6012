//! Core domain types and the library-wide error structure.
//!
//! Everything downstream (pricing kernels, the implied-vol solver, the
//! calendar-spread estimator) speaks in terms of the types defined here:
//! [`OptionType`] for contract side, [`Greeks`] for a structured valuation,
//! and [`AnalyticsError`] for the small set of conditions the analytics
//! surface as errors rather than best-effort values.

use serde::{Deserialize, Serialize};

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

/// Structured valuation of a single European option leg.
///
/// Unit conventions follow listed-equity-options desk practice rather than
/// the raw Black-Scholes partial derivatives:
/// - `theta` is expressed per calendar day (annualized theta / 365),
/// - `vega` is expressed per one percentage point of volatility
///   (raw vega / 100, i.e. value change for a 0.01 move in sigma),
/// - `price` is floored at zero.
///
/// Always produced by [`crate::pricing::european::price_and_greeks`]; never
/// constructed directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Theoretical option value, floored at zero.
    pub price: f64,
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// Value decay per calendar day.
    pub theta: f64,
    /// Value change per percentage point of volatility.
    pub vega: f64,
}

/// Errors surfaced by the analytics API.
///
/// Non-convergence of the implied-volatility solver is deliberately *not*
/// represented here: the solver always answers and reports its convergence
/// state as data ([`crate::vol::implied::ImpliedVolSolve::converged`]).
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Input validation error (non-positive spot/strike, non-finite fields,
    /// malformed sweep ranges).
    InvalidInput(String),
    /// Back expiry is not strictly after the front expiry.
    InvalidTermStructure(String),
    /// The two-expiry variance decomposition produced a negative forward
    /// variance: the front-leg total variance exceeds the back-leg total
    /// variance for the chosen dates. This is a market-data inconsistency,
    /// kept distinct from [`AnalyticsError::InvalidTermStructure`].
    NegativeForwardVariance {
        /// The offending forward-variance value.
        forward_variance: f64,
    },
    /// Numerical issue (degenerate denominator, invalid state).
    NumericalError(String),
}

impl std::fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidTermStructure(msg) => write!(f, "invalid term structure: {msg}"),
            Self::NegativeForwardVariance { forward_variance } => write!(
                f,
                "negative forward variance {forward_variance}: front-leg variance exceeds back-leg variance"
            ),
            Self::NumericalError(msg) => write!(f, "numerical error: {msg}"),
        }
    }
}

impl std::error::Error for AnalyticsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_type_sign() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
    }

    #[test]
    fn error_display_distinguishes_variants() {
        let term =
            AnalyticsError::InvalidTermStructure("back expiry 30d <= front expiry 30d".to_string());
        let var = AnalyticsError::NegativeForwardVariance {
            forward_variance: -0.011,
        };
        assert!(term.to_string().starts_with("invalid term structure"));
        assert!(var.to_string().starts_with("negative forward variance"));
        assert_ne!(term, var);
    }
}
