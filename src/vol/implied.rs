//! Damped Newton-Raphson implied-volatility solver.
//!
//! The solver inverts the Black-Scholes price in sigma using the raw vega as
//! the Newton derivative. Its policy is best-effort: past input validation it
//! never fails, returning its last iterate together with an explicit
//! convergence flag so callers and tests can tell a trustworthy estimate from
//! a saturated fallback. That policy fits the scenario-estimation use case,
//! where a missing answer is worse than an approximate one.
//!
//! Numerical notes: each Newton step is clamped to the configured volatility
//! band, and the iteration stops early when vega degenerates (deep ITM/OTM,
//! short-dated) rather than dividing by a near-zero derivative.

use serde::{Deserialize, Serialize};

use crate::core::{AnalyticsError, OptionType};
use crate::pricing::european::{bs_price, bs_vega};

/// Vega magnitude below which a Newton step is no longer meaningful.
const VEGA_FLOOR: f64 = 1e-8;

/// Tuning knobs for the Newton iteration.
///
/// The defaults encode the crate-wide conventions: a price tolerance of
/// 1e-4 in premium units, a 100-iteration cap, a 30%-vol starting point, and
/// one volatility band `[0.01, 5.0]` applied at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute pricing-error tolerance, in premium currency units.
    pub tol: f64,
    /// Newton iteration cap.
    pub max_iter: usize,
    /// Starting volatility, also the degenerate-input fallback.
    pub initial_guess: f64,
    /// Lower volatility clamp.
    pub min_vol: f64,
    /// Upper volatility clamp.
    pub max_vol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tol: 1e-4,
            max_iter: 100,
            initial_guess: 0.30,
            min_vol: 0.01,
            max_vol: 5.0,
        }
    }
}

/// Tagged solver result.
///
/// `converged` is the quality signal the public contract does not otherwise
/// require: `true` means the repriced premium is within tolerance of the
/// observed one, `false` means the solver gave up (iteration cap, degenerate
/// vega, or degenerate inputs) and `vol` is its best remaining estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolSolve {
    /// Implied volatility as a decimal.
    pub vol: f64,
    /// Whether the pricing error fell below tolerance.
    pub converged: bool,
    /// Newton steps taken before returning.
    pub iterations: usize,
}

/// Solves for implied volatility with the default [`SolverConfig`].
///
/// # Errors
/// Returns [`AnalyticsError::InvalidInput`] for non-finite inputs or
/// non-positive spot/strike. Degenerate-but-representable cases
/// (`expiry <= 0`, `observed_price <= 0`) are not errors: they return the
/// fallback guess with `converged: false`.
///
/// # Examples
/// ```
/// use calvol::core::OptionType;
/// use calvol::pricing::european::bs_price;
/// use calvol::vol::implied::implied_vol;
///
/// let sigma = 0.35;
/// let price = bs_price(OptionType::Call, 100.0, 105.0, 0.02, sigma, 0.5);
/// let solve = implied_vol(OptionType::Call, 100.0, 105.0, 0.02, 0.5, price).unwrap();
/// assert!(solve.converged);
/// assert!((solve.vol - sigma).abs() < 1e-3);
/// ```
pub fn implied_vol(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    observed_price: f64,
) -> Result<ImpliedVolSolve, AnalyticsError> {
    implied_vol_with(
        option_type,
        spot,
        strike,
        rate,
        expiry,
        observed_price,
        &SolverConfig::default(),
    )
}

/// Solves for implied volatility with an explicit [`SolverConfig`].
///
/// See [`implied_vol`] for the contract; this entry point exists for callers
/// that need a tighter tolerance or a different volatility band.
#[allow(clippy::too_many_arguments)]
pub fn implied_vol_with(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    observed_price: f64,
    config: &SolverConfig,
) -> Result<ImpliedVolSolve, AnalyticsError> {
    if !spot.is_finite()
        || !strike.is_finite()
        || !rate.is_finite()
        || !expiry.is_finite()
        || !observed_price.is_finite()
    {
        return Err(AnalyticsError::InvalidInput(
            "implied-vol inputs must be finite".to_string(),
        ));
    }
    if spot <= 0.0 || strike <= 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "implied-vol spot and strike must be > 0".to_string(),
        ));
    }

    // Expired or worthless quotes carry no volatility information.
    if expiry <= 0.0 || observed_price <= 0.0 {
        return Ok(ImpliedVolSolve {
            vol: config.initial_guess,
            converged: false,
            iterations: 0,
        });
    }

    let mut sigma = config.initial_guess;
    for iteration in 0..config.max_iter {
        let price = bs_price(option_type, spot, strike, rate, sigma, expiry);
        let diff = price - observed_price;
        if diff.abs() < config.tol {
            return Ok(ImpliedVolSolve {
                vol: sigma,
                converged: true,
                iterations: iteration,
            });
        }

        let vega = bs_vega(spot, strike, rate, sigma, expiry);
        if vega.abs() < VEGA_FLOOR {
            return Ok(ImpliedVolSolve {
                vol: sigma,
                converged: false,
                iterations: iteration,
            });
        }

        // Newton step in decimal-sigma units; the raw (unscaled) vega is the
        // matching derivative.
        sigma = (sigma - diff / vega).clamp(config.min_vol, config.max_vol);
    }

    Ok(ImpliedVolSolve {
        vol: sigma,
        converged: false,
        iterations: config.max_iter,
    })
}
