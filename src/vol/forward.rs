//! Module `vol::forward`.
//!
//! Forward volatility between two expiries and the forward-factor richness
//! metric used by calendar-spread and earnings-volatility screens.
//!
//! The decomposition treats total variance as additive in time: the variance
//! implied for the interval strictly between a front and a back expiry is
//! what remains of the back-leg total variance after subtracting the
//! front-leg total variance,
//! `V = (sigma2^2 * T2 - sigma1^2 * T1) / (T2 - T1)`.
//!
//! Error taxonomy (deliberately two distinct conditions):
//! - a non-increasing term structure (`T2 <= T1`) is an invalid input,
//! - a negative forward variance is a *market-data* inconsistency (the
//!   front IV is too rich relative to the back IV for any valid forward
//!   decomposition) and is reported as its own variant, never silently
//!   clamped to zero.

use serde::{Deserialize, Serialize};

use crate::core::{AnalyticsError, OptionType};
use crate::market::years_from_dte;
use crate::vol::implied::{ImpliedVolSolve, implied_vol};

/// Inputs for the price-driven forward-vol entry point.
///
/// Day counts are calendar days to each expiry; observed prices are leg
/// premiums in currency units. The two legs share spot and rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardVolInputs {
    /// Call or put (both legs are the same side in a calendar structure).
    pub option_type: OptionType,
    /// Current underlying price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Front-leg strike.
    pub front_strike: f64,
    /// Back-leg strike.
    pub back_strike: f64,
    /// Front-leg observed premium.
    pub front_price: f64,
    /// Back-leg observed premium.
    pub back_price: f64,
    /// Calendar days to the front expiry.
    pub front_dte: f64,
    /// Calendar days to the back expiry.
    pub back_dte: f64,
}

/// Forward-vol decomposition with the per-leg implied vols that fed it.
///
/// All volatilities are decimals (`0.35` = 35%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardVolResult {
    /// Front-leg implied volatility.
    pub front_iv: f64,
    /// Back-leg implied volatility.
    pub back_iv: f64,
    /// Volatility implied for the interval between the two expiries.
    pub forward_vol: f64,
    /// Convergence state of the front-leg solve.
    pub front_solve: ImpliedVolSolve,
    /// Convergence state of the back-leg solve.
    pub back_solve: ImpliedVolSolve,
}

/// Forward-factor richness metric for a two-expiry term structure.
///
/// `forward_factor` is a decimal ratio (`0.209` = 20.9%); how to band it into
/// trade signals is presentation policy and stays out of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardFactorResult {
    /// Volatility implied for the inter-expiry interval.
    pub forward_vol: f64,
    /// `(front_iv - forward_vol) / forward_vol`.
    pub forward_factor: f64,
    /// Calendar days to the front expiry.
    pub front_dte: f64,
    /// Calendar days to the back expiry.
    pub back_dte: f64,
}

/// Forward volatility between two expiries from their implied vols.
///
/// Expiries are year fractions; `back_years` must be strictly greater than
/// `front_years`.
///
/// # Errors
/// - [`AnalyticsError::InvalidInput`] for non-finite or negative inputs.
/// - [`AnalyticsError::InvalidTermStructure`] when `back_years <= front_years`.
/// - [`AnalyticsError::NegativeForwardVariance`] when the front-leg total
///   variance exceeds the back-leg total variance.
///
/// # Examples
/// ```
/// use calvol::vol::forward::forward_vol_from_ivs;
///
/// // 35% for 30 days against 40% for 60 days implies an elevated forward.
/// let fwd = forward_vol_from_ivs(0.35, 30.0 / 365.0, 0.40, 60.0 / 365.0).unwrap();
/// assert!((fwd - 0.442).abs() < 5e-3);
/// ```
pub fn forward_vol_from_ivs(
    front_iv: f64,
    front_years: f64,
    back_iv: f64,
    back_years: f64,
) -> Result<f64, AnalyticsError> {
    if !front_iv.is_finite() || !back_iv.is_finite() || !front_years.is_finite() || !back_years.is_finite()
    {
        return Err(AnalyticsError::InvalidInput(
            "forward-vol inputs must be finite".to_string(),
        ));
    }
    if front_iv < 0.0 || back_iv < 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "implied volatilities must be >= 0".to_string(),
        ));
    }
    if front_years < 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "front expiry must be >= 0 years".to_string(),
        ));
    }
    if back_years <= front_years {
        return Err(AnalyticsError::InvalidTermStructure(format!(
            "back expiry ({back_years:.6}y) must be strictly after front expiry ({front_years:.6}y)"
        )));
    }

    let forward_variance =
        (back_iv * back_iv * back_years - front_iv * front_iv * front_years) / (back_years - front_years);
    if forward_variance < 0.0 {
        return Err(AnalyticsError::NegativeForwardVariance { forward_variance });
    }

    Ok(forward_variance.sqrt())
}

/// Forward volatility between two expiries from observed leg premiums.
///
/// Each leg's implied vol is first recovered with the best-effort Newton
/// solver (see [`crate::vol::implied`]); the decomposition and error policy
/// then match [`forward_vol_from_ivs`]. The per-leg solve states are passed
/// through so a stricter caller can reject non-converged legs.
///
/// # Errors
/// As [`forward_vol_from_ivs`], plus [`AnalyticsError::InvalidInput`] when
/// spot or either strike is non-positive.
pub fn forward_vol_from_prices(inputs: &ForwardVolInputs) -> Result<ForwardVolResult, AnalyticsError> {
    if inputs.back_dte <= inputs.front_dte {
        return Err(AnalyticsError::InvalidTermStructure(format!(
            "back expiry ({} DTE) must be strictly after front expiry ({} DTE)",
            inputs.back_dte, inputs.front_dte
        )));
    }

    let front_years = years_from_dte(inputs.front_dte);
    let back_years = years_from_dte(inputs.back_dte);

    let front_solve = implied_vol(
        inputs.option_type,
        inputs.spot,
        inputs.front_strike,
        inputs.rate,
        front_years,
        inputs.front_price,
    )?;
    let back_solve = implied_vol(
        inputs.option_type,
        inputs.spot,
        inputs.back_strike,
        inputs.rate,
        back_years,
        inputs.back_price,
    )?;

    let forward_vol = forward_vol_from_ivs(front_solve.vol, front_years, back_solve.vol, back_years)?;

    Ok(ForwardVolResult {
        front_iv: front_solve.vol,
        back_iv: back_solve.vol,
        forward_vol,
        front_solve,
        back_solve,
    })
}

/// Forward factor for a two-expiry term structure.
///
/// A pure function of two implied vols and two day counts; no option prices
/// are involved. Positive values mean the front-month IV is rich relative to
/// the market's own forward-implied volatility.
///
/// # Errors
/// As [`forward_vol_from_ivs`], plus [`AnalyticsError::NumericalError`] when
/// the forward volatility is zero and the ratio is undefined.
///
/// # Examples
/// ```
/// use calvol::vol::forward::forward_factor;
///
/// let result = forward_factor(0.35, 30.0, 0.40, 60.0).unwrap();
/// // Front IV below the forward vol: an unfavorable (negative) factor.
/// assert!(result.forward_factor < 0.0);
/// ```
pub fn forward_factor(
    front_iv: f64,
    front_dte: f64,
    back_iv: f64,
    back_dte: f64,
) -> Result<ForwardFactorResult, AnalyticsError> {
    if back_dte <= front_dte {
        return Err(AnalyticsError::InvalidTermStructure(format!(
            "back expiry ({back_dte} DTE) must be strictly after front expiry ({front_dte} DTE)"
        )));
    }

    let forward_vol = forward_vol_from_ivs(
        front_iv,
        years_from_dte(front_dte),
        back_iv,
        years_from_dte(back_dte),
    )?;
    if forward_vol <= 0.0 {
        return Err(AnalyticsError::NumericalError(
            "forward volatility is zero; forward factor is undefined".to_string(),
        ));
    }

    Ok(ForwardFactorResult {
        forward_vol,
        forward_factor: (front_iv - forward_vol) / forward_vol,
        front_dte,
        back_dte,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::european::bs_price;
    use approx::assert_relative_eq;

    #[test]
    fn forward_vol_worked_example() {
        // 35% front (30d) vs 40% back (60d): forward variance
        // (0.16 * 0.1644 - 0.1225 * 0.0822) / 0.0822 ~= 0.1975.
        let t1 = 30.0 / 365.0;
        let t2 = 60.0 / 365.0;
        let fwd = forward_vol_from_ivs(0.35, t1, 0.40, t2).unwrap();
        assert_relative_eq!(fwd, 0.1975_f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fwd, 0.4444, epsilon = 1e-4);
    }

    #[test]
    fn rich_front_iv_reports_negative_forward_variance() {
        // Front variance dominates: 0.36 * T1 > 0.25 * T2 / 2 style setup.
        let t1 = 30.0 / 365.0;
        let t2 = 60.0 / 365.0;
        let err = forward_vol_from_ivs(0.60, t1, 0.50, t2).unwrap_err();
        match err {
            AnalyticsError::NegativeForwardVariance { forward_variance } => {
                assert!(forward_variance < 0.0)
            }
            other => panic!("expected negative forward variance, got {other:?}"),
        }
    }

    #[test]
    fn non_increasing_term_structure_is_rejected() {
        let t = 30.0 / 365.0;
        assert!(matches!(
            forward_vol_from_ivs(0.35, t, 0.40, t),
            Err(AnalyticsError::InvalidTermStructure(_))
        ));
        assert!(matches!(
            forward_factor(0.35, 60.0, 0.40, 30.0),
            Err(AnalyticsError::InvalidTermStructure(_))
        ));
    }

    #[test]
    fn flat_term_structure_has_flat_forward_vol() {
        let fwd = forward_vol_from_ivs(0.25, 0.25, 0.25, 1.0).unwrap();
        assert_relative_eq!(fwd, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn forward_factor_worked_example() {
        let result = forward_factor(0.35, 30.0, 0.40, 60.0).unwrap();
        assert_relative_eq!(result.forward_vol, 0.4444, epsilon = 1e-4);
        assert_relative_eq!(result.forward_factor, (0.35 - result.forward_vol) / result.forward_vol, epsilon = 1e-12);
        assert!(result.forward_factor < -0.20 && result.forward_factor > -0.22);
        assert_eq!(result.front_dte, 30.0);
        assert_eq!(result.back_dte, 60.0);
    }

    #[test]
    fn elevated_front_iv_yields_positive_factor() {
        // Earnings setup: front month bid up against a quieter back month,
        // but not so far that the forward decomposition breaks.
        let result = forward_factor(0.55, 14.0, 0.45, 45.0).unwrap();
        assert!(result.forward_factor > 0.0);
    }

    #[test]
    fn price_driven_entry_point_matches_iv_driven() {
        let spot = 200.0;
        let strike = 200.0;
        let rate = 0.04;
        let front_dte = 30.0;
        let back_dte = 60.0;
        let front_sigma = 0.35;
        let back_sigma = 0.40;

        let inputs = ForwardVolInputs {
            option_type: OptionType::Call,
            spot,
            rate,
            front_strike: strike,
            back_strike: strike,
            front_price: bs_price(OptionType::Call, spot, strike, rate, front_sigma, front_dte / 365.0),
            back_price: bs_price(OptionType::Call, spot, strike, rate, back_sigma, back_dte / 365.0),
            front_dte,
            back_dte,
        };

        let result = forward_vol_from_prices(&inputs).unwrap();
        assert!(result.front_solve.converged && result.back_solve.converged);
        assert_relative_eq!(result.front_iv, front_sigma, epsilon = 1e-3);
        assert_relative_eq!(result.back_iv, back_sigma, epsilon = 1e-3);

        let direct = forward_vol_from_ivs(
            result.front_iv,
            front_dte / 365.0,
            result.back_iv,
            back_dte / 365.0,
        )
        .unwrap();
        assert_relative_eq!(result.forward_vol, direct, epsilon = 1e-12);
    }

    #[test]
    fn price_driven_entry_point_rejects_bad_term_structure() {
        let inputs = ForwardVolInputs {
            option_type: OptionType::Put,
            spot: 100.0,
            rate: 0.02,
            front_strike: 100.0,
            back_strike: 100.0,
            front_price: 3.0,
            back_price: 4.0,
            front_dte: 45.0,
            back_dte: 45.0,
        };
        assert!(matches!(
            forward_vol_from_prices(&inputs),
            Err(AnalyticsError::InvalidTermStructure(_))
        ));
    }
}
