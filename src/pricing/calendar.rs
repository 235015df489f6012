//! Module `pricing::calendar`.
//!
//! Scenario/P&L estimation for two-leg calendar spreads: short the front
//! expiry, long the back expiry, same strike and side.
//!
//! The estimator composes the implied-vol solver and the Black-Scholes
//! surface: each leg's current IV is recovered from its observed premium at
//! the current underlying, then both legs are revalued at a hypothetical
//! underlying under either the solved IVs ("current-IV" mode) or
//! caller-supplied targets ("target-IV" mode, e.g. post-earnings
//! vol normalization), optionally advancing the clock first. The sweep
//! generator repeats the estimate across a percent-change grid to produce a
//! P&L curve.
//!
//! The reference mark for P&L is the spread revalued at the *current*
//! underlying with the solved IVs and no time advance, so a no-move,
//! no-override scenario prices to exactly zero P&L by construction. Whether
//! "current" means trade entry or last mark is the caller's decision; this
//! module only computes the delta between the two valuation points it is
//! given.

use serde::{Deserialize, Serialize};

use crate::core::{AnalyticsError, Greeks, OptionType};
use crate::market::{OptionQuote, years_from_dte};
use crate::pricing::european::price_and_greeks;
use crate::vol::implied::implied_vol;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One-contract share multiplier for listed equity options.
const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Static definition of a calendar spread: same strike and side, two
/// expiries, a signed-size-free quantity (spreads, not shares).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarSpread {
    /// Call or put (both legs).
    pub option_type: OptionType,
    /// Shared strike.
    pub strike: f64,
    /// Calendar days to the front (short) expiry.
    pub front_dte: f64,
    /// Calendar days to the back (long) expiry.
    pub back_dte: f64,
    /// Number of spreads.
    pub quantity: f64,
}

impl CalendarSpread {
    /// Validates the spread definition.
    ///
    /// # Errors
    /// - [`AnalyticsError::InvalidInput`] for non-finite fields or a
    ///   non-positive strike.
    /// - [`AnalyticsError::InvalidTermStructure`] when the back expiry is not
    ///   strictly after the front expiry.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.strike.is_finite()
            || !self.front_dte.is_finite()
            || !self.back_dte.is_finite()
            || !self.quantity.is_finite()
        {
            return Err(AnalyticsError::InvalidInput(
                "calendar spread fields must be finite".to_string(),
            ));
        }
        if self.strike <= 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "calendar spread strike must be > 0".to_string(),
            ));
        }
        if self.back_dte <= self.front_dte {
            return Err(AnalyticsError::InvalidTermStructure(format!(
                "back expiry ({} DTE) must be strictly after front expiry ({} DTE)",
                self.back_dte, self.front_dte
            )));
        }
        Ok(())
    }
}

/// Market snapshot for a spread: current underlying, rate, and the two
/// observed leg premiums the IV solves run against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadMarket {
    /// Current underlying price.
    pub underlying: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Observed front-leg premium.
    pub front_price: f64,
    /// Observed back-leg premium.
    pub back_price: f64,
}

impl SpreadMarket {
    fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.underlying.is_finite()
            || !self.rate.is_finite()
            || !self.front_price.is_finite()
            || !self.back_price.is_finite()
        {
            return Err(AnalyticsError::InvalidInput(
                "spread market fields must be finite".to_string(),
            ));
        }
        if self.underlying <= 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "spread market underlying must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fully-enumerated scenario options.
///
/// The default is "current-IV" mode: both legs keep the IV solved from their
/// observed premiums and the clock does not move. Supplying a target IV for a
/// leg overrides its solved value (vol-normalization scenarios); a positive
/// `days_forward` advances both legs toward expiry before revaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioOptions {
    /// Calendar days to advance before revaluing (0 = revalue today).
    pub days_forward: f64,
    /// Override for the front leg's IV, as a decimal.
    pub front_target_iv: Option<f64>,
    /// Override for the back leg's IV, as a decimal.
    pub back_target_iv: Option<f64>,
}

/// Spread valuation at one hypothetical underlying.
///
/// Spread quantities are always `back - front`: the structure is long the
/// back leg and short the front leg. Greek fields inherit the per-day theta
/// and per-vol-point vega conventions of [`Greeks`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarSpreadEstimate {
    /// Front-leg value at the scenario point.
    pub front_price: f64,
    /// Back-leg value at the scenario point.
    pub back_price: f64,
    /// `back_price - front_price`.
    pub spread_price: f64,
    /// Net delta, `back - front`.
    pub spread_delta: f64,
    /// Net gamma, `back - front`.
    pub spread_gamma: f64,
    /// Net theta per calendar day, `back - front`.
    pub spread_theta: f64,
    /// Net vega per vol point, `back - front`.
    pub spread_vega: f64,
    /// `(scenario spread - current spread) * quantity * 100`.
    pub estimated_pnl: f64,
    /// Underlying move in currency units.
    pub price_change: f64,
    /// Underlying move as a percentage of the current underlying.
    pub price_change_pct: f64,
    /// Front-leg IV used at the scenario point (solved or target).
    pub front_iv: f64,
    /// Back-leg IV used at the scenario point (solved or target).
    pub back_iv: f64,
}

/// Percent-change grid for the scenario sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    /// Lowest percent change (inclusive).
    pub min_pct: f64,
    /// Highest percent change (inclusive).
    pub max_pct: f64,
    /// Grid step in percent.
    pub step_pct: f64,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            min_pct: -15.0,
            max_pct: 15.0,
            step_pct: 1.0,
        }
    }
}

impl SweepRange {
    fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.min_pct.is_finite() || !self.max_pct.is_finite() || !self.step_pct.is_finite() {
            return Err(AnalyticsError::InvalidInput(
                "sweep range fields must be finite".to_string(),
            ));
        }
        if self.step_pct <= 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "sweep step must be > 0".to_string(),
            ));
        }
        if self.max_pct < self.min_pct {
            return Err(AnalyticsError::InvalidInput(
                "sweep max must be >= min".to_string(),
            ));
        }
        if self.min_pct <= -100.0 {
            return Err(AnalyticsError::InvalidInput(
                "sweep min must keep the underlying positive (> -100%)".to_string(),
            ));
        }
        Ok(())
    }

    /// Grid points by integer index, so regeneration is drift-free and
    /// bit-identical for identical inputs.
    fn percents(&self) -> Vec<f64> {
        let steps = ((self.max_pct - self.min_pct) / self.step_pct + 1e-9).floor() as usize;
        (0..=steps)
            .map(|i| self.min_pct + i as f64 * self.step_pct)
            .collect()
    }
}

/// One point of the P&L sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    /// Percent change from the current underlying.
    pub pct_change: f64,
    /// Hypothetical underlying at this point.
    pub underlying_price: f64,
    /// Spread valuation at this point.
    pub estimate: CalendarSpreadEstimate,
}

/// Per-leg IVs solved from the observed premiums, with the valuation of the
/// spread at the current underlying that anchors P&L.
struct SpreadMark {
    front_iv: f64,
    back_iv: f64,
    current_spread: f64,
}

fn solve_mark(spread: &CalendarSpread, market: &SpreadMarket) -> Result<SpreadMark, AnalyticsError> {
    let front_years = years_from_dte(spread.front_dte);
    let back_years = years_from_dte(spread.back_dte);

    let front_iv = implied_vol(
        spread.option_type,
        market.underlying,
        spread.strike,
        market.rate,
        front_years,
        market.front_price,
    )?
    .vol;
    let back_iv = implied_vol(
        spread.option_type,
        market.underlying,
        spread.strike,
        market.rate,
        back_years,
        market.back_price,
    )?
    .vol;

    let current_front = leg_greeks(spread, market, market.underlying, front_years, front_iv)?;
    let current_back = leg_greeks(spread, market, market.underlying, back_years, back_iv)?;

    Ok(SpreadMark {
        front_iv,
        back_iv,
        current_spread: current_back.price - current_front.price,
    })
}

fn leg_greeks(
    spread: &CalendarSpread,
    market: &SpreadMarket,
    underlying: f64,
    years: f64,
    iv: f64,
) -> Result<Greeks, AnalyticsError> {
    price_and_greeks(&OptionQuote {
        option_type: spread.option_type,
        spot: underlying,
        strike: spread.strike,
        expiry: years,
        rate: market.rate,
        vol: iv,
    })
}

/// Values the spread at a hypothetical underlying.
///
/// Steps: solve each leg's IV from its observed premium at the current
/// underlying, apply any target-IV overrides, advance the clock by
/// `days_forward`, revalue both legs at `new_underlying`, and net the
/// results `back - front`. P&L is the spread-value change from the current
/// mark times `quantity` times the 100-share contract multiplier.
///
/// # Errors
/// - [`AnalyticsError::InvalidInput`] for non-finite or non-positive
///   underlying/strike inputs, or negative target IVs.
/// - [`AnalyticsError::InvalidTermStructure`] when the spread's back expiry
///   is not strictly after its front expiry.
///
/// # Examples
/// ```
/// use calvol::core::OptionType;
/// use calvol::pricing::calendar::{CalendarSpread, ScenarioOptions, SpreadMarket, estimate};
///
/// let spread = CalendarSpread {
///     option_type: OptionType::Call,
///     strike: 100.0,
///     front_dte: 30.0,
///     back_dte: 60.0,
///     quantity: 1.0,
/// };
/// let market = SpreadMarket {
///     underlying: 100.0,
///     rate: 0.05,
///     front_price: 4.0,
///     back_price: 6.0,
/// };
///
/// // No move, current IVs, no time advance: P&L is exactly zero.
/// let flat = estimate(&spread, &market, 100.0, &ScenarioOptions::default()).unwrap();
/// assert_eq!(flat.estimated_pnl, 0.0);
/// ```
pub fn estimate(
    spread: &CalendarSpread,
    market: &SpreadMarket,
    new_underlying: f64,
    options: &ScenarioOptions,
) -> Result<CalendarSpreadEstimate, AnalyticsError> {
    spread.validate()?;
    market.validate()?;
    if !new_underlying.is_finite() || new_underlying <= 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "scenario underlying must be finite and > 0".to_string(),
        ));
    }
    if !options.days_forward.is_finite() || options.days_forward < 0.0 {
        return Err(AnalyticsError::InvalidInput(
            "days_forward must be finite and >= 0".to_string(),
        ));
    }
    for target in [options.front_target_iv, options.back_target_iv].into_iter().flatten() {
        if !target.is_finite() || target < 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "target IVs must be finite and >= 0".to_string(),
            ));
        }
    }

    let mark = solve_mark(spread, market)?;

    let front_iv = options.front_target_iv.unwrap_or(mark.front_iv);
    let back_iv = options.back_target_iv.unwrap_or(mark.back_iv);
    let front_years = years_from_dte(spread.front_dte - options.days_forward);
    let back_years = years_from_dte(spread.back_dte - options.days_forward);

    let front = leg_greeks(spread, market, new_underlying, front_years, front_iv)?;
    let back = leg_greeks(spread, market, new_underlying, back_years, back_iv)?;

    let spread_price = back.price - front.price;
    let price_change = new_underlying - market.underlying;

    Ok(CalendarSpreadEstimate {
        front_price: front.price,
        back_price: back.price,
        spread_price,
        spread_delta: back.delta - front.delta,
        spread_gamma: back.gamma - front.gamma,
        spread_theta: back.theta - front.theta,
        spread_vega: back.vega - front.vega,
        estimated_pnl: (spread_price - mark.current_spread) * spread.quantity * CONTRACT_MULTIPLIER,
        price_change,
        price_change_pct: price_change / market.underlying * 100.0,
        front_iv,
        back_iv,
    })
}

/// Sweeps the estimator across a percent-change grid of underlying prices.
///
/// Produces one [`ScenarioPoint`] per grid point, ordered from `min_pct` to
/// `max_pct`. The sweep is a pure function of its inputs: no state is kept
/// between points and regenerating with identical inputs yields an identical
/// sequence. With the `parallel` feature the grid evaluates on the rayon
/// pool; ordering and values are unchanged.
///
/// # Errors
/// As [`estimate`], plus [`AnalyticsError::InvalidInput`] for a malformed
/// range (non-positive step, inverted bounds, `min_pct <= -100`).
pub fn scenario_sweep(
    spread: &CalendarSpread,
    market: &SpreadMarket,
    range: &SweepRange,
    options: &ScenarioOptions,
) -> Result<Vec<ScenarioPoint>, AnalyticsError> {
    range.validate()?;
    let percents = range.percents();

    let point = |pct: f64| -> Result<ScenarioPoint, AnalyticsError> {
        let underlying_price = market.underlying * (1.0 + pct / 100.0);
        Ok(ScenarioPoint {
            pct_change: pct,
            underlying_price,
            estimate: estimate(spread, market, underlying_price, options)?,
        })
    };

    #[cfg(feature = "parallel")]
    {
        percents.par_iter().map(|&pct| point(pct)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        percents.iter().map(|&pct| point(pct)).collect()
    }
}
