//! Module `pricing::european`.
//!
//! Closed-form Black-Scholes price and Greeks for European spot options with
//! zero dividend yield.
//!
//! The scalar kernels (`bs_price`, `bs_delta`, ...) are unvalidated
//! arithmetic with explicit edge-case limits; [`price_and_greeks`] is the
//! validated surface that rejects degenerate inputs and applies the crate's
//! unit conventions (per-day theta, per-vol-point vega, zero-floored price).
//!
//! References: Hull (11th ed.) Ch. 13 and 19 for the pricing and Greek
//! formulas and their expiry limits.
//!
//! Numerical considerations: `expiry <= 0` and `vol <= 0` are handled by
//! early return before either can reach the `sigma * sqrt(T)` denominator in
//! `d1`.

use crate::core::{AnalyticsError, Greeks, OptionType};
use crate::market::{DAYS_PER_YEAR, OptionQuote};
use crate::math::{normal_cdf, normal_pdf};

#[inline]
fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Expiry-limit delta: the step function the Black-Scholes delta converges
/// to as `sigma * sqrt(T) -> 0`, with 0.5 on the at-the-money boundary.
#[inline]
fn limit_delta(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    let call_step = if spot > strike {
        1.0
    } else if spot < strike {
        0.0
    } else {
        0.5
    };
    match option_type {
        OptionType::Call => call_step,
        OptionType::Put => call_step - 1.0,
    }
}

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes option price.
///
/// Edge cases: `expiry <= 0` returns intrinsic value; `vol <= 0` returns the
/// discounted-forward intrinsic value `max(+/-(S - K*e^{-rT}), 0)`.
#[inline]
pub fn bs_price(option_type: OptionType, spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 {
        return intrinsic(option_type, spot, strike);
    }
    let df = (-rate * expiry).exp();
    if vol <= 0.0 {
        return intrinsic(option_type, spot, strike * df);
    }

    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// Black-Scholes delta: `N(d1)` for calls, `N(d1) - 1` for puts.
///
/// At `expiry <= 0` or `vol <= 0` delta collapses to the limiting step
/// function (on spot-vs-strike at expiry, on forward moneyness for zero vol).
#[inline]
pub fn bs_delta(option_type: OptionType, spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 {
        return limit_delta(option_type, spot, strike);
    }
    if vol <= 0.0 {
        return limit_delta(option_type, spot, strike * (-rate * expiry).exp());
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    }
}

/// Black-Scholes gamma `n(d1) / (S * sigma * sqrt(T))`, identical for calls
/// and puts. Zero in the expiry and zero-vol limits.
#[inline]
pub fn bs_gamma(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

/// Annualized Black-Scholes theta. Zero in the expiry and zero-vol limits.
///
/// The sign of the `r*K*e^{-rT}*N(+/-d2)` term differs between calls and
/// puts; callers wanting per-day decay divide by 365
/// ([`price_and_greeks`] does).
#[inline]
pub fn bs_theta(option_type: OptionType, spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let decay = -spot * normal_pdf(d1) * vol / (2.0 * expiry.sqrt());
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => decay - rate * strike * df * normal_cdf(d2),
        OptionType::Put => decay + rate * strike * df * normal_cdf(-d2),
    }
}

/// Raw Black-Scholes vega `S * sqrt(T) * n(d1)`, per unit change in sigma.
///
/// This is the vega the Newton implied-vol step divides by; the structured
/// [`Greeks`] surface rescales it to per-percentage-point units.
#[inline]
pub fn bs_vega(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    spot * expiry.sqrt() * normal_pdf(d1)
}

/// Prices a quote and assembles its structured Greeks.
///
/// This is the validated boundary in front of the closed-form kernels:
/// non-positive spot/strike and non-finite fields are rejected here instead
/// of propagating as `NaN`.
///
/// Output conventions (see [`Greeks`]): price floored at zero, theta per
/// calendar day, vega per percentage point of volatility.
///
/// # Errors
/// Returns [`AnalyticsError::InvalidInput`] when [`OptionQuote::validate`]
/// rejects the quote.
///
/// # Examples
/// ```
/// use calvol::market::OptionQuote;
/// use calvol::pricing::european::price_and_greeks;
///
/// let quote = OptionQuote::call(100.0, 100.0, 1.0, 0.05, 0.20);
/// let greeks = price_and_greeks(&quote).unwrap();
/// assert!(greeks.price > 10.0 && greeks.price < 11.0);
/// assert!(greeks.delta > 0.5 && greeks.delta < 0.7);
/// assert!(greeks.theta < 0.0);
/// ```
pub fn price_and_greeks(quote: &OptionQuote) -> Result<Greeks, AnalyticsError> {
    quote.validate()?;

    let OptionQuote {
        option_type,
        spot,
        strike,
        expiry,
        rate,
        vol,
    } = *quote;

    Ok(Greeks {
        price: bs_price(option_type, spot, strike, rate, vol, expiry).max(0.0),
        delta: bs_delta(option_type, spot, strike, rate, vol, expiry),
        gamma: bs_gamma(spot, strike, rate, vol, expiry),
        theta: bs_theta(option_type, spot, strike, rate, vol, expiry) / DAYS_PER_YEAR,
        vega: bs_vega(spot, strike, rate, vol, expiry) / 100.0,
    })
}
