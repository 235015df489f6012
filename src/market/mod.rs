//! Market-facing value types and calendar/day-count helpers.
//!
//! [`OptionQuote`] is the canonical input for the Black-Scholes surface: one
//! fully-specified European leg (side, spot, strike, expiry, rate, vol).
//! Validation lives here so the closed-form kernels can stay unvalidated
//! arithmetic; non-positive spot or strike is rejected before it reaches a
//! formula and turns into `NaN`.
//!
//! Expiries arrive from the consuming layer either as whole-day counts (DTE)
//! or as calendar dates. Dates are reduced to whole-day differences and then
//! to Act/365F year fractions; the 365-day year is the convention used by
//! every routine in this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{AnalyticsError, OptionType};

/// Calendar days per year under the Act/365F convention used throughout.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Fully-specified European option leg.
///
/// Volatility and rate are decimals (`0.30` = 30%); `expiry` is a year
/// fraction. `expiry == 0` is accepted and prices at intrinsic value.
///
/// # Examples
/// ```
/// use calvol::market::OptionQuote;
///
/// let quote = OptionQuote::call(100.0, 105.0, 30.0 / 365.0, 0.05, 0.32);
/// assert!(quote.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Call or put.
    pub option_type: OptionType,
    /// Current underlying price.
    pub spot: f64,
    /// Strike level.
    pub strike: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Annualized volatility as a decimal.
    pub vol: f64,
}

impl OptionQuote {
    /// Builds a call quote.
    pub fn call(spot: f64, strike: f64, expiry: f64, rate: f64, vol: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            spot,
            strike,
            expiry,
            rate,
            vol,
        }
    }

    /// Builds a put quote.
    pub fn put(spot: f64, strike: f64, expiry: f64, rate: f64, vol: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            spot,
            strike,
            expiry,
            rate,
            vol,
        }
    }

    /// Validates quote fields.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::InvalidInput`] when:
    /// - any field is non-finite
    /// - `spot <= 0` or `strike <= 0`
    /// - `expiry < 0` or `vol < 0`
    ///
    /// `expiry == 0` and `vol == 0` are accepted; both collapse the pricer to
    /// its intrinsic-value limits.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.spot.is_finite()
            || !self.strike.is_finite()
            || !self.expiry.is_finite()
            || !self.rate.is_finite()
            || !self.vol.is_finite()
        {
            return Err(AnalyticsError::InvalidInput(
                "option quote fields must be finite".to_string(),
            ));
        }
        if self.spot <= 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "option spot must be > 0".to_string(),
            ));
        }
        if self.strike <= 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "option strike must be > 0".to_string(),
            ));
        }
        if self.expiry < 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "option expiry must be >= 0".to_string(),
            ));
        }
        if self.vol < 0.0 {
            return Err(AnalyticsError::InvalidInput(
                "option vol must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whole calendar days from `today` to `expiry`.
///
/// Negative when the expiry is in the past; the caller decides whether that
/// is an error or an intrinsic-value case.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use calvol::market::dte_between;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let expiry = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
/// assert_eq!(dte_between(today, expiry), 30);
/// ```
pub fn dte_between(today: NaiveDate, expiry: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Converts a days-to-expiry count to an Act/365F year fraction.
///
/// Negative day counts clamp to zero: an expired contract is priced at its
/// intrinsic value, not extrapolated backwards in time.
pub fn years_from_dte(dte: f64) -> f64 {
    dte.max(0.0) / DAYS_PER_YEAR
}

/// Act/365F year fraction between two dates, clamped at zero.
pub fn years_between(today: NaiveDate, expiry: NaiveDate) -> f64 {
    years_from_dte(dte_between(today, expiry) as f64)
}
