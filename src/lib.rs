//! Calvol is the option-pricing and volatility-analytics core behind a
//! calendar-spread and earnings-volatility trading workflow: Black-Scholes
//! pricing and Greeks, implied-volatility extraction, forward-volatility and
//! forward-factor derivation from a two-expiry term structure, and a
//! calendar-spread scenario/P&L estimator with a grid sweep generator.
//!
//! The crate is deliberately presentation-free: it consumes plain numbers
//! (spot, strikes, premiums, day counts or `chrono` dates) and produces
//! plain serde-serializable result structs. Formatting, banding into trade
//! signals, persistence, and quote retrieval belong to the consuming layer.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13 and
//!   19 for the Black-Scholes formulas and Greek limits.
//! - Abramowitz & Stegun 7.1.26 for the normal-CDF approximation.
//! - Gatheral (2006) for the additivity of total variance underlying the
//!   forward-vol decomposition.
//!
//! Numerical considerations:
//! - Volatility is a decimal everywhere (`0.30` = 30%); percentage
//!   conversion happens strictly at the presentation boundary.
//! - The implied-vol solver is best-effort by policy: it always answers and
//!   carries an explicit `converged` flag instead of raising.
//! - Theta is reported per calendar day and vega per percentage point of
//!   volatility, matching how the consuming dashboard quotes risk.
//!
//! The whole crate is synchronous, allocation-light, pure arithmetic; every
//! function is safe to call concurrently since no two invocations share
//! mutable state. The optional `parallel` feature evaluates scenario sweeps
//! on the rayon pool without changing results.
//!
//! # Quick Start
//! Price a leg and read its Greeks:
//! ```rust
//! use calvol::market::OptionQuote;
//! use calvol::pricing::european::price_and_greeks;
//!
//! let quote = OptionQuote::call(100.0, 100.0, 30.0 / 365.0, 0.05, 0.35);
//! let greeks = price_and_greeks(&quote).unwrap();
//! assert!(greeks.price > 0.0 && greeks.delta > 0.5 && greeks.theta < 0.0);
//! ```
//!
//! Recover an implied volatility:
//! ```rust
//! use calvol::core::OptionType;
//! use calvol::pricing::european::bs_price;
//! use calvol::vol::implied::implied_vol;
//!
//! let price = bs_price(OptionType::Put, 100.0, 95.0, 0.03, 0.40, 0.25);
//! let solve = implied_vol(OptionType::Put, 100.0, 95.0, 0.03, 0.25, price).unwrap();
//! assert!(solve.converged && (solve.vol - 0.40).abs() < 1e-3);
//! ```
//!
//! Measure front-month richness:
//! ```rust
//! use calvol::vol::forward::forward_factor;
//!
//! let result = forward_factor(0.55, 14.0, 0.45, 45.0).unwrap();
//! assert!(result.forward_factor > 0.0); // front IV rich vs the forward
//! ```
//!
//! Sweep a calendar spread's P&L curve:
//! ```rust
//! use calvol::core::OptionType;
//! use calvol::pricing::calendar::{
//!     CalendarSpread, ScenarioOptions, SpreadMarket, SweepRange, scenario_sweep,
//! };
//!
//! let spread = CalendarSpread {
//!     option_type: OptionType::Call,
//!     strike: 100.0,
//!     front_dte: 30.0,
//!     back_dte: 60.0,
//!     quantity: 1.0,
//! };
//! let market = SpreadMarket {
//!     underlying: 100.0,
//!     rate: 0.05,
//!     front_price: 4.2,
//!     back_price: 6.1,
//! };
//! let curve = scenario_sweep(
//!     &spread,
//!     &market,
//!     &SweepRange::default(),
//!     &ScenarioOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(curve.len(), 31); // -15% ..= +15% in 1% steps
//! ```

pub mod core;
pub mod market;
pub mod math;
pub mod pricing;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::{AnalyticsError, Greeks, OptionType};
    pub use crate::market::{OptionQuote, dte_between, years_between, years_from_dte};
    pub use crate::pricing::calendar::{
        CalendarSpread, CalendarSpreadEstimate, ScenarioOptions, ScenarioPoint, SpreadMarket,
        SweepRange, estimate, scenario_sweep,
    };
    pub use crate::pricing::european::price_and_greeks;
    pub use crate::vol::forward::{
        ForwardFactorResult, ForwardVolInputs, ForwardVolResult, forward_factor,
        forward_vol_from_ivs, forward_vol_from_prices,
    };
    pub use crate::vol::implied::{ImpliedVolSolve, SolverConfig, implied_vol, implied_vol_with};
}
