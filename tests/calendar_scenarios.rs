//! End-to-end calendar-spread workflow: term-structure screening with the
//! forward factor, then scenario/P&L estimation over a sweep grid.

use approx::assert_relative_eq;

use calvol::core::{AnalyticsError, OptionType};
use calvol::market::years_from_dte;
use calvol::pricing::calendar::{
    CalendarSpread, ScenarioOptions, SpreadMarket, SweepRange, estimate, scenario_sweep,
};
use calvol::pricing::european::bs_price;
use calvol::vol::forward::{forward_factor, forward_vol_from_ivs};

fn manufactured_market(
    spread: &CalendarSpread,
    underlying: f64,
    rate: f64,
    front_sigma: f64,
    back_sigma: f64,
) -> SpreadMarket {
    SpreadMarket {
        underlying,
        rate,
        front_price: bs_price(
            spread.option_type,
            underlying,
            spread.strike,
            rate,
            front_sigma,
            years_from_dte(spread.front_dte),
        ),
        back_price: bs_price(
            spread.option_type,
            underlying,
            spread.strike,
            rate,
            back_sigma,
            years_from_dte(spread.back_dte),
        ),
    }
}

#[test]
fn forward_vol_reference_values() {
    // 35% over 30 days against 40% over 60 days: with T2 = 2*T1 the
    // forward variance reduces to 2*0.16 - 0.1225 = 0.1975.
    let fwd = forward_vol_from_ivs(0.35, 30.0 / 365.0, 0.40, 60.0 / 365.0).unwrap();
    assert_relative_eq!(fwd * fwd, 0.1975, epsilon = 1e-10);

    let factor = forward_factor(0.35, 30.0, 0.40, 60.0).unwrap();
    assert_relative_eq!(factor.forward_vol, fwd, epsilon = 1e-12);
    assert!(factor.forward_factor < 0.0, "front cheaper than forward");

    // Front variance dominating the back is a data inconsistency, reported
    // as its own condition rather than clamped.
    assert!(matches!(
        forward_vol_from_ivs(0.60, 30.0 / 365.0, 0.50, 60.0 / 365.0),
        Err(AnalyticsError::NegativeForwardVariance { .. })
    ));
}

#[test]
fn screening_then_estimating_an_earnings_calendar() {
    // Front month bid to 55% into the event, back month at 42%: a rich
    // front per the forward factor, the setup the estimator models.
    let factor = forward_factor(0.55, 12.0, 0.42, 40.0).unwrap();
    assert!(factor.forward_factor > 0.0);

    let spread = CalendarSpread {
        option_type: OptionType::Call,
        strike: 250.0,
        front_dte: 12.0,
        back_dte: 40.0,
        quantity: 1.0,
    };
    let market = manufactured_market(&spread, 250.0, 0.045, 0.55, 0.42);

    // Post-event normalization: front collapses toward the forward vol,
    // back eases slightly, one trading day passes.
    let post_event = estimate(
        &spread,
        &market,
        250.0,
        &ScenarioOptions {
            days_forward: 1.0,
            front_target_iv: Some(factor.forward_vol.min(0.40)),
            back_target_iv: Some(0.40),
        },
    )
    .unwrap();

    // The short front leg gives back far more premium than the long back
    // leg loses: the classic earnings-calendar payoff.
    assert!(post_event.estimated_pnl > 0.0);
    assert!(post_event.spread_price > market.back_price - market.front_price);
}

#[test]
fn sweep_pnl_is_zero_at_the_current_mark_and_negative_in_the_wings() {
    let spread = CalendarSpread {
        option_type: OptionType::Put,
        strike: 100.0,
        front_dte: 30.0,
        back_dte: 60.0,
        quantity: 1.0,
    };
    let market = manufactured_market(&spread, 100.0, 0.05, 0.40, 0.34);

    let points = scenario_sweep(
        &spread,
        &market,
        &SweepRange::default(),
        &ScenarioOptions::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 31);

    let center = points.iter().find(|p| p.pct_change == 0.0).unwrap();
    assert_eq!(center.estimate.estimated_pnl, 0.0);

    // An ATM calendar loses value as the underlying runs away from the
    // strike in either direction.
    let left = points.first().unwrap();
    let right = points.last().unwrap();
    assert!(left.estimate.estimated_pnl < 0.0);
    assert!(right.estimate.estimated_pnl < 0.0);
    assert!(left.estimate.estimated_pnl < center.estimate.estimated_pnl);
    assert!(right.estimate.estimated_pnl < center.estimate.estimated_pnl);
}

#[test]
fn sweep_regeneration_is_bit_identical() {
    let spread = CalendarSpread {
        option_type: OptionType::Call,
        strike: 180.0,
        front_dte: 21.0,
        back_dte: 49.0,
        quantity: 3.0,
    };
    let market = manufactured_market(&spread, 178.5, 0.04, 0.48, 0.39);
    let range = SweepRange {
        min_pct: -10.0,
        max_pct: 10.0,
        step_pct: 0.5,
    };
    let options = ScenarioOptions {
        days_forward: 2.0,
        front_target_iv: None,
        back_target_iv: Some(0.36),
    };

    let first = scenario_sweep(&spread, &market, &range, &options).unwrap();
    let second = scenario_sweep(&spread, &market, &range, &options).unwrap();

    assert_eq!(first.len(), 41);
    assert_eq!(first, second);
}

#[test]
fn estimate_composes_solver_and_pricer_consistently() {
    let spread = CalendarSpread {
        option_type: OptionType::Call,
        strike: 100.0,
        front_dte: 30.0,
        back_dte: 60.0,
        quantity: 1.0,
    };
    let market = manufactured_market(&spread, 100.0, 0.05, 0.45, 0.36);

    let result = estimate(&spread, &market, 100.0, &ScenarioOptions::default()).unwrap();

    // With converged IV solves, the scenario legs at the current underlying
    // reprice the observed premiums to within solver tolerance.
    assert!((result.front_price - market.front_price).abs() < 1e-3);
    assert!((result.back_price - market.back_price).abs() < 1e-3);
    assert_relative_eq!(result.front_iv, 0.45, epsilon = 1e-3);
    assert_relative_eq!(result.back_iv, 0.36, epsilon = 1e-3);
}
