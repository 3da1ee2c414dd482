//! Vanilla options on a log-spot grid against closed forms and no-arbitrage
//! bounds.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ql_instruments::{Exercise, OptionType, PlainVanillaPayoff};
use ql_math::{normal_cdf, normal_pdf};
use ql_methods::{FdmBlackScholesSolver, FdmBlackScholesSolverDesc, FdmResults, FdmSchemeDesc};
use ql_processes::BlackScholesMertonProcess;

const SPOT: f64 = 100.0;
const STRIKE: f64 = 100.0;
const RATE: f64 = 0.05;
const VOL: f64 = 0.2;
const T: f64 = 1.0;

fn process() -> BlackScholesMertonProcess {
    BlackScholesMertonProcess::new(SPOT, RATE, 0.0, VOL).unwrap()
}

fn solve(option_type: OptionType, exercise: Exercise, desc: &FdmBlackScholesSolverDesc) -> FdmResults {
    let payoff = Arc::new(PlainVanillaPayoff::new(option_type, STRIKE));
    FdmBlackScholesSolver::new(process(), payoff, &exercise, desc)
        .unwrap()
        .results()
}

/// Closed-form European call with value, delta, gamma and theta.
fn black_scholes_call() -> FdmResults {
    let sqrt_t = T.sqrt();
    let d1 = ((SPOT / STRIKE).ln() + (RATE + 0.5 * VOL * VOL) * T) / (VOL * sqrt_t);
    let d2 = d1 - VOL * sqrt_t;
    let df = (-RATE * T).exp();
    FdmResults {
        value: SPOT * normal_cdf(d1) - STRIKE * df * normal_cdf(d2),
        delta: normal_cdf(d1),
        gamma: normal_pdf(d1) / (SPOT * VOL * sqrt_t),
        theta: -SPOT * normal_pdf(d1) * VOL / (2.0 * sqrt_t) - RATE * STRIKE * df * normal_cdf(d2),
    }
}

#[test]
fn european_call_matches_black_scholes() {
    let desc = FdmBlackScholesSolverDesc::default()
        .with_grid(201, 100)
        .with_scheme(FdmSchemeDesc::crank_nicolson());
    let fd = solve(OptionType::Call, Exercise::european(T).unwrap(), &desc);
    let exact = black_scholes_call();

    assert_abs_diff_eq!(exact.value, 10.4506, epsilon = 1e-3);
    assert_abs_diff_eq!(fd.value, exact.value, epsilon = 0.05);
    assert_abs_diff_eq!(fd.delta, exact.delta, epsilon = 5e-3);
    assert_abs_diff_eq!(fd.gamma, exact.gamma, epsilon = 5e-4);
    assert_abs_diff_eq!(fd.theta, exact.theta, epsilon = 0.1);
}

#[test]
fn douglas_agrees_with_crank_nicolson_in_one_dimension() {
    let exercise = Exercise::european(T).unwrap();
    let cn = solve(
        OptionType::Call,
        exercise.clone(),
        &FdmBlackScholesSolverDesc::default().with_scheme(FdmSchemeDesc::crank_nicolson()),
    );
    let douglas = solve(OptionType::Call, exercise, &FdmBlackScholesSolverDesc::default());
    assert_abs_diff_eq!(cn.value, douglas.value, epsilon = 1e-10);
}

#[test]
fn american_put_is_worth_more_than_european() {
    let desc = FdmBlackScholesSolverDesc::default().with_damping_steps(2);
    let european = solve(OptionType::Put, Exercise::european(T).unwrap(), &desc);
    let american = solve(OptionType::Put, Exercise::american(T).unwrap(), &desc);

    assert!(american.value >= european.value + 0.3);
    // never below intrinsic value
    assert!(american.value >= STRIKE - SPOT);
    assert!(american.delta < 0.0 && american.delta > -1.0);
}

#[test]
fn put_call_parity() {
    let desc = FdmBlackScholesSolverDesc::default().with_grid(201, 100);
    let call = solve(OptionType::Call, Exercise::european(T).unwrap(), &desc);
    let put = solve(OptionType::Put, Exercise::european(T).unwrap(), &desc);
    let forward = SPOT - STRIKE * (-RATE * T).exp();
    assert_abs_diff_eq!(call.value - put.value, forward, epsilon = 0.02);
    assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 5e-3);
}
