use proforma_core::development::assumptions::InputAssumptions;
use proforma_core::development::cash_flow::{simulate_monthly, Phase};
use proforma_core::development::metrics::{compute_metrics, equity_cash_flows};
use proforma_core::scenarios::{
    run_scenarios, run_stress_tests, Impact, ScenarioShock, SensitivityResult,
};
use proforma_core::time_value::{amortizing_payment, irr, npv, IrrSolution};
use proforma_core::{calculate, ProFormaError, RiskLevel};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

// ===========================================================================
// End-to-end pro-forma
// ===========================================================================

#[test]
fn test_partial_json_document_fills_defaults() {
    let doc = r#"{
        "project_name": "Riverside Lofts",
        "project_type": "mixed-use",
        "project_size": 80000,
        "market_rent": 3.1,
        "risk_factors": { "market_risk": 8 }
    }"#;
    let inputs: InputAssumptions = serde_json::from_str(doc).unwrap();
    assert_eq!(inputs.project_size, 80_000.0);
    assert_eq!(inputs.loan_amount, 8_000_000.0);
    assert_eq!(inputs.risk_factors.market_risk, 8);
    assert_eq!(inputs.risk_factors.construction_risk, 5);

    let out = calculate(&inputs);
    assert_eq!(out.result.metrics.total_construction_cost, 80_000.0 * 200.0);
    assert_eq!(out.result.risk_assessment.market_risk.level, RiskLevel::High);
    assert_eq!(out.result.risk_assessment.overall_risk, RiskLevel::High);
    assert!(out
        .result
        .investment_summary
        .summary
        .starts_with("Riverside Lofts"));
}

#[test]
fn test_reference_loan_payment() {
    // $300,000 at 6.5% over 30 years
    let payment = amortizing_payment(300_000.0, 0.065 / 12.0, 360);
    assert!((payment - 1896.20).abs() < 0.01, "got {payment}");
    assert_eq!(amortizing_payment(120_000.0, 0.0, 24), 5000.0);
}

#[test]
fn test_scenarios_and_stress_from_full_run() {
    let inputs = InputAssumptions::default();
    let out = calculate(&inputs);
    let metrics = &out.result.metrics;

    assert_eq!(out.result.sensitivity_results.len(), 9);
    let base = &out.result.sensitivity_results[0];
    assert_eq!(base.scenario, "Base Case");
    assert_eq!(base.irr, metrics.internal_rate_of_return);
    assert_eq!(base.npv, metrics.net_present_value);
    assert_eq!(base.impact, Impact::Neutral);

    assert_eq!(out.result.stress_test_results.len(), 4);
    assert_eq!(out.result.stress_test_results[3].test, "Combined Stress");

    // Standalone entry points agree with the pipeline.
    assert_eq!(run_scenarios(&inputs, metrics), out.result.sensitivity_results);
    assert_eq!(run_stress_tests(&inputs, metrics), out.result.stress_test_results);
}

#[test]
fn test_degenerate_inputs_serialize_non_finite_as_null() {
    let inputs = InputAssumptions {
        equity_contribution: 0.0,
        market_cap_rate: 0.0,
        ..InputAssumptions::default()
    };
    let out = calculate(&inputs);
    assert!(!out.warnings.is_empty());

    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["metrics"]["market_value"].is_null());
    assert!(json["result"]["metrics"]["equity_multiple"].is_null());
    assert!(json["result"]["metrics"]["total_project_cost"].is_number());
}

#[test]
fn test_strict_irr_reports_convergence_failure() {
    let solution = irr(&[100.0, 100.0, 100.0]);
    assert!(matches!(solution, IrrSolution::DidNotConverge(_)));
    match solution.require_converged() {
        Err(ProFormaError::ConvergenceFailure { iterations, .. }) => assert_eq!(iterations, 100),
        other => panic!("expected convergence failure, got {other:?}"),
    }
}

// ===========================================================================
// Scenario direction
// ===========================================================================

fn is_adverse(shock: &ScenarioShock) -> bool {
    shock.construction_cost_pct > 0.0
        || shock.rent_pct < 0.0
        || shock.interest_rate_pp > 0.0
        || shock.timeline_months > 0.0
}

/// Adverse shocks never raise returns; favourable ones never lower them.
/// NaN outcomes compare false both ways and pass.
fn assert_scenario_direction(results: &[SensitivityResult], base_npv: f64) {
    for r in results.iter().filter(|r| !r.shock.is_neutral()) {
        if is_adverse(&r.shock) {
            assert_ne!(r.impact, Impact::Positive, "{} raised IRR", r.scenario);
            assert!(!(r.npv > base_npv), "{} raised NPV", r.scenario);
        } else {
            assert_ne!(r.impact, Impact::Negative, "{} lowered IRR", r.scenario);
            assert!(!(r.npv < base_npv), "{} lowered NPV", r.scenario);
        }
    }
}

#[test]
fn test_scenario_direction_with_zero_cash_flow() {
    // NOI exactly covers a zero-interest loan payment.
    let inputs = InputAssumptions {
        project_size: 10_000.0,
        market_rent: 1.0,
        vacancy_rate: 0.0,
        property_taxes: 0.0,
        utilities: 0.0,
        maintenance_costs: 0.0,
        management_fees: 0.0,
        loan_amount: 1_200_000.0,
        interest_rate: 0.0,
        loan_term: 10,
        ..InputAssumptions::default()
    };
    let base = compute_metrics(&inputs);
    assert_eq!(base.annual_cash_flow, 0.0);

    assert_scenario_direction(&run_scenarios(&inputs, &base), base.net_present_value);
    for stress in run_stress_tests(&inputs, &base) {
        assert!(!(stress.irr > base.internal_rate_of_return), "{}", stress.test);
        assert!(stress.cash_flow <= 0.0, "{}", stress.test);
    }
}

#[test]
fn test_short_timeline_cut_stays_favourable() {
    // Two development months: a three-month cut more than doubles the timeline factor.
    let inputs = InputAssumptions {
        construction_duration: 1,
        lease_up_period: 1,
        stabilization_period: 0,
        ..InputAssumptions::default()
    };
    let base = compute_metrics(&inputs);
    let results = run_scenarios(&inputs, &base);
    assert_eq!(results[7].impact, Impact::Negative);
    assert_eq!(results[8].impact, Impact::Positive);
    assert_scenario_direction(&results, base.net_present_value);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_amortizing_payment_repays_principal(
        principal in 1_000u32..50_000_000,
        annual_rate_bp in 1u32..2_000,
        years in 1u32..41
    ) {
        let principal = f64::from(principal);
        let r = f64::from(annual_rate_bp) / 10_000.0 / 12.0;
        let n = years * 12;
        let payment = amortizing_payment(principal, r, n);

        prop_assert!(payment > 0.0);
        prop_assert!(payment * f64::from(n) >= principal);
        // Present value of the payment stream equals the principal.
        let pv = payment * (1.0 - (1.0 + r).powi(-(n as i32))) / r;
        prop_assert!((pv - principal).abs() / principal < 1e-9);
    }

    #[test]
    fn prop_npv_at_zero_rate_is_sum(flows in proptest::collection::vec(-1_000_000i32..1_000_000, 1..30)) {
        let flows: Vec<f64> = flows.into_iter().map(f64::from).collect();
        let sum: f64 = flows.iter().sum();
        prop_assert!((npv(&flows, 0.0) - sum).abs() < 1e-6);
    }

    #[test]
    fn prop_irr_zeroes_npv_for_equity_style_flows(
        equity in 100_000u32..5_000_000,
        yield_bp in 100u32..4_000,
        hold in 1u32..11
    ) {
        let equity = f64::from(equity);
        let cash_flow = equity * f64::from(yield_bp) / 10_000.0;
        let flows = equity_cash_flows(equity, cash_flow, hold);
        let solution = irr(&flows);

        prop_assert!(solution.is_converged());
        let rate = solution.rate();
        prop_assert!((rate - f64::from(yield_bp) / 100.0).abs() < 1e-4);
        prop_assert!(npv(&flows, rate / 100.0).abs() < 1e-3);
    }

    #[test]
    fn prop_shocks_move_returns_in_their_direction(
        loan_100k in 0u32..300,
        rent_cents in 50u32..500,
        equity_100k in 5u32..100,
        construction in 1u32..37,
        lease_up in 1u32..25,
        stabilization in 0u32..13,
        hold in 1u32..11
    ) {
        let inputs = InputAssumptions {
            loan_amount: f64::from(loan_100k) * 100_000.0,
            market_rent: f64::from(rent_cents) / 100.0,
            equity_contribution: f64::from(equity_100k) * 100_000.0,
            construction_duration: construction,
            lease_up_period: lease_up,
            stabilization_period: stabilization,
            hold_period: hold,
            ..InputAssumptions::default()
        };
        let base = compute_metrics(&inputs);

        assert_scenario_direction(&run_scenarios(&inputs, &base), base.net_present_value);
        for stress in run_stress_tests(&inputs, &base) {
            prop_assert!(!(stress.irr > base.internal_rate_of_return), "{} raised IRR", stress.test);
            prop_assert!(!(stress.npv > base.net_present_value), "{} raised NPV", stress.test);
            prop_assert!(!(stress.cash_flow > base.annual_cash_flow), "{} raised cash flow", stress.test);
        }
    }

    #[test]
    fn prop_cash_flow_length_and_lease_up_ramp(
        construction in 1u32..37,
        lease_up in 1u32..25,
        stabilization in 0u32..13,
        hold in 1u32..11,
        vacancy in 0u32..50
    ) {
        let inputs = InputAssumptions {
            construction_duration: construction,
            lease_up_period: lease_up,
            stabilization_period: stabilization,
            hold_period: hold,
            vacancy_rate: f64::from(vacancy),
            ..InputAssumptions::default()
        };
        let months = simulate_monthly(&inputs, &compute_metrics(&inputs));
        prop_assert_eq!(months.len() as u32, construction + lease_up + stabilization + hold * 12);

        let ramp: Vec<f64> = months
            .iter()
            .filter(|m| m.phase == Phase::LeaseUp)
            .map(|m| m.occupancy)
            .collect();
        prop_assert_eq!(ramp.len() as u32, lease_up);
        prop_assert!(ramp.windows(2).all(|w| w[1] >= w[0]));
        let stabilized = 100.0 - f64::from(vacancy);
        prop_assert!(ramp.iter().all(|o| *o <= stabilized + 1e-9));
        prop_assert!((ramp[ramp.len() - 1] - stabilized).abs() < 1e-9);
    }
}
