use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::development::analysis::{analyze_project, ProjectAnalysis};
use crate::development::assumptions::InputAssumptions;
use crate::development::cash_flow::{
    project_annual, simulate_monthly, AnnualProjection, CashFlowProjection,
};
use crate::development::metrics::{compute_metrics, DerivedMetrics};
use crate::development::risk::{assess_risk, RiskAssessment};
use crate::development::viability::{
    score_viability, summarize_investment, InvestmentSummary, ViabilityAssessment,
};
use crate::scenarios::evaluator::{LinearApproximation, ScenarioEvaluator};
use crate::scenarios::sensitivity::{run_scenarios_with, SensitivityResult};
use crate::scenarios::stress::{run_stress_tests_with, StressTestResult};
use crate::time_value::MAX_IRR_ITERATIONS;
use crate::types::{with_metadata, ComputationOutput};

const MIN_HEALTHY_DSCR: f64 = 1.20;
const MARKET_CAP_RATE_RANGE: (f64, f64) = (3.0, 12.0);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything a pro-forma run produces for one set of assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaOutput {
    pub metrics: DerivedMetrics,
    pub cash_flow_projections: Vec<CashFlowProjection>,
    pub annual_projections: Vec<AnnualProjection>,
    pub sensitivity_results: Vec<SensitivityResult>,
    pub stress_test_results: Vec<StressTestResult>,
    pub risk_assessment: RiskAssessment,
    pub viability: ViabilityAssessment,
    pub investment_summary: InvestmentSummary,
    /// Templated narrative per report section
    pub analysis: ProjectAnalysis,
    /// Name of the evaluator used for the sensitivity and stress scenarios
    pub scenario_evaluator: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pro-forma with the linear scenario evaluator.
///
/// Never fails: degenerate inputs yield NaN / infinite metrics, which are
/// reported in the envelope's warnings.
pub fn calculate(inputs: &InputAssumptions) -> ComputationOutput<ProFormaOutput> {
    calculate_with(inputs, &LinearApproximation)
}

/// Run the full pro-forma with a caller-chosen scenario evaluator.
pub fn calculate_with(
    inputs: &InputAssumptions,
    evaluator: &dyn ScenarioEvaluator,
) -> ComputationOutput<ProFormaOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    debug!(project = %inputs.project_name, "computing derived metrics");
    let metrics = compute_metrics(inputs);
    collect_metric_warnings(inputs, &metrics, &mut warnings);

    debug!(months = inputs.total_months(), "simulating monthly cash flows");
    let cash_flow_projections = simulate_monthly(inputs, &metrics);
    let annual_projections = project_annual(inputs, &metrics);

    debug!(evaluator = evaluator.name(), "running sensitivity and stress scenarios");
    let sensitivity_results = run_scenarios_with(evaluator, inputs, &metrics);
    let stress_test_results = run_stress_tests_with(evaluator, inputs, &metrics);

    let risk_assessment = assess_risk(inputs);
    let viability = score_viability(inputs, &metrics);
    let investment_summary = summarize_investment(inputs, &metrics, &viability);
    debug!(rating = viability.rating.as_str(), score = viability.score, "scored viability");
    let analysis = analyze_project(inputs, &metrics, &risk_assessment);

    let output = ProFormaOutput {
        metrics,
        cash_flow_projections,
        annual_projections,
        sensitivity_results,
        stress_test_results,
        risk_assessment,
        viability,
        investment_summary,
        analysis,
        scenario_evaluator: evaluator.name().to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Real Estate Development Pro-Forma (monthly cash flow, Newton IRR, scenario analysis)",
        inputs,
        warnings,
        elapsed,
        output,
    )
}

/// Validate the assumptions first and refuse to project if any rule fails.
#[cfg(feature = "validation")]
pub fn calculate_checked(
    inputs: &InputAssumptions,
    evaluator: &dyn ScenarioEvaluator,
) -> crate::ProFormaResult<ComputationOutput<ProFormaOutput>> {
    crate::validation::validate_assumptions(inputs).into_result()?;
    Ok(calculate_with(inputs, evaluator))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_metric_warnings(
    inputs: &InputAssumptions,
    metrics: &DerivedMetrics,
    warnings: &mut Vec<String>,
) {
    if !metrics.irr_solution.is_converged() {
        warn!(
            estimate = metrics.internal_rate_of_return,
            "IRR did not converge"
        );
        warnings.push(format!(
            "IRR did not converge within {MAX_IRR_ITERATIONS} iterations; reporting last estimate {:.4}%",
            metrics.internal_rate_of_return
        ));
    }

    let headline = [
        ("internal_rate_of_return", metrics.internal_rate_of_return),
        ("net_present_value", metrics.net_present_value),
        ("profit_margin", metrics.profit_margin),
        ("market_value", metrics.market_value),
        ("monthly_debt_service", metrics.monthly_debt_service),
        ("debt_service_coverage_ratio", metrics.debt_service_coverage_ratio),
        ("break_even_occupancy", metrics.break_even_occupancy),
    ];
    for (name, value) in headline {
        if !value.is_finite() {
            warn!(metric = name, value, "non-finite metric");
            warnings.push(format!("{name} is not finite ({value}); check the inputs it depends on"));
        }
    }

    if metrics.debt_service_coverage_ratio.is_finite()
        && metrics.debt_service_coverage_ratio < MIN_HEALTHY_DSCR
    {
        warnings.push(format!(
            "DSCR of {:.2}x is below the {MIN_HEALTHY_DSCR:.2}x most lenders require",
            metrics.debt_service_coverage_ratio
        ));
    }

    let (low, high) = MARKET_CAP_RATE_RANGE;
    if inputs.market_cap_rate < low || inputs.market_cap_rate > high {
        warnings.push(format!(
            "Market cap rate of {:.2}% is outside the typical {low}-{high}% range",
            inputs.market_cap_rate
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
