use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::DerivedMetrics;
use crate::scenarios::evaluator::{LinearApproximation, ScenarioEvaluator, ScenarioShock};
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Direction of a scenario's IRR relative to the base case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    /// Any NaN comparison falls through to neutral.
    pub fn classify(adjusted_irr: Percent, base_irr: Percent) -> Self {
        if adjusted_irr > base_irr {
            Impact::Positive
        } else if adjusted_irr < base_irr {
            Impact::Negative
        } else {
            Impact::Neutral
        }
    }
}

/// Adjusted metrics for one named sensitivity scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub scenario: String,
    pub shock: ScenarioShock,
    pub npv: Money,
    pub irr: Percent,
    pub profit_margin: Percent,
    pub break_even_occupancy: Percent,
    pub impact: Impact,
}

const fn shock(cost: f64, rent: f64, rate: f64, months: f64) -> ScenarioShock {
    ScenarioShock {
        construction_cost_pct: cost,
        rent_pct: rent,
        interest_rate_pp: rate,
        timeline_months: months,
    }
}

/// The fixed one-at-a-time scenario grid, base case first.
pub const SENSITIVITY_SCENARIOS: [(&str, ScenarioShock); 9] = [
    ("Base Case", shock(0.0, 0.0, 0.0, 0.0)),
    ("Construction Cost +10%", shock(10.0, 0.0, 0.0, 0.0)),
    ("Construction Cost -10%", shock(-10.0, 0.0, 0.0, 0.0)),
    ("Rent +10%", shock(0.0, 10.0, 0.0, 0.0)),
    ("Rent -10%", shock(0.0, -10.0, 0.0, 0.0)),
    ("Interest Rate +1%", shock(0.0, 0.0, 1.0, 0.0)),
    ("Interest Rate -1%", shock(0.0, 0.0, -1.0, 0.0)),
    ("Timeline +3 Months", shock(0.0, 0.0, 0.0, 3.0)),
    ("Timeline -3 Months", shock(0.0, 0.0, 0.0, -3.0)),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the sensitivity grid with the default linear evaluator.
pub fn run_scenarios(inputs: &InputAssumptions, base: &DerivedMetrics) -> Vec<SensitivityResult> {
    run_scenarios_with(&LinearApproximation, inputs, base)
}

/// Run the sensitivity grid with a caller-chosen evaluator.
pub fn run_scenarios_with(
    evaluator: &dyn ScenarioEvaluator,
    inputs: &InputAssumptions,
    base: &DerivedMetrics,
) -> Vec<SensitivityResult> {
    SENSITIVITY_SCENARIOS
        .iter()
        .map(|(name, shock)| {
            let outcome = evaluator.evaluate(inputs, base, shock);
            SensitivityResult {
                scenario: (*name).to_string(),
                shock: *shock,
                npv: outcome.npv,
                irr: outcome.irr,
                profit_margin: outcome.profit_margin,
                break_even_occupancy: outcome.break_even_occupancy,
                impact: Impact::classify(outcome.irr, base.internal_rate_of_return),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::development::metrics::compute_metrics;
    use crate::scenarios::evaluator::FullReprojection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nine_scenarios_in_order() {
        let inputs = InputAssumptions::default();
        let base = compute_metrics(&inputs);
        let results = run_scenarios(&inputs, &base);

        let names: Vec<&str> = results.iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Base Case",
                "Construction Cost +10%",
                "Construction Cost -10%",
                "Rent +10%",
                "Rent -10%",
                "Interest Rate +1%",
                "Interest Rate -1%",
                "Timeline +3 Months",
                "Timeline -3 Months",
            ]
        );
    }

    #[test]
    fn test_base_case_reproduces_base_metrics() {
        let inputs = InputAssumptions::default();
        let base = compute_metrics(&inputs);
        let results = run_scenarios(&inputs, &base);

        let b = &results[0];
        assert_eq!(b.irr, base.internal_rate_of_return);
        assert_eq!(b.npv, base.net_present_value);
        assert_eq!(b.profit_margin, base.profit_margin);
        assert_eq!(b.break_even_occupancy, base.break_even_occupancy);
        assert_eq!(b.impact, Impact::Neutral);
    }

    #[test]
    fn test_impact_direction() {
        let inputs = InputAssumptions::default();
        let base = compute_metrics(&inputs);
        let impacts: Vec<Impact> = run_scenarios(&inputs, &base)
            .iter()
            .map(|r| r.impact)
            .collect();
        assert_eq!(
            impacts,
            vec![
                Impact::Neutral,
                Impact::Negative,
                Impact::Positive,
                Impact::Positive,
                Impact::Negative,
                Impact::Negative,
                Impact::Positive,
                Impact::Negative,
                Impact::Positive,
            ]
        );
    }

    #[test]
    fn test_impact_direction_with_negative_cash_flow() {
        let inputs = InputAssumptions {
            loan_amount: 20_000_000.0,
            ..InputAssumptions::default()
        };
        let base = compute_metrics(&inputs);
        assert!(base.annual_cash_flow < 0.0);
        assert!(base.internal_rate_of_return < 0.0);

        let impacts: Vec<Impact> = run_scenarios(&inputs, &base)
            .iter()
            .map(|r| r.impact)
            .collect();
        assert_eq!(
            impacts,
            vec![
                Impact::Neutral,
                Impact::Negative,
                Impact::Positive,
                Impact::Positive,
                Impact::Negative,
                Impact::Negative,
                Impact::Positive,
                Impact::Negative,
                Impact::Positive,
            ]
        );
    }

    #[test]
    fn test_reprojection_ignores_timeline_for_returns() {
        let inputs = InputAssumptions::default();
        let base = compute_metrics(&inputs);
        let results = run_scenarios_with(&FullReprojection, &inputs, &base);

        assert_eq!(results.len(), 9);
        assert_eq!(results[4].impact, Impact::Negative);
        assert_eq!(results[7].impact, Impact::Neutral);
        assert_eq!(results[8].impact, Impact::Neutral);
    }

    #[test]
    fn test_nan_irr_is_neutral() {
        assert_eq!(Impact::classify(f64::NAN, 10.0), Impact::Neutral);
        assert_eq!(Impact::classify(12.0, f64::NAN), Impact::Neutral);
    }
}
