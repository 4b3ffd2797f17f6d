use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::DerivedMetrics;
use crate::scenarios::evaluator::{LinearApproximation, ScenarioEvaluator, ScenarioShock};
use crate::types::{Money, Percent, RiskLevel};

/// Stressed IRR above which the project is considered to survive comfortably.
pub const HIGH_SURVIVABILITY_IRR: Percent = 10.0;
pub const MEDIUM_SURVIVABILITY_IRR: Percent = 5.0;

/// Outcome of one named stress case evaluated against the base metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub test: String,
    pub description: String,
    pub shock: ScenarioShock,
    pub npv: Money,
    pub irr: Percent,
    pub cash_flow: Money,
    /// high / medium / low chance of weathering the shock
    pub survivability: RiskLevel,
}

struct StressCase {
    name: &'static str,
    description: &'static str,
    shock: ScenarioShock,
}

const STRESS_CASES: [StressCase; 4] = [
    StressCase {
        name: "Severe Construction Delay",
        description: "12-month construction delay with a 15% hard cost overrun",
        shock: ScenarioShock {
            construction_cost_pct: 15.0,
            rent_pct: 0.0,
            interest_rate_pp: 0.0,
            timeline_months: 12.0,
        },
    },
    StressCase {
        name: "Market Downturn",
        description: "20% decline in achievable market rents",
        shock: ScenarioShock {
            construction_cost_pct: 0.0,
            rent_pct: -20.0,
            interest_rate_pp: 0.0,
            timeline_months: 0.0,
        },
    },
    StressCase {
        name: "Interest Rate Spike",
        description: "300 basis point increase in the loan interest rate",
        shock: ScenarioShock {
            construction_cost_pct: 0.0,
            rent_pct: 0.0,
            interest_rate_pp: 3.0,
            timeline_months: 0.0,
        },
    },
    StressCase {
        name: "Combined Stress",
        description: "10% cost overrun, 15% rent decline, 200bp rate increase and 6-month delay",
        shock: ScenarioShock {
            construction_cost_pct: 10.0,
            rent_pct: -15.0,
            interest_rate_pp: 2.0,
            timeline_months: 6.0,
        },
    },
];

/// Map a stressed IRR onto survivability. NaN lands on low.
pub fn survivability(irr: Percent) -> RiskLevel {
    if irr > HIGH_SURVIVABILITY_IRR {
        RiskLevel::High
    } else if irr > MEDIUM_SURVIVABILITY_IRR {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn run_stress_tests(inputs: &InputAssumptions, base: &DerivedMetrics) -> Vec<StressTestResult> {
    run_stress_tests_with(&LinearApproximation, inputs, base)
}

pub fn run_stress_tests_with(
    evaluator: &dyn ScenarioEvaluator,
    inputs: &InputAssumptions,
    base: &DerivedMetrics,
) -> Vec<StressTestResult> {
    STRESS_CASES
        .iter()
        .map(|case| {
            let outcome = evaluator.evaluate(inputs, base, &case.shock);
            StressTestResult {
                test: case.name.to_string(),
                description: case.description.to_string(),
                shock: case.shock,
                npv: outcome.npv,
                irr: outcome.irr,
                cash_flow: outcome.annual_cash_flow,
                survivability: survivability(outcome.irr),
            }
        })
        .collect()
}
