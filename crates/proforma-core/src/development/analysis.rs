//! Narrative write-up of a projection.
//!
//! Each section is one templated paragraph picked by the same kind of
//! threshold checks that drive the viability strengths and risks.

use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::DerivedMetrics;
use crate::development::risk::RiskAssessment;
use crate::development::viability::{
    project_label, HIGHLY_VIABLE_IRR, MARGINAL_IRR, MIN_DSCR, PREMIUM_RENT, SOFT_RENT,
    STRONG_DSCR, VIABLE_IRR,
};
use crate::types::RiskLevel;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub financial_summary: String,
    pub cash_flow_analysis: String,
    pub return_analysis: String,
    pub risk_analysis: String,
    pub market_positioning: String,
    pub competitive_analysis: String,
    pub supply_analysis: String,
    pub demand_analysis: String,
}

const TIGHT_MARKET_VACANCY: f64 = 5.0;
const SOFT_MARKET_VACANCY: f64 = 10.0;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_project(
    inputs: &InputAssumptions,
    metrics: &DerivedMetrics,
    risk: &RiskAssessment,
) -> ProjectAnalysis {
    ProjectAnalysis {
        financial_summary: financial_summary(inputs, metrics),
        cash_flow_analysis: cash_flow_analysis(inputs, metrics),
        return_analysis: return_analysis(inputs, metrics),
        risk_analysis: risk_analysis(metrics, risk),
        market_positioning: market_positioning(inputs),
        competitive_analysis: competitive_analysis(inputs),
        supply_analysis: supply_analysis(inputs, metrics),
        demand_analysis: demand_analysis(inputs),
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn financial_summary(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> String {
    let outcome = if metrics.total_profit >= 0.0 {
        "profit"
    } else {
        "loss"
    };
    format!(
        "{} requires ${:.0} of total project cost against a stabilized value of ${:.0}, \
         a development {outcome} of ${:.0} ({:.1}% margin). Return on cost is {:.1}%.",
        project_label(inputs),
        metrics.total_project_cost,
        metrics.market_value,
        metrics.total_profit.abs(),
        metrics.profit_margin,
        metrics.return_on_cost,
    )
}

fn cash_flow_analysis(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> String {
    let dscr = metrics.debt_service_coverage_ratio;
    let coverage = if metrics.annual_cash_flow > 0.0 {
        let cushion = if dscr >= STRONG_DSCR {
            "a comfortable cushion"
        } else if dscr >= MIN_DSCR {
            "an adequate but limited cushion"
        } else {
            "coverage below typical lender minimums"
        };
        format!(
            "Stabilized NOI of ${:.0} covers annual debt service of ${:.0} {dscr:.2}x, \
             leaving ${:.0} of annual cash flow with {cushion}.",
            metrics.net_operating_income, metrics.annual_debt_service, metrics.annual_cash_flow,
        )
    } else {
        format!(
            "Stabilized NOI of ${:.0} does not cover annual debt service of ${:.0} ({dscr:.2}x); \
             equity must fund a ${:.0} shortfall every year.",
            metrics.net_operating_income,
            metrics.annual_debt_service,
            metrics.annual_cash_flow.abs(),
        )
    };
    format!(
        "{coverage} Break-even occupancy is {:.1}% against a stabilized {:.1}%.",
        metrics.break_even_occupancy,
        inputs.stabilized_occupancy(),
    )
}

fn return_analysis(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> String {
    let irr = metrics.internal_rate_of_return;
    let band = if irr > HIGHLY_VIABLE_IRR {
        "well above"
    } else if irr > VIABLE_IRR {
        "above"
    } else if irr > MARGINAL_IRR {
        "close to"
    } else {
        "below"
    };
    let value = if metrics.net_present_value >= 0.0 {
        "creates"
    } else {
        "destroys"
    };
    let payback = if metrics.payback_period.is_finite() && metrics.payback_period >= 0.0 {
        format!("Equity is paid back in {:.1} years.", metrics.payback_period)
    } else {
        "Operating cash flow never pays back the equity.".to_string()
    };
    format!(
        "Projected equity IRR of {irr:.1}% is {band} typical development hurdles. \
         The investment {value} value at a {:.1}% discount rate (NPV ${:.0}) with a {:.2}x equity multiple. {payback}",
        inputs.discount_rate, metrics.net_present_value, metrics.equity_multiple,
    )
}

fn risk_analysis(metrics: &DerivedMetrics, risk: &RiskAssessment) -> String {
    let categories = [
        ("construction", &risk.construction_risk),
        ("market", &risk.market_risk),
        ("financing", &risk.financing_risk),
        ("regulatory", &risk.regulatory_risk),
        ("environmental", &risk.environmental_risk),
    ];
    let high: Vec<&str> = categories
        .iter()
        .filter(|(_, c)| c.level == RiskLevel::High)
        .map(|(name, _)| *name)
        .collect();
    let flagged = match high.as_slice() {
        [] => "No risk category is rated high.".to_string(),
        [one] => format!("{} risk is rated high.", capitalize(one)),
        many => format!("{} risks are rated high.", capitalize(&many.join(", "))),
    };
    format!(
        "Overall risk is {}. {flagged} Risk-adjusted return is {:.1}%, a {} risk rating.",
        risk.overall_risk.as_str(),
        metrics.risk_adjusted_return,
        metrics.risk_rating.as_str(),
    )
}

fn market_positioning(inputs: &InputAssumptions) -> String {
    let segment = if inputs.market_rent > PREMIUM_RENT {
        "premium"
    } else if inputs.market_rent < SOFT_RENT {
        "value"
    } else {
        "mid-market"
    };
    format!(
        "At ${:.2}/sq ft per month the {} scheme sits in the {segment} segment, \
         valued at a {:.1}% market cap rate and exiting at {:.1}%.",
        inputs.market_rent,
        inputs.project_type.as_str(),
        inputs.market_cap_rate,
        inputs.exit_cap_rate,
    )
}

fn competitive_analysis(inputs: &InputAssumptions) -> String {
    let stance = if inputs.vacancy_rate < inputs.market_vacancy {
        "below the market, which assumes the project out-leases competing stock"
    } else if inputs.vacancy_rate > inputs.market_vacancy {
        "more conservative than the market"
    } else {
        "in line with the market"
    };
    format!(
        "Underwritten vacancy of {:.1}% against {:.1}% market vacancy is {stance}.",
        inputs.vacancy_rate, inputs.market_vacancy,
    )
}

fn supply_analysis(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> String {
    let conditions = if inputs.market_vacancy > SOFT_MARKET_VACANCY {
        "Elevated market vacancy points to ample competing supply."
    } else if inputs.market_vacancy < TIGHT_MARKET_VACANCY {
        "Low market vacancy points to a supply-constrained market."
    } else {
        "Market vacancy suggests supply and absorption are broadly balanced."
    };
    format!(
        "{conditions} New space delivers after {} months of construction and stabilizes {} months from start.",
        inputs.construction_duration, metrics.development_months,
    )
}

fn demand_analysis(inputs: &InputAssumptions) -> String {
    let growth = if inputs.rent_growth_rate < 0.0 {
        "Falling rents signal weakening demand".to_string()
    } else if inputs.rent_growth_rate > inputs.inflation_rate {
        format!(
            "Rent growth outpaces {:.1}% inflation, signalling real demand growth",
            inputs.inflation_rate
        )
    } else {
        format!(
            "Rent growth does not outpace {:.1}% inflation, so demand is flat in real terms",
            inputs.inflation_rate
        )
    };
    let direction = if inputs.market_appreciation >= 0.0 {
        "appreciate"
    } else {
        "decline"
    };
    format!(
        "{growth} ({:.1}% a year). Market values are expected to {direction} {:.1}% a year.",
        inputs.rent_growth_rate,
        inputs.market_appreciation.abs(),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
