use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::DerivedMetrics;
use crate::types::{Money, Percent, RiskLevel};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViabilityRating {
    HighlyViable,
    Viable,
    Marginal,
    NotViable,
}

impl ViabilityRating {
    pub fn score(&self) -> u8 {
        match self {
            ViabilityRating::HighlyViable => 90,
            ViabilityRating::Viable => 75,
            ViabilityRating::Marginal => 60,
            ViabilityRating::NotViable => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViabilityRating::HighlyViable => "highly-viable",
            ViabilityRating::Viable => "viable",
            ViabilityRating::Marginal => "marginal",
            ViabilityRating::NotViable => "not-viable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityAssessment {
    pub rating: ViabilityRating,
    pub score: u8,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub total_investment: Money,
    pub expected_return: Percent,
    /// Construction start to exit, in years
    pub timeline: f64,
    pub risk_level: RiskLevel,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Rating bands: IRR and profit margin must both exceed the pair.
pub const HIGHLY_VIABLE_IRR: Percent = 20.0;
pub const HIGHLY_VIABLE_MARGIN: Percent = 25.0;
pub const VIABLE_IRR: Percent = 15.0;
pub const VIABLE_MARGIN: Percent = 15.0;
pub const MARGINAL_IRR: Percent = 10.0;
pub const MARGINAL_MARGIN: Percent = 10.0;

const STRONG_IRR: f64 = 20.0;
const WEAK_IRR: f64 = 10.0;
const STRONG_MARGIN: f64 = 20.0;
const WEAK_MARGIN: f64 = 10.0;
pub(crate) const STRONG_DSCR: f64 = 1.5;
pub(crate) const MIN_DSCR: f64 = 1.25;
pub(crate) const PREMIUM_RENT: f64 = 3.0;
pub(crate) const SOFT_RENT: f64 = 1.0;
const HIGH_RISK_SCORE: u8 = 7;
const LOW_RISK_SCORE: u8 = 3;
const HIGH_BREAK_EVEN_OCCUPANCY: Percent = 85.0;
const HIGH_VACANCY: Percent = 10.0;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rate the project and collect templated strengths, risks and recommendations.
pub fn score_viability(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> ViabilityAssessment {
    let rating = rate(metrics.internal_rate_of_return, metrics.profit_margin);

    ViabilityAssessment {
        rating,
        score: rating.score(),
        strengths: strengths(inputs, metrics),
        risks: risks(inputs, metrics),
        recommendations: recommendations(inputs, metrics, rating),
    }
}

/// IRR and profit margin must both clear a band for the project to earn it.
pub fn rate(irr: Percent, profit_margin: Percent) -> ViabilityRating {
    if irr > HIGHLY_VIABLE_IRR && profit_margin > HIGHLY_VIABLE_MARGIN {
        ViabilityRating::HighlyViable
    } else if irr > VIABLE_IRR && profit_margin > VIABLE_MARGIN {
        ViabilityRating::Viable
    } else if irr > MARGINAL_IRR && profit_margin > MARGINAL_MARGIN {
        ViabilityRating::Marginal
    } else {
        ViabilityRating::NotViable
    }
}

pub fn summarize_investment(
    inputs: &InputAssumptions,
    metrics: &DerivedMetrics,
    viability: &ViabilityAssessment,
) -> InvestmentSummary {
    let timeline = f64::from(metrics.total_timeline_months) / 12.0;
    let summary = format!(
        "{} project costing ${:.0} with a projected {:.1}% IRR over {:.1} years; rated {} ({}/100) with {} risk.",
        project_label(inputs),
        metrics.total_project_cost,
        metrics.internal_rate_of_return,
        timeline,
        viability.rating.as_str(),
        viability.score,
        metrics.risk_rating.as_str(),
    );

    InvestmentSummary {
        total_investment: metrics.total_project_cost,
        expected_return: metrics.internal_rate_of_return,
        timeline,
        risk_level: metrics.risk_rating,
        summary,
    }
}

// ---------------------------------------------------------------------------
// Threshold checks
// ---------------------------------------------------------------------------

fn strengths(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> Vec<String> {
    let mut out = Vec::new();

    if metrics.internal_rate_of_return > STRONG_IRR {
        out.push(format!(
            "Strong projected IRR of {:.1}%",
            metrics.internal_rate_of_return
        ));
    }
    if metrics.profit_margin > STRONG_MARGIN {
        out.push(format!(
            "Healthy development profit margin of {:.1}%",
            metrics.profit_margin
        ));
    }
    if metrics.debt_service_coverage_ratio > STRONG_DSCR {
        out.push(format!(
            "Comfortable debt service coverage of {:.2}x",
            metrics.debt_service_coverage_ratio
        ));
    }
    if inputs.market_rent > PREMIUM_RENT {
        out.push(format!(
            "Premium market rents of ${:.2}/sq ft",
            inputs.market_rent
        ));
    }
    for (name, score) in inputs.risk_factors.named() {
        if score <= LOW_RISK_SCORE {
            out.push(format!("Low {name} risk ({score}/10)"));
        }
    }

    out
}

fn risks(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> Vec<String> {
    let mut out = Vec::new();

    if metrics.internal_rate_of_return < WEAK_IRR {
        out.push(format!(
            "Projected IRR of {:.1}% is below a 10% hurdle",
            metrics.internal_rate_of_return
        ));
    }
    if metrics.profit_margin < WEAK_MARGIN {
        out.push(format!(
            "Thin development profit margin of {:.1}%",
            metrics.profit_margin
        ));
    }
    if metrics.debt_service_coverage_ratio < MIN_DSCR {
        out.push(format!(
            "Debt service coverage of {:.2}x is below the typical 1.25x lender minimum",
            metrics.debt_service_coverage_ratio
        ));
    }
    if inputs.market_rent < SOFT_RENT {
        out.push(format!(
            "Market rents of ${:.2}/sq ft leave little room for cost overruns",
            inputs.market_rent
        ));
    }
    for (name, score) in inputs.risk_factors.named() {
        if score >= HIGH_RISK_SCORE {
            out.push(format!("High {name} risk ({score}/10)"));
        }
    }

    out
}

fn recommendations(
    inputs: &InputAssumptions,
    metrics: &DerivedMetrics,
    rating: ViabilityRating,
) -> Vec<String> {
    let mut out = Vec::new();
    let r = &inputs.risk_factors;

    if metrics.internal_rate_of_return < VIABLE_IRR {
        out.push("Value-engineer the design or renegotiate land terms to lift returns".into());
    }
    if metrics.debt_service_coverage_ratio < MIN_DSCR {
        out.push(
            "Increase the equity contribution or reduce the loan amount to improve debt service coverage"
                .into(),
        );
    }
    if metrics.break_even_occupancy > HIGH_BREAK_EVEN_OCCUPANCY {
        out.push("Pursue pre-leasing to reduce exposure to a high break-even occupancy".into());
    }
    if inputs.vacancy_rate > HIGH_VACANCY {
        out.push("Revisit the unit mix and amenities to bring vacancy toward market norms".into());
    }
    if r.construction_risk >= HIGH_RISK_SCORE {
        out.push("Negotiate a guaranteed maximum price contract with the general contractor".into());
    }
    if r.market_risk >= HIGH_RISK_SCORE {
        out.push("Commission an independent market study before committing to construction".into());
    }
    if r.financing_risk >= HIGH_RISK_SCORE {
        out.push("Lock in the interest rate or purchase a rate cap before closing".into());
    }
    if r.regulatory_risk >= HIGH_RISK_SCORE {
        out.push("Obtain entitlements and permits before closing on the land".into());
    }
    if r.environmental_risk >= HIGH_RISK_SCORE {
        out.push("Complete Phase II environmental testing and budget for remediation".into());
    }

    match rating {
        ViabilityRating::HighlyViable => {
            out.push("Proceed with development and lock in financing terms".into())
        }
        ViabilityRating::NotViable => {
            out.push("Reconsider the project scope, pricing or site before proceeding".into())
        }
        ViabilityRating::Viable | ViabilityRating::Marginal => {}
    }

    out
}

pub(crate) fn project_label(inputs: &InputAssumptions) -> String {
    if inputs.project_name.trim().is_empty() {
        "Development".to_string()
    } else {
        inputs.project_name.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
