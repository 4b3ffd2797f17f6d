use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::types::RiskLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRisk {
    pub level: RiskLevel,
    /// score / 10
    pub probability: f64,
    /// Raw 1–10 score
    pub impact: u8,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub construction_risk: CategoryRisk,
    pub market_risk: CategoryRisk,
    pub financing_risk: CategoryRisk,
    pub regulatory_risk: CategoryRisk,
    pub environmental_risk: CategoryRisk,
    /// Most severe level across the five categories
    pub overall_risk: RiskLevel,
}

/// Score 1–3 low, 4–6 medium, 7–10 high.
pub fn level_for_score(score: u8) -> RiskLevel {
    match score {
        0..=3 => RiskLevel::Low,
        4..=6 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

pub fn assess_risk(inputs: &InputAssumptions) -> RiskAssessment {
    let r = &inputs.risk_factors;
    let construction_risk = category(
        r.construction_risk,
        "Fixed-price construction contract, performance bonds and a funded contingency",
    );
    let market_risk = category(
        r.market_risk,
        "Pre-leasing commitments and an independent market demand study",
    );
    let financing_risk = category(
        r.financing_risk,
        "Rate lock or interest rate cap and early lender commitments",
    );
    let regulatory_risk = category(
        r.regulatory_risk,
        "Secure entitlements and permits before closing on the land",
    );
    let environmental_risk = category(
        r.environmental_risk,
        "Phase I/II environmental assessments and remediation budget",
    );

    let overall_risk = [
        construction_risk.level,
        market_risk.level,
        financing_risk.level,
        regulatory_risk.level,
        environmental_risk.level,
    ]
    .into_iter()
    .max()
    .unwrap_or(RiskLevel::Low);

    RiskAssessment {
        construction_risk,
        market_risk,
        financing_risk,
        regulatory_risk,
        environmental_risk,
        overall_risk,
    }
}

fn category(score: u8, mitigation: &str) -> CategoryRisk {
    CategoryRisk {
        level: level_for_score(score),
        probability: f64::from(score) / 10.0,
        impact: score,
        mitigation: mitigation.to_string(),
    }
}
