//! Boundary checks on [`InputAssumptions`] before they reach the projection.
//!
//! The projection itself never rejects input; these rules exist so callers
//! (the CLI in particular) can refuse obviously broken assumptions up front.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::project_costs;
use crate::error::ProFormaError;
use crate::ProFormaResult;

pub const MIN_CONSTRUCTION_MONTHS: u32 = 6;
/// Upper bound on each development phase (construction, lease-up, stabilization).
pub const MAX_PHASE_MONTHS: u32 = 120;
pub const MAX_HOLD_YEARS: u32 = 50;
pub const MIN_MARKET_RENT: f64 = 0.5;
pub const MAX_VACANCY_RATE: f64 = 50.0;
pub const MAX_INTEREST_RATE: f64 = 30.0;
pub const MAX_LOAN_TERM_YEARS: u32 = 50;
/// Growth, inflation and appreciation rates must fall within +/- this bound.
pub const GROWTH_RATE_BOUND: f64 = 50.0;
pub const CAP_RATE_RANGE: (f64, f64) = (3.0, 12.0);

/// Outcome of checking one set of assumptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Field name to the first rule it broke
    pub errors: BTreeMap<String, String>,
    /// Soft findings that do not block a projection
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// `field: message` pairs joined with `; `.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_result(self) -> ProFormaResult<Vec<String>> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(ProFormaError::ValidationFailed { report: self })
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }
}

/// Run every rule and collect all failures.
pub fn validate_assumptions(inputs: &InputAssumptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    // --- Project ---
    if !(inputs.project_size > 0.0) {
        report.fail("project_size", "Project size must be greater than 0");
    }
    if inputs.project_name.chars().count() > 100 {
        report.fail("project_name", "Project name cannot exceed 100 characters");
    }

    // --- Costs ---
    let amounts = [
        ("land_cost", inputs.land_cost),
        ("acquisition_costs", inputs.acquisition_costs),
        ("construction_cost", inputs.construction_cost),
        ("financing_costs", inputs.financing_costs),
        ("marketing_costs", inputs.marketing_costs),
        ("legal_costs", inputs.legal_costs),
        ("insurance_costs", inputs.insurance_costs),
        ("property_taxes", inputs.property_taxes),
        ("utilities", inputs.utilities),
        ("maintenance_costs", inputs.maintenance_costs),
        ("loan_amount", inputs.loan_amount),
        ("equity_contribution", inputs.equity_contribution),
    ];
    for (field, value) in amounts {
        if !(value >= 0.0) {
            report.fail(field, "Amount cannot be negative");
        }
    }

    let percentages = [
        ("soft_costs", inputs.soft_costs),
        ("contingency", inputs.contingency),
        ("management_fees", inputs.management_fees),
        ("loan_to_cost", inputs.loan_to_cost),
        ("exit_costs", inputs.exit_costs),
        ("market_vacancy", inputs.market_vacancy),
        ("equity_return", inputs.equity_return),
        ("discount_rate", inputs.discount_rate),
    ];
    for (field, value) in percentages {
        if !(0.0..=100.0).contains(&value) {
            report.fail(field, "Percentage must be between 0 and 100");
        }
    }

    // --- Revenue ---
    if !(inputs.market_rent >= MIN_MARKET_RENT) {
        report.fail(
            "market_rent",
            format!("Market rent must be at least ${MIN_MARKET_RENT:.2} per sq ft per month"),
        );
    }
    if !(0.0..=MAX_VACANCY_RATE).contains(&inputs.vacancy_rate) {
        report.fail(
            "vacancy_rate",
            format!("Vacancy rate must be between 0 and {MAX_VACANCY_RATE}%"),
        );
    }
    let growth = [
        ("rent_growth_rate", inputs.rent_growth_rate),
        ("expense_growth_rate", inputs.expense_growth_rate),
        ("inflation_rate", inputs.inflation_rate),
        ("market_appreciation", inputs.market_appreciation),
    ];
    for (field, value) in growth {
        if !(-GROWTH_RATE_BOUND..=GROWTH_RATE_BOUND).contains(&value) {
            report.fail(
                field,
                format!("Rate must be between -{GROWTH_RATE_BOUND}% and {GROWTH_RATE_BOUND}%"),
            );
        }
    }

    // --- Financing ---
    if !(0.0..=MAX_INTEREST_RATE).contains(&inputs.interest_rate) {
        report.fail(
            "interest_rate",
            format!("Interest rate must be between 0 and {MAX_INTEREST_RATE}%"),
        );
    }
    if !(1..=MAX_LOAN_TERM_YEARS).contains(&inputs.loan_term) {
        report.fail(
            "loan_term",
            format!("Loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years"),
        );
    }

    // --- Market ---
    let (cap_low, cap_high) = CAP_RATE_RANGE;
    if !(cap_low..=cap_high).contains(&inputs.market_cap_rate) {
        report.fail(
            "market_cap_rate",
            format!("Market cap rate must be between {cap_low}% and {cap_high}%"),
        );
    }
    if !(inputs.exit_cap_rate > 0.0) {
        report.fail("exit_cap_rate", "Exit cap rate must be greater than 0");
    }

    // --- Risk ---
    for (name, score) in inputs.risk_factors.named() {
        if !(1..=10).contains(&score) {
            report.fail(
                &format!("risk_factors.{name}"),
                "Risk score must be between 1 and 10",
            );
        }
    }

    // --- Timeline ---
    if !(MIN_CONSTRUCTION_MONTHS..=MAX_PHASE_MONTHS).contains(&inputs.construction_duration) {
        report.fail(
            "construction_duration",
            format!(
                "Construction duration must be between {MIN_CONSTRUCTION_MONTHS} and {MAX_PHASE_MONTHS} months"
            ),
        );
    }
    let phases = [
        ("lease_up_period", "Lease-up period", inputs.lease_up_period),
        ("stabilization_period", "Stabilization period", inputs.stabilization_period),
    ];
    for (field, label, months) in phases {
        if !(1..=MAX_PHASE_MONTHS).contains(&months) {
            report.fail(
                field,
                format!("{label} must be between 1 and {MAX_PHASE_MONTHS} months"),
            );
        }
    }
    if !(1..=MAX_HOLD_YEARS).contains(&inputs.hold_period) {
        report.fail(
            "hold_period",
            format!("Hold period must be between 1 and {MAX_HOLD_YEARS} years"),
        );
    }

    // --- Cross-field ---
    // Costs only: the full projection allocates per hold year and must not
    // run on periods that have just been rejected.
    let total_project_cost = project_costs(inputs).total_project_cost;
    if total_project_cost.is_finite() {
        let max_loan = total_project_cost * inputs.loan_to_cost / 100.0;
        if inputs.loan_amount > max_loan {
            report.fail(
                "loan_amount",
                format!(
                    "Loan amount cannot exceed {:.1}% of total project cost (${max_loan:.0})",
                    inputs.loan_to_cost
                ),
            );
        }
        let funding = inputs.loan_amount + inputs.equity_contribution;
        if funding < total_project_cost {
            report.warnings.push(format!(
                "Loan and equity (${funding:.0}) leave ${:.0} of the ${total_project_cost:.0} project cost unfunded",
                total_project_cost - funding
            ));
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}
