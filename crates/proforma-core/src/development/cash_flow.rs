use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::DerivedMetrics;
use crate::types::{Money, Percent};

/// Development phase a simulated month falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Construction,
    LeaseUp,
    Stabilized,
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub period: String,
    pub date: NaiveDate,
    pub phase: Phase,
    pub construction_costs: Money,
    pub revenue: Money,
    pub operating_expenses: Money,
    pub debt_service: Money,
    pub net_operating_income: Money,
    pub cash_flow: Money,
    pub cumulative_cash_flow: Money,
    pub occupancy: Percent,
}

/// One hold year with rent and expense growth applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualProjection {
    pub year: u32,
    pub gross_rent: Money,
    pub effective_gross_income: Money,
    pub operating_expenses: Money,
    pub net_operating_income: Money,
    pub debt_service: Money,
    pub cash_flow: Money,
}

/// Expand the assumptions into a month-by-month timeline.
///
/// The result always has `construction + lease-up + stabilization + hold * 12`
/// entries in chronological order. Cumulative cash flow starts from the
/// negative equity contribution.
pub fn simulate_monthly(
    inputs: &InputAssumptions,
    metrics: &DerivedMetrics,
) -> Vec<CashFlowProjection> {
    let construction = inputs.construction_duration;
    let lease_up_end = construction + inputs.lease_up_period;
    let total = inputs.total_months();

    let stabilized_occupancy = inputs.stabilized_occupancy();
    let monthly_construction = metrics.total_construction_cost / f64::from(construction);
    let monthly_gpr = metrics.gross_potential_rent / 12.0;
    let monthly_egi = metrics.effective_gross_income / 12.0;
    let monthly_opex = metrics.operating_expenses / 12.0;

    let mut projections = Vec::with_capacity(total as usize);
    let mut cumulative = -inputs.equity_contribution;

    for i in 0..total {
        let (phase, construction_costs, revenue, operating_expenses, debt_service, occupancy) =
            if i < construction {
                (Phase::Construction, monthly_construction, 0.0, 0.0, 0.0, 0.0)
            } else if i < lease_up_end {
                let occupancy = lease_up_occupancy(
                    i - construction,
                    inputs.lease_up_period,
                    stabilized_occupancy,
                );
                (
                    Phase::LeaseUp,
                    0.0,
                    monthly_gpr * occupancy / 100.0,
                    monthly_opex * occupancy / stabilized_occupancy,
                    metrics.monthly_debt_service,
                    occupancy,
                )
            } else {
                (
                    Phase::Stabilized,
                    0.0,
                    monthly_egi,
                    monthly_opex,
                    metrics.monthly_debt_service,
                    stabilized_occupancy,
                )
            };

        let net_operating_income = revenue - operating_expenses;
        let cash_flow = net_operating_income - debt_service;
        cumulative += cash_flow;

        projections.push(CashFlowProjection {
            period: format!("Month {}", i + 1),
            date: month_date(inputs.construction_start_date, i),
            phase,
            construction_costs,
            revenue,
            operating_expenses,
            debt_service,
            net_operating_income,
            cash_flow,
            cumulative_cash_flow: cumulative,
            occupancy,
        });
    }

    projections
}

/// Year-by-year hold-period projection with compounding rent and expense growth.
pub fn project_annual(inputs: &InputAssumptions, metrics: &DerivedMetrics) -> Vec<AnnualProjection> {
    let rent_growth = 1.0 + inputs.rent_growth_rate / 100.0;
    let expense_growth = 1.0 + inputs.expense_growth_rate / 100.0;
    let fixed_expenses = inputs.property_taxes + inputs.utilities + inputs.maintenance_costs;

    let mut gross_rent = metrics.gross_potential_rent;
    let mut fixed = fixed_expenses;
    let mut years = Vec::with_capacity(inputs.hold_period as usize);

    for year in 1..=inputs.hold_period {
        if year > 1 {
            gross_rent *= rent_growth;
            fixed *= expense_growth;
        }
        let effective_gross_income = gross_rent * (1.0 - inputs.vacancy_rate / 100.0);
        let operating_expenses =
            fixed + effective_gross_income * (inputs.management_fees / 100.0);
        let net_operating_income = effective_gross_income - operating_expenses;

        years.push(AnnualProjection {
            year,
            gross_rent,
            effective_gross_income,
            operating_expenses,
            net_operating_income,
            debt_service: metrics.annual_debt_service,
            cash_flow: net_operating_income - metrics.annual_debt_service,
        });
    }

    years
}

/// Linear ramp from 0 in the first lease-up month to stabilized occupancy in
/// the last. A single-month lease-up jumps straight to stabilized.
fn lease_up_occupancy(month: u32, lease_up_period: u32, stabilized: Percent) -> Percent {
    if lease_up_period <= 1 {
        return stabilized;
    }
    stabilized * f64::from(month) / f64::from(lease_up_period - 1)
}

fn month_date(start: NaiveDate, offset: u32) -> NaiveDate {
    start.checked_add_months(Months::new(offset)).unwrap_or(NaiveDate::MAX)
}
