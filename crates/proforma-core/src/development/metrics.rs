use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::time_value::{self, IrrSolution};
use crate::types::{Money, Multiple, Percent, RiskLevel};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Single-point outputs of one projection run.
///
/// Nothing here is guarded against division by zero beyond the zero-rate
/// loan case; degenerate inputs show up as NaN or infinite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    // --- Costs ---
    pub total_construction_cost: Money,
    pub soft_costs_amount: Money,
    pub contingency_amount: Money,
    pub total_project_cost: Money,

    // --- Income (stabilized, annual) ---
    pub gross_potential_rent: Money,
    pub effective_gross_income: Money,
    pub management_fee_amount: Money,
    pub operating_expenses: Money,
    pub net_operating_income: Money,

    // --- Debt ---
    pub monthly_debt_service: Money,
    pub annual_debt_service: Money,
    pub debt_service_coverage_ratio: Multiple,

    // --- Returns ---
    pub annual_cash_flow: Money,
    /// Equity cash-flow vector the IRR and NPV were solved on
    pub equity_cash_flows: Vec<Money>,
    pub irr_solution: IrrSolution,
    pub internal_rate_of_return: Percent,
    pub net_present_value: Money,
    /// Years until cumulative cash flow repays equity
    pub payback_period: f64,
    pub equity_multiple: Multiple,
    pub cash_on_cash_return: Percent,
    pub return_on_equity: Percent,
    pub return_on_cost: Percent,
    pub total_revenue: Money,
    pub total_profit: Money,
    pub profit_margin: Percent,

    // --- Valuation ---
    pub market_value: Money,
    pub exit_value: Money,

    // --- Break-even ---
    pub break_even_occupancy: Percent,
    /// Monthly rent per sq ft that covers debt service and operating expenses
    pub break_even_rent: Money,
    /// Months from construction start until occupancy reaches break-even
    pub break_even_timeline: f64,
    /// Stabilized occupancy less break-even occupancy, in percentage points
    pub margin_of_safety: Percent,

    // --- Risk ---
    pub risk_adjusted_return: Percent,
    pub risk_rating: RiskLevel,

    // --- Timeline ---
    pub development_months: u32,
    pub total_timeline_months: u32,
}

/// Hard and soft costs up to the total project cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectCosts {
    pub total_construction_cost: Money,
    pub soft_costs_amount: Money,
    pub contingency_amount: Money,
    pub total_project_cost: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Cost stack only. Touches no period field, so it is safe on unchecked input.
pub fn project_costs(inputs: &InputAssumptions) -> ProjectCosts {
    let total_construction_cost = inputs.project_size * inputs.construction_cost;
    let soft_costs_amount = total_construction_cost * (inputs.soft_costs / 100.0);
    let contingency_base =
        inputs.land_cost + inputs.acquisition_costs + total_construction_cost + soft_costs_amount;
    let contingency_amount = contingency_base * (inputs.contingency / 100.0);
    let total_project_cost = contingency_base
        + contingency_amount
        + inputs.financing_costs
        + inputs.marketing_costs
        + inputs.legal_costs
        + inputs.insurance_costs;

    ProjectCosts {
        total_construction_cost,
        soft_costs_amount,
        contingency_amount,
        total_project_cost,
    }
}

/// Derive every single-point metric from one set of assumptions.
pub fn compute_metrics(inputs: &InputAssumptions) -> DerivedMetrics {
    // --- Costs ---
    let ProjectCosts {
        total_construction_cost,
        soft_costs_amount,
        contingency_amount,
        total_project_cost,
    } = project_costs(inputs);

    // --- Income ---
    let gross_potential_rent = inputs.project_size * inputs.market_rent * 12.0;
    let effective_gross_income = gross_potential_rent * (1.0 - inputs.vacancy_rate / 100.0);
    let management_fee_amount = effective_gross_income * (inputs.management_fees / 100.0);
    let operating_expenses = inputs.property_taxes
        + inputs.utilities
        + inputs.maintenance_costs
        + management_fee_amount;
    let net_operating_income = effective_gross_income - operating_expenses;

    // --- Debt ---
    let monthly_debt_service = time_value::amortizing_payment(
        inputs.loan_amount,
        inputs.interest_rate / 100.0 / 12.0,
        inputs.loan_term.saturating_mul(12),
    );
    let annual_debt_service = monthly_debt_service * 12.0;
    let debt_service_coverage_ratio = net_operating_income / annual_debt_service;
    let annual_cash_flow = net_operating_income - annual_debt_service;

    // --- Equity returns ---
    let equity = inputs.equity_contribution;
    let equity_cash_flows = equity_cash_flows(equity, annual_cash_flow, inputs.hold_period);
    let irr_solution = time_value::irr(&equity_cash_flows);
    let internal_rate_of_return = irr_solution.rate();
    let net_present_value = time_value::npv(&equity_cash_flows, inputs.discount_rate / 100.0);

    let hold_years = f64::from(inputs.hold_period);
    let payback_period = time_value::payback_period(equity, annual_cash_flow);
    let equity_multiple = (annual_cash_flow * hold_years + equity) / equity;
    let cash_on_cash_return = annual_cash_flow / equity * 100.0;

    // --- Valuation & profit ---
    let market_value = net_operating_income / (inputs.market_cap_rate / 100.0);
    let exit_value = net_operating_income / (inputs.exit_cap_rate / 100.0)
        * (1.0 - inputs.exit_costs / 100.0);
    let total_revenue = effective_gross_income * hold_years;
    let total_profit = market_value - total_project_cost;
    let profit_margin = total_profit / market_value * 100.0;
    let return_on_equity = total_profit / equity * 100.0;
    let return_on_cost = net_operating_income / total_project_cost * 100.0;

    // --- Break-even ---
    let carrying_cost = annual_debt_service + operating_expenses;
    let break_even_occupancy = carrying_cost / gross_potential_rent * 100.0;
    let leasable_area_months = inputs.project_size * (1.0 - inputs.vacancy_rate / 100.0) * 12.0;
    let break_even_rent = carrying_cost / leasable_area_months;
    let stabilized_occupancy = inputs.stabilized_occupancy();
    let break_even_timeline = f64::from(inputs.construction_duration)
        + f64::from(inputs.lease_up_period) * (break_even_occupancy / stabilized_occupancy);
    let margin_of_safety = stabilized_occupancy - break_even_occupancy;

    // --- Risk ---
    let risk = &inputs.risk_factors;
    let headline_risk = u32::from(risk.construction_risk)
        + u32::from(risk.market_risk)
        + u32::from(risk.financing_risk);
    let risk_adjusted_return = internal_rate_of_return - f64::from(headline_risk) / 10.0;
    let risk_rating = rate_risk_adjusted_return(risk_adjusted_return);

    DerivedMetrics {
        total_construction_cost,
        soft_costs_amount,
        contingency_amount,
        total_project_cost,
        gross_potential_rent,
        effective_gross_income,
        management_fee_amount,
        operating_expenses,
        net_operating_income,
        monthly_debt_service,
        annual_debt_service,
        debt_service_coverage_ratio,
        annual_cash_flow,
        equity_cash_flows,
        irr_solution,
        internal_rate_of_return,
        net_present_value,
        payback_period,
        equity_multiple,
        cash_on_cash_return,
        return_on_equity,
        return_on_cost,
        total_revenue,
        total_profit,
        profit_margin,
        market_value,
        exit_value,
        break_even_occupancy,
        break_even_rent,
        break_even_timeline,
        margin_of_safety,
        risk_adjusted_return,
        risk_rating,
        development_months: inputs.development_months(),
        total_timeline_months: inputs.total_months(),
    }
}

/// `[-equity, cf, .., cf + equity]`, one entry per hold year plus time zero.
///
/// Returning the equity in the final year stands in for a terminal value.
pub fn equity_cash_flows(equity: Money, annual_cash_flow: Money, hold_period: u32) -> Vec<Money> {
    let n = hold_period as usize;
    let mut flows = Vec::with_capacity(n + 1);
    flows.push(-equity);
    for year in 1..=n {
        if year == n {
            flows.push(annual_cash_flow + equity);
        } else {
            flows.push(annual_cash_flow);
        }
    }
    flows
}

/// >15 low, >8 medium, otherwise high.
pub fn rate_risk_adjusted_return(risk_adjusted_return: Percent) -> RiskLevel {
    if risk_adjusted_return > 15.0 {
        RiskLevel::Low
    } else if risk_adjusted_return > 8.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
