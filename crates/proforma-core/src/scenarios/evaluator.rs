use serde::{Deserialize, Serialize};

use crate::development::assumptions::InputAssumptions;
use crate::development::metrics::{compute_metrics, DerivedMetrics};
use crate::types::{Money, Percent};

/// A perturbation applied to the base assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioShock {
    /// Change in hard construction cost, in percent (10 = +10%)
    pub construction_cost_pct: Percent,
    /// Change in market rent, in percent
    pub rent_pct: Percent,
    /// Change in the loan interest rate, in percentage points
    pub interest_rate_pp: Percent,
    /// Change in construction duration, in months
    pub timeline_months: f64,
}

impl ScenarioShock {
    pub fn is_neutral(&self) -> bool {
        self.construction_cost_pct == 0.0
            && self.rent_pct == 0.0
            && self.interest_rate_pp == 0.0
            && self.timeline_months == 0.0
    }
}

/// Headline metrics of one evaluated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub npv: Money,
    pub irr: Percent,
    pub profit_margin: Percent,
    pub break_even_occupancy: Percent,
    pub annual_cash_flow: Money,
}

impl ScenarioOutcome {
    pub fn from_metrics(metrics: &DerivedMetrics) -> Self {
        Self {
            npv: metrics.net_present_value,
            irr: metrics.internal_rate_of_return,
            profit_margin: metrics.profit_margin,
            break_even_occupancy: metrics.break_even_occupancy,
            annual_cash_flow: metrics.annual_cash_flow,
        }
    }
}

/// Strategy for turning a shock into adjusted metrics.
pub trait ScenarioEvaluator {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        inputs: &InputAssumptions,
        base: &DerivedMetrics,
        shock: &ScenarioShock,
    ) -> ScenarioOutcome;
}

/// Scales base metrics by first-order factors instead of re-running the projection.
///
/// - cost: `1 - cost% / 100`
/// - rent: `1 + rent% / 100`
/// - rate: `1 - loan * pp / 100 / |annual cash flow|` (extra interest against cash flow)
/// - timeline: `1 - months / development months`
///
/// Each factor is floored at zero. NPV and IRR take the product of all four;
/// profit margin takes cost and rent. Annual cash flow takes the rent factor
/// and then pays the extra interest outright. Adjustments move a value by a
/// share of its magnitude so that adverse shocks always push it down, even
/// when the base value is negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearApproximation;

impl ScenarioEvaluator for LinearApproximation {
    fn name(&self) -> &'static str {
        "linear-approximation"
    }

    fn evaluate(
        &self,
        inputs: &InputAssumptions,
        base: &DerivedMetrics,
        shock: &ScenarioShock,
    ) -> ScenarioOutcome {
        if shock.is_neutral() {
            return ScenarioOutcome::from_metrics(base);
        }

        let cost_factor = floor_at_zero(1.0 - shock.construction_cost_pct / 100.0);
        let revenue_factor = floor_at_zero(1.0 + shock.rent_pct / 100.0);
        let extra_interest = inputs.loan_amount * shock.interest_rate_pp / 100.0;
        let financing_factor = if shock.interest_rate_pp == 0.0 {
            1.0
        } else {
            floor_at_zero(1.0 - extra_interest / base.annual_cash_flow.abs())
        };
        let timeline_factor = if shock.timeline_months == 0.0 {
            1.0
        } else {
            floor_at_zero(1.0 - shock.timeline_months / f64::from(base.development_months))
        };
        let return_factor = cost_factor * revenue_factor * financing_factor * timeline_factor;

        let break_even_occupancy = if shock.rent_pct == 0.0 && shock.interest_rate_pp == 0.0 {
            base.break_even_occupancy
        } else {
            (base.annual_debt_service + base.operating_expenses + extra_interest)
                / (base.gross_potential_rent * revenue_factor)
                * 100.0
        };

        ScenarioOutcome {
            npv: scale(base.net_present_value, return_factor),
            irr: scale(base.internal_rate_of_return, return_factor),
            profit_margin: scale(base.profit_margin, cost_factor * revenue_factor),
            break_even_occupancy,
            annual_cash_flow: scale(base.annual_cash_flow, revenue_factor) - extra_interest,
        }
    }
}

/// Applies the shock to a copy of the assumptions and re-runs the projection.
///
/// Construction duration does not enter any return metric, so timeline
/// shocks only move the break-even timeline here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReprojection;

impl ScenarioEvaluator for FullReprojection {
    fn name(&self) -> &'static str {
        "full-reprojection"
    }

    fn evaluate(
        &self,
        inputs: &InputAssumptions,
        base: &DerivedMetrics,
        shock: &ScenarioShock,
    ) -> ScenarioOutcome {
        if shock.is_neutral() {
            return ScenarioOutcome::from_metrics(base);
        }
        ScenarioOutcome::from_metrics(&compute_metrics(&apply_shock(inputs, shock)))
    }
}

/// Copy of `inputs` with the shock applied to the underlying assumptions.
pub fn apply_shock(inputs: &InputAssumptions, shock: &ScenarioShock) -> InputAssumptions {
    let mut shocked = inputs.clone();
    shocked.construction_cost *= 1.0 + shock.construction_cost_pct / 100.0;
    shocked.market_rent *= 1.0 + shock.rent_pct / 100.0;
    shocked.interest_rate += shock.interest_rate_pp;
    let months = i64::from(inputs.construction_duration) + shock.timeline_months.round() as i64;
    shocked.construction_duration = months.clamp(0, i64::from(u32::MAX)) as u32;
    shocked
}

/// Move `base` by `(factor - 1)` of its magnitude.
fn scale(base: f64, factor: f64) -> f64 {
    if factor == 1.0 {
        return base;
    }
    base + base.abs() * (factor - 1.0)
}

/// A factor below zero would flip the sign of the adjustment. NaN passes through.
fn floor_at_zero(factor: f64) -> f64 {
    if factor < 0.0 {
        0.0
    } else {
        factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> (InputAssumptions, DerivedMetrics) {
        let inputs = InputAssumptions::default();
        let metrics = compute_metrics(&inputs);
        (inputs, metrics)
    }

    #[test]
    fn test_neutral_shock_returns_base_metrics() {
        let (inputs, metrics) = base();
        let shock = ScenarioShock::default();
        let expected = ScenarioOutcome::from_metrics(&metrics);
        assert_eq!(LinearApproximation.evaluate(&inputs, &metrics, &shock), expected);
        assert_eq!(FullReprojection.evaluate(&inputs, &metrics, &shock), expected);
    }

    #[test]
    fn test_cost_shock_scales_returns_proportionally() {
        let (inputs, metrics) = base();
        let shock = ScenarioShock {
            construction_cost_pct: 10.0,
            ..ScenarioShock::default()
        };
        let out = LinearApproximation.evaluate(&inputs, &metrics, &shock);
        assert!((out.irr - metrics.internal_rate_of_return * 0.9).abs() < 1e-9);
        assert!((out.npv - metrics.net_present_value * 0.9).abs() < 1e-6);
        assert!((out.profit_margin - metrics.profit_margin * 0.9).abs() < 1e-9);
        assert_eq!(out.break_even_occupancy, metrics.break_even_occupancy);
        assert_eq!(out.annual_cash_flow, metrics.annual_cash_flow);
    }

    #[test]
    fn test_rate_shock_charges_extra_interest_against_cash_flow() {
        let (inputs, metrics) = base();
        let shock = ScenarioShock {
            interest_rate_pp: 1.0,
            ..ScenarioShock::default()
        };
        let out = LinearApproximation.evaluate(&inputs, &metrics, &shock);
        // 1% on an $8M loan
        assert!((out.annual_cash_flow - (metrics.annual_cash_flow - 80_000.0)).abs() < 1e-6);
        assert!(out.irr < metrics.internal_rate_of_return);
        assert!(out.break_even_occupancy > metrics.break_even_occupancy);
        assert_eq!(out.profit_margin, metrics.profit_margin);
    }

    fn underwater() -> (InputAssumptions, DerivedMetrics) {
        let inputs = InputAssumptions {
            loan_amount: 20_000_000.0,
            ..InputAssumptions::default()
        };
        let metrics = compute_metrics(&inputs);
        (inputs, metrics)
    }

    #[test]
    fn test_rate_rise_hurts_negative_cash_flow() {
        let (inputs, metrics) = underwater();
        assert!(metrics.annual_cash_flow < 0.0);

        let shock = ScenarioShock {
            interest_rate_pp: 1.0,
            ..ScenarioShock::default()
        };
        let out = LinearApproximation.evaluate(&inputs, &metrics, &shock);
        assert!((out.annual_cash_flow - (metrics.annual_cash_flow - 200_000.0)).abs() < 1e-6);
        assert!(out.irr < metrics.internal_rate_of_return);
        assert!(out.npv < metrics.net_present_value);
        assert!(out.break_even_occupancy > metrics.break_even_occupancy);
    }

    #[test]
    fn test_rate_cut_helps_negative_cash_flow() {
        let (inputs, metrics) = underwater();
        let shock = ScenarioShock {
            interest_rate_pp: -1.0,
            ..ScenarioShock::default()
        };
        let out = LinearApproximation.evaluate(&inputs, &metrics, &shock);
        assert!(out.annual_cash_flow > metrics.annual_cash_flow);
        assert!(out.irr > metrics.internal_rate_of_return);
    }

    #[test]
    fn test_large_rate_rise_floors_factor_at_zero() {
        let (inputs, metrics) = underwater();
        let shock = ScenarioShock {
            interest_rate_pp: 3.0,
            ..ScenarioShock::default()
        };
        let out = LinearApproximation.evaluate(&inputs, &metrics, &shock);
        // $600k extra interest exceeds the whole cash flow: the factor bottoms out
        let irr = metrics.internal_rate_of_return;
        assert!((out.irr - (irr - irr.abs())).abs() < 1e-9);
        assert!(out.annual_cash_flow < metrics.annual_cash_flow - 599_999.0);
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(floor_at_zero(-1.5), 0.0);
        assert_eq!(floor_at_zero(0.4), 0.4);
        assert!(floor_at_zero(f64::NAN).is_nan());
    }

    #[test]
    fn test_adverse_shock_lowers_negative_values() {
        assert_eq!(scale(-10.0, 0.9), -11.0);
        assert_eq!(scale(10.0, 0.9), 9.0);
        assert_eq!(scale(-10.0, 1.1), -9.0);
    }

    #[test]
    fn test_full_reprojection_reruns_metrics() {
        let (inputs, metrics) = base();
        let shock = ScenarioShock {
            rent_pct: -10.0,
            ..ScenarioShock::default()
        };
        let out = FullReprojection.evaluate(&inputs, &metrics, &shock);
        let expected = compute_metrics(&InputAssumptions {
            market_rent: 2.25,
            ..InputAssumptions::default()
        });
        assert!((out.irr - expected.internal_rate_of_return).abs() < 1e-6);
        assert!(out.irr < metrics.internal_rate_of_return);
    }

    #[test]
    fn test_apply_shock_clamps_timeline() {
        let inputs = InputAssumptions::default();
        let shocked = apply_shock(
            &inputs,
            &ScenarioShock {
                timeline_months: -30.0,
                interest_rate_pp: 1.0,
                ..ScenarioShock::default()
            },
        );
        assert_eq!(shocked.construction_duration, 0);
        assert_eq!(shocked.interest_rate, 7.5);
    }
}
