use serde::{Deserialize, Serialize};

use crate::error::ProFormaError;
use crate::types::{Money, Percent};
use crate::ProFormaResult;

pub const CONVERGENCE_THRESHOLD: f64 = 1e-4;
pub const MAX_IRR_ITERATIONS: u32 = 100;
pub const IRR_INITIAL_GUESS: f64 = 0.10;

/// Outcome of the Newton-Raphson IRR search.
///
/// Both variants carry a rate expressed as a percentage. `DidNotConverge`
/// holds whatever estimate the iteration reached when it ran out of steps,
/// which may be NaN or infinite for degenerate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rate", rename_all = "snake_case")]
pub enum IrrSolution {
    Converged(Percent),
    DidNotConverge(Percent),
}

impl IrrSolution {
    /// The solved rate, or the last estimate if the search did not converge.
    pub fn rate(&self) -> Percent {
        match *self {
            IrrSolution::Converged(r) | IrrSolution::DidNotConverge(r) => r,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, IrrSolution::Converged(_))
    }

    /// Treat a non-converged search as an error.
    pub fn require_converged(self) -> ProFormaResult<Percent> {
        match self {
            IrrSolution::Converged(r) => Ok(r),
            IrrSolution::DidNotConverge(last) => Err(ProFormaError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: MAX_IRR_ITERATIONS,
                last_estimate: last,
            }),
        }
    }
}

/// Level payment on a fully amortizing loan: P * r / (1 - (1+r)^-n).
///
/// A rate of exactly zero falls back to straight-line `P / n`. Very long
/// terms tend to interest-only `P * r`. No other degenerate case is guarded.
pub fn amortizing_payment(principal: Money, monthly_rate: f64, total_payments: u32) -> Money {
    let n = f64::from(total_payments);
    if monthly_rate == 0.0 {
        return principal / n;
    }

    let discount = (1.0 + monthly_rate).powf(-n);
    principal * monthly_rate / (1.0 - discount)
}

/// Net Present Value of a series of cash flows, `cash_flows[0]` undiscounted.
///
/// `rate` is a periodic decimal rate (0.10 = 10%).
pub fn npv(cash_flows: &[Money], rate: f64) -> Money {
    let one_plus_r = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / one_plus_r.powi(t as i32))
        .sum()
}

/// Internal Rate of Return using Newton-Raphson, returned as a percentage.
pub fn irr(cash_flows: &[Money]) -> IrrSolution {
    let mut rate = IRR_INITIAL_GUESS;

    for _ in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate);

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return IrrSolution::Converged(rate * 100.0);
        }

        rate -= npv_val / dnpv;
    }

    IrrSolution::DidNotConverge(rate * 100.0)
}

/// NPV(r) and d(NPV)/dr = sum of -t * CF_t / (1+r)^(t+1) for t > 0.
fn npv_and_derivative(cash_flows: &[Money], rate: f64) -> (f64, f64) {
    let one_plus_r = 1.0 + rate;
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, cf) in cash_flows.iter().enumerate() {
        let t = t as i32;
        npv += cf / one_plus_r.powi(t);
        if t > 0 {
            dnpv -= f64::from(t) * cf / one_plus_r.powi(t + 1);
        }
    }

    (npv, dnpv)
}

/// Years needed for a level annual cash flow to return an investment.
///
/// Zero cash flow yields Infinity; negative cash flow yields a negative period.
pub fn payback_period(investment: Money, annual_cash_flow: Money) -> f64 {
    investment / annual_cash_flow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![-1000.0, 300.0, 400.0, 500.0];
        let result = npv(&cfs, 0.10);
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - -21.04).abs() < 0.01);
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![-100.0, 50.0, 50.0, 50.0];
        assert_eq!(npv(&cfs, 0.0), 50.0);
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![-1000.0, 400.0, 400.0, 400.0];
        let result = irr(&cfs);
        assert!(result.is_converged());
        // IRR should be ~9.7%
        assert!((result.rate() - 9.70).abs() < 0.01, "got {}", result.rate());
    }

    #[test]
    fn test_irr_round_trips_through_npv() {
        let cfs = vec![-3_000_000.0, 700_000.0, 700_000.0, 700_000.0, 700_000.0, 3_700_000.0];
        let rate = irr(&cfs).require_converged().unwrap();
        assert!(npv(&cfs, rate / 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_irr_all_positive_flows_does_not_converge() {
        // No sign change: NPV never reaches zero.
        let cfs = vec![100.0, 100.0, 100.0];
        let result = irr(&cfs);
        assert!(!result.is_converged());
        assert!(matches!(
            result.require_converged(),
            Err(ProFormaError::ConvergenceFailure { iterations: 100, .. })
        ));
    }

    #[test]
    fn test_irr_zero_series_stops_at_initial_guess() {
        let result = irr(&[0.0, 0.0, 0.0]);
        // NPV is already zero at the initial guess.
        assert_eq!(result, IrrSolution::Converged(10.0));
    }

    #[test]
    fn test_thirty_year_mortgage_payment() {
        let payment = amortizing_payment(300_000.0, 0.065 / 12.0, 360);
        assert!((payment - 1896.20).abs() < 0.01, "got {payment}");
    }

    #[test]
    fn test_zero_rate_payment() {
        assert_eq!(amortizing_payment(120_000.0, 0.0, 24), 5000.0);
    }

    #[test]
    fn test_endless_term_is_interest_only() {
        let payment = amortizing_payment(1_200_000.0, 0.005, u32::MAX);
        assert!((payment - 6_000.0).abs() < 1e-9, "got {payment}");
    }

    #[test]
    fn test_zero_term_payment_is_infinite() {
        assert!(amortizing_payment(120_000.0, 0.0, 0).is_infinite());
    }

    #[test]
    fn test_payback_period() {
        assert_eq!(payback_period(1_000_000.0, 250_000.0), 4.0);
        assert!(payback_period(1_000_000.0, 0.0).is_infinite());
    }
}
