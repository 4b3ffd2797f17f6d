use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use proforma_core::time_value::{self, IrrSolution};
use proforma_core::with_metadata;

use crate::input;

/// Arguments for net present value
#[derive(Args)]
pub struct NpvArgs {
    /// Discount rate per period as a decimal (0.10 = 10%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: f64,

    /// Comma-separated cash flows, period 0 first (e.g. "-1000,300,400,500")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<f64>>,
}

/// Arguments for internal rate of return
#[derive(Args)]
pub struct IrrArgs {
    /// Comma-separated cash flows, period 0 first
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<f64>>,

    /// Fail instead of reporting the last estimate when IRR does not converge
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for an amortizing loan payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: f64,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub annual_rate: f64,

    /// Amortization term in years
    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CashFlowSeries {
    cash_flows: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NpvOutput {
    npv: f64,
    rate: f64,
    periods: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct IrrOutput {
    irr: f64,
    converged: bool,
    solution: IrrSolution,
}

#[derive(Debug, Serialize, Deserialize)]
struct PaymentOutput {
    payment: f64,
    annual_debt_service: f64,
    total_payments: u32,
    total_interest: f64,
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let cash_flows = resolve_cash_flows(args.cash_flows, "NPV")?;
    let output = NpvOutput {
        npv: time_value::npv(&cash_flows, args.rate),
        rate: args.rate,
        periods: cash_flows.len(),
    };
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(serde_json::to_value(with_metadata(
        "Net Present Value (period 0 undiscounted)",
        &CashFlowSeries { cash_flows },
        Vec::new(),
        elapsed,
        output,
    ))?)
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let cash_flows = resolve_cash_flows(args.cash_flows, "IRR")?;
    let solution = time_value::irr(&cash_flows);

    let mut warnings = Vec::new();
    if !solution.is_converged() {
        if args.strict {
            solution.require_converged()?;
        }
        warnings.push(format!(
            "IRR did not converge within {} iterations; reporting the last estimate",
            time_value::MAX_IRR_ITERATIONS
        ));
    }

    let output = IrrOutput {
        irr: solution.rate(),
        converged: solution.is_converged(),
        solution,
    };
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(serde_json::to_value(with_metadata(
        "Internal Rate of Return (Newton-Raphson from 10%)",
        &CashFlowSeries { cash_flows },
        warnings,
        elapsed,
        output,
    ))?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let total_payments = args.years.checked_mul(12).ok_or("--years is too large")?;
    let payment =
        time_value::amortizing_payment(args.principal, args.annual_rate / 100.0 / 12.0, total_payments);

    let output = PaymentOutput {
        payment,
        annual_debt_service: payment * 12.0,
        total_payments,
        total_interest: payment * f64::from(total_payments) - args.principal,
    };
    let elapsed = start.elapsed().as_micros() as u64;

    let assumptions = serde_json::json!({
        "principal": args.principal,
        "annual_rate": args.annual_rate,
        "years": args.years,
    });
    Ok(serde_json::to_value(with_metadata(
        "Fully amortizing level monthly payment",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))?)
}

/// Cash flows from the flag, or a JSON array / `{"cash_flows": [...]}` on stdin.
fn resolve_cash_flows(
    flag: Option<Vec<f64>>,
    purpose: &str,
) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let cash_flows = if let Some(flows) = flag {
        flows
    } else if let Some(data) = input::stdin::read_stdin()? {
        match data {
            Value::Array(_) => serde_json::from_value(data)?,
            other => serde_json::from_value::<CashFlowSeries>(other)?.cash_flows,
        }
    } else {
        return Err(format!("--cash-flows or stdin required for {purpose}").into());
    };

    if cash_flows.is_empty() {
        return Err(format!("At least one cash flow is required for {purpose}").into());
    }
    Ok(cash_flows)
}
