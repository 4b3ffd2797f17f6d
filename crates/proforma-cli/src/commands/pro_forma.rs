use clap::{Args, ValueEnum};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use proforma_core::development::assumptions::InputAssumptions;
use proforma_core::development::cash_flow::simulate_monthly;
use proforma_core::development::metrics::compute_metrics;
use proforma_core::scenarios::{FullReprojection, LinearApproximation, ScenarioEvaluator};
use proforma_core::validation::validate_assumptions;
use proforma_core::{calculate_with, with_metadata};

use crate::input;

/// How sensitivity and stress scenarios are evaluated
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum EvaluatorChoice {
    /// Scale the base metrics by first-order factors
    #[default]
    Linear,
    /// Re-run the projection on shocked assumptions
    Reprojection,
}

impl EvaluatorChoice {
    fn evaluator(self) -> &'static dyn ScenarioEvaluator {
        match self {
            EvaluatorChoice::Linear => &LinearApproximation,
            EvaluatorChoice::Reprojection => &FullReprojection,
        }
    }
}

#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON assumptions file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Project even when the assumptions fail validation
    #[arg(long)]
    pub skip_validation: bool,

    /// Scenario evaluator for sensitivity and stress tests
    #[arg(long, value_enum, default_value_t = EvaluatorChoice::Linear)]
    pub evaluator: EvaluatorChoice,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON assumptions file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON assumptions file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(args.input.as_deref(), "pro-forma calculation")?;

    let mut validation_warnings = Vec::new();
    if args.skip_validation {
        warn!("skipping assumption validation");
    } else {
        validation_warnings = validate_assumptions(&assumptions).into_result()?;
    }

    info!(
        project = %assumptions.project_name,
        evaluator = ?args.evaluator,
        "running pro-forma"
    );
    let mut result = calculate_with(&assumptions, args.evaluator.evaluator());
    result.warnings.extend(validation_warnings);
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(args.input.as_deref(), "validation")?;
    let report = validate_assumptions(&assumptions);
    report.clone().into_result()?;
    Ok(serde_json::to_value(report)?)
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let assumptions = load_assumptions(args.input.as_deref(), "cash flow projection")?;
    let metrics = compute_metrics(&assumptions);
    let projections = simulate_monthly(&assumptions, &metrics);
    let elapsed = start.elapsed().as_micros() as u64;

    let result = with_metadata(
        "Monthly development cash flow (construction, lease-up, stabilized)",
        &assumptions,
        Vec::new(),
        elapsed,
        projections,
    );
    Ok(serde_json::to_value(result)?)
}

fn load_assumptions(
    path: Option<&str>,
    purpose: &str,
) -> Result<InputAssumptions, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file.json> or stdin required for {purpose}").into())
    }
}
