pub mod evaluator;
pub mod sensitivity;
pub mod stress;

pub use evaluator::{FullReprojection, LinearApproximation, ScenarioEvaluator, ScenarioShock};
pub use sensitivity::{run_scenarios, run_scenarios_with, Impact, SensitivityResult};
pub use stress::{run_stress_tests, run_stress_tests_with, StressTestResult};
