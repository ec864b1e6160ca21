//! Math tools.

pub mod eta_calculator;
pub mod math_evaluator;
pub mod percentage;

pub use eta_calculator::EtaCalculatorTool;
pub use math_evaluator::MathEvaluatorTool;
pub use percentage::PercentageCalculatorTool;
