//! Batch evaluation and report generation

pub mod runner;
pub mod stats;

pub use runner::{run_recorded, EvaluationReport, Evaluator, ProgressSample, RunRecord};
pub use stats::Summary;
