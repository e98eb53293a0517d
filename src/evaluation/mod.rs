//! Solution feasibility checking and cost evaluation.

mod evaluator;

pub use evaluator::{structural_violations, SolutionEvaluator, Violation, ViolationType};
