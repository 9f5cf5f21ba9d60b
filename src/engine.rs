pub mod axes;
pub mod evaluator;
pub mod runtime;
pub mod value;
