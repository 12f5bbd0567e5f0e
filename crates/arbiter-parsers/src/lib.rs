mod contract;
mod ideal;
mod qag;
mod rubric;

pub use contract::{FormatInstructions, OutputContract, SchemaDescription};
pub use ideal::IdealAnswerContract;
pub use qag::{QagContract, MAX_QUESTIONS, MIN_QUESTIONS};
pub use rubric::RubricContract;
