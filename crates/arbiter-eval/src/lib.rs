mod ideal;
mod judge;
mod qag;
mod request;
mod rubric;
mod strategy;

pub use ideal::{IdealAnswerStrategy, IDEAL_MAX_TOKENS};
pub use judge::Judge;
pub use qag::{QagStrategy, QAG_MAX_TOKENS};
pub use request::{IdealAnswerRequest, QagRequest, RubricRequest};
pub use rubric::{RubricStrategy, RUBRIC_MAX_TOKENS};
pub use strategy::{EvaluationStrategy, InvocationParams, StrategyOutput};
