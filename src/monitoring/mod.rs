pub mod logger;

pub use logger::{EvaluationLogEntry, EvaluationLogger};
