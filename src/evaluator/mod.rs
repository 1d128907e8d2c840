pub mod compliance;
pub mod dimensions;
pub mod fitment;
pub mod orchestrator;
pub mod scorer;

pub use compliance::ComplianceScreener;
pub use dimensions::CanonicalDimensions;
pub use fitment::FitmentValidator;
pub use orchestrator::{EvaluationResult, ProductEvaluator};
pub use scorer::OpportunityScorer;
