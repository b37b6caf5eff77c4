//! Pipeline controller - catalog fetch, enrichment, selection, transformation, execution
//!
//! One request flows through the stages in order. Enrichment can only soften;
//! every other stage aborts the request on failure.

mod orchestrator;
mod stage;

pub use orchestrator::Pipeline;
pub use stage::{PipelineError, PipelineStage, StageOutcome};
