//! Stage outcomes and the failure signal returned to callers

use std::fmt;

use log::{error, warn};
use thiserror::Error;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    CatalogFetch,
    /// Degrades only; never the stage of a `PipelineError`
    Enrichment,
    Selection,
    Transformation,
    Execution,
}

impl PipelineStage {
    /// Lowercase name used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogFetch => "catalog-fetch",
            Self::Enrichment => "enrichment",
            Self::Selection => "selection",
            Self::Transformation => "transformation",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-level failure: which stage aborted, and why (for logs)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Pipeline failed at {stage}: {reason}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub reason: String,
}

/// Result of one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// Stage produced its value
    Success(T),
    /// Stage failed but supplied a value the pipeline can continue with
    SoftFailure { fallback: T, reason: String },
    /// Stage failed; the request stops here
    HardFailure(String),
}

impl<T> StageOutcome<T> {
    /// Hard-failing view of a fallible operation
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::HardFailure(e.to_string()),
        }
    }

    /// Collapse to a value or a `PipelineError`, logging any failure
    pub fn resolve(self, stage: PipelineStage) -> Result<T, PipelineError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::SoftFailure { fallback, reason } => {
                warn!("Stage {} degraded, continuing: {}", stage, reason);
                Ok(fallback)
            }
            Self::HardFailure(reason) => {
                error!("Stage {} failed, aborting request: {}", stage, reason);
                Err(PipelineError { stage, reason })
            }
        }
    }
}
