//! Request enrichment
//!
//! Before selection, a request carrying an ISIC industry code at
//! `submission.initialInformation.codeISIC` is augmented with the matching
//! AOC code, fetched through the same dispatcher used for every other tool.
//! Enrichment is best-effort: any failure leaves the request exactly as it
//! came in.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use crate::tools::{ISIC_TO_AOC_MAPPING, ToolDispatcher};

/// Object holding the trigger field
const SUBMISSION: &str = "submission";
const INITIAL_INFORMATION: &str = "initialInformation";

/// Trigger field and the field spliced in next to it
pub const ISIC_FIELD: &str = "codeISIC";
pub const AOC_FIELD: &str = "codeAOC";

/// Auxiliary tool input/output field names
const ISIC_INPUT: &str = "isicCode";
const AOC_OUTPUT: &str = "aocCode";

/// Label attached to the spliced AOC code
pub const AOC_DESCRIPTION: &str = "Activity on Location code derived from ISIC.";

/// What enrichment did to a request
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// No trigger field; request untouched
    Unchanged,
    /// Field spliced into `submission.initialInformation`
    Enriched { field: String, value: Value },
    /// Trigger present but enrichment failed; request untouched
    Skipped { reason: String },
}

impl EnrichmentOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped { reason: reason.into() }
    }
}

/// Resolves coded fields by calling the mapping tool
pub struct EnrichmentResolver {
    dispatcher: Arc<dyn ToolDispatcher>,
}

impl EnrichmentResolver {
    /// Create a resolver that reaches the mapping tool through `dispatcher`
    pub fn new(dispatcher: Arc<dyn ToolDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Enrich the request, returning it (possibly augmented) with the outcome
    pub async fn enrich(&self, mut request: Value) -> (Value, EnrichmentOutcome) {
        let isic_code = match find_isic_code(&request) {
            Ok(Some(code)) => code,
            Ok(None) => {
                debug!("No ISIC code found in the request. Skipping enrichment.");
                return (request, EnrichmentOutcome::Unchanged);
            }
            Err(outcome) => {
                warn!("Enrichment skipped: {:?}", outcome);
                return (request, outcome);
            }
        };

        info!("ISIC code found: {}. Fetching corresponding AOC code.", isic_code);

        let result = match self
            .dispatcher
            .execute(ISIC_TO_AOC_MAPPING, json!({ ISIC_INPUT: isic_code }))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to retrieve AOC code for ISIC {}: {}", isic_code, e);
                return (request, EnrichmentOutcome::skipped(format!("{} failed: {}", ISIC_TO_AOC_MAPPING, e)));
            }
        };

        let Some(aoc_code) = result.payload.get(AOC_OUTPUT).and_then(scalar_text) else {
            warn!(
                "Mapping response for ISIC {} has no '{}': {}",
                isic_code, AOC_OUTPUT, result.payload
            );
            return (request, EnrichmentOutcome::skipped(format!("response missing '{}'", AOC_OUTPUT)));
        };

        let value = json!({ "value": aoc_code, "description": AOC_DESCRIPTION });
        match initial_information_mut(&mut request) {
            Some(info) => {
                info.insert(AOC_FIELD.to_string(), value.clone());
                info!("Request enriched with AOC code {}", aoc_code);
                (
                    request,
                    EnrichmentOutcome::Enriched {
                        field: AOC_FIELD.to_string(),
                        value,
                    },
                )
            }
            None => (request, EnrichmentOutcome::skipped("initialInformation disappeared")),
        }
    }
}

/// Walk to the ISIC code. `Ok(None)` means there is nothing to enrich.
fn find_isic_code(request: &Value) -> Result<Option<String>, EnrichmentOutcome> {
    let Some(submission) = request.get(SUBMISSION) else {
        return Ok(None);
    };
    if !submission.is_object() {
        return Err(EnrichmentOutcome::skipped(format!("'{}' is not an object", SUBMISSION)));
    }

    let Some(info) = submission.get(INITIAL_INFORMATION) else {
        return Ok(None);
    };
    if !info.is_object() {
        return Err(EnrichmentOutcome::skipped(format!("'{}' is not an object", INITIAL_INFORMATION)));
    }

    let Some(code) = info.get(ISIC_FIELD) else {
        return Ok(None);
    };

    // either {"value": "..."} or a bare scalar
    let raw = match code {
        Value::Object(map) => map.get("value").and_then(scalar_text),
        other => scalar_text(other),
    };

    match raw {
        Some(code) if code.trim().is_empty() => Ok(None),
        Some(code) => Ok(Some(code.trim().to_string())),
        None => Err(EnrichmentOutcome::skipped(format!("'{}' has no scalar value", ISIC_FIELD))),
    }
}

fn initial_information_mut(request: &mut Value) -> Option<&mut Map<String, Value>> {
    request
        .get_mut(SUBMISSION)?
        .get_mut(INITIAL_INFORMATION)?
        .as_object_mut()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
