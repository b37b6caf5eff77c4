//! Built-in tool handlers
//!
//! Each handler is a pure function from its JSON input to a JSON payload.

use serde_json::{Map, Value, json};

use crate::error::{RelayError, Result};

/// Echoes a submission back inside a response envelope
pub const SUBMISSION_INTAKE: &str = "submissionIntake";

/// Prefixes its text input
pub const SIMPLE_TOOL: &str = "simpleTool";

/// Translates an ISIC code to an AOC code
pub const ISIC_TO_AOC_MAPPING: &str = "isicToAocMapping";

/// Signature shared by every in-process handler
pub type HandlerFn = fn(&Value) -> Result<Value>;

/// Static ISIC -> AOC table; stand-in for a real code registry
const ISIC_TO_AOC: &[(&str, &str)] = &[("123456789", "AOC123"), ("987654321", "AOC987")];

/// Look up the AOC code for an ISIC code
pub fn lookup_aoc(isic_code: &str) -> Option<&'static str> {
    ISIC_TO_AOC
        .iter()
        .find(|(isic, _)| *isic == isic_code)
        .map(|(_, aoc)| *aoc)
}

/// `submissionIntake`: reshape `submission` into a response with synthetic timing metadata
pub fn submission_intake(input: &Value) -> Result<Value> {
    let submission = field(SUBMISSION_INTAKE, input, "submission")?;
    let general = field(SUBMISSION_INTAKE, submission, "submissionGeneralInfo")?;

    let description = text(field(SUBMISSION_INTAKE, general, "submissionDescription")?);
    let year = text(field(SUBMISSION_INTAKE, general, "underWritingYear")?);

    let mut general_info = Map::new();
    general_info.insert("submissionDescription".to_string(), Value::String(description));
    general_info.insert("underWritingYear".to_string(), Value::String(year));
    general_info.insert(
        "inceptionDate".to_string(),
        general.get("inceptionDate").cloned().unwrap_or(Value::Null),
    );
    general_info.insert(
        "expiryDate".to_string(),
        general.get("expiryDate").cloned().unwrap_or(Value::Null),
    );

    Ok(json!({
        "submission": {
            "submissionGeneralInfo": general_info,
            "intermediaries": submission.get("intermediaries").cloned().unwrap_or(Value::Null),
        },
        "metadata": {
            "executionTime": 123,
            "responseSize": 456,
        }
    }))
}

/// `simpleTool`: `{toolInput}` -> `{toolOutput: "Processed: <toolInput>"}`
pub fn simple_tool(input: &Value) -> Result<Value> {
    let tool_input = text(field(SIMPLE_TOOL, input, "toolInput")?);
    Ok(json!({ "toolOutput": format!("Processed: {}", tool_input) }))
}

/// `isicToAocMapping`: `{isicCode}` -> `{isicCode, aocCode}`
pub fn isic_to_aoc_mapping(input: &Value) -> Result<Value> {
    let isic_code = text(field(ISIC_TO_AOC_MAPPING, input, "isicCode")?);
    let aoc_code = lookup_aoc(isic_code.trim()).ok_or_else(|| RelayError::CodeNotFound(isic_code.clone()))?;
    Ok(json!({ "isicCode": isic_code, "aocCode": aoc_code }))
}

fn field<'a>(tool: &str, value: &'a Value, name: &str) -> Result<&'a Value> {
    match value.get(name) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(RelayError::MissingField {
            tool: tool.to_string(),
            field: name.to_string(),
        }),
    }
}

/// Strings verbatim; numbers, booleans and structured values as compact JSON
/// (`42` -> `42`, `{"a":1}` -> `{"a":1}`)
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tool() {
        let out = simple_tool(&json!({"toolInput": "hello"})).unwrap();
        assert_eq!(out, json!({"toolOutput": "Processed: hello"}));
    }

    #[test]
    fn test_simple_tool_numeric_input() {
        let out = simple_tool(&json!({"toolInput": 42})).unwrap();
        assert_eq!(out["toolOutput"], "Processed: 42");
    }

    #[test]
    fn test_simple_tool_structured_input() {
        let out = simple_tool(&json!({"toolInput": {"a": 1}})).unwrap();
        assert_eq!(out["toolOutput"], "Processed: {\"a\":1}");

        let out = simple_tool(&json!({"toolInput": true})).unwrap();
        assert_eq!(out["toolOutput"], "Processed: true");
    }

    #[test]
    fn test_simple_tool_missing_input() {
        let err = simple_tool(&json!({"other": "x"})).unwrap_err();
        assert!(matches!(err, RelayError::MissingField { ref field, .. } if field == "toolInput"));
    }

    #[test]
    fn test_isic_mapping_known_code() {
        let out = isic_to_aoc_mapping(&json!({"isicCode": "123456789"})).unwrap();
        assert_eq!(out["aocCode"], "AOC123");
        assert_eq!(out["isicCode"], "123456789");
    }

    #[test]
    fn test_isic_mapping_numeric_code() {
        let out = isic_to_aoc_mapping(&json!({"isicCode": 987654321})).unwrap();
        assert_eq!(out["aocCode"], "AOC987");
    }

    #[test]
    fn test_isic_mapping_unknown_code() {
        let err = isic_to_aoc_mapping(&json!({"isicCode": "000000000"})).unwrap_err();
        assert!(matches!(err, RelayError::CodeNotFound(code) if code == "000000000"));
    }

    #[test]
    fn test_lookup_aoc() {
        assert_eq!(lookup_aoc("123456789"), Some("AOC123"));
        assert_eq!(lookup_aoc("nope"), None);
    }

    #[test]
    fn test_submission_intake() {
        let input = json!({
            "submission": {
                "submissionGeneralInfo": {
                    "submissionDescription": "Warehouse cover",
                    "underWritingYear": 2025,
                    "inceptionDate": "2025-01-01",
                    "expiryDate": "2025-12-31"
                },
                "intermediaries": [{"name": "Broker Ltd"}]
            }
        });

        let out = submission_intake(&input).unwrap();
        let general = &out["submission"]["submissionGeneralInfo"];
        assert_eq!(general["submissionDescription"], "Warehouse cover");
        assert_eq!(general["underWritingYear"], "2025");
        assert_eq!(general["inceptionDate"], "2025-01-01");
        assert_eq!(out["submission"]["intermediaries"][0]["name"], "Broker Ltd");
        assert_eq!(out["metadata"]["executionTime"], 123);
        assert_eq!(out["metadata"]["responseSize"], 456);
    }

    #[test]
    fn test_submission_intake_optional_fields_null() {
        let input = json!({
            "submission": {
                "submissionGeneralInfo": {
                    "submissionDescription": "d",
                    "underWritingYear": "2024"
                }
            }
        });

        let out = submission_intake(&input).unwrap();
        assert!(out["submission"]["submissionGeneralInfo"]["expiryDate"].is_null());
        assert!(out["submission"]["intermediaries"].is_null());
    }

    #[test]
    fn test_submission_intake_missing_general_info() {
        let err = submission_intake(&json!({"submission": {}})).unwrap_err();
        assert!(matches!(err, RelayError::MissingField { ref field, .. } if field == "submissionGeneralInfo"));
    }
}
