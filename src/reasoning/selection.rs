//! Tool selection response parsing
//!
//! Expected response shape:
//!
//! ```text
//! ------
//! <reasoning>
//! ------
//! Final Answer: toolA, toolB
//! ```
//!
//! Candidates are kept only if they name a catalog entry; the first survivor
//! is the selected tool.

use crate::error::{RelayError, Result};
use crate::prompt::{DELIMITER, FINAL_ANSWER_LABEL};
use crate::tools::ToolCatalog;

/// A validated selection: every chosen name is in the catalog, and there is at least one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    reasoning: String,
    chosen_tools: Vec<String>,
}

impl SelectionOutcome {
    /// The model's reasoning section
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Valid candidates in the order the model gave them
    pub fn chosen_tools(&self) -> &[String] {
        &self.chosen_tools
    }

    /// The tool the pipeline runs: the first valid candidate
    pub fn primary(&self) -> &str {
        &self.chosen_tools[0]
    }
}

/// Parse a selection response and ground it in the catalog
pub fn parse_selection(response: &str, catalog: &ToolCatalog) -> Result<SelectionOutcome> {
    let parts: Vec<&str> = response.trim().split(DELIMITER).collect();
    if parts.len() < 3 {
        return Err(RelayError::Selection(format!(
            "Response format invalid: expected two '{}' lines, found {}",
            DELIMITER,
            parts.len() - 1
        )));
    }

    let reasoning = parts[1].trim().to_string();
    let candidates = candidate_names(parts[2]);

    let mut chosen_tools: Vec<String> = Vec::new();
    for candidate in &candidates {
        if catalog.contains(candidate) && !chosen_tools.iter().any(|c| c == candidate) {
            chosen_tools.push(candidate.to_string());
        }
    }

    if chosen_tools.is_empty() {
        return Err(RelayError::Selection(format!(
            "No candidate matched the catalog: {:?}",
            candidates
        )));
    }

    Ok(SelectionOutcome {
        reasoning,
        chosen_tools,
    })
}

/// Split the answer segment into candidate names
fn candidate_names(answer: &str) -> Vec<&str> {
    let answer = answer.trim();
    let answer = match answer.find(FINAL_ANSWER_LABEL) {
        Some(idx) => &answer[idx + FINAL_ANSWER_LABEL.len()..],
        None => answer,
    };

    // the answer is a single line; anything after it is trailing chatter
    let line = answer.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");

    line.split(',')
        .map(|name| name.trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\'' | '`' | '*' | '.')))
        .filter(|name| !name.is_empty())
        .collect()
}
