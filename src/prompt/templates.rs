//! Prompt templates and the markers the response parsers depend on

/// Line separating pre-text, reasoning, and the final answer
pub const DELIMITER: &str = "------";

/// Label preceding the comma-separated tool names
pub const FINAL_ANSWER_LABEL: &str = "Final Answer:";

/// Template name for tool selection
pub const SELECT_TOOL: &str = "select_tool";

/// Template name for schema transformation
pub const TRANSFORM_INPUT: &str = "transform_input";

pub(crate) const SELECT_TOOL_TEMPLATE: &str = r#"You are an expert at selecting the appropriate tool based on a user request and a list of available tools.

== User Request ==
{{userRequest}}

== Available Tools ==
{{toolsDescription}}

== Task ==
Carefully analyze the user request and determine which tool is most appropriate. Think through the decision step by step:

1. Analyze the user request to understand its core requirements
2. Review each tool's description and capabilities
3. Compare the tools against the user's needs
4. Eliminate tools that don't fully meet the requirements
5. Justify your final selection

== Response Format ==
Format your response exactly as follows:

------
[Your detailed reasoning process here]
------
Final Answer: [Tool Name]

Rules:
* The final answer must be one of the tool names provided
* If more than one tool applies, list them comma-separated, best first
* Do not include any extra text after the final answer
* Keep the reasoning detailed but concise
"#;

pub(crate) const TRANSFORM_INPUT_TEMPLATE: &str = r#"You are an expert at transforming user data into a JSON format that conforms to a given schema.

Here is the user data:
{{userData}}

Here is the JSON schema you must adhere to:
{{schema}}

Transform the user data into a valid JSON object that matches the schema.

IMPORTANT INSTRUCTIONS:

* Return ONLY a valid JSON object.
* Do not include any other text or explanations before or after the JSON.
* Do not wrap the JSON in code blocks (e.g., ```json).
* Ensure the JSON object is parsable by a JSON parser.
* The JSON output MUST represent a valid object.
"#;
