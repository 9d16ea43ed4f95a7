//! System-prompt and feedback-message construction.
//!
//! Everything here is pure string rendering: identical tool sets produce
//! byte-identical prompts.

use crate::Error;
use crate::tool::ToolSpec;
use serde_json::Value;

/// Opening delimiter of the tool-call envelope.
pub const CALL_OPEN: &str = "<tool_call>";
/// Closing delimiter of the tool-call envelope.
pub const CALL_CLOSE: &str = "</tool_call>";

/// Render the system prompt describing the available tools and the
/// response protocol.
pub fn build_system_prompt(specs: &[&ToolSpec]) -> String {
    let tools_json = serde_json::to_string_pretty(specs).unwrap_or_default();

    format!(
        "You are a helpful assistant with access to tools. To use a tool, \
         respond with exactly one call in this format and nothing else:\n\
         \n\
         {CALL_OPEN}\n\
         {{\"name\": \"tool_name\", \"arguments\": {{\"arg\": \"value\"}}}}\n\
         {CALL_CLOSE}\n\
         \n\
         Rules:\n\
         1. Use only the tool names listed below.\n\
         2. Provide every declared argument with a value of the declared type.\n\
         3. Arguments must be valid JSON values.\n\
         4. Make at most one tool call per response.\n\
         5. If no tool is needed, answer directly without {CALL_OPEN} tags.\n\
         \n\
         Available tools:\n\
         {tools_json}\n\
         \n\
         When you receive a tool result, use it to answer the user in plain \
         language."
    )
}

/// Message feeding a tool result back to the model.
pub fn tool_result_message(tool: &str, result: &Value) -> String {
    format!(
        "Tool '{tool}' returned:\n{result}\n\n\
         Now answer the original question in plain language based on this \
         result."
    )
}

/// Corrective message appended to the conversation after a recoverable
/// protocol or tool failure.
pub fn correction_message(error: &Error) -> String {
    match error {
        Error::ToolNotFound { name, available } => {
            let listed = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            format!(
                "Error: tool '{name}' does not exist. Available tools: {listed}. \
                 Retry with a valid tool call or answer directly."
            )
        }
        Error::MalformedCall { reason, .. } => format!(
            "Error: your tool call could not be parsed ({reason}). Respond \
             with exactly one {CALL_OPEN}{{\"name\": ..., \"arguments\": \
             {{...}}}}{CALL_CLOSE} envelope containing valid JSON, or answer \
             directly."
        ),
        Error::MissingArgument { tool, param } => format!(
            "Error: tool '{tool}' requires argument '{param}', which was \
             missing. Retry with all declared arguments."
        ),
        Error::ArgumentType {
            tool,
            param,
            expected,
        } => format!(
            "Error: argument '{param}' of tool '{tool}' must be of type \
             {expected}. Retry with a valid value."
        ),
        Error::ToolExecution { tool, message } => format!(
            "Error: tool '{tool}' failed: {message}. Try a different approach \
             or answer directly."
        ),
        other => format!("Error: {other}. Retry or answer directly."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Param, ParamType, ToolSpec};

    fn add_spec() -> ToolSpec {
        ToolSpec {
            name: "add".into(),
            description: "Add two integers.".into(),
            parameters: vec![
                Param {
                    name: "a".into(),
                    ty: ParamType::Integer,
                },
                Param {
                    name: "b".into(),
                    ty: ParamType::Integer,
                },
            ],
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let spec = add_spec();
        let first = build_system_prompt(&[&spec]);
        let second = build_system_prompt(&[&spec]);
        assert_eq!(first, second);
    }

    #[test]
    fn prompt_lists_tools_and_protocol() {
        let spec = add_spec();
        let prompt = build_system_prompt(&[&spec]);
        assert!(prompt.contains(CALL_OPEN));
        assert!(prompt.contains("\"add\""));
        assert!(prompt.contains("\"integer\""));
        assert!(prompt.contains("Add two integers."));
    }

    #[test]
    fn prompt_preserves_parameter_declaration_order() {
        let spec = ToolSpec {
            name: "t".into(),
            description: String::new(),
            parameters: vec![
                Param {
                    name: "zeta".into(),
                    ty: ParamType::String,
                },
                Param {
                    name: "alpha".into(),
                    ty: ParamType::String,
                },
            ],
        };
        let prompt = build_system_prompt(&[&spec]);
        let zeta = prompt.find("zeta").unwrap();
        let alpha = prompt.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn correction_for_unknown_tool_lists_available() {
        let err = Error::ToolNotFound {
            name: "subtract".into(),
            available: vec!["add".into()],
        };
        let msg = correction_message(&err);
        assert!(msg.contains("subtract"));
        assert!(msg.contains("add"));
    }
}
