//! Extraction and validation of tool calls embedded in model output.
//!
//! Model output is free-form text; a tool call, if any, arrives wrapped in a
//! `<tool_call>...</tool_call>` envelope holding a JSON object with `name`
//! and `arguments` fields. Only the first envelope is honored; trailing
//! content after the closing delimiter is ignored. Parsing never executes a
//! tool.

use crate::prompt::{CALL_CLOSE, CALL_OPEN};
use crate::tool::{Args, Registry};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Longest offending snippet carried in a malformed-call error.
const SNIPPET_LEN: usize = 120;

/// A validated tool call with arguments coerced against the tool's schema.
#[derive(Debug, Clone)]
pub struct ParsedCall {
    /// Registered tool name.
    pub name: String,
    /// Argument object as extracted from the payload, before coercion.
    pub raw: Map<String, Value>,
    /// Arguments coerced to the declared parameter types.
    pub args: Args,
}

/// Parse a tool call out of model output.
///
/// Returns `Ok(None)` when no envelope is present (the output is a direct
/// answer). A present-but-unusable payload fails with
/// [`Error::MalformedCall`]; an unknown tool with [`Error::ToolNotFound`];
/// bad or absent arguments with [`Error::ArgumentType`] or
/// [`Error::MissingArgument`].
pub fn parse_tool_call(output: &str, registry: &Registry) -> Result<Option<ParsedCall>> {
    let Some(payload) = extract_payload(output) else {
        return Ok(None);
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| Error::MalformedCall {
        reason: format!("invalid JSON: {e}"),
        snippet: snippet(payload),
    })?;

    let Value::Object(mut object) = value else {
        return Err(malformed("payload is not a JSON object", payload));
    };

    let name = match object.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed("field 'name' must be a string", payload)),
        None => return Err(malformed("missing field 'name'", payload)),
    };

    let raw = match object.remove("arguments") {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(malformed("field 'arguments' must be an object", payload)),
        None => return Err(malformed("missing field 'arguments'", payload)),
    };

    let tool = registry.get(&name)?;

    let mut args = Args::new();
    for param in &tool.spec().parameters {
        let Some(value) = raw.get(&param.name) else {
            return Err(Error::MissingArgument {
                tool: name.clone(),
                param: param.name.clone(),
            });
        };
        let coerced = param.ty.coerce(value).ok_or_else(|| Error::ArgumentType {
            tool: name.clone(),
            param: param.name.clone(),
            expected: param.ty,
        })?;
        args.insert(&param.name, coerced);
    }

    Ok(Some(ParsedCall { name, raw, args }))
}

/// Locate the first envelope. An opening tag without a closing tag is
/// treated as no call at all.
fn extract_payload(output: &str) -> Option<&str> {
    let start = output.find(CALL_OPEN)? + CALL_OPEN.len();
    let rest = &output[start..];
    let end = rest.find(CALL_CLOSE)?;
    Some(rest[..end].trim())
}

fn malformed(reason: &str, payload: &str) -> Error {
    Error::MalformedCall {
        reason: reason.to_string(),
        snippet: snippet(payload),
    }
}

fn snippet(payload: &str) -> String {
    payload.chars().take(SNIPPET_LEN).collect()
}
