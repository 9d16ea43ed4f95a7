//! Tool registration and lookup.

use super::{Args, Param, ParamType, ToolError, ToolSpec};
use crate::{Error, Result};
use serde_json::Value;

/// A callable tool implementation.
///
/// Blanket-implemented for matching closures, so plain functions can be
/// registered directly via [`ToolBuilder::handler`]. This is the boundary
/// between the invocation loop and side effects: handlers run with the full
/// privileges of the host process, with no sandboxing.
pub trait ToolHandler: Send + Sync {
    fn call(&self, args: &Args) -> std::result::Result<Value, ToolError>;
}

impl<F> ToolHandler for F
where
    F: Fn(&Args) -> std::result::Result<Value, ToolError> + Send + Sync,
{
    fn call(&self, args: &Args) -> std::result::Result<Value, ToolError> {
        self(args)
    }
}

/// A registered tool: declared schema plus handler.
pub struct Tool {
    spec: ToolSpec,
    handler: Box<dyn ToolHandler>,
}

impl Tool {
    /// Start building a tool with the given name.
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
            handler: None,
        }
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Execute the handler with coerced arguments.
    ///
    /// A handler failure maps to [`Error::ToolExecution`], which the loop
    /// treats as retryable corrective context for the model.
    pub(crate) fn execute(&self, args: &Args) -> Result<Value> {
        self.handler.call(args).map_err(|e| Error::ToolExecution {
            tool: self.spec.name.clone(),
            message: e.message,
        })
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("spec", &self.spec).finish()
    }
}

/// Builder for a [`Tool`].
///
/// The explicit parameter list is the schema contract; there is no
/// signature reflection. Declaration order is preserved in the rendered
/// system prompt.
pub struct ToolBuilder {
    name: String,
    description: String,
    params: Vec<Param>,
    handler: Option<Box<dyn ToolHandler>>,
}

impl ToolBuilder {
    /// Set the description shown to the model.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    /// Set the handler.
    pub fn handler(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Validate the schema and produce the tool.
    pub fn build(self) -> Result<Tool> {
        if self.name.trim().is_empty() {
            return Err(Error::Schema("tool name must not be empty".into()));
        }
        for (i, param) in self.params.iter().enumerate() {
            if param.name.trim().is_empty() {
                return Err(Error::Schema(format!(
                    "tool '{}' has an unnamed parameter",
                    self.name
                )));
            }
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(Error::Schema(format!(
                    "tool '{}' declares parameter '{}' twice",
                    self.name, param.name
                )));
            }
        }
        let handler = self.handler.ok_or_else(|| {
            Error::Schema(format!("tool '{}' has no handler", self.name))
        })?;
        Ok(Tool {
            spec: ToolSpec {
                name: self.name,
                description: self.description,
                parameters: self.params,
            },
            handler,
        })
    }
}

/// Insertion-ordered tool storage.
///
/// Registering a tool under an existing name replaces the prior entry in
/// place: last write wins, original position kept. Registration is expected
/// to finish before any run starts; `register` takes `&mut self`, so the
/// borrow checker rules out mutation concurrent with lookups.
#[derive(Debug, Default)]
pub struct Registry {
    tools: Vec<Tool>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Tool) -> &mut Self {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
        self
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Result<&Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::ToolNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Registered tool names, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Registered tool specs, in insertion order.
    pub fn specs(&self) -> Vec<&ToolSpec> {
        self.tools.iter().map(Tool::spec).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
