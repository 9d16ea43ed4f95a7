//! Tiller runtime — a tool-invocation protocol engine for text-only LLMs.
//!
//! Callers register ordinary functions as typed tools; the runtime describes
//! them to the model in a system prompt, extracts `<tool_call>` envelopes
//! from free-form model output, coerces arguments against the declared
//! schema, executes the tool, feeds the result back, and converges to either
//! a natural-language answer or a defined terminal error within a bounded
//! number of model round-trips.
//!
//! # Overview
//!
//! - **Registry / Tool**: explicit schemas (name, typed parameters,
//!   description) paired with synchronous handlers.
//! - **ModelBackend**: the opaque model capability, text in / text out.
//! - **Runtime**: the invocation loop with retry repair and a safe,
//!   non-raising variant.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{AnthropicBackend, Args, ParamType, Runtime, Tool, ToolError};
//! use serde_json::json;
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = AnthropicBackend::builder("sk-ant-...", "claude-sonnet-4-20250514").build();
//! let mut runtime = Runtime::new(backend);
//!
//! runtime.register(
//!     Tool::builder("add")
//!         .description("Add two integers.")
//!         .param("a", ParamType::Integer)
//!         .param("b", ParamType::Integer)
//!         .handler(|args: &Args| -> Result<serde_json::Value, ToolError> {
//!             Ok(json!(args.int("a")? + args.int("b")?))
//!         })
//!         .build()?,
//! );
//!
//! let answer = runtime.run("What is 15 + 27?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod parser;
mod prompt;
mod runtime;
pub mod tool;

pub use backend::{AnthropicBackend, AnthropicBackendBuilder, Message, ModelBackend, Role};
pub use error::{Error, Result};
pub use parser::{ParsedCall, parse_tool_call};
pub use prompt::{build_system_prompt, CALL_CLOSE, CALL_OPEN};
pub use runtime::{Runtime, RuntimeConfig};
pub use tool::{ArgValue, Args, Param, ParamType, Registry, Tool, ToolBuilder, ToolError, ToolHandler, ToolSpec};
