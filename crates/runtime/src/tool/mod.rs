//! Tool schemas, registration, and execution.

pub mod errors;
mod registry;
mod types;

pub use errors::ToolError;
pub use registry::{Registry, Tool, ToolBuilder, ToolHandler};
pub use types::{ArgValue, Args, Param, ParamType, ToolSpec};
