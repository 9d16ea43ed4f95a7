use crate::tool::ParamType;
use thiserror::Error;

/// Errors surfaced by the runtime.
///
/// Two classes matter for the invocation loop: transport failures
/// ([`InvalidApiKey`](Error::InvalidApiKey), [`RateLimit`](Error::RateLimit),
/// [`Connection`](Error::Connection)) come from the model backend and are
/// never retried; protocol and tool failures are recoverable by re-prompting
/// and each consumes one retry.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider rejected the credential (HTTP 401/403).
    #[error("invalid or missing API key for {provider}")]
    InvalidApiKey { provider: String },

    /// The provider throttled the request (HTTP 429).
    #[error("rate limit exceeded{}", match .retry_after { Some(s) => format!(", retry after {s}s"), None => String::new() })]
    RateLimit { retry_after: Option<u64> },

    /// Transport-level failure reaching the model.
    #[error("model connection failed: {0}")]
    Connection(String),

    /// A tool definition could not be derived at registration time.
    #[error("invalid tool schema: {0}")]
    Schema(String),

    /// The model named a tool that is not registered.
    #[error("tool '{name}' not found (available: {})", .available.join(", "))]
    ToolNotFound { name: String, available: Vec<String> },

    /// A `<tool_call>` envelope was present but its payload was unusable.
    #[error("malformed tool call: {reason}")]
    MalformedCall { reason: String, snippet: String },

    /// A declared parameter was absent from the call arguments.
    #[error("tool '{tool}' is missing required argument '{param}'")]
    MissingArgument { tool: String, param: String },

    /// An argument could not be coerced to its declared type.
    #[error("argument '{param}' of tool '{tool}' is not a valid {expected}")]
    ArgumentType {
        tool: String,
        param: String,
        expected: ParamType,
    },

    /// The tool handler itself failed.
    #[error("tool '{tool}' execution failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// The retry budget for protocol/tool failures is exhausted.
    #[error("gave up after {attempts} retries{}", match .last_error { Some(e) => format!(", last error: {e}"), None => String::new() })]
    RetriesExhausted {
        attempts: u32,
        last_error: Option<Box<Error>>,
    },

    /// The model kept requesting tools past the round-trip bound.
    #[error("model did not converge within {steps} steps")]
    StepLimit { steps: u32 },
}

impl Error {
    /// Whether this error came from the model transport.
    ///
    /// Transport errors terminate a `run` immediately; retrying a broken
    /// credential or exhausted quota would waste the retry budget meant for
    /// repairing model/tool interactions.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::InvalidApiKey { .. } | Self::RateLimit { .. } | Self::Connection(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
