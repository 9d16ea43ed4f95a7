//! Model backend abstraction.
//!
//! The model is opaque to the runtime: text in, text out. Backends report
//! failures through the transport variants of [`Error`](crate::Error)
//! (`InvalidApiKey`, `RateLimit`, `Connection`), which the invocation loop
//! never retries.

mod anthropic;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder};

use crate::Result;
use std::future::Future;

/// Role of a message participant.
///
/// Tool results travel back to the model as user-role messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Trait for model backends.
///
/// Implementations handle the specifics of producing a completion for a
/// system prompt plus conversation, synchronously from the caller's
/// perspective. Timeouts, if desired, belong to the implementation.
pub trait ModelBackend: Send + Sync {
    /// Generate a completion for the conversation under the given system
    /// prompt.
    fn generate(
        &self,
        system: &str,
        messages: &[Message],
    ) -> impl Future<Output = Result<String>> + Send;
}
