//! The invocation loop: model round-trips, tool execution, retry repair.

use crate::backend::{Message, ModelBackend};
use crate::parser::parse_tool_call;
use crate::prompt::{build_system_prompt, correction_message, tool_result_message};
use crate::tool::{Registry, Tool};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Number of prior exchanges seeded from caller-supplied history.
const HISTORY_WINDOW: usize = 5;

/// Invocation loop configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Protocol/tool failures recovered per run before giving up.
    pub max_retries: u32,
    /// Upper bound on model round-trips per run, independent of retries.
    /// Successful tool steps do not consume retries, so this is what
    /// terminates a model that chains tool calls forever.
    pub max_steps: u32,
    /// Log full prompts and raw model output at debug level.
    pub verbose: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_steps: 16,
            verbose: false,
        }
    }
}

/// Drives the tool-invocation protocol against a model backend.
///
/// Register tools first, then call [`run`](Runtime::run) (or its variants).
/// Registration takes `&mut self` while runs take `&self`, so mutating the
/// tool set concurrently with active runs is ruled out at compile time;
/// independent runs may share one `Runtime` across tasks.
pub struct Runtime<B> {
    backend: B,
    registry: Registry,
    config: RuntimeConfig,
}

impl<B: ModelBackend> Runtime<B> {
    /// Create a runtime with default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, RuntimeConfig::default())
    }

    /// Create a runtime with explicit configuration.
    pub fn with_config(backend: B, config: RuntimeConfig) -> Self {
        Self {
            backend,
            registry: Registry::new(),
            config,
        }
    }

    /// Register a tool. Duplicate names replace the prior entry.
    pub fn register(&mut self, tool: Tool) -> &mut Self {
        self.registry.register(tool);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run the invocation loop for a single user prompt.
    ///
    /// Returns the model's final natural-language answer. Transport errors
    /// propagate immediately; protocol/tool failures are repaired by
    /// re-prompting up to `max_retries` times, after which
    /// [`Error::RetriesExhausted`] carries the last underlying error.
    pub async fn run(&self, prompt: &str) -> Result<String> {
        self.drive(vec![Message::user(prompt)]).await
    }

    /// Run with caller-owned conversation history.
    ///
    /// The most recent five exchanges seed the conversation;
    /// on success the new `(prompt, answer)` pair is appended and the
    /// updated history returned.
    pub async fn run_with_history(
        &self,
        prompt: &str,
        mut history: Vec<(String, String)>,
    ) -> Result<(String, Vec<(String, String)>)> {
        let mut messages = Vec::with_capacity(2 * HISTORY_WINDOW + 1);
        let skip = history.len().saturating_sub(HISTORY_WINDOW);
        for (user, assistant) in &history[skip..] {
            messages.push(Message::user(user));
            messages.push(Message::assistant(assistant));
        }
        messages.push(Message::user(prompt));

        let answer = self.drive(messages).await?;
        history.push((prompt.to_string(), answer.clone()));
        Ok((answer, history))
    }

    /// Non-raising variant of [`run`](Runtime::run).
    ///
    /// Every error kind is logged and converted into `default`.
    pub async fn run_safe(&self, prompt: &str, default: &str) -> String {
        match self.run(prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, transport = e.is_transport(), "run failed, returning default");
                default.to_string()
            }
        }
    }

    async fn drive(&self, mut messages: Vec<Message>) -> Result<String> {
        let specs = self.registry.specs();
        if specs.is_empty() {
            debug!("no tools registered; model will answer unaided");
        }
        // Built once per run; the tool set cannot change underneath us.
        let system = build_system_prompt(&specs);
        if self.config.verbose {
            debug!(system = %system, "system prompt");
        }

        let mut attempts_remaining = self.config.max_retries;
        let mut last_error: Option<Error> = None;

        for step in 0..self.config.max_steps {
            debug!(step, attempts_remaining, "calling model");
            let output = self.backend.generate(&system, &messages).await?;
            if self.config.verbose {
                debug!(output = %output, "model output");
            }
            messages.push(Message::assistant(&output));

            let failure = match parse_tool_call(&output, &self.registry) {
                Ok(None) => {
                    debug!(step, "direct answer");
                    return Ok(output);
                }
                Ok(Some(call)) => {
                    info!(tool = %call.name, "executing tool");
                    let tool = self.registry.get(&call.name)?;
                    match tool.execute(&call.args) {
                        Ok(result) => {
                            if self.config.verbose {
                                debug!(tool = %call.name, %result, "tool result");
                            }
                            // Successful step: feed the result back without
                            // consuming a retry.
                            messages.push(Message::user(tool_result_message(&call.name, &result)));
                            continue;
                        }
                        Err(e) => e,
                    }
                }
                Err(e) => e,
            };

            if attempts_remaining == 0 {
                return Err(Error::RetriesExhausted {
                    attempts: self.config.max_retries,
                    last_error: Some(Box::new(failure)),
                });
            }
            attempts_remaining -= 1;
            info!(error = %failure, attempts_remaining, "recoverable failure, re-prompting");
            messages.push(Message::user(correction_message(&failure)));
            last_error = Some(failure);
        }

        warn!(steps = self.config.max_steps, last_error = ?last_error, "step limit reached");
        Err(Error::StepLimit {
            steps: self.config.max_steps,
        })
    }
}
