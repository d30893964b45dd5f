//! The observe/act loop.

use crate::{Event, Observer, Toolkit};
use anyhow::{Result, bail};
use database::Database;
use futures_util::StreamExt;
use llm::{Config, DEFAULT_MODEL, FinishReason, General, LLM, Message, Role, ToolChoice};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = include_str!("../prompts/system.md");

/// Answer returned when the loop runs out of iterations.
pub const STOPPED: &str = "Agent stopped due to iteration limit or time limit.";

/// Agent settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier.
    pub model: String,
    /// Stream model output token by token.
    pub stream: bool,
    /// Model calls allowed per run.
    pub max_iterations: usize,
    /// Row limit suggested to the model.
    pub top_k: usize,
    /// Hand malformed tool calls back to the model instead of failing.
    pub handle_parsing_errors: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            stream: true,
            max_iterations: 15,
            top_k: 10,
            handle_parsing_errors: true,
        }
    }
}

/// The outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The final answer text.
    pub text: String,
    /// Every step taken, tokens excluded.
    pub trace: Vec<Event>,
    /// Model calls made.
    pub steps: usize,
}

/// Something that answers a question about the database.
pub trait Assistant {
    /// Answer `query`, reporting progress to `observer`.
    fn run(&self, query: &str, observer: &mut dyn Observer) -> impl Future<Output = Result<Answer>>;
}

/// A tool-calling agent over one database.
pub struct SqlAgent<P: LLM> {
    provider: P,
    toolkit: Toolkit<P>,
    config: AgentConfig,
}

impl<P: LLM> SqlAgent<P> {
    /// Create an agent answering from `database`.
    pub fn new(provider: P, database: Arc<Database>, config: AgentConfig) -> Self {
        let toolkit = Toolkit::new(database, provider.clone(), General::new(&config.model));
        Self {
            provider,
            toolkit,
            config,
        }
    }

    /// The agent settings.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The bound tools.
    pub fn toolkit(&self) -> &Toolkit<P> {
        &self.toolkit
    }

    /// The system prompt for the bound database.
    pub fn system_prompt(&self) -> String {
        SYSTEM_PROMPT
            .replace("{dialect}", &self.toolkit.database().dialect().to_string())
            .replace("{top_k}", &self.config.top_k.to_string())
    }

    /// Run the loop for one question.
    ///
    /// Each run starts from the system prompt and `query` alone; earlier
    /// questions are not replayed to the model.
    pub async fn run(&self, query: &str, observer: &mut dyn Observer) -> Result<Answer> {
        let mut recorder = Recorder {
            observer,
            trace: Vec::new(),
        };
        let base = P::ChatConfig::from(General::new(&self.config.model))
            .with_tools(self.toolkit.tools());
        let mut messages = vec![Message::system(self.system_prompt()), Message::user(query)];

        for step in 1..=self.config.max_iterations {
            tracing::debug!(step, "agent step");
            let config = base.clone().with_tool_choice(ToolChoice::Auto);
            let message = self.complete(config, &messages, &mut recorder).await?;

            if message.tool_calls.is_empty() {
                let text = message.content.trim().to_owned();
                recorder.emit(Event::Finish(text.clone()));
                return Ok(recorder.answer(text, step));
            }

            let thought = message.content.trim();
            if !thought.is_empty() {
                recorder.emit(Event::Thought(thought.to_owned()));
            }

            let calls = message.tool_calls.clone();
            messages.push(message);
            for call in calls {
                let tool = call.function.name;
                let input = call.function.arguments;
                recorder.emit(Event::Action {
                    tool: tool.clone(),
                    input: input.clone(),
                });

                let output = match self.toolkit.call(&tool, &input).await {
                    Ok(output) => {
                        recorder.emit(Event::Observation {
                            tool,
                            output: output.clone(),
                        });
                        output
                    }
                    Err(e) if e.is_parse_error() && self.config.handle_parsing_errors => {
                        tracing::warn!(%tool, "handing back malformed tool call: {e}");
                        let error = e.to_string();
                        recorder.emit(Event::ParseError {
                            tool,
                            error: error.clone(),
                        });
                        error
                    }
                    Err(e) => return Err(e.into()),
                };
                messages.push(Message::tool(output, call.id));
            }
        }

        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "agent stopped at the iteration limit"
        );
        recorder.emit(Event::Finish(STOPPED.into()));
        Ok(recorder.answer(STOPPED.into(), self.config.max_iterations))
    }

    /// One model call, streamed when configured.
    async fn complete(
        &self,
        config: P::ChatConfig,
        messages: &[Message],
        recorder: &mut Recorder<'_>,
    ) -> Result<Message> {
        if !self.config.stream {
            let response = self.provider.send(&config, messages).await?;
            return Ok(response
                .message()
                .unwrap_or_else(|| Message::assistant("", None)));
        }

        let mut builder = Message::builder(Role::Assistant);
        let inner = self.provider.stream(config, messages, false);
        futures_util::pin_mut!(inner);

        while let Some(result) = inner.next().await {
            let chunk = match result {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!("Error in LLM stream: {e:?}");
                    return Err(e);
                }
            };

            if builder.accept(&chunk) {
                let token = chunk.content().unwrap_or_default();
                recorder.emit(Event::Token(token.to_owned()));
            }

            match chunk.reason() {
                None => {}
                Some(FinishReason::Stop | FinishReason::ToolCalls) => break,
                Some(reason) => bail!("unexpected finish reason: {reason:?}"),
            }
        }

        Ok(builder.build())
    }
}

impl<P: LLM> Assistant for SqlAgent<P> {
    fn run(&self, query: &str, observer: &mut dyn Observer) -> impl Future<Output = Result<Answer>> {
        SqlAgent::run(self, query, observer)
    }
}

/// Forwards events to the observer and keeps the trace.
struct Recorder<'o> {
    observer: &'o mut dyn Observer,
    trace: Vec<Event>,
}

impl Recorder<'_> {
    fn emit(&mut self, event: Event) {
        self.observer.observe(&event);
        if event.is_step() {
            self.trace.push(event);
        }
    }

    fn answer(self, text: String, steps: usize) -> Answer {
        Answer {
            text,
            trace: self.trace,
            steps,
        }
    }
}
