//! Progress events emitted while the agent works.

use std::fmt;

/// One step of agent progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A streamed piece of model output.
    Token(String),
    /// Reasoning the model produced alongside a tool call.
    Thought(String),
    /// The model invoked a tool.
    Action {
        /// Tool name.
        tool: String,
        /// Raw arguments.
        input: String,
    },
    /// A tool returned.
    Observation {
        /// Tool name.
        tool: String,
        /// Tool output.
        output: String,
    },
    /// A tool invocation could not be parsed and was handed back.
    ParseError {
        /// Tool name as given by the model.
        tool: String,
        /// Why it failed.
        error: String,
    },
    /// The final answer.
    Finish(String),
}

impl Event {
    /// Whether this event belongs in the recorded trace.
    ///
    /// Tokens are only forwarded live; the trace keeps whole steps.
    pub fn is_step(&self) -> bool {
        !matches!(self, Event::Token(_))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Token(token) => f.write_str(token),
            Event::Thought(text) => write!(f, "Thought: {text}"),
            Event::Action { tool, input } => {
                write!(f, "Action: {tool}\nAction Input: {input}")
            }
            Event::Observation { output, .. } => write!(f, "Observation: {output}"),
            Event::ParseError { tool, error } => {
                write!(f, "Invalid Format: {tool}: {error}")
            }
            Event::Finish(answer) => write!(f, "Final Answer: {answer}"),
        }
    }
}

/// Receives events as the agent runs.
pub trait Observer {
    /// Handle one event.
    fn observe(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Observer for F {
    fn observe(&mut self, event: &Event) {
        self(event)
    }
}
