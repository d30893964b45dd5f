//! Streaming chat completion chunks

use crate::{
    FinishReason, Usage,
    response::{Choice, CompletionMeta, Delta},
    tool::ToolCall,
};
use serde::Deserialize;

/// A streaming chat completion chunk
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamChunk {
    /// Completion metadata
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices (with delta content)
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics (only in final chunk)
    pub usage: Option<Usage>,
}

impl StreamChunk {
    /// Create a content chunk
    pub fn text(content: impl Into<String>) -> Self {
        Self::delta(Delta {
            content: Some(content.into()),
            ..Default::default()
        })
    }

    /// Create a tool chunk
    pub fn tool(calls: &[ToolCall]) -> Self {
        Self::delta(Delta {
            tool_calls: Some(calls.to_vec()),
            ..Default::default()
        })
    }

    /// Create an empty chunk carrying only a finish reason
    pub fn finish(reason: FinishReason) -> Self {
        Self {
            choices: vec![Choice {
                finish_reason: Some(reason),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn delta(delta: Delta) -> Self {
        Self {
            choices: vec![Choice {
                delta,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Get the content of the first choice
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Get the tool calls of the first choice
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.tool_calls.as_deref())
    }

    /// Get the reason the model stopped generating
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}
