//! Scripted LLM provider for tests.
//!
//! [`Scripted`] replays canned replies in order and records every request
//! it receives, so agent loops can be exercised without a network.

use crate::{
    Choice, Delta, FinishReason, FunctionCall, General, LLM, Message, Response, Role, StreamChunk,
    ToolCall,
};
use anyhow::{Result, anyhow};
use futures_core::Stream;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

/// A request observed by the scripted provider.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// The configuration sent with the request.
    pub config: General,
    /// The conversation sent with the request.
    pub messages: Vec<Message>,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Vec<StreamChunk>>,
    requests: Vec<Recorded>,
}

/// Provider that answers from a queue of canned replies.
#[derive(Clone, Default)]
pub struct Scripted {
    inner: Arc<Mutex<Script>>,
}

impl Scripted {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply made of raw chunks.
    pub fn reply(self, chunks: Vec<StreamChunk>) -> Self {
        self.inner.lock().replies.push_back(chunks);
        self
    }

    /// Queue a plain text reply.
    pub fn text(self, content: &str) -> Self {
        self.reply(vec![
            StreamChunk::text(content),
            StreamChunk::finish(FinishReason::Stop),
        ])
    }

    /// Queue a reply that calls tools.
    pub fn calls(self, calls: Vec<ToolCall>) -> Self {
        self.reply(vec![
            StreamChunk::tool(&calls),
            StreamChunk::finish(FinishReason::ToolCalls),
        ])
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().requests.clone()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inner.lock().replies.len()
    }

    fn next(&self, config: General, messages: &[Message]) -> Result<Vec<StreamChunk>> {
        let mut script = self.inner.lock();
        script.requests.push(Recorded {
            config,
            messages: messages.to_vec(),
        });
        script
            .replies
            .pop_front()
            .ok_or_else(|| anyhow!("scripted provider has no reply left"))
    }
}

/// Build a function tool call.
pub fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.into(),
        index: 0,
        call_type: "function".into(),
        function: FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        },
    }
}

impl LLM for Scripted {
    type ChatConfig = General;

    async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        let chunks = self.next(config.clone(), messages)?;
        let mut builder = Message::builder(Role::Assistant);
        let mut finish_reason = None;
        for chunk in &chunks {
            builder.accept(chunk);
            finish_reason = chunk.reason().copied().or(finish_reason);
        }

        let message = builder.build();
        Ok(Response {
            choices: vec![Choice {
                index: 0,
                delta: Delta {
                    role: Some(Role::Assistant),
                    content: Some(message.content),
                    tool_calls: (!message.tool_calls.is_empty()).then_some(message.tool_calls),
                },
                finish_reason,
            }],
            ..Default::default()
        })
    }

    fn stream(
        &self,
        config: General,
        messages: &[Message],
        _usage: bool,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let next = self.next(config, messages);
        async_stream::try_stream! {
            for chunk in next? {
                yield chunk;
            }
        }
    }
}
