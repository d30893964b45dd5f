//! LLM trait implementation for Groq.

use crate::Groq;
use anyhow::Result;
use futures_core::Stream;
use llm::{General, LLM, Message, Request, Response, StreamChunk};

impl LLM for Groq {
    type ChatConfig = General;

    async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        let body = Request::from(config.clone()).messages(messages);
        tracing::debug!(model = %body.model, messages = messages.len(), "groq send");
        self.http.send(&body).await
    }

    fn stream(
        &self,
        config: General,
        messages: &[Message],
        usage: bool,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = Request::from(config).messages(messages).stream(usage);
        tracing::debug!(model = %body.model, messages = messages.len(), "groq stream");
        self.http.stream_sse(&body)
    }
}
