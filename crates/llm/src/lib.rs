//! Chat completion types and traits.
//!
//! This crate provides the shared types used by every model backend:
//! `Message`, `Response`, `StreamChunk`, `Tool`, `Config`, and the `LLM`
//! trait. Also provides `HttpProvider` for OpenAI-compatible HTTP
//! transport and the shared `Request` body.

pub use config::{Config, DEFAULT_MODEL, General};
pub use http::{HttpProvider, SseDecoder};
pub use message::{Message, MessageBuilder, Role};
pub use provider::LLM;
pub use request::Request;
pub use reqwest::{self, Client};
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response, Usage};
pub use stream::StreamChunk;
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod config;
mod http;
mod message;
mod provider;
mod request;
mod response;
mod stream;
#[cfg(feature = "testing")]
pub mod testing;
mod tool;
