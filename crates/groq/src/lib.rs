//! Groq LLM provider

use anyhow::Result;
use llm::{Client, HttpProvider};

mod provider;

/// Groq's OpenAI-compatible chat completions endpoint.
pub const ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The Groq LLM provider
#[derive(Clone)]
pub struct Groq {
    /// The HTTP transport
    http: HttpProvider,
}

impl Groq {
    /// Create a provider for the public Groq API.
    pub fn new(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, ENDPOINT)
    }

    /// Create a provider against another OpenAI-compatible endpoint.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        Ok(Self {
            http: HttpProvider::bearer(client, key, endpoint)?,
        })
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}
