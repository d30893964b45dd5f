//! Building the Groq-backed agent.

use agent::{AgentConfig, SqlAgent};
use anyhow::Result;
use database::Database;
use groq::Groq;
use llm::Client;
use session::Bootstrap;
use std::sync::Arc;

/// Wires a Groq client to the SQL agent.
#[derive(Clone)]
pub struct GroqBootstrap {
    client: Client,
    endpoint: String,
    config: AgentConfig,
}

impl GroqBootstrap {
    /// Create a bootstrap sharing one HTTP client.
    pub fn new(client: Client, endpoint: impl Into<String>, config: AgentConfig) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            config,
        }
    }
}

impl Bootstrap<Arc<Database>> for GroqBootstrap {
    type Agent = SqlAgent<Groq>;

    fn bootstrap(&self, handle: Arc<Database>, api_key: &str) -> Result<SqlAgent<Groq>> {
        let provider = Groq::custom(self.client.clone(), api_key, &self.endpoint)?;
        tracing::debug!(model = %self.config.model, endpoint = %self.endpoint, "agent ready");
        Ok(SqlAgent::new(provider, handle, self.config.clone()))
    }
}
