//! Configuration for a chat completion

use crate::{Tool, ToolChoice};
use serde::{Deserialize, Serialize};

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// LLM configuration
pub trait Config: From<General> + Sized + Clone {
    /// Create a new configuration with tools
    fn with_tools(self, tools: Vec<Tool>) -> Self;

    /// Create a new configuration with tool choice
    ///
    /// This should be used for per-request level.
    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self;
}

/// Chat configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct General {
    /// The model to use
    pub model: String,

    /// Sampling temperature, provider default if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// The tools to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    /// Controls which tool is called by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    /// Whether to return the usage information in stream mode
    #[serde(default)]
    pub usage: bool,
}

impl General {
    /// Create a new configuration
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Config for General {
    fn with_tools(self, tools: Vec<Tool>) -> Self {
        Self {
            tools: (!tools.is_empty()).then_some(tools),
            ..self
        }
    }

    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self {
        Self {
            tool_choice: Some(tool_choice),
            ..self
        }
    }
}

impl Default for General {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: None,
            tools: None,
            tool_choice: None,
            usage: false,
        }
    }
}
