//! The chat history shown to the user.

/// Seed turn of every transcript.
pub const GREETING: &str = "How can I help you";

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person typing questions.
    User,
    /// The agent.
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Author.
    pub role: Role,
    /// Message text.
    pub text: String,
}

impl Turn {
    /// A user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// An assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered chat history. Never empty: the first turn is the greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// A transcript holding only the greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Turn::user(text))
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Turn::assistant(text))
    }

    /// Drop everything but a fresh greeting.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.turns.push(Turn::assistant(GREETING));
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns are recorded; the greeting keeps this false.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The newest turn.
    pub fn last(&self) -> &Turn {
        // non-empty by construction
        &self.turns[self.turns.len() - 1]
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        self.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
