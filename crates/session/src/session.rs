//! The turn loop.

use crate::{Surface, Transcript};
use agent::{Assistant, Event};
use anyhow::Result;

/// Whether a turn is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Waiting for input.
    #[default]
    Idle,
    /// The agent is answering.
    Processing,
}

/// One chat session: the transcript and the turn state.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Transcript,
    state: State,
}

impl Session {
    /// A session showing only the greeting.
    pub fn new() -> Self {
        Self::default()
    }

    /// The chat history.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Draw the whole transcript.
    pub fn render(&self, surface: &mut impl Surface) {
        for turn in self.transcript.turns() {
            surface.turn(turn);
        }
    }

    /// Handle one submitted line.
    ///
    /// Blank input is ignored and yields `None`. Otherwise the question is
    /// recorded and shown, the agent runs with its progress forwarded to
    /// `surface`, and the answer is recorded, shown and returned. If the
    /// agent fails the question stays in the transcript and the error is
    /// returned.
    pub async fn submit<A, S>(
        &mut self,
        input: &str,
        agent: &A,
        surface: &mut S,
    ) -> Result<Option<String>>
    where
        A: Assistant,
        S: Surface,
    {
        let query = input.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.state = State::Processing;
        surface.turn(self.transcript.push_user(query));

        let result = agent
            .run(query, &mut |event: &Event| surface.trace(event))
            .await;
        self.state = State::Idle;

        let answer = result?;
        tracing::debug!(steps = answer.steps, "turn finished");
        surface.turn(self.transcript.push_assistant(answer.text.clone()));
        Ok(Some(answer.text))
    }

    /// Back to a fresh greeting, whatever the state.
    pub fn reset(&mut self) {
        self.transcript.reset();
        self.state = State::Idle;
    }
}
