//! Interactive chat loop.

use crate::{Config, GroqBootstrap, Terminal, sidebar};
use agent::Assistant;
use anyhow::Result;
use database::Connector;
use llm::Client;
use rustyline::{
    Context, Editor, Helper, completion::Completer, error::ReadlineError, highlight::Highlighter,
    hint::Hinter, history::DefaultHistory, validate::Validator,
};
use session::{Session, Setup, Sidebar, Surface, prepare};
use std::{borrow::Cow, path::PathBuf};

/// Hint shown on an empty input line.
pub const PLACEHOLDER: &str = "Ask anything from the database";

/// One line typed at the chat prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Nothing but whitespace.
    Empty,
    /// `/clear`: start the conversation over.
    Clear,
    /// `/settings`: change the database or key.
    Settings,
    /// `/exit` or `/quit`.
    Exit,
    /// A question for the agent.
    Query(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a typed line.
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Line::Empty,
            "/clear" => Line::Clear,
            "/settings" => Line::Settings,
            "/exit" | "/quit" => Line::Exit,
            query => Line::Query(query),
        }
    }
}

enum Next {
    Settings,
    Exit,
}

/// The chat application: settings, then questions until exit.
pub struct ChatRepl {
    session: Session,
    sidebar: Sidebar,
    connector: Connector,
    bootstrap: GroqBootstrap,
    embedded: PathBuf,
    terminal: Terminal,
    editor: Editor<Placeholder, DefaultHistory>,
}

impl ChatRepl {
    /// Create the application from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut editor = Editor::<Placeholder, DefaultHistory>::new()?;
        editor.set_helper(Some(Placeholder));

        Ok(Self {
            session: Session::new(),
            sidebar: Sidebar::default(),
            connector: Connector::with_ttl(config.options(), config.ttl()),
            bootstrap: GroqBootstrap::new(Client::new(), &config.endpoint, config.agent()),
            embedded: config.embedded_path()?,
            terminal: Terminal::new(),
            editor,
        })
    }

    /// Run until the user exits.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.sidebar = sidebar::prompt(&self.sidebar)?;
            let setup = prepare(
                &self.sidebar,
                &self.embedded,
                &self.connector,
                &self.bootstrap,
            )
            .await;

            match setup {
                Ok(Setup::Ready(agent)) => match self.chat(&agent).await? {
                    Next::Settings => continue,
                    Next::Exit => return Ok(()),
                },
                Ok(Setup::Halted(halt)) => halt.report(&mut self.terminal),
                Err(e) => self.terminal.error(&format!("{e:#}")),
            }

            if !sidebar::reopen()? {
                return Ok(());
            }
        }
    }

    async fn chat(&mut self, agent: &impl Assistant) -> Result<Next> {
        self.terminal.clear();
        self.terminal
            .info("Type /clear to start over, /settings to switch database, /exit to quit.");
        self.session.render(&mut self.terminal);

        loop {
            let line = match self.editor.readline("> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(Next::Exit),
                Err(e) => return Err(e.into()),
            };

            let query = match Line::parse(&line) {
                Line::Empty => continue,
                Line::Exit => return Ok(Next::Exit),
                Line::Settings => return Ok(Next::Settings),
                Line::Clear => {
                    self.session.reset();
                    self.terminal.clear();
                    self.session.render(&mut self.terminal);
                    continue;
                }
                Line::Query(query) => query,
            };

            let _ = self.editor.add_history_entry(query);
            if let Err(e) = self.session.submit(query, agent, &mut self.terminal).await {
                tracing::error!("turn failed: {e:?}");
                self.terminal.error(&format!("{e:#}"));
            }
        }
    }
}

/// Line editor helper that shows [`PLACEHOLDER`] on an empty line.
pub struct Placeholder;

impl Hinter for Placeholder {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        line.is_empty().then(|| PLACEHOLDER.into())
    }
}

impl Highlighter for Placeholder {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(console::style(hint).dim().to_string())
    }
}

impl Completer for Placeholder {
    type Candidate = String;
}

impl Validator for Placeholder {}

impl Helper for Placeholder {}
