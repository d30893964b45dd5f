//! Turning settings into a ready agent.

use crate::{Sidebar, Surface};
use agent::Assistant;
use anyhow::Result;
use database::{Connector, Database, Target};
use std::{fmt, path::Path, sync::Arc};

/// Produces a connection handle for a target.
pub trait Connect {
    /// The handle type.
    type Handle;

    /// Open, or reuse, the handle for `target`.
    fn connect(&self, target: &Target) -> impl Future<Output = database::Result<Self::Handle>>;
}

impl Connect for Connector {
    type Handle = Arc<Database>;

    fn connect(&self, target: &Target) -> impl Future<Output = database::Result<Arc<Database>>> {
        self.configure(target)
    }
}

/// Builds the agent for a connection handle.
pub trait Bootstrap<H> {
    /// The agent type.
    type Agent: Assistant;

    /// Wire a model client keyed with `api_key` to `handle`.
    fn bootstrap(&self, handle: H, api_key: &str) -> Result<Self::Agent>;
}

/// Why the chat cannot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// No database mode selected.
    MissingDatabase,
    /// No model credential.
    MissingApiKey,
    /// Remote mode with blank fields.
    MissingCredentials(Vec<&'static str>),
}

impl Halt {
    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Halt::MissingDatabase => "Please enter the database information and URI",
            Halt::MissingApiKey => "Please add the Groq API Key",
            Halt::MissingCredentials(_) => "Please provide the MySQL database information",
        }
    }

    /// Show the halt on `surface`.
    ///
    /// Missing configuration is a notice, missing credentials an error.
    pub fn report(&self, surface: &mut impl Surface) {
        match self {
            Halt::MissingCredentials(_) => surface.error(self.message()),
            _ => surface.info(self.message()),
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of [`prepare`].
pub enum Setup<A> {
    /// The agent is ready for questions.
    Ready(A),
    /// The chat must not start.
    Halted(Halt),
}

/// Validate `sidebar`, connect and build the agent.
///
/// Nothing is connected while the model credential is blank. Connection
/// failures other than blank remote fields are returned as errors.
pub async fn prepare<C, B>(
    sidebar: &Sidebar,
    embedded: &Path,
    connector: &C,
    bootstrap: &B,
) -> Result<Setup<B::Agent>>
where
    C: Connect,
    B: Bootstrap<C::Handle>,
{
    let Some(target) = sidebar.target(embedded) else {
        return Ok(Setup::Halted(Halt::MissingDatabase));
    };
    if !sidebar.has_api_key() {
        return Ok(Setup::Halted(Halt::MissingApiKey));
    }

    let handle = match connector.connect(&target).await {
        Ok(handle) => handle,
        Err(database::Error::MissingCredentials { fields }) => {
            tracing::debug!(?fields, "remote settings incomplete");
            return Ok(Setup::Halted(Halt::MissingCredentials(fields)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(uri = %target.redacted(), "database ready");
    let agent = bootstrap.bootstrap(handle, sidebar.api_key.trim())?;
    Ok(Setup::Ready(agent))
}
