//! Settings collected before chatting.

use database::{Credentials, Source, Target};
use std::{fmt, path::Path};

/// Values entered in the settings panel.
///
/// Remote fields only matter when `source` is [`Source::Remote`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    /// Selected database mode, if any.
    pub source: Option<Source>,
    /// Remote host.
    pub host: String,
    /// Remote user.
    pub user: String,
    /// Remote password.
    pub password: String,
    /// Remote database name.
    pub database: String,
    /// Model credential.
    pub api_key: String,
}

impl Sidebar {
    /// Settings for the bundled database.
    pub fn embedded(api_key: impl Into<String>) -> Self {
        Self {
            source: Some(Source::Embedded),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Settings for a remote database.
    pub fn remote(credentials: Credentials, api_key: impl Into<String>) -> Self {
        Self {
            source: Some(Source::Remote),
            host: credentials.host,
            user: credentials.user,
            password: credentials.password,
            database: credentials.database,
            api_key: api_key.into(),
        }
    }

    /// The remote fields as entered.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            host: self.host.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    /// Whether a model credential was entered.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// The connection target, `None` when no mode is selected.
    ///
    /// `embedded` is the bundled database file. Values are taken as typed;
    /// blank remote fields are caught by the connector.
    pub fn target(&self, embedded: &Path) -> Option<Target> {
        self.source.map(|source| match source {
            Source::Embedded => Target::Embedded(embedded.to_path_buf()),
            Source::Remote => Target::Remote(self.credentials()),
        })
    }
}

impl fmt::Debug for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sidebar")
            .field("source", &self.source)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("api_key", &"***")
            .finish()
    }
}
