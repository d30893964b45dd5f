//! Connection targets and the URI convention.

use crate::{Dialect, Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// File name of the bundled SQLite database.
pub const EMBEDDED_FILE: &str = "pr_report.db";

/// Characters left as-is in the userinfo part of a URI.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters left as-is in a file path; separators stay readable.
const PATH: &AsciiSet = &USERINFO.remove(b'/');

/// The database mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Source {
    /// The bundled SQLite file.
    #[default]
    Embedded,
    /// A MySQL server reached with user supplied credentials.
    Remote,
}

impl Source {
    /// Both options in display order.
    pub const ALL: [Source; 2] = [Source::Embedded, Source::Remote];

    /// Label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Source::Embedded => "Use SQLite 3 Database - pr_report.db",
            Source::Remote => "Connect to your database",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote connection fields.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Credentials {
    /// Host name, optionally with `:port`.
    pub host: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database (schema) name.
    pub database: String,
}

impl Credentials {
    /// Names of the blank fields, in form order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("host", &self.host),
            ("user", &self.user),
            ("password", &self.password),
            ("database", &self.database),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Where the connection handle points.
///
/// Targets are compared by value, so two identical selections share one
/// memoized connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A local SQLite file.
    Embedded(PathBuf),
    /// A remote MySQL database.
    Remote(Credentials),
}

impl Target {
    /// The bundled database next to the running executable.
    pub fn embedded() -> Result<Self> {
        Ok(Self::Embedded(embedded_path()?))
    }

    /// SQL dialect spoken by the target.
    pub fn dialect(&self) -> Dialect {
        match self {
            Target::Embedded(_) => Dialect::Sqlite,
            Target::Remote(_) => Dialect::MySql,
        }
    }

    /// Fail with [`Error::MissingCredentials`] if a remote field is blank.
    pub fn validate(&self) -> Result<()> {
        let Target::Remote(credentials) = self else {
            return Ok(());
        };

        let fields = credentials.missing();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingCredentials { fields })
        }
    }

    /// Connection URI understood by the driver.
    ///
    /// File paths are percent-encoded so `?`, `#` and `%` stay part of the
    /// name.
    pub fn uri(&self) -> String {
        match self {
            Target::Embedded(path) => format!(
                "sqlite://{}",
                utf8_percent_encode(&path.to_string_lossy(), PATH)
            ),
            Target::Remote(c) => format!(
                "mysql://{}:{}@{}/{}",
                encode(&c.user),
                encode(&c.password),
                c.host.trim(),
                c.database.trim()
            ),
        }
    }

    /// The URI with the password masked, for logs and messages.
    pub fn redacted(&self) -> String {
        match self {
            Target::Embedded(path) => format!("sqlite://{}", path.display()),
            Target::Remote(c) => format!(
                "mysql://{}:***@{}/{}",
                encode(&c.user),
                c.host.trim(),
                c.database.trim()
            ),
        }
    }
}

/// `pr_report.db` in the directory holding the running executable.
pub fn embedded_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(Error::Executable)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(EMBEDDED_FILE))
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, USERINFO).to_string()
}
