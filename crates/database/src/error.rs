//! Database errors.

/// Errors raised while configuring or querying a database.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote mode was selected with blank connection fields.
    #[error("missing database information: {}", fields.join(", "))]
    MissingCredentials {
        /// Names of the blank fields.
        fields: Vec<&'static str>,
    },

    /// The connection URI names a driver we do not ship.
    #[error("unsupported database uri: {0}")]
    Unsupported(String),

    /// Opening the pool failed.
    #[error("failed to connect to {target}")]
    Connect {
        /// The target, password redacted.
        target: String,
        /// The driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed.
    #[error(transparent)]
    Query(#[from] sqlx::Error),

    /// Schema was requested for tables that do not exist.
    #[error("table_names {} not found in database", names.join(", "))]
    UnknownTables {
        /// The unknown names.
        names: Vec<String>,
    },

    /// The directory of the running executable could not be resolved.
    #[error("failed to locate the executable directory")]
    Executable(#[source] std::io::Error),
}

/// Result alias for database operations.
pub type Result<T> = std::result::Result<T, Error>;
