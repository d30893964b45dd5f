//! The connection handle: schema introspection and query execution.

use crate::{Error, Result, Rows, Target, rows::truncate_word};
use sqlx::{
    AnyPool, Row,
    any::{AnyConnectOptions, AnyPoolOptions},
};
use std::{fmt, str::FromStr};

const SQLITE_TABLES: &str = include_str!("../sql/sqlite/tables.sql");
const SQLITE_CREATE: &str = include_str!("../sql/sqlite/create.sql");
const MYSQL_TABLES: &str = include_str!("../sql/mysql/tables.sql");

/// Longest value shown in a sample row.
const SAMPLE_VALUE_LENGTH: usize = 100;

/// SQL dialect of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// SQLite.
    Sqlite,
    /// MySQL.
    MySql,
}

impl Dialect {
    /// Detect the dialect from a connection URI.
    pub fn from_uri(uri: &str) -> Result<Self> {
        if uri.starts_with("sqlite:") {
            Ok(Dialect::Sqlite)
        } else if uri.starts_with("mysql:") {
            Ok(Dialect::MySql)
        } else {
            Err(Error::Unsupported(
                uri.split(':').next().unwrap_or_default().to_owned(),
            ))
        }
    }

    /// Quote an identifier.
    pub fn quote(self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Sqlite => "sqlite",
            Dialect::MySql => "mysql",
        })
    }
}

/// Connection and rendering settings.
#[derive(Debug, Clone)]
pub struct Options {
    /// Sample rows appended to each table description.
    pub sample_rows: usize,
    /// Longest text value returned from a query.
    pub max_string_length: usize,
    /// Pool size.
    pub max_connections: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sample_rows: 3,
            max_string_length: 300,
            max_connections: 4,
        }
    }
}

/// An open, reusable database connection.
#[derive(Debug)]
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
    sample_rows: usize,
    max_string_length: usize,
}

impl Database {
    /// Open a pool for `target`.
    pub async fn open(target: &Target, options: &Options) -> Result<Self> {
        Self::connect(&target.uri(), options)
            .await
            .map_err(|e| match e {
                Error::Query(source) => Error::Connect {
                    target: target.redacted(),
                    source,
                },
                other => other,
            })
    }

    /// Open a pool for a raw connection URI.
    pub async fn connect(uri: &str, options: &Options) -> Result<Self> {
        let dialect = Dialect::from_uri(uri)?;
        sqlx::any::install_default_drivers();
        let connect = AnyConnectOptions::from_str(uri)?;
        let pool = AnyPoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect)
            .await?;

        tracing::debug!(%dialect, "opened database pool");
        Ok(Self {
            pool,
            dialect,
            sample_rows: options.sample_rows,
            max_string_length: options.max_string_length,
        })
    }

    /// The SQL dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Names of the user tables, sorted.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let sql = match self.dialect {
            Dialect::Sqlite => SQLITE_TABLES,
            Dialect::MySql => MYSQL_TABLES,
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(Into::into))
            .collect()
    }

    /// `CREATE TABLE` statements plus sample rows for `names`.
    pub async fn table_info(&self, names: &[String]) -> Result<String> {
        let tables = self.list_tables().await?;
        let unknown: Vec<String> = names
            .iter()
            .filter(|name| !tables.contains(name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownTables { names: unknown });
        }

        let mut sections = Vec::with_capacity(names.len());
        for name in names {
            let mut section = self.create_statement(name).await?;
            if self.sample_rows > 0 {
                section.push_str("\n\n");
                section.push_str(&self.sample(name).await?);
            }
            sections.push(section);
        }
        Ok(sections.join("\n\n"))
    }

    /// Execute `sql` and collect its rows.
    pub async fn run(&self, sql: &str) -> Result<Rows> {
        tracing::debug!(sql, "running query");
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(Rows::from_any(&rows).truncate(self.max_string_length))
    }

    /// Like [`Database::run`] but renders failures as `Error: ...` text.
    pub async fn run_no_throw(&self, sql: &str) -> String {
        match self.run(sql).await {
            Ok(rows) => rows.to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn create_statement(&self, table: &str) -> Result<String> {
        let statement = match self.dialect {
            Dialect::Sqlite => sqlx::query(SQLITE_CREATE)
                .bind(table)
                .fetch_one(&self.pool)
                .await?
                .try_get::<String, _>(0)?,
            Dialect::MySql => {
                let sql = format!("SHOW CREATE TABLE {}", self.dialect.quote(table));
                sqlx::query(&sql)
                    .fetch_one(&self.pool)
                    .await?
                    .try_get::<String, _>(1)?
            }
        };
        Ok(statement.trim().to_owned())
    }

    async fn sample(&self, table: &str) -> Result<String> {
        let sql = format!(
            "SELECT * FROM {} LIMIT {}",
            self.dialect.quote(table),
            self.sample_rows
        );
        let rows = Rows::from_any(&sqlx::query(&sql).fetch_all(&self.pool).await?);

        let mut out = format!("/*\n{} rows from {table} table:\n", self.sample_rows);
        out.push_str(&rows.columns.join("\t"));
        for row in &rows.rows {
            let values: Vec<String> = row
                .iter()
                .map(|cell| truncate_word(&cell.plain(), SAMPLE_VALUE_LENGTH))
                .collect();
            out.push('\n');
            out.push_str(&values.join("\t"));
        }
        out.push_str("\n*/");
        Ok(out)
    }
}
