//! The SQL tools the agent can call.

use crate::guard::is_read_only;
use database::Database;
use llm::{General, LLM, Message, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

const CHECKER_PROMPT: &str = include_str!("../prompts/checker.md");

/// List the tables of the database.
pub const LIST_TABLES: &str = "sql_db_list_tables";
/// Describe tables: schema plus sample rows.
pub const SCHEMA: &str = "sql_db_schema";
/// Run a query.
pub const QUERY: &str = "sql_db_query";
/// Have the model review a query before it runs.
pub const QUERY_CHECKER: &str = "sql_db_query_checker";

/// Errors raised by a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The model named a tool that does not exist.
    #[error(
        "{0} is not a valid tool, try one of [sql_db_query, sql_db_schema, sql_db_list_tables, sql_db_query_checker]"
    )]
    UnknownTool(String),

    /// The arguments were not valid JSON for the tool.
    #[error("invalid input for {tool}: {source}")]
    Arguments {
        /// Tool name.
        tool: String,
        /// The decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The database failed outside a query.
    #[error(transparent)]
    Database(#[from] database::Error),

    /// The query checker could not reach the model.
    #[error("query checker failed: {0}")]
    Checker(anyhow::Error),
}

impl ToolError {
    /// Whether the model produced a malformed invocation.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ToolError::UnknownTool(_) | ToolError::Arguments { .. })
    }
}

/// Input of [`SCHEMA`].
#[derive(Deserialize, JsonSchema)]
struct SchemaInput {
    /// A comma-separated list of the table names, for example: table1, table2, table3
    table_names: String,
}

/// Input of [`QUERY`] and [`QUERY_CHECKER`].
#[derive(Deserialize, JsonSchema)]
struct QueryInput {
    /// A detailed and correct SQL query.
    query: String,
}

/// Input of [`LIST_TABLES`].
#[derive(Deserialize, JsonSchema, Default)]
#[allow(dead_code)]
struct NoInput {
    /// Leave empty.
    #[serde(default)]
    tool_input: String,
}

/// SQL tools bound to one database handle.
#[derive(Clone)]
pub struct Toolkit<P: LLM> {
    database: Arc<Database>,
    provider: P,
    config: General,
}

impl<P: LLM> Toolkit<P> {
    /// Bind the tools to `database`; `provider` serves the query checker.
    pub fn new(database: Arc<Database>, provider: P, config: General) -> Self {
        Self {
            database,
            provider,
            config,
        }
    }

    /// The bound database.
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Tool definitions sent to the model.
    pub fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: QUERY.into(),
                description: format!(
                    "Input to this tool is a detailed and correct SQL query, output is a result \
                     from the database. If the query is not correct, an error message will be \
                     returned. If an error is returned, rewrite the query, check the query, and \
                     try again. If you encounter an issue with Unknown column 'xxxx' in 'field \
                     list', use {SCHEMA} to query the correct table fields."
                ),
                parameters: schemars::schema_for!(QueryInput),
                strict: false,
            },
            Tool {
                name: SCHEMA.into(),
                description: format!(
                    "Input to this tool is a comma-separated list of tables, output is the schema \
                     and sample rows for those tables. Be sure that the tables actually exist by \
                     calling {LIST_TABLES} first! Example Input: table1, table2, table3"
                ),
                parameters: schemars::schema_for!(SchemaInput),
                strict: false,
            },
            Tool {
                name: LIST_TABLES.into(),
                description: "Input is an empty string, output is a comma-separated list of \
                              tables in the database."
                    .into(),
                parameters: schemars::schema_for!(NoInput),
                strict: false,
            },
            Tool {
                name: QUERY_CHECKER.into(),
                description: format!(
                    "Use this tool to double check if your query is correct before executing it. \
                     Always use this tool before executing a query with {QUERY}!"
                ),
                parameters: schemars::schema_for!(QueryInput),
                strict: false,
            },
        ]
    }

    /// Run the tool `name` with JSON `arguments`.
    pub async fn call(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        tracing::debug!(tool = name, arguments, "calling tool");
        match name {
            LIST_TABLES => Ok(self.database.list_tables().await?.join(", ")),
            SCHEMA => {
                let input: SchemaInput = parse(name, arguments)?;
                let names: Vec<String> = input
                    .table_names
                    .split(',')
                    .map(|name| name.trim().to_owned())
                    .filter(|name| !name.is_empty())
                    .collect();
                Ok(match self.database.table_info(&names).await {
                    Ok(info) => info,
                    Err(e) => format!("Error: {e}"),
                })
            }
            QUERY => {
                let input: QueryInput = parse(name, arguments)?;
                if !is_read_only(&input.query) {
                    tracing::warn!(query = %input.query, "refused write statement");
                    return Ok("Error: only a single read-only statement may be run".into());
                }
                Ok(self.database.run_no_throw(&input.query).await)
            }
            QUERY_CHECKER => {
                let input: QueryInput = parse(name, arguments)?;
                self.check(&input.query).await
            }
            other => Err(ToolError::UnknownTool(other.into())),
        }
    }

    async fn check(&self, query: &str) -> Result<String, ToolError> {
        let prompt = CHECKER_PROMPT
            .replace("{query}", query)
            .replace("{dialect}", &self.database.dialect().to_string());
        let config = P::ChatConfig::from(self.config.clone());
        let response = self
            .provider
            .send(&config, &[Message::user(prompt)])
            .await
            .map_err(ToolError::Checker)?;
        Ok(response.content().cloned().unwrap_or_default().trim().to_owned())
    }
}

fn parse<T: for<'de> Deserialize<'de>>(tool: &str, arguments: &str) -> Result<T, ToolError> {
    serde_json::from_str(arguments).map_err(|source| ToolError::Arguments {
        tool: tool.into(),
        source,
    })
}
