//! SQL agent for sqlchat.
//!
//! [`SqlAgent`] wires a model provider to a [`Toolkit`] of four SQL tools
//! bound to one database handle, and runs an observe/act loop until the
//! model answers or the iteration limit is hit. Progress is reported as
//! [`Event`]s to an [`Observer`].

pub use {
    agent::{AgentConfig, Answer, Assistant, STOPPED, SqlAgent},
    event::{Event, Observer},
    guard::is_read_only,
    toolkit::{LIST_TABLES, QUERY, QUERY_CHECKER, SCHEMA, ToolError, Toolkit},
};

mod agent;
mod event;
mod guard;
mod toolkit;
