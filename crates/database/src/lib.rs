//! Database access for sqlchat.
//!
//! A [`Target`] names either the bundled SQLite file or a remote MySQL
//! database. The [`Connector`] turns a target into a shared [`Database`]
//! handle and memoizes it for a bounded window, so re-rendering the same
//! selection reuses the open pool.
//!
//! Static SQL lives in `sql/<dialect>/*.sql` files, loaded via
//! `include_str!`.

pub use {
    cache::{Cache, DEFAULT_TTL},
    connector::Connector,
    database::{Database, Dialect, Options},
    error::{Error, Result},
    rows::{Cell, Rows, truncate_word},
    target::{Credentials, EMBEDDED_FILE, Source, Target, embedded_path},
};

mod cache;
mod connector;
mod database;
mod error;
mod rows;
mod target;
