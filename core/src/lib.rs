//! SQLite Dump Core Library
//!
//! Serializes the schema (and optionally the rows) of a SQLite database into
//! a stream of SQL statements that rebuilds it when replayed against an
//! empty database.

pub mod adapter;
pub mod config;
pub mod domain;
pub mod dump;
pub mod error;
pub mod schema;
pub mod sql_gen;

pub use adapter::{CatalogSource, SqliteCatalog};
pub use config::{DumpConfig, DumpOption};
pub use domain::DumpSummary;
#[allow(deprecated)]
pub use dump::{dump, dump_from_handle, dump_migration};
pub use error::{DumpError, Result};
