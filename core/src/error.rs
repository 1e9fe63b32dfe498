//! Core error types for the dump engine

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for all dump operations
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open database {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("Catalog query failed ({query}): {source}")]
    CatalogQuery {
        query: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to write dump output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Unsupported {storage_class} value in column {column} of table {table}")]
    QuoteEncoding {
        table: String,
        column: usize,
        storage_class: String,
    },
}

impl DumpError {
    /// Create a CatalogQuery error carrying the statement that failed
    pub fn catalog_query(query: impl Into<String>, source: sqlx::Error) -> Self {
        DumpError::CatalogQuery {
            query: query.into().trim().to_string(),
            source,
        }
    }
}

/// Result type alias using DumpError
pub type Result<T> = std::result::Result<T, DumpError>;
