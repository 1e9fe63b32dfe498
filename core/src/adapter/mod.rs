//! Catalog access abstraction over the database engine

use crate::domain::{CatalogSnapshot, ColumnDescriptor, SchemaObject};
use crate::error::Result;
use async_trait::async_trait;

pub mod sqlite;

pub use sqlite::SqliteCatalog;

/// Narrow query interface the dump engine needs from a database
///
/// Implementations own no dump policy: they only run introspection queries
/// and hand back decoded records in the order the engine returns them.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Table entries with a creation statement, ordered by name
    async fn table_schemas(&self) -> Result<Vec<SchemaObject>>;

    /// Index, trigger and view entries with a creation statement, in catalog order
    async fn other_schemas(&self) -> Result<Vec<SchemaObject>>;

    /// Columns of a table in positional order
    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// One rendered INSERT statement (without terminator) per row of a table
    async fn row_inserts(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        named_columns: bool,
    ) -> Result<Vec<String>>;

    /// Read both schema sets
    async fn snapshot(&self) -> Result<CatalogSnapshot> {
        let tables = self.table_schemas().await?;
        let others = self.other_schemas().await?;
        Ok(CatalogSnapshot { tables, others })
    }
}
