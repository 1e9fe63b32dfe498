//! SQLite catalog implementation

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};
use std::path::Path;
use tracing::debug;

use crate::adapter::CatalogSource;
use crate::domain::{ColumnDescriptor, ObjectKind, SchemaObject};
use crate::error::{DumpError, Result};
use crate::sql_gen::{quote_ident, SqlGenerator};

/// Table entries of the schema catalog, by name
const TABLE_SCHEMAS_QUERY: &str = r#"
    SELECT "name", "type", "sql"
    FROM "sqlite_master"
    WHERE "sql" NOT NULL AND "type" == 'table'
    ORDER BY "name"
"#;

/// Index, trigger and view entries of the schema catalog
const OTHER_SCHEMAS_QUERY: &str = r#"
    SELECT "name", "type", "sql"
    FROM "sqlite_master"
    WHERE "sql" NOT NULL AND "type" IN ('index', 'trigger', 'view')
"#;

/// SQLite catalog reader over an injected pool
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a database file that must already exist
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| DumpError::Connect {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Opened database {}", path.display());
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the underlying pool, waiting for connections to be released
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_schemas(&self, query: &str) -> Result<Vec<SchemaObject>> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DumpError::catalog_query(query, e))?;

        rows.iter()
            .map(|row| Self::decode_schema(row).map_err(|e| DumpError::catalog_query(query, e)))
            .collect()
    }

    fn decode_schema(row: &SqliteRow) -> std::result::Result<SchemaObject, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        let kind = ObjectKind::parse(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "type".to_string(),
            source: format!("unknown catalog object type {:?}", kind).into(),
        })?;

        Ok(SchemaObject {
            name: row.try_get("name")?,
            kind,
            definition: row.try_get("sql")?,
        })
    }

    /// Decode a name cell that may be stored as text or as raw bytes
    fn decode_name_cell(row: &SqliteRow, index: usize, table: &str, query: &str) -> Result<String> {
        let storage_class = {
            let raw = row
                .try_get_raw(index)
                .map_err(|e| DumpError::catalog_query(query, e))?;
            raw.type_info().name().to_string()
        };

        match storage_class.as_str() {
            "TEXT" => row
                .try_get::<String, _>(index)
                .map_err(|e| DumpError::catalog_query(query, e)),
            "BLOB" => {
                let bytes = row
                    .try_get::<Vec<u8>, _>(index)
                    .map_err(|e| DumpError::catalog_query(query, e))?;
                String::from_utf8(bytes).map_err(|_| DumpError::QuoteEncoding {
                    table: table.to_string(),
                    column: index,
                    storage_class: "non UTF-8 BLOB".to_string(),
                })
            }
            _ => Err(DumpError::QuoteEncoding {
                table: table.to_string(),
                column: index,
                storage_class,
            }),
        }
    }
}

#[async_trait]
impl CatalogSource for SqliteCatalog {
    async fn table_schemas(&self) -> Result<Vec<SchemaObject>> {
        self.fetch_schemas(TABLE_SCHEMAS_QUERY).await
    }

    async fn other_schemas(&self) -> Result<Vec<SchemaObject>> {
        self.fetch_schemas(OTHER_SCHEMAS_QUERY).await
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let query = format!("PRAGMA table_info({})", quote_ident(table));

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DumpError::catalog_query(query.as_str(), e))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = Self::decode_name_cell(row, 1, table, &query)?;
            let decode = |e| DumpError::catalog_query(query.as_str(), e);

            columns.push(ColumnDescriptor {
                position: row.try_get("cid").map_err(decode)?,
                name,
                declared_type: row.try_get("type").map_err(decode)?,
                is_nullable: row.try_get::<i64, _>("notnull").map_err(decode)? == 0,
                default_value: row.try_get("dflt_value").map_err(decode)?,
                is_primary_key: row.try_get::<i64, _>("pk").map_err(decode)? > 0,
            });
        }

        Ok(columns)
    }

    async fn row_inserts(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        named_columns: bool,
    ) -> Result<Vec<String>> {
        let Some(query) = SqlGenerator::generate_row_insert_query(table, columns, named_columns)
        else {
            return Ok(Vec::new());
        };

        sqlx::query_scalar::<_, String>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DumpError::catalog_query(query.as_str(), e))
    }
}
