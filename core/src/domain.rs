//! Domain models for the dump engine

use serde::{Deserialize, Serialize};

/// Kind of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    Index,
    Trigger,
    View,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
            ObjectKind::Trigger => "trigger",
            ObjectKind::View => "view",
        }
    }

    /// Parse the `type` column of the schema catalog
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "table" => Some(ObjectKind::Table),
            "index" => Some(ObjectKind::Index),
            "trigger" => Some(ObjectKind::Trigger),
            "view" => Some(ObjectKind::View),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the schema catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Original creation statement; never empty for dumped objects
    pub definition: String,
}

impl SchemaObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: definition.into(),
        }
    }
}

/// Column information from `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub position: i64,
    pub name: String,
    pub declared_type: String,
    pub is_nullable: bool,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
}

/// Both schema sets read from the catalog for one dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Tables, ordered by name
    pub tables: Vec<SchemaObject>,
    /// Indexes, triggers and views, in catalog order
    pub others: Vec<SchemaObject>,
}

impl CatalogSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.others.is_empty()
    }
}

/// Counters describing what a dump wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpSummary {
    /// The named source did not exist and nothing was written
    pub source_missing: bool,
    /// CREATE TABLE statements written
    pub tables_created: usize,
    /// DELETE/ANALYZE statements written for bookkeeping tables
    pub special_statements: usize,
    /// Tables that produced no statement of their own
    pub tables_skipped: usize,
    /// Index, trigger and view definitions written
    pub other_objects: usize,
    /// DROP ... IF EXISTS statements written
    pub drop_statements: usize,
    /// INSERT statements written
    pub row_statements: usize,
}

impl DumpSummary {
    pub(crate) fn missing_source() -> Self {
        Self {
            source_missing: true,
            ..Self::default()
        }
    }

    /// Total number of SQL statements written, excluding the transaction envelope
    pub fn statement_count(&self) -> usize {
        self.tables_created
            + self.special_statements
            + self.other_objects
            + self.drop_statements
            + self.row_statements
    }
}
