//! Classification of catalog tables into dump actions

use crate::domain::SchemaObject;

/// Autoincrement bookkeeping table
pub const SEQUENCE_TABLE: &str = "sqlite_sequence";

/// Legacy statistics table name
pub const LEGACY_STAT_TABLE: &str = "sqlite3_stat1";

/// Prefix reserved for the engine's internal tables
pub const INTERNAL_PREFIX: &str = "sqlite_";

/// Suffixes of the shadow tables a full-text index maintains for itself
pub const FTS_SHADOW_SUFFIXES: [&str; 8] = [
    "_segments",
    "_segdir",
    "_stat",
    "_idx",
    "_docsize",
    "_config",
    "_data",
    "_content",
];

/// What the table phase does with one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    /// Reset autoincrement counters instead of recreating the table
    ResetSequence,
    /// Rebuild statistics instead of recreating the table
    Analyze,
    /// Internal table, never recreated
    SkipInternal,
    /// Full-text shadow table, recreated by its virtual table
    SkipFtsShadow,
    /// User table subject to CREATE/INSERT emission
    Ordinary,
}

impl TableAction {
    /// Whether row inserts may follow this action
    ///
    /// The legacy statistics table is never recreated on replay, so `Analyze`
    /// carries none.
    pub fn carries_rows(&self) -> bool {
        matches!(self, TableAction::ResetSequence | TableAction::Ordinary)
    }
}

pub fn is_internal(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

pub fn is_fts_shadow(name: &str) -> bool {
    FTS_SHADOW_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Classify a table by name; rules are checked in order and the first match wins
pub fn classify_table(name: &str) -> TableAction {
    if name == SEQUENCE_TABLE {
        TableAction::ResetSequence
    } else if name == LEGACY_STAT_TABLE {
        TableAction::Analyze
    } else if is_internal(name) {
        TableAction::SkipInternal
    } else if is_fts_shadow(name) {
        TableAction::SkipFtsShadow
    } else {
        TableAction::Ordinary
    }
}

/// Pair each table with its action, keeping catalog order
pub fn plan_tables(tables: &[SchemaObject]) -> Vec<(&SchemaObject, TableAction)> {
    tables
        .iter()
        .map(|table| (table, classify_table(&table.name)))
        .collect()
}

/// Objects considered by the drop phase: other-schema objects before tables
pub fn drop_order<'a>(
    tables: &'a [SchemaObject],
    others: &'a [SchemaObject],
) -> impl Iterator<Item = &'a SchemaObject> {
    others.iter().chain(tables.iter())
}
