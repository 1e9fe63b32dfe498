//! SQL statement generation for the dump output

use crate::domain::{ColumnDescriptor, ObjectKind, SchemaObject};
use crate::schema::is_internal;

pub const BEGIN_TRANSACTION: &str = "BEGIN TRANSACTION";
pub const COMMIT: &str = "COMMIT";
pub const RESET_SEQUENCE: &str = r#"DELETE FROM "sqlite_sequence""#;
pub const ANALYZE_CATALOG: &str = r#"ANALYZE "sqlite_master""#;

/// Quote an identifier: double embedded double quotes and wrap in double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a text literal: double embedded single quotes and wrap in single quotes
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Terminate a statement the way every line of the dump is terminated
pub fn terminate(statement: &str) -> String {
    format!("{};\n", statement)
}

/// SQL statement generator
pub struct SqlGenerator;

impl SqlGenerator {
    /// Generate the DROP statement for a catalog object, if its kind gets one
    ///
    /// Triggers and views are left alone, as are internal `sqlite_` tables.
    pub fn generate_drop(object: &SchemaObject) -> Option<String> {
        match object.kind {
            ObjectKind::Index => Some(format!(
                "DROP INDEX IF EXISTS {}",
                quote_ident(&object.name)
            )),
            ObjectKind::Table if !is_internal(&object.name) => Some(format!(
                "DROP TABLE IF EXISTS {}",
                quote_ident(&object.name)
            )),
            _ => None,
        }
    }

    /// Generate the query that renders one INSERT statement per row of a table
    ///
    /// Values are quoted by the engine's own `quote()` function. With
    /// `named_columns` the statement carries an explicit column list. Returns
    /// `None` for a table without columns.
    pub fn generate_row_insert_query(
        table: &str,
        columns: &[ColumnDescriptor],
        named_columns: bool,
    ) -> Option<String> {
        if columns.is_empty() {
            return None;
        }

        let mut head = format!("INSERT INTO {}", quote_ident(table));
        if named_columns {
            let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
            head.push_str(&format!("({})", names.join(",")));
        }
        head.push_str(" VALUES(");

        let values: Vec<String> = columns
            .iter()
            .map(|c| format!("quote({})", quote_ident(&c.name)))
            .collect();

        Some(format!(
            "SELECT {} || {} || ')' FROM {}",
            quote_literal(&head),
            values.join(" || ',' || "),
            quote_ident(table)
        ))
    }
}
