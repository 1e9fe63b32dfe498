//! Dump orchestration: catalog snapshot, statement phases and transaction envelope

use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::adapter::{CatalogSource, SqliteCatalog};
use crate::config::DumpConfig;
use crate::domain::{DumpSummary, SchemaObject};
use crate::error::{DumpError, Result};
use crate::schema::{self, TableAction};
use crate::sql_gen::{self, SqlGenerator};

/// Writes terminated statements straight to the output stream
struct StatementWriter<'a, W: ?Sized> {
    out: &'a mut W,
}

impl<'a, W> StatementWriter<'a, W>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    async fn write(&mut self, statement: &str) -> Result<()> {
        self.out
            .write_all(sql_gen::terminate(statement).as_bytes())
            .await?;
        Ok(())
    }
}

/// Dump the database file at `path` into `out`
///
/// A path that does not exist is not an error: nothing is written and the
/// returned summary has `source_missing` set. The database is closed before
/// returning, whether the dump succeeded or not. Output already written is
/// left in place on failure.
pub async fn dump<P, W>(path: P, out: &mut W, config: DumpConfig) -> Result<DumpSummary>
where
    P: AsRef<Path>,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let path = path.as_ref();

    let catalog = match open_source(path).await {
        Ok(catalog) => catalog,
        Err(DumpError::NotFound(missing)) => {
            info!("Database {} does not exist, nothing to dump", missing.display());
            return Ok(DumpSummary::missing_source());
        }
        Err(e) => return Err(e),
    };

    let result = dump_from_handle(&catalog, out, config).await;
    catalog.close().await;
    result
}

async fn open_source(path: &Path) -> Result<SqliteCatalog> {
    if matches!(tokio::fs::try_exists(path).await, Ok(false)) {
        return Err(DumpError::NotFound(path.to_path_buf()));
    }
    SqliteCatalog::open(path).await
}

/// Dump through a catalog the caller already owns
pub async fn dump_from_handle<C, W>(catalog: &C, out: &mut W, config: DumpConfig) -> Result<DumpSummary>
where
    C: CatalogSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    info!(
        migration = config.migration,
        drop_if_exists = config.drop_if_exists,
        wrap_in_transaction = config.wrap_in_transaction,
        include_rows = config.include_rows,
        "Starting dump"
    );

    let mut writer = StatementWriter::new(out);
    let mut summary = DumpSummary::default();

    if config.wrap_in_transaction {
        writer.write(sql_gen::BEGIN_TRANSACTION).await?;
    }

    let snapshot = catalog.snapshot().await?;
    debug!(
        tables = snapshot.tables.len(),
        others = snapshot.others.len(),
        "Read catalog"
    );

    if config.drop_if_exists {
        write_drops(&mut writer, &snapshot.tables, &snapshot.others, &mut summary).await?;
    }

    write_tables(catalog, &mut writer, &snapshot.tables, &config, &mut summary).await?;

    for object in &snapshot.others {
        debug!("Writing {} {}", object.kind, object.name);
        writer.write(&object.definition).await?;
        summary.other_objects += 1;
    }

    if config.wrap_in_transaction {
        writer.write(sql_gen::COMMIT).await?;
    }

    info!(
        statements = summary.statement_count(),
        skipped = summary.tables_skipped,
        "Dump completed"
    );
    Ok(summary)
}

/// Dump in migration mode: no CREATE TABLE, named columns in row inserts
#[deprecated(note = "use dump_from_handle with DumpConfig::migration()")]
pub async fn dump_migration<C, W>(catalog: &C, out: &mut W) -> Result<DumpSummary>
where
    C: CatalogSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    dump_from_handle(catalog, out, DumpConfig::new().migration()).await
}

async fn write_drops<W>(
    writer: &mut StatementWriter<'_, W>,
    tables: &[SchemaObject],
    others: &[SchemaObject],
    summary: &mut DumpSummary,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    for object in schema::drop_order(tables, others) {
        if let Some(statement) = SqlGenerator::generate_drop(object) {
            writer.write(&statement).await?;
            summary.drop_statements += 1;
        }
    }
    Ok(())
}

async fn write_tables<C, W>(
    catalog: &C,
    writer: &mut StatementWriter<'_, W>,
    tables: &[SchemaObject],
    config: &DumpConfig,
    summary: &mut DumpSummary,
) -> Result<()>
where
    C: CatalogSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    for (table, action) in schema::plan_tables(tables) {
        match action {
            TableAction::ResetSequence => {
                writer.write(sql_gen::RESET_SEQUENCE).await?;
                summary.special_statements += 1;
            }
            TableAction::Analyze => {
                writer.write(sql_gen::ANALYZE_CATALOG).await?;
                summary.special_statements += 1;
            }
            TableAction::SkipInternal => {
                debug!("Skipping internal table {}", table.name);
                summary.tables_skipped += 1;
            }
            TableAction::SkipFtsShadow => {
                debug!("Skipping full-text shadow table {}", table.name);
                summary.tables_skipped += 1;
            }
            TableAction::Ordinary => {
                if !config.migration {
                    debug!("Writing table {}", table.name);
                    writer.write(&table.definition).await?;
                    summary.tables_created += 1;
                }
            }
        }

        if config.include_rows && action.carries_rows() {
            summary.row_statements += write_rows(catalog, writer, &table.name, config).await?;
        }
    }
    Ok(())
}

async fn write_rows<C, W>(
    catalog: &C,
    writer: &mut StatementWriter<'_, W>,
    table: &str,
    config: &DumpConfig,
) -> Result<usize>
where
    C: CatalogSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let columns = catalog.table_columns(table).await?;
    let inserts = catalog.row_inserts(table, &columns, config.migration).await?;

    for insert in &inserts {
        writer.write(insert).await?;
    }

    debug!("Wrote {} rows for table {}", inserts.len(), table);
    Ok(inserts.len())
}
