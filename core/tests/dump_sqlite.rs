//! End-to-end dump tests against real SQLite database files.

use sqlite_dump_core::{dump, dump_from_handle, DumpConfig, SqliteCatalog};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, Row};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

async fn create_db(path: &Path, statements: &[&str]) {
    let pool = open_pool(path).await;
    for statement in statements {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool.close().await;
}

async fn open_pool(path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap()
}

async fn fixture(statements: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.db");
    create_db(&path, statements).await;
    (dir, path)
}

async fn dump_to_string(path: &Path, config: DumpConfig) -> String {
    let mut out = Vec::new();
    dump(path, &mut out, config).await.unwrap();
    String::from_utf8(out).unwrap()
}

const SINGLE_TABLE: &[&str] = &[
    "CREATE TABLE t(id INTEGER PRIMARY KEY, name TEXT)",
    "INSERT INTO t VALUES(1, 'a')",
];

#[tokio::test]
async fn test_full_dump_of_single_table() {
    let (_dir, path) = fixture(SINGLE_TABLE).await;
    assert_eq!(
        dump_to_string(&path, DumpConfig::default()).await,
        "BEGIN TRANSACTION;\nCREATE TABLE t(id INTEGER PRIMARY KEY, name TEXT);\nCOMMIT;\n"
    );
}

#[tokio::test]
async fn test_migration_dump_of_single_table() {
    let (_dir, path) = fixture(SINGLE_TABLE).await;
    assert_eq!(
        dump_to_string(&path, DumpConfig::new().migration()).await,
        "BEGIN TRANSACTION;\nCOMMIT;\n"
    );
}

#[tokio::test]
async fn test_empty_database() {
    let (_dir, path) = fixture(&[]).await;
    assert_eq!(
        dump_to_string(&path, DumpConfig::default()).await,
        "BEGIN TRANSACTION;\nCOMMIT;\n"
    );
}

#[tokio::test]
async fn test_missing_database_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.db");

    let mut out = Vec::new();
    let summary = dump(&path, &mut out, DumpConfig::default()).await.unwrap();

    assert!(summary.source_missing);
    assert!(out.is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_sequence_table_is_reset_not_created() {
    let (_dir, path) = fixture(&[
        "CREATE TABLE items(id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT)",
        "INSERT INTO items(label) VALUES('first')",
    ])
    .await;

    let output = dump_to_string(&path, DumpConfig::default()).await;
    assert_eq!(output.matches("DELETE FROM \"sqlite_sequence\";").count(), 1);
    assert!(!output.contains("CREATE TABLE sqlite_sequence"));
    assert!(output.contains("CREATE TABLE items(id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT);\n"));
}

#[tokio::test]
async fn test_statistics_and_shadow_tables_are_skipped() {
    let (_dir, path) = fixture(&[
        "CREATE TABLE notes(id INTEGER PRIMARY KEY, body TEXT)",
        "CREATE TABLE notes_content(id INTEGER PRIMARY KEY, c0 TEXT)",
        "CREATE TABLE notes_docsize(id INTEGER PRIMARY KEY, sz BLOB)",
        "CREATE INDEX idx_notes_body ON notes(body)",
        "INSERT INTO notes(body) VALUES('x'), ('y')",
        "ANALYZE",
    ])
    .await;

    let output = dump_to_string(&path, DumpConfig::new().without_transaction()).await;
    assert_eq!(
        output,
        concat!(
            "CREATE TABLE notes(id INTEGER PRIMARY KEY, body TEXT);\n",
            "CREATE INDEX idx_notes_body ON notes(body);\n",
        )
    );
}

#[tokio::test]
async fn test_tables_sorted_and_others_in_catalog_order() {
    let (_dir, path) = fixture(&[
        "CREATE TABLE b(x INTEGER)",
        "CREATE TABLE a(x INTEGER)",
        "CREATE INDEX zz ON a(x)",
        "CREATE VIEW av AS SELECT x FROM a",
        "CREATE INDEX aa ON b(x)",
        "CREATE TRIGGER tb AFTER INSERT ON b BEGIN INSERT INTO a VALUES(new.x); END",
    ])
    .await;

    let output = dump_to_string(&path, DumpConfig::new().without_transaction()).await;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "CREATE TABLE a(x INTEGER);",
            "CREATE TABLE b(x INTEGER);",
            "CREATE INDEX zz ON a(x);",
            "CREATE VIEW av AS SELECT x FROM a;",
            "CREATE INDEX aa ON b(x);",
            "CREATE TRIGGER tb AFTER INSERT ON b BEGIN INSERT INTO a VALUES(new.x); END;",
        ]
    );
}

#[tokio::test]
async fn test_drops_cover_tables_and_indexes() {
    let (_dir, path) = fixture(&[
        "CREATE TABLE items(id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT)",
        "CREATE INDEX idx_items_label ON items(label)",
        "CREATE VIEW labels AS SELECT label FROM items",
    ])
    .await;

    let output = dump_to_string(&path, DumpConfig::new().drop_if_exists()).await;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "DROP INDEX IF EXISTS \"idx_items_label\";");
    assert_eq!(lines[2], "DROP TABLE IF EXISTS \"items\";");
    assert_eq!(output.matches("DROP ").count(), 2);
    assert!(!output.contains("DROP TABLE IF EXISTS \"sqlite_sequence\""));
}

#[tokio::test]
async fn test_rows_round_trip() {
    let (dir, path) = fixture(&[
        "CREATE TABLE people(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, photo BLOB, score REAL)",
        "CREATE INDEX idx_people_name ON people(name)",
        "INSERT INTO people(name, photo, score) VALUES('Ann', x'00ff', 1.5)",
        "INSERT INTO people(name, photo, score) VALUES('O''Brien', NULL, NULL)",
        "CREATE TABLE \"odd \"\"name\"\"\"(v TEXT)",
        "INSERT INTO \"odd \"\"name\"\"\" VALUES('x')",
    ])
    .await;

    let script = dump_to_string(&path, DumpConfig::new().with_rows()).await;
    assert!(script.contains("INSERT INTO \"people\" VALUES(2,'O''Brien',NULL,NULL);\n"));
    assert!(script.contains("INSERT INTO \"sqlite_sequence\" VALUES('people',2);\n"));

    let target_path = dir.path().join("target.db");
    let target = open_pool(&target_path).await;
    target.execute(script.as_str()).await.unwrap();

    let rows = sqlx::query("SELECT id, name, photo, score FROM people ORDER BY id")
        .fetch_all(&target)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get::<String, _>("name"), "Ann");
    assert_eq!(rows[0].get::<Vec<u8>, _>("photo"), vec![0x00, 0xff]);
    assert_eq!(rows[0].get::<f64, _>("score"), 1.5);
    assert_eq!(rows[1].get::<String, _>("name"), "O'Brien");
    assert_eq!(rows[1].get::<Option<Vec<u8>>, _>("photo"), None);

    let odd: String = sqlx::query_scalar("SELECT v FROM \"odd \"\"name\"\"\"")
        .fetch_one(&target)
        .await
        .unwrap();
    assert_eq!(odd, "x");

    let seq: i64 = sqlx::query_scalar("SELECT seq FROM sqlite_sequence WHERE name = 'people'")
        .fetch_one(&target)
        .await
        .unwrap();
    assert_eq!(seq, 2);
    target.close().await;
}

#[tokio::test]
async fn test_legacy_statistics_table_replays_without_rows() {
    let (dir, path) = fixture(&[
        "CREATE TABLE t(id INTEGER PRIMARY KEY, name TEXT)",
        "INSERT INTO t VALUES(1, 'a')",
        "CREATE TABLE sqlite3_stat1(tbl, idx, stat)",
        "INSERT INTO sqlite3_stat1 VALUES('t', NULL, '1')",
    ])
    .await;

    let script = dump_to_string(&path, DumpConfig::new().with_rows()).await;
    assert!(script.contains("ANALYZE \"sqlite_master\";\n"));
    assert!(!script.contains("INSERT INTO \"sqlite3_stat1\""));
    assert!(script.contains("INSERT INTO \"t\" VALUES(1,'a');\n"));

    let target = open_pool(&dir.path().join("target.db")).await;
    target.execute(script.as_str()).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM t")
        .fetch_one(&target)
        .await
        .unwrap();
    assert_eq!(count, 1);
    target.close().await;
}

#[tokio::test]
async fn test_drop_script_replays_over_existing_database() {
    let (dir, path) = fixture(&[
        "CREATE TABLE t(id INTEGER PRIMARY KEY, name TEXT)",
        "CREATE INDEX idx_t_name ON t(name)",
        "INSERT INTO t VALUES(1, 'a'), (2, 'b')",
    ])
    .await;

    let script = dump_to_string(&path, DumpConfig::new().drop_if_exists().with_rows()).await;

    let target = open_pool(&dir.path().join("target.db")).await;
    target.execute(script.as_str()).await.unwrap();
    target.execute(script.as_str()).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM t")
        .fetch_one(&target)
        .await
        .unwrap();
    assert_eq!(count, 2);
    target.close().await;
}

#[tokio::test]
async fn test_migration_rows_name_columns() {
    let (_dir, path) = fixture(SINGLE_TABLE).await;
    assert_eq!(
        dump_to_string(&path, DumpConfig::new().migration().with_rows()).await,
        "BEGIN TRANSACTION;\nINSERT INTO \"t\"(\"id\",\"name\") VALUES(1,'a');\nCOMMIT;\n"
    );
}

#[tokio::test]
async fn test_dump_from_caller_owned_handle() {
    let (_dir, path) = fixture(SINGLE_TABLE).await;
    let catalog = SqliteCatalog::new(open_pool(&path).await);

    let mut out = Vec::new();
    let summary = dump_from_handle(&catalog, &mut out, DumpConfig::new().with_rows())
        .await
        .unwrap();
    assert_eq!(summary.tables_created, 1);
    assert_eq!(summary.row_statements, 1);

    // The handle stays usable after the dump
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM t")
        .fetch_one(catalog.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
    catalog.close().await;
}
