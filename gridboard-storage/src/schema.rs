//! Table setup. Runs on every open and is safe to repeat.

use rusqlite::Connection;

use crate::error::StorageResult;

/// Version recorded in `PRAGMA user_version` once the tables exist.
pub const SCHEMA_VERSION: i64 = 1;

/// Names of the tables this crate owns.
pub const TABLES: [&str; 3] = ["components", "data_sources", "data_source_classes"];

/// Creates the tables and indexes if they are missing.
pub fn migrate(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS components (
            id INTEGER PRIMARY KEY,
            visualisation_id TEXT NOT NULL,
            query TEXT NOT NULL,
            name TEXT NOT NULL,
            coordination TEXT NOT NULL,
            properties TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_components_visualisation_id
            ON components(visualisation_id);
        CREATE INDEX IF NOT EXISTS idx_components_updated_at
            ON components(updated_at);

        CREATE TABLE IF NOT EXISTS data_sources (
            id INTEGER PRIMARY KEY,
            class_id TEXT NOT NULL,
            name TEXT NOT NULL,
            alias TEXT NOT NULL,
            properties TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_data_sources_class_id
            ON data_sources(class_id);
        CREATE INDEX IF NOT EXISTS idx_data_sources_alias
            ON data_sources(alias);
        CREATE INDEX IF NOT EXISTS idx_data_sources_updated_at
            ON data_sources(updated_at);

        CREATE TABLE IF NOT EXISTS data_source_classes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            property_descriptors TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Reads `PRAGMA user_version`; 0 means the tables were never created.
pub fn schema_version(conn: &Connection) -> StorageResult<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Returns true when `table` exists.
pub fn has_table(conn: &Connection, table: &str) -> StorageResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
