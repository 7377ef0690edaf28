//! Persistence for configured data sources.

use chrono::{DateTime, Utc};
use gridboard_types::{DataSource, DataSourceClassId, DataSourceId, Properties};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use crate::codec;
use crate::context::CallContext;
use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::lww::{self, UpdateOutcome};

const SELECT_COLUMNS: &str =
    "SELECT id, class_id, name, alias, properties, updated_at FROM data_sources";

#[derive(Debug, Clone, PartialEq, Eq)]
struct DataSourceRow {
    id: i64,
    class_id: String,
    name: String,
    alias: String,
    properties: String,
    updated_at: i64,
}

impl DataSourceRow {
    /// Encodes `ds` stamped with `updated_at`; `ds.updated_at` is not read.
    fn from_domain(ds: &DataSource, updated_at: DateTime<Utc>) -> StorageResult<Self> {
        Ok(Self {
            id: ds.id.as_i64(),
            class_id: ds.class_id.as_str().to_owned(),
            name: ds.name.clone(),
            alias: ds.alias.clone(),
            properties: codec::encode(&ds.properties)?,
            updated_at: codec::timestamp_to_nanos(updated_at)?,
        })
    }

    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            class_id: row.get(1)?,
            name: row.get(2)?,
            alias: row.get(3)?,
            properties: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_domain(self) -> StorageResult<DataSource> {
        let properties: Properties = codec::decode("properties", &self.properties)?;
        Ok(DataSource {
            id: DataSourceId::from_i64(self.id),
            class_id: DataSourceClassId::new(self.class_id),
            name: self.name,
            alias: self.alias,
            properties,
            updated_at: codec::nanos_to_timestamp(self.updated_at),
        })
    }
}

/// CRUD plus last-write-wins updates over the `data_sources` table.
#[derive(Debug, Clone)]
pub struct DataSourceStore {
    db: Database,
}

impl DataSourceStore {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, ctx: &CallContext, data_source: &DataSource) -> StorageResult<()> {
        let row = DataSourceRow::from_domain(data_source, data_source.updated_at)?;
        self.db.with_conn(ctx, |conn| {
            conn.execute(
                "INSERT INTO data_sources
                 (id, class_id, name, alias, properties, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    row.id,
                    row.class_id,
                    row.name,
                    row.alias,
                    row.properties,
                    row.updated_at,
                ],
            )
            .map_err(|e| StorageError::on_insert(e, || format!("data source {}", data_source.id)))?;
            Ok(())
        })?;
        debug!(data_source_id = %data_source.id, class_id = %data_source.class_id, "Data source created");
        Ok(())
    }

    pub fn get(&self, ctx: &CallContext, id: DataSourceId) -> StorageResult<DataSource> {
        let row = self.db.with_conn(ctx, |conn| {
            Ok(conn
                .query_row(
                    &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                    [id.as_i64()],
                    DataSourceRow::read,
                )
                .optional()?)
        })?;
        row.ok_or_else(|| StorageError::NotFound(format!("data source {id}")))?
            .into_domain()
    }

    /// All data sources in creation order.
    pub fn list(&self, ctx: &CallContext) -> StorageResult<Vec<DataSource>> {
        let rows = self.db.with_conn(ctx, |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
            let rows = stmt
                .query_map([], DataSourceRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(DataSourceRow::into_domain).collect()
    }

    /// Data sources of one class, in creation order.
    pub fn list_by_class(
        &self,
        ctx: &CallContext,
        class_id: &DataSourceClassId,
    ) -> StorageResult<Vec<DataSource>> {
        let rows = self.db.with_conn(ctx, |conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} WHERE class_id = ?1 ORDER BY id"))?;
            let rows = stmt
                .query_map([class_id.as_str()], DataSourceRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(DataSourceRow::into_domain).collect()
    }

    /// Replaces the stored data source if `updated_at` is strictly after
    /// the stored timestamp. The `updated_at` field inside `data_source` is
    /// ignored.
    pub fn update(
        &self,
        ctx: &CallContext,
        data_source: &DataSource,
        updated_at: DateTime<Utc>,
    ) -> StorageResult<UpdateOutcome> {
        let row = DataSourceRow::from_domain(data_source, updated_at)?;

        let outcome = self.db.with_conn(ctx, |conn| {
            lww::apply_if_newer(
                conn,
                "data_sources",
                &row.id,
                || format!("data source {}", data_source.id),
                updated_at,
                |tx| {
                    tx.execute(
                        "UPDATE data_sources
                         SET class_id = ?2, name = ?3, alias = ?4, properties = ?5, updated_at = ?6
                         WHERE id = ?1",
                        params![
                            row.id,
                            row.class_id,
                            row.name,
                            row.alias,
                            row.properties,
                            row.updated_at,
                        ],
                    )?;
                    Ok(())
                },
            )
        })?;

        match outcome {
            UpdateOutcome::Applied => {
                debug!(data_source_id = %data_source.id, %updated_at, "Data source updated");
            }
            UpdateOutcome::Discarded => {
                info!(data_source_id = %data_source.id, %updated_at, "Discarded stale data source update");
            }
        }
        Ok(outcome)
    }

    /// Removes the row. Returns false when no row matched.
    pub fn delete(&self, ctx: &CallContext, id: DataSourceId) -> StorageResult<bool> {
        let removed = self.db.with_conn(ctx, |conn| {
            Ok(conn.execute("DELETE FROM data_sources WHERE id = ?1", [id.as_i64()])?)
        })?;
        debug!(data_source_id = %id, removed, "Data source delete");
        Ok(removed > 0)
    }
}
