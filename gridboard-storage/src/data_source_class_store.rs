//! Persistence for data source classes (property schemas).
//!
//! Classes are keyed by their designated id and written with a plain
//! upsert; they are registry data, not subject to last-write-wins.

use chrono::{DateTime, Utc};
use gridboard_types::{DataSourceClass, DataSourceClassId, PropertyDescriptor};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::codec;
use crate::context::CallContext;
use crate::db::Database;
use crate::error::{StorageError, StorageResult};

const SELECT_COLUMNS: &str = "SELECT id, name, property_descriptors FROM data_source_classes";

fn read_class(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_domain((id, name, descriptors): (String, String, String)) -> StorageResult<DataSourceClass> {
    let property_descriptors: Vec<PropertyDescriptor> =
        codec::decode("property_descriptors", &descriptors)?;
    Ok(DataSourceClass {
        id: DataSourceClassId::new(id),
        name,
        property_descriptors,
    })
}

#[derive(Debug, Clone)]
pub struct DataSourceClassStore {
    db: Database,
}

impl DataSourceClassStore {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts the class or replaces the stored one with the same id.
    /// `created_at` is kept from the first insert.
    pub fn put(
        &self,
        ctx: &CallContext,
        class: &DataSourceClass,
        at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let descriptors = codec::encode(&class.property_descriptors)?;
        let at = codec::timestamp_to_nanos(at)?;
        self.db.with_conn(ctx, |conn| {
            conn.execute(
                "INSERT INTO data_source_classes
                 (id, name, property_descriptors, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     property_descriptors = excluded.property_descriptors,
                     updated_at = excluded.updated_at",
                params![class.id.as_str(), class.name, descriptors, at],
            )?;
            Ok(())
        })?;
        debug!(class_id = %class.id, descriptors = class.property_descriptors.len(), "Data source class stored");
        Ok(())
    }

    pub fn get(&self, ctx: &CallContext, id: &DataSourceClassId) -> StorageResult<DataSourceClass> {
        let row = self.db.with_conn(ctx, |conn| {
            Ok(conn
                .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id.as_str()], read_class)
                .optional()?)
        })?;
        into_domain(row.ok_or_else(|| StorageError::NotFound(format!("data source class {id}")))?)
    }

    /// All classes ordered by id.
    pub fn list(&self, ctx: &CallContext) -> StorageResult<Vec<DataSourceClass>> {
        let rows = self.db.with_conn(ctx, |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
            let rows = stmt
                .query_map([], read_class)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(into_domain).collect()
    }

    /// Removes the class. Returns false when no row matched.
    pub fn delete(&self, ctx: &CallContext, id: &DataSourceClassId) -> StorageResult<bool> {
        let removed = self.db.with_conn(ctx, |conn| {
            Ok(conn.execute("DELETE FROM data_source_classes WHERE id = ?1", [id.as_str()])?)
        })?;
        Ok(removed > 0)
    }
}
