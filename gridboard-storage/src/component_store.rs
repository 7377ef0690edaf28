//! Persistence for dashboard components.

use chrono::{DateTime, Utc};
use gridboard_types::{Component, ComponentId, Coordination, Properties, Query, VisualisationId};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use crate::codec;
use crate::context::CallContext;
use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::lww::{self, UpdateOutcome};

const SELECT_COLUMNS: &str =
    "SELECT id, visualisation_id, query, name, coordination, properties, updated_at FROM components";

/// One `components` row. Structured fields are already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComponentRow {
    id: i64,
    visualisation_id: String,
    query: String,
    name: String,
    coordination: String,
    properties: String,
    updated_at: i64,
}

impl ComponentRow {
    /// Encodes `c` stamped with `updated_at`; `c.updated_at` is not read.
    fn from_domain(c: &Component, updated_at: DateTime<Utc>) -> StorageResult<Self> {
        Ok(Self {
            id: c.id.as_i64(),
            visualisation_id: c.visualisation_id.as_str().to_owned(),
            query: codec::encode(&c.query)?,
            name: c.name.clone(),
            coordination: codec::encode(&c.coordination)?,
            properties: codec::encode(&c.properties)?,
            updated_at: codec::timestamp_to_nanos(updated_at)?,
        })
    }

    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            visualisation_id: row.get(1)?,
            query: row.get(2)?,
            name: row.get(3)?,
            coordination: row.get(4)?,
            properties: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_domain(self) -> StorageResult<Component> {
        let query: Query = codec::decode("query", &self.query)?;
        let coordination: Coordination = codec::decode("coordination", &self.coordination)?;
        let properties: Properties = codec::decode("properties", &self.properties)?;
        Ok(Component {
            id: ComponentId::from_i64(self.id),
            visualisation_id: VisualisationId::new(self.visualisation_id),
            query,
            name: self.name,
            coordination,
            properties,
            updated_at: codec::nanos_to_timestamp(self.updated_at),
        })
    }
}

/// CRUD plus last-write-wins updates over the `components` table.
#[derive(Debug, Clone)]
pub struct ComponentStore {
    db: Database,
}

impl ComponentStore {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a new component. `created_at` is set to its `updated_at`.
    pub fn create(&self, ctx: &CallContext, component: &Component) -> StorageResult<()> {
        let row = ComponentRow::from_domain(component, component.updated_at)?;
        self.db.with_conn(ctx, |conn| {
            conn.execute(
                "INSERT INTO components
                 (id, visualisation_id, query, name, coordination, properties, updated_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    row.id,
                    row.visualisation_id,
                    row.query,
                    row.name,
                    row.coordination,
                    row.properties,
                    row.updated_at,
                ],
            )
            .map_err(|e| StorageError::on_insert(e, || format!("component {}", component.id)))?;
            Ok(())
        })?;
        debug!(component_id = %component.id, "Component created");
        Ok(())
    }

    pub fn get(&self, ctx: &CallContext, id: ComponentId) -> StorageResult<Component> {
        let row = self.db.with_conn(ctx, |conn| {
            Ok(conn
                .query_row(
                    &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                    [id.as_i64()],
                    ComponentRow::read,
                )
                .optional()?)
        })?;
        row.ok_or_else(|| StorageError::NotFound(format!("component {id}")))?
            .into_domain()
    }

    /// All components in creation order.
    pub fn list(&self, ctx: &CallContext) -> StorageResult<Vec<Component>> {
        let rows = self.db.with_conn(ctx, |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
            let rows = stmt
                .query_map([], ComponentRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(ComponentRow::into_domain).collect()
    }

    /// Replaces the stored component if `updated_at` is strictly after the
    /// stored timestamp. The `updated_at` field inside `component` is ignored.
    pub fn update(
        &self,
        ctx: &CallContext,
        component: &Component,
        updated_at: DateTime<Utc>,
    ) -> StorageResult<UpdateOutcome> {
        let row = ComponentRow::from_domain(component, updated_at)?;

        let outcome = self.db.with_conn(ctx, |conn| {
            lww::apply_if_newer(
                conn,
                "components",
                &row.id,
                || format!("component {}", component.id),
                updated_at,
                |tx| {
                    tx.execute(
                        "UPDATE components
                         SET visualisation_id = ?2, query = ?3, name = ?4,
                             coordination = ?5, properties = ?6, updated_at = ?7
                         WHERE id = ?1",
                        params![
                            row.id,
                            row.visualisation_id,
                            row.query,
                            row.name,
                            row.coordination,
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
                debug!(component_id = %component.id, %updated_at, "Component updated");
            }
            UpdateOutcome::Discarded => {
                info!(component_id = %component.id, %updated_at, "Discarded stale component update");
            }
        }
        Ok(outcome)
    }

    /// Removes the row. Returns false when no row matched.
    pub fn delete(&self, ctx: &CallContext, id: ComponentId) -> StorageResult<bool> {
        let removed = self.db.with_conn(ctx, |conn| {
            Ok(conn.execute("DELETE FROM components WHERE id = ?1", [id.as_i64()])?)
        })?;
        debug!(component_id = %id, removed, "Component delete");
        Ok(removed > 0)
    }
}
