//! Last-write-wins update protocol.
//!
//! An update carries an authoritative timestamp. It replaces the stored row
//! only when that timestamp is strictly after the stored `updated_at`;
//! otherwise it is accepted and discarded, so retried or reordered
//! deliveries are harmless. Equal timestamps are discarded.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, TransactionBehavior};

use crate::codec;
use crate::error::{StorageError, StorageResult};

/// What an update call did. Both variants are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
    /// The row was overwritten and now carries the incoming timestamp.
    Applied,
    /// The incoming timestamp was not newer; nothing was written.
    Discarded,
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Whether an update stamped `incoming` wins over a row stamped `persisted`.
#[must_use]
pub fn should_apply(incoming: DateTime<Utc>, persisted: DateTime<Utc>) -> bool {
    incoming > persisted
}

/// Runs the read-compare-write cycle for one row inside a single
/// `IMMEDIATE` transaction.
///
/// The write lock is taken before the read, so no other connection can
/// commit to the row between the comparison and `write`. A missing row
/// rolls back and reports `NotFound(what)`.
pub(crate) fn apply_if_newer<F>(
    conn: &mut Connection,
    table: &'static str,
    key: &dyn ToSql,
    what: impl FnOnce() -> String,
    incoming: DateTime<Utc>,
    write: F,
) -> StorageResult<UpdateOutcome>
where
    F: FnOnce(&Transaction<'_>) -> StorageResult<()>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let persisted: Option<i64> = tx
        .query_row(
            &format!("SELECT updated_at FROM {table} WHERE id = ?1"),
            [key],
            |row| row.get(0),
        )
        .optional()?;
    let Some(persisted) = persisted else {
        return Err(StorageError::NotFound(what()));
    };

    if !should_apply(incoming, codec::nanos_to_timestamp(persisted)) {
        tx.commit()?;
        return Ok(UpdateOutcome::Discarded);
    }

    write(&tx)?;
    tx.commit()?;
    Ok(UpdateOutcome::Applied)
}
