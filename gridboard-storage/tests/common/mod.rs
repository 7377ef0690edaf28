//! Shared fixtures for storage tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gridboard_storage::{CallContext, Database, StorageConfig};
use gridboard_types::{
    Component, ComponentId, Coordination, DataSource, DataSourceId, Properties, Query, Rect,
};
use rusqlite::types::Value;
use std::path::Path;

pub fn ctx() -> CallContext {
    CallContext::background()
}

/// A fixed reference instant with a non-zero nanosecond part.
pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap()
}

pub fn secs(n: i64) -> Duration {
    Duration::seconds(n)
}

pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn sample_component(seed: i64, name: &str, at: DateTime<Utc>) -> Component {
    Component {
        id: ComponentId::generate(seed),
        visualisation_id: "line-chart".into(),
        query: Query {
            name: "cpu".into(),
            data_source_id: Some(DataSourceId::generate(7)),
            properties: props(&[("sql", "select ts, value from cpu")]),
        },
        name: name.into(),
        coordination: Coordination {
            rect: Rect {
                left: 10,
                top: 20,
                width: 400,
                height: 300,
            },
            z_index: 1,
        },
        properties: props(&[("color", "blue"), ("legend", "bottom")]),
        updated_at: at,
    }
}

pub fn sample_data_source(seed: i64, alias: &str, at: DateTime<Utc>) -> DataSource {
    DataSource {
        id: DataSourceId::generate(seed),
        class_id: "postgres".into(),
        name: "metrics".into(),
        alias: alias.into(),
        properties: props(&[("host", "localhost"), ("port", "5432")]),
        updated_at: at,
    }
}

/// Opens an on-disk database inside `dir`.
pub fn open_file_db(dir: &Path) -> Database {
    Database::open(&StorageConfig::file(dir.join("gridboard.db"))).unwrap()
}

/// Reads every column of one row straight from SQLite, bypassing the stores.
pub fn raw_row(dir: &Path, table: &str, id: i64) -> Vec<Value> {
    let conn = rusqlite::Connection::open(dir.join("gridboard.db")).unwrap();
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table} WHERE id = ?1"))
        .unwrap();
    let columns = stmt.column_count();
    stmt.query_row([id], |row| {
        (0..columns).map(|i| row.get::<_, Value>(i)).collect()
    })
    .unwrap()
}
