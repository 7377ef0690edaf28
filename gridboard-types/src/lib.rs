//! Core type definitions for gridboard.
//!
//! This crate defines the types shared by the storage and service layers:
//! - Generated identifiers (time-sortable `i64` wrapped per entity kind)
//! - Designated identifiers (caller-supplied opaque strings)
//! - A monotonic seed clock for generated identifiers
//! - Domain entities (components, data sources, data source classes) and
//!   the option types used to create and update them
//!
//! Nothing in here touches storage; rows and codecs live in `gridboard-storage`.

mod domain;
mod ids;
mod seed;

pub use domain::{
    ColumnData, Component, Coordination, CreateComponentOptions, CreateDataSourceOptions,
    DataSource, DataSourceClass, Properties, PropertyDescriptor, PropertyType, Query, Rect,
    TableData, UpdateComponentOptions, UpdateDataSourceOptions,
};
pub use ids::{ComponentId, DataSourceClassId, DataSourceId, GeneratedId, VisualisationId};
pub use seed::SeedClock;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
