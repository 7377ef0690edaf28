//! SQLite storage layer for gridboard.
//!
//! Provides persistent storage for components, data sources, and data
//! source classes using an embedded SQLite database.
//!
//! # Architecture
//!
//! - One [`Database`] handle is shared by every store
//! - Each entity maps to one row; structured fields (queries, coordination,
//!   property maps, descriptors) are stored as JSON text columns
//! - Updates to components and data sources follow the last-write-wins
//!   protocol in [`lww`]: applied only when strictly newer, otherwise
//!   accepted and discarded
//! - Every call takes a [`CallContext`] that can cancel it or bound it with
//!   a deadline
//! - Tables are created on open; setup is idempotent

pub mod codec;
mod component_store;
mod config;
mod context;
mod data_source_class_store;
mod data_source_store;
mod db;
mod error;
pub mod lww;
pub mod schema;

pub use component_store::ComponentStore;
pub use config::{DEFAULT_BUSY_TIMEOUT, StorageConfig};
pub use context::CallContext;
pub use data_source_class_store::DataSourceClassStore;
pub use data_source_store::DataSourceStore;
pub use db::Database;
pub use error::{StorageError, StorageResult};
pub use lww::UpdateOutcome;
