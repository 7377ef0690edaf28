//! Validation and orchestration over gridboard storage.
//!
//! Services assign ids and creation timestamps, reject malformed input
//! before anything is written, and translate the backend's missing-row
//! signal into [`ServiceError::NotFound`].

mod component_service;
mod data_source_class_service;
mod data_source_service;
mod error;

pub use component_service::ComponentService;
pub use data_source_class_service::DataSourceClassService;
pub use data_source_service::DataSourceService;
pub use error::{ServiceError, ServiceResult};

use gridboard_storage::{
    ComponentStore, DataSourceClassStore, DataSourceStore, Database, StorageConfig,
};
use tracing::warn;

/// All services over one shared database handle.
#[derive(Debug, Clone)]
pub struct Services {
    pub components: ComponentService,
    pub data_sources: DataSourceService,
    pub classes: DataSourceClassService,
}

impl Services {
    /// Opens (and migrates) the database described by `config`.
    pub fn open(config: &StorageConfig) -> ServiceResult<Self> {
        Ok(Self::new(Database::open(config)?))
    }

    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            components: ComponentService::new(ComponentStore::new(db.clone())),
            data_sources: DataSourceService::new(DataSourceStore::new(db.clone())),
            classes: DataSourceClassService::new(DataSourceClassStore::new(db)),
        }
    }
}

/// Rejects an empty required field.
pub(crate) fn require(entity: &str, field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        warn!(entity, field, "Rejected request with empty field");
        return Err(ServiceError::BadRequest(format!("{entity} {field} is required")));
    }
    Ok(())
}
