use std::collections::HashSet;

use chrono::Utc;
use gridboard_storage::{CallContext, DataSourceClassStore};
use gridboard_types::{DataSourceClass, DataSourceClassId};
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};
use crate::require;

/// Registry of data source classes.
#[derive(Debug, Clone)]
pub struct DataSourceClassService {
    store: DataSourceClassStore,
}

impl DataSourceClassService {
    #[must_use]
    pub fn new(store: DataSourceClassStore) -> Self {
        Self { store }
    }

    /// Registers `class`, replacing any class with the same id.
    pub fn register(&self, ctx: &CallContext, class: &DataSourceClass) -> ServiceResult<()> {
        require("data source class", "id", class.id.as_str())?;
        require("data source class", "name", &class.name)?;

        let mut keys = HashSet::new();
        for descriptor in &class.property_descriptors {
            require("property descriptor", "key", &descriptor.key)?;
            if !keys.insert(descriptor.key.as_str()) {
                warn!(class_id = %class.id, key = %descriptor.key, "Rejected duplicate property key");
                return Err(ServiceError::BadRequest(format!(
                    "duplicate property key {} in class {}",
                    descriptor.key, class.id
                )));
            }
        }

        self.store.put(ctx, class, Utc::now())?;
        Ok(())
    }

    pub fn get(&self, ctx: &CallContext, id: &DataSourceClassId) -> ServiceResult<DataSourceClass> {
        Ok(self.store.get(ctx, id)?)
    }

    pub fn list(&self, ctx: &CallContext) -> ServiceResult<Vec<DataSourceClass>> {
        Ok(self.store.list(ctx)?)
    }

    pub fn delete(&self, ctx: &CallContext, id: &DataSourceClassId) -> ServiceResult<()> {
        if !self.store.delete(ctx, id)? {
            return Err(ServiceError::NotFound(format!("data source class {id}")));
        }
        Ok(())
    }
}
