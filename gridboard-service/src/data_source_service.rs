use std::sync::Arc;

use chrono::{DateTime, Utc};
use gridboard_storage::{CallContext, DataSourceStore, UpdateOutcome};
use gridboard_types::{
    CreateDataSourceOptions, DataSource, DataSourceClassId, DataSourceId, SeedClock,
    UpdateDataSourceOptions,
};

use crate::error::{ServiceError, ServiceResult};
use crate::require;

/// Validates data source input and drives [`DataSourceStore`].
#[derive(Debug, Clone)]
pub struct DataSourceService {
    store: DataSourceStore,
    seeds: Arc<SeedClock>,
}

impl DataSourceService {
    #[must_use]
    pub fn new(store: DataSourceStore) -> Self {
        Self {
            store,
            seeds: Arc::new(SeedClock::new()),
        }
    }

    pub fn create(
        &self,
        ctx: &CallContext,
        options: CreateDataSourceOptions,
    ) -> ServiceResult<DataSource> {
        require("data source", "name", &options.name)?;
        require("data source", "classId", options.class_id.as_str())?;

        let now = Utc::now();
        let id = DataSourceId::generate(self.seeds.next(now));
        let data_source = DataSource::from_create(id, options, now);
        self.store.create(ctx, &data_source)?;
        Ok(data_source)
    }

    pub fn get(&self, ctx: &CallContext, id: DataSourceId) -> ServiceResult<DataSource> {
        Ok(self.store.get(ctx, id)?)
    }

    pub fn list(&self, ctx: &CallContext) -> ServiceResult<Vec<DataSource>> {
        Ok(self.store.list(ctx)?)
    }

    pub fn list_by_class(
        &self,
        ctx: &CallContext,
        class_id: &DataSourceClassId,
    ) -> ServiceResult<Vec<DataSource>> {
        Ok(self.store.list_by_class(ctx, class_id)?)
    }

    /// Last-write-wins replacement; see [`ComponentService::update`](crate::ComponentService::update).
    pub fn update(
        &self,
        ctx: &CallContext,
        id: DataSourceId,
        options: UpdateDataSourceOptions,
        updated_at: DateTime<Utc>,
    ) -> ServiceResult<UpdateOutcome> {
        require("data source", "name", &options.name)?;
        require("data source", "classId", options.class_id.as_str())?;

        let data_source = DataSource::from_update(id, options, updated_at);
        Ok(self.store.update(ctx, &data_source, updated_at)?)
    }

    pub fn delete(&self, ctx: &CallContext, id: DataSourceId) -> ServiceResult<()> {
        if !self.store.delete(ctx, id)? {
            return Err(ServiceError::NotFound(format!("data source {id}")));
        }
        Ok(())
    }
}
