use std::sync::Arc;

use chrono::{DateTime, Utc};
use gridboard_storage::{CallContext, ComponentStore, UpdateOutcome};
use gridboard_types::{
    Component, ComponentId, CreateComponentOptions, SeedClock, UpdateComponentOptions,
};

use crate::error::{ServiceError, ServiceResult};
use crate::require;

/// Validates component input and drives [`ComponentStore`].
#[derive(Debug, Clone)]
pub struct ComponentService {
    store: ComponentStore,
    seeds: Arc<SeedClock>,
}

impl ComponentService {
    #[must_use]
    pub fn new(store: ComponentStore) -> Self {
        Self {
            store,
            seeds: Arc::new(SeedClock::new()),
        }
    }

    /// Creates a component stamped with the current time.
    ///
    /// Only the first query in `options.queries` is kept.
    pub fn create(
        &self,
        ctx: &CallContext,
        options: CreateComponentOptions,
    ) -> ServiceResult<Component> {
        require("component", "name", &options.name)?;
        require("component", "visualisationId", options.visualisation_id.as_str())?;

        let now = Utc::now();
        let id = ComponentId::generate(self.seeds.next(now));
        let component = Component::from_create(id, options, now);
        self.store.create(ctx, &component)?;
        Ok(component)
    }

    pub fn get(&self, ctx: &CallContext, id: ComponentId) -> ServiceResult<Component> {
        Ok(self.store.get(ctx, id)?)
    }

    pub fn list(&self, ctx: &CallContext) -> ServiceResult<Vec<Component>> {
        Ok(self.store.list(ctx)?)
    }

    /// Replaces the component with `options` unless the stored copy is at
    /// least as new as `updated_at`. A stale update is not an error.
    pub fn update(
        &self,
        ctx: &CallContext,
        id: ComponentId,
        options: UpdateComponentOptions,
        updated_at: DateTime<Utc>,
    ) -> ServiceResult<UpdateOutcome> {
        require("component", "name", &options.name)?;
        require("component", "visualisationId", options.visualisation_id.as_str())?;

        let component = Component::from_update(id, options, updated_at);
        Ok(self.store.update(ctx, &component, updated_at)?)
    }

    pub fn delete(&self, ctx: &CallContext, id: ComponentId) -> ServiceResult<()> {
        if !self.store.delete(ctx, id)? {
            return Err(ServiceError::NotFound(format!("component {id}")));
        }
        Ok(())
    }
}
