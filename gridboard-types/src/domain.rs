//! Domain entities and the option types used to create and update them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{ComponentId, DataSourceClassId, DataSourceId, VisualisationId};

/// Provider-specific or display configuration attached to an entity.
///
/// Keys are unique and iteration is ordered, so encoded maps are stable.
pub type Properties = BTreeMap<String, String>;

/// Describes how to fetch tabular data from one data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub name: String,
    pub data_source_id: Option<DataSourceId>,
    #[serde(default)]
    pub properties: Properties,
}

/// A pixel rectangle on the dashboard canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// A component's position, size, and stacking order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordination {
    #[serde(flatten)]
    pub rect: Rect,
    pub z_index: u32,
}

/// A visual widget bound to one query, a layout rectangle, and display
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    pub visualisation_id: VisualisationId,
    pub query: Query,
    pub name: String,
    pub coordination: Coordination,
    #[serde(default)]
    pub properties: Properties,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a component.
///
/// Only the first entry of `queries` is kept on the component; multi-query
/// components are not supported yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateComponentOptions {
    pub visualisation_id: VisualisationId,
    pub queries: Vec<Query>,
    pub name: String,
    pub coordination: Coordination,
    pub properties: Properties,
}

/// Input for replacing a component. Same shape as [`CreateComponentOptions`];
/// omitted fields are reset, not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateComponentOptions {
    pub visualisation_id: VisualisationId,
    pub queries: Vec<Query>,
    pub name: String,
    pub coordination: Coordination,
    pub properties: Properties,
}

impl Component {
    /// Builds a component from creation options. Keeps `queries[0]`.
    #[must_use]
    pub fn from_create(
        id: ComponentId,
        options: CreateComponentOptions,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            visualisation_id: options.visualisation_id,
            query: options.queries.into_iter().next().unwrap_or_default(),
            name: options.name,
            coordination: options.coordination,
            properties: options.properties,
            updated_at,
        }
    }

    /// Builds the full replacement for `id` from update options. Keeps `queries[0]`.
    #[must_use]
    pub fn from_update(
        id: ComponentId,
        options: UpdateComponentOptions,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            visualisation_id: options.visualisation_id,
            query: options.queries.into_iter().next().unwrap_or_default(),
            name: options.name,
            coordination: options.coordination,
            properties: options.properties,
            updated_at,
        }
    }
}

/// A configured connection to a backend system that can answer queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: DataSourceId,
    pub class_id: DataSourceClassId,
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub properties: Properties,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDataSourceOptions {
    pub class_id: DataSourceClassId,
    pub name: String,
    pub alias: String,
    pub properties: Properties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDataSourceOptions {
    pub class_id: DataSourceClassId,
    pub name: String,
    pub alias: String,
    pub properties: Properties,
}

impl DataSource {
    #[must_use]
    pub fn from_create(
        id: DataSourceId,
        options: CreateDataSourceOptions,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            class_id: options.class_id,
            name: options.name,
            alias: options.alias,
            properties: options.properties,
            updated_at,
        }
    }

    #[must_use]
    pub fn from_update(
        id: DataSourceId,
        options: UpdateDataSourceOptions,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            class_id: options.class_id,
            name: options.name,
            alias: options.alias,
            properties: options.properties,
            updated_at,
        }
    }
}

/// The value type of a data source property or a result column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Number,
}

impl PropertyType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

/// Describes one property a data source of some class accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_secret: bool,
    /// When non-empty, the only acceptable values for this property.
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// The property schema for a family of data sources (e.g. `postgres`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceClass {
    pub id: DataSourceClassId,
    pub name: String,
    #[serde(default)]
    pub property_descriptors: Vec<PropertyDescriptor>,
}

/// One column of a query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnData {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: PropertyType,
    pub values: Vec<String>,
}

/// Tabular query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<ColumnData>,
}
