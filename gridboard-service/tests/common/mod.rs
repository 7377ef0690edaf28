#![allow(dead_code)]

use chrono::TimeDelta;
use gridboard_service::Services;
use gridboard_storage::{CallContext, Database};
use gridboard_types::{
    Coordination, CreateComponentOptions, CreateDataSourceOptions, DataSourceId, Properties,
    Query, Rect,
};

pub fn ctx() -> CallContext {
    CallContext::background()
}

pub fn services() -> Services {
    Services::new(Database::open_in_memory().unwrap())
}

pub fn secs(n: i64) -> TimeDelta {
    TimeDelta::seconds(n)
}

pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

pub fn component_options(name: &str) -> CreateComponentOptions {
    CreateComponentOptions {
        visualisation_id: "table".into(),
        queries: vec![Query {
            name: "q1".into(),
            data_source_id: Some(DataSourceId::generate(42)),
            properties: props(&[("sql", "select 1")]),
        }],
        name: name.into(),
        coordination: Coordination {
            rect: Rect {
                left: 10,
                top: 20,
                width: 300,
                height: 200,
            },
            z_index: 1,
        },
        properties: props(&[("title", "Revenue")]),
    }
}

pub fn data_source_options(alias: &str) -> CreateDataSourceOptions {
    CreateDataSourceOptions {
        class_id: "postgres".into(),
        name: "Warehouse".into(),
        alias: alias.into(),
        properties: props(&[("host", "db.internal")]),
    }
}
