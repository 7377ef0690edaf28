mod common;

use common::*;
use gridboard_storage::{Database, DataSourceClassStore};
use gridboard_types::{DataSourceClass, DataSourceClassId, PropertyDescriptor, PropertyType};
use pretty_assertions::assert_eq;

fn store() -> DataSourceClassStore {
    DataSourceClassStore::new(Database::open_in_memory().unwrap())
}

fn postgres() -> DataSourceClass {
    DataSourceClass {
        id: "postgres".into(),
        name: "PostgreSQL".into(),
        property_descriptors: vec![
            PropertyDescriptor {
                key: "host".into(),
                name: "Host".into(),
                property_type: PropertyType::String,
                category: "Connection".into(),
                order: 1,
                is_required: true,
                is_secret: false,
                candidates: vec![],
            },
            PropertyDescriptor {
                key: "sslmode".into(),
                name: "SSL mode".into(),
                property_type: PropertyType::String,
                category: "Security".into(),
                order: 2,
                is_required: false,
                is_secret: false,
                candidates: vec!["disable".into(), "require".into()],
            },
            PropertyDescriptor {
                key: "port".into(),
                name: "Port".into(),
                property_type: PropertyType::Number,
                order: 3,
                ..PropertyDescriptor::default()
            },
        ],
    }
}

#[test]
fn put_then_get_preserves_descriptor_order() {
    let store = store();
    let class = postgres();
    store.put(&ctx(), &class, t0()).unwrap();
    assert_eq!(store.get(&ctx(), &class.id).unwrap(), class);
}

#[test]
fn put_replaces_existing() {
    let store = store();
    let mut class = postgres();
    store.put(&ctx(), &class, t0()).unwrap();

    class.name = "Postgres".into();
    class.property_descriptors.truncate(1);
    store.put(&ctx(), &class, t0() + secs(1)).unwrap();

    let got = store.get(&ctx(), &class.id).unwrap();
    assert_eq!(got.name, "Postgres");
    assert_eq!(got.property_descriptors.len(), 1);
    assert_eq!(store.list(&ctx()).unwrap().len(), 1);
}

#[test]
fn get_missing_is_not_found() {
    let err = store()
        .get(&ctx(), &DataSourceClassId::new("nope"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn list_is_ordered_by_id() {
    let store = store();
    for id in ["sqlite", "mysql", "postgres"] {
        let class = DataSourceClass {
            id: id.into(),
            name: id.to_uppercase(),
            property_descriptors: vec![],
        };
        store.put(&ctx(), &class, t0()).unwrap();
    }
    let ids: Vec<_> = store
        .list(&ctx())
        .unwrap()
        .into_iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(ids, vec!["mysql", "postgres", "sqlite"]);
}

#[test]
fn delete_reports_whether_removed() {
    let store = store();
    let class = postgres();
    store.put(&ctx(), &class, t0()).unwrap();
    assert!(store.delete(&ctx(), &class.id).unwrap());
    assert!(!store.delete(&ctx(), &class.id).unwrap());
}
