mod common;

use common::*;
use gridboard_service::ServiceError;
use gridboard_types::{DataSourceClass, DataSourceClassId, PropertyDescriptor, PropertyType};
use pretty_assertions::assert_eq;

fn descriptor(key: &str, order: u32) -> PropertyDescriptor {
    PropertyDescriptor {
        key: key.into(),
        name: key.to_uppercase(),
        property_type: PropertyType::String,
        order,
        ..PropertyDescriptor::default()
    }
}

fn class(id: &str) -> DataSourceClass {
    DataSourceClass {
        id: id.into(),
        name: format!("{id} database"),
        property_descriptors: vec![descriptor("host", 1), descriptor("port", 2)],
    }
}

#[test]
fn register_then_get() {
    let s = services();
    s.classes.register(&ctx(), &class("postgres")).unwrap();
    assert_eq!(
        s.classes.get(&ctx(), &DataSourceClassId::new("postgres")).unwrap(),
        class("postgres")
    );
}

#[test]
fn register_twice_replaces() {
    let s = services();
    s.classes.register(&ctx(), &class("postgres")).unwrap();
    let mut renamed = class("postgres");
    renamed.name = "Postgres".into();
    s.classes.register(&ctx(), &renamed).unwrap();

    let all = s.classes.list(&ctx()).unwrap();
    assert_eq!(all, vec![renamed]);
}

#[test]
fn rejects_empty_id_name_or_key() {
    let s = services();

    let mut no_name = class("postgres");
    no_name.name.clear();
    assert!(matches!(s.classes.register(&ctx(), &no_name), Err(ServiceError::BadRequest(_))));

    assert!(matches!(
        s.classes.register(&ctx(), &class("")),
        Err(ServiceError::BadRequest(_))
    ));

    let mut blank_key = class("mysql");
    blank_key.property_descriptors.push(descriptor("", 3));
    assert!(matches!(
        s.classes.register(&ctx(), &blank_key),
        Err(ServiceError::BadRequest(_))
    ));

    assert!(s.classes.list(&ctx()).unwrap().is_empty());
}

#[test]
fn rejects_duplicate_property_keys() {
    let s = services();
    let mut dup = class("postgres");
    dup.property_descriptors.push(descriptor("host", 9));
    let err = s.classes.register(&ctx(), &dup).unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(msg) if msg.contains("host")));
}

#[test]
fn delete_missing_is_not_found() {
    let s = services();
    s.classes.register(&ctx(), &class("sqlite")).unwrap();
    let id = DataSourceClassId::new("sqlite");
    s.classes.delete(&ctx(), &id).unwrap();
    assert!(matches!(s.classes.delete(&ctx(), &id), Err(ServiceError::NotFound(_))));
    assert!(matches!(s.classes.get(&ctx(), &id), Err(ServiceError::NotFound(_))));
}
