//! Nested models and collections: sources, reconciliation and serialization.

use crate::assert_snapshot;
use crate::common::builders::{SchemaBuilder, people, people_type, person_type};
use crate::common::{fixtures, init_logging};
use model_schema::host::{CollectionType, Model, ModelType};
use model_schema::{
    AttributeOptions, BuiltinType, DateStandard, HostModel, Schema, SchemaError, Value,
};
use serde_json::json;

#[test]
fn test_sourced_model_switches_members() {
    init_logging();
    let source = people(fixtures::people_members());
    let mut schema = SchemaBuilder::new()
        .attribute(
            "reviewer",
            AttributeOptions::sourced(BuiltinType::Model, source.clone()),
        )
        .build();

    schema
        .set_attribute("reviewer", Value::from(1))
        .expect("set succeeds");
    let ada = schema.get("reviewer");
    assert_eq!(
        ada.as_model().map(|model| model.get("name")),
        Some(Value::from("Ada Lovelace"))
    );

    schema
        .set_attribute("reviewer", Value::from(3))
        .expect("set succeeds");
    let linus = schema.get("reviewer");
    assert_eq!(
        linus.as_model().map(|model| model.get("name")),
        Some(Value::from("Linus Torvalds"))
    );

    // members themselves are untouched, the previous one is no longer linked
    assert_eq!(source.len(), 4);
    assert!(schema.source_of(&ada).is_none());
    assert!(schema.source_of(&linus).is_some());
    assert_snapshot!(schema, json!({"reviewer": 3}));
}

#[test]
fn test_unknown_source_identifier_builds_empty_member() {
    let source = people(fixtures::people_members());
    let mut schema = SchemaBuilder::new()
        .attribute(
            "reviewer",
            AttributeOptions::sourced(BuiltinType::Model, source.clone()),
        )
        .build();

    schema
        .set_attribute("reviewer", Value::from(99))
        .expect("set succeeds");

    let reviewer = schema.get("reviewer");
    let reviewer = reviewer.as_model().expect("reviewer is a model");
    assert_eq!(reviewer.kind(), "Person");
    assert!(reviewer.attributes().is_empty());
    assert!(source.get(&Value::from(99)).is_none());
}

#[test]
fn test_sourced_model_accepts_id_text_and_attributes() {
    let source = people(fixtures::people_members());
    let mut schema = SchemaBuilder::new()
        .stored(json!({"reviewer": {"id": 2, "name": "Grace Hopper"}}))
        .attribute(
            "reviewer",
            AttributeOptions::sourced(BuiltinType::Model, source.clone()),
        )
        .build();

    // stored attributes resolve to the source member with that id
    let grace = schema.get("reviewer");
    let grace = grace.as_model().expect("reviewer is a model");
    assert!(source.get(&Value::from(2)).is_some_and(|m| m.ptr_eq(grace)));
    assert_snapshot!(schema, json!({"reviewer": 2}));

    schema
        .set_attribute("reviewer", Value::from("3"))
        .expect("set succeeds");
    let linus = schema.get("reviewer");
    assert_eq!(
        linus.as_model().map(|model| model.get("name")),
        Some(Value::from("Linus Torvalds"))
    );
    assert_eq!(source.len(), 4);
    assert_snapshot!(schema, json!({"reviewer": 3}));
}

#[test]
fn test_sourced_collection_accepts_id_text_and_attributes() {
    let source = people(fixtures::people_members());
    let mut schema = SchemaBuilder::new()
        .stored(json!({"team": ["3", {"id": 1, "name": "Ada Lovelace"}]}))
        .attribute(
            "team",
            AttributeOptions::sourced(BuiltinType::Collection, source.clone()),
        )
        .build();

    let team = schema.get("team");
    let team = team.as_collection().expect("team is a collection");
    assert_eq!(team.ids(), vec![Value::from(1), Value::from(3)]);
    assert_snapshot!(schema, json!({"team": [1, 3]}));
}

#[test]
fn test_model_clear_versus_merge() {
    let address = ModelType::new("Address");
    let mut schema = SchemaBuilder::new()
        .stored(json!({
            "billing": {"street": "1 Main St", "city": "Springfield"},
            "shipping": {"street": "2 Side St", "city": "Shelbyville"}
        }))
        .attribute("billing", AttributeOptions::model(address.clone()))
        .attribute(
            "shipping",
            AttributeOptions::model(address).with_clear(true),
        )
        .build();

    schema
        .set_attribute("billing", Value::from(json!({"street": "3 High St"})))
        .expect("set succeeds");
    schema
        .set_attribute("shipping", Value::from(json!({"street": "4 Low St"})))
        .expect("set succeeds");

    assert_snapshot!(
        schema,
        json!({
            "billing": {"street": "3 High St", "city": "Springfield"},
            "shipping": {"street": "4 Low St"}
        })
    );
}

#[test]
fn test_instance_of_other_type_is_copied() {
    let mut schema = SchemaBuilder::new()
        .attribute("owner", AttributeOptions::model(person_type()))
        .build();

    let company = ModelType::new("Company")
        .construct(model_schema::attributes_from_json(json!({"name": "Initech"})))
        .expect("model builds");
    schema
        .set_attribute("owner", Value::Model(company.clone()))
        .expect("set succeeds");

    let owner = schema.get("owner");
    let owner = owner.as_model().expect("owner is a model");
    assert!(!owner.ptr_eq(&company));
    assert_eq!(owner.kind(), "Person");
    assert_eq!(owner.get("name"), Value::from("Initech"));
}

#[test]
fn test_array_of_models_substitutes_nulls() {
    let mut schema = SchemaBuilder::new()
        .attribute("contacts", AttributeOptions::model(person_type()).array())
        .build();

    schema
        .set_attribute("contacts", Value::from(json!([{"name": "Ada"}, null])))
        .expect("set succeeds");

    let contacts = schema.get("contacts");
    let contacts = contacts.as_array().expect("contacts is an array");
    assert_eq!(contacts.len(), 2);
    assert!(contacts.iter().all(|contact| contact.as_model().is_some()));
    assert_snapshot!(schema, json!({"contacts": [{"name": "Ada"}, {}]}));
}

#[test]
fn test_collection_merge_versus_reset() {
    let mut schema = SchemaBuilder::new()
        .attribute("merged", AttributeOptions::collection(people_type()))
        .attribute(
            "replaced",
            AttributeOptions::collection(people_type()).with_reset(true),
        )
        .build();

    let first = json!([{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]);
    let second = json!([{"id": 1, "age": 36}]);
    for attribute in ["merged", "replaced"] {
        schema
            .set_attribute(attribute, Value::from(first.clone()))
            .expect("set succeeds");
        schema
            .set_attribute(attribute, Value::from(second.clone()))
            .expect("set succeeds");
    }

    assert_snapshot!(
        schema,
        json!({
            "merged": [{"id": 1, "name": "Ada", "age": 36}],
            "replaced": [{"id": 1, "age": 36}]
        })
    );
}

#[test]
fn test_sourced_collection_keeps_source_order() {
    let source = people(fixtures::people_members());
    let mut schema = SchemaBuilder::new()
        .stored(json!({"team": [4, 2]}))
        .attribute(
            "team",
            AttributeOptions::sourced(BuiltinType::Collection, source.clone()),
        )
        .build();

    let team = schema.get("team");
    let team = team.as_collection().expect("team is a collection");
    assert_eq!(team.ids(), vec![Value::from(2), Value::from(4)]);
    assert!(
        team.models()
            .iter()
            .all(|member| source.get(&member.id()).is_some_and(|m| m.ptr_eq(member)))
    );
    assert_snapshot!(schema, json!({"team": [2, 4]}));

    schema
        .set_attribute("team", Value::Null)
        .expect("set succeeds");
    assert_snapshot!(schema, json!({"team": []}));
}

#[test]
fn test_nested_schemas_normalize_members() {
    let line = ModelType::new("Line").with_factory(|model_type, attributes| {
        let mut line = Schema::new(Model::new(model_type, attributes));
        line.define("qty", AttributeOptions::of_type("number"))?
            .define(
                "shipped",
                AttributeOptions::of_type("datetime").with_standard(DateStandard::Unix),
            )?;
        Ok(line.into_handle())
    });
    let lines = CollectionType::new("Lines", line);

    let mut order = SchemaBuilder::new()
        .kind("Order")
        .attribute("lines", AttributeOptions::collection(lines))
        .build();
    order
        .set_attribute(
            "lines",
            Value::from(json!([
                {"id": "a", "qty": "2", "shipped": "1970-01-01T00:00:01Z"},
                {"id": "b", "qty": "x"}
            ])),
        )
        .expect("set succeeds");

    assert_snapshot!(
        order,
        json!({"lines": [
            {"id": "a", "qty": 2, "shipped": 1000},
            {"id": "b", "qty": "NaN"}
        ]})
    );
}

#[test]
fn test_reentrant_write_is_reported() {
    let handle = SchemaBuilder::new()
        .attribute("count", AttributeOptions::of_type("number"))
        .build()
        .into_handle();

    let inner = handle.clone();
    let result = handle.with_mut(|_| inner.set_attribute("count", Value::from(1)));
    assert!(matches!(result, Err(SchemaError::Reentrant { .. })));

    handle
        .set_attribute("count", Value::from("1"))
        .expect("set succeeds");
    assert_eq!(handle.get("count"), Value::from(1));
}

#[test]
fn test_missing_constructor_reaches_caller() {
    let mut schema = SchemaBuilder::new()
        .attribute("members", AttributeOptions::of_type("collection"))
        .build();
    let result = schema.set_attribute("members", Value::from(json!([1])));
    assert!(matches!(
        result,
        Err(SchemaError::MissingConstructor { ref attribute, .. }) if attribute == "members"
    ));
}
