//! Scalar types, arrays, defaults and serialization policies.

use crate::assert_snapshot;
use crate::common::builders::SchemaBuilder;
use crate::common::{fixtures, init_logging};
use model_schema::host::SetOptions;
use model_schema::schema::NAN_SENTINEL;
use model_schema::{
    AttributeOptions, Date, DateStandard, HostModel, SchemaError, ToJsonPolicy, TypeHandler,
    TypeRegistry, Value, attributes_from_json,
};
use serde_json::json;

#[test]
fn test_declarative_contact_normalizes_stored_values() {
    init_logging();
    let mut schema = SchemaBuilder::new()
        .kind("Contact")
        .stored(json!({
            "name": 42,
            "active": "yes",
            "score": "7.26",
            "born": "2015-03-01",
            "seen": "2015-03-01T12:00:00Z",
            "status": "status.active",
            "aliases": "solo",
            "notes": "private",
            "extra": true
        }))
        .build();

    schema
        .define_from_json(fixtures::definitions::contact())
        .expect("definitions load");

    assert_eq!(schema.model().get("seen"), Value::from(1_425_211_200_000_i64));
    assert_eq!(schema.get("score"), Value::from("7.3"));
    assert_snapshot!(
        schema,
        json!({
            "name": "42",
            "active": true,
            "score": 7.26,
            "born": "2015-03-01T00:00:00.000Z",
            "seen": "2015-03-01T12:00:00.000Z",
            "status": "status.active",
            "aliases": ["solo"],
            "extra": true
        })
    );
}

#[test]
fn test_misspelled_definition_is_rejected() {
    let mut schema = SchemaBuilder::new().build();
    let error = schema
        .define_from_json(fixtures::definitions::misspelled())
        .unwrap_err();
    assert!(matches!(error, SchemaError::Json(_)));
    assert!(schema.attribute_names().is_empty());
}

#[test]
fn test_boolean_coercion() {
    let mut schema = SchemaBuilder::new()
        .attribute("flag", AttributeOptions::of_type("boolean"))
        .build();

    let cases = [
        (Value::from(""), false),
        (Value::from("false"), true),
        (Value::from(0), false),
        (Value::from(-1), true),
        (Value::from(json!([])), true),
        (Value::from(json!({})), true),
    ];
    for (input, expected) in cases {
        schema
            .set_attribute("flag", input.clone())
            .expect("set succeeds");
        assert_eq!(schema.get("flag"), Value::Bool(expected), "input {:?}", input);
    }
}

#[test]
fn test_number_fallback_chain_ends_in_sentinel() {
    let mut schema = SchemaBuilder::new()
        .attribute("amount", AttributeOptions::of_type("number"))
        .build();

    schema
        .set_attribute("amount", Value::from(" 12 "))
        .expect("set succeeds");
    assert_eq!(schema.get("amount"), Value::from(12));

    schema
        .set_attribute("amount", Value::from("1,500.25"))
        .expect("set succeeds");
    assert_eq!(schema.get("amount"), Value::from(1500.25));

    schema
        .set_attribute("amount", Value::from("twelve"))
        .expect("set succeeds");
    assert_eq!(schema.get("amount"), Value::from(NAN_SENTINEL));
    assert_snapshot!(schema, json!({"amount": "NaN"}));
}

#[test]
fn test_invalid_dates_degrade() {
    let mut schema = SchemaBuilder::new()
        .attribute(
            "iso",
            AttributeOptions::of_type("datetime").with_standard(DateStandard::Iso),
        )
        .attribute("plain", AttributeOptions::of_type("datetime"))
        .build();

    schema
        .set(
            attributes_from_json(json!({"iso": "31/31/2015", "plain": "not a date"})),
            &SetOptions::default(),
        )
        .expect("set succeeds");

    assert_eq!(schema.get("iso"), Value::Date(Date::invalid()));
    assert_snapshot!(schema, json!({"iso": "Invalid Date", "plain": null}));
}

#[test]
fn test_array_attribute_keeps_nulls_and_defaults() {
    let mut schema = SchemaBuilder::new()
        .defaults(json!({"labels": "untitled"}))
        .attribute("labels", AttributeOptions::array_of("string"))
        .build();

    schema
        .set_attribute(
            "labels",
            Value::Array(vec![Value::Null, Value::from(1), Value::Undefined]),
        )
        .expect("set succeeds");
    assert_eq!(
        schema.get("labels"),
        Value::from(json!([null, "1", "untitled"]))
    );

    schema
        .set_attribute("labels", Value::Null)
        .expect("set succeeds");
    assert_eq!(schema.get("labels"), Value::Array(Vec::new()));
}

#[test]
fn test_unset_bypasses_setters() {
    let mut schema = SchemaBuilder::new()
        .stored(json!({"count": 3, "free": "x"}))
        .attribute("count", AttributeOptions::of_type("number"))
        .build();

    schema
        .set(
            attributes_from_json(json!({"count": null, "free": null})),
            &SetOptions::unset(),
        )
        .expect("unset succeeds");
    assert!(schema.attributes().is_empty());
}

#[test]
fn test_custom_type_with_to_json() {
    let mut registry = TypeRegistry::new();
    registry.register(
        "cents",
        TypeHandler::new(
            |_, _, value, _| Value::Number(value.to_number() / 100.0),
            |_, _, value, _| Ok(Value::Number((value.to_number() * 100.0).round())),
        )
        .with_to_json(|_, _, value, _| Value::String(format!("{}c", value))),
    );

    let mut schema = SchemaBuilder::new()
        .registry(registry)
        .attribute("price", AttributeOptions::of_type("cents"))
        .attribute(
            "raw_price",
            AttributeOptions::of_type("cents").with_to_json(ToJsonPolicy::Keep),
        )
        .build();

    schema
        .set(
            attributes_from_json(json!({"price": 2.5, "raw_price": 2.5})),
            &SetOptions::default(),
        )
        .expect("set succeeds");

    assert_eq!(schema.model().get("price"), Value::from(250));
    assert_eq!(schema.get("price"), Value::from(2.5));
    assert_snapshot!(schema, json!({"price": "250c", "raw_price": 250}));
}

#[test]
fn test_schema_registry_can_be_shared() {
    let registry = std::rc::Rc::new(TypeRegistry::new());
    let first = SchemaBuilder::new().build().with_registry(registry.clone());
    let second = SchemaBuilder::new().build().with_registry(registry.clone());

    assert_eq!(std::rc::Rc::strong_count(&registry), 3);
    assert_eq!(first.registry().type_names(), second.registry().type_names());
}
