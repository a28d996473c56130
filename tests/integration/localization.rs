//! Culture-aware parsing, formatting and message localization.

use crate::assert_snapshot;
use crate::common::builders::SchemaBuilder;
use crate::common::{fixtures, init_logging};
use chrono::{DateTime, Utc};
use model_schema::host::Model;
use model_schema::locale::Culture;
use model_schema::{
    AttributeOptions, DateStandard, HostModel, Locale, LocaleCatalog, Schema, Value,
};
use serde_json::json;

/// Bundled cultures plus Swiss German.
fn swiss_catalog() -> LocaleCatalog {
    let mut catalog = LocaleCatalog::default();
    catalog
        .add_culture_from_str(fixtures::cultures::de_ch())
        .expect("culture parses");
    catalog
}

fn swiss_schema(attributes: Vec<(&str, AttributeOptions)>) -> Schema<Model> {
    let mut builder = SchemaBuilder::new().locale(swiss_catalog());
    for (name, options) in attributes {
        builder = builder.attribute(name, options.with_culture("de-CH"));
    }
    builder.build()
}

#[test]
fn test_number_parses_and_formats_with_culture() {
    init_logging();
    let mut schema = swiss_schema(vec![(
        "price",
        AttributeOptions::of_type("number").with_format("n2"),
    )]);

    schema
        .set_attribute("price", Value::from("1'234.50"))
        .expect("set succeeds");
    assert_eq!(schema.model().get("price"), Value::from(1234.5));
    assert_eq!(schema.get("price"), Value::from("1'234.50"));
    assert_snapshot!(schema, json!({"price": 1234.5}));

    schema
        .set_attribute("price", Value::from("CHF 12.00"))
        .expect("set succeeds");
    assert_eq!(schema.model().get("price"), Value::from(12));
}

#[test]
fn test_oversized_number_format_reads_clamped() {
    let mut schema = SchemaBuilder::new()
        .attribute(
            "ratio",
            AttributeOptions::of_type("number").with_format("n70000"),
        )
        .build();

    schema
        .set_attribute("ratio", Value::from(0.25))
        .expect("set succeeds");
    assert_eq!(
        schema.get("ratio"),
        Value::from(format!("0.25{}", "0".repeat(18)))
    );
    assert_snapshot!(schema, json!({"ratio": 0.25}));
}

#[test]
fn test_closest_culture_by_language() {
    let mut schema = SchemaBuilder::new()
        .attribute(
            "total",
            AttributeOptions::of_type("number")
                .with_culture("fr-CA")
                .with_format("n1"),
        )
        .build();

    schema
        .set_attribute("total", Value::from("1 234,5"))
        .expect("set succeeds");
    assert_eq!(schema.model().get("total"), Value::from(1234.5));
    assert_eq!(schema.get("total"), Value::from("1 234,5"));
}

#[test]
fn test_datetime_with_culture_pattern() {
    let mut schema = swiss_schema(vec![
        (
            "due",
            AttributeOptions::of_type("datetime")
                .with_format("d")
                .with_standard(DateStandard::Iso),
        ),
        (
            "starts",
            AttributeOptions::of_type("datetime").with_format("t"),
        ),
    ]);

    schema
        .set_attribute("due", Value::from("01.03.2015"))
        .expect("set succeeds");
    assert_eq!(
        schema.model().get("due"),
        Value::from("2015-03-01T00:00:00.000Z")
    );
    assert_eq!(schema.get("due"), Value::from("01.03.2015"));

    // text that does not match the pattern goes through generic conversion
    schema
        .set_attribute("due", Value::from("2015-03-02T00:00:00Z"))
        .expect("set succeeds");
    assert_eq!(schema.get("due"), Value::from("02.03.2015"));

    let instant: DateTime<Utc> = "2015-03-01T09:45:00Z".parse().expect("valid instant");
    schema
        .set_attribute("starts", Value::from(instant))
        .expect("set succeeds");
    assert_eq!(schema.get("starts"), Value::from("09:45"));
    assert_snapshot!(
        schema,
        json!({"due": "2015-03-02T00:00:00.000Z", "starts": "2015-03-01T09:45:00.000Z"})
    );
}

#[test]
fn test_locale_messages_map_both_ways() {
    let mut schema = swiss_schema(vec![("status", AttributeOptions::of_type("locale"))]);

    schema
        .set_attribute("status", Value::from("Aktiv"))
        .expect("set succeeds");
    assert_eq!(schema.model().get("status"), Value::from("status.active"));
    assert_eq!(schema.get("status"), Value::from("Aktiv"));

    schema
        .set_attribute("status", Value::from("status.idle"))
        .expect("set succeeds");
    assert_eq!(schema.get("status"), Value::from("Untätig"));

    schema
        .set_attribute("status", Value::from("archived"))
        .expect("set succeeds");
    assert_eq!(schema.get("status"), Value::from("archived"));
    assert_snapshot!(schema, json!({"status": "archived"}));
}

/// A locale that knows nothing.
struct Silent;

impl Locale for Silent {
    fn format(&self, value: &Value, _: &str, _: Option<&str>) -> String {
        value.to_string()
    }

    fn parse_float(&self, _: &str, _: Option<&str>) -> Option<f64> {
        None
    }

    fn parse_date(&self, _: &str, _: &str, _: Option<&str>) -> Option<DateTime<Utc>> {
        None
    }

    fn localize(&self, _: &str, _: Option<&str>) -> Option<String> {
        None
    }

    fn find_closest_culture(&self, _: Option<&str>) -> Option<&Culture> {
        None
    }
}

#[test]
fn test_custom_locale_collaborator() {
    let mut schema = SchemaBuilder::new()
        .locale(Silent)
        .attribute("amount", AttributeOptions::of_type("number").with_format("n2"))
        .attribute("label", AttributeOptions::of_type("locale"))
        .build();

    schema
        .set_attribute("amount", Value::from("1,5"))
        .expect("set succeeds");
    schema
        .set_attribute("label", Value::from("greeting"))
        .expect("set succeeds");

    assert_eq!(schema.get("amount"), Value::from("NaN"));
    assert_eq!(schema.get("label"), Value::from("greeting"));

    schema
        .set_attribute("amount", Value::from(2.5))
        .expect("set succeeds");
    assert_eq!(schema.get("amount"), Value::from("2.5"));
}
