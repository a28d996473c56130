//! Property-Based Testing for Typed Attributes
//!
//! Generates arbitrary input for the scalar types and checks that setters
//! normalize it the same way regardless of shape, and that getters read back
//! what setters stored.

use crate::common::builders::SchemaBuilder;
use model_schema::host::Model;
use model_schema::{AttributeOptions, DateStandard, HostModel, Schema, Value};
use proptest::prelude::*;

fn typed_schema() -> Schema<Model> {
    SchemaBuilder::new()
        .attribute("text", AttributeOptions::of_type("string"))
        .attribute("flag", AttributeOptions::of_type("boolean"))
        .attribute("amount", AttributeOptions::of_type("number"))
        .attribute(
            "stamp",
            AttributeOptions::of_type("datetime").with_standard(DateStandard::Unix),
        )
        .attribute("counts", AttributeOptions::array_of("number"))
        .build()
}

prop_compose! {
    /// Array elements: numbers, numeric text or nulls
    fn count_strategy()
        (choice in 0..3u8, n in -10_000i32..10_000)
        -> Value {
        match choice {
            0 => Value::from(n),
            1 => Value::from(n.to_string()),
            _ => Value::Null,
        }
    }
}

proptest! {
    #[test]
    fn string_round_trips(text in ".*") {
        let mut schema = typed_schema();
        schema.set_attribute("text", Value::from(text.as_str())).expect("set succeeds");
        prop_assert_eq!(schema.get("text"), Value::from(text));
    }

    #[test]
    fn boolean_is_truthiness_of_text(text in ".{0,8}") {
        let mut schema = typed_schema();
        schema.set_attribute("flag", Value::from(text.as_str())).expect("set succeeds");
        prop_assert_eq!(schema.get("flag"), Value::Bool(!text.is_empty()));
    }

    #[test]
    fn number_and_numeric_text_agree(n in -1.0e12f64..1.0e12) {
        let mut schema = typed_schema();
        schema.set_attribute("amount", Value::from(n)).expect("set succeeds");
        let direct = schema.get("amount");

        schema.set_attribute("amount", Value::from(n.to_string())).expect("set succeeds");
        prop_assert_eq!(schema.get("amount"), direct.clone());
        prop_assert_eq!(direct, Value::from(n));
    }

    #[test]
    fn unix_dates_keep_milliseconds(millis in -10_000_000_000_000i64..10_000_000_000_000) {
        let mut schema = typed_schema();
        schema.set_attribute("stamp", Value::from(millis)).expect("set succeeds");

        prop_assert_eq!(schema.model().get("stamp"), Value::from(millis));
        let read = schema.get("stamp");
        prop_assert_eq!(read.as_date().map(|date| date.millis()), Some(millis as f64));
    }

    #[test]
    fn arrays_keep_length_and_nulls(items in prop::collection::vec(count_strategy(), 0..12)) {
        let mut schema = typed_schema();
        schema.set_attribute("counts", Value::Array(items.clone())).expect("set succeeds");

        let stored = schema.get("counts");
        let stored = stored.as_array().expect("counts is an array");
        prop_assert_eq!(stored.len(), items.len());
        for (input, output) in items.iter().zip(stored) {
            if input.is_null() {
                prop_assert!(output.is_null());
            } else {
                prop_assert_eq!(output.clone(), Value::Number(input.to_number()));
            }
        }
    }

    #[test]
    fn undeclared_attributes_pass_through(n in any::<i32>()) {
        let mut schema = typed_schema();
        schema.set_attribute("free", Value::from(n.to_string())).expect("set succeeds");
        prop_assert_eq!(schema.get("free"), Value::from(n.to_string()));
    }
}
