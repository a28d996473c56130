//! Common test utilities for schema integration testing.
//!
//! This module provides logging setup, builders for decorated models and
//! collections, and JSON fixtures shared by the integration suites.

use model_schema::Value;

pub mod fixtures;

/// Install `env_logger` once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Items of a JSON array, as attribute values.
pub fn items(json: serde_json::Value) -> Vec<Value> {
    match Value::from(json) {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Assert that a schema-produced snapshot equals the expected JSON.
#[macro_export]
macro_rules! assert_snapshot {
    ($model:expr, $expected:expr) => {{
        let actual = model_schema::HostModel::to_json_value(&$model);
        assert_eq!(
            actual, $expected,
            "snapshot mismatch:\n  actual:   {}\n  expected: {}",
            actual, $expected
        );
    }};
}
