//! Test fixtures: declarative definitions, cultures and member data.
//!
//! This module provides the JSON documents the integration suites load, kept
//! in one place so suites agree on the data they assert against.

use serde_json::{Value, json};

/// Declarative attribute definitions.
pub mod definitions {
    /// A contact record exercising every scalar type
    pub fn contact() -> &'static str {
        r#"{
            "name": {"type": "string"},
            "active": {"type": "boolean"},
            "score": {"type": "number", "format": "n1"},
            "born": {"type": "datetime", "standard": "iso"},
            "seen": {"type": "datetime", "standard": "unix", "toJSON": "getter"},
            "status": {"type": "locale"},
            "aliases": {"array": "string"},
            "notes": {"type": "string", "toJSON": false}
        }"#
    }

    /// A definition with a misspelled key
    pub fn misspelled() -> &'static str {
        r#"{"name": {"typ": "string"}}"#
    }
}

/// Culture documents in the shape the locale catalog loads.
pub mod cultures {
    /// Swiss German: apostrophe grouping, point decimal
    pub fn de_ch() -> &'static str {
        r#"{
            "name": "de-CH",
            "numberFormat": {
                "decimal": ".",
                "group": "'",
                "decimals": 2,
                "percentPattern": "n%",
                "percentSymbol": "%",
                "currencyPattern": "$ n",
                "currencySymbol": "CHF"
            },
            "calendar": {
                "patterns": {"d": "dd.MM.yyyy", "t": "HH:mm"}
            },
            "messages": {"status.active": "Aktiv", "status.idle": "Untätig"}
        }"#
    }
}

/// Members of the `People` source collection.
pub fn people_members() -> Value {
    json!([
        {"id": 1, "name": "Ada Lovelace"},
        {"id": 2, "name": "Grace Hopper"},
        {"id": 3, "name": "Linus Torvalds"},
        {"id": 4, "name": "Barbara Liskov"}
    ])
}
