//! Locale-aware formatting, parsing and localization.
//!
//! The `number`, `datetime` and `locale` attribute types delegate to a
//! [`Locale`] collaborator. [`LocaleCatalog`] is the bundled implementation,
//! driven by serde-loaded [`Culture`] definitions.
//!
//! # Key Types
//!
//! - [`Locale`] - The collaborator contract used by the type handlers
//! - [`LocaleCatalog`] - Culture registry with embedded `en-US`, `de-DE` and `fr-FR`
//! - [`Culture`] - Number conventions, calendar patterns and message table
//!
//! # Examples
//!
//! ```rust
//! use model_schema::locale::{Locale, LocaleCatalog};
//! use model_schema::Value;
//!
//! let catalog = LocaleCatalog::default();
//! assert_eq!(catalog.format(&Value::from(1234.5), "n2", Some("de-DE")), "1.234,50");
//! assert_eq!(catalog.parse_float("1.234,5", Some("de-DE")), Some(1234.5));
//! ```

pub mod catalog;
pub mod embedded;
pub mod format;

pub use catalog::LocaleCatalog;

use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale collaborator used by the built-in type handlers.
///
/// Every operation is fail-soft: failures are reported as `None`, never as errors.
pub trait Locale {
    /// Render a number or date with a named or custom format.
    fn format(&self, value: &Value, format: &str, culture: Option<&str>) -> String;

    /// Parse culture-formatted numeric text.
    fn parse_float(&self, text: &str, culture: Option<&str>) -> Option<f64>;

    /// Parse culture-formatted date text with a named or custom format.
    fn parse_date(&self, text: &str, format: &str, culture: Option<&str>) -> Option<DateTime<Utc>>;

    /// Localized string for a message key.
    fn localize(&self, key: &str, culture: Option<&str>) -> Option<String>;

    /// Best matching culture for the requested name.
    fn find_closest_culture(&self, culture: Option<&str>) -> Option<&Culture>;
}

/// A culture definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Culture {
    /// Culture name such as `en-US`
    pub name: String,
    /// Number conventions
    #[serde(default)]
    pub number_format: NumberFormat,
    /// Calendar conventions
    #[serde(default)]
    pub calendar: Calendar,
    /// Message table: key to localized string
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl Culture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Language part of the name (`de` for `de-DE`).
    pub fn language(&self) -> &str {
        self.name.split(['-', '_']).next().unwrap_or_default()
    }
}

/// Number conventions of a culture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormat {
    pub decimal: String,
    pub group: String,
    /// Fraction digits used when a format names none
    pub decimals: usize,
    /// Percent pattern, `n` stands for the number
    pub percent_pattern: String,
    pub percent_symbol: String,
    /// Currency pattern, `n` stands for the number and `$` for the symbol
    pub currency_pattern: String,
    pub currency_symbol: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal: ".".to_string(),
            group: ",".to_string(),
            decimals: 2,
            percent_pattern: "n %".to_string(),
            percent_symbol: "%".to_string(),
            currency_pattern: "$n".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// Calendar conventions of a culture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calendar {
    /// Standard format letters (`d`, `D`, `t`, ...) to date patterns
    pub patterns: BTreeMap<String, String>,
}

impl Default for Calendar {
    fn default() -> Self {
        let patterns = [
            ("d", "M/d/yyyy"),
            ("D", "dddd, MMMM dd, yyyy"),
            ("t", "h:mm tt"),
            ("T", "h:mm:ss tt"),
            ("f", "dddd, MMMM dd, yyyy h:mm tt"),
            ("F", "dddd, MMMM dd, yyyy h:mm:ss tt"),
            ("M", "MMMM dd"),
            ("Y", "yyyy MMMM"),
            ("S", "yyyy'-'MM'-'dd'T'HH':'mm':'ss"),
        ];
        Self {
            patterns: patterns
                .into_iter()
                .map(|(name, pattern)| (name.to_string(), pattern.to_string()))
                .collect(),
        }
    }
}
