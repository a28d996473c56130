//! Culture registry implementing the [`Locale`] contract.

use super::{Culture, Locale, embedded, format};
use crate::error::SchemaResult;
use crate::value::Value;
use chrono::{DateTime, Utc};
use log::error;
use std::collections::HashMap;

/// Registry of cultures with closest-match lookup.
///
/// A requested culture resolves to the exact name (case-insensitive), then to
/// the first culture sharing its language, then to the default culture.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    cultures: HashMap<String, Culture>,
    default_culture: String,
}

impl LocaleCatalog {
    /// Create a catalog holding only `default_culture`.
    pub fn new(default_culture: Culture) -> Self {
        let name = default_culture.name.clone();
        let mut cultures = HashMap::new();
        cultures.insert(name.to_ascii_lowercase(), default_culture);
        Self {
            cultures,
            default_culture: name,
        }
    }

    /// Create a catalog with the bundled cultures, `en-US` as default.
    pub fn with_embedded_cultures() -> SchemaResult<Self> {
        let mut cultures = embedded::all().into_iter();
        let default_culture: Culture = match cultures.next() {
            Some(json) => serde_json::from_str(json)?,
            None => Culture::new("en-US"),
        };

        let mut catalog = Self::new(default_culture);
        for json in cultures {
            catalog.add_culture_from_str(json)?;
        }
        Ok(catalog)
    }

    /// Add or replace a culture.
    pub fn add_culture(&mut self, culture: Culture) {
        self.cultures
            .insert(culture.name.to_ascii_lowercase(), culture);
    }

    /// Add or replace a culture from its JSON definition.
    pub fn add_culture_from_str(&mut self, json: &str) -> SchemaResult<()> {
        let culture: Culture = serde_json::from_str(json)?;
        self.add_culture(culture);
        Ok(())
    }

    /// Merge messages into a culture, creating it with default conventions if missing.
    pub fn add_messages<I, K, V>(&mut self, culture: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = self
            .cultures
            .entry(culture.to_ascii_lowercase())
            .or_insert_with(|| Culture::new(culture));
        entry.messages.extend(
            messages
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }

    pub fn set_default_culture(&mut self, name: impl Into<String>) {
        self.default_culture = name.into();
    }

    pub fn default_culture(&self) -> Option<&Culture> {
        self.cultures.get(&self.default_culture.to_ascii_lowercase())
    }

    /// Names of all registered cultures, sorted.
    pub fn culture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .cultures
            .values()
            .map(|culture| culture.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn resolve(&self, culture: Option<&str>) -> Option<&Culture> {
        let Some(requested) = culture.filter(|name| !name.is_empty()) else {
            return self.default_culture();
        };

        let key = requested.to_ascii_lowercase();
        if let Some(found) = self.cultures.get(&key) {
            return Some(found);
        }

        let language = key.split(['-', '_']).next().unwrap_or_default();
        let mut candidates: Vec<&Culture> = self
            .cultures
            .values()
            .filter(|candidate| candidate.language().eq_ignore_ascii_case(language))
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));

        candidates
            .into_iter()
            .next()
            .or_else(|| self.default_culture())
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::with_embedded_cultures().unwrap_or_else(|e| {
            error!("Failed to load embedded cultures: {}", e);
            Self::new(Culture::new("en-US"))
        })
    }
}

impl Locale for LocaleCatalog {
    fn format(&self, value: &Value, format: &str, culture: Option<&str>) -> String {
        let Some(culture) = self.resolve(culture) else {
            return value.to_string();
        };

        match value {
            Value::Number(n) => format::format_number(*n, format, culture),
            Value::Date(date) => match date.instant() {
                Some(instant) => format::format_date(instant, format, culture),
                None => date.to_string(),
            },
            other => other.to_string(),
        }
    }

    fn parse_float(&self, text: &str, culture: Option<&str>) -> Option<f64> {
        format::parse_number(text, self.resolve(culture)?)
    }

    fn parse_date(&self, text: &str, format: &str, culture: Option<&str>) -> Option<DateTime<Utc>> {
        format::parse_date(text, format, self.resolve(culture)?)
    }

    fn localize(&self, key: &str, culture: Option<&str>) -> Option<String> {
        self.resolve(culture)
            .and_then(|culture| culture.messages.get(key))
            .or_else(|| {
                self.default_culture()
                    .and_then(|culture| culture.messages.get(key))
            })
            .cloned()
    }

    fn find_closest_culture(&self, culture: Option<&str>) -> Option<&Culture> {
        self.resolve(culture)
    }
}
