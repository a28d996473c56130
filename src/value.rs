//! Dynamic attribute values.
//!
//! Host models store attributes as [`Value`]s. Besides the JSON shapes, a value
//! can carry a date, the "unset" marker and shared references to nested models
//! and collections. The coercion helpers here are the building blocks of the
//! built-in type handlers.

use crate::host::{CollectionHandle, ModelHandle};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered attribute mapping, as stored by host models.
pub type Attributes = BTreeMap<String, Value>;

/// Largest integer that survives the trip through an `f64` unchanged.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Display pattern used for the string form of a date.
const DATE_DISPLAY_PATTERN: &str = "%a %b %d %Y %H:%M:%S GMT+0000";

/// A point in time, or the invalid date produced by unparsable input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(Option<DateTime<Utc>>);

impl Date {
    /// Wrap a valid instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    /// The invalid date.
    pub fn invalid() -> Self {
        Self(None)
    }

    /// Build a date from epoch milliseconds. Non-finite or out-of-range input
    /// yields the invalid date.
    pub fn from_millis(millis: f64) -> Self {
        if !millis.is_finite() {
            return Self::invalid();
        }
        Self(Utc.timestamp_millis_opt(millis.trunc() as i64).single())
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Epoch milliseconds, NaN for the invalid date.
    pub fn millis(&self) -> f64 {
        self.0
            .map(|instant| instant.timestamp_millis() as f64)
            .unwrap_or(f64::NAN)
    }

    /// ISO-8601 with millisecond precision, `None` for the invalid date.
    pub fn to_iso_string(&self) -> Option<String> {
        self.0
            .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(instant) => write!(f, "{}", instant.format(DATE_DISPLAY_PATTERN)),
            None => f.write_str("Invalid Date"),
        }
    }
}

/// A dynamically typed attribute value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value at all; replaced by the attribute default on write
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(Date),
    Array(Vec<Value>),
    Object(Attributes),
    /// Shared reference to a nested model
    Model(ModelHandle),
    /// Shared reference to a nested collection
    Collection(CollectionHandle),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Model(a), Value::Model(b)) => a.ptr_eq(b),
            (Value::Collection(a), Value::Collection(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for both `Null` and `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Attributes> {
        match self {
            Value::Object(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelHandle> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionHandle> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn into_model(self) -> Option<ModelHandle> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<CollectionHandle> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Short name of the value's shape, for log and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Model(_) => "model",
            Value::Collection(_) => "collection",
        }
    }

    /// Boolean conversion: empty, zero, NaN and nullish values are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Date(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Model(_)
            | Value::Collection(_) => true,
        }
    }

    /// Numeric conversion. Returns NaN when the value has no numeric reading.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_numeric_text(s),
            Value::Date(d) => d.millis(),
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [_] => parse_numeric_text(&self.to_string()),
                _ => f64::NAN,
            },
            Value::Object(_) | Value::Model(_) | Value::Collection(_) => f64::NAN,
        }
    }

    /// Generic date conversion.
    ///
    /// Numbers are epoch milliseconds; strings are tried as RFC 3339, RFC 2822,
    /// the display form of a date and a handful of plain calendar layouts
    /// (read as UTC). Anything else is the invalid date.
    pub fn to_date(&self) -> Date {
        match self {
            Value::Date(d) => *d,
            Value::Null => Date::from_millis(0.0),
            Value::Bool(b) => Date::from_millis(f64::from(u8::from(*b))),
            Value::Number(n) => Date::from_millis(*n),
            Value::String(s) => parse_date_text(s).map(Date::new).unwrap_or_default(),
            _ => Date::invalid(),
        }
    }

    /// Lookup key for an identifier: scalars compare by their string form,
    /// so `7` and `"7"` name the same record. Nullish and structured values
    /// have no key.
    pub fn id_key(&self) -> Option<String> {
        match self {
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Date(_) => {
                Some(self.to_string())
            }
            _ => None,
        }
    }

    /// Convert into plain JSON, serializing nested models and collections
    /// through their own `to_json`.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => d
                .to_iso_string()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json_value).collect())
            }
            Value::Object(attributes) => attributes_to_json(attributes),
            Value::Model(model) => attributes_to_json(&model.to_json()),
            Value::Collection(collection) => serde_json::Value::Array(
                collection
                    .to_json()
                    .iter()
                    .map(Value::to_json_value)
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) | Value::Model(_) | Value::Collection(_) => {
                f.write_str("[object Object]")
            }
        }
    }
}

/// Convert an attribute mapping into a JSON object, dropping unset entries.
pub fn attributes_to_json(attributes: &Attributes) -> serde_json::Value {
    serde_json::Value::Object(
        attributes
            .iter()
            .filter(|(_, value)| !value.is_undefined())
            .map(|(key, value)| (key.clone(), value.to_json_value()))
            .collect(),
    )
}

/// Build an attribute mapping from a JSON object. Non-objects yield an empty mapping.
pub fn attributes_from_json(json: serde_json::Value) -> Attributes {
    match Value::from(json) {
        Value::Object(attributes) => attributes,
        _ => Attributes::new(),
    }
}

/// String form of a number: integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        serde_json::Value::Null
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Parse decimal text the lenient way: surrounding whitespace is ignored,
/// empty text is zero, hex/octal/binary prefixes are honored.
fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    let decimal_chars = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    if !text.chars().all(decimal_chars) {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(text) {
        return Some(instant.with_timezone(&Utc));
    }

    const DATE_TIME_LAYOUTS: [&str; 5] = [
        DATE_DISPLAY_PATTERN,
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for layout in DATE_TIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(naive.and_utc());
        }
    }

    const DATE_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    DATE_LAYOUTS.iter().find_map(|layout| {
        NaiveDate::parse_from_str(text, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Value::Date(Date::new(instant))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Attributes> for Value {
    fn from(attributes: Attributes) -> Self {
        Value::Object(attributes)
    }
}

impl From<ModelHandle> for Value {
    fn from(model: ModelHandle) -> Self {
        Value::Model(model)
    }
}

impl From<CollectionHandle> for Value {
    fn from(collection: CollectionHandle) -> Self {
        Value::Collection(collection)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
