//! Attribute option types.
//!
//! [`AttributeOptions`] is what callers pass to
//! [`Schema::define`](super::Schema::define). [`AttributeSpec`] is its
//! serde-loadable subset for declarative definitions.

use super::registry::HandlerContext;
use crate::error::SchemaResult;
use crate::host::{CollectionHandle, CollectionType, ModelType};
use crate::value::{Attributes, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Attribute-level read function: `(context, attribute, value) -> value`.
///
/// Used for resolved getters, custom getters and custom toJSON functions.
pub type ReadFn = Rc<dyn Fn(&HandlerContext<'_>, &str, Value) -> Value>;

/// Attribute-level write function: `(context, attribute, value) -> mapping`.
///
/// The result is normally a single-key mapping from the attribute to its
/// resolved value; returning another key remaps the write.
pub type WriteFn = Rc<dyn Fn(&HandlerContext<'_>, &str, Value) -> SchemaResult<Attributes>>;

/// Wrap a closure as a [`ReadFn`].
pub fn read_fn<F>(f: F) -> ReadFn
where
    F: Fn(&HandlerContext<'_>, &str, Value) -> Value + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a [`WriteFn`].
pub fn write_fn<F>(f: F) -> WriteFn
where
    F: Fn(&HandlerContext<'_>, &str, Value) -> SchemaResult<Attributes> + 'static,
{
    Rc::new(f)
}

/// Built-in attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinType {
    String,
    Boolean,
    Number,
    Datetime,
    Locale,
    Model,
    Collection,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 7] = [
        BuiltinType::String,
        BuiltinType::Boolean,
        BuiltinType::Number,
        BuiltinType::Datetime,
        BuiltinType::Locale,
        BuiltinType::Model,
        BuiltinType::Collection,
    ];

    /// Registry key of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinType::String => "string",
            BuiltinType::Boolean => "boolean",
            BuiltinType::Number => "number",
            BuiltinType::Datetime => "datetime",
            BuiltinType::Locale => "locale",
            BuiltinType::Model => "model",
            BuiltinType::Collection => "collection",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a `datetime` setter encodes the parsed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStandard {
    /// ISO-8601 string
    Iso,
    /// Integer epoch milliseconds
    Unix,
}

/// The `array` option: a plain flag, or the element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArraySpec {
    Flag(bool),
    Of(String),
}

/// Serialization policy of an attribute.
#[derive(Clone)]
pub enum ToJsonPolicy {
    /// Drop the attribute from snapshots
    Omit,
    /// Keep the stored value untouched, even if the type has a toJSON
    Keep,
    /// Serialize through the attribute's resolved getter
    Getter,
    /// Serialize through a custom function, applied per element for arrays
    Custom(ReadFn),
}

impl fmt::Debug for ToJsonPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToJsonPolicy::Omit => f.write_str("Omit"),
            ToJsonPolicy::Keep => f.write_str("Keep"),
            ToJsonPolicy::Getter => f.write_str("Getter"),
            ToJsonPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options of one attribute definition.
///
/// Built with the `of_type` / `array_of` / `model` / `collection`
/// constructors and the `with_*` methods, or loaded from an [`AttributeSpec`].
#[derive(Clone, Default)]
pub struct AttributeOptions {
    /// Explicit type name
    pub type_name: Option<String>,
    /// Array flag or element type
    pub array: Option<ArraySpec>,
    /// Constructor of nested model instances
    pub model: Option<ModelType>,
    /// Constructor of nested collection instances
    pub collection: Option<CollectionType>,
    /// Replaces the resolved getter
    pub getter: Option<ReadFn>,
    /// Replaces the resolved setter
    pub setter: Option<WriteFn>,
    /// Serialization policy; `None` uses the type's own toJSON, if any
    pub to_json: Option<ToJsonPolicy>,
    pub culture: Option<String>,
    pub format: Option<String>,
    pub standard: Option<DateStandard>,
    /// Collection used to resolve and serialize associations by identifier
    pub source: Option<CollectionHandle>,
    /// Clear a held nested model before repopulating it
    pub clear: bool,
    /// Replace a held nested collection instead of merging into it
    pub reset: bool,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a scalar attribute of the given type.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Options for an array attribute whose elements have the given type.
    pub fn array_of(type_name: impl Into<String>) -> Self {
        Self {
            array: Some(ArraySpec::Of(type_name.into())),
            ..Self::default()
        }
    }

    /// Options for a nested model attribute.
    pub fn model(model_type: ModelType) -> Self {
        Self {
            model: Some(model_type),
            ..Self::default()
        }
    }

    /// Options for a nested collection attribute.
    pub fn collection(collection_type: CollectionType) -> Self {
        Self {
            collection: Some(collection_type),
            ..Self::default()
        }
    }

    /// Options for an association resolved only through `source`.
    pub fn sourced(type_name: BuiltinType, source: CollectionHandle) -> Self {
        Self {
            type_name: Some(type_name.as_str().to_string()),
            source: Some(source),
            ..Self::default()
        }
    }

    /// Mark the attribute as an array of its type.
    pub fn array(mut self) -> Self {
        self.array = Some(ArraySpec::Flag(true));
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_standard(mut self, standard: DateStandard) -> Self {
        self.standard = Some(standard);
        self
    }

    pub fn with_source(mut self, source: CollectionHandle) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn with_to_json(mut self, policy: ToJsonPolicy) -> Self {
        self.to_json = Some(policy);
        self
    }

    /// Custom read. `ctx.get` reads siblings through their getters,
    /// `ctx.host()` reads stored values.
    pub fn with_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&HandlerContext<'_>, &str, Value) -> Value + 'static,
    {
        self.getter = Some(read_fn(getter));
        self
    }

    /// Custom write returning the attributes to store in one combined write.
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&HandlerContext<'_>, &str, Value) -> SchemaResult<Attributes> + 'static,
    {
        self.setter = Some(write_fn(setter));
        self
    }

    /// Whether values are processed elementwise.
    pub fn is_array(&self) -> bool {
        match &self.array {
            Some(ArraySpec::Flag(flag)) => *flag,
            Some(ArraySpec::Of(_)) => true,
            None => false,
        }
    }

    /// Effective type: explicit type, else the array element type, else
    /// `model` or `collection` when a constructor is given.
    pub fn effective_type(&self) -> Option<String> {
        if let Some(type_name) = &self.type_name {
            return Some(type_name.clone());
        }
        if let Some(ArraySpec::Of(element)) = &self.array {
            return Some(element.clone());
        }
        if self.model.is_some() {
            return Some(BuiltinType::Model.as_str().to_string());
        }
        if self.collection.is_some() {
            return Some(BuiltinType::Collection.as_str().to_string());
        }
        None
    }
}

impl fmt::Debug for AttributeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeOptions")
            .field("type_name", &self.type_name)
            .field("array", &self.array)
            .field("model", &self.model.as_ref().map(ModelType::name))
            .field(
                "collection",
                &self.collection.as_ref().map(CollectionType::name),
            )
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .field("to_json", &self.to_json)
            .field("culture", &self.culture)
            .field("format", &self.format)
            .field("standard", &self.standard)
            .field("source", &self.source)
            .field("clear", &self.clear)
            .field("reset", &self.reset)
            .finish()
    }
}

/// `toJSON` as it appears in declarative definitions: `true`, `false` or `"getter"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonPolicySpec {
    Flag(bool),
    Named(String),
}

/// Declarative attribute definition, loaded from JSON.
///
/// Covers the options that need no runtime objects; nested constructors,
/// sources and custom functions are only available through [`AttributeOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeSpec {
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub array: Option<ArraySpec>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub standard: Option<DateStandard>,
    #[serde(rename = "toJSON", default)]
    pub to_json: Option<JsonPolicySpec>,
    #[serde(default)]
    pub clear: bool,
    #[serde(default)]
    pub reset: bool,
}

impl AttributeSpec {
    /// Convert into options, rejecting unknown `toJSON` names.
    pub fn into_options(self, attribute: &str) -> SchemaResult<AttributeOptions> {
        let to_json = match self.to_json {
            None => None,
            Some(JsonPolicySpec::Flag(true)) => Some(ToJsonPolicy::Keep),
            Some(JsonPolicySpec::Flag(false)) => Some(ToJsonPolicy::Omit),
            Some(JsonPolicySpec::Named(name)) if name == "getter" => Some(ToJsonPolicy::Getter),
            Some(JsonPolicySpec::Named(name)) => {
                return Err(crate::error::SchemaError::invalid_definition(
                    attribute,
                    format!("unknown toJSON policy '{}'", name),
                ));
            }
        };

        Ok(AttributeOptions {
            type_name: self.type_name,
            array: self.array,
            culture: self.culture,
            format: self.format,
            standard: self.standard,
            to_json,
            clear: self.clear,
            reset: self.reset,
            ..AttributeOptions::default()
        })
    }
}
