//! Type registry: attribute type names to handler triples.
//!
//! A [`TypeRegistry`] is an explicit object owned by (or shared between)
//! schemas. It starts with the built-in types and is extended by
//! [`TypeRegistry::register`] during setup; after that it is read-only.

use super::association::AssociationResolver;
use super::types::{AttributeOptions, BuiltinType};
use super::{association, handlers};
use crate::error::SchemaResult;
use crate::host::HostModel;
use crate::locale::Locale;
use crate::value::Value;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Scalar getter of a type: `(context, attribute, value, options) -> value`.
pub type Getter = Rc<dyn Fn(&HandlerContext<'_>, &str, Value, &AttributeOptions) -> Value>;

/// Scalar setter of a type: `(context, attribute, value, options) -> value`.
pub type Setter =
    Rc<dyn Fn(&HandlerContext<'_>, &str, Value, &AttributeOptions) -> SchemaResult<Value>>;

/// Scalar serializer of a type, same shape as a getter.
pub type ToJson = Getter;

/// What a handler sees of the schema it runs in.
///
/// [`get`](Self::get) reads sibling attributes the way callers of the schema
/// see them, through their getters. [`host`](Self::host) reads stored values
/// without decoration, which is what setters compare against.
pub struct HandlerContext<'a> {
    host: &'a dyn HostModel,
    schema: Option<&'a dyn HostModel>,
    locale: &'a dyn Locale,
    associations: &'a AssociationResolver,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        host: &'a dyn HostModel,
        locale: &'a dyn Locale,
        associations: &'a AssociationResolver,
    ) -> Self {
        Self {
            host,
            schema: None,
            locale,
            associations,
        }
    }

    /// Route [`get`](Self::get) through the decorating schema.
    pub fn with_schema(mut self, schema: &'a dyn HostModel) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Read an attribute through its getter, or from the host when the
    /// context has no schema.
    pub fn get(&self, attribute: &str) -> Value {
        self.schema.unwrap_or(self.host).get(attribute)
    }

    /// The host model, read without schema decoration.
    pub fn host(&self) -> &'a dyn HostModel {
        self.host
    }

    pub fn locale(&self) -> &'a dyn Locale {
        self.locale
    }

    pub fn associations(&self) -> &'a AssociationResolver {
        self.associations
    }

    /// The host's static default for `attribute`, else `Null`.
    pub fn default_value(&self, attribute: &str) -> Value {
        self.host.default_value(attribute).unwrap_or(Value::Null)
    }
}

/// A `{getter, setter, toJSON?}` triple implementing one attribute type.
#[derive(Clone)]
pub struct TypeHandler {
    pub getter: Getter,
    pub setter: Setter,
    pub to_json: Option<ToJson>,
}

impl TypeHandler {
    pub fn new<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&HandlerContext<'_>, &str, Value, &AttributeOptions) -> Value + 'static,
        S: Fn(&HandlerContext<'_>, &str, Value, &AttributeOptions) -> SchemaResult<Value> + 'static,
    {
        Self {
            getter: Rc::new(getter),
            setter: Rc::new(setter),
            to_json: None,
        }
    }

    pub fn with_to_json<T>(mut self, to_json: T) -> Self
    where
        T: Fn(&HandlerContext<'_>, &str, Value, &AttributeOptions) -> Value + 'static,
    {
        self.to_json = Some(Rc::new(to_json));
        self
    }
}

impl fmt::Debug for TypeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandler")
            .field("to_json", &self.to_json.is_some())
            .finish_non_exhaustive()
    }
}

/// Mapping from type name to [`TypeHandler`].
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    handlers: HashMap<String, TypeHandler>,
}

impl TypeRegistry {
    /// Create a registry with the built-in types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_types();
        registry
    }

    /// Create a registry with no types at all.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    fn register_builtin_types(&mut self) {
        for builtin in BuiltinType::ALL {
            let handler = match builtin {
                BuiltinType::String => handlers::string(),
                BuiltinType::Boolean => handlers::boolean(),
                BuiltinType::Number => handlers::number(),
                BuiltinType::Datetime => handlers::datetime(),
                BuiltinType::Locale => handlers::locale(),
                BuiltinType::Model => association::model(),
                BuiltinType::Collection => association::collection(),
            };
            self.register(builtin.as_str(), handler);
        }
    }

    /// Register a handler, returning the one it replaces.
    pub fn register(&mut self, name: impl Into<String>, handler: TypeHandler) -> Option<TypeHandler> {
        let name = name.into();
        let previous = self.handlers.insert(name.clone(), handler);
        if previous.is_some() {
            debug!("Replaced handler for type '{}'", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&TypeHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
