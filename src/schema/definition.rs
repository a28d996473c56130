//! Resolved attribute definitions.
//!
//! An [`AttributeDefinition`] is built once per `define` call: it picks the
//! effective type, looks its handler up in the registry, adapts the handler to
//! the array flag and binds it to the attribute's options. What remains are
//! three attribute-level functions the schema calls on every get, set and
//! toJSON.

use super::array::ArrayAdapter;
use super::registry::{Getter, HandlerContext, Setter, TypeRegistry};
use super::types::{AttributeOptions, ReadFn, ToJsonPolicy, WriteFn, read_fn, write_fn};
use crate::error::SchemaResult;
use crate::value::{Attributes, Value};
use log::{trace, warn};
use std::fmt;
use std::rc::Rc;

/// Serialization step of a definition.
#[derive(Clone)]
pub enum ResolvedToJson {
    /// Remove the attribute from the snapshot
    Omit,
    /// Replace the stored value
    Transform(ReadFn),
}

impl fmt::Debug for ResolvedToJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedToJson::Omit => f.write_str("Omit"),
            ResolvedToJson::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// One attribute's resolved getter, setter and toJSON policy.
#[derive(Clone)]
pub struct AttributeDefinition {
    name: String,
    type_name: Option<String>,
    adapter: ArrayAdapter,
    options: Rc<AttributeOptions>,
    getter: ReadFn,
    setter: WriteFn,
    to_json: Option<ResolvedToJson>,
}

impl AttributeDefinition {
    /// Resolve `options` for `name` against `registry`.
    ///
    /// An unknown type leaves the attribute with identity behavior; only
    /// default substitution on write remains.
    pub fn build(name: &str, options: AttributeOptions, registry: &TypeRegistry) -> Self {
        let type_name = options.effective_type();
        let handler = match type_name.as_deref() {
            Some(type_name) => {
                let handler = registry.get(type_name).cloned();
                if handler.is_none() {
                    warn!(
                        "Attribute '{}' uses unregistered type '{}'; values pass through",
                        name, type_name
                    );
                }
                handler
            }
            None => None,
        };

        let adapter = ArrayAdapter::new(options.is_array(), type_name.as_deref());
        let options = Rc::new(options);

        let getter = match &options.getter {
            Some(custom) => custom.clone(),
            None => adapt_getter(adapter, handler.as_ref().map(|h| h.getter.clone()), &options),
        };
        let setter = match &options.setter {
            Some(custom) => custom.clone(),
            None => adapt_setter(adapter, handler.as_ref().map(|h| h.setter.clone()), &options),
        };

        let to_json = match &options.to_json {
            Some(ToJsonPolicy::Omit) => Some(ResolvedToJson::Omit),
            Some(ToJsonPolicy::Keep) => None,
            Some(ToJsonPolicy::Getter) => Some(ResolvedToJson::Transform(getter.clone())),
            Some(ToJsonPolicy::Custom(custom)) => {
                let custom = custom.clone();
                Some(ResolvedToJson::Transform(read_fn(move |ctx, attribute, value| {
                    adapter.read(ctx, attribute, value, |ctx, attribute, value| {
                        custom(ctx, attribute, value)
                    })
                })))
            }
            None => handler
                .as_ref()
                .and_then(|handler| handler.to_json.clone())
                .map(|to_json| {
                    ResolvedToJson::Transform(adapt_getter(adapter, Some(to_json), &options))
                }),
        };

        trace!(
            "Defined attribute '{}' as {:?} (array: {})",
            name,
            type_name,
            adapter.is_array()
        );

        Self {
            name: name.to_string(),
            type_name,
            adapter,
            options,
            getter,
            setter,
            to_json,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective type name, `None` for untyped attributes.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.adapter.is_array()
    }

    pub fn options(&self) -> &AttributeOptions {
        &self.options
    }

    pub fn to_json_policy(&self) -> Option<&ResolvedToJson> {
        self.to_json.as_ref()
    }

    pub fn get(&self, ctx: &HandlerContext<'_>, value: Value) -> Value {
        (self.getter)(ctx, &self.name, value)
    }

    /// Run the setter, yielding the mapping to merge into the host write.
    pub fn set(&self, ctx: &HandlerContext<'_>, value: Value) -> SchemaResult<Attributes> {
        (self.setter)(ctx, &self.name, value)
    }

    /// Serialized value, `None` when the attribute is omitted.
    pub fn to_json(&self, ctx: &HandlerContext<'_>, value: Value) -> Option<Value> {
        match &self.to_json {
            None => Some(value),
            Some(ResolvedToJson::Omit) => None,
            Some(ResolvedToJson::Transform(transform)) => Some(transform(ctx, &self.name, value)),
        }
    }
}

fn adapt_getter(
    adapter: ArrayAdapter,
    getter: Option<Getter>,
    options: &Rc<AttributeOptions>,
) -> ReadFn {
    let options = Rc::clone(options);
    read_fn(move |ctx, attribute, value| match &getter {
        Some(getter) => adapter.read(ctx, attribute, value, |ctx, attribute, value| {
            getter(ctx, attribute, value, &options)
        }),
        None => value,
    })
}

fn adapt_setter(
    adapter: ArrayAdapter,
    setter: Option<Setter>,
    options: &Rc<AttributeOptions>,
) -> WriteFn {
    let options = Rc::clone(options);
    write_fn(move |ctx, attribute, value| {
        let scalar = setter.as_ref().map(|setter| {
            |ctx: &HandlerContext<'_>, attribute: &str, value: Value| {
                setter(ctx, attribute, value, &options)
            }
        });
        let resolved = adapter.write(ctx, attribute, value, scalar)?;

        let mut attributes = Attributes::new();
        attributes.insert(attribute.to_string(), resolved);
        Ok(attributes)
    })
}

impl fmt::Debug for AttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("adapter", &self.adapter)
            .field("options", &self.options)
            .field("to_json", &self.to_json)
            .finish_non_exhaustive()
    }
}
