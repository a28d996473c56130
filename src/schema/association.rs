//! Nested model and collection associations.
//!
//! The `model` and `collection` types reconcile an incoming value against the
//! instance an attribute already holds:
//!
//! - the held instance itself is kept as-is
//! - other instances are reduced to their attributes (or members)
//! - identifiers are resolved against the configured `source` collection
//! - a held instance of the target type is repopulated in place, otherwise a
//!   new one is constructed
//!
//! Which source an instance was resolved through is recorded in an
//! [`AssociationResolver`] side-table, never on the instance. A sourced
//! association serializes as identifiers, an unsourced one as a full snapshot.

use super::registry::{HandlerContext, TypeHandler};
use super::types::{AttributeOptions, BuiltinType};
use crate::error::{SchemaError, SchemaResult};
use crate::host::{
    CollectionHandle, CollectionSetOptions, CollectionType, ModelHandle, ModelType, SetOptions,
};
use crate::value::{Attributes, Value};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;

/// Side-table from nested instance (by client id) to its source collection.
#[derive(Debug, Default)]
pub struct AssociationResolver {
    sources: RefCell<HashMap<String, CollectionHandle>>,
}

impl AssociationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(value: &Value) -> Option<String> {
        match value {
            Value::Model(model) => Some(model.cid()),
            Value::Collection(collection) => Some(collection.cid()),
            _ => None,
        }
    }

    /// Source collection a nested value was resolved through, if any.
    pub fn source_of(&self, value: &Value) -> Option<CollectionHandle> {
        let key = Self::key_of(value)?;
        self.sources.borrow().get(&key).cloned()
    }

    pub fn is_linked(&self, value: &Value) -> bool {
        self.source_of(value).is_some()
    }

    /// Record `source` for `value`, or forget any previous one when `None`.
    pub fn link(&self, value: &Value, source: Option<&CollectionHandle>) {
        let Some(key) = Self::key_of(value) else {
            return;
        };
        let mut sources = self.sources.borrow_mut();
        match source {
            Some(source) => {
                sources.insert(key, source.clone());
            }
            None => {
                sources.remove(&key);
            }
        }
    }

    pub fn unlink(&self, value: &Value) {
        self.link(value, None);
    }

    /// Number of linked instances.
    pub fn len(&self) -> usize {
        self.sources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reconcile `value` into the nested model held by `attribute`.
    pub fn resolve_model(
        &self,
        ctx: &HandlerContext<'_>,
        attribute: &str,
        value: Value,
        options: &AttributeOptions,
    ) -> SchemaResult<ModelHandle> {
        let source = options.source.as_ref();
        let model_type =
            model_type_of(options).ok_or_else(|| SchemaError::MissingConstructor {
                attribute: attribute.to_string(),
                kind: BuiltinType::Model.to_string(),
            })?;

        let held = ctx.host().get(attribute).into_model();
        let incoming = match value {
            Value::Model(model) if held.as_ref().is_some_and(|held| held.ptr_eq(&model)) => {
                Incoming::Instance(model)
            }
            Value::Model(model) => Incoming::Attributes(model.attributes()),
            value => match source {
                Some(source) => match source.get(&value) {
                    Some(found) if model_type.is_type_of(&found) => Incoming::Instance(found),
                    Some(found) => Incoming::Attributes(found.attributes()),
                    None => {
                        warn!(
                            "Attribute '{}': no member '{}' in source collection '{}'",
                            attribute,
                            value,
                            source.kind()
                        );
                        Incoming::Attributes(Attributes::new())
                    }
                },
                None => match value {
                    Value::Object(attributes) => Incoming::Attributes(attributes),
                    other => {
                        warn!(
                            "Attribute '{}': cannot build a '{}' from a {} value",
                            attribute,
                            model_type.name(),
                            other.type_name()
                        );
                        Incoming::Attributes(Attributes::new())
                    }
                },
            },
        };

        let model = match (incoming, held) {
            (Incoming::Instance(model), held) => {
                if let Some(held) = held.filter(|held| !held.ptr_eq(&model)) {
                    self.unlink(&Value::Model(held));
                }
                model
            }
            (Incoming::Attributes(attributes), Some(held)) if model_type.is_type_of(&held) => {
                debug!(
                    "Attribute '{}': repopulating held '{}' (clear: {})",
                    attribute,
                    model_type.name(),
                    options.clear
                );
                if options.clear {
                    held.clear()?;
                }
                held.set(attributes, &SetOptions::default())?;
                held
            }
            (Incoming::Attributes(attributes), held) => {
                if let Some(held) = held {
                    self.unlink(&Value::Model(held));
                }
                debug!(
                    "Attribute '{}': constructing new '{}'",
                    attribute,
                    model_type.name()
                );
                model_type.construct(attributes)?
            }
        };

        self.link(&Value::Model(model.clone()), source);
        Ok(model)
    }

    /// Reconcile `value` into the nested collection held by `attribute`.
    pub fn resolve_collection(
        &self,
        ctx: &HandlerContext<'_>,
        attribute: &str,
        value: Value,
        options: &AttributeOptions,
    ) -> SchemaResult<CollectionHandle> {
        let source = options.source.as_ref();
        let collection_type =
            collection_type_of(options).ok_or_else(|| SchemaError::MissingConstructor {
                attribute: attribute.to_string(),
                kind: BuiltinType::Collection.to_string(),
            })?;

        let held = ctx.host().get(attribute).into_collection();
        let incoming = match value {
            Value::Collection(collection)
                if held.as_ref().is_some_and(|held| held.ptr_eq(&collection)) =>
            {
                Members::Instance(collection)
            }
            Value::Collection(collection) => {
                Members::Items(collection.models().into_iter().map(Value::Model).collect())
            }
            value => {
                let items = match value {
                    Value::Array(items) => items,
                    Value::Null | Value::Undefined => Vec::new(),
                    single => vec![single],
                };
                match source {
                    Some(source) => {
                        let wanted: Vec<ModelHandle> =
                            items.iter().filter_map(|item| source.get(item)).collect();
                        Members::Items(
                            source
                                .filter(|model| wanted.iter().any(|found| found.ptr_eq(model)))
                                .into_iter()
                                .map(Value::Model)
                                .collect(),
                        )
                    }
                    None => Members::Items(items),
                }
            }
        };

        let collection = match (incoming, held) {
            (Members::Instance(collection), _) => collection,
            (Members::Items(items), Some(held)) if collection_type.is_type_of(&held) => {
                debug!(
                    "Attribute '{}': updating held '{}' (reset: {})",
                    attribute,
                    collection_type.name(),
                    options.reset
                );
                if options.reset {
                    held.reset(items)?;
                } else {
                    held.set(items, &CollectionSetOptions::default())?;
                }
                held
            }
            (Members::Items(items), held) => {
                if let Some(held) = held {
                    self.unlink(&Value::Collection(held));
                }
                debug!(
                    "Attribute '{}': constructing new '{}'",
                    attribute,
                    collection_type.name()
                );
                collection_type.construct(items)?
            }
        };

        self.link(&Value::Collection(collection.clone()), source);
        Ok(collection)
    }

    /// Identifier when sourced, full snapshot otherwise.
    pub fn model_to_json(&self, value: Value) -> Value {
        match value {
            Value::Model(model) => {
                if self.is_linked(&Value::Model(model.clone())) {
                    model.id()
                } else {
                    Value::Object(model.to_json())
                }
            }
            other => other,
        }
    }

    /// Member identifiers in order when sourced, member snapshots otherwise.
    pub fn collection_to_json(&self, value: Value) -> Value {
        match value {
            Value::Collection(collection) => {
                if self.is_linked(&Value::Collection(collection.clone())) {
                    Value::Array(collection.ids())
                } else {
                    Value::Array(collection.to_json())
                }
            }
            other => other,
        }
    }
}

enum Incoming {
    Instance(ModelHandle),
    Attributes(Attributes),
}

enum Members {
    Instance(CollectionHandle),
    Items(Vec<Value>),
}

/// Handler of the `model` type.
pub fn model() -> TypeHandler {
    TypeHandler::new(super::handlers::identity, |ctx, attribute, value, options| {
        ctx.associations()
            .resolve_model(ctx, attribute, value, options)
            .map(Value::Model)
    })
    .with_to_json(|ctx, _, value, _| ctx.associations().model_to_json(value))
}

/// Handler of the `collection` type.
pub fn collection() -> TypeHandler {
    TypeHandler::new(super::handlers::identity, |ctx, attribute, value, options| {
        ctx.associations()
            .resolve_collection(ctx, attribute, value, options)
            .map(Value::Collection)
    })
    .with_to_json(|ctx, _, value, _| ctx.associations().collection_to_json(value))
}

/// Constructor a `model` attribute builds instances with: its own, else the source's member type.
fn model_type_of(options: &AttributeOptions) -> Option<ModelType> {
    options
        .model
        .clone()
        .or_else(|| options.source.as_ref().and_then(CollectionHandle::model_type))
}

/// Constructor a `collection` attribute builds instances with: its own, else the source's.
fn collection_type_of(options: &AttributeOptions) -> Option<CollectionType> {
    options.collection.clone().or_else(|| {
        options
            .source
            .as_ref()
            .and_then(CollectionHandle::collection_type)
    })
}
