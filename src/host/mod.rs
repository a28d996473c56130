//! Host model and collection contracts.
//!
//! A schema never owns storage. It decorates a host model that exposes
//! primitive get/set/serialize operations, and resolves nested associations
//! against host collections. The traits here are those contracts; [`Model`]
//! and [`Collection`] are in-memory implementations of them.
//!
//! # Architecture
//!
//! The host layer is responsible for:
//! - Storing attribute values and static defaults
//! - Constructor identity (`kind`) for "is an instance of" checks
//! - Ordered membership and identifier lookup for collections
//!
//! The host layer is NOT responsible for:
//! - Type coercion or formatting
//! - Association reconciliation
//! - Serialization policies per attribute
//!
//! # Example Usage
//!
//! ```rust
//! use model_schema::host::{HostModel, Model, ModelType};
//! use model_schema::{Value, attributes_from_json};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let person = ModelType::new("Person").with_defaults(attributes_from_json(json!({"age": 0})));
//! let mut model = Model::new(&person, attributes_from_json(json!({"name": "Ada"})));
//!
//! model.set_attribute("age", Value::from(36))?;
//! assert_eq!(model.get("age"), Value::from(36));
//! assert_eq!(model.default_value("age"), Some(Value::from(0)));
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod model;

pub use collection::{Collection, CollectionHandle, CollectionType};
pub use model::{Model, ModelHandle, ModelType};

use crate::error::SchemaResult;
use crate::value::{Attributes, Value, attributes_to_json};

/// Options for a host model write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Remove the given attributes instead of storing them
    pub unset: bool,
}

impl SetOptions {
    pub fn unset() -> Self {
        Self { unset: true }
    }
}

/// Options for an incremental collection update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSetOptions {
    /// Add items that are not yet members
    pub add: bool,
    /// Merge attributes into members with a matching identifier
    pub merge: bool,
    /// Drop members that are absent from the incoming items
    pub remove: bool,
}

impl Default for CollectionSetOptions {
    fn default() -> Self {
        Self {
            add: true,
            merge: true,
            remove: true,
        }
    }
}

/// Contract of an observable host model.
///
/// Implementations store raw attribute values. [`Schema`](crate::Schema)
/// implements this trait too, so a decorated model can be used anywhere a
/// plain one can, including as a nested association.
pub trait HostModel {
    /// Constructor identity, used for "is an instance of" checks.
    fn kind(&self) -> &str;

    /// Client-side identity, unique per instance.
    fn cid(&self) -> &str;

    /// Name of the attribute holding the identifier.
    fn id_attribute(&self) -> &str {
        "id"
    }

    /// Identifier value, `Undefined` when not yet assigned.
    fn id(&self) -> Value {
        self.raw(self.id_attribute()).unwrap_or(Value::Undefined)
    }

    /// Read an attribute.
    fn get(&self, attribute: &str) -> Value;

    /// Read an attribute straight from storage, bypassing any decoration.
    fn raw(&self, attribute: &str) -> Option<Value>;

    /// Write several attributes in one operation.
    fn set(&mut self, attributes: Attributes, options: &SetOptions) -> SchemaResult<()>;

    /// Write a single attribute.
    fn set_attribute(&mut self, attribute: &str, value: Value) -> SchemaResult<()> {
        let mut attributes = Attributes::new();
        attributes.insert(attribute.to_string(), value);
        self.set(attributes, &SetOptions::default())
    }

    /// Remove every attribute.
    fn clear(&mut self) -> SchemaResult<()>;

    /// Snapshot of raw storage.
    fn attributes(&self) -> Attributes;

    /// Serializable snapshot of the model.
    fn to_json(&self) -> Attributes;

    /// Static default declared for the attribute, if any.
    fn default_value(&self, attribute: &str) -> Option<Value>;

    /// [`to_json`](HostModel::to_json) converted into plain JSON.
    fn to_json_value(&self) -> serde_json::Value {
        attributes_to_json(&self.to_json())
    }
}

/// Contract of an ordered host collection.
pub trait HostCollection {
    /// Constructor of this collection.
    fn collection_type(&self) -> &CollectionType;

    /// Client-side identity, unique per instance.
    fn cid(&self) -> &str;

    /// Ordered members.
    fn models(&self) -> Vec<ModelHandle>;

    /// Incremental update: add, merge and remove per `options`.
    fn set(&mut self, items: Vec<Value>, options: &CollectionSetOptions) -> SchemaResult<()>;

    /// Replace every member.
    fn reset(&mut self, items: Vec<Value>) -> SchemaResult<()>;

    fn kind(&self) -> &str {
        self.collection_type().name()
    }

    fn model_type(&self) -> &ModelType {
        self.collection_type().model_type()
    }

    fn len(&self) -> usize {
        self.models().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a member up by identifier, client id or instance.
    ///
    /// An attribute object is looked up by its identifier attribute.
    /// Identifiers match by string form, so `"7"` finds the member with id `7`.
    fn get(&self, key: &Value) -> Option<ModelHandle> {
        let key = match key {
            Value::Model(other) => {
                return self.models().into_iter().find(|model| other.ptr_eq(model));
            }
            Value::Object(attributes) => attributes
                .get(self.model_type().id_attribute())
                .cloned()
                .unwrap_or_default(),
            key => key.clone(),
        };
        let id_key = key.id_key();
        self.models().into_iter().find(|model| match &key {
            Value::String(cid) if *cid == model.cid() => true,
            _ => id_key.is_some() && model.id().id_key() == id_key,
        })
    }

    /// Members matching `predicate`, in collection order.
    fn filter(&self, predicate: &dyn Fn(&ModelHandle) -> bool) -> Vec<ModelHandle> {
        self.models()
            .into_iter()
            .filter(|model| predicate(model))
            .collect()
    }

    /// Serializable snapshot: one object per member, in order.
    fn to_json(&self) -> Vec<Value> {
        self.models()
            .iter()
            .map(|model| Value::Object(model.to_json()))
            .collect()
    }
}
