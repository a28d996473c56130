//! In-memory host collection, collection constructors and shared handles.

use super::model::next_cid;
use super::{CollectionSetOptions, HostCollection, ModelHandle, ModelType, SetOptions};
use crate::error::{SchemaError, SchemaResult};
use crate::value::{Attributes, Value};
use log::warn;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Constructor of a family of collections, bound to the model type of its members.
#[derive(Debug, Clone)]
pub struct CollectionType {
    name: Rc<str>,
    model_type: ModelType,
}

impl CollectionType {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: Rc::from(name.into()),
            model_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// Construct a new collection from initial items.
    pub fn construct(&self, items: Vec<Value>) -> SchemaResult<CollectionHandle> {
        Ok(CollectionHandle::new(Collection::new(self, items)?))
    }

    /// Whether `collection` was built by a constructor of this type.
    pub fn is_type_of(&self, collection: &CollectionHandle) -> bool {
        collection.kind() == self.name()
    }
}

/// In-memory ordered collection of models.
///
/// Items are model handles (kept as-is) or attribute objects (built through
/// the member model type). Duplicate instances are stored once.
#[derive(Debug, Clone)]
pub struct Collection {
    collection_type: CollectionType,
    cid: String,
    models: Vec<ModelHandle>,
}

impl Collection {
    pub fn new(collection_type: &CollectionType, items: Vec<Value>) -> SchemaResult<Self> {
        let mut collection = Self {
            collection_type: collection_type.clone(),
            cid: next_cid("l"),
            models: Vec::new(),
        };
        collection.reset(items)?;
        Ok(collection)
    }

    /// Member whose identifier equals the given one.
    fn find_by_id(&self, id: &Value) -> Option<ModelHandle> {
        let key = id.id_key()?;
        self.models
            .iter()
            .find(|model| model.id().id_key().as_deref() == Some(key.as_str()))
            .cloned()
    }

    fn contains(models: &[ModelHandle], model: &ModelHandle) -> bool {
        models.iter().any(|candidate| candidate.ptr_eq(model))
    }

    /// Build a member from an item, or skip items that cannot describe one.
    fn build(&self, item: Value) -> SchemaResult<Option<ModelHandle>> {
        match item {
            Value::Model(model) => Ok(Some(model)),
            Value::Object(attributes) => self.model_type().construct(attributes).map(Some),
            Value::Null | Value::Undefined => Ok(None),
            other => {
                warn!(
                    "Ignoring {} item in collection '{}'",
                    other.type_name(),
                    self.kind()
                );
                Ok(None)
            }
        }
    }

    /// Resolve an item against current members, merging when asked.
    fn reconcile(
        &self,
        item: Value,
        options: &CollectionSetOptions,
    ) -> SchemaResult<Option<ModelHandle>> {
        let existing = match &item {
            Value::Model(model) if Self::contains(&self.models, model) => Some(model.clone()),
            Value::Model(model) => self.find_by_id(&model.id()),
            Value::Object(attributes) => attributes
                .get(self.model_type().id_attribute())
                .and_then(|id| self.find_by_id(id)),
            _ => None,
        };

        match existing {
            Some(existing) => {
                if options.merge {
                    let attributes: Option<Attributes> = match item {
                        Value::Model(model) if !model.ptr_eq(&existing) => Some(model.attributes()),
                        Value::Object(attributes) => Some(attributes),
                        _ => None,
                    };
                    if let Some(attributes) = attributes {
                        existing.set(attributes, &SetOptions::default())?;
                    }
                }
                Ok(Some(existing))
            }
            None if options.add => self.build(item),
            None => Ok(None),
        }
    }
}

impl HostCollection for Collection {
    fn collection_type(&self) -> &CollectionType {
        &self.collection_type
    }

    fn cid(&self) -> &str {
        &self.cid
    }

    fn models(&self) -> Vec<ModelHandle> {
        self.models.clone()
    }

    fn len(&self) -> usize {
        self.models.len()
    }

    fn set(&mut self, items: Vec<Value>, options: &CollectionSetOptions) -> SchemaResult<()> {
        let mut incoming = Vec::with_capacity(items.len());
        for item in items {
            if let Some(model) = self.reconcile(item, options)? {
                if !Self::contains(&incoming, &model) {
                    incoming.push(model);
                }
            }
        }

        if options.remove {
            self.models = incoming;
        } else {
            for model in incoming {
                if !Self::contains(&self.models, &model) {
                    self.models.push(model);
                }
            }
        }

        Ok(())
    }

    fn reset(&mut self, items: Vec<Value>) -> SchemaResult<()> {
        let mut models = Vec::with_capacity(items.len());
        for item in items {
            if let Some(model) = self.build(item)? {
                if !Self::contains(&models, &model) {
                    models.push(model);
                }
            }
        }
        self.models = models;
        Ok(())
    }
}

/// Shared, identity-comparable reference to a host collection.
#[derive(Clone)]
pub struct CollectionHandle {
    cid: Rc<str>,
    collection: Rc<RefCell<dyn HostCollection>>,
}

impl CollectionHandle {
    pub fn new<C: HostCollection + 'static>(collection: C) -> Self {
        Self {
            cid: Rc::from(collection.cid()),
            collection: Rc::new(RefCell::new(collection)),
        }
    }

    pub fn ptr_eq(&self, other: &CollectionHandle) -> bool {
        Rc::ptr_eq(&self.collection, &other.collection)
    }

    /// Run `f` against the collection, `None` if it is being written.
    pub fn with<R>(&self, f: impl FnOnce(&(dyn HostCollection + 'static)) -> R) -> Option<R> {
        match self.collection.try_borrow() {
            Ok(collection) => Some(f(&*collection)),
            Err(_) => {
                warn!("Collection '{}' is being modified; read skipped", self.cid);
                None
            }
        }
    }

    /// Run `f` against the collection mutably.
    pub fn with_mut<R>(
        &self,
        f: impl FnOnce(&mut (dyn HostCollection + 'static)) -> SchemaResult<R>,
    ) -> SchemaResult<R> {
        let mut collection = self
            .collection
            .try_borrow_mut()
            .map_err(|_| SchemaError::Reentrant {
                cid: self.cid.to_string(),
            })?;
        f(&mut *collection)
    }

    pub fn kind(&self) -> String {
        self.with(|collection| collection.kind().to_string())
            .unwrap_or_default()
    }

    /// Client id, readable even while the instance is being written.
    pub fn cid(&self) -> String {
        self.cid.to_string()
    }

    /// Constructor of the collection; `None` only while it is being written.
    pub fn collection_type(&self) -> Option<CollectionType> {
        self.with(|collection| collection.collection_type().clone())
    }

    pub fn model_type(&self) -> Option<ModelType> {
        self.with(|collection| collection.model_type().clone())
    }

    pub fn models(&self) -> Vec<ModelHandle> {
        self.with(|collection| collection.models())
            .unwrap_or_default()
    }

    /// Identifiers of the members, in order.
    pub fn ids(&self) -> Vec<Value> {
        self.models().iter().map(ModelHandle::id).collect()
    }

    pub fn len(&self) -> usize {
        self.with(|collection| collection.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<ModelHandle> {
        self.with(|collection| collection.get(key)).flatten()
    }

    pub fn filter(&self, predicate: impl Fn(&ModelHandle) -> bool) -> Vec<ModelHandle> {
        self.with(|collection| collection.filter(&predicate))
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Vec<Value> {
        self.with(|collection| collection.to_json())
            .unwrap_or_default()
    }

    pub fn set(&self, items: Vec<Value>, options: &CollectionSetOptions) -> SchemaResult<()> {
        self.with_mut(|collection| collection.set(items, options))
    }

    pub fn reset(&self, items: Vec<Value>) -> SchemaResult<()> {
        self.with_mut(|collection| collection.reset(items))
    }
}

impl PartialEq for CollectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for CollectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.collection.try_borrow() {
            Ok(collection) => write!(
                f,
                "CollectionHandle({}#{}, {} models)",
                collection.kind(),
                collection.cid(),
                collection.len()
            ),
            Err(_) => write!(f, "CollectionHandle(<borrowed>)"),
        }
    }
}
