//! In-memory host model, model constructors and shared model handles.

use super::{HostModel, SetOptions};
use crate::error::{SchemaError, SchemaResult};
use crate::value::{Attributes, Value};
use log::warn;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type ModelFactory = Rc<dyn Fn(&ModelType, Attributes) -> SchemaResult<ModelHandle>>;

/// Generate a fresh client id.
pub(crate) fn next_cid(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Constructor of a family of models.
///
/// Carries the identity used for instance checks, the identifier attribute,
/// static defaults and an optional factory. The factory lets nested instances
/// be built as anything implementing [`HostModel`], typically a
/// schema-decorated [`Model`].
#[derive(Clone)]
pub struct ModelType {
    name: Rc<str>,
    id_attribute: Rc<str>,
    defaults: Rc<Attributes>,
    factory: Option<ModelFactory>,
}

impl ModelType {
    /// Create a model type with no defaults, identified by `"id"`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Rc::from(name.into()),
            id_attribute: Rc::from("id"),
            defaults: Rc::new(Attributes::new()),
            factory: None,
        }
    }

    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = Rc::from(id_attribute.into());
        self
    }

    pub fn with_defaults(mut self, defaults: Attributes) -> Self {
        self.defaults = Rc::new(defaults);
        self
    }

    /// Build instances through `factory` instead of a plain [`Model`].
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&ModelType, Attributes) -> SchemaResult<ModelHandle> + 'static,
    {
        self.factory = Some(Rc::new(factory));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    /// Construct a new instance from initial attributes.
    pub fn construct(&self, attributes: Attributes) -> SchemaResult<ModelHandle> {
        match &self.factory {
            Some(factory) => factory(self, attributes),
            None => Ok(ModelHandle::new(Model::new(self, attributes))),
        }
    }

    /// Whether `model` was built by a constructor of this type.
    pub fn is_type_of(&self, model: &ModelHandle) -> bool {
        model.kind() == self.name()
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.name)
            .field("id_attribute", &self.id_attribute)
            .field("defaults", &self.defaults)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// In-memory host model.
///
/// Attributes start as the type's defaults overlaid with the initial values.
/// Every write records which attributes it actually changed.
#[derive(Debug, Clone)]
pub struct Model {
    model_type: ModelType,
    cid: String,
    attributes: Attributes,
    changed: Attributes,
}

impl Model {
    pub fn new(model_type: &ModelType, attributes: Attributes) -> Self {
        let mut initial = model_type.defaults().clone();
        initial.extend(
            attributes
                .into_iter()
                .filter(|(_, value)| !value.is_undefined()),
        );

        Self {
            model_type: model_type.clone(),
            cid: next_cid("m"),
            attributes: initial,
            changed: Attributes::new(),
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// Attributes changed by the last write. Removed attributes map to `Undefined`.
    pub fn changed(&self) -> &Attributes {
        &self.changed
    }

    pub fn has_changed(&self, attribute: &str) -> bool {
        self.changed.contains_key(attribute)
    }
}

impl HostModel for Model {
    fn kind(&self) -> &str {
        self.model_type.name()
    }

    fn cid(&self) -> &str {
        &self.cid
    }

    fn id_attribute(&self) -> &str {
        self.model_type.id_attribute()
    }

    fn get(&self, attribute: &str) -> Value {
        self.attributes.get(attribute).cloned().unwrap_or_default()
    }

    fn raw(&self, attribute: &str) -> Option<Value> {
        self.attributes.get(attribute).cloned()
    }

    fn set(&mut self, attributes: Attributes, options: &SetOptions) -> SchemaResult<()> {
        self.changed.clear();

        for (attribute, value) in attributes {
            if options.unset {
                if self.attributes.remove(&attribute).is_some() {
                    self.changed.insert(attribute, Value::Undefined);
                }
            } else if self.attributes.get(&attribute) != Some(&value) {
                self.changed.insert(attribute.clone(), value.clone());
                self.attributes.insert(attribute, value);
            }
        }

        Ok(())
    }

    fn clear(&mut self) -> SchemaResult<()> {
        let keys = self
            .attributes
            .keys()
            .map(|key| (key.clone(), Value::Undefined))
            .collect();
        self.set(keys, &SetOptions::unset())
    }

    fn attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    fn to_json(&self) -> Attributes {
        self.attributes.clone()
    }

    fn default_value(&self, attribute: &str) -> Option<Value> {
        self.model_type.defaults().get(attribute).cloned()
    }
}

/// Shared, identity-comparable reference to a host model.
///
/// Reads that hit an instance which is currently being written degrade to
/// empty results with a warning; writes report [`SchemaError::Reentrant`].
#[derive(Clone)]
pub struct ModelHandle {
    cid: Rc<str>,
    model: Rc<RefCell<dyn HostModel>>,
}

impl ModelHandle {
    pub fn new<M: HostModel + 'static>(model: M) -> Self {
        Self {
            cid: Rc::from(model.cid()),
            model: Rc::new(RefCell::new(model)),
        }
    }

    /// Whether both handles point to the same instance.
    pub fn ptr_eq(&self, other: &ModelHandle) -> bool {
        Rc::ptr_eq(&self.model, &other.model)
    }

    /// Run `f` against the model, `None` if it is being written.
    pub fn with<R>(&self, f: impl FnOnce(&(dyn HostModel + 'static)) -> R) -> Option<R> {
        match self.model.try_borrow() {
            Ok(model) => Some(f(&*model)),
            Err(_) => {
                warn!("Model '{}' is being modified; read skipped", self.cid);
                None
            }
        }
    }

    /// Run `f` against the model mutably.
    pub fn with_mut<R>(
        &self,
        f: impl FnOnce(&mut (dyn HostModel + 'static)) -> SchemaResult<R>,
    ) -> SchemaResult<R> {
        let mut model = self
            .model
            .try_borrow_mut()
            .map_err(|_| SchemaError::Reentrant {
                cid: self.cid.to_string(),
            })?;
        f(&mut *model)
    }

    pub fn kind(&self) -> String {
        self.with(|model| model.kind().to_string())
            .unwrap_or_default()
    }

    /// Client id, readable even while the instance is being written.
    pub fn cid(&self) -> String {
        self.cid.to_string()
    }

    pub fn id(&self) -> Value {
        self.with(|model| model.id()).unwrap_or_default()
    }

    pub fn get(&self, attribute: &str) -> Value {
        self.with(|model| model.get(attribute)).unwrap_or_default()
    }

    pub fn attributes(&self) -> Attributes {
        self.with(|model| model.attributes()).unwrap_or_default()
    }

    pub fn to_json(&self) -> Attributes {
        self.with(|model| model.to_json()).unwrap_or_default()
    }

    pub fn set(&self, attributes: Attributes, options: &SetOptions) -> SchemaResult<()> {
        self.with_mut(|model| model.set(attributes, options))
    }

    pub fn set_attribute(&self, attribute: &str, value: Value) -> SchemaResult<()> {
        self.with_mut(|model| model.set_attribute(attribute, value))
    }

    pub fn clear(&self) -> SchemaResult<()> {
        self.with_mut(|model| model.clear())
    }
}

impl PartialEq for ModelHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.model.try_borrow() {
            Ok(model) => write!(f, "ModelHandle({}#{})", model.kind(), model.cid()),
            Err(_) => write!(f, "ModelHandle(<borrowed>)"),
        }
    }
}
