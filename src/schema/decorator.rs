//! The schema decorator.
//!
//! [`Schema`] wraps one host model and becomes the call surface for
//! schema-aware code. Reads, writes and snapshots go through the attribute
//! definitions; attributes without a definition behave exactly as on the host.

use super::association::AssociationResolver;
use super::definition::AttributeDefinition;
use super::registry::{HandlerContext, TypeRegistry};
use super::types::{AttributeOptions, AttributeSpec};
use crate::error::{SchemaError, SchemaResult};
use crate::host::{CollectionHandle, HostModel, ModelHandle, SetOptions};
use crate::locale::{Locale, LocaleCatalog};
use crate::value::{Attributes, Value};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Typed-attribute decorator bound to one host model.
///
/// # Examples
///
/// ```rust
/// use model_schema::host::{HostModel, Model, ModelType};
/// use model_schema::{AttributeOptions, Schema, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut schema = Schema::new(Model::new(&ModelType::new("Invoice"), Default::default()));
/// schema.define("total", AttributeOptions::of_type("number"))?;
///
/// schema.set_attribute("total", Value::from("41.5"))?;
/// assert_eq!(schema.get("total"), Value::from(41.5));
/// # Ok(())
/// # }
/// ```
pub struct Schema<M: HostModel> {
    model: M,
    definitions: BTreeMap<String, AttributeDefinition>,
    registry: Rc<TypeRegistry>,
    locale: Rc<dyn Locale>,
    associations: AssociationResolver,
}

impl<M: HostModel> Schema<M> {
    /// Decorate `model` with the built-in types and the bundled cultures.
    pub fn new(model: M) -> Self {
        Self {
            model,
            definitions: BTreeMap::new(),
            registry: Rc::new(TypeRegistry::new()),
            locale: Rc::new(LocaleCatalog::default()),
            associations: AssociationResolver::new(),
        }
    }

    /// Use `registry` for attributes defined from now on.
    pub fn with_registry(mut self, registry: Rc<TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_locale(mut self, locale: Rc<dyn Locale>) -> Self {
        self.locale = locale;
        self
    }

    /// The undecorated host model.
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn locale(&self) -> &dyn Locale {
        &*self.locale
    }

    pub fn definition(&self, attribute: &str) -> Option<&AttributeDefinition> {
        self.definitions.get(attribute)
    }

    /// Names of defined attributes, sorted.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Define one attribute and normalize its stored value.
    pub fn define(
        &mut self,
        attribute: impl Into<String>,
        options: AttributeOptions,
    ) -> SchemaResult<&mut Self> {
        self.define_many([(attribute.into(), options)])
    }

    /// Define several attributes, then normalize stored values once.
    ///
    /// Nothing is defined if any entry would change the array flag of an
    /// existing definition.
    pub fn define_many<I, K>(&mut self, attributes: I) -> SchemaResult<&mut Self>
    where
        I: IntoIterator<Item = (K, AttributeOptions)>,
        K: Into<String>,
    {
        let mut built = Vec::new();
        for (attribute, options) in attributes {
            let attribute = attribute.into();
            let definition = AttributeDefinition::build(&attribute, options, &self.registry);
            if let Some(existing) = self.definitions.get(&attribute) {
                if existing.is_array() != definition.is_array() {
                    return Err(SchemaError::invalid_definition(
                        attribute,
                        "the array flag of a defined attribute cannot change",
                    ));
                }
            }
            built.push((attribute, definition));
        }

        debug!(
            "Defining {} attribute(s) on {}#{}",
            built.len(),
            self.model.kind(),
            self.model.cid()
        );
        self.definitions.extend(built);
        self.refresh()?;
        Ok(self)
    }

    /// Define attributes from a JSON object of attribute name to [`AttributeSpec`].
    pub fn define_from_json(&mut self, json: &str) -> SchemaResult<&mut Self> {
        let specs: BTreeMap<String, AttributeSpec> = serde_json::from_str(json)?;
        let options = specs
            .into_iter()
            .map(|(attribute, spec)| {
                let options = spec.into_options(&attribute)?;
                Ok((attribute, options))
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        self.define_many(options)
    }

    /// Re-apply every defined attribute's stored value through its setter.
    ///
    /// Values stored before the attributes were defined get normalized. When
    /// no defined attribute has a stored value the host is not written at all.
    pub fn refresh(&mut self) -> SchemaResult<()> {
        let values: Attributes = self
            .definitions
            .keys()
            .filter_map(|attribute| {
                self.model
                    .raw(attribute)
                    .filter(|value| !value.is_undefined())
                    .map(|value| (attribute.clone(), value))
            })
            .collect();

        if values.is_empty() {
            trace!("Nothing to refresh on {}", self.model.cid());
            return Ok(());
        }

        debug!(
            "Refreshing {} stored attribute(s) on {}",
            values.len(),
            self.model.cid()
        );
        self.set(values, &SetOptions::default())
    }

    /// The host's static default for `attribute`, else `Null`.
    pub fn default_value(&self, attribute: &str) -> Value {
        self.model.default_value(attribute).unwrap_or(Value::Null)
    }

    /// Source collection a nested value held by this schema was resolved through.
    pub fn source_of(&self, value: &Value) -> Option<CollectionHandle> {
        self.associations.source_of(value)
    }

    /// Context handed to handlers.
    pub fn context(&self) -> HandlerContext<'_> {
        HandlerContext::new(&self.model, &*self.locale, &self.associations).with_schema(self)
    }
}

impl<M: HostModel + 'static> Schema<M> {
    /// Share the decorated model, e.g. from a [`ModelType`](crate::host::ModelType) factory.
    pub fn into_handle(self) -> ModelHandle {
        ModelHandle::new(self)
    }
}

impl<M: HostModel> HostModel for Schema<M> {
    fn kind(&self) -> &str {
        self.model.kind()
    }

    fn cid(&self) -> &str {
        self.model.cid()
    }

    fn id_attribute(&self) -> &str {
        self.model.id_attribute()
    }

    fn get(&self, attribute: &str) -> Value {
        let value = self.model.get(attribute);
        match self.definitions.get(attribute) {
            Some(definition) => definition.get(&self.context(), value),
            None => value,
        }
    }

    fn raw(&self, attribute: &str) -> Option<Value> {
        self.model.raw(attribute)
    }

    fn set(&mut self, attributes: Attributes, options: &SetOptions) -> SchemaResult<()> {
        if options.unset {
            return self.model.set(attributes, options);
        }

        let mut combined = Attributes::new();
        {
            let ctx = self.context();
            for (attribute, value) in attributes {
                match self.definitions.get(&attribute) {
                    Some(definition) => {
                        trace!("Setting '{}' through its definition", attribute);
                        combined.extend(definition.set(&ctx, value)?);
                    }
                    None => {
                        combined.insert(attribute, value);
                    }
                }
            }
        }

        self.model.set(combined, options)
    }

    fn clear(&mut self) -> SchemaResult<()> {
        self.model.clear()?;
        self.associations = AssociationResolver::new();
        Ok(())
    }

    fn attributes(&self) -> Attributes {
        self.model.attributes()
    }

    fn to_json(&self) -> Attributes {
        let ctx = self.context();
        self.model
            .to_json()
            .into_iter()
            .filter_map(|(attribute, value)| match self.definitions.get(&attribute) {
                Some(definition) => definition
                    .to_json(&ctx, value)
                    .map(|value| (attribute, value)),
                None => Some((attribute, value)),
            })
            .collect()
    }

    fn default_value(&self, attribute: &str) -> Option<Value> {
        self.model.default_value(attribute)
    }
}

impl<M: HostModel> fmt::Debug for Schema<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.model.kind())
            .field("cid", &self.model.cid())
            .field("definitions", &self.definitions)
            .field("linked", &self.associations.len())
            .finish_non_exhaustive()
    }
}
