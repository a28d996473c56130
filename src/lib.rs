//! Typed attribute schemas for observable data models.
//!
//! Declares, per attribute, a semantic type (string, boolean, number,
//! datetime, localized string, nested model, nested collection, or an array of
//! any of these) and routes a host model's reads, writes and serialization
//! through it: values are coerced, formatted, parsed and, for nested
//! associations, resolved and linked.
//!
//! # Core Components
//!
//! - [`Schema`] - Decorator bound to one host model
//! - [`TypeRegistry`] - Type name to handler mapping, open for extension
//! - [`host`] - Host model and collection contracts with in-memory implementations
//! - [`locale`] - Number/date formatting, parsing and message localization
//!
//! # Quick Start
//!
//! ```rust
//! use model_schema::host::{CollectionType, HostModel, Model, ModelType};
//! use model_schema::{AttributeOptions, BuiltinType, Schema, Value, attributes_from_json};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let people = CollectionType::new("People", ModelType::new("Person")).construct(vec![
//!     Value::from(json!({"id": 7, "name": "Ada"})),
//! ])?;
//!
//! let task = ModelType::new("Task");
//! let mut schema = Schema::new(Model::new(&task, attributes_from_json(json!({"title": 1}))));
//! schema.define_many([
//!     ("title", AttributeOptions::of_type("string")),
//!     ("assignee", AttributeOptions::sourced(BuiltinType::Model, people)),
//! ])?;
//!
//! schema.set_attribute("assignee", Value::from(7))?;
//!
//! assert_eq!(schema.to_json_value(), json!({"assignee": 7, "title": "1"}));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod host;
pub mod locale;
pub mod schema;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{SchemaError, SchemaResult};
pub use host::{
    CollectionHandle, CollectionType, HostCollection, HostModel, Model, ModelHandle, ModelType,
};
pub use locale::{Locale, LocaleCatalog};
pub use schema::{
    AttributeOptions, AttributeSpec, BuiltinType, DateStandard, HandlerContext, Schema,
    ToJsonPolicy, TypeHandler, TypeRegistry,
};
pub use value::{Attributes, Date, Value, attributes_from_json, attributes_to_json};
