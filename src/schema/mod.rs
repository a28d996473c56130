//! Typed attribute schemas over host models.
//!
//! This module provides the type registry, the attribute definitions built from
//! it and the [`Schema`] decorator that routes a host model's get, set and
//! toJSON through those definitions.
//!
//! # Key Types
//!
//! - [`Schema`] - Decorator bound to one host model
//! - [`TypeRegistry`] - Type name to [`TypeHandler`] mapping
//! - [`AttributeOptions`] - Per-attribute configuration
//! - [`AttributeDefinition`] - Resolved getter, setter and toJSON of one attribute
//! - [`AssociationResolver`] - Nested model and collection reconciliation
//!
//! # Examples
//!
//! ```rust
//! use model_schema::host::{HostModel, Model, ModelType};
//! use model_schema::schema::{AttributeOptions, DateStandard, Schema};
//! use model_schema::{Value, attributes_from_json};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let event = ModelType::new("Event");
//! let mut schema = Schema::new(Model::new(&event, attributes_from_json(json!({"at": 0}))));
//! schema
//!     .define(
//!         "at",
//!         AttributeOptions::of_type("datetime").with_standard(DateStandard::Unix),
//!     )?
//!     .define("tags", AttributeOptions::array_of("string"))?;
//!
//! schema.set_attribute("at", Value::from("2015-03-01T00:00:00Z"))?;
//! schema.set_attribute("tags", Value::from(json!([1, "two"])))?;
//!
//! assert_eq!(
//!     schema.to_json_value(),
//!     json!({"at": 1425168000000_i64, "tags": ["1", "two"]})
//! );
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod association;
pub mod decorator;
pub mod definition;
pub mod handlers;
pub mod registry;
pub mod types;


pub use array::{ArrayAdapter, NullSubstitute};
pub use association::AssociationResolver;
pub use decorator::Schema;
pub use definition::{AttributeDefinition, ResolvedToJson};
pub use handlers::NAN_SENTINEL;
pub use registry::{Getter, HandlerContext, Setter, ToJson, TypeHandler, TypeRegistry};
pub use types::{
    ArraySpec, AttributeOptions, AttributeSpec, BuiltinType, DateStandard, JsonPolicySpec,
    ReadFn, ToJsonPolicy, WriteFn, read_fn, write_fn,
};
