//! Integration tests for schema-decorated models.
//!
//! ## Test Organization
//!
//! - `typed_attributes` - Scalar types, arrays, defaults and toJSON policies
//!   through the public [`Schema`](model_schema::Schema) surface
//! - `associations` - Nested models and collections, sources and reconciliation
//! - `localization` - Culture-aware numbers, dates and message keys
//! - `property_tests` - Coercion invariants over generated input
//!
//! ## Test Principles
//!
//! 1. **Decorator only**: tests talk to the schema, and look at the host only
//!    to check what was actually stored
//! 2. **Pass-through**: undeclared attributes must behave exactly as on the host
//! 3. **Fail-soft data**: bad input yields fallback values, never errors

pub mod associations;
pub mod localization;
pub mod property_tests;
pub mod typed_attributes;
