//! Elementwise adaptation of scalar handlers.
//!
//! An [`ArrayAdapter`] runs a scalar getter or setter either once on the whole
//! value or once per element of an ordered sequence, depending on the
//! attribute's array flag. `null` elements never reach a scalar getter; on the
//! write side an unset element is replaced by the attribute default first, and
//! `null` becomes `{}` / `[]` for the association types.

use super::registry::HandlerContext;
use super::types::BuiltinType;
use crate::error::SchemaResult;
use crate::value::{Attributes, Value};

/// What a `null` input becomes before it reaches a scalar setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSubstitute {
    /// Stored as `null`, the setter is skipped
    PassThrough,
    /// An empty attribute mapping, for nested models
    EmptyObject,
    /// An empty sequence, for nested collections
    EmptyArray,
}

impl NullSubstitute {
    pub fn for_type(type_name: Option<&str>) -> Self {
        match type_name {
            Some(name) if name == BuiltinType::Model.as_str() => NullSubstitute::EmptyObject,
            Some(name) if name == BuiltinType::Collection.as_str() => NullSubstitute::EmptyArray,
            _ => NullSubstitute::PassThrough,
        }
    }

    fn substitute(self) -> Option<Value> {
        match self {
            NullSubstitute::PassThrough => None,
            NullSubstitute::EmptyObject => Some(Value::Object(Attributes::new())),
            NullSubstitute::EmptyArray => Some(Value::Array(Vec::new())),
        }
    }
}

/// Array flag plus null policy of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayAdapter {
    array: bool,
    null_substitute: NullSubstitute,
}

impl ArrayAdapter {
    pub fn new(array: bool, type_name: Option<&str>) -> Self {
        Self {
            array,
            null_substitute: NullSubstitute::for_type(type_name),
        }
    }

    pub fn is_array(&self) -> bool {
        self.array
    }

    pub fn null_substitute(&self) -> NullSubstitute {
        self.null_substitute
    }

    /// Apply a read-side function (getter or toJSON).
    ///
    /// Nullish values are returned unchanged. In array mode a non-sequence
    /// value is handed to `scalar` as a whole.
    pub fn read<F>(&self, ctx: &HandlerContext<'_>, attribute: &str, value: Value, scalar: F) -> Value
    where
        F: Fn(&HandlerContext<'_>, &str, Value) -> Value,
    {
        let apply = |value: Value| {
            if value.is_nullish() {
                value
            } else {
                scalar(ctx, attribute, value)
            }
        };

        match value {
            Value::Array(items) if self.array => {
                Value::Array(items.into_iter().map(apply).collect())
            }
            value => apply(value),
        }
    }

    /// Apply a write-side function.
    ///
    /// In array mode the result is always a sequence: a nullish whole value
    /// becomes `[]` and a lone scalar becomes a one-element sequence. Without
    /// `scalar` (unknown type) values are only defaulted.
    pub fn write<F>(
        &self,
        ctx: &HandlerContext<'_>,
        attribute: &str,
        value: Value,
        scalar: Option<F>,
    ) -> SchemaResult<Value>
    where
        F: Fn(&HandlerContext<'_>, &str, Value) -> SchemaResult<Value>,
    {
        let apply = |value: Value| -> SchemaResult<Value> {
            let value = match value {
                Value::Undefined => ctx.default_value(attribute),
                value => value,
            };

            let Some(scalar) = &scalar else {
                return Ok(value);
            };
            match value {
                Value::Null => match self.null_substitute.substitute() {
                    Some(empty) => scalar(ctx, attribute, empty),
                    None => Ok(Value::Null),
                },
                value => scalar(ctx, attribute, value),
            }
        };

        if !self.array {
            return apply(value);
        }

        let items = match value {
            Value::Array(items) => items,
            Value::Undefined | Value::Null => Vec::new(),
            single => vec![single],
        };
        items
            .into_iter()
            .map(apply)
            .collect::<SchemaResult<Vec<_>>>()
            .map(Value::Array)
    }
}
