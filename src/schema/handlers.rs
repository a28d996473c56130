//! Built-in scalar type handlers: `string`, `boolean`, `number`, `datetime`, `locale`.
//!
//! Handlers never fail on data. Unconvertible input falls back to a best-effort
//! value; the `number` type stores the string `"NaN"` when neither numeric
//! conversion nor locale parsing succeeds.

use super::registry::{HandlerContext, TypeHandler};
use super::types::{AttributeOptions, DateStandard};
use crate::error::SchemaResult;
use crate::value::{Date, Value};
use log::warn;

/// Value stored by the `number` setter for input with no numeric reading.
pub const NAN_SENTINEL: &str = "NaN";

pub(crate) fn identity(
    _: &HandlerContext<'_>,
    _: &str,
    value: Value,
    _: &AttributeOptions,
) -> Value {
    value
}

pub fn string() -> TypeHandler {
    TypeHandler::new(identity, |_, _, value, _| {
        Ok(match value {
            Value::String(_) => value,
            other => Value::String(other.to_string()),
        })
    })
}

pub fn boolean() -> TypeHandler {
    TypeHandler::new(identity, |_, _, value, _| {
        Ok(match value {
            Value::Bool(_) => value,
            other => Value::Bool(other.is_truthy()),
        })
    })
}

pub fn number() -> TypeHandler {
    TypeHandler::new(number_getter, number_setter)
}

pub fn datetime() -> TypeHandler {
    TypeHandler::new(datetime_getter, datetime_setter)
}

pub fn locale() -> TypeHandler {
    TypeHandler::new(locale_getter, locale_setter)
}

fn number_getter(
    ctx: &HandlerContext<'_>,
    _: &str,
    value: Value,
    options: &AttributeOptions,
) -> Value {
    match &options.format {
        Some(format) => Value::String(ctx.locale().format(
            &value,
            format,
            options.culture.as_deref(),
        )),
        None => value,
    }
}

fn number_setter(
    ctx: &HandlerContext<'_>,
    attribute: &str,
    value: Value,
    options: &AttributeOptions,
) -> SchemaResult<Value> {
    let number = value.to_number();
    if !number.is_nan() {
        return Ok(Value::Number(number));
    }

    let text = match value {
        Value::String(text) => text,
        other => other.to_string(),
    };
    match ctx
        .locale()
        .parse_float(&text, options.culture.as_deref())
        .filter(|parsed| !parsed.is_nan())
    {
        Some(parsed) => Ok(Value::Number(parsed)),
        None => {
            warn!(
                "Attribute '{}': '{}' is not a number, storing '{}'",
                attribute, text, NAN_SENTINEL
            );
            Ok(Value::String(NAN_SENTINEL.to_string()))
        }
    }
}

fn datetime_getter(
    ctx: &HandlerContext<'_>,
    _: &str,
    value: Value,
    options: &AttributeOptions,
) -> Value {
    let date = value.to_date();
    match &options.format {
        Some(format) => Value::String(ctx.locale().format(
            &Value::Date(date),
            format,
            options.culture.as_deref(),
        )),
        None => Value::Date(date),
    }
}

fn datetime_setter(
    ctx: &HandlerContext<'_>,
    _: &str,
    value: Value,
    options: &AttributeOptions,
) -> SchemaResult<Value> {
    let culture = options.culture.as_deref();
    let date = match (&options.format, &value) {
        (Some(format), Value::String(text)) => ctx
            .locale()
            .parse_date(text, format, culture)
            .map(Date::new)
            .unwrap_or_else(|| value.to_date()),
        _ => value.to_date(),
    };

    Ok(match options.standard {
        Some(DateStandard::Iso) => {
            Value::String(date.to_iso_string().unwrap_or_else(|| date.to_string()))
        }
        Some(DateStandard::Unix) => Value::Number(date.millis()),
        None => Value::Date(date),
    })
}

fn locale_getter(
    ctx: &HandlerContext<'_>,
    _: &str,
    value: Value,
    options: &AttributeOptions,
) -> Value {
    let key = value.to_string();
    ctx.locale()
        .localize(&key, options.culture.as_deref())
        .map(Value::String)
        .unwrap_or(value)
}

fn locale_setter(
    ctx: &HandlerContext<'_>,
    _: &str,
    value: Value,
    options: &AttributeOptions,
) -> SchemaResult<Value> {
    if let Value::String(text) = &value {
        let key = ctx
            .locale()
            .find_closest_culture(options.culture.as_deref())
            .and_then(|culture| {
                culture
                    .messages
                    .iter()
                    .find(|(_, localized)| *localized == text)
                    .map(|(key, _)| key.clone())
            });
        if let Some(key) = key {
            return Ok(Value::String(key));
        }
    }
    Ok(Value::String(value.to_string()))
}
