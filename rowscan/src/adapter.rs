//! List adapters for sequence-typed record fields.
//!
//! Drivers disagree on how array columns arrive. A [`ListAdapter`] turns the
//! scanned value of such a column into its elements before the field's
//! element type converts each one.

use std::fmt;

use rowscan_result::{Error, Result};
use rowscan_types::Value;

pub trait ListAdapter: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Splits a list-valued cell into elements. NULL yields `None`.
    fn decode_list(&self, value: Value) -> Result<Option<Vec<Value>>>;
}

/// Accepts native list values. Byte strings decode into one unsigned element
/// per byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeList;

impl ListAdapter for NativeList {
    fn name(&self) -> &'static str {
        "native"
    }

    fn decode_list(&self, value: Value) -> Result<Option<Vec<Value>>> {
        match value {
            Value::Null => Ok(None),
            Value::List(items) => Ok(Some(items)),
            Value::Bytes(bytes) => Ok(Some(bytes.into_iter().map(Value::from).collect())),
            other => Err(Error::type_mismatch("list", other.type_name())),
        }
    }
}

/// Parses PostgreSQL array literals such as `{1,2,NULL}` or `{"a b",c}`.
/// Native lists pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgArrayText;

impl ListAdapter for PgArrayText {
    fn name(&self) -> &'static str {
        "postgres array"
    }

    fn decode_list(&self, value: Value) -> Result<Option<Vec<Value>>> {
        match value {
            Value::Null => Ok(None),
            Value::List(items) => Ok(Some(items)),
            Value::Text(text) => parse_pg_array(&text).map(Some),
            Value::Bytes(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| Error::type_mismatch("array literal", "bytes"))?;
                parse_pg_array(&text).map(Some)
            }
            other => Err(Error::type_mismatch("array literal", other.type_name())),
        }
    }
}

fn malformed() -> Error {
    Error::type_mismatch("array literal", "text")
}

/// One-dimensional arrays only; elements come back as text or NULL.
fn parse_pg_array(text: &str) -> Result<Vec<Value>> {
    let body = text
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(malformed)?;

    let mut items = Vec::new();
    if body.trim().is_empty() {
        return Ok(items);
    }

    let mut chars = body.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let item = if chars.next_if_eq(&'"').is_some() {
            let mut quoted = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => quoted.push(chars.next().ok_or_else(malformed)?),
                    Some(c) => quoted.push(c),
                    None => return Err(malformed()),
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            Value::Text(quoted)
        } else {
            let mut bare = String::new();
            while let Some(c) = chars.next_if(|c| *c != ',') {
                if c == '{' || c == '"' {
                    return Err(malformed());
                }
                bare.push(c);
            }
            let bare = bare.trim_end();
            if bare.is_empty() {
                return Err(malformed());
            }
            if bare.eq_ignore_ascii_case("null") {
                Value::Null
            } else {
                Value::Text(bare.to_string())
            }
        };
        items.push(item);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return Err(malformed()),
        }
    }
    Ok(items)
}
