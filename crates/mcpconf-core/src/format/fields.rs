//! Path-aware accessors over parsed JSON documents.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::Format;
use crate::error::ConversionError;

/// A JSON object together with its path in the document.
pub(super) struct Fields<'a> {
    format: Format,
    path: String,
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Interpret `value` as an object located at `path`.
    pub(super) fn of(
        format: Format,
        value: &'a Value,
        path: impl Into<String>,
    ) -> Result<Self, ConversionError> {
        let path = path.into();
        match value.as_object() {
            Some(object) => Ok(Self {
                format,
                path,
                object,
            }),
            None => Err(ConversionError::new(
                format,
                display_path(&path),
                format!("expected an object, found {}", kind(value)),
            )),
        }
    }

    pub(super) fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub(super) fn error(&self, key: &str, message: impl Into<String>) -> ConversionError {
        ConversionError::new(self.format, self.path_of(key), message)
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.object.iter()
    }

    pub(super) fn object(&self, key: &str) -> Result<Option<Fields<'a>>, ConversionError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Fields::of(self.format, value, self.path_of(key)).map(Some),
        }
    }

    pub(super) fn required_object(&self, key: &str) -> Result<Fields<'a>, ConversionError> {
        self.object(key)?
            .ok_or_else(|| self.error(key, "required key is missing"))
    }

    pub(super) fn string(&self, key: &str) -> Result<Option<String>, ConversionError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.error(key, format!("expected a string, found {}", kind(other)))),
        }
    }

    pub(super) fn required_string(&self, key: &str) -> Result<String, ConversionError> {
        self.string(key)?
            .ok_or_else(|| self.error(key, "required key is missing"))
    }

    pub(super) fn bool(&self, key: &str) -> Result<Option<bool>, ConversionError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.error(key, format!("expected a boolean, found {}", kind(other)))),
        }
    }

    pub(super) fn array(&self, key: &str) -> Result<&'a [Value], ConversionError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(self.error(key, format!("expected an array, found {}", kind(other)))),
        }
    }

    pub(super) fn string_list(&self, key: &str) -> Result<Vec<String>, ConversionError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ConversionError::new(
                    self.format,
                    format!("{}[{}]", self.path_of(key), index),
                    format!("expected a string, found {}", kind(other)),
                )),
            })
            .collect()
    }

    pub(super) fn string_map(&self, key: &str) -> Result<IndexMap<String, String>, ConversionError> {
        let Some(map) = self.object(key)? else {
            return Ok(IndexMap::new());
        };
        map.entries()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name.clone(), s.clone())),
                other => Err(map.error(name, format!("expected a string, found {}", kind(other)))),
            })
            .collect()
    }
}

/// Object-or-string field such as DXT `author` / `repository`.
pub(super) fn string_or_field(
    fields: &Fields<'_>,
    key: &str,
    inner: &str,
) -> Result<Option<String>, ConversionError> {
    if let Some(nested) = fields.object.get(key).filter(|v| v.is_object()) {
        let nested = Fields::of(fields.format, nested, fields.path_of(key))?;
        return nested.string(inner);
    }
    fields.string(key)
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
