//! Request validation: raw JSON bodies in, validated write payloads or a
//! field → messages error map out.

pub mod item;
pub mod supplier;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NULL_CHARACTER: &str = "Null characters are not allowed.";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Maximum length of `name` fields.
pub const NAME_MAX_LENGTH: usize = 255;

/// Field-level validation errors in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

/// Whether missing fields are errors (create/replace) or untouched (patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Full,
    Partial,
}

/// Human-readable JSON type names used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

pub fn expect_object(data: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    data.as_object().ok_or_else(|| {
        ValidationErrors::single(
            NON_FIELD_ERRORS,
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                type_name(data)
            ),
        )
    })
}

fn coerce_text(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) if s.contains('\0') => Err(NULL_CHARACTER),
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(NOT_A_STRING),
    }
}

/// Unwrap a field that full mode already reported when absent.
pub fn present<T>(value: Option<T>, field: &str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationErrors::single(field, REQUIRED))
}

fn check_length(text: &str, max_length: Option<usize>) -> Result<(), String> {
    match max_length {
        Some(max) if text.chars().count() > max => Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        )),
        _ => Ok(()),
    }
}

/// Required, non-blank, non-null text.
pub fn required_text(
    data: &Map<String, Value>,
    field: &str,
    max_length: Option<usize>,
    mode: Mode,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = match data.get(field) {
        None => {
            if mode == Mode::Full {
                errors.add(field, REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        }
        Some(value) => value,
    };

    let text = match coerce_text(value) {
        Ok(text) => text,
        Err(message) => {
            errors.add(field, message);
            return None;
        }
    };
    if text.is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }
    if let Err(message) = check_length(&text, max_length) {
        errors.add(field, message);
        return None;
    }
    Some(text)
}

/// Optional nullable text. Outer `None` means "not supplied" and is only
/// returned in partial mode; in full mode a missing field becomes `Some(None)`.
pub fn optional_text(
    data: &Map<String, Value>,
    field: &str,
    mode: Mode,
    errors: &mut ValidationErrors,
) -> Option<Option<String>> {
    match data.get(field) {
        None => match mode {
            Mode::Full => Some(None),
            Mode::Partial => None,
        },
        Some(Value::Null) => Some(None),
        Some(value) => match coerce_text(value) {
            Ok(text) => Some(Some(text)),
            Err(message) => {
                errors.add(field, message);
                None
            }
        },
    }
}
