//! Primitive kinds and the textual round-trip test used to match scalars
//! against union candidates.
//!
//! A scalar matches a kind when casting its text to that kind and rendering
//! the result back reproduces the text exactly: `"3"` is an int, `"3.0"` is
//! not (it renders back as `"3"`), but `"3.0"` is a float.
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::value::{Scalar, float_text};

static TYPE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("boolean", "bool"), ("integer", "int"), ("double", "float")])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Float,
    Bool,
    String,
}

impl PrimitiveKind {
    /// Accepts both the short and long spellings (`int`/`integer`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match canonical_name(name) {
            "int" => Some(PrimitiveKind::Int),
            "float" => Some(PrimitiveKind::Float),
            "bool" => Some(PrimitiveKind::Bool),
            "string" => Some(PrimitiveKind::String),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
        }
    }

    /// Casts `text` to this kind and renders the result canonically.
    pub fn cast(self, text: &str) -> String {
        match self {
            PrimitiveKind::Int => cast_int(text).to_string(),
            PrimitiveKind::Float => float_text(cast_float(text)),
            PrimitiveKind::Bool => cast_bool(text).to_string(),
            PrimitiveKind::String => text.to_string(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes `boolean`, `integer` and `double` to their short names.
pub fn canonical_name(name: &str) -> &str {
    TYPE_ALIASES.get(name).copied().unwrap_or(name)
}

pub fn is_primitive(name: &str) -> bool {
    PrimitiveKind::from_name(name).is_some()
}

pub fn test_primitive(value: Scalar<'_>, kind: PrimitiveKind) -> bool {
    let text = value.text();
    match kind {
        PrimitiveKind::String => true,
        _ => kind.cast(&text) == text,
    }
}

pub fn cast_int(text: &str) -> i64 {
    if let Ok(i) = text.parse::<i64>() {
        return i;
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// `NaN` and the infinities have no JSON form and cast to `0.0`.
pub fn cast_float(text: &str) -> f64 {
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => 0.0,
    }
}

pub fn cast_bool(text: &str) -> bool {
    !matches!(text, "" | "0" | "false")
}
