//! Runtime values and raw decoded data.
//!
//! `Value` is the object graph the serializer walks: objects carry their
//! concrete class name. `Decoded` is what a wire format hands the
//! deserializer before any type is applied.
use std::borrow::Cow;

use indexmap::IndexMap;

pub const NULL: &str = "null";
pub const ARRAY: &str = "array";
/// Class given to objects decoded without metadata.
pub const OBJECT: &str = "object";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object {
        class: String,
        fields: IndexMap<String, Value>,
    },
}

/// Runtime classification used on the serialize path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind<'a> {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(&'a str),
    Structured(&'a str), // runtime type name
}

/// Borrowed view of a primitive value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Int(i64),
    /// JSON integer above `i64::MAX`; kept exact instead of widened to a float.
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
}

impl Value {
    pub fn object<K, I>(class: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object {
            class: class.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn kind(&self) -> ValueKind<'_> {
        match self {
            Value::Int(i) => ValueKind::Integer(*i),
            Value::Float(f) => ValueKind::Float(*f),
            Value::Bool(b) => ValueKind::Boolean(*b),
            Value::String(s) => ValueKind::String(s),
            Value::Null => ValueKind::Structured(NULL),
            Value::List(_) => ValueKind::Structured(ARRAY),
            Value::Object { class, .. } => ValueKind::Structured(class),
        }
    }

    pub fn as_scalar(&self) -> Option<Scalar<'_>> {
        match self.kind() {
            ValueKind::Integer(i) => Some(Scalar::Int(i)),
            ValueKind::Float(f) => Some(Scalar::Float(f)),
            ValueKind::Boolean(b) => Some(Scalar::Bool(b)),
            ValueKind::String(s) => Some(Scalar::Str(s)),
            ValueKind::Structured(_) => None,
        }
    }

    /// Converts untyped JSON; objects get the generic `object` class.
    /// Integers above `i64::MAX` become floats, as there is no wider `Value::Int`.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(xs) => Value::List(xs.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Value::Object {
                class: OBJECT.to_string(),
                fields: map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect(),
            },
        }
    }
}

impl<'a> Scalar<'a> {
    /// Borrows a scalar out of decoded JSON. Null, arrays and objects have none.
    pub fn from_json(json: &'a serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => Some(match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Scalar::Int(i),
                (None, Some(u)) => Scalar::UInt(u),
                (None, None) => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_json::Value::String(s) => Some(Scalar::Str(s)),
            _ => None,
        }
    }

    /// The textual form every primitive comparison is made against.
    pub fn text(&self) -> Cow<'a, str> {
        match *self {
            Scalar::Int(i) => Cow::Owned(i.to_string()),
            Scalar::UInt(u) => Cow::Owned(u.to_string()),
            Scalar::Float(f) => Cow::Owned(float_text(f)),
            Scalar::Bool(b) => Cow::Borrowed(if b { "true" } else { "false" }),
            Scalar::Str(s) => Cow::Borrowed(s),
        }
    }
}

/// Floats render the way JSON writes them (`3.0`, not `3`).
pub fn float_text(f: f64) -> String {
    match serde_json::Number::from_f64(f) {
        Some(n) => n.to_string(),
        None => f.to_string(),
    }
}

/// Raw data handed over by a wire format decoder, borrowed for one visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded<'a> {
    /// field-oriented tree (JSON)
    Tree(&'a serde_json::Value),
    /// hierarchical markup (XML)
    Markup(&'a MarkupNode),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkupNode {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<MarkupNode>,
    pub text: Option<String>,
}

impl MarkupNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }
}

impl<'a> Decoded<'a> {
    pub fn as_tree(self) -> Option<&'a serde_json::Value> {
        match self {
            Decoded::Tree(json) => Some(json),
            Decoded::Markup(_) => None,
        }
    }
}

impl<'a> From<&'a serde_json::Value> for Decoded<'a> {
    fn from(json: &'a serde_json::Value) -> Self {
        Decoded::Tree(json)
    }
}
