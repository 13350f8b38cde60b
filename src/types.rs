//! Structured type references handed to the resolver by the type parser.
//!
//! JSON shape: `{"name": "union", "params": ["int", {"name": "Foo"}, {"a": "Bar"}]}`.
//! A bare string is shorthand for a type with no params.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const UNION: &str = "union";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TypeDescriptorRepr")]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    TypeRef(TypeDescriptor),
    /// discriminant value → concrete type name (no `name` key)
    DiscriminantMap(IndexMap<String, String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeDescriptorRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        params: Vec<Param>,
    },
}

impl From<TypeDescriptorRepr> for TypeDescriptor {
    fn from(repr: TypeDescriptorRepr) -> Self {
        match repr {
            TypeDescriptorRepr::Name(name) => TypeDescriptor::named(name),
            TypeDescriptorRepr::Full { name, params } => TypeDescriptor { name, params },
        }
    }
}

impl TypeDescriptor {
    /// A concrete type with zero params.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Vec::new() }
    }

    pub fn with_params(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self { name: name.into(), params }
    }

    pub fn union(params: Vec<Param>) -> Self {
        Self::with_params(UNION, params)
    }

    pub fn is_union(&self) -> bool {
        self.name == UNION
    }

    /// Params that name a type, skipping discriminant maps.
    pub fn type_params(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.params.iter().filter_map(Param::as_type_ref)
    }
}

impl Param {
    pub fn type_ref(name: impl Into<String>) -> Self {
        Param::TypeRef(TypeDescriptor::named(name))
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Param::DiscriminantMap(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn as_type_ref(&self) -> Option<&TypeDescriptor> {
        match self {
            Param::TypeRef(ty) => Some(ty),
            Param::DiscriminantMap(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Param::TypeRef(_) => None,
            Param::DiscriminantMap(map) => Some(map),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::TypeRef(ty) => write!(f, "{ty}"),
            Param::DiscriminantMap(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
