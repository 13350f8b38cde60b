use thiserror::Error;

use crate::handler::Format;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Union decoding needs associative field lookup, which markup trees lack.
    #[error("{format} deserialisation into union types is not supported")]
    UnsupportedFormat { format: Format },

    #[error("union discriminator field '{field}' not found in data")]
    DiscriminatorFieldMissing { field: String },

    #[error("union discriminator map does not contain key '{key}'")]
    DiscriminatorKeyUnmapped { key: String },

    #[error("union discriminator field '{field}' must hold a string, number or boolean")]
    DiscriminatorNotScalar { field: String },

    /// Raised by a navigator when a value cannot be visited as the given type.
    #[error("cannot visit value as `{type_name}`: {reason}")]
    NotVisitable { type_name: String, reason: String },

    #[error("no metadata registered for type `{type_name}`")]
    UnknownType { type_name: String },

    #[error("invalid model at {path}: {message}")]
    Model { path: String, message: String },

    #[error("invalid type descriptor at {path}: {message}")]
    TypeDescriptor { path: String, message: String },
}

impl Error {
    pub fn not_visitable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::NotVisitable { type_name: type_name.into(), reason: reason.into() }
    }

    pub fn is_not_visitable(&self) -> bool {
        matches!(self, Error::NotVisitable { .. })
    }
}
