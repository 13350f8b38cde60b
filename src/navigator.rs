//! Traversal engine seam.
//!
//! The union resolver never encodes or decodes anything itself: once it has
//! narrowed a union to a concrete type it hands the value back to the
//! navigator through these traits. `Ok(None)` is an absent result (a nested
//! union that matched nothing), not a failure.
//!
//! A navigator signals "this value cannot be visited as that type" with
//! [`Error::NotVisitable`](crate::error::Error::NotVisitable); the serialize
//! candidate scan treats that as a skip, everything else propagates.
pub mod json;
pub mod model;

use crate::error::Result;
use crate::types::TypeDescriptor;
use crate::value::{Decoded, Value};

pub use json::JsonNavigator;
pub use model::{ClassMetadata, Model};

pub trait SerializeNavigator {
    type Encoded;

    fn accept(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<Option<Self::Encoded>>;
}

pub trait DeserializeNavigator {
    fn accept(&mut self, data: Decoded<'_>, ty: &TypeDescriptor) -> Result<Option<Value>>;
}
