//! Union type resolution for a type-directed JSON serializer.
//!
//! A field declared as `union<...>` is narrowed to one concrete member type,
//! then handed back to the traversal engine ([`navigator`]) to be encoded or
//! decoded as that type. See [`union::UnionResolver`] for the rules.
pub mod cli;
pub mod discriminator;
pub mod error;
pub mod handler;
pub mod logging;
pub mod navigator;
pub mod path_de;
pub mod primitive;
pub mod types;
pub mod union;
pub mod value;

pub use error::{Error, Result};
pub use navigator::{DeserializeNavigator, JsonNavigator, Model, SerializeNavigator};
pub use types::{Param, TypeDescriptor};
pub use union::{Resolution, UnionResolver};
pub use value::{Decoded, Value};
