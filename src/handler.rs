//! Registration surface: which handler serves which type name, per wire
//! format and direction.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::union::UnionResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Serialize,
    Deserialize,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Xml];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Xml => "xml",
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Serialize => "serialize",
            Direction::Deserialize => "deserialize",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub type_name: String,
    pub format: Format,
    pub direction: Direction,
}

/// Implemented by handlers that advertise the type names they take over.
pub trait SubscribingHandler {
    fn subscriptions() -> Vec<Subscription>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Union(UnionResolver),
}

impl Handler {
    fn subscriptions(&self) -> Vec<Subscription> {
        match self {
            Handler::Union(_) => UnionResolver::subscriptions(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    entries: IndexMap<(String, Format, Direction), Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Handler::Union(UnionResolver));
        registry
    }

    /// Registers `handler` for every subscription it advertises; later
    /// registrations replace earlier ones for the same key.
    pub fn register(&mut self, handler: Handler) {
        for sub in handler.subscriptions() {
            tracing::debug!(type_name = %sub.type_name, format = %sub.format, direction = %sub.direction, "registering handler");
            self.entries.insert((sub.type_name, sub.format, sub.direction), handler);
        }
    }

    pub fn get(&self, type_name: &str, format: Format, direction: Direction) -> Option<Handler> {
        self.entries.get(&(type_name.to_string(), format, direction)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
