//! Union type handler.
//!
//! Serializing: non-primitive values are encoded as their runtime class,
//! whatever the union declares. Primitive values are tried against each
//! declared member in order; the first member that accepts them wins.
//!
//! Deserializing: a discriminator (see [`crate::discriminator`]) picks the
//! concrete type when the union declares one. Otherwise only primitive
//! members are considered, again in declaration order. Markup trees cannot
//! be decoded into unions at all.
//!
//! Members are tried in the order they are declared, so `string` should come
//! last: every scalar round-trips as a string.
use serde_json::Value as Json;

use crate::discriminator;
use crate::error::{Error, Result};
use crate::handler::{Direction, Format, SubscribingHandler, Subscription};
use crate::navigator::{DeserializeNavigator, SerializeNavigator};
use crate::primitive::{PrimitiveKind, test_primitive};
use crate::types::{TypeDescriptor, UNION};
use crate::value::{Decoded, Scalar, Value, ValueKind};

/// How a decoded union was narrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// picked by a discriminator field (and map)
    Discriminated(TypeDescriptor),
    /// first primitive member the data round-trips as
    Matched(TypeDescriptor),
    Unresolved,
}

impl Resolution {
    pub fn concrete(&self) -> Option<&TypeDescriptor> {
        match self {
            Resolution::Discriminated(ty) | Resolution::Matched(ty) => Some(ty),
            Resolution::Unresolved => None,
        }
    }
}

/// Stateless; one instance can serve any number of navigators at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnionResolver;

impl UnionResolver {
    pub fn serialize<N: SerializeNavigator>(
        &self,
        nav: &mut N,
        value: &Value,
        ty: &TypeDescriptor,
    ) -> Result<Option<N::Encoded>> {
        if let ValueKind::Structured(class) = value.kind() {
            tracing::debug!(ty = %ty, class, "serializing union member by runtime class");
            return nav.accept(value, &TypeDescriptor::named(class));
        }
        self.match_simple_type(nav, value, ty)
    }

    fn match_simple_type<N: SerializeNavigator>(
        &self,
        nav: &mut N,
        value: &Value,
        ty: &TypeDescriptor,
    ) -> Result<Option<N::Encoded>> {
        let scalar = value.as_scalar();
        for candidate in ty.type_params() {
            if let (Some(kind), Some(scalar)) = (PrimitiveKind::from_name(&candidate.name), scalar) {
                if !test_primitive(scalar, kind) {
                    tracing::trace!(candidate = %candidate, "value does not round-trip, skipping");
                    continue;
                }
            }
            match nav.accept(value, candidate) {
                Ok(encoded) => {
                    tracing::debug!(ty = %ty, candidate = %candidate, "union member matched");
                    return Ok(encoded);
                }
                Err(Error::NotVisitable { type_name, reason }) => {
                    tracing::trace!(candidate = %type_name, %reason, "candidate rejected value, skipping");
                }
                Err(err) => return Err(err),
            }
        }
        tracing::debug!(ty = %ty, "no union member matched");
        Ok(None)
    }

    pub fn deserialize<N: DeserializeNavigator>(
        &self,
        nav: &mut N,
        data: Decoded<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Option<Value>> {
        match self.resolve(data, ty)? {
            Resolution::Discriminated(concrete) => {
                tracing::debug!(ty = %ty, concrete = %concrete, "resolved union by discriminator");
                nav.accept(data, &concrete)
            }
            Resolution::Matched(candidate) => {
                tracing::debug!(ty = %ty, candidate = %candidate, "resolved union by primitive match");
                nav.accept(data, &candidate)
            }
            Resolution::Unresolved => {
                tracing::debug!(ty = %ty, "no union member matched decoded data");
                Ok(None)
            }
        }
    }

    /// Picks the concrete type decoded data holds, without decoding it.
    pub fn resolve(&self, data: Decoded<'_>, ty: &TypeDescriptor) -> Result<Resolution> {
        let json = match data {
            Decoded::Tree(json) => json,
            Decoded::Markup(_) => return Err(Error::UnsupportedFormat { format: Format::Xml }),
        };

        if let Json::Object(map) = json {
            if let Some(concrete) = discriminator::resolve(map, ty)? {
                return Ok(Resolution::Discriminated(concrete));
            }
        }

        Ok(match self.match_decoded_primitive(json, ty) {
            Some(candidate) => Resolution::Matched(candidate.clone()),
            None => Resolution::Unresolved,
        })
    }

    /// First primitive member the decoded scalar round-trips as.
    fn match_decoded_primitive<'t>(&self, json: &Json, ty: &'t TypeDescriptor) -> Option<&'t TypeDescriptor> {
        let scalar = Scalar::from_json(json)?;
        ty.type_params().find(|candidate| {
            PrimitiveKind::from_name(&candidate.name).is_some_and(|kind| test_primitive(scalar, kind))
        })
    }
}

impl SubscribingHandler for UnionResolver {
    fn subscriptions() -> Vec<Subscription> {
        let mut subs = Vec::new();
        for format in Format::ALL {
            for direction in [Direction::Deserialize, Direction::Serialize] {
                subs.push(Subscription { type_name: UNION.to_string(), format, direction });
            }
        }
        subs
    }
}
