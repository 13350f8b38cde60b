//! Discriminator lookup for union decoding.
//!
//! The mode is chosen purely from the shape of the union's params:
//!
//! - `union<field>`: the value of `field` in the data is the concrete type name
//! - `union<field, {value: Type, ...}>`: the value of `field` is looked up in
//!   the map; an empty map means the value is the type name itself
//! - anything else: no discriminator, the caller scans candidates instead
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{Param, TypeDescriptor};
use crate::value::Scalar;

/// Returns the concrete type selected by the discriminator, or `None` when
/// `ty` declares no discriminator (or the discriminant is `null`).
pub fn resolve(data: &Map<String, Value>, ty: &TypeDescriptor) -> Result<Option<TypeDescriptor>> {
    let concrete = match ty.params.as_slice() {
        [Param::TypeRef(field)] => lookup(data, &field.name)?,
        [Param::TypeRef(field), Param::DiscriminantMap(map)] => match lookup(data, &field.name)? {
            Some(key) if !map.is_empty() => match map.get(&key) {
                Some(name) => Some(name.clone()),
                None => return Err(Error::DiscriminatorKeyUnmapped { key }),
            },
            found => found,
        },
        _ => None,
    };
    Ok(concrete.map(TypeDescriptor::named))
}

/// Textual form of the discriminant stored under `field`.
fn lookup(data: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    let value = data
        .get(field)
        .ok_or_else(|| Error::DiscriminatorFieldMissing { field: field.to_string() })?;
    if value.is_null() {
        return Ok(None);
    }
    match Scalar::from_json(value) {
        Some(scalar) => Ok(Some(scalar.text().into_owned())),
        None => Err(Error::DiscriminatorNotScalar { field: field.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn shapes() -> TypeDescriptor {
        TypeDescriptor::union(vec![
            Param::type_ref("kind"),
            Param::map([("c", "Circle"), ("s", "Square")]),
        ])
    }

    #[test]
    fn field_only_mode_uses_value_as_type_name() {
        let ty = TypeDescriptor::union(vec![Param::type_ref("type")]);
        let found = resolve(&object(json!({"type": "Cat", "lives": 9})), &ty).unwrap();
        assert_eq!(found, Some(TypeDescriptor::named("Cat")));
    }

    #[test]
    fn map_mode_translates_discriminant() {
        let found = resolve(&object(json!({"kind": "c"})), &shapes()).unwrap();
        assert_eq!(found, Some(TypeDescriptor::named("Circle")));
    }

    #[test]
    fn map_mode_rejects_unknown_key() {
        let ty = TypeDescriptor::union(vec![Param::type_ref("kind"), Param::map([("c", "Circle")])]);
        let err = resolve(&object(json!({"kind": "x"})), &ty).unwrap_err();
        assert!(matches!(err, Error::DiscriminatorKeyUnmapped { key } if key == "x"));
    }

    #[test]
    fn empty_map_uses_value_directly() {
        let ty = TypeDescriptor::union(vec![Param::type_ref("kind"), Param::map::<&str, &str, _>([])]);
        let found = resolve(&object(json!({"kind": "Square"})), &ty).unwrap();
        assert_eq!(found, Some(TypeDescriptor::named("Square")));
    }

    #[test]
    fn missing_field_fails_in_both_modes() {
        let field_only = TypeDescriptor::union(vec![Param::type_ref("type")]);
        for ty in [field_only, shapes()] {
            let err = resolve(&Map::new(), &ty).unwrap_err();
            assert!(matches!(err, Error::DiscriminatorFieldMissing { .. }), "{ty}: {err}");
        }
    }

    #[test]
    fn numeric_discriminants_use_their_text() {
        let ty = TypeDescriptor::union(vec![Param::type_ref("v"), Param::map([("1", "One"), ("true", "Yes")])]);
        assert_eq!(resolve(&object(json!({"v": 1})), &ty).unwrap(), Some(TypeDescriptor::named("One")));
        assert_eq!(resolve(&object(json!({"v": true})), &ty).unwrap(), Some(TypeDescriptor::named("Yes")));
    }

    #[test]
    fn null_discriminant_is_not_applicable() {
        assert_eq!(resolve(&object(json!({"kind": null})), &shapes()).unwrap(), None);
    }

    #[test]
    fn structured_discriminant_is_rejected() {
        let err = resolve(&object(json!({"kind": ["c"]})), &shapes()).unwrap_err();
        assert!(matches!(err, Error::DiscriminatorNotScalar { field } if field == "kind"));
    }

    #[test]
    fn plain_unions_have_no_discriminator() {
        let data = object(json!({"int": 1, "string": "s"}));
        let two_types = TypeDescriptor::union(vec![Param::type_ref("int"), Param::type_ref("string")]);
        let three = TypeDescriptor::union(vec![
            Param::type_ref("int"),
            Param::type_ref("float"),
            Param::type_ref("string"),
        ]);
        for ty in [TypeDescriptor::union(vec![]), two_types, three] {
            assert_eq!(resolve(&data, &ty).unwrap(), None);
        }
    }

    #[test]
    fn resolution_is_repeatable() {
        let data = object(json!({"kind": "s"}));
        let first = resolve(&data, &shapes()).unwrap();
        let second = resolve(&data, &shapes()).unwrap();
        assert_eq!(first, second);
    }
}
