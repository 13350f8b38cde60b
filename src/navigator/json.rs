//! Reference traversal engine for JSON.
//!
//! Walks runtime values and decoded JSON against type descriptors:
//! primitives, `null`, `array` / `array<T>`, `mixed`, and classes from a
//! [`Model`]. Types with a registered handler (`union`) are dispatched to it.
use serde_json::{Map, Number, Value as Json};

use super::model::Model;
use super::{DeserializeNavigator, SerializeNavigator};
use crate::error::{Error, Result};
use crate::handler::{Direction, Format, Handler, HandlerRegistry};
use crate::primitive::PrimitiveKind;
use crate::types::TypeDescriptor;
use crate::value::{ARRAY, Decoded, NULL, OBJECT, Scalar, Value, ValueKind};

/// Untyped: take the data as it comes.
pub const MIXED: &str = "mixed";

pub struct JsonNavigator<'m> {
    model: &'m Model,
    handlers: HandlerRegistry,
}

impl<'m> JsonNavigator<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self::with_handlers(model, HandlerRegistry::with_defaults())
    }

    pub fn with_handlers(model: &'m Model, handlers: HandlerRegistry) -> Self {
        Self { model, handlers }
    }

    /// Encodes `value` as `ty`; `None` when a union matched nothing.
    pub fn serialize(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<Option<Json>> {
        SerializeNavigator::accept(self, value, ty)
    }

    pub fn deserialize(&mut self, json: &Json, ty: &TypeDescriptor) -> Result<Option<Value>> {
        DeserializeNavigator::accept(self, Decoded::Tree(json), ty)
    }

    fn handler(&self, ty: &TypeDescriptor, direction: Direction) -> Option<Handler> {
        self.handlers.get(&ty.name, Format::Json, direction)
    }

    // ---------------------------------------------------------------- encode

    fn encode_primitive(&self, value: &Value, kind: PrimitiveKind) -> Result<Json> {
        let scalar = value
            .as_scalar()
            .ok_or_else(|| Error::not_visitable(kind.name(), "value is not a scalar"))?;
        primitive_to_json(scalar, kind)
    }

    fn encode_list(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<Json> {
        let Value::List(items) = value else {
            return Err(Error::not_visitable(ty.name.clone(), "value is not a list"));
        };
        let declared = ty.type_params().next();
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let item_ty = match declared {
                Some(t) => t.clone(),
                None => runtime_type(item),
            };
            if let Some(encoded) = SerializeNavigator::accept(self, item, &item_ty)? {
                out.push(encoded);
            }
        }
        Ok(Json::Array(out))
    }

    fn encode_object(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<Json> {
        let Value::Object { class, fields } = value else {
            return Err(Error::not_visitable(ty.name.clone(), "value is not an object"));
        };
        let model = self.model;
        let mut out = Map::new();
        match model.class(&ty.name) {
            Some(meta) => {
                if class != &meta.name {
                    return Err(Error::not_visitable(ty.name.clone(), format!("value is a `{class}`")));
                }
                for (name, prop_ty) in &meta.properties {
                    let Some(field) = fields.get(name) else { continue };
                    if let Some(encoded) = SerializeNavigator::accept(self, field, prop_ty)? {
                        out.insert(name.clone(), encoded);
                    }
                }
            }
            None if ty.name == OBJECT || ty.name == MIXED => {
                for (name, field) in fields {
                    if let Some(encoded) = SerializeNavigator::accept(self, field, &runtime_type(field))? {
                        out.insert(name.clone(), encoded);
                    }
                }
            }
            None => return Err(Error::UnknownType { type_name: ty.name.clone() }),
        }
        Ok(Json::Object(out))
    }

    // ---------------------------------------------------------------- decode

    fn decode_list(&mut self, json: &Json, ty: &TypeDescriptor) -> Result<Value> {
        let Json::Array(items) = json else {
            return Err(Error::not_visitable(ty.name.clone(), "data is not an array"));
        };
        let mixed = TypeDescriptor::named(MIXED);
        let item_ty = ty.type_params().next().unwrap_or(&mixed);
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if let Some(decoded) = DeserializeNavigator::accept(self, Decoded::Tree(item), item_ty)? {
                out.push(decoded);
            }
        }
        Ok(Value::List(out))
    }

    fn decode_object(&mut self, json: &Json, ty: &TypeDescriptor) -> Result<Value> {
        let model = self.model;
        let meta = model
            .class(&ty.name)
            .ok_or_else(|| Error::UnknownType { type_name: ty.name.clone() })?;
        let Json::Object(map) = json else {
            return Err(Error::not_visitable(ty.name.clone(), "data is not an object"));
        };
        let mut fields = indexmap::IndexMap::new();
        for (name, prop_ty) in &meta.properties {
            let Some(child) = map.get(name) else { continue };
            if let Some(decoded) = DeserializeNavigator::accept(self, Decoded::Tree(child), prop_ty)? {
                fields.insert(name.clone(), decoded);
            }
        }
        Ok(Value::Object { class: meta.name.clone(), fields })
    }
}

impl SerializeNavigator for JsonNavigator<'_> {
    type Encoded = Json;

    fn accept(&mut self, value: &Value, ty: &TypeDescriptor) -> Result<Option<Json>> {
        tracing::trace!(ty = %ty, "serializing");
        if let Some(Handler::Union(resolver)) = self.handler(ty, Direction::Serialize) {
            return resolver.serialize(self, value, ty);
        }
        if let Some(kind) = PrimitiveKind::from_name(&ty.name) {
            return self.encode_primitive(value, kind).map(Some);
        }
        let encoded = match ty.name.as_str() {
            NULL => match value {
                Value::Null => Json::Null,
                _ => return Err(Error::not_visitable(NULL, "value is not null")),
            },
            ARRAY => self.encode_list(value, ty)?,
            MIXED => {
                let runtime = runtime_type(value);
                if runtime.name == MIXED {
                    self.encode_object(value, ty)?
                } else {
                    return SerializeNavigator::accept(self, value, &runtime);
                }
            }
            _ => self.encode_object(value, ty)?,
        };
        Ok(Some(encoded))
    }
}

impl DeserializeNavigator for JsonNavigator<'_> {
    fn accept(&mut self, data: Decoded<'_>, ty: &TypeDescriptor) -> Result<Option<Value>> {
        tracing::trace!(ty = %ty, "deserializing");
        if let Some(Handler::Union(resolver)) = self.handler(ty, Direction::Deserialize) {
            return resolver.deserialize(self, data, ty);
        }
        let json = data
            .as_tree()
            .ok_or(Error::UnsupportedFormat { format: Format::Xml })?;
        if let Some(kind) = PrimitiveKind::from_name(&ty.name) {
            return primitive_from_json(json, kind).map(Some);
        }
        let decoded = match ty.name.as_str() {
            NULL => match json {
                Json::Null => Value::Null,
                _ => return Err(Error::not_visitable(NULL, "data is not null")),
            },
            ARRAY => self.decode_list(json, ty)?,
            MIXED => Value::from_json(json),
            _ => self.decode_object(json, ty)?,
        };
        Ok(Some(decoded))
    }
}

/// The type a value would be encoded as with no declaration.
fn runtime_type(value: &Value) -> TypeDescriptor {
    let name = match value.kind() {
        ValueKind::Integer(_) => PrimitiveKind::Int.name(),
        ValueKind::Float(_) => PrimitiveKind::Float.name(),
        ValueKind::Boolean(_) => PrimitiveKind::Bool.name(),
        ValueKind::String(_) => PrimitiveKind::String.name(),
        ValueKind::Structured(name) => name,
    };
    TypeDescriptor::named(name)
}

fn primitive_to_json(scalar: Scalar<'_>, kind: PrimitiveKind) -> Result<Json> {
    let reject = |why: &str| Error::not_visitable(kind.name(), format!("`{}` {why}", scalar.text()));
    Ok(match (kind, scalar) {
        (PrimitiveKind::String, s) => Json::String(s.text().into_owned()),
        (PrimitiveKind::Int, Scalar::Int(i)) => Json::from(i),
        (PrimitiveKind::Int, s) => Json::from(s.text().parse::<i64>().map_err(|_| reject("is not an integer"))?),
        (PrimitiveKind::Float, Scalar::Int(i)) => float_json(i as f64).ok_or_else(|| reject("is not finite"))?,
        (PrimitiveKind::Float, Scalar::Float(f)) => float_json(f).ok_or_else(|| reject("is not finite"))?,
        (PrimitiveKind::Float, s) => {
            let f = s.text().parse::<f64>().map_err(|_| reject("is not a float"))?;
            float_json(f).ok_or_else(|| reject("is not finite"))?
        }
        (PrimitiveKind::Bool, Scalar::Bool(b)) => Json::Bool(b),
        (PrimitiveKind::Bool, s) => Json::Bool(s.text().parse::<bool>().map_err(|_| reject("is not a boolean"))?),
    })
}

fn primitive_from_json(json: &Json, kind: PrimitiveKind) -> Result<Value> {
    let scalar = Scalar::from_json(json)
        .ok_or_else(|| Error::not_visitable(kind.name(), "data is not a scalar"))?;
    let encoded = primitive_to_json(scalar, kind)?;
    Ok(Value::from_json(&encoded))
}

fn float_json(f: f64) -> Option<Json> {
    Number::from_f64(f).map(Json::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::model::ClassMetadata;
    use crate::types::Param;
    use crate::value::MarkupNode;
    use serde_json::json;

    fn ty(value: Json) -> TypeDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn zoo() -> Model {
        Model::new()
            .with_class(ClassMetadata::new("Cat").property("type", ty(json!("string"))).property("lives", ty(json!("int"))))
            .with_class(ClassMetadata::new("Dog").property("type", ty(json!("string"))).property("good", ty(json!("bool"))))
            .with_class(
                ClassMetadata::new("Circle")
                    .property("kind", ty(json!("string")))
                    .property("radius", ty(json!("float"))),
            )
            .with_class(ClassMetadata::new("Square").property("kind", ty(json!("string"))).property("side", ty(json!("int"))))
            .with_class(
                ClassMetadata::new("Pen")
                    .property("pet", ty(json!({"name": "union", "params": ["type"]})))
                    .property("shape", ty(json!({"name": "union", "params": ["kind", {"c": "Circle", "s": "Square"}]})))
                    .property("tag", ty(json!({"name": "union", "params": ["int", "bool", "string"]})))
                    .property("size", ty(json!({"name": "union", "params": ["int", "float"]}))),
            )
    }

    #[test]
    fn decodes_discriminated_members() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        let data = json!({
            "pet": {"type": "Cat", "lives": 9},
            "shape": {"kind": "s", "side": 3},
            "tag": "7",
            "size": "big"
        });
        let pen = nav.deserialize(&data, &TypeDescriptor::named("Pen")).unwrap().unwrap();
        let expected = Value::object(
            "Pen",
            [
                ("pet", Value::object("Cat", [("type", Value::String("Cat".into())), ("lives", Value::Int(9))])),
                ("shape", Value::object("Square", [("kind", Value::String("s".into())), ("side", Value::Int(3))])),
                ("tag", Value::Int(7)),
            ],
        );
        // `size` matched neither member and is left out
        assert_eq!(pen, expected);
    }

    #[test]
    fn round_trips_through_runtime_classes() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        let data = json!({
            "pet": {"type": "Dog", "good": true},
            "shape": {"kind": "c", "radius": 1.5},
            "tag": true,
            "size": 2.0
        });
        let pen = nav.deserialize(&data, &TypeDescriptor::named("Pen")).unwrap().unwrap();
        let encoded = nav.serialize(&pen, &TypeDescriptor::named("Pen")).unwrap().unwrap();
        assert_eq!(encoded, data);
    }

    #[test]
    fn serializes_scalars_by_declared_order() {
        let model = Model::new();
        let mut nav = JsonNavigator::new(&model);
        let int_first = ty(json!({"name": "union", "params": ["int", "string"]}));
        let string_first = ty(json!({"name": "union", "params": ["string", "int"]}));
        let value = Value::String("42".into());
        assert_eq!(nav.serialize(&value, &int_first).unwrap(), Some(json!(42)));
        assert_eq!(nav.serialize(&value, &string_first).unwrap(), Some(json!("42")));
    }

    #[test]
    fn class_members_reject_other_classes_then_fall_through() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        // a plain string is not a Cat, so the string member takes it
        let union = ty(json!({"name": "union", "params": ["Cat", "string"]}));
        let got = nav.serialize(&Value::String("tom".into()), &union).unwrap();
        assert_eq!(got, Some(json!("tom")));
    }

    #[test]
    fn unmatched_union_members_are_omitted() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        let pen = Value::object(
            "Pen",
            [("size", Value::String("big".into())), ("tag", Value::Bool(false))],
        );
        let encoded = nav.serialize(&pen, &TypeDescriptor::named("Pen")).unwrap();
        assert_eq!(encoded, Some(json!({"tag": false})));
    }

    #[test]
    fn lists_use_declared_or_runtime_item_types() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        let typed = TypeDescriptor::with_params("array", vec![Param::type_ref("float")]);
        let got = nav.serialize(&Value::List(vec![Value::Int(1), Value::Float(2.5)]), &typed).unwrap();
        assert_eq!(got, Some(json!([1.0, 2.5])));

        let untyped = TypeDescriptor::named("array");
        let cat = Value::object("Cat", [("lives", Value::Int(1))]);
        let got = nav.serialize(&Value::List(vec![Value::Null, cat]), &untyped).unwrap();
        assert_eq!(got, Some(json!([null, {"lives": 1}])));
    }

    #[test]
    fn unknown_classes_are_fatal() {
        let model = Model::new();
        let mut nav = JsonNavigator::new(&model);
        let err = nav.deserialize(&json!({}), &TypeDescriptor::named("Ghost")).unwrap_err();
        assert!(matches!(err, Error::UnknownType { type_name } if type_name == "Ghost"));

        let union = ty(json!({"name": "union", "params": ["type"]}));
        let err = nav.deserialize(&json!({"type": "Ghost"}), &union).unwrap_err();
        assert!(matches!(err, Error::UnknownType { .. }));
    }

    #[test]
    fn markup_data_is_refused() {
        let model = zoo();
        let mut nav = JsonNavigator::new(&model);
        let node = MarkupNode::new("pen");
        let union = ty(json!({"name": "union", "params": ["int", "string"]}));
        let err = DeserializeNavigator::accept(&mut nav, Decoded::Markup(&node), &union).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { format: Format::Xml }));
    }

    #[test]
    fn primitive_casts_are_strict() {
        assert_eq!(primitive_to_json(Scalar::Str("12"), PrimitiveKind::Int).unwrap(), json!(12));
        assert!(primitive_to_json(Scalar::Str("1.5"), PrimitiveKind::Int).unwrap_err().is_not_visitable());
        assert_eq!(primitive_to_json(Scalar::Int(2), PrimitiveKind::Float).unwrap(), json!(2.0));
        assert_eq!(primitive_to_json(Scalar::Str("false"), PrimitiveKind::Bool).unwrap(), json!(false));
        assert_eq!(primitive_to_json(Scalar::Float(0.5), PrimitiveKind::String).unwrap(), json!("0.5"));
        assert!(primitive_to_json(Scalar::Float(f64::NAN), PrimitiveKind::Float).unwrap_err().is_not_visitable());
    }

    #[test]
    fn non_finite_text_falls_through_to_string() {
        let model = Model::new();
        let mut nav = JsonNavigator::new(&model);
        let union = ty(json!({"name": "union", "params": ["float", "string"]}));
        for text in ["NaN", "inf", "-infinity"] {
            let got = nav.deserialize(&json!(text), &union).unwrap();
            assert_eq!(got, Some(Value::String(text.into())), "{text}");
            let got = nav.serialize(&Value::String(text.into()), &union).unwrap();
            assert_eq!(got, Some(json!(text)), "{text}");
        }
        let floats_only = ty(json!({"name": "union", "params": ["float"]}));
        assert_eq!(nav.deserialize(&json!("NaN"), &floats_only).unwrap(), None);
        assert!(primitive_to_json(Scalar::Str("inf"), PrimitiveKind::Float).unwrap_err().is_not_visitable());
    }

    #[test]
    fn integers_beyond_i64_are_not_widened_to_float() {
        let model = Model::new();
        let mut nav = JsonNavigator::new(&model);
        let big = json!(u64::MAX);
        let numbers = ty(json!({"name": "union", "params": ["int", "float"]}));
        assert_eq!(nav.deserialize(&big, &numbers).unwrap(), None);

        let with_string = ty(json!({"name": "union", "params": ["int", "float", "string"]}));
        let got = nav.deserialize(&big, &with_string).unwrap();
        assert_eq!(got, Some(Value::String("18446744073709551615".into())));
        assert!(primitive_to_json(Scalar::UInt(u64::MAX), PrimitiveKind::Int).unwrap_err().is_not_visitable());
    }

    #[test]
    fn without_handlers_union_is_not_visitable() {
        let model = Model::new();
        let mut nav = JsonNavigator::with_handlers(&model, HandlerRegistry::new());
        let union = ty(json!({"name": "union", "params": ["int"]}));
        let err = nav.serialize(&Value::Int(1), &union).unwrap_err();
        assert!(err.is_not_visitable());
    }
}
