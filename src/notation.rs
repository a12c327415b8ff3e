//! JSON notation for types and values.
//!
//! Types use the host language's notation (bare strings for leaves, a `type`
//! discriminator for compound shapes). Values are plain JSON, except that an
//! object with exactly the keys `_tag` and `_value` is a tagged value.
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::NotationError;
use crate::types::{self, ListType, TaggedType, Type};
use crate::value::Value;

const TAG_KEY: &str = "_tag";
const VALUE_KEY: &str = "_value";
const NONE_NAME: &str = "none";

// ————————————————————————————————————————————————————————————————————————————
// TYPE NOTATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum TypeRepr {
    Name(String),
    Compound(CompoundRepr),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub(crate) enum CompoundRepr {
    #[serde(rename_all = "camelCase")]
    List {
        object_type: Box<Type>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Union {
        members: Vec<Type>,
    },
    #[serde(rename_all = "camelCase")]
    TypedDict {
        property_types: IndexMap<String, Type>,
    },
    Tagged {
        tag: Box<Type>,
        value: Box<Type>,
    },
}

impl From<TypeRepr> for Type {
    fn from(repr: TypeRepr) -> Self {
        match repr {
            TypeRepr::Name(name) if name == NONE_NAME => Type::None,
            TypeRepr::Name(name) => Type::Basic(name),
            TypeRepr::Compound(CompoundRepr::List { object_type, min_length, max_length }) => {
                Type::List(ListType { object_type, min_length, max_length })
            }
            TypeRepr::Compound(CompoundRepr::Union { members }) => types::union(members),
            TypeRepr::Compound(CompoundRepr::TypedDict { property_types }) => {
                Type::TypedDict(property_types)
            }
            TypeRepr::Compound(CompoundRepr::Tagged { tag, value }) => {
                Type::Tagged(TaggedType { tag, value })
            }
        }
    }
}

impl From<Type> for TypeRepr {
    fn from(ty: Type) -> Self {
        match ty {
            Type::None => TypeRepr::Name(NONE_NAME.to_string()),
            Type::Basic(name) => TypeRepr::Name(name),
            Type::List(ListType { object_type, min_length, max_length }) => {
                TypeRepr::Compound(CompoundRepr::List { object_type, min_length, max_length })
            }
            Type::Union(members) => TypeRepr::Compound(CompoundRepr::Union { members }),
            Type::TypedDict(property_types) => {
                TypeRepr::Compound(CompoundRepr::TypedDict { property_types })
            }
            Type::Tagged(TaggedType { tag, value }) => {
                TypeRepr::Compound(CompoundRepr::Tagged { tag, value })
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// VALUE NOTATION
// ————————————————————————————————————————————————————————————————————————————

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN))),
            },
            J::String(s) => Value::Str(s),
            J::Array(xs) => Value::List(xs.into_iter().map(Value::from).collect()),
            J::Object(mut map) => {
                if map.len() == 2 && map.contains_key(TAG_KEY) && map.contains_key(VALUE_KEY) {
                    let tag = map.remove(TAG_KEY).unwrap_or_default();
                    let value = map.remove(VALUE_KEY).unwrap_or_default();
                    return Value::tagged(tag.into(), value.into());
                }
                Value::Dict(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        use serde_json::Value as J;
        match value {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(b),
            Value::Int(i) => J::from(i),
            // Non-finite floats have no JSON spelling; serde_json maps them to null.
            Value::Float(f) => J::from(f.0),
            Value::Str(s) => J::String(s),
            Value::List(items) => J::Array(items.into_iter().map(J::from).collect()),
            Value::Dict(fields) => J::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Value::Tagged { tag, value } => {
                let mut map = serde_json::Map::new();
                map.insert(TAG_KEY.to_string(), (*tag).into());
                map.insert(VALUE_KEY.to_string(), (*value).into());
                J::Object(map)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECODING
// ————————————————————————————————————————————————————————————————————————————

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, NotationError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        NotationError::Decode { path, message: err.into_inner().to_string() }
    })
}

pub fn parse_type(src: &str) -> Result<Type, NotationError> {
    from_str_with_path(src)
}

pub fn parse_value(src: &str) -> Result<Value, NotationError> {
    from_str_with_path(src)
}

// ------------------------------- Tests ------------------------------------ //
