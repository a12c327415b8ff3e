//! Runtime values, shaped like [`Type`].
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::{self, Type};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    List(Vec<Value>),
    Dict(IndexMap<String, Value>),
    Tagged { tag: Box<Value>, value: Box<Value> },
}

impl Value {
    pub fn tagged(tag: Value, value: Value) -> Self {
        Value::Tagged { tag: Box::new(tag), value: Box::new(value) }
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn dict<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Dict(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Most specific type inhabited by this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::None,
            Value::Bool(_) => types::basic("boolean"),
            Value::Int(_) | Value::Float(_) => types::basic("number"),
            Value::Str(_) => types::basic("string"),
            Value::List(items) => types::list(types::union(items.iter().map(Value::type_of))),
            Value::Dict(fields) => {
                Type::TypedDict(fields.iter().map(|(k, v)| (k.clone(), v.type_of())).collect())
            }
            Value::Tagged { tag, value } => types::tagged_value(tag.type_of(), value.type_of()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self { Value::Float(OrderedFloat(f)) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}

// ————————————————————————————————————————————————————————————————————————————
// CONFORMANCE
// ————————————————————————————————————————————————————————————————————————————

/// Does `value` inhabit `ty`?
///
/// List length bounds are checked here even though the lifting engine treats
/// them as advisory.
pub fn conforms(ty: &Type, value: &Value) -> bool {
    match (ty, value) {
        (Type::Union(members), v) => members.iter().any(|m| conforms(m, v)),
        (Type::Basic(name), v) if name == "any" => !matches!(v, Value::Tagged { .. }),
        (Type::None, Value::Null) => true,
        (Type::Basic(name), v) => basic_admits(name, v),
        (Type::List(list), Value::List(items)) => {
            let len = items.len() as u32;
            list.min_length.is_none_or(|min| len >= min)
                && list.max_length.is_none_or(|max| len <= max)
                && items.iter().all(|item| conforms(&list.object_type, item))
        }
        (Type::TypedDict(props), Value::Dict(fields)) => {
            fields.keys().all(|k| props.contains_key(k))
                && props.iter().all(|(k, t)| match fields.get(k) {
                    Some(v) => conforms(t, v),
                    None => t.is_nullable(),
                })
        }
        (Type::Tagged(tagged), Value::Tagged { tag, value }) => {
            conforms(&tagged.tag, tag) && conforms(&tagged.value, value)
        }
        _ => false,
    }
}

fn basic_admits(name: &str, value: &Value) -> bool {
    match (name, value) {
        ("string", Value::Str(_)) => true,
        ("boolean", Value::Bool(_)) => true,
        ("number", Value::Int(_) | Value::Float(_)) => true,
        ("int", Value::Int(_)) => true,
        ("float", Value::Float(_)) => true,
        _ => false,
    }
}

// ------------------------------- Tests ------------------------------------ //
