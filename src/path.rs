//! Field paths over typed dicts and lists, with `*` wildcards.
//!
//! Each step looks through nones and tags the same way a standard op does,
//! so `Maybe<{a: T}>` resolves `a` to `Maybe<T>` and a tagged row keeps its
//! tag around the resolved field.
use crate::error::LiftError;
use crate::lift::ty::walk_nullable_taggable as walk_type;
use crate::lift::val::walk_nullable_taggable as walk_value;
use crate::lift::{Depth, DEFAULT_MAX_DEPTH};
use crate::types::{ListType, PropertyTypes, Type};
use crate::value::Value;

pub const WILDCARD: &str = "*";

/// `"*.t_2.a"` → `["*", "t_2", "a"]`. An empty reference is the empty path.
pub fn split_path(reference: &str) -> Vec<String> {
    if reference.is_empty() {
        return Vec::new();
    }
    reference.split('.').map(str::to_string).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub fn typed_dict_path_type<S: AsRef<str>>(ty: &Type, path: &[S]) -> Result<Type, LiftError> {
    typed_dict_path_type_with_limit(ty, path, DEFAULT_MAX_DEPTH)
}

/// [`typed_dict_path_type`] with an explicit nesting limit.
pub fn typed_dict_path_type_with_limit<S: AsRef<str>>(
    ty: &Type,
    path: &[S],
    max_depth: usize,
) -> Result<Type, LiftError> {
    path_type(ty, path, Depth::new(max_depth))
}

fn path_type<S: AsRef<str>>(ty: &Type, path: &[S], depth: Depth) -> Result<Type, LiftError> {
    let Some((key, rest)) = path.split_first() else {
        return Ok(ty.clone());
    };
    let key = key.as_ref();
    walk_type(ty, depth, &mut |inner, depth| match inner {
        Type::TypedDict(props) => dict_path_type(props, key, rest, depth),
        Type::List(list) => list_path_type(list, path, depth),
        Type::None | Type::Basic(_) | Type::Union(_) | Type::Tagged(_) => Ok(Type::None),
    })
}

fn dict_path_type<S: AsRef<str>>(
    props: &PropertyTypes,
    key: &str,
    rest: &[S],
    depth: Depth,
) -> Result<Type, LiftError> {
    if key == WILDCARD {
        let mut out = PropertyTypes::with_capacity(props.len());
        for (name, field) in props {
            out.insert(name.clone(), path_type(field, rest, depth)?);
        }
        return Ok(Type::TypedDict(out));
    }
    match props.get(key) {
        Some(field) => path_type(field, rest, depth),
        None => Ok(Type::None),
    }
}

/// `*` steps into each element; a literal key is plucked from each element.
fn list_path_type<S: AsRef<str>>(list: &ListType, path: &[S], depth: Depth) -> Result<Type, LiftError> {
    let per_element = match path.split_first() {
        Some((key, rest)) if key.as_ref() == WILDCARD => {
            if rest.is_empty() {
                return Ok(Type::List(list.clone()));
            }
            rest
        }
        _ => path,
    };
    Ok(Type::List(ListType {
        object_type: Box::new(path_type(&list.object_type, per_element, depth)?),
        min_length: list.min_length,
        max_length: list.max_length,
    }))
}

// ————————————————————————————————————————————————————————————————————————————
// VALUES
// ————————————————————————————————————————————————————————————————————————————

pub fn typed_dict_path_val<S: AsRef<str>>(value: &Value, path: &[S]) -> Result<Value, LiftError> {
    typed_dict_path_val_with_limit(value, path, DEFAULT_MAX_DEPTH)
}

pub fn typed_dict_path_val_with_limit<S: AsRef<str>>(
    value: &Value,
    path: &[S],
    max_depth: usize,
) -> Result<Value, LiftError> {
    path_val(value, path, Depth::new(max_depth))
}

fn path_val<S: AsRef<str>>(value: &Value, path: &[S], depth: Depth) -> Result<Value, LiftError> {
    let Some((key, rest)) = path.split_first() else {
        return Ok(value.clone());
    };
    let key = key.as_ref();
    walk_value(value, depth, &mut |inner, depth| match inner {
        Value::Dict(fields) => {
            if key == WILDCARD {
                let mut out = indexmap::IndexMap::with_capacity(fields.len());
                for (name, field) in fields {
                    out.insert(name.clone(), path_val(field, rest, depth)?);
                }
                return Ok(Value::Dict(out));
            }
            match fields.get(key) {
                Some(field) => path_val(field, rest, depth),
                None => Ok(Value::Null),
            }
        }
        Value::List(items) => {
            let per_element = if key == WILDCARD {
                if rest.is_empty() {
                    return Ok(inner.clone());
                }
                rest
            } else {
                path
            };
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(path_val(item, per_element, depth)?);
            }
            Ok(Value::List(out))
        }
        _ => Ok(Value::Null),
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{basic, list, maybe, tagged_value, typed_dict, union};
    use pretty_assertions::assert_eq;

    fn n() -> Type { basic("number") }
    fn s() -> Type { basic("string") }

    #[test]
    fn single_key() {
        assert_eq!(typed_dict_path_type(&typed_dict([("a", n())]), &["a"]).unwrap(), n());
    }

    #[test]
    fn empty_path_is_identity() {
        let ty = typed_dict([("a", n())]);
        let empty: [&str; 0] = [];
        assert_eq!(typed_dict_path_type(&ty, &empty).unwrap(), ty);
        assert_eq!(split_path(""), Vec::<String>::new());
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(typed_dict_path_type(&typed_dict([("a", n())]), &["b"]).unwrap(), Type::None);
        let v = Value::dict([("a", 1i64.into())]);
        assert_eq!(typed_dict_path_val(&v, &["b"]).unwrap(), Value::Null);
    }

    #[test]
    fn wildcard_over_dict_keeps_keys() {
        let ty = typed_dict([
            ("a", typed_dict([("b", n())])),
            ("c", typed_dict([("b", n())])),
        ]);
        assert_eq!(
            typed_dict_path_type(&ty, &["*", "b"]).unwrap(),
            typed_dict([("a", n()), ("c", n())])
        );
        let v = Value::dict([
            ("a", Value::dict([("b", 5i64.into())])),
            ("c", Value::dict([("b", 6i64.into())])),
        ]);
        assert_eq!(
            typed_dict_path_val(&v, &["*", "b"]).unwrap(),
            Value::dict([("a", 5i64.into()), ("c", 6i64.into())])
        );
    }

    #[test]
    fn wildcard_over_list() {
        let row = typed_dict([("a", n())]);
        assert_eq!(typed_dict_path_type(&list(row.clone()), &["*"]).unwrap(), list(row.clone()));
        assert_eq!(typed_dict_path_type(&list(row), &["*", "a"]).unwrap(), list(n()));

        let v = Value::list([Value::dict([("a", 1i64.into())]), Value::dict::<&str, _>([])]);
        assert_eq!(typed_dict_path_val(&v, &["*"]).unwrap(), v);
        assert_eq!(
            typed_dict_path_val(&v, &["*", "a"]).unwrap(),
            Value::list([1i64.into(), Value::Null])
        );
    }

    #[test]
    fn literal_key_plucks_from_list_elements() {
        let ty = list(typed_dict([("a", n())]));
        assert_eq!(typed_dict_path_type(&ty, &["a"]).unwrap(), list(n()));

        let v = Value::list([
            Value::dict([("a", 1i64.into()), ("b", "x".into())]),
            Value::dict([("b", "y".into())]),
            Value::Null,
        ]);
        assert_eq!(
            typed_dict_path_val(&v, &["a"]).unwrap(),
            Value::list([1i64.into(), Value::Null, Value::Null])
        );

        let nested = Value::list([Value::list([Value::dict([("a", 2i64.into())])])]);
        assert_eq!(
            typed_dict_path_val(&nested, &["a"]).unwrap(),
            Value::list([Value::list([2i64.into()])])
        );
    }

    #[test]
    fn callers_can_tighten_the_depth_limit() {
        let mut ty = typed_dict([("a", n())]);
        let mut v = Value::dict([("a", 1i64.into())]);
        for _ in 0..8 {
            ty = list(ty);
            v = Value::list([v]);
        }
        assert_eq!(
            typed_dict_path_type_with_limit(&ty, &["a"], 4).unwrap_err(),
            LiftError::TooDeep { limit: 4 }
        );
        assert_eq!(
            typed_dict_path_val_with_limit(&v, &["a"], 4).unwrap_err(),
            LiftError::TooDeep { limit: 4 }
        );
        assert!(typed_dict_path_type_with_limit(&ty, &["a"], 64).is_ok());
        assert!(typed_dict_path_val(&v, &["a"]).is_ok());
    }

    #[test]
    fn scalar_with_path_left_is_none() {
        let ty = typed_dict([("a", n())]);
        assert_eq!(typed_dict_path_type(&ty, &["a", "b"]).unwrap(), Type::None);
        let v = Value::dict([("a", 1i64.into())]);
        assert_eq!(typed_dict_path_val(&v, &["a", "b"]).unwrap(), Value::Null);
    }

    #[test]
    fn steps_look_through_maybe_and_tags() {
        let row = typed_dict([("a", s())]);
        let ty = maybe(tagged_value(n(), row));
        assert_eq!(typed_dict_path_type(&ty, &["a"]).unwrap(), maybe(tagged_value(n(), s())));

        let v = Value::tagged(1i64.into(), Value::dict([("a", "x".into())]));
        assert_eq!(
            typed_dict_path_val(&v, &["a"]).unwrap(),
            Value::tagged(1i64.into(), "x".into())
        );
        assert_eq!(typed_dict_path_val(&Value::Null, &["a"]).unwrap(), Value::Null);
    }

    #[test]
    fn union_rows_resolve_per_member() {
        let ty = union([typed_dict([("a", n())]), typed_dict([("b", s())])]);
        assert_eq!(typed_dict_path_type(&ty, &["a"]).unwrap(), maybe(n()));
    }

    #[test]
    fn dotted_references_resolve_deeply() {
        let leaf = typed_dict([("a", n())]);
        let row = typed_dict([("t_2", typed_dict([("t_1", leaf)]))]);
        let ty = typed_dict([("x", row.clone()), ("y", row)]);
        let path = split_path("*.t_2.t_1.a");
        assert_eq!(
            typed_dict_path_type(&ty, &path).unwrap(),
            typed_dict([("x", n()), ("y", n())])
        );
    }
}
