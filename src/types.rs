//! Structural types for lifted ops.
//!
//! A closed set of shapes: absence, opaque leaves, lists, unions, typed dicts
//! and tagged values. Unions are always kept in normal form (flat, no
//! duplicates, single members collapsed) by the `union` constructor, so every
//! other module can match on a `Type` without re-normalizing.
use std::fmt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name → field type. Order is preserved for display, ignored by equality.
pub type PropertyTypes = IndexMap<String, Type>;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "crate::notation::TypeRepr", into = "crate::notation::TypeRepr")]
pub enum Type {
    None,
    Basic(String),
    List(ListType),
    /// Use [`union`] to build one; the variant itself does not normalize.
    Union(Vec<Type>),
    TypedDict(PropertyTypes),
    Tagged(TaggedType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    pub object_type: Box<Type>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedType {
    pub tag: Box<Type>,
    pub value: Box<Type>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

pub fn basic(name: impl Into<String>) -> Type {
    Type::Basic(name.into())
}

pub fn list(object_type: Type) -> Type {
    list_with_length(object_type, None, None)
}

pub fn list_with_length(object_type: Type, min_length: Option<u32>, max_length: Option<u32>) -> Type {
    Type::List(ListType {
        object_type: Box::new(object_type),
        min_length,
        max_length,
    })
}

/// `Maybe<T>` is spelled `Union([None, T])`.
pub fn maybe(ty: Type) -> Type {
    union([Type::None, ty])
}

/// Plain constructor: wraps `value` in one tag layer, no merging.
pub fn tagged_value(tag: Type, value: Type) -> Type {
    Type::Tagged(TaggedType {
        tag: Box::new(tag),
        value: Box::new(value),
    })
}

pub fn typed_dict<K, I>(fields: I) -> Type
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Type)>,
{
    Type::TypedDict(fields.into_iter().map(|(k, t)| (k.into(), t)).collect())
}

/// Normalizing union: nested unions are flattened, structural duplicates
/// dropped (first occurrence wins), and a single survivor is returned bare.
pub fn union<I>(members: I) -> Type
where
    I: IntoIterator<Item = Type>,
{
    let mut flat: Vec<Type> = Vec::new();
    for member in members {
        push_flat(&mut flat, member);
    }
    if flat.len() == 1 {
        return flat.remove(0);
    }
    Type::Union(flat)
}

fn push_flat(out: &mut Vec<Type>, ty: Type) {
    match ty {
        Type::Union(members) => {
            for m in members { push_flat(out, m); }
        }
        other => {
            if !out.contains(&other) { out.push(other); }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// QUERIES
// ————————————————————————————————————————————————————————————————————————————

impl Type {
    pub fn none() -> Self { Type::None }

    pub fn is_none(&self) -> bool { matches!(self, Type::None) }

    pub fn is_tagged(&self) -> bool { matches!(self, Type::Tagged(_)) }

    pub fn is_list(&self) -> bool { matches!(self, Type::List(_)) }

    /// True for `None` itself and for unions with a `None` member.
    pub fn is_nullable(&self) -> bool {
        match self {
            Type::None => true,
            Type::Union(members) => members.iter().any(Type::is_nullable),
            _ => false,
        }
    }

    /// The type with every `None` member removed. `None` alone stays `None`.
    pub fn non_none(&self) -> Type {
        match self {
            Type::Union(members) => {
                let kept: Vec<Type> = members.iter().filter(|m| !m.is_none()).cloned().collect();
                if kept.is_empty() { Type::None } else { union(kept) }
            }
            other => other.clone(),
        }
    }

    pub fn members(&self) -> &[Type] {
        match self {
            Type::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }
}

// Structural equality: unions compare as sets, typed dicts as maps.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::None, Type::None) => true,
            (Type::Basic(a), Type::Basic(b)) => a == b,
            (Type::List(a), Type::List(b)) => a == b,
            (Type::Union(a), Type::Union(b)) => {
                a.len() == b.len() && a.iter().all(|m| b.contains(m))
            }
            (Type::TypedDict(a), Type::TypedDict(b)) => a == b,
            (Type::Tagged(a), Type::Tagged(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Type {}

// ————————————————————————————————————————————————————————————————————————————
// DISPLAY
// ————————————————————————————————————————————————————————————————————————————

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::None => write!(f, "none"),
            Type::Basic(name) => write!(f, "{name}"),
            Type::List(list) => write!(f, "List<{}>", list.object_type),
            Type::Union(members) => {
                if members.len() == 2 && members.iter().any(Type::is_none) {
                    let inner = members.iter().find(|m| !m.is_none()).unwrap_or(&Type::None);
                    return write!(f, "Maybe<{inner}>");
                }
                write!(f, "Union<")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 { write!(f, " | ")?; }
                    write!(f, "{m}")?;
                }
                write!(f, ">")
            }
            Type::TypedDict(props) => {
                write!(f, "{{")?;
                for (i, (k, t)) in props.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {t}")?;
                }
                write!(f, "}}")
            }
            Type::Tagged(tagged) => write!(f, "Tagged<{}, {}>", tagged.tag, tagged.value),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s() -> Type { basic("string") }
    fn n() -> Type { basic("number") }
    fn b() -> Type { basic("boolean") }

    #[test]
    fn union_flattens_and_dedupes() {
        let nested = union([union([s(), n()]), b()]);
        assert_eq!(nested, union([s(), n(), b()]));
        assert_eq!(union([s(), s(), n(), s()]), union([n(), s()]));
        match union([union([s(), n()]), union([n(), b()])]) {
            Type::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected a union, got {other}"),
        }
    }

    #[test]
    fn union_normalization_is_idempotent() {
        let once = union([s(), union([Type::None, n()])]);
        let twice = union([once.clone()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn single_member_union_collapses() {
        assert_eq!(union([s(), s()]), s());
        assert_eq!(union([union([s()])]), s());
    }

    #[test]
    fn empty_union_is_kept() {
        assert_eq!(union(Vec::new()), Type::Union(Vec::new()));
    }

    #[test]
    fn union_dedupes_structurally_not_by_identity() {
        let a = typed_dict([("x", s())]);
        let b_ = typed_dict([("x", s())]);
        assert_eq!(union([a, b_]), typed_dict([("x", s())]));
    }

    #[test]
    fn typed_dict_equality_ignores_field_order() {
        let a = typed_dict([("x", s()), ("y", n())]);
        let b_ = typed_dict([("y", n()), ("x", s())]);
        assert_eq!(a, b_);
    }

    #[test]
    fn tag_order_is_significant() {
        let a = typed_dict([("a", s())]);
        let b_ = typed_dict([("b", s())]);
        let ab = tagged_value(a.clone(), tagged_value(b_.clone(), n()));
        let ba = tagged_value(b_, tagged_value(a, n()));
        assert_ne!(ab, ba);
    }

    #[test]
    fn maybe_of_maybe_is_maybe() {
        assert_eq!(maybe(maybe(s())), maybe(s()));
        assert!(maybe(s()).is_nullable());
        assert_eq!(maybe(s()).non_none(), s());
        assert_eq!(Type::None.non_none(), Type::None);
    }

    #[test]
    fn display_reads_like_the_notation() {
        assert_eq!(maybe(list(s())).to_string(), "Maybe<List<string>>");
        assert_eq!(
            tagged_value(typed_dict([("run", s())]), n()).to_string(),
            "Tagged<{run: string}, number>"
        );
        assert_eq!(union([s(), n(), b()]).to_string(), "Union<string | number | boolean>");
    }
}
