//! Builtin leaf ops, one per lifting regime.
use crate::lift::MntOpts;
use crate::standard_op::LeafOp;
use crate::types::{basic, Type};
use crate::value::Value;

pub fn all() -> [LeafOp; 6] {
    [
        LeafOp::standard("string-len", string_len_type, string_len),
        LeafOp::standard("number-negate", number_negate_type, number_negate),
        LeafOp::standard("count", |_| basic("number"), count).with_opts(MntOpts::dims(1)),
        LeafOp::standard("join", |_| basic("string"), join).with_opts(MntOpts::dims(1)),
        LeafOp::standard("is-none", |_| basic("boolean"), |v| Value::Bool(v.is_null()))
            .with_opts(MntOpts::default().with_nones()),
        LeafOp::standard("tag-of", tag_of_type, tag_of).with_opts(MntOpts::default().with_tags()),
    ]
}

pub fn lookup(name: &str) -> Option<LeafOp> {
    all().into_iter().find(|op| op.name == name)
}

// ------------------------------ Leaf rules ------------------------------- //

fn string_len_type(ty: &Type) -> Type {
    match ty {
        Type::Basic(name) if name == "string" => basic("number"),
        _ => Type::None,
    }
}

fn string_len(v: &Value) -> Value {
    match v {
        Value::Str(s) => Value::Int(s.chars().count() as i64),
        _ => Value::Null,
    }
}

fn number_negate_type(ty: &Type) -> Type {
    match ty {
        Type::Basic(name) if matches!(name.as_str(), "number" | "int" | "float") => ty.clone(),
        _ => Type::None,
    }
}

fn number_negate(v: &Value) -> Value {
    match v {
        Value::Int(i) => i.checked_neg().map_or_else(|| Value::from(-(*i as f64)), Value::Int),
        Value::Float(f) => Value::Float(-*f),
        _ => Value::Null,
    }
}

fn count(v: &Value) -> Value {
    match v {
        Value::List(items) => Value::Int(items.len() as i64),
        _ => Value::Null,
    }
}

/// Concatenates the text of each element; nulls contribute nothing.
fn join(v: &Value) -> Value {
    let Some(items) = v.as_list() else {
        return Value::Null;
    };
    let mut out = String::new();
    for item in items {
        match item {
            Value::Null => {}
            Value::Str(s) => out.push_str(s),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&f.to_string()),
            Value::Bool(b) => out.push_str(&b.to_string()),
            other => out.push_str(&serde_json::Value::from(other.clone()).to_string()),
        }
    }
    Value::Str(out)
}

fn tag_of_type(ty: &Type) -> Type {
    match ty {
        Type::Tagged(tagged) => (*tagged.tag).clone(),
        _ => Type::None,
    }
}

fn tag_of(v: &Value) -> Value {
    match v {
        Value::Tagged { tag, .. } => (**tag).clone(),
        _ => Value::Null,
    }
}

// ------------------------------- Tests ------------------------------------ //
