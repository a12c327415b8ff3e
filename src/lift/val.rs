//! Value-level lifting: execution of an op against an actual input.
//!
//! Mirrors `ty` step for step. Values carry no unions, so a union type's
//! member is selected by the value's own shape.
use tracing::{debug, trace};

use super::{Depth, MntOpts};
use crate::error::LiftError;
use crate::value::Value;

pub fn mnt_value_apply<F>(value: &Value, transform: F, opts: &MntOpts) -> Result<Value, LiftError>
where
    F: FnMut(&Value) -> Value,
{
    trace!(?opts, "mnt_value_apply");
    let mut lift = ValueLift { opts, transform };
    lift.apply(value, Depth::new(opts.max_depth))
}

struct ValueLift<'o, F> {
    opts: &'o MntOpts,
    transform: F,
}

impl<F> ValueLift<'_, F>
where
    F: FnMut(&Value) -> Value,
{
    fn apply(&mut self, value: &Value, depth: Depth) -> Result<Value, LiftError> {
        let depth = depth.descend()?;
        let opts = self.opts;
        match value {
            Value::Null if !opts.nones => Ok(Value::Null),
            Value::Tagged { tag, value: inner } if !opts.tags => {
                let inner = self.apply(inner, depth)?;
                Ok(retag_value(tag, inner))
            }
            Value::List(items) if opts.dims == 0 => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.apply(item, depth)?);
                }
                Ok(Value::List(out))
            }
            Value::List(_) => {
                if value_has_dims(value, opts.dims, depth)? {
                    Ok((self.transform)(value))
                } else {
                    Err(invalid(opts.dims))
                }
            }
            // Nones and tags the op asked to see.
            Value::Null | Value::Tagged { .. } => Ok((self.transform)(value)),
            _ if opts.dims > 0 => Err(invalid(opts.dims)),
            _ => Ok((self.transform)(value)),
        }
    }
}

fn invalid(dims: usize) -> LiftError {
    debug!(dims, "value lacks the required list dimensions");
    LiftError::Invalid { dims }
}

fn value_has_dims(value: &Value, dims: usize, depth: Depth) -> Result<bool, LiftError> {
    if dims == 0 {
        return Ok(true);
    }
    let depth = depth.descend()?;
    match value {
        Value::Null => Ok(true),
        Value::Tagged { value, .. } => value_has_dims(value, dims, depth),
        Value::List(items) => {
            for item in items {
                if !value_has_dims(item, dims - 1, depth)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Value counterpart of `ty::retag_type`: a tagged result nests under `tag`.
pub(crate) fn retag_value(tag: &Value, inner: Value) -> Value {
    match inner {
        Value::Tagged { tag: inner_tag, value } => Value::Tagged {
            tag: Box::new(Value::Tagged { tag: Box::new(tag.clone()), value: inner_tag }),
            value,
        },
        other => Value::tagged(tag.clone(), other),
    }
}

/// Apply `f` through nulls and tags only. Lists reach `f` whole.
pub fn nullable_taggable_value<F>(value: &Value, mut f: F, max_depth: usize) -> Result<Value, LiftError>
where
    F: FnMut(&Value) -> Value,
{
    walk_nullable_taggable(value, Depth::new(max_depth), &mut |v, _| Ok(f(v)))
}

pub(crate) fn walk_nullable_taggable<F>(value: &Value, depth: Depth, f: &mut F) -> Result<Value, LiftError>
where
    F: FnMut(&Value, Depth) -> Result<Value, LiftError>,
{
    let depth = depth.descend()?;
    match value {
        Value::Null => Ok(Value::Null),
        Value::Tagged { tag, value: inner } => {
            let inner = walk_nullable_taggable(inner, depth, f)?;
            Ok(retag_value(tag, inner))
        }
        _ => f(value, depth),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn str_len(v: &Value) -> Value {
        match v {
            Value::Str(s) => Value::Int(s.chars().count() as i64),
            _ => Value::Null,
        }
    }

    fn join(v: &Value) -> Value {
        let items = v.as_list().unwrap_or_default();
        let joined: String = items
            .iter()
            .map(|item| match item {
                Value::Str(s) => s.clone(),
                Value::Int(i) => i.to_string(),
                other => format!("{other:?}"),
            })
            .collect();
        Value::Str(joined)
    }

    #[test]
    fn lists_map_elementwise_and_nulls_pass() {
        let input = Value::list([Value::list(["ab".into(), Value::Null]), Value::list([])]);
        let out = mnt_value_apply(&input, str_len, &MntOpts::default()).unwrap();
        assert_eq!(out, Value::list([Value::list([2i64.into(), Value::Null]), Value::list([])]));
    }

    #[test]
    fn tagged_results_nest_under_the_input_tag() {
        let input = Value::tagged(Value::dict([("l1", "x".into())]), "abc".into());
        let out = mnt_value_apply(
            &input,
            |v| Value::tagged(Value::dict([("l2", true.into())]), str_len(v)),
            &MntOpts::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            Value::tagged(
                Value::tagged(Value::dict([("l1", "x".into())]), Value::dict([("l2", true.into())])),
                3i64.into(),
            )
        );
    }

    #[test]
    fn tagged_null_comes_back_unchanged() {
        let input = Value::tagged("t".into(), Value::Null);
        let out = mnt_value_apply(&input, |_| panic!("transform must not run"), &MntOpts::default());
        assert_eq!(out.unwrap(), input);
    }

    #[test]
    fn dims_join_the_whole_array_once() {
        let input = Value::list([1i64.into(), 2i64.into()]);
        let mut calls = 0;
        let out = mnt_value_apply(
            &input,
            |v| {
                calls += 1;
                join(v)
            },
            &MntOpts::dims(1),
        );
        assert_eq!(out.unwrap(), Value::from("12"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn dims_on_a_scalar_is_invalid() {
        let err = mnt_value_apply(&"x".into(), join, &MntOpts::dims(1)).unwrap_err();
        assert!(err.is_invalid());
        let ragged = Value::list([Value::list([]), "x".into()]);
        assert!(mnt_value_apply(&ragged, join, &MntOpts::dims(2)).unwrap_err().is_invalid());
    }

    #[test]
    fn dims_keep_outer_tags() {
        let input = Value::tagged("run".into(), Value::list(["a".into(), "b".into()]));
        let out = mnt_value_apply(&input, join, &MntOpts::dims(1)).unwrap();
        assert_eq!(out, Value::tagged("run".into(), "ab".into()));
    }

    #[test]
    fn nones_and_tags_reach_transform_when_requested() {
        let is_null = |v: &Value| Value::Bool(v.is_null());
        let out = mnt_value_apply(&Value::list([Value::Null, 1i64.into()]), is_null, &MntOpts::default().with_nones());
        assert_eq!(out.unwrap(), Value::list([true.into(), false.into()]));

        let tag_of = |v: &Value| match v {
            Value::Tagged { tag, .. } => (**tag).clone(),
            _ => Value::Null,
        };
        let input = Value::list([Value::tagged("a".into(), 1i64.into()), 2i64.into()]);
        let out = mnt_value_apply(&input, tag_of, &MntOpts::default().with_tags());
        assert_eq!(out.unwrap(), Value::list(["a".into(), Value::Null]));
    }

    #[test]
    fn nullable_taggable_value_leaves_lists_whole() {
        let input = Value::tagged("t".into(), Value::list([1i64.into()]));
        let out = nullable_taggable_value(
            &input,
            |v| Value::Int(v.as_list().map_or(0, |xs| xs.len() as i64)),
            crate::lift::DEFAULT_MAX_DEPTH,
        );
        assert_eq!(out.unwrap(), Value::tagged("t".into(), 1i64.into()));
    }

    #[test]
    fn nullable_taggable_value_honours_the_given_limit() {
        let input = (0..6).fold(Value::from("x"), |inner, _| Value::tagged(1i64.into(), inner));
        assert_eq!(
            nullable_taggable_value(&input, str_len, 3).unwrap_err(),
            LiftError::TooDeep { limit: 3 }
        );
        assert_eq!(
            nullable_taggable_value(&input, str_len, 16).unwrap(),
            (0..6).fold(Value::Int(1), |inner, _| Value::tagged(1i64.into(), inner))
        );
    }
}
