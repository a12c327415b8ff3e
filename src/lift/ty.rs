//! Type-level lifting: inference of an op's output type for any input shape.
use tracing::{debug, trace};

use super::{Depth, MntOpts};
use crate::error::LiftError;
use crate::types::{union, ListType, TaggedType, Type};

// ------------------------------- Apply ----------------------------------- //

/// Lift `transform` through the wrappers of `ty` according to `opts`.
///
/// Returns [`LiftError::Invalid`] when `opts.dims` list layers are required
/// but not present on every branch.
pub fn mnt_type_apply<F>(ty: &Type, transform: F, opts: &MntOpts) -> Result<Type, LiftError>
where
    F: FnMut(&Type) -> Type,
{
    trace!(%ty, ?opts, "mnt_type_apply");
    let mut lift = TypeLift { opts, transform };
    lift.apply(ty, Depth::new(opts.max_depth))
}

struct TypeLift<'o, F> {
    opts: &'o MntOpts,
    transform: F,
}

impl<F> TypeLift<'_, F>
where
    F: FnMut(&Type) -> Type,
{
    fn apply(&mut self, ty: &Type, depth: Depth) -> Result<Type, LiftError> {
        let depth = depth.descend()?;
        let opts = self.opts;
        match ty {
            Type::Union(members) => {
                let lifted = members
                    .iter()
                    .map(|m| self.apply(m, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(union(lifted))
            }
            Type::None if !opts.nones => Ok(Type::None),
            Type::Tagged(tagged) if !opts.tags => {
                let inner = self.apply(&tagged.value, depth)?;
                Ok(retag_type(&tagged.tag, inner))
            }
            Type::List(list) if opts.dims == 0 => {
                let object_type = self.apply(&list.object_type, depth)?;
                Ok(Type::List(ListType {
                    object_type: Box::new(object_type),
                    min_length: list.min_length,
                    max_length: list.max_length,
                }))
            }
            Type::List(_) => {
                if type_has_dims(ty, opts.dims, depth)? {
                    Ok((self.transform)(ty))
                } else {
                    Err(invalid(ty, opts.dims))
                }
            }
            Type::Basic(_) | Type::TypedDict(_) if opts.dims > 0 => Err(invalid(ty, opts.dims)),
            // Leaves, plus nones and tags the op asked to see.
            Type::None | Type::Basic(_) | Type::TypedDict(_) | Type::Tagged(_) => {
                Ok((self.transform)(ty))
            }
        }
    }
}

fn invalid(ty: &Type, dims: usize) -> LiftError {
    debug!(%ty, dims, "input lacks the required list dimensions");
    LiftError::Invalid { dims }
}

/// Every branch of `ty` carries `dims` list layers, looking through tags and
/// letting nones pass.
fn type_has_dims(ty: &Type, dims: usize, depth: Depth) -> Result<bool, LiftError> {
    if dims == 0 {
        return Ok(true);
    }
    let depth = depth.descend()?;
    match ty {
        Type::Union(members) => {
            for m in members {
                if !type_has_dims(m, dims, depth)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Type::None => Ok(true),
        Type::Tagged(tagged) => type_has_dims(&tagged.value, dims, depth),
        Type::List(list) => type_has_dims(&list.object_type, dims - 1, depth),
        Type::Basic(_) | Type::TypedDict(_) => Ok(false),
    }
}

/// Put `tag` back around a lifted result.
///
/// A tagged result nests under the outer tag (`Tagged<Tagged<outer, t2>, v>`);
/// a union holding tagged members gets the tag distributed over each member.
pub(crate) fn retag_type(tag: &Type, inner: Type) -> Type {
    match inner {
        Type::Tagged(TaggedType { tag: inner_tag, value }) => Type::Tagged(TaggedType {
            tag: Box::new(Type::Tagged(TaggedType { tag: Box::new(tag.clone()), value: inner_tag })),
            value,
        }),
        Type::Union(members) if members.iter().any(Type::is_tagged) => {
            union(members.into_iter().map(|m| retag_type(tag, m)))
        }
        other => Type::Tagged(TaggedType { tag: Box::new(tag.clone()), value: Box::new(other) }),
    }
}

// ------------------------------- Strip ----------------------------------- //

/// The type `mnt_type_apply` would hand to its transform, without calling one.
pub fn mnt_type_strip(ty: &Type, opts: &MntOpts) -> Result<Type, LiftError> {
    strip(ty, opts, Depth::new(opts.max_depth))
}

fn strip(ty: &Type, opts: &MntOpts, depth: Depth) -> Result<Type, LiftError> {
    let depth = depth.descend()?;
    match ty {
        Type::Union(members) => {
            let stripped = members
                .iter()
                .map(|m| strip(m, opts, depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(union(stripped))
        }
        Type::None => Ok(Type::None),
        Type::Tagged(tagged) if !opts.tags => strip(&tagged.value, opts, depth),
        Type::List(list) if opts.dims == 0 => strip(&list.object_type, opts, depth),
        Type::List(_) => {
            if type_has_dims(ty, opts.dims, depth)? {
                Ok(ty.clone())
            } else {
                Err(invalid(ty, opts.dims))
            }
        }
        Type::Basic(_) | Type::TypedDict(_) if opts.dims > 0 => Err(invalid(ty, opts.dims)),
        Type::Basic(_) | Type::TypedDict(_) | Type::Tagged(_) => Ok(ty.clone()),
    }
}

// -------------------------- Nullable / taggable -------------------------- //

/// Apply `f` through unions, nones and tags only. Lists reach `f` whole.
///
/// Fails with [`LiftError::TooDeep`] past `max_depth` wrapper layers.
pub fn nullable_taggable_type<F>(ty: &Type, mut f: F, max_depth: usize) -> Result<Type, LiftError>
where
    F: FnMut(&Type) -> Type,
{
    walk_nullable_taggable(ty, Depth::new(max_depth), &mut |t, _| Ok(f(t)))
}

pub(crate) fn walk_nullable_taggable<F>(ty: &Type, depth: Depth, f: &mut F) -> Result<Type, LiftError>
where
    F: FnMut(&Type, Depth) -> Result<Type, LiftError>,
{
    let depth = depth.descend()?;
    match ty {
        Type::Union(members) => {
            let mut out = Vec::with_capacity(members.len());
            for m in members {
                out.push(walk_nullable_taggable(m, depth, f)?);
            }
            Ok(union(out))
        }
        Type::None => Ok(Type::None),
        Type::Tagged(tagged) => {
            let inner = walk_nullable_taggable(&tagged.value, depth, f)?;
            Ok(retag_type(&tagged.tag, inner))
        }
        Type::Basic(_) | Type::List(_) | Type::TypedDict(_) => f(ty, depth),
    }
}

// ------------------------------- Tests ------------------------------------ //
