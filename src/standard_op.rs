//! The lifting rule every ordinary op uses.
//!
//! `standard_op_*` run the engine with default options: elementwise through
//! any list nesting, tags unwrapped and re-accumulated, nones short-circuited.
//! [`LeafOp`] bundles the two leaf functions of an op definition with the
//! options it is lifted under.
use std::fmt;

use crate::error::LiftError;
use crate::lift::{mnt_type_apply, mnt_value_apply, MntOpts};
use crate::types::Type;
use crate::value::Value;

pub fn standard_op_type<F>(ty: &Type, f: F) -> Result<Type, LiftError>
where
    F: FnMut(&Type) -> Type,
{
    mnt_type_apply(ty, f, &MntOpts::default())
}

pub fn standard_op_value<F>(value: &Value, f: F) -> Result<Value, LiftError>
where
    F: FnMut(&Value) -> Value,
{
    mnt_value_apply(value, f, &MntOpts::default())
}

/// An op written for the unwrapped leaf.
#[derive(Clone, Copy)]
pub struct LeafOp {
    pub name: &'static str,
    pub opts: MntOpts,
    pub output_type: fn(&Type) -> Type,
    pub resolve: fn(&Value) -> Value,
}

impl LeafOp {
    pub fn standard(name: &'static str, output_type: fn(&Type) -> Type, resolve: fn(&Value) -> Value) -> Self {
        Self { name, opts: MntOpts::default(), output_type, resolve }
    }

    pub fn with_opts(mut self, opts: MntOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Output type of this op when called on an input of type `ty`.
    pub fn output_type(&self, ty: &Type) -> Result<Type, LiftError> {
        mnt_type_apply(ty, self.output_type, &self.opts)
    }

    pub fn resolve(&self, value: &Value) -> Result<Value, LiftError> {
        mnt_value_apply(value, self.resolve, &self.opts)
    }
}

impl fmt::Debug for LeafOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafOp")
            .field("name", &self.name)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

// ------------------------------- Tests ------------------------------------ //
