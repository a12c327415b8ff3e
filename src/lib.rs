//! Lifting of leaf ops through lists, nones and tags.
//!
//! Op authors write logic for an unwrapped leaf; [`lift`] carries it through
//! any nesting of list dimensions, optionality and provenance tags, for static
//! types and runtime values alike. [`path`] resolves wildcard field paths with
//! the same nullable/taggable transparency.
pub mod builtins;
pub mod error;
pub mod lift;
pub mod notation;
pub mod path;
pub mod standard_op;
pub mod types;
pub mod value;

pub use error::{LiftError, NotationError};
pub use lift::{mnt_type_apply, mnt_type_strip, mnt_value_apply, MntOpts};
pub use path::{
    split_path, typed_dict_path_type, typed_dict_path_type_with_limit, typed_dict_path_val,
    typed_dict_path_val_with_limit,
};
pub use standard_op::{standard_op_type, standard_op_value, LeafOp};
pub use types::Type;
pub use value::Value;
