//! Mappable / nullable / taggable lifting.
//!
//! Op authors write a transform for an unwrapped leaf. The walkers here peel
//! the wrappers around an actual input (lists, nones, tags, unions of those),
//! hand the leaf to the transform and rebuild the same wrappers around its
//! result. `ty` does this for static types, `val` for runtime values; both
//! follow the same peel order so a type and a value of that type stay aligned.
//!
//! Policy knobs (see [`MntOpts`]):
//! - `dims`: 0 maps through lists elementwise; `n > 0` requires `n` list
//!   layers and hands the whole list to the transform.
//! - `tags`: false unwraps tags and re-accumulates them by nesting; true hands
//!   the tagged wrapper to the transform.
//! - `nones`: false lets none short-circuit; true hands none to the transform.
pub mod ty;
pub mod val;

use serde::{Deserialize, Serialize};

use crate::error::LiftError;

pub use ty::{mnt_type_apply, mnt_type_strip, nullable_taggable_type};
pub use val::{mnt_value_apply, nullable_taggable_value};

// ------------------------------- Policy ---------------------------------- //

/// Wrapper layers a single lift may descend through before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MntOpts {
    pub dims: usize,
    pub tags: bool,
    pub nones: bool,
    pub max_depth: usize,
}

impl Default for MntOpts {
    fn default() -> Self {
        Self { dims: 0, tags: false, nones: false, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl MntOpts {
    pub fn dims(dims: usize) -> Self {
        Self { dims, ..Self::default() }
    }

    pub fn with_tags(mut self) -> Self {
        self.tags = true;
        self
    }

    pub fn with_nones(mut self) -> Self {
        self.nones = true;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

// ------------------------------ Depth guard ------------------------------ //

/// Layer counter threaded through every recursive walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    level: usize,
    limit: usize,
}

impl Depth {
    pub(crate) fn new(limit: usize) -> Self {
        Self { level: 0, limit }
    }

    pub(crate) fn descend(self) -> Result<Self, LiftError> {
        if self.level >= self.limit {
            tracing::warn!(limit = self.limit, "nesting exceeds maximum lift depth");
            return Err(LiftError::TooDeep { limit: self.limit });
        }
        Ok(Self { level: self.level + 1, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_ops() {
        let opts = MntOpts::default();
        assert_eq!((opts.dims, opts.tags, opts.nones), (0, false, false));
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let opts: MntOpts = serde_json::from_str(r#"{"dims": 1, "nones": true}"#).unwrap();
        assert_eq!(opts, MntOpts::dims(1).with_nones());
        let opts: MntOpts = serde_json::from_str(r#"{"maxDepth": 8}"#).unwrap();
        assert_eq!(opts, MntOpts::default().with_max_depth(8));
    }

    #[test]
    fn depth_guard_trips_at_the_limit() {
        let d = Depth::new(2);
        let d = d.descend().unwrap();
        let d = d.descend().unwrap();
        assert_eq!(d.descend().unwrap_err(), LiftError::TooDeep { limit: 2 });
    }
}
