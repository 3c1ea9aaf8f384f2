//! C entry points for `polars-learn`.
//!
//! Tables and columns handed to the caller are owned by [`REGISTRY`] until
//! released with `learn_release_object`. With the `python` feature, model
//! and array handles are Python object references owned by the caller.
pub mod api;
pub mod exports;
#[cfg(feature = "python")]
pub mod python;

use once_cell::sync::Lazy;
use polars_learn::registry::ObjectRegistry;

pub static REGISTRY: Lazy<ObjectRegistry> = Lazy::new(ObjectRegistry::new);
