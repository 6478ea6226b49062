//! Declarative option-struct engine: schemas declare named options with
//! defaults, required-key checks, and lifecycle callbacks; instances
//! read through map-backed accessors with per-read default resolution.

// Core modules
pub mod core;
pub mod errors;
pub mod infrastructure;
pub mod runtime;
pub mod schema;

// Re-export commonly used items
pub use crate::core::{Symbol, Value};
pub use errors::Error;
pub use runtime::{Instance, InstanceBuilder, SchemaContext};
pub use schema::{
    Callback, CallbackSet, DefaultSpec, OptionDecl, OptionRegistry, Schema, RESERVED_WORDS,
};
