pub mod callbacks;
pub mod defaults;
pub mod registry;
pub mod types;

pub use callbacks::{AroundFn, Callback, CallbackFn, CallbackSet};
pub use defaults::{DefaultFn, DefaultSpec};
pub use registry::OptionRegistry;
pub use types::{Accessor, MethodFn, OptionDecl, Schema, RESERVED_WORDS};
