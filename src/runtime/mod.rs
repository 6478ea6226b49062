pub mod context;
pub mod instance;

pub use context::SchemaContext;
pub use instance::{Instance, InstanceBuilder};
