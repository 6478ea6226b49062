pub mod intern;
pub mod value;

pub use intern::Symbol;
pub use value::Value;
