use crate::core::intern::Symbol;
use std::fmt;

/// Errors raised at declaration time or by the construction/accessor
/// surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An option was declared under a name owned by the instance API.
    ReservedWord { word: Symbol },
    /// Expected positional arguments with no binding and no default.
    MissingArguments { keys: Vec<Symbol> },
    /// More positional arguments than the schema expects.
    InvalidArgCount { expected: usize, found: usize },
    /// Required keys with no explicit value and no default.
    MissingRequiredKeys { keys: Vec<Symbol> },
    /// Read through a key with no installed reader.
    NoReader { key: Symbol },
    /// Write through a key with no installed writer.
    NoWriter { key: Symbol },
    /// A method-named callback names no defined method.
    UnknownMethod { name: Symbol },
    /// `fetch` on a key with no explicitly set value.
    MissingKey { key: Symbol },
    /// Derivation from a schema name the context does not hold.
    UnknownSchema { name: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedWord { word } => {
                write!(f, "use of reserved word is not permitted: {:?}", word)
            }
            Self::MissingArguments { keys } => {
                write!(f, "missing required arguments: {}", join_keys(keys))
            }
            Self::InvalidArgCount { expected, found } => {
                write!(
                    f,
                    "too many positional arguments: expected at most {}, found {}",
                    expected, found
                )
            }
            Self::MissingRequiredKeys { keys } => {
                write!(f, "missing required keys: {}", join_keys(keys))
            }
            Self::NoReader { key } => {
                write!(f, "no reader installed for option {:?}", key)
            }
            Self::NoWriter { key } => {
                write!(f, "no writer installed for option {:?}", key)
            }
            Self::UnknownMethod { name } => {
                write!(f, "callback names undefined method {:?}", name)
            }
            Self::MissingKey { key } => {
                write!(f, "no value set for key {:?}", key)
            }
            Self::UnknownSchema { name } => {
                write!(f, "unknown schema: {}", name)
            }
        }
    }
}

impl std::error::Error for Error {}

fn join_keys(keys: &[Symbol]) -> String {
    keys.iter()
        .map(|k| format!("{:?}", k))
        .collect::<Vec<_>>()
        .join(", ")
}
