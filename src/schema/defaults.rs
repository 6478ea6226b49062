//! Default specifications and the read-miss resolution algorithm

use crate::core::intern::Symbol;
use crate::core::value::Value;
use crate::runtime::instance::Instance;
use std::fmt;
use std::sync::Arc;

/// A zero-argument default callable, evaluated with the instance as its
/// explicit receiver.
pub type DefaultFn = Arc<dyn Fn(&Instance) -> Value + Send + Sync>;

/// The declared source of a value for a key with no explicit value.
///
/// Three-way polymorphism: a plain literal, the name of an instance
/// method (falling back to the symbol itself when no such method is
/// defined), or a callable evaluated against the instance.
#[derive(Clone)]
pub enum DefaultSpec {
    Literal(Value),
    Method(Symbol),
    Callable(DefaultFn),
}

impl DefaultSpec {
    pub fn literal(value: impl Into<Value>) -> Self {
        DefaultSpec::Literal(value.into())
    }

    pub fn method(name: impl Into<Symbol>) -> Self {
        DefaultSpec::Method(name.into())
    }

    pub fn callable(f: impl Fn(&Instance) -> Value + Send + Sync + 'static) -> Self {
        DefaultSpec::Callable(Arc::new(f))
    }

    /// Resolve this specification against an instance.
    ///
    /// Runs on every read that misses an explicit value; results are
    /// never cached by this layer, so callables and method defaults
    /// observe the instance's current state each time. Errors raised by
    /// the invoked code are not this layer's concern: callables and
    /// methods return plain values, and anything they panic with
    /// surfaces to the accessor caller unchanged.
    pub fn resolve(&self, instance: &Instance) -> Value {
        match self {
            DefaultSpec::Literal(value) => value.clone(),
            DefaultSpec::Callable(f) => f(instance),
            DefaultSpec::Method(name) => match instance.call_method(*name) {
                // Capability probe: invoke only when the schema defines
                // a zero-argument method of this name
                Some(value) => value,
                None => Value::Symbol(*name),
            },
        }
    }
}

impl fmt::Debug for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultSpec::Method(name) => f.debug_tuple("Method").field(name).finish(),
            DefaultSpec::Callable(_) => f.write_str("Callable(<fn>)"),
        }
    }
}

impl From<Value> for DefaultSpec {
    /// `Value::Symbol` maps to a method default so `default: :bar`
    /// keeps reading as plain data.
    fn from(value: Value) -> Self {
        match value {
            Value::Symbol(name) => DefaultSpec::Method(name),
            other => DefaultSpec::Literal(other),
        }
    }
}

impl From<Symbol> for DefaultSpec {
    fn from(name: Symbol) -> Self {
        DefaultSpec::Method(name)
    }
}

impl From<&str> for DefaultSpec {
    fn from(s: &str) -> Self {
        DefaultSpec::Literal(Value::from(s))
    }
}

impl From<i64> for DefaultSpec {
    fn from(n: i64) -> Self {
        DefaultSpec::Literal(Value::Int(n))
    }
}

impl From<bool> for DefaultSpec {
    fn from(b: bool) -> Self {
        DefaultSpec::Literal(Value::Bool(b))
    }
}

impl From<f64> for DefaultSpec {
    fn from(x: f64) -> Self {
        DefaultSpec::Literal(Value::Float(x))
    }
}
