//! Lifecycle callbacks declared on a schema and run at construction

use crate::core::intern::Symbol;
use crate::errors::Error;
use crate::runtime::instance::Instance;
use std::fmt;
use std::sync::Arc;

/// A `before_init`/`init` callback body.
pub type CallbackFn = Arc<dyn Fn(&mut Instance) + Send + Sync>;

/// An `around_init` callback: receives the instance and a continuation
/// that runs the rest of the initialization pipeline. Not invoking the
/// continuation suppresses every later phase.
pub type AroundFn = Arc<dyn Fn(&mut Instance, &mut dyn FnMut(&mut Instance)) + Send + Sync>;

/// A lifecycle callback: either the name of a schema-defined method or
/// a closure taking the instance explicitly.
#[derive(Clone)]
pub enum Callback {
    Method(Symbol),
    Func(CallbackFn),
}

impl Callback {
    pub fn func(f: impl Fn(&mut Instance) + Send + Sync + 'static) -> Self {
        Callback::Func(Arc::new(f))
    }

    pub(crate) fn run(&self, instance: &mut Instance) -> Result<(), Error> {
        match self {
            Callback::Func(f) => {
                f(instance);
                Ok(())
            }
            Callback::Method(name) => match instance.call_method(*name) {
                Some(_) => Ok(()),
                None => Err(Error::UnknownMethod { name: *name }),
            },
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Callback::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

impl From<Symbol> for Callback {
    fn from(name: Symbol) -> Self {
        Callback::Method(name)
    }
}

impl From<&str> for Callback {
    fn from(name: &str) -> Self {
        Callback::Method(Symbol::new(name))
    }
}

/// Ordered callback lists per phase. Registration accumulates; nothing
/// is replaced on redeclaration, and inherited entries stay ahead of
/// the child's own.
#[derive(Clone, Default)]
pub struct CallbackSet {
    before: Vec<Callback>,
    init: Vec<Callback>,
    around: Vec<AroundFn>,
}

impl CallbackSet {
    pub fn before(&self) -> &[Callback] {
        &self.before
    }

    pub fn init(&self) -> &[Callback] {
        &self.init
    }

    pub fn around(&self) -> &[AroundFn] {
        &self.around
    }

    pub(crate) fn push_before(&mut self, callback: Callback) {
        self.before.push(callback);
    }

    pub(crate) fn push_init(&mut self, callback: Callback) {
        self.init.push(callback);
    }

    pub(crate) fn push_around(&mut self, callback: AroundFn) {
        self.around.push(callback);
    }
}

impl fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("before", &self.before)
            .field("init", &self.init)
            .field("around", &self.around.len())
            .finish()
    }
}

/// Run the around chain: the first-declared callback wraps all later
/// ones, and the innermost continuation is `tail`.
pub(crate) fn run_around_chain(
    arounds: &[AroundFn],
    instance: &mut Instance,
    tail: &mut dyn FnMut(&mut Instance),
) {
    match arounds.split_first() {
        Some((outer, rest)) => {
            let mut next = |inner: &mut Instance| run_around_chain(rest, inner, &mut *tail);
            outer(instance, &mut next);
        }
        None => tail(instance),
    }
}
