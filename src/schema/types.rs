//! Per-type schemas: the declaration API and its reserved-word guard

use crate::core::intern::Symbol;
use crate::core::value::Value;
use crate::errors::Error;
use crate::runtime::instance::Instance;
use crate::schema::callbacks::{AroundFn, Callback};
use crate::schema::defaults::DefaultSpec;
use crate::schema::registry::OptionRegistry;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Names owned by the instance API. Declaring an option under any of
/// these fails the whole declaration call before any state is touched.
pub const RESERVED_WORDS: [&str; 6] = [
    "class",
    "defaults",
    "options",
    "fetch",
    "check_required_args",
    "check_required_keys",
];

static RESERVED_SYMBOLS: Lazy<[Symbol; 6]> =
    Lazy::new(|| RESERVED_WORDS.map(Symbol::new));

/// A zero-argument instance method defined on a schema.
pub type MethodFn = Arc<dyn Fn(&Instance) -> Value + Send + Sync>;

/// Which accessor halves are installed for a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accessor {
    pub reader: bool,
    pub writer: bool,
}

/// A single-key declaration with its `default:`/`required:` modifiers.
#[derive(Debug, Clone)]
pub struct OptionDecl {
    key: Symbol,
    default: Option<DefaultSpec>,
    required: bool,
}

impl OptionDecl {
    pub fn new(key: impl Into<Symbol>) -> Self {
        Self {
            key: key.into(),
            default: None,
            required: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<DefaultSpec>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl From<&str> for OptionDecl {
    fn from(key: &str) -> Self {
        OptionDecl::new(key)
    }
}

impl From<Symbol> for OptionDecl {
    fn from(key: Symbol) -> Self {
        OptionDecl::new(key)
    }
}

/// A declared type: its registry, its method table, and the accessor
/// capabilities installed for its keys.
///
/// Declaration mutates the schema in place; construction goes through
/// an `Arc<Schema>` (see [`Schema::shared`]), so a schema is immutable
/// by the time instances exist.
#[derive(Clone)]
pub struct Schema {
    name: String,
    registry: OptionRegistry,
    methods: HashMap<Symbol, MethodFn>,
    accessors: HashMap<Symbol, Accessor>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: OptionRegistry::new(),
            methods: HashMap::new(),
            accessors: HashMap::new(),
        }
    }

    /// Derive a child schema: the inheritance hook made explicit.
    ///
    /// The child receives an independent duplicate of every metadata
    /// container the parent holds (registry, method table, accessor
    /// map). Later declarations on either side never affect the other,
    /// and deriving from an already-derived schema reads the child's
    /// cloned state, never the grandparent's.
    pub fn derive(&self, name: impl Into<String>) -> Schema {
        let name = name.into();
        tracing::debug!(parent = %self.name, child = %name, "deriving schema");
        Schema {
            name,
            registry: self.registry.inherit(),
            methods: self.methods.clone(),
            accessors: self.accessors.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Finalize for construction.
    pub fn shared(self) -> Arc<Schema> {
        Arc::new(self)
    }

    /// Declare a single option: registers its default and required
    /// status and installs its accessor pair.
    pub fn option(&mut self, decl: impl Into<OptionDecl>) -> Result<&mut Self, Error> {
        let decl = decl.into();
        self.check_reserved_words(&[decl.key])?;

        if let Some(default) = decl.default {
            self.registry.set_default(decl.key, default);
        }
        if decl.required {
            self.registry.add_required(&[decl.key]);
        }
        tracing::debug!(schema = %self.name, key = %decl.key, "declared option");
        self.install_accessors(&[decl.key]);
        Ok(self)
    }

    /// Declare a batch of options with accessors but no defaults.
    pub fn options<I, K>(&mut self, keys: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        let keys: SmallVec<[Symbol; 4]> = keys.into_iter().map(Into::into).collect();
        self.option_accessor_keys(&keys)?;
        Ok(self)
    }

    /// Declare a batch of key → default pairs, installing accessors for
    /// every key that is not already an expected argument.
    pub fn option_defaults<I, K, D>(&mut self, pairs: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<Symbol>,
        D: Into<DefaultSpec>,
    {
        let pairs: Vec<(Symbol, DefaultSpec)> = pairs
            .into_iter()
            .map(|(k, d)| (k.into(), d.into()))
            .collect();
        let keys: SmallVec<[Symbol; 4]> = pairs.iter().map(|(k, _)| *k).collect();
        self.check_reserved_words(&keys)?;

        let new_accessors: SmallVec<[Symbol; 4]> = keys
            .iter()
            .copied()
            .filter(|k| !self.registry.expected_arguments().contains(k))
            .collect();
        for (key, default) in pairs {
            self.registry.set_default(key, default);
        }
        self.install_accessors(&new_accessors);
        Ok(self)
    }

    /// Mark keys required and install their accessor pairs.
    pub fn required<I, K>(&mut self, keys: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        let keys: SmallVec<[Symbol; 4]> = keys.into_iter().map(Into::into).collect();
        self.check_reserved_words(&keys)?;
        self.registry.add_required(&keys);
        self.install_accessors(&keys);
        Ok(self)
    }

    /// Declare positional constructor arguments. Expected arguments are
    /// also required keys.
    pub fn expect_arguments<I, K>(&mut self, keys: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        let keys: SmallVec<[Symbol; 4]> = keys.into_iter().map(Into::into).collect();
        self.check_reserved_words(&keys)?;
        self.registry.add_required(&keys);
        self.registry.add_expected_arguments(&keys);
        self.install_accessors(&keys);
        Ok(self)
    }

    pub fn expect_argument(&mut self, key: impl Into<Symbol>) -> Result<&mut Self, Error> {
        self.expect_arguments([key.into()])
    }

    /// Install reader/writer pairs for keys, guarding reserved words.
    pub fn option_accessor<I, K>(&mut self, keys: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        let keys: SmallVec<[Symbol; 4]> = keys.into_iter().map(Into::into).collect();
        self.option_accessor_keys(&keys)?;
        Ok(self)
    }

    /// Install readers only. Low-level entry: no reserved-word guard.
    pub fn option_reader<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        for key in keys {
            self.accessors.entry(key.into()).or_default().reader = true;
        }
        self
    }

    /// Install writers only. Low-level entry: no reserved-word guard.
    pub fn option_writer<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Symbol>,
    {
        for key in keys {
            self.accessors.entry(key.into()).or_default().writer = true;
        }
        self
    }

    /// Register a callback to run before validation.
    pub fn before_init(&mut self, callback: impl Into<Callback>) -> &mut Self {
        self.registry.callbacks_mut().push_before(callback.into());
        self
    }

    /// Register a callback to run after validation.
    pub fn init(&mut self, callback: impl Into<Callback>) -> &mut Self {
        self.registry.callbacks_mut().push_init(callback.into());
        self
    }

    /// Alias for [`Schema::init`].
    pub fn after_init(&mut self, callback: impl Into<Callback>) -> &mut Self {
        self.init(callback)
    }

    /// Register a callback wrapping the rest of the initialization
    /// pipeline. The first-declared around is outermost.
    pub fn around_init(
        &mut self,
        callback: impl Fn(&mut Instance, &mut dyn FnMut(&mut Instance)) + Send + Sync + 'static,
    ) -> &mut Self {
        let callback: AroundFn = Arc::new(callback);
        self.registry.callbacks_mut().push_around(callback);
        self
    }

    /// Define a zero-argument instance method. Symbol defaults resolve
    /// against this table, and method-named callbacks dispatch through
    /// it.
    pub fn define_method(
        &mut self,
        name: impl Into<Symbol>,
        f: impl Fn(&Instance) -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Does this schema define a zero-argument method of this name?
    pub fn responds_to(&self, name: Symbol) -> bool {
        self.methods.contains_key(&name)
    }

    pub(crate) fn method(&self, name: Symbol) -> Option<&MethodFn> {
        self.methods.get(&name)
    }

    pub fn reader_installed(&self, key: Symbol) -> bool {
        self.accessors.get(&key).map_or(false, |a| a.reader)
    }

    pub fn writer_installed(&self, key: Symbol) -> bool {
        self.accessors.get(&key).map_or(false, |a| a.writer)
    }

    fn option_accessor_keys(&mut self, keys: &[Symbol]) -> Result<(), Error> {
        self.check_reserved_words(keys)?;
        self.install_accessors(keys);
        Ok(())
    }

    fn install_accessors(&mut self, keys: &[Symbol]) {
        self.option_reader(keys.iter().copied());
        self.option_writer(keys.iter().copied());
    }

    /// Fails on the first offending key, before any state is touched
    /// for the batch.
    fn check_reserved_words(&self, keys: &[Symbol]) -> Result<(), Error> {
        for key in keys {
            if RESERVED_SYMBOLS.contains(key) {
                return Err(Error::ReservedWord { word: *key });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("methods", &self.methods.len())
            .field("accessors", &self.accessors)
            .finish()
    }
}
