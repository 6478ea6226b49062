//! Instances: option storage, accessor dispatch, and construction

use crate::core::intern::Symbol;
use crate::core::value::Value;
use crate::errors::Error;
use crate::schema::callbacks::{run_around_chain, CallbackSet};
use crate::schema::types::Schema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An instance of a declared schema: a key/value options store plus a
/// handle to the schema whose accessors, defaults, and methods govern
/// it.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    options: HashMap<Symbol, Value>,
}

impl Instance {
    pub fn builder(schema: Arc<Schema>) -> InstanceBuilder {
        InstanceBuilder {
            schema,
            args: Vec::new(),
            options: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Read an option through its installed reader. An explicit value
    /// wins; otherwise the key's default specification is resolved
    /// fresh against this instance, and a key with no specification
    /// reads as [`Value::None`].
    pub fn get(&self, key: impl Into<Symbol>) -> Result<Value, Error> {
        let key = key.into();
        if !self.schema.reader_installed(key) {
            return Err(Error::NoReader { key });
        }
        if let Some(value) = self.options.get(&key) {
            return Ok(value.clone());
        }
        match self.schema.registry().default_for(key) {
            Some(spec) => {
                tracing::trace!(schema = %self.schema.name(), key = %key, "resolving default");
                Ok(spec.resolve(self))
            }
            None => Ok(Value::None),
        }
    }

    /// Write an option through its installed writer. Unconditional: no
    /// validation of the value itself.
    pub fn set(&mut self, key: impl Into<Symbol>, value: impl Into<Value>) -> Result<(), Error> {
        let key = key.into();
        if !self.schema.writer_installed(key) {
            return Err(Error::NoWriter { key });
        }
        self.options.insert(key, value.into());
        Ok(())
    }

    /// Read an explicitly set value, bypassing default resolution.
    pub fn fetch(&self, key: impl Into<Symbol>) -> Result<Value, Error> {
        let key = key.into();
        self.options
            .get(&key)
            .cloned()
            .ok_or(Error::MissingKey { key })
    }

    /// The raw options store.
    pub fn options(&self) -> &HashMap<Symbol, Value> {
        &self.options
    }

    /// Mutable access to the raw options store. This is the storage
    /// boundary callbacks write through; it does not consult accessor
    /// capabilities.
    pub fn options_mut(&mut self) -> &mut HashMap<Symbol, Value> {
        &mut self.options
    }

    pub fn responds_to(&self, name: impl Into<Symbol>) -> bool {
        self.schema.responds_to(name.into())
    }

    /// Invoke a schema-defined zero-argument method on this instance.
    /// Returns `None` when no such method is defined.
    pub fn call_method(&self, name: impl Into<Symbol>) -> Option<Value> {
        let method = self.schema.method(name.into())?;
        Some(method(self))
    }

    /// Every expected positional argument must be bound or defaulted.
    pub fn check_required_args(&self) -> Result<(), Error> {
        let missing = self.unresolved(self.schema.registry().expected_arguments());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingArguments { keys: missing })
        }
    }

    /// Every required key must have an explicit value or a default
    /// specification.
    pub fn check_required_keys(&self) -> Result<(), Error> {
        let missing = self.unresolved(self.schema.registry().required_keys());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRequiredKeys { keys: missing })
        }
    }

    fn unresolved(&self, keys: &[Symbol]) -> Vec<Symbol> {
        keys.iter()
            .copied()
            .filter(|key| {
                !self.options.contains_key(key)
                    && self.schema.registry().default_for(*key).is_none()
            })
            .collect()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("schema", &self.schema.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Builds an instance from positional arguments and named options,
/// then runs the initialization pipeline.
pub struct InstanceBuilder {
    schema: Arc<Schema>,
    args: Vec<Value>,
    options: HashMap<Symbol, Value>,
}

impl InstanceBuilder {
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// A named option. Merged after positional binding, so a named
    /// value for a positionally bound key wins.
    pub fn option(mut self, key: impl Into<Symbol>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Bind arguments, then run the pipeline: the around chain wraps
    /// [before callbacks → required-argument check → required-key
    /// check → init callbacks]. An around that never invokes its
    /// continuation suppresses everything inside and yields the
    /// instance as bound.
    pub fn build(self) -> Result<Instance, Error> {
        let expected = self.schema.registry().expected_arguments().to_vec();
        if self.args.len() > expected.len() {
            return Err(Error::InvalidArgCount {
                expected: expected.len(),
                found: self.args.len(),
            });
        }

        let mut options: HashMap<Symbol, Value> =
            expected.iter().copied().zip(self.args).collect();
        options.extend(self.options);

        tracing::debug!(schema = %self.schema.name(), "constructing instance");
        let mut instance = Instance {
            schema: self.schema,
            options,
        };

        let callbacks = instance.schema.registry().callbacks().clone();
        let mut outcome: Result<(), Error> = Ok(());
        {
            let mut tail = |inner: &mut Instance| {
                outcome = run_pipeline(inner, &callbacks);
            };
            run_around_chain(callbacks.around(), &mut instance, &mut tail);
        }
        outcome?;
        Ok(instance)
    }
}

fn run_pipeline(instance: &mut Instance, callbacks: &CallbackSet) -> Result<(), Error> {
    for callback in callbacks.before() {
        callback.run(instance)?;
    }
    instance.check_required_args()?;
    instance.check_required_keys()?;
    for callback in callbacks.init() {
        callback.run(instance)?;
    }
    Ok(())
}
