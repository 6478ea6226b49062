//! Per-schema declaration metadata and the clone-on-derive step

use crate::core::intern::Symbol;
use crate::schema::callbacks::CallbackSet;
use crate::schema::defaults::DefaultSpec;
use smallvec::SmallVec;
use std::collections::HashMap;

/// All declaration-time metadata a schema has accumulated: required
/// keys, default specifications, expected positional arguments, and
/// lifecycle callbacks.
///
/// A registry is never shared by reference between schemas; derivation
/// hands the child its own copy via [`OptionRegistry::inherit`].
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    required_keys: SmallVec<[Symbol; 4]>,
    defaults: HashMap<Symbol, DefaultSpec>,
    expected_arguments: SmallVec<[Symbol; 4]>,
    callbacks: CallbackSet,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the independent duplicate a derived schema starts from.
    ///
    /// Containers are duplicated one level deep: the child gets its own
    /// key lists, default map, and callback lists, while the elements
    /// themselves (values, `Arc`'d callables) are shared. Mutating
    /// either registry afterwards never affects the other. Total over
    /// any partial state, including a registry with no declarations.
    pub fn inherit(&self) -> OptionRegistry {
        self.clone()
    }

    pub fn required_keys(&self) -> &[Symbol] {
        &self.required_keys
    }

    pub fn expected_arguments(&self) -> &[Symbol] {
        &self.expected_arguments
    }

    pub fn defaults(&self) -> &HashMap<Symbol, DefaultSpec> {
        &self.defaults
    }

    pub fn default_for(&self, key: Symbol) -> Option<&DefaultSpec> {
        self.defaults.get(&key)
    }

    pub fn callbacks(&self) -> &CallbackSet {
        &self.callbacks
    }

    pub fn is_required(&self, key: Symbol) -> bool {
        self.required_keys.contains(&key)
    }

    pub(crate) fn add_required(&mut self, keys: &[Symbol]) {
        self.required_keys.extend_from_slice(keys);
    }

    pub(crate) fn set_default(&mut self, key: Symbol, spec: DefaultSpec) {
        self.defaults.insert(key, spec);
    }

    pub(crate) fn add_expected_arguments(&mut self, keys: &[Symbol]) {
        self.expected_arguments.extend_from_slice(keys);
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut CallbackSet {
        &mut self.callbacks
    }
}
