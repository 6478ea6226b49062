//! Symbol interning for option keys and method names
//!
//! Maps key names to compact u32 symbols so registries can copy, hash,
//! and compare keys cheaply. Uses bidirectional maps for O(1) lookups
//! in both directions.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global symbol interner for efficient name ↔ Symbol mapping
static INTERNER: Lazy<SymbolInterner> = Lazy::new(SymbolInterner::new);

/// An interned key name.
///
/// Symbols are cheap to copy and compare; two symbols are equal exactly
/// when their names are equal. Ordering follows interning order, not
/// lexicographic order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(INTERNER.intern(name))
    }

    /// The name this symbol was interned under.
    pub fn name(&self) -> String {
        INTERNER
            .name(self.0)
            .unwrap_or_else(|| format!("<sym#{}>", self.0))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol::new(&name)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Symbol::new(&name))
    }
}

/// Thread-safe symbol interning system
struct SymbolInterner {
    /// name → id mapping
    name_to_id: DashMap<String, u32>,
    /// id → name mapping
    id_to_name: DashMap<u32, String>,
    /// Next available id
    next_id: AtomicU32,
}

impl SymbolInterner {
    fn new() -> Self {
        Self {
            name_to_id: DashMap::with_capacity(256),
            id_to_name: DashMap::with_capacity(256),
            next_id: AtomicU32::new(0),
        }
    }

    fn intern(&self, name: &str) -> u32 {
        // Fast path: already interned
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }

        // Slow path: allocate through the entry so concurrent interns of
        // the same name agree on one id
        let id = *self
            .name_to_id
            .entry(name.to_string())
            .or_insert_with(|| self.next_id.fetch_add(1, Ordering::SeqCst));
        self.id_to_name.entry(id).or_insert_with(|| name.to_string());
        id
    }

    fn name(&self, id: u32) -> Option<String> {
        self.id_to_name.get(&id).map(|n| n.clone())
    }
}
