//! Chain registry
//!
//! Provides [`ChainRegistry`] holding the cooperative's dependency chains
//! by name, and the preset chains used by the dashboard forms.

use crate::chain::CascadeChain;
use crate::level::Level;
use indexmap::IndexMap;

/// Culture → variety → sub-variety
///
/// Entities store the culture under `numcul`.
#[must_use]
pub fn variety_chain() -> CascadeChain {
    CascadeChain::assemble(vec![
        Level::root("culture", "codcul", "nomcul").with_record_field("numcul"),
        Level::child("variety", "codvar", "nomvar", "culture", "codcul"),
        Level::child("sub_variety", "codsvar", "nomsvar", "variety", "codvar"),
    ])
}

/// Producer → orchard → parcel
#[must_use]
pub fn orchard_chain() -> CascadeChain {
    CascadeChain::assemble(vec![
        Level::root("producer", "codpro", "nompro"),
        Level::child("orchard", "refver", "nomver", "producer", "codpro"),
        Level::child("parcel", "refpar", "nompar", "orchard", "refver"),
    ])
}

/// Several cultures → their varieties (list filters)
#[must_use]
pub fn culture_filter_chain() -> CascadeChain {
    CascadeChain::assemble(vec![
        Level::root("culture", "codcul", "nomcul").multi(),
        Level::child("variety", "codvar", "nomvar", "culture", "codcul"),
    ])
}

/// Registry of named chains
#[derive(Debug, Default, Clone)]
pub struct ChainRegistry {
    chains: IndexMap<String, CascadeChain>,
}

impl ChainRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            chains: IndexMap::new(),
        }
    }

    /// Create registry with the built-in chains
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("variety", variety_chain());
        registry.register("orchard", orchard_chain());
        registry.register("culture_filter", culture_filter_chain());
        registry
    }

    /// Register a chain, replacing any chain of the same name
    pub fn register(&mut self, name: &str, chain: CascadeChain) {
        self.chains.insert(name.to_string(), chain);
    }

    /// Look up a chain
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CascadeChain> {
        self.chains.get(name)
    }

    /// Check if chain exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Remove chain
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<CascadeChain> {
        self.chains.shift_remove(name)
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.chains.keys().map(String::as_str).collect()
    }

    /// Number of registered chains
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
