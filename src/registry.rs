//! Page-scoped table of every implementor contributed so far.

use crate::types::{Batch, ImplementorRecord, TraitId};
use indexmap::IndexMap;

/// Accumulated implementors, keyed by trait.
///
/// Sequences are append-only: records are never removed or reordered once
/// merged, and contributing the same batch twice duplicates its records.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    traits: IndexMap<TraitId, Vec<ImplementorRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every trait's records from `batch` to the accumulated sequences.
    pub fn merge(&mut self, batch: &Batch) {
        for (trait_id, records) in batch {
            let existing = self.traits.entry(trait_id.clone()).or_default();
            existing.extend(records.iter().cloned());

            tracing::debug!(
                trait_id = %trait_id,
                added = records.len(),
                total = existing.len(),
                "Merged implementors"
            );
        }
    }

    /// All implementors of a trait in arrival order. Empty for unknown traits.
    pub fn implementors(&self, trait_id: &str) -> &[ImplementorRecord] {
        self.traits.get(trait_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Hand-written impls, in arrival order.
    pub fn explicit(&self, trait_id: &str) -> impl Iterator<Item = &ImplementorRecord> {
        self.implementors(trait_id)
            .iter()
            .filter(|record| !record.is_synthetic)
    }

    /// Auto and blanket impls, in arrival order.
    pub fn synthetic(&self, trait_id: &str) -> impl Iterator<Item = &ImplementorRecord> {
        self.implementors(trait_id)
            .iter()
            .filter(|record| record.is_synthetic)
    }

    pub fn contains(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    /// Known traits, in the order they first arrived.
    pub fn trait_ids(&self) -> impl Iterator<Item = &TraitId> {
        self.traits.keys()
    }

    /// Number of distinct traits.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Total records across all traits.
    pub fn record_count(&self) -> usize {
        self.traits.values().map(Vec::len).sum()
    }
}
