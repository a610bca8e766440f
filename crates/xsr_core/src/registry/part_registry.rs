//! Part deduplication across assemblies.
//!
//! # Responsibility
//! - Keep one canonical record per part identifier.
//! - Sum quantities and merge per-assembly instance maps on repeat sightings.
//!
//! # Invariants
//! - Registry order is first-sighting order.
//! - Merging never drops an instance already present for any assembly.

use crate::model::part::Part;
use crate::registry::expander::merge_instances;
use log::debug;
use std::collections::btree_map::Entry;
use std::collections::HashMap;

/// Canonical part records keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    parts: Vec<Part>,
    index: HashMap<String, usize>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the registry with already-tracked parts.
    ///
    /// Duplicate identifiers in the input are merged like repeat sightings.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        let mut registry = Self::new();
        for part in parts {
            registry.register(part);
        }
        registry
    }

    /// Inserts a part on first sighting; otherwise sums its quantity into the
    /// existing record and merges its instance map.
    pub fn register(&mut self, part: Part) {
        let Some(&position) = self.index.get(&part.part) else {
            self.index.insert(part.part.clone(), self.parts.len());
            self.parts.push(part);
            return;
        };

        let existing = &mut self.parts[position];
        existing.qty = existing.qty.saturating_add(part.qty);
        for (assembly_id, incoming) in part.assembly_instances {
            match existing.assembly_instances.entry(assembly_id) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut slot) => merge_instances(slot.get_mut(), incoming),
            }
        }
        debug!(
            "event=part_merged module=registry part={} qty={} assemblies={}",
            existing.part,
            existing.qty,
            existing.assembly_instances.len()
        );
    }

    pub fn get(&self, part_id: &str) -> Option<&Part> {
        self.index.get(part_id).map(|&position| &self.parts[position])
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }
}
