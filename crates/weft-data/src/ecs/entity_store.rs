// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Internal entity storage and per-bit index management.

use std::collections::HashMap;

use weft_core::ecs::{ComponentBit, EntityId, Mask};

use crate::ecs::record::Record;

/// One row of the entity table: the entity's component mask plus its record.
pub(crate) struct EntityRecord {
    pub(crate) mask: Mask,
    pub(crate) record: Record,
}

/// Internal manager for the entity table and the per-bit reverse index.
///
/// The table is dense and append-only: an `EntityId`'s index is its position
/// in `records`, ids are never recycled, and every id below `len()` is valid
/// forever. The reverse index keeps, for each component bit, the entities
/// carrying it in the order the bit was put on them; that list is what
/// queries scan instead of the whole table.
pub(crate) struct EntityStore {
    /// Every entity ever created, indexed by id.
    pub(crate) records: Vec<EntityRecord>,
    /// For each bit, the ids whose mask contains it, append-ordered.
    /// An id appears at most once per bit; the entity's mask is the
    /// authority on membership, and callers only append after checking it.
    index: HashMap<ComponentBit, Vec<EntityId>>,
}

impl EntityStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The id the next pushed entity will receive.
    pub fn next_id(&self) -> EntityId {
        EntityId {
            index: self.records.len() as u32,
        }
    }

    /// Appends a fully assembled entity row, returning its id.
    pub fn push(&mut self, entry: EntityRecord) -> EntityId {
        let id = self.next_id();
        self.records.push(entry);
        id
    }

    /// Returns `true` if the id names an existing entity.
    pub fn contains(&self, id: EntityId) -> bool {
        (id.index as usize) < self.records.len()
    }

    /// Returns a reference to an entity's row.
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(id.index as usize)
    }

    /// Returns a mutable reference to an entity's row.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.records.get_mut(id.index as usize)
    }

    /// Appends an id to a bit's index list, creating the list on first use.
    ///
    /// The caller must have checked that the entity's mask does not yet
    /// contain the bit; that check is what keeps each id unique per list.
    pub fn index_append(&mut self, bit: ComponentBit, id: EntityId) {
        self.index.entry(bit).or_default().push(id);
    }

    /// Removes an id from a bit's index list, preserving the order of the
    /// remaining entries. A no-op if the id is not listed.
    pub fn index_remove(&mut self, bit: ComponentBit, id: EntityId) {
        if let Some(ids) = self.index.get_mut(&bit) {
            if let Some(at) = ids.iter().position(|&listed| listed == id) {
                ids.remove(at);
            }
        }
    }

    /// The number of ids currently listed for a bit.
    pub fn index_len(&self, bit: ComponentBit) -> usize {
        self.index.get(&bit).map_or(0, Vec::len)
    }

    /// The ids currently listed for a bit, in append order.
    pub fn index_slice(&self, bit: ComponentBit) -> &[EntityId] {
        self.index.get(&bit).map_or(&[], Vec::as_slice)
    }

    /// The total number of entities ever created.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Iterates every entity row in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }
}
