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

use std::marker::PhantomData;

use weft_core::ecs::{ComponentBit, EntityId, Mask};

use crate::ecs::entity_store::EntityStore;
use crate::ecs::record::Record;
use crate::ecs::world::World;

/// One term of a query: a component bit matching entities must carry, or
/// one they must not.
///
/// Replaces signed bit numbers: there is no way to write a zero term, so
/// nothing has to be rejected at query-construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// Matching entities must carry this bit.
    With(ComponentBit),
    /// Contributes the bit to the query's exclude mask. Exclusion is
    /// conjunctive: an entity is disqualified only when it carries *every*
    /// excluded bit (see [`Query`]).
    Without(ComponentBit),
}

impl Term {
    /// The component bit this term refers to.
    pub fn bit(&self) -> ComponentBit {
        match *self {
            Term::With(bit) | Term::Without(bit) => bit,
        }
    }
}

/// A reusable include/exclude filter over the world's entities, with an
/// incrementally revalidated result cache.
///
/// A query is typically created once and held by a long-lived system, then
/// read every frame through [`Query::iter`] or [`Query::iter_mut`]. Each
/// read re-checks cache validity first: the query picks the shortest per-bit
/// index among its include bits as the candidate list, and only rescans when
/// that list's length differs from the previous read. Reads against an
/// unchanged candidate list serve the cached results without touching any
/// entity mask.
///
/// Two details of the match rules:
///
/// - Exclusion is a conjunctive mask-equality test. An entity is
///   disqualified only when it carries **all** excluded bits at once, not
///   any one of them.
/// - Cache validity is judged by candidate-list *length* alone. A removal
///   and a compensating insertion between two reads leaves the length
///   unchanged and is not detected; the previous results are served. Hosts
///   that detach components mid-frame should expect this window.
pub struct Query {
    /// OR of all `With` bits.
    include: Mask,
    /// OR of all `Without` bits.
    exclude: Mask,
    /// The `With` bits in the order they were given, scanned when picking
    /// the shortest candidate index.
    includes: Vec<ComponentBit>,
    /// Ids that matched at the last rescan, in candidate-list order.
    matched: Vec<EntityId>,
    /// Candidate-list length the cache was computed from; `None` until the
    /// first evaluation, which keeps "never evaluated" distinct from an
    /// empty result.
    seen_len: Option<usize>,
    /// How many full rescans this query has performed.
    rescans: u64,
}

impl Query {
    /// (Internal) Builds a query from validated terms.
    ///
    /// This is intended to be called only by `World::query`, which has
    /// already checked every term's bit against the registry.
    pub(crate) fn new<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        let mut include = Mask::EMPTY;
        let mut exclude = Mask::EMPTY;
        let mut includes = Vec::new();

        for term in terms {
            match term {
                Term::With(bit) => {
                    include |= bit;
                    includes.push(bit);
                }
                Term::Without(bit) => exclude |= bit,
            }
        }

        Self {
            include,
            exclude,
            includes,
            matched: Vec::new(),
            seen_len: None,
            rescans: 0,
        }
    }

    /// Revalidates the cache against the world, then iterates the matching
    /// records in entity-creation order (restricted to the filter).
    pub fn iter<'a>(&'a mut self, world: &'a World) -> QueryIter<'a> {
        self.revalidate(&world.store);
        QueryIter {
            store: &world.store,
            ids: self.matched.iter(),
        }
    }

    /// Same protocol as [`Query::iter`], yielding mutable records.
    pub fn iter_mut<'a>(&'a mut self, world: &'a mut World) -> QueryIterMut<'a> {
        self.revalidate(&world.store);
        QueryIterMut {
            store: &mut world.store as *mut EntityStore,
            ids: self.matched.iter(),
            _phantom: PhantomData,
        }
    }

    /// How many full rescans this query has performed since construction.
    ///
    /// Two reads with no relevant index growth in between leave this
    /// unchanged, which is the observable form of the caching contract.
    pub fn rescans(&self) -> u64 {
        self.rescans
    }

    /// Picks the include bit whose index list is currently shortest.
    ///
    /// A matching entity appears in every include bit's index, so the
    /// shortest list already contains every possible match. Strict `<`
    /// keeps the first-listed bit on ties; a query with no include bits
    /// has no candidate and matches nothing.
    fn candidate(&self, store: &EntityStore) -> Option<ComponentBit> {
        let mut best: Option<(ComponentBit, usize)> = None;
        for &bit in &self.includes {
            let len = store.index_len(bit);
            let shorter = match best {
                Some((_, best_len)) => len < best_len,
                None => true,
            };
            if shorter {
                best = Some((bit, len));
            }
        }
        best.map(|(bit, _)| bit)
    }

    /// Serves the cache if the candidate list length is unchanged since the
    /// previous evaluation; otherwise rescans it.
    fn revalidate(&mut self, store: &EntityStore) {
        let scan: &[EntityId] = match self.candidate(store) {
            Some(bit) => store.index_slice(bit),
            None => &[],
        };

        if self.seen_len == Some(scan.len()) {
            return;
        }

        self.matched.clear();
        for &id in scan {
            let mask = store.records[id.index as usize].mask;
            let has_all = mask.contains_all(self.include);
            let excluded = !self.exclude.is_empty() && mask.contains_all(self.exclude);
            if has_all && !excluded {
                self.matched.push(id);
            }
        }

        self.seen_len = Some(scan.len());
        self.rescans += 1;
    }
}

/// Iterator over the records matching a [`Query`].
///
/// Created by [`Query::iter`]. Yields records in candidate-list order,
/// i.e. entity-creation order restricted to the filter.
pub struct QueryIter<'a> {
    store: &'a EntityStore,
    ids: std::slice::Iter<'a, EntityId>,
}

impl<'a> Iterator for QueryIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(&self.store.records[id.index as usize].record)
    }
}

/// Iterator over mutable records matching a [`Query`].
///
/// Created by [`Query::iter_mut`]. It holds the world through a raw pointer
/// so it can hand out `&'a mut Record`s row by row while the iteration is
/// in progress.
pub struct QueryIterMut<'a> {
    store: *mut EntityStore,
    ids: std::slice::Iter<'a, EntityId>,
    /// Marks that this iterator behaves as an exclusive borrow of the store
    /// for `'a`.
    _phantom: PhantomData<&'a mut EntityStore>,
}

impl<'a> Iterator for QueryIterMut<'a> {
    type Item = &'a mut Record;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        // SAFETY: `store` is valid for 'a because the iterator was created
        // from an exclusive world borrow of that lifetime, and the matched
        // id list holds each entity at most once, so the mutable rows
        // handed out never alias.
        let store = unsafe { &mut *self.store };
        Some(&mut store.records[id.index as usize].record)
    }
}
