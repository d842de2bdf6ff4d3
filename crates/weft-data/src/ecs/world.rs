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

use weft_core::ecs::{ComponentBit, EntityId, Mask, StoreError};

use crate::ecs::descriptor::{Descriptor, FactoryArgs};
use crate::ecs::entity_store::{EntityRecord, EntityStore};
use crate::ecs::query::{Query, Term};
use crate::ecs::record::{ComponentValue, DataKey, Record};
use crate::ecs::registry::{ComponentKind, ComponentRegistry};

/// One descriptor checked against the registry and turned into its
/// committable form. Building these for a whole call before touching any
/// store state is what makes spawn and attach all-or-nothing.
struct ResolvedComponent {
    bit: ComponentBit,
    /// The key/value pair to store, or `None` for tags, which contribute
    /// mask membership only.
    value: Option<(DataKey, ComponentValue)>,
}

/// The single context owning all store state: the registry of component
/// kinds and the entity table with its per-bit query indexes.
///
/// Everything goes through an explicit `World` value; there is no global
/// registry or ambient store. Mutating calls are all-or-nothing: every
/// fallible step runs before the first write, so a returned error means the
/// world is exactly as it was.
///
/// # Examples
///
/// ```
/// use weft_data::ecs::{Descriptor, Term, World};
///
/// let mut world = World::new();
/// let position = world.register_per_entity(|(x, y): (f32, f32)| (x, y), Some("position"))?;
/// let frozen = world.register_tag(Some("frozen"))?;
///
/// let entity = world.spawn([Descriptor::with_args(position, (1.0_f32, 2.0_f32))])?;
/// assert_eq!(world.mask(entity), Some(position.into()));
///
/// let mut movers = world.query([Term::With(position), Term::Without(frozen)])?;
/// assert_eq!(movers.iter(&world).count(), 1);
/// # Ok::<(), weft_data::ecs::StoreError>(())
/// ```
pub struct World {
    pub(crate) registry: ComponentRegistry,
    pub(crate) store: EntityStore,
}

impl World {
    /// Creates an empty world: no component kinds, no entities.
    pub fn new() -> Self {
        Self {
            registry: ComponentRegistry::new(),
            store: EntityStore::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────

    /// Registers a component kind, allocating the next free bit.
    ///
    /// The label, when given, becomes the key the kind's values are stored
    /// under in entity records; unlabeled kinds store under their bit.
    pub fn register(
        &mut self,
        kind: ComponentKind,
        label: Option<&str>,
    ) -> Result<ComponentBit, StoreError> {
        self.registry.register(kind, label)
    }

    /// Registers a tag kind: mask membership only, no stored value.
    pub fn register_tag(&mut self, label: Option<&str>) -> Result<ComponentBit, StoreError> {
        self.register(ComponentKind::Tag, label)
    }

    /// Registers a shared kind holding one constant every carrying entity
    /// sees.
    pub fn register_shared<T: 'static + Send + Sync>(
        &mut self,
        value: T,
        label: Option<&str>,
    ) -> Result<ComponentBit, StoreError> {
        self.register(ComponentKind::shared(value), label)
    }

    /// Registers a per-entity kind whose factory runs for every entity the
    /// kind is put on.
    ///
    /// `A` is the construction-argument type descriptors must carry;
    /// zero-argument factories take `()`.
    pub fn register_per_entity<A, T, F>(
        &mut self,
        factory: F,
        label: Option<&str>,
    ) -> Result<ComponentBit, StoreError>
    where
        A: 'static + Send + Sync,
        T: 'static + Send + Sync,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        self.register(ComponentKind::per_entity(factory), label)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Entity Assembly
    // ─────────────────────────────────────────────────────────────────────

    /// Creates an entity carrying the described components.
    ///
    /// Fails without creating anything if any descriptor names an
    /// unregistered bit or its factory arguments do not match. A bit
    /// repeated in one call indexes the entity once and stores the later
    /// value.
    pub fn spawn<I>(&mut self, components: I) -> Result<EntityId, StoreError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let resolved = components
            .into_iter()
            .map(|component| self.resolve(component))
            .collect::<Result<Vec<_>, _>>()?;

        let id = self.store.next_id();
        self.store.push(EntityRecord {
            mask: Mask::EMPTY,
            record: Record::new(id),
        });
        let count = resolved.len();
        for component in resolved {
            self.commit(id, component);
        }

        log::debug!("Spawned entity {} with {count} component(s)", id.index);
        Ok(id)
    }

    /// Puts the described components on an existing entity.
    ///
    /// Resolution is all-or-nothing like [`World::spawn`], with the entity
    /// checked first. Re-attaching a bit the entity already carries
    /// replaces the stored value without duplicating its index entry.
    pub fn attach<I>(&mut self, entity: EntityId, components: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        if !self.store.contains(entity) {
            return Err(StoreError::UnknownEntity { id: entity });
        }

        let resolved = components
            .into_iter()
            .map(|component| self.resolve(component))
            .collect::<Result<Vec<_>, _>>()?;

        let count = resolved.len();
        for component in resolved {
            self.commit(entity, component);
        }

        log::debug!("Attached {count} component(s) to entity {}", entity.index);
        Ok(())
    }

    /// Takes component bits off an existing entity.
    ///
    /// Clears each bit from the mask and removes the entity from that bit's
    /// index; stored values stay in the record so re-attachment or late
    /// readers still see the last value. Bits the entity does not carry are
    /// no-ops; unknown bits fail the whole call before any change.
    pub fn detach<I>(&mut self, entity: EntityId, bits: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = ComponentBit>,
    {
        if !self.store.contains(entity) {
            return Err(StoreError::UnknownEntity { id: entity });
        }

        let bits: Vec<ComponentBit> = bits.into_iter().collect();
        for &bit in &bits {
            if !self.registry.contains(bit) {
                return Err(StoreError::UnknownComponent { bit: bit.raw() });
            }
        }

        let row = entity.index as usize;
        let mut count = 0;
        for bit in bits {
            if self.store.records[row].mask.contains(bit) {
                self.store.records[row].mask.remove(bit);
                self.store.index_remove(bit, entity);
                count += 1;
            }
        }

        log::debug!("Detached {count} component(s) from entity {}", entity.index);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Builds a query handle from include/exclude terms.
    ///
    /// Every term's bit is validated against the registry here, so
    /// evaluation itself never errors. The handle is reusable; hold it for
    /// as long as the filter is needed and read it through
    /// [`Query::iter`]/[`Query::iter_mut`].
    pub fn query<I>(&self, terms: I) -> Result<Query, StoreError>
    where
        I: IntoIterator<Item = Term>,
    {
        let terms: Vec<Term> = terms.into_iter().collect();
        for term in &terms {
            let bit = term.bit();
            if !self.registry.contains(bit) {
                return Err(StoreError::UnknownComponent { bit: bit.raw() });
            }
        }
        Ok(Query::new(terms))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────

    /// The data record of an entity, or `None` for an id this world never
    /// produced.
    pub fn record(&self, entity: EntityId) -> Option<&Record> {
        self.store.get(entity).map(|entry| &entry.record)
    }

    /// Mutable access to an entity's data record.
    pub fn record_mut(&mut self, entity: EntityId) -> Option<&mut Record> {
        self.store.get_mut(entity).map(|entry| &mut entry.record)
    }

    /// The component mask of an entity.
    pub fn mask(&self, entity: EntityId) -> Option<Mask> {
        self.store.get(entity).map(|entry| entry.mask)
    }

    /// Returns `true` if this world produced the id.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.store.contains(entity)
    }

    /// The number of entities ever spawned.
    pub fn entity_count(&self) -> usize {
        self.store.len()
    }

    /// The number of registered component kinds.
    pub fn kind_count(&self) -> usize {
        self.registry.len()
    }

    /// Iterates every entity's record in creation order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.store.iter().map(|entry| &entry.record)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    /// Checks one descriptor against the registry and produces the value it
    /// will store. Reads only; the store is untouched until every
    /// descriptor of the call has passed through here.
    fn resolve(&self, component: Descriptor) -> Result<ResolvedComponent, StoreError> {
        let Descriptor { bit, args } = component;
        let entry = self.registry.resolve(bit)?;

        let key = match &entry.label {
            Some(label) => DataKey::Label(label.clone()),
            None => DataKey::Bit(bit),
        };

        // Tags and shared kinds ignore descriptor arguments; only a
        // per-entity factory consumes them.
        let value = match &entry.kind {
            ComponentKind::Tag => None,
            ComponentKind::Shared(constant) => {
                Some((key, ComponentValue::Shared(constant.clone())))
            }
            ComponentKind::PerEntity(factory) => {
                let produced = factory(args.unwrap_or_else(FactoryArgs::unit))?;
                Some((key, ComponentValue::Owned(produced)))
            }
        };

        Ok(ResolvedComponent { bit, value })
    }

    /// Writes one resolved component onto an entity row. Infallible; the
    /// mask check keeps the per-bit index free of duplicates when a bit is
    /// repeated or re-attached.
    fn commit(&mut self, entity: EntityId, component: ResolvedComponent) {
        let row = entity.index as usize;
        if !self.store.records[row].mask.contains(component.bit) {
            self.store.records[row].mask.insert(component.bit);
            self.store.index_append(component.bit, entity);
        }
        if let Some((key, value)) = component.value {
            self.store.records[row].record.insert(key, value);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
