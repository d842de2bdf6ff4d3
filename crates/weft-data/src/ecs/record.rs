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

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use weft_core::ecs::{ComponentBit, EntityId};

/// The key a component's value is stored under in an entity's record.
///
/// A kind registered with a label stores under that label; an unlabeled kind
/// stores under its bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataKey {
    /// The kind's registered label.
    Label(Arc<str>),
    /// The kind's bit, used when no label was registered.
    Bit(ComponentBit),
}

impl From<&str> for DataKey {
    fn from(label: &str) -> Self {
        DataKey::Label(Arc::from(label))
    }
}

impl From<ComponentBit> for DataKey {
    fn from(bit: ComponentBit) -> Self {
        DataKey::Bit(bit)
    }
}

/// One stored component value, type-erased.
///
/// Values produced by a per-entity factory are owned by their record and can
/// be mutated in place; shared constants point at the registry's single
/// allocation and are immutable through records.
pub enum ComponentValue {
    /// A factory-produced value, exclusively owned by one record.
    Owned(Box<dyn Any + Send + Sync>),
    /// The registered constant of a shared kind; every carrying record holds
    /// the same allocation.
    Shared(Arc<dyn Any + Send + Sync>),
}

impl ComponentValue {
    /// Casts the stored value for reads.
    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        match self {
            ComponentValue::Owned(value) => value.as_ref(),
            ComponentValue::Shared(value) => value.as_ref(),
        }
    }

    /// Casts the stored value for writes.
    ///
    /// Returns `None` for a shared constant: those are owned by the registry
    /// and visible through every carrying entity, so records only hand out
    /// mutable access to per-entity values.
    pub fn as_any_mut(&mut self) -> Option<&mut (dyn Any + Send + Sync)> {
        match self {
            ComponentValue::Owned(value) => Some(value.as_mut()),
            ComponentValue::Shared(_) => None,
        }
    }

    /// Returns `true` if this is a shared constant.
    pub fn is_shared(&self) -> bool {
        matches!(self, ComponentValue::Shared(_))
    }
}

/// One entity's data mapping: its id plus every resolved component value,
/// keyed by label-or-bit.
///
/// Records are what queries yield; a system reads and writes component
/// values through the typed accessors and can always recover which entity
/// it is looking at via [`Record::entity`].
pub struct Record {
    entity: EntityId,
    values: HashMap<DataKey, ComponentValue>,
}

impl Record {
    /// Creates an empty record for the given entity.
    pub(crate) fn new(entity: EntityId) -> Self {
        Self {
            entity,
            values: HashMap::new(),
        }
    }

    /// Stores a resolved value, replacing any previous value under the key.
    pub(crate) fn insert(&mut self, key: DataKey, value: ComponentValue) {
        self.values.insert(key, value);
    }

    /// The entity this record belongs to.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Returns the raw stored value for a key.
    pub fn get(&self, key: impl Into<DataKey>) -> Option<&ComponentValue> {
        self.values.get(&key.into())
    }

    /// Returns the stored value for a key, downcast to `T`.
    ///
    /// `None` if the key is absent or the value is not a `T`.
    pub fn get_as<T: 'static>(&self, key: impl Into<DataKey>) -> Option<&T> {
        self.get(key)?.as_any().downcast_ref::<T>()
    }

    /// Returns the raw stored value for a key, mutably.
    pub fn get_mut(&mut self, key: impl Into<DataKey>) -> Option<&mut ComponentValue> {
        self.values.get_mut(&key.into())
    }

    /// Returns the stored value for a key, downcast mutably to `T`.
    ///
    /// `None` if the key is absent, the value is not a `T`, or the value is
    /// a shared constant.
    pub fn get_mut_as<T: 'static>(&mut self, key: impl Into<DataKey>) -> Option<&mut T> {
        self.get_mut(key)?.as_any_mut()?.downcast_mut::<T>()
    }

    /// Returns `true` if a value is stored under the key.
    ///
    /// Note that tag components never store a value, so their bit answers
    /// `false` here even while set in the entity's mask.
    pub fn contains(&self, key: impl Into<DataKey>) -> bool {
        self.values.contains_key(&key.into())
    }

    /// The number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the keys of the stored values, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &DataKey> {
        self.values.keys()
    }
}
