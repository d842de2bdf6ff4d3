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

use std::any::{self, Any};
use std::sync::Arc;

use weft_core::ecs::{ComponentBit, StoreError, MAX_COMPONENT_KINDS};

use crate::ecs::descriptor::FactoryArgs;

/// A value stored on one entity, type-erased.
type ProducedValue = Box<dyn Any + Send + Sync>;

/// The factory of a [`ComponentKind::PerEntity`] kind: consumes packed
/// construction arguments and produces the value stored on the entity.
pub type Factory = Box<dyn Fn(FactoryArgs) -> Result<ProducedValue, StoreError> + Send + Sync>;

/// What a component kind contributes to an entity, decided once at
/// registration time. Entity assembly dispatches on the shape; stored
/// values are never re-inspected to find out what they are.
pub enum ComponentKind {
    /// Mask membership only; never stores a value in the entity's record.
    Tag,
    /// One constant value, shared by every entity that carries the kind.
    Shared(Arc<dyn Any + Send + Sync>),
    /// A factory invoked with per-entity construction arguments at spawn or
    /// attach time; the produced value is owned by the entity's record.
    PerEntity(Factory),
}

impl ComponentKind {
    /// Creates a shared kind from a concrete constant.
    pub fn shared<T: 'static + Send + Sync>(value: T) -> Self {
        ComponentKind::Shared(Arc::new(value))
    }

    /// Creates a per-entity kind from a typed factory.
    ///
    /// The factory runs once for every descriptor that targets this kind.
    /// Its argument type `A` is what callers must pass through
    /// [`Descriptor::with_args`](crate::ecs::Descriptor::with_args); a
    /// mismatch fails resolution with [`StoreError::InvalidArgument`],
    /// naming both the expected and the received type. Zero-argument
    /// factories take `()`.
    pub fn per_entity<A, T, F>(factory: F) -> Self
    where
        A: 'static + Send + Sync,
        T: 'static + Send + Sync,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        ComponentKind::PerEntity(Box::new(move |args: FactoryArgs| {
            let FactoryArgs { value, type_name } = args;
            let value = value
                .downcast::<A>()
                .map_err(|_| StoreError::InvalidArgument {
                    context: "component factory arguments",
                    detail: format!(
                        "expected `{}`, received `{type_name}`",
                        any::type_name::<A>()
                    ),
                })?;
            Ok(Box::new(factory(*value)) as ProducedValue)
        }))
    }
}

/// Everything the registry knows about one registered kind.
pub struct KindEntry {
    pub(crate) kind: ComponentKind,
    pub(crate) label: Option<Arc<str>>,
}

impl KindEntry {
    /// The kind's shape and value source.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The display/access label, if one was registered.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Allocates component bits and stores each kind's value source and label.
///
/// Bits are handed out append-only: the index-th registration (counting from
/// zero) receives `1 << (1 + index)`, so registration order is deterministic
/// and a bit is never reused or reassigned. The label is stored as an
/// `Arc<str>` so that every record keyed by it shares one allocation.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registered kinds in allocation order; the entry for bit position `p`
    /// lives at index `p - 1`.
    entries: Vec<KindEntry>,
}

impl ComponentRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component kind, allocating the next bit in sequence.
    ///
    /// Fails with [`StoreError::RegistryFull`] once all
    /// [`MAX_COMPONENT_KINDS`] bits of the mask are taken.
    pub fn register(
        &mut self,
        kind: ComponentKind,
        label: Option<&str>,
    ) -> Result<ComponentBit, StoreError> {
        let position = self.entries.len() as u32 + 1;
        let bit = ComponentBit::from_position(position).ok_or(StoreError::RegistryFull {
            capacity: MAX_COMPONENT_KINDS,
        })?;

        self.entries.push(KindEntry {
            kind,
            label: label.map(Arc::from),
        });

        match label {
            Some(label) => log::debug!("Registered component '{label}' as bit {:#x}", bit.raw()),
            None => log::debug!("Registered unlabeled component as bit {:#x}", bit.raw()),
        }

        Ok(bit)
    }

    /// Looks up the entry for a bit.
    ///
    /// Fails with [`StoreError::UnknownComponent`] if the bit was never
    /// produced by this registry.
    pub fn resolve(&self, bit: ComponentBit) -> Result<&KindEntry, StoreError> {
        self.entries
            .get(bit.position() as usize - 1)
            .ok_or(StoreError::UnknownComponent { bit: bit.raw() })
    }

    /// Returns `true` if the bit was produced by this registry.
    pub fn contains(&self, bit: ComponentBit) -> bool {
        (bit.position() as usize) <= self.entries.len()
    }

    /// The number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
