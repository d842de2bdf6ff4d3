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

//! Implements weft's bitmask entity-component store.
//!
//! Each registered component kind owns one power-of-two bit; an entity is a
//! sequential id plus the OR of its kinds' bits and a record of resolved
//! values. A per-bit reverse index maps every bit to the entities carrying
//! it, which lets queries scan only the shortest relevant candidate list and
//! reuse their previous results whenever that list has not grown.
//!
//! The primary entry point for interacting with the store is the [`World`]
//! struct.

mod descriptor;
mod entity_store;
mod query;
mod record;
mod registry;
mod world;

pub use descriptor::{Descriptor, FactoryArgs};
pub use query::{Query, QueryIter, QueryIterMut, Term};
pub use record::{ComponentValue, DataKey, Record};
pub use registry::{ComponentKind, ComponentRegistry, Factory, KindEntry};
pub use world::World;

pub use weft_core::ecs::{ComponentBit, EntityId, Mask, StoreError, MAX_COMPONENT_KINDS};
