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

//! Defines core types related to entities in the component store.

use serde::{Deserialize, Serialize};

/// A unique identifier for an entity in the world.
///
/// Indices are handed out sequentially starting at 0 and are never recycled:
/// the store is append-only, so an `EntityId` stays valid for the lifetime of
/// the world that produced it. A bare index is therefore enough; no
/// generation counter is needed to guard against stale handles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId {
    /// The index of the entity's record in the world's central entity table.
    pub index: u32,
}
