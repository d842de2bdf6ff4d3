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

//! Defines the error hierarchy for the component store.

use crate::ecs::entity::EntityId;
use std::fmt;

/// An error raised by a store operation.
///
/// Every error is synchronous and raised before any state is mutated, so a
/// failed operation leaves the world exactly as it found it. None of these
/// are retried internally; the host decides whether to abort the operation
/// or the process.
#[derive(Debug)]
pub enum StoreError {
    /// A bit used in a descriptor, query, or detach list was never produced
    /// by this world's registry.
    UnknownComponent {
        /// The raw bit value that failed to resolve.
        bit: u64,
    },
    /// An attach or detach call referenced an entity that does not exist.
    UnknownEntity {
        /// The id that was not found in the entity table.
        id: EntityId,
    },
    /// A descriptor or argument had the wrong shape for the operation.
    InvalidArgument {
        /// The operation or input the argument belongs to.
        context: &'static str,
        /// What was wrong with it.
        detail: String,
    },
    /// A registration would push the next bit past the usable mask width.
    RegistryFull {
        /// The number of kinds the registry can hold.
        capacity: usize,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownComponent { bit } => {
                write!(f, "Component bit {bit:#x} was never registered")
            }
            StoreError::UnknownEntity { id } => {
                write!(f, "Entity {} does not exist in this world", id.index)
            }
            StoreError::InvalidArgument { context, detail } => {
                write!(f, "Invalid {context}: {detail}")
            }
            StoreError::RegistryFull { capacity } => {
                write!(
                    f,
                    "Registry is full: at most {capacity} component kinds fit in the mask"
                )
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_component_display() {
        let err = StoreError::UnknownComponent { bit: 0x40 };
        assert_eq!(format!("{err}"), "Component bit 0x40 was never registered");
    }

    #[test]
    fn test_unknown_entity_display() {
        let err = StoreError::UnknownEntity {
            id: EntityId { index: 7 },
        };
        assert_eq!(format!("{err}"), "Entity 7 does not exist in this world");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = StoreError::InvalidArgument {
            context: "component factory arguments",
            detail: "expected `(f32, f32)`, received `&str`".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Invalid component factory arguments: expected `(f32, f32)`, received `&str`"
        );
    }

    #[test]
    fn test_registry_full_display() {
        let err = StoreError::RegistryFull { capacity: 63 };
        assert_eq!(
            format!("{err}"),
            "Registry is full: at most 63 component kinds fit in the mask"
        );
    }
}
