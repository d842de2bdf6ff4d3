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

use weft_core::ecs::ComponentBit;

/// Type-erased construction arguments handed to a per-entity factory.
///
/// Built internally from the arguments of a [`Descriptor`]; the concrete
/// argument type is recorded alongside the box so that a mismatch against
/// the factory's expected type can be reported with both names instead of a
/// bare downcast failure.
pub struct FactoryArgs {
    pub(crate) value: Box<dyn Any + Send + Sync>,
    pub(crate) type_name: &'static str,
}

impl FactoryArgs {
    /// Boxes a concrete argument value, remembering its type name.
    pub(crate) fn pack<A: 'static + Send + Sync>(args: A) -> Self {
        Self {
            value: Box::new(args),
            type_name: any::type_name::<A>(),
        }
    }

    /// The arguments a bare-bit descriptor resolves to. Zero-argument
    /// factories are registered over `()` for exactly this case.
    pub(crate) fn unit() -> Self {
        Self::pack(())
    }
}

/// One component to put on an entity during a spawn or attach call.
///
/// A descriptor is either a bare bit (tag and shared kinds need nothing
/// else) or a bit paired with the construction arguments its per-entity
/// factory will be invoked with.
///
/// # Examples
///
/// ```rust,ignore
/// world.spawn([
///     Descriptor::with_args(position, (4.0_f32, 2.0_f32)),
///     Descriptor::new(can_move),
/// ])?;
/// ```
pub struct Descriptor {
    pub(crate) bit: ComponentBit,
    pub(crate) args: Option<FactoryArgs>,
}

impl Descriptor {
    /// Creates a bare descriptor for the given component bit.
    pub fn new(bit: ComponentBit) -> Self {
        Self { bit, args: None }
    }

    /// Creates a descriptor carrying construction arguments for the kind's
    /// factory.
    ///
    /// The argument type must match the type the factory was registered
    /// over, or resolution fails with
    /// [`StoreError::InvalidArgument`](weft_core::ecs::StoreError::InvalidArgument).
    pub fn with_args<A: 'static + Send + Sync>(bit: ComponentBit, args: A) -> Self {
        Self {
            bit,
            args: Some(FactoryArgs::pack(args)),
        }
    }

    /// The component bit this descriptor targets.
    pub fn bit(&self) -> ComponentBit {
        self.bit
    }
}

impl From<ComponentBit> for Descriptor {
    fn from(bit: ComponentBit) -> Self {
        Self::new(bit)
    }
}
