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

//! Component bit identifiers and the masks built from them.

use crate::ecs::error::StoreError;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Maximum number of component kinds a single registry can allocate.
///
/// Bits live in a `u64` and position 0 is never handed out (the first
/// registered kind gets `1 << 1`), which leaves positions 1 through 63.
/// Registration past this ceiling fails with [`StoreError::RegistryFull`]
/// instead of silently wrapping.
pub const MAX_COMPONENT_KINDS: usize = 63;

/// The identity of one registered component kind: a single power-of-two bit.
///
/// Bits are allocated sequentially by the registry (`1 << (1 + index)` for the
/// index-th registration) and are never reused or reassigned. Only values with
/// exactly one set bit above position 0 are representable, so a
/// `ComponentBit` can always be OR'd into a [`Mask`] without colliding with
/// another kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct ComponentBit(u64);

impl ComponentBit {
    /// Validates a raw bit value: exactly one set bit, and not bit 0.
    ///
    /// Returns `None` for zero, for multi-bit values, and for `1` (position 0
    /// is reserved so that a bit value can never be confused with a boolean).
    #[inline]
    pub fn from_raw(raw: u64) -> Option<Self> {
        if raw.is_power_of_two() && raw != 1 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Builds the bit for a given position in the mask, valid for 1..=63.
    ///
    /// Position here is the exponent: `from_position(1)` is the first
    /// allocatable bit (`2`), `from_position(63)` the last.
    #[inline]
    pub fn from_position(position: u32) -> Option<Self> {
        if (1..=MAX_COMPONENT_KINDS as u32).contains(&position) {
            Some(Self(1 << position))
        } else {
            None
        }
    }

    /// Returns the raw bit value.
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Returns the bit's position in the mask (the exponent), in 1..=63.
    #[inline]
    pub const fn position(&self) -> u32 {
        self.0.trailing_zeros()
    }
}

impl TryFrom<u64> for ComponentBit {
    type Error = StoreError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(StoreError::InvalidArgument {
            context: "component bit",
            detail: format!("{raw} is not a single power-of-two bit above position 0"),
        })
    }
}

impl From<ComponentBit> for u64 {
    fn from(bit: ComponentBit) -> u64 {
        bit.0
    }
}

/// The bitwise OR of all component bits an entity currently carries.
///
/// A mask answers membership questions without touching any stored data:
/// an entity has component kind `B` if and only if its mask contains `B`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Mask(u64);

impl Mask {
    /// The mask with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Returns `true` if the given component bit is set in this mask.
    #[inline]
    pub const fn contains(&self, bit: ComponentBit) -> bool {
        (self.0 & bit.raw()) != 0
    }

    /// Returns `true` if every bit of `other` is set in this mask.
    #[inline]
    pub const fn contains_all(&self, other: Mask) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns `true` if any bit of `other` is set in this mask.
    #[inline]
    pub const fn intersects(&self, other: Mask) -> bool {
        (self.0 & other.0) != 0
    }

    /// Sets the given component bit.
    #[inline]
    pub fn insert(&mut self, bit: ComponentBit) {
        self.0 |= bit.raw();
    }

    /// Clears the given component bit.
    #[inline]
    pub fn remove(&mut self, bit: ComponentBit) {
        self.0 &= !bit.raw();
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw mask value.
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl From<ComponentBit> for Mask {
    fn from(bit: ComponentBit) -> Self {
        Self(bit.raw())
    }
}

impl BitOr for Mask {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr<ComponentBit> for Mask {
    type Output = Self;
    fn bitor(self, bit: ComponentBit) -> Self {
        Self(self.0 | bit.raw())
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOrAssign<ComponentBit> for Mask {
    fn bitor_assign(&mut self, bit: ComponentBit) {
        self.0 |= bit.raw();
    }
}

impl FromIterator<ComponentBit> for Mask {
    fn from_iter<I: IntoIterator<Item = ComponentBit>>(bits: I) -> Self {
        let mut mask = Mask::EMPTY;
        for bit in bits {
            mask |= bit;
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_accepts_only_single_high_bits() {
        assert_eq!(ComponentBit::from_raw(2).map(|b| b.raw()), Some(2));
        assert_eq!(ComponentBit::from_raw(1 << 63).map(|b| b.raw()), Some(1 << 63));
        assert!(ComponentBit::from_raw(0).is_none(), "zero is not a bit");
        assert!(ComponentBit::from_raw(1).is_none(), "position 0 is reserved");
        assert!(ComponentBit::from_raw(6).is_none(), "two set bits");
    }

    #[test]
    fn test_from_position_bounds() {
        assert_eq!(ComponentBit::from_position(1).map(|b| b.raw()), Some(2));
        assert_eq!(ComponentBit::from_position(63).map(|b| b.position()), Some(63));
        assert!(ComponentBit::from_position(0).is_none());
        assert!(ComponentBit::from_position(64).is_none());
    }

    #[test]
    fn test_mask_membership_ops() {
        let a = ComponentBit::from_position(1).unwrap();
        let b = ComponentBit::from_position(2).unwrap();
        let c = ComponentBit::from_position(3).unwrap();

        let mut mask = Mask::from(a) | b;
        assert!(mask.contains(a));
        assert!(mask.contains(b));
        assert!(!mask.contains(c));
        assert!(mask.contains_all(Mask::from(a) | b));
        assert!(!mask.contains_all(Mask::from(a) | c));
        assert!(mask.intersects(Mask::from(b) | c));

        mask.remove(b);
        assert!(!mask.contains(b));
        mask.remove(b);
        assert!(mask.contains(a), "removing an absent bit is a no-op");

        mask.insert(c);
        assert_eq!(mask.raw(), a.raw() | c.raw());
    }

    #[test]
    fn test_mask_from_iterator() {
        let bits = [1, 2, 5]
            .into_iter()
            .map(|p| ComponentBit::from_position(p).unwrap());
        let mask: Mask = bits.collect();
        assert_eq!(mask.raw(), (1 << 1) | (1 << 2) | (1 << 5));
    }
}
