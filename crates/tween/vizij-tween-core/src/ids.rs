//! Entity handles shared with the host runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque entity handle (index + generation) handed out by the host.
///
/// `EntityId::NONE` is the "no entity" sentinel used by pooled records after reset and by
/// steps that do not name a target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl EntityId {
    pub const NONE: EntityId = EntityId {
        index: u32::MAX,
        generation: u32::MAX,
    };

    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// `self`, or `fallback` when `self` is the sentinel.
    #[inline]
    pub fn or(self, fallback: EntityId) -> EntityId {
        if self.is_none() {
            fallback
        } else {
            self
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}
