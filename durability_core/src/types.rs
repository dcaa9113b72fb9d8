//! Core types shared by the decision engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Identifier of a form (item, spell, projectile) in the host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub u32);

/// Identifier of a keyword (material tag) in the host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeywordId(pub u32);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Which hand (or worn slot) an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    /// Right hand, or any body slot
    Right,
    Left,
}

impl Hand {
    pub fn from_left(left: bool) -> Self {
        if left {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    pub fn is_left(self) -> bool {
        self == Hand::Left
    }
}

/// Circumstances of a single hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitFlags(u8);

impl HitFlags {
    pub const NONE: HitFlags = HitFlags(0);
    pub const POWER_ATTACK: HitFlags = HitFlags(1 << 0);
    pub const SNEAK_ATTACK: HitFlags = HitFlags(1 << 1);
    pub const BASH_ATTACK: HitFlags = HitFlags(1 << 2);
    pub const HIT_BLOCKED: HitFlags = HitFlags(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones
    pub fn from_bits_truncate(bits: u8) -> Self {
        HitFlags(bits & 0b1111)
    }

    /// True if any of `other`'s bits are set
    pub fn any(self, other: HitFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn power(self) -> bool {
        self.any(Self::POWER_ATTACK)
    }

    pub fn sneak(self) -> bool {
        self.any(Self::SNEAK_ATTACK)
    }

    pub fn bash(self) -> bool {
        self.any(Self::BASH_ATTACK)
    }

    pub fn blocked(self) -> bool {
        self.any(Self::HIT_BLOCKED)
    }
}

impl BitOr for HitFlags {
    type Output = HitFlags;

    fn bitor(self, rhs: HitFlags) -> HitFlags {
        HitFlags(self.0 | rhs.0)
    }
}

/// A combat hit notification from the host engine
///
/// The actors themselves are handed to the handler separately; the event
/// only carries what the engine reports about the contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Weapon or spell that caused the hit
    pub source: Option<FormId>,
    /// Projectile, for ranged hits
    pub projectile: Option<FormId>,
    pub flags: HitFlags,
}

impl HitEvent {
    /// Melee hit with the given weapon
    pub fn melee(source: FormId, flags: HitFlags) -> Self {
        HitEvent {
            source: Some(source),
            projectile: None,
            flags,
        }
    }
}
