//! Prelude module for convenient imports
//!
//! ```rust
//! use durability_core::prelude::*;
//! ```

// Core types
pub use crate::item::{Item, ItemKind};
pub use crate::types::{FormId, Hand, HitEvent, HitFlags, KeywordId};

// Host collaborators
pub use crate::world::{
    Actor, ActorBase, ActorProfile, InventoryEntry, LogNotifier, Notifier, WornMarker,
};
pub use crate::memory::{KeywordRegistry, MemoryActor};

// Decisions
pub use crate::degrade::{DegradeOutcome, WearRequest};
pub use crate::destroy::SweepOutcome;
pub use crate::hit::{HitHandler, HitReport};

// Config
pub use crate::config::{Settings, SharedSettings};
