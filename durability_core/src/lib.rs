//! durability_core - Item wear, break and destruction decisions for combat hits
//!
//! This library provides:
//! - PickOne / PickList: Weighted random selection
//! - Group: Per-context probability multipliers
//! - MaterialTable: Keyword-driven material multipliers
//! - Degradation: Worn item health decay and break checks
//! - Destruction: Resistance-gated inventory sweeps
//! - HitHandler: One combat hit routed through all of the above

pub mod config;
pub mod degrade;
pub mod destroy;
pub mod group;
pub mod hit;
pub mod item;
pub mod material;
pub mod memory;
pub mod pick;
pub mod prelude;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use config::{ConfigError, Settings, SharedSettings};
pub use degrade::{degrade, degrade_with_rng, DegradeOutcome, WearRequest};
pub use destroy::{destroy, destroy_with_rng, RemovedStack, SweepOutcome};
pub use group::{Group, GroupActorInfo};
pub use hit::{HitHandler, HitReport};
pub use item::{Item, ItemKind};
pub use material::MaterialTable;
pub use memory::{KeywordRegistry, MemoryActor};
pub use pick::{PickList, PickOne};
pub use types::{FormId, Hand, HitEvent, HitFlags, KeywordId};
pub use world::{Actor, InventoryEntry, LogNotifier, Notifier, WornMarker};
