//! Host engine collaborators - actors, inventories and player notifications
//!
//! The decision engine never owns game state. Everything it reads or
//! mutates goes through the [`Actor`] trait, and everything it shows the
//! player goes through a [`Notifier`].

use crate::item::Item;
use crate::types::{FormId, Hand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Index of an entry in [`Actor::entries`]
pub type EntryId = usize;

/// Per-instance "worn" metadata on an inventory stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WornMarker {
    pub hand: Hand,
    /// Persisted durability, `None` until the first degradation
    pub health: Option<f64>,
}

impl WornMarker {
    pub fn new(hand: Hand) -> Self {
        WornMarker { hand, health: None }
    }

    /// Current health, 1.0 when never degraded
    pub fn health(&self) -> f64 {
        self.health.unwrap_or(1.0)
    }
}

/// One stack of items in an actor's inventory changes
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    pub item: Arc<Item>,
    /// Count added or removed relative to the base container
    pub count_delta: i32,
    pub favorited: bool,
    pub quest_item: bool,
    /// Placeholder produced by a leveled list
    pub leveled: bool,
    pub worn: Vec<WornMarker>,
}

impl InventoryEntry {
    pub fn new(item: Arc<Item>, count_delta: i32) -> Self {
        InventoryEntry {
            item,
            count_delta,
            favorited: false,
            quest_item: false,
            leveled: false,
            worn: Vec::new(),
        }
    }

    /// First worn marker for the given side
    pub fn worn_marker(&self, hand: Hand) -> Option<&WornMarker> {
        self.worn.iter().find(|w| w.hand == hand)
    }

    pub fn is_worn(&self) -> bool {
        !self.worn.is_empty()
    }
}

/// A raw entry of an actor's base container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerObject {
    pub item: FormId,
    pub count: i32,
}

/// Weight totals the engine keeps for an inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarriedWeight {
    pub total: f64,
    /// Portion of `total` contributed by armor
    pub armor: f64,
}

impl CarriedWeight {
    pub fn non_armor(&self) -> f64 {
        self.total - self.armor
    }
}

/// Flags of an actor's base template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorBase {
    pub unique: bool,
    pub respawns: bool,
}

/// Role and status of an actor, used for probability scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub is_player: bool,
    pub teammate: bool,
    pub essential: bool,
    pub protected: bool,
    /// Base template, when the engine can resolve one
    pub base: Option<ActorBase>,
}

impl ActorProfile {
    pub fn player() -> Self {
        ActorProfile {
            is_player: true,
            base: Some(ActorBase {
                unique: true,
                respawns: false,
            }),
            ..Default::default()
        }
    }

    pub fn npc(base: ActorBase) -> Self {
        ActorProfile {
            base: Some(base),
            ..Default::default()
        }
    }
}

/// An actor and its inventory, as exposed by the host engine
///
/// Entry ids are positions in [`Actor::entries`]. They stay valid until the
/// next call to [`Actor::remove_item`].
pub trait Actor {
    /// Role and status flags
    fn profile(&self) -> ActorProfile;

    /// Current damage resist (armor rating) actor value
    fn damage_resist(&self) -> f64;

    /// Side of the attack currently being performed, `None` when not attacking
    fn attack_hand(&self) -> Option<Hand>;

    /// Inventory entry wielded in the given hand
    fn wielded(&self, hand: Hand) -> Option<EntryId>;

    /// All forms currently equipped
    fn equipped(&self) -> Vec<Arc<Item>>;

    /// Inventory changes
    fn entries(&self) -> &[InventoryEntry];

    /// Base container contents
    fn container(&self) -> &[ContainerObject];

    /// Weight totals, `None` when the actor has no inventory changes
    fn carried_weight(&self) -> Option<CarriedWeight>;

    /// Write health on the worn marker of `entry`, creating the health record if needed
    fn set_worn_health(&mut self, entry: EntryId, hand: Hand, health: f64);

    /// Remove `count` units of `item`, restricted to a worn instance when given
    fn remove_item(&mut self, item: FormId, count: u32, worn: Option<(EntryId, Hand)>);

    /// Armor-derived stats must be recomputed
    fn armor_changed(&mut self);

    fn is_player(&self) -> bool {
        self.profile().is_player
    }

    fn entry(&self, id: EntryId) -> Option<&InventoryEntry> {
        self.entries().get(id)
    }

    /// Entry whose base form is `item`
    fn find_entry(&self, item: FormId) -> Option<EntryId> {
        self.entries().iter().position(|e| e.item.id == item)
    }
}

/// One-way "show this to the player" sink
pub trait Notifier {
    fn notify(&mut self, text: &str);
}

impl Notifier for Vec<String> {
    fn notify(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Notifier that forwards messages to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, text: &str) {
        tracing::info!(target: "durability::notify", "{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worn_marker_default_health() {
        let marker = WornMarker::new(Hand::Left);
        assert!((marker.health() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_worn_marker_lookup() {
        let item = Arc::new(Item::misc(FormId(1), "Dagger", 2.0));
        let mut entry = InventoryEntry::new(item, 1);
        assert!(entry.worn_marker(Hand::Right).is_none());

        entry.worn.push(WornMarker {
            hand: Hand::Left,
            health: Some(0.5),
        });
        assert!(entry.is_worn());
        assert!(entry.worn_marker(Hand::Right).is_none());
        assert_eq!(entry.worn_marker(Hand::Left).and_then(|w| w.health), Some(0.5));
    }

    #[test]
    fn test_entry_clone_shares_item() {
        let item = Arc::new(Item::armor(FormId(2), "Iron Helmet", 5.0, 15));
        let mut entry = InventoryEntry::new(Arc::clone(&item), 1);
        entry.worn.push(WornMarker::new(Hand::Right));

        let copy = entry.clone();
        assert!(Arc::ptr_eq(&copy.item, &item));
        assert_eq!(copy, entry);
        assert_eq!(Arc::strong_count(&item), 3);
    }

    #[test]
    fn test_non_armor_weight() {
        let weight = CarriedWeight {
            total: 120.0,
            armor: 45.0,
        };
        assert!((weight.non_armor() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_vec_notifier() {
        let mut sink: Vec<String> = Vec::new();
        sink.notify("hello");
        assert_eq!(sink, vec!["hello".to_string()]);
    }
}
