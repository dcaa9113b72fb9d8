//! In-memory host - actors and keyword registry without a game engine
//!
//! Used by the simulator and the tests. Removal and equip rules follow the
//! engine's inventory model: a stack's count is its container count plus the
//! entry's delta, and each worn marker pins one unit of that stack.

use crate::config::KeywordLookup;
use crate::item::Item;
use crate::types::{FormId, Hand, KeywordId};
use crate::world::{
    Actor, ActorProfile, CarriedWeight, ContainerObject, EntryId, InventoryEntry, WornMarker,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Name to id table for keywords
#[derive(Debug, Clone, Default)]
pub struct KeywordRegistry {
    ids: HashMap<String, KeywordId>,
    next: u32,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        KeywordRegistry {
            ids: HashMap::new(),
            next: 1,
        }
    }

    /// Id of `name`, registering it on first use
    pub fn intern(&mut self, name: &str) -> KeywordId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = KeywordId(self.next);
        self.next += 1;
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<KeywordId> {
        self.ids.get(name).copied()
    }
}

impl KeywordLookup for KeywordRegistry {
    fn lookup(&self, editor_id: &str) -> Option<KeywordId> {
        self.get(editor_id)
    }
}

/// Actor whose inventory lives in plain vectors
#[derive(Debug, Clone)]
pub struct MemoryActor {
    pub name: String,
    pub profile: ActorProfile,
    pub damage_resist: f64,
    pub attack_hand: Option<Hand>,
    pub container: Vec<ContainerObject>,
    pub entries: Vec<InventoryEntry>,
    /// Number of armor recompute notifications received
    pub armor_changes: u32,
}

impl MemoryActor {
    pub fn new(name: &str, profile: ActorProfile) -> Self {
        MemoryActor {
            name: name.to_string(),
            profile,
            damage_resist: 0.0,
            attack_hand: None,
            container: Vec::new(),
            entries: Vec::new(),
            armor_changes: 0,
        }
    }

    fn container_count(&self, item: FormId) -> i32 {
        self.container
            .iter()
            .filter(|c| c.item == item)
            .map(|c| c.count)
            .sum()
    }

    fn entry_or_insert(&mut self, item: &Arc<Item>) -> EntryId {
        match self.find_entry(item.id) {
            Some(id) => id,
            None => {
                self.entries.push(InventoryEntry::new(Arc::clone(item), 0));
                self.entries.len() - 1
            }
        }
    }

    /// Add items picked up during play (inventory delta)
    pub fn carry(&mut self, item: &Arc<Item>, count: i32) -> EntryId {
        let id = self.entry_or_insert(item);
        self.entries[id].count_delta += count;
        id
    }

    /// Add items to the base container
    pub fn stock(&mut self, item: &Arc<Item>, count: i32) -> EntryId {
        self.container.push(ContainerObject {
            item: item.id,
            count,
        });
        self.entry_or_insert(item)
    }

    /// Units of `item` held
    pub fn count(&self, item: FormId) -> i32 {
        let delta = self
            .find_entry(item)
            .map(|id| self.entries[id].count_delta)
            .unwrap_or(0);
        delta + self.container_count(item)
    }

    /// Put a held unit on; returns false when there is no spare unit
    pub fn equip(&mut self, item: FormId, hand: Hand) -> bool {
        let Some(id) = self.find_entry(item) else {
            return false;
        };
        let total = self.count(item);
        let entry = &mut self.entries[id];
        if total <= entry.worn.len() as i32 {
            return false;
        }
        entry.worn.push(WornMarker::new(hand));
        true
    }

    /// Health of the worn instance of `item` on `hand`
    pub fn worn_health(&self, item: FormId, hand: Hand) -> Option<f64> {
        let id = self.find_entry(item)?;
        self.entries[id].worn_marker(hand)?.health
    }
}

impl Actor for MemoryActor {
    fn profile(&self) -> ActorProfile {
        self.profile
    }

    fn damage_resist(&self) -> f64 {
        self.damage_resist
    }

    fn attack_hand(&self) -> Option<Hand> {
        self.attack_hand
    }

    fn wielded(&self, hand: Hand) -> Option<EntryId> {
        self.entries.iter().position(|e| {
            let held = match hand {
                Hand::Right => e.item.is_weapon(),
                Hand::Left => e.item.can_block(),
            };
            held && e.worn_marker(hand).is_some()
        })
    }

    fn equipped(&self) -> Vec<Arc<Item>> {
        self.entries
            .iter()
            .flat_map(|e| e.worn.iter().map(move |_| Arc::clone(&e.item)))
            .collect()
    }

    fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    fn container(&self) -> &[ContainerObject] {
        &self.container
    }

    fn carried_weight(&self) -> Option<CarriedWeight> {
        let mut weight = CarriedWeight::default();
        for entry in &self.entries {
            let units = self.count(entry.item.id).max(0) as f64;
            let w = entry.item.weight * units;
            weight.total += w;
            if entry.item.is_armor() {
                weight.armor += w;
            }
        }
        Some(weight)
    }

    fn set_worn_health(&mut self, entry: EntryId, hand: Hand, health: f64) {
        if let Some(marker) = self
            .entries
            .get_mut(entry)
            .and_then(|e| e.worn.iter_mut().find(|w| w.hand == hand))
        {
            marker.health = Some(health);
        }
    }

    fn remove_item(&mut self, item: FormId, count: u32, worn: Option<(EntryId, Hand)>) {
        let Some(id) = self.find_entry(item) else {
            return;
        };
        let held = self.count(item).max(0);
        let count = (count as i32).min(held);
        if count <= 0 {
            return;
        }

        let entry = &mut self.entries[id];
        entry.count_delta -= count;
        if let Some((worn_id, hand)) = worn {
            if worn_id == id {
                if let Some(pos) = entry.worn.iter().position(|w| w.hand == hand) {
                    entry.worn.remove(pos);
                }
            }
        }

        let remaining = held - count;
        let entry = &mut self.entries[id];
        while entry.worn.len() as i32 > remaining {
            entry.worn.pop();
        }
        if remaining == 0 {
            self.entries.remove(id);
            self.container.retain(|c| c.item != item);
        }
    }

    fn armor_changed(&mut self) {
        self.armor_changes += 1;
    }
}
