//! Item forms as seen by the decision engine

use crate::types::{FormId, KeywordId};
use serde::{Deserialize, Serialize};

/// What kind of item a form is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon {
        /// Stagger bonus of the weapon
        stagger: f64,
    },
    Armor {
        rating: u32,
        shield: bool,
    },
    /// Anything else that can sit in an inventory
    Misc,
}

/// Base form of an inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: FormId,
    /// Display name, may be empty
    pub name: String,
    /// Base weight of one unit
    pub weight: f64,
    pub kind: ItemKind,
    /// Whether the item may be equipped/used by actors
    #[serde(default = "default_playable")]
    pub playable: bool,
    #[serde(default)]
    pub keywords: Vec<KeywordId>,
}

fn default_playable() -> bool {
    true
}

impl Item {
    /// Create a playable misc item with no keywords
    pub fn misc(id: FormId, name: &str, weight: f64) -> Self {
        Item {
            id,
            name: name.to_string(),
            weight,
            kind: ItemKind::Misc,
            playable: true,
            keywords: Vec::new(),
        }
    }

    pub fn weapon(id: FormId, name: &str, weight: f64, stagger: f64) -> Self {
        Item {
            kind: ItemKind::Weapon { stagger },
            ..Item::misc(id, name, weight)
        }
    }

    pub fn armor(id: FormId, name: &str, weight: f64, rating: u32) -> Self {
        Item {
            kind: ItemKind::Armor {
                rating,
                shield: false,
            },
            ..Item::misc(id, name, weight)
        }
    }

    pub fn shield(id: FormId, name: &str, weight: f64, rating: u32) -> Self {
        Item {
            kind: ItemKind::Armor {
                rating,
                shield: true,
            },
            ..Item::misc(id, name, weight)
        }
    }

    /// Builder-style keyword attachment
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = KeywordId>) -> Self {
        self.keywords.extend(keywords);
        self
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { .. })
    }

    pub fn is_armor(&self) -> bool {
        matches!(self.kind, ItemKind::Armor { .. })
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ItemKind::Armor { shield: true, .. })
    }

    /// Weapons and shields can take a blocked hit
    pub fn can_block(&self) -> bool {
        self.is_weapon() || self.is_shield()
    }

    /// Armor rating, 0 for non-armor
    pub fn armor_rating(&self) -> u32 {
        match self.kind {
            ItemKind::Armor { rating, .. } => rating,
            _ => 0,
        }
    }

    /// Stagger bonus, 0 for non-weapons
    pub fn stagger(&self) -> f64 {
        match self.kind {
            ItemKind::Weapon { stagger } => stagger,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_block() {
        let sword = Item::weapon(FormId(1), "Iron Sword", 9.0, 0.75);
        let shield = Item::shield(FormId(2), "Iron Shield", 12.0, 20);
        let helmet = Item::armor(FormId(3), "Iron Helmet", 5.0, 15);
        let gem = Item::misc(FormId(4), "Ruby", 0.1);

        assert!(sword.can_block());
        assert!(shield.can_block());
        assert!(!helmet.can_block());
        assert!(!gem.can_block());
    }

    #[test]
    fn test_accessors() {
        let helmet = Item::armor(FormId(3), "Iron Helmet", 5.0, 15);
        assert_eq!(helmet.armor_rating(), 15);
        assert!((helmet.stagger() - 0.0).abs() < f64::EPSILON);

        let sword = Item::weapon(FormId(1), "Iron Sword", 9.0, 0.75);
        assert_eq!(sword.armor_rating(), 0);
        assert!((sword.stagger() - 0.75).abs() < f64::EPSILON);
    }
}
