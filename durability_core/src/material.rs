//! Material multipliers - keyword sets to a single durability factor
//!
//! Positive table values are materials and are combined with a geometric
//! mean, so an item tagged with several materials is not more fragile just
//! for having more tags. Negative values are "other" factors and multiply
//! in by magnitude. A zero makes the item immune.

use crate::types::KeywordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Neutral factor for items with no mapped material
pub const DEFAULT_NO_MATERIAL_MULT: f64 = 2.5;

/// Keyword to multiplier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    multipliers: HashMap<KeywordId, f64>,
    no_material: f64,
}

impl Default for MaterialTable {
    fn default() -> Self {
        MaterialTable {
            multipliers: HashMap::new(),
            no_material: DEFAULT_NO_MATERIAL_MULT,
        }
    }
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a keyword; the first mapping of a keyword wins
    pub fn insert(&mut self, keyword: KeywordId, multiplier: f64) -> bool {
        if self.multipliers.contains_key(&keyword) {
            return false;
        }
        self.multipliers.insert(keyword, multiplier);
        true
    }

    pub fn get(&self, keyword: KeywordId) -> Option<f64> {
        self.multipliers.get(&keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// Factor used when none of an item's keywords is a material
    pub fn no_material(&self) -> f64 {
        self.no_material
    }

    pub fn set_no_material(&mut self, value: f64) {
        self.no_material = value;
    }

    /// Combined multiplier for an item's keywords
    pub fn multiplier(&self, keywords: &[KeywordId]) -> f64 {
        if keywords.is_empty() {
            return 1.0;
        }

        let mut other = 1.0;
        let mut product = 1.0;
        let mut materials = 0u32;

        for (i, keyword) in keywords.iter().enumerate() {
            if keywords[..i].contains(keyword) {
                continue;
            }
            let Some(value) = self.get(*keyword) else {
                continue;
            };
            if value == 0.0 {
                return 0.0;
            }
            if value > 0.0 {
                materials += 1;
                product *= value;
            } else {
                other *= -value;
            }
        }

        let material = match materials {
            0 => self.no_material,
            1 => product,
            2 => product.sqrt(),
            3 => product.cbrt(),
            n => product.powf(1.0 / n as f64),
        };

        let ret = material * other;
        if ret.is_finite() && ret >= 0.0 {
            ret
        } else {
            0.0
        }
    }
}
