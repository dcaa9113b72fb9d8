//! Engine settings and their TOML layout
//!
//! The file uses ini-style sections: `[Attack]`, `[Defense]`,
//! `[Break]`, `[Destroy]` and `[Materials]`. Every key is optional. Values
//! outside their accepted range are logged and the built-in default is kept.

use super::{ConfigError, KeywordLookup};
use crate::group::Group;
use crate::item::Item;
use crate::material::MaterialTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_KEY: &str = "__default__";

/// Break-probability exponents by health tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakExponent {
    /// Used when the new health is below 1.0
    pub low: f64,
    /// Used when the new health is still at 1.0; NaN disables breaking there
    pub high: f64,
}

impl Default for BreakExponent {
    fn default() -> Self {
        BreakExponent {
            low: 0.1,
            high: f64::NAN,
        }
    }
}

impl BreakExponent {
    pub fn select(&self, health: f64) -> f64 {
        if health >= 1.0 {
            self.high
        } else {
            self.low
        }
    }
}

/// Immutable engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub attack: Group,
    pub defense: Group,
    pub breaking: Group,
    pub destroy: Group,

    /// Health floor for worn items
    pub min_health: f64,
    /// Weight factor for non-blocking equipment on a blocked hit
    pub blocked_hit_other: f64,

    pub ignore_zero_armor: bool,
    pub break_exponent: BreakExponent,
    pub break_message: bool,

    /// Weight factor for favorited stacks in the destruction sweep
    pub destroy_favorite: f64,
    pub destroy_resist_base: f64,
    pub destroy_resist_pivot: f64,
    pub destroy_resist_exponent: f64,
    pub destroy_material_exponent: f64,
    /// Character budget of the destroy summary, 0 disables it
    pub destroy_message: u32,

    pub materials: MaterialTable,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            attack: Group::with_global(0.004),
            defense: Group::with_global(0.4),
            breaking: Group::with_global(0.01),
            destroy: Group::with_global(0.05),
            min_health: 0.01,
            blocked_hit_other: 0.0,
            ignore_zero_armor: true,
            break_exponent: BreakExponent::default(),
            break_message: true,
            destroy_favorite: 0.5,
            destroy_resist_base: 50.0,
            destroy_resist_pivot: 100.0,
            destroy_resist_exponent: 0.5,
            destroy_material_exponent: 0.5,
            destroy_message: 100,
            materials: MaterialTable::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text on top of the defaults
    pub fn parse(content: &str, keywords: &impl KeywordLookup) -> Result<Settings, ConfigError> {
        let raw: RawSettings = super::parse_toml(content)?;
        Ok(raw.into_settings(keywords))
    }

    /// Load settings from a TOML file on top of the defaults
    pub fn load(path: &Path, keywords: &impl KeywordLookup) -> Result<Settings, ConfigError> {
        let raw: RawSettings = super::load_toml(path)?;
        let settings = raw.into_settings(keywords);
        tracing::info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to the defaults if the file is unusable
    pub fn load_or_default(path: &Path, keywords: &impl KeywordLookup) -> Settings {
        Settings::load(path, keywords).unwrap_or_else(|err| {
            tracing::warn!("loading settings failed ({}): {}", path.display(), err);
            Settings::default()
        })
    }

    /// Settings from the bundled `config/durability.toml`
    pub fn bundled(keywords: &impl KeywordLookup) -> Settings {
        let toml = include_str!("../../config/durability.toml");
        Settings::parse(toml, keywords).unwrap_or_else(|err| {
            tracing::warn!("bundled settings unusable: {}", err);
            Settings::default()
        })
    }

    /// Material multiplier of an item
    pub fn material_mult(&self, item: &Item) -> f64 {
        self.materials.multiplier(&item.keywords)
    }

    /// Sweep weight of one unit of an item
    pub fn destroy_weight(&self, item: &Item) -> f64 {
        let mut res = item.weight;
        if self.destroy_material_exponent > 0.0 {
            res *= self.material_mult(item).powf(self.destroy_material_exponent);
        }
        res
    }

    /// Carried weight an actor can keep safe from a sweep, never below 1.0
    pub fn destroy_resist(&self, damage_resist: f64) -> f64 {
        let mut res = self.destroy_resist_base;
        let pivot = self.destroy_resist_pivot;
        let exponent = self.destroy_resist_exponent;
        if damage_resist > 0.0 && pivot > 0.0 && exponent > 0.0 {
            res += pivot * (damage_resist / pivot).powf(exponent);
        }
        if res > 1.0 {
            res
        } else {
            1.0
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    #[serde(rename = "Attack")]
    attack: RawGroup,
    #[serde(rename = "Defense")]
    defense: RawDefense,
    #[serde(rename = "Break")]
    breaking: RawBreak,
    #[serde(rename = "Destroy")]
    destroy: RawDestroy,
    #[serde(rename = "Materials")]
    materials: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawGroup {
    global: Option<f64>,
    player: Option<f64>,
    #[serde(rename = "NPC")]
    npc: Option<f64>,
    teammate: Option<f64>,
    essential: Option<f64>,
    protected: Option<f64>,
    unique: Option<f64>,
    respawns_not: Option<f64>,
    respawns: Option<f64>,
    power: Option<f64>,
    sneak: Option<f64>,
    bash: Option<f64>,
    block: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDefense {
    #[serde(flatten)]
    group: RawGroup,
    #[serde(rename = "blockedHitOther")]
    blocked_hit_other: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBreak {
    #[serde(flatten)]
    group: RawGroup,
    #[serde(rename = "ignoreZeroArmor")]
    ignore_zero_armor: Option<bool>,
    #[serde(rename = "Message")]
    message: Option<bool>,
    #[serde(rename = "ExponentLow")]
    exponent_low: Option<f64>,
    #[serde(rename = "ExponentHigh")]
    exponent_high: Option<f64>,
    #[serde(rename = "MinHealth")]
    min_health: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDestroy {
    #[serde(flatten)]
    group: RawGroup,
    #[serde(rename = "Favorite")]
    favorite: Option<f64>,
    #[serde(rename = "ResistBase")]
    resist_base: Option<f64>,
    #[serde(rename = "ResistPivot")]
    resist_pivot: Option<f64>,
    #[serde(rename = "ResistExponent")]
    resist_exponent: Option<f64>,
    #[serde(rename = "MaterialExponent")]
    material_exponent: Option<f64>,
    #[serde(rename = "Message")]
    message: Option<i64>,
}

/// Store `value` into `slot` when `valid` accepts it, warn otherwise
fn accept(section: &str, key: &str, value: Option<f64>, valid: fn(f64) -> bool, slot: &mut f64) {
    if let Some(v) = value {
        if valid(v) {
            *slot = v;
        } else {
            tracing::warn!("invalid value for {}.{}: {}", section, key, v);
        }
    }
}

fn non_negative(v: f64) -> bool {
    v >= 0.0
}

fn finite(v: f64) -> bool {
    v.is_finite()
}

fn finite_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn not_infinite(v: f64) -> bool {
    !v.is_infinite()
}

fn health_floor(v: f64) -> bool {
    v.is_finite() && v > 0.0 && v <= 1.0
}

impl RawGroup {
    fn apply(&self, section: &str, group: &mut Group) {
        let [respawns_not, respawns] = &mut group.respawns;
        let keys = [
            ("Global", self.global, &mut group.global),
            ("Player", self.player, &mut group.player),
            ("NPC", self.npc, &mut group.npc),
            ("Teammate", self.teammate, &mut group.teammate),
            ("Essential", self.essential, &mut group.essential),
            ("Protected", self.protected, &mut group.protected),
            ("Unique", self.unique, &mut group.unique),
            ("RespawnsNot", self.respawns_not, respawns_not),
            ("Respawns", self.respawns, respawns),
            ("Power", self.power, &mut group.power),
            ("Sneak", self.sneak, &mut group.sneak),
            ("Bash", self.bash, &mut group.bash),
            ("Block", self.block, &mut group.block),
        ];
        for (key, value, slot) in keys {
            accept(section, key, value, non_negative, slot);
        }
    }
}

impl RawSettings {
    fn into_settings(self, keywords: &impl KeywordLookup) -> Settings {
        let mut s = Settings::default();

        self.attack.apply("Attack", &mut s.attack);
        self.defense.group.apply("Defense", &mut s.defense);
        self.breaking.group.apply("Break", &mut s.breaking);
        self.destroy.group.apply("Destroy", &mut s.destroy);

        let defense = &self.defense;
        accept(
            "Defense",
            "blockedHitOther",
            defense.blocked_hit_other,
            finite_non_negative,
            &mut s.blocked_hit_other,
        );

        let brk = &self.breaking;
        if let Some(v) = brk.ignore_zero_armor {
            s.ignore_zero_armor = v;
        }
        if let Some(v) = brk.message {
            s.break_message = v;
        }
        accept("Break", "ExponentLow", brk.exponent_low, not_infinite, &mut s.break_exponent.low);
        accept(
            "Break",
            "ExponentHigh",
            brk.exponent_high,
            not_infinite,
            &mut s.break_exponent.high,
        );
        accept("Break", "MinHealth", brk.min_health, health_floor, &mut s.min_health);

        let d = &self.destroy;
        accept("Destroy", "Favorite", d.favorite, finite_non_negative, &mut s.destroy_favorite);
        accept("Destroy", "ResistBase", d.resist_base, finite, &mut s.destroy_resist_base);
        accept(
            "Destroy",
            "ResistPivot",
            d.resist_pivot,
            finite_non_negative,
            &mut s.destroy_resist_pivot,
        );
        accept(
            "Destroy",
            "ResistExponent",
            d.resist_exponent,
            finite,
            &mut s.destroy_resist_exponent,
        );
        accept(
            "Destroy",
            "MaterialExponent",
            d.material_exponent,
            finite,
            &mut s.destroy_material_exponent,
        );
        match d.message.map(u32::try_from) {
            Some(Ok(v)) => s.destroy_message = v,
            Some(Err(_)) => tracing::warn!("invalid value for Destroy.Message: {:?}", d.message),
            None => {}
        }

        for (name, value) in &self.materials {
            let v = match value {
                toml::Value::Float(f) => *f,
                toml::Value::Integer(i) => *i as f64,
                other => {
                    tracing::warn!("invalid value for keyword {}: {}", name, other);
                    continue;
                }
            };
            if name == DEFAULT_KEY {
                if finite_non_negative(v) {
                    s.materials.set_no_material(v);
                } else {
                    tracing::warn!("invalid value for keyword {}: {}", name, v);
                }
                continue;
            }
            if !v.is_finite() {
                tracing::warn!("invalid value for keyword {}: {}", name, v);
                continue;
            }
            match keywords.lookup(name) {
                Some(id) => {
                    s.materials.insert(id, v);
                }
                None => tracing::warn!("unknown keyword: {}", name),
            }
        }

        tracing::debug!("{} material keywords mapped", s.materials.len());
        s
    }
}
