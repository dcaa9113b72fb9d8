//! Probability groups - per-context multipliers for actors and attacks

use crate::types::HitFlags;
use crate::world::{Actor, ActorProfile};
use serde::{Deserialize, Serialize};

/// Combined multiplier for one actor in one hit context, 0 = suppressed
pub type GroupActorInfo = f64;

/// Multipliers for one decision context (Attack, Defense, Break or Destroy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub global: f64,
    pub player: f64,
    pub npc: f64,
    pub teammate: f64,
    pub essential: f64,
    pub protected: f64,
    pub unique: f64,
    /// Indexed by the base template's respawn flag: `[does not respawn, respawns]`
    pub respawns: [f64; 2],
    pub power: f64,
    pub sneak: f64,
    pub bash: f64,
    pub block: f64,
}

impl Default for Group {
    fn default() -> Self {
        Group::with_global(1.0)
    }
}

impl Group {
    /// Group with the given base multiplier and every other factor neutral
    pub fn with_global(global: f64) -> Self {
        Group {
            global,
            player: 1.0,
            npc: 1.0,
            teammate: 1.0,
            essential: 1.0,
            protected: 1.0,
            unique: 1.0,
            respawns: [1.0, 1.0],
            power: 1.0,
            sneak: 1.0,
            bash: 1.0,
            block: 1.0,
        }
    }

    /// Score an actor, 0 when there is no actor
    pub fn actor_info<A: Actor + ?Sized>(
        &self,
        target: Option<&A>,
        flags: Option<HitFlags>,
    ) -> GroupActorInfo {
        match target {
            Some(actor) => self.profile_info(&actor.profile(), flags),
            None => 0.0,
        }
    }

    /// Score an actor profile
    ///
    /// Role factors apply first, then one factor per set hit flag. A
    /// non-finite or non-positive product is reported as 0.
    pub fn profile_info(&self, target: &ActorProfile, flags: Option<HitFlags>) -> GroupActorInfo {
        let mut ret = self.global;

        if target.is_player {
            ret *= self.player;
        } else {
            ret *= self.npc;
            if target.teammate {
                ret *= self.teammate;
            }
            if target.essential {
                ret *= self.essential;
            } else if target.protected {
                ret *= self.protected;
            }
            if target.base.is_some_and(|b| b.unique) {
                ret *= self.unique;
            }
            let respawns = target.base.is_some_and(|b| b.respawns);
            ret *= self.respawns[respawns as usize];
        }

        let flags = flags.unwrap_or_default();
        if flags.power() {
            ret *= self.power;
        }
        if flags.sneak() {
            ret *= self.sneak;
        }
        if flags.bash() {
            ret *= self.bash;
        }
        if flags.blocked() {
            ret *= self.block;
        }

        if ret.is_finite() && ret > 0.0 {
            ret
        } else {
            0.0
        }
    }
}
