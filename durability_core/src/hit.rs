//! Hit handling - routes one hit through attacker wear, defender wear and
//! the destruction sweep

use crate::config::Settings;
use crate::degrade::{degrade_with_rng, DegradeOutcome, WearRequest};
use crate::destroy::{destroy_with_rng, SweepOutcome};
use crate::item::{Item, ItemKind};
use crate::pick::PickOne;
use crate::types::{HitEvent, Hand};
use crate::world::{Actor, Notifier};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// What each stage of a hit did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HitReport {
    /// Attacker weapon wear, `None` when the stage did not run
    pub attacker: Option<DegradeOutcome>,
    /// Defender absorbing-item wear
    pub defender: Option<DegradeOutcome>,
    pub sweep: Option<SweepOutcome>,
}

impl HitReport {
    /// True if anything was worn, broken or destroyed
    pub fn changed(&self) -> bool {
        let wore = |o: &Option<DegradeOutcome>| {
            matches!(
                o,
                Some(DegradeOutcome::Worn { .. }) | Some(DegradeOutcome::Broken { .. })
            )
        };
        wore(&self.attacker)
            || wore(&self.defender)
            || self.sweep.as_ref().is_some_and(|s| !s.removed.is_empty())
    }
}

/// Processes hits against a fixed settings snapshot
#[derive(Debug, Clone, Copy)]
pub struct HitHandler<'a> {
    settings: &'a Settings,
}

impl<'a> HitHandler<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        HitHandler { settings }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Process a hit using the thread-local RNG
    pub fn process<A, N>(
        &self,
        event: &HitEvent,
        attacker: Option<&mut A>,
        defender: Option<&mut A>,
        notifier: &mut N,
    ) -> HitReport
    where
        A: Actor + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut rng = rand::thread_rng();
        self.process_with_rng(event, attacker, defender, notifier, &mut rng)
    }

    /// Process a hit with a provided RNG
    ///
    /// Each stage runs independently; a stage whose preconditions fail is
    /// reported as `None` and the next stage still runs. All three stages
    /// are scored on the attacker, so a hit without one only reaches the
    /// defender's gates to be stopped there.
    pub fn process_with_rng<A, N>(
        &self,
        event: &HitEvent,
        mut attacker: Option<&mut A>,
        defender: Option<&mut A>,
        notifier: &mut N,
        rng: &mut impl Rng,
    ) -> HitReport
    where
        A: Actor + ?Sized,
        N: Notifier + ?Sized,
    {
        let mut report = HitReport::default();

        if let Some(attacker) = attacker.as_deref_mut() {
            report.attacker = self.wear_attacker(event, attacker, notifier, rng);
        }

        let Some(defender) = defender else {
            return report;
        };
        report.defender = self.wear_defender(event, attacker.as_deref(), defender, notifier, rng);

        let info = self.settings.destroy.actor_info(attacker.as_deref(), Some(event.flags));
        report.sweep = destroy_with_rng(
            self.settings,
            info,
            attacker.as_deref(),
            defender,
            notifier,
            rng,
        );
        report
    }

    fn wear_attacker<A, N>(
        &self,
        event: &HitEvent,
        attacker: &mut A,
        notifier: &mut N,
        rng: &mut impl Rng,
    ) -> Option<DegradeOutcome>
    where
        A: Actor + ?Sized,
        N: Notifier + ?Sized,
    {
        if event.projectile.is_some() || event.source.is_none() {
            return None;
        }
        let info = self.settings.attack.actor_info(Some(&*attacker), Some(event.flags));
        if info == 0.0 {
            return None;
        }
        let Some(hand) = attacker.attack_hand() else {
            tracing::trace!("attacker wear skipped: no attack in progress");
            return None;
        };
        let request = WearRequest::new(info, attacker.wielded(hand), hand);
        Some(degrade_with_rng(self.settings, attacker, request, notifier, rng))
    }

    /// Weight of an equipped item as the absorber of a hit, with its armor
    /// rating contribution
    fn absorb_weight(&self, item: &Item, blocked: bool) -> Option<(f64, u32)> {
        if !item.playable {
            return None;
        }
        let (mut weight, rating) = match item.kind {
            ItemKind::Armor { rating, .. } => {
                if rating == 0 && self.settings.ignore_zero_armor {
                    return None;
                }
                (item.weight + rating as f64 * 0.01, rating)
            }
            ItemKind::Weapon { stagger } => (item.weight * (1.0 + stagger), 0),
            ItemKind::Misc => return None,
        };
        if blocked && !item.can_block() {
            weight *= self.settings.blocked_hit_other;
        }
        Some((weight, rating))
    }

    /// Wear one equipped item of the defender; the Defense group scores the
    /// attacker, the armor ratio uses the defender's damage resist
    fn wear_defender<A, N>(
        &self,
        event: &HitEvent,
        attacker: Option<&A>,
        defender: &mut A,
        notifier: &mut N,
        rng: &mut impl Rng,
    ) -> Option<DegradeOutcome>
    where
        A: Actor + ?Sized,
        N: Notifier + ?Sized,
    {
        let info = self.settings.defense.actor_info(attacker, Some(event.flags));
        if info == 0.0 {
            return None;
        }

        let blocked = event.flags.blocked();
        let mut pick: PickOne<Arc<Item>> = PickOne::new();
        let mut armor_raw: u32 = 0;
        for item in defender.equipped() {
            let Some((weight, rating)) = self.absorb_weight(&item, blocked) else {
                continue;
            };
            armor_raw += rating;
            pick.push(item, weight, rng);
        }

        let item = pick.into_inner()?;
        let entry = defender.find_entry(item.id)?;
        let hand = if blocked && item.can_block() {
            Hand::Left
        } else {
            Hand::Right
        };
        let extra = armor_raw as f64 * 0.01 / defender.damage_resist();
        tracing::trace!("{} absorbs the hit (extra {:.3})", item.name, extra);

        let request = WearRequest::new(info, Some(entry), hand).with_extra(extra);
        Some(degrade_with_rng(self.settings, defender, request, notifier, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::memory::MemoryActor;
    use crate::types::{FormId, HitFlags};
    use crate::world::{ActorBase, ActorProfile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    /// Wear always applies, nothing breaks and no sweep happens
    fn wear_only_settings() -> Settings {
        let mut s = Settings {
            attack: Group::with_global(0.1),
            defense: Group::with_global(0.1),
            breaking: Group::with_global(0.0),
            destroy: Group::with_global(0.0),
            ..Settings::default()
        };
        s.materials.set_no_material(1.0);
        s
    }

    fn swordsman() -> MemoryActor {
        let mut actor = MemoryActor::new("Player", ActorProfile::player());
        let sword = Arc::new(Item::weapon(FormId(1), "Steel Sword", 10.0, 0.5));
        actor.carry(&sword, 1);
        actor.equip(sword.id, Hand::Right);
        actor.attack_hand = Some(Hand::Right);
        actor
    }

    fn guard() -> MemoryActor {
        let mut actor = MemoryActor::new("Guard", ActorProfile::npc(ActorBase::default()));
        actor.damage_resist = 50.0;
        let cuirass = Arc::new(Item::armor(FormId(10), "Guard Cuirass", 20.0, 50));
        let shield = Arc::new(Item::shield(FormId(11), "Guard Shield", 8.0, 20));
        actor.carry(&cuirass, 1);
        actor.carry(&shield, 1);
        actor.equip(cuirass.id, Hand::Right);
        actor.equip(shield.id, Hand::Left);
        actor
    }

    /// Player who lands hits without an attack animation, so only the
    /// defender side runs
    fn idle_player() -> MemoryActor {
        let mut actor = swordsman();
        actor.attack_hand = None;
        actor
    }

    #[test]
    fn test_attacker_weapon_wears() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = swordsman();
        let mut defender = guard();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::NONE);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );

        assert!(matches!(
            report.attacker,
            Some(DegradeOutcome::Worn { item: FormId(1), .. })
        ));
        let health = attacker.worn_health(FormId(1), Hand::Right).unwrap();
        assert!((health - 0.9).abs() < 1e-9);
        assert!(report.changed());
    }

    #[test]
    fn test_projectile_and_sourceless_hits_spare_attacker() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = swordsman();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let mut event = HitEvent::melee(FormId(1), HitFlags::NONE);
        event.projectile = Some(FormId(99));
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            None,
            &mut sink,
            &mut rng,
        );
        assert!(report.attacker.is_none());

        let event = HitEvent {
            source: None,
            ..HitEvent::default()
        };
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            None,
            &mut sink,
            &mut rng,
        );
        assert!(report.attacker.is_none());
        assert!(attacker.worn_health(FormId(1), Hand::Right).is_none());
    }

    #[test]
    fn test_no_attack_in_progress() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::NONE);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            None,
            &mut sink,
            &mut rng,
        );
        assert!(report.attacker.is_none());
    }

    #[test]
    fn test_blocked_hit_lands_on_shield() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut defender = guard();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::HIT_BLOCKED);
        for _ in 0..10 {
            handler.process_with_rng(
                &event,
                Some(&mut attacker),
                Some(&mut defender),
                &mut sink,
                &mut rng,
            );
        }
        // Only the shield absorbs blocked hits while blockedHitOther is 0
        assert!(defender.worn_health(FormId(10), Hand::Right).is_none());
        assert!(defender.worn_health(FormId(11), Hand::Left).is_some());
    }

    #[test]
    fn test_defense_extra_uses_armor_ratio() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut defender = MemoryActor::new("Guard", ActorProfile::default());
        defender.damage_resist = 100.0;
        let cuirass = Arc::new(Item::armor(FormId(10), "Guard Cuirass", 20.0, 50));
        defender.carry(&cuirass, 1);
        defender.equip(cuirass.id, Hand::Right);
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::NONE);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );

        // 0.1 * (50 * 0.01 / 100)
        assert!(matches!(report.defender, Some(DegradeOutcome::Worn { .. })));
        let health = defender.worn_health(FormId(10), Hand::Right).unwrap();
        assert!((health - (1.0 - 0.0005)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_damage_resist_aborts_defense() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut defender = guard();
        defender.damage_resist = 0.0;
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::NONE);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );
        assert_eq!(report.defender, Some(DegradeOutcome::Skipped));
        assert!(!report.changed());
    }

    #[test]
    fn test_defense_scores_attacker() {
        let mut rng = make_test_rng();
        let mut sink: Vec<String> = Vec::new();
        let event = HitEvent::melee(FormId(1), HitFlags::NONE);

        // Defense.Player = 0: a player's hits never wear the NPC's armor
        let mut settings = wear_only_settings();
        settings.defense.player = 0.0;
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut defender = guard();
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );
        assert!(report.defender.is_none());
        assert!(defender.worn_health(FormId(10), Hand::Right).is_none());

        // Defense.NPC = 0 does not protect an NPC hit by the player
        let mut settings = wear_only_settings();
        settings.defense.npc = 0.0;
        let handler = HitHandler::new(&settings);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );
        assert!(matches!(report.defender, Some(DegradeOutcome::Worn { .. })));
    }

    #[test]
    fn test_no_attacker_spares_defender() {
        let settings = Settings {
            destroy: Group::with_global(1.0),
            ..wear_only_settings()
        };
        let handler = HitHandler::new(&settings);
        let mut defender = guard();
        defender.carry(&Arc::new(Item::misc(FormId(20), "Iron Ingot", 1.0)), 50);
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::NONE);
        let report = handler.process_with_rng(
            &event,
            None,
            Some(&mut defender),
            &mut sink,
            &mut rng,
        );
        assert!(report.defender.is_none());
        assert!(report.sweep.is_none());
        assert_eq!(defender.count(FormId(20)), 50);
    }

    #[test]
    fn test_destroy_scores_attacker() {
        let mut settings = Settings {
            destroy: Group::with_global(1.0),
            destroy_resist_base: 1.0,
            destroy_resist_pivot: 0.0,
            ..wear_only_settings()
        };
        settings.destroy.player = 0.0;
        let handler = HitHandler::new(&settings);
        let mut attacker = idle_player();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();
        let event = HitEvent::melee(FormId(1), HitFlags::NONE);

        // The NPC defender's own factor is 1.0, the player attacker's is 0
        for _ in 0..20 {
            let mut defender = guard();
            defender.carry(&Arc::new(Item::misc(FormId(20), "Iron Ingot", 1.0)), 50);
            let report = handler.process_with_rng(
                &event,
                Some(&mut attacker),
                Some(&mut defender),
                &mut sink,
                &mut rng,
            );
            assert!(report.sweep.is_none());
            assert_eq!(defender.count(FormId(20)), 50);
        }
    }

    #[test]
    fn test_absorb_weights() {
        let settings = wear_only_settings();
        let handler = HitHandler::new(&settings);

        let cuirass = Item::armor(FormId(1), "Cuirass", 20.0, 50);
        let (w, r) = handler.absorb_weight(&cuirass, false).unwrap();
        assert!((w - 20.5).abs() < 1e-9);
        assert_eq!(r, 50);

        let sword = Item::weapon(FormId(2), "Sword", 10.0, 0.5);
        let (w, _) = handler.absorb_weight(&sword, false).unwrap();
        assert!((w - 15.0).abs() < 1e-9);

        let ring = Item::armor(FormId(3), "Ring", 0.25, 0);
        assert!(handler.absorb_weight(&ring, false).is_none());
        let gem = Item::misc(FormId(4), "Gem", 0.1);
        assert!(handler.absorb_weight(&gem, false).is_none());

        // Blocked: non-blocking armor is scaled down, the sword still blocks
        let (w, _) = handler.absorb_weight(&cuirass, true).unwrap();
        assert_eq!(w, 0.0);
        let (w, _) = handler.absorb_weight(&sword, true).unwrap();
        assert!((w - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_defender_runs_attacker_only() {
        let settings = Settings {
            destroy: Group::with_global(1.0),
            ..wear_only_settings()
        };
        let handler = HitHandler::new(&settings);
        let mut attacker = swordsman();
        let mut sink: Vec<String> = Vec::new();
        let mut rng = make_test_rng();

        let event = HitEvent::melee(FormId(1), HitFlags::POWER_ATTACK);
        let report = handler.process_with_rng(
            &event,
            Some(&mut attacker),
            None,
            &mut sink,
            &mut rng,
        );
        assert!(report.attacker.is_some());
        assert!(report.defender.is_none());
        assert!(report.sweep.is_none());
    }
}
