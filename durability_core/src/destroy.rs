//! Destruction sweep - weighted, resistance-gated removal of carried items
//!
//! A qualifying hit may cost the defender part of their inventory. The
//! sweep draws stacks from a weighted pool one at a time; each drawn stack
//! lowers the weight that is still exposed, and the sweep ends as soon as a
//! draw over the exposed weight no longer beats the defender's resistance.

use crate::config::Settings;
use crate::group::GroupActorInfo;
use crate::item::Item;
use crate::pick::PickList;
use crate::types::{FormId, Hand};
use crate::world::{Actor, Notifier};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Units removed from one stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedStack {
    pub item: FormId,
    pub name: String,
    pub count: u32,
    /// Total weight of the removed units
    pub weight: f64,
}

/// Result of a sweep that passed its gates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepOutcome {
    pub removed: Vec<RemovedStack>,
    /// Player notification, when one was sent
    pub summary: Option<String>,
}

impl SweepOutcome {
    pub fn removed_weight(&self) -> f64 {
        self.removed.iter().map(|r| r.weight).sum()
    }

    pub fn removed_count(&self) -> u32 {
        self.removed.iter().map(|r| r.count).sum()
    }
}

/// A stack that can be swept and how many of its units are exposed
#[derive(Debug, Clone)]
struct Candidate {
    item: Arc<Item>,
    available: i32,
}

/// Player-facing list of destroyed items with a length budget
#[derive(Debug)]
struct Summary {
    text: String,
    more: u32,
    budget: usize,
}

impl Summary {
    fn new(budget: u32) -> Self {
        let budget = budget as usize;
        Summary {
            text: String::with_capacity(30 + budget.min(100)),
            more: 0,
            budget,
        }
    }

    fn add(&mut self, name: &str, count: u32) {
        if self.text.len() > self.budget || name.is_empty() {
            self.more += count;
            return;
        }
        if !self.text.is_empty() {
            self.text.push_str(", ");
        }
        if count > 1 {
            self.text.push_str(&format!("{} ", count));
        }
        self.text.push_str(name);
    }

    fn finish(self) -> Option<String> {
        let mut msg = self.text;
        if self.more > 0 {
            if !msg.is_empty() {
                msg.push_str(", and ");
            }
            msg.push_str(&format!("{} items", self.more));
        }
        if msg.is_empty() {
            None
        } else {
            Some(format!("Destroyed {}", msg))
        }
    }
}

/// Run the destruction roll and sweep using the thread-local RNG
pub fn destroy<A, N>(
    settings: &Settings,
    info: GroupActorInfo,
    attacker: Option<&A>,
    defender: &mut A,
    notifier: &mut N,
) -> Option<SweepOutcome>
where
    A: Actor + ?Sized,
    N: Notifier + ?Sized,
{
    let mut rng = rand::thread_rng();
    destroy_with_rng(settings, info, attacker, defender, notifier, &mut rng)
}

/// Run the destruction roll and sweep with a provided RNG
///
/// Returns `None` when one of the gates stopped the sweep:
/// 1. `info` must be at least 1.0 or beat a uniform draw
/// 2. the defender's non-armor weight, minus the attacker's wielded items,
///    must be positive
/// 3. a uniform draw over that weight must reach the resistance budget,
///    which grows with the attacker's damage resist
pub fn destroy_with_rng<A, N>(
    settings: &Settings,
    info: GroupActorInfo,
    attacker: Option<&A>,
    defender: &mut A,
    notifier: &mut N,
    rng: &mut impl Rng,
) -> Option<SweepOutcome>
where
    A: Actor + ?Sized,
    N: Notifier + ?Sized,
{
    if !(info > 0.0) {
        return None;
    }
    if !(info >= 1.0 || info > rng.gen::<f64>()) {
        return None;
    }

    let carried = defender.carried_weight()?;
    let mut weight = carried.non_armor();
    if !(weight > 0.0) {
        return None;
    }
    if let Some(attacker) = attacker {
        for hand in [Hand::Left, Hand::Right] {
            if let Some(entry) = attacker.wielded(hand).and_then(|id| attacker.entry(id)) {
                weight -= entry.item.weight;
            }
        }
    }
    if !(weight > 0.0 && weight.is_finite()) {
        return None;
    }

    let resist = settings.destroy_resist(attacker.map_or(0.0, |a| a.damage_resist()));
    if resist > weight || resist > rng.gen_range(0.0..weight) {
        return None;
    }

    Some(sweep(settings, weight, resist, defender, notifier, rng))
}

/// Build the weighted pool of stacks that can be swept
fn collect_candidates<A: Actor + ?Sized>(settings: &Settings, defender: &A) -> PickList<Candidate> {
    let mut counts: HashMap<FormId, i32> = HashMap::new();
    for object in defender.container() {
        *counts.entry(object.item).or_insert(0) += object.count;
    }

    let capacity = if defender.is_player() { 100 } else { 20 };
    let mut pool = PickList::with_capacity(capacity);
    for entry in defender.entries() {
        if entry.quest_item || entry.leveled {
            continue;
        }
        let item = &entry.item;
        let mut available = entry.count_delta + counts.get(&item.id).copied().unwrap_or(0);
        if item.is_armor() || item.is_weapon() {
            available -= entry.worn.len() as i32;
        }
        if available <= 0 {
            continue;
        }

        let mut w = settings.destroy_weight(item) * available as f64;
        if entry.favorited {
            w *= settings.destroy_favorite;
        }
        pool.push(
            Candidate {
                item: Arc::clone(item),
                available,
            },
            w,
        );
    }
    pool
}

fn sweep<A, N>(
    settings: &Settings,
    mut weight: f64,
    resist: f64,
    defender: &mut A,
    notifier: &mut N,
    rng: &mut impl Rng,
) -> SweepOutcome
where
    A: Actor + ?Sized,
    N: Notifier + ?Sized,
{
    let budget = weight;
    let mut pool = collect_candidates(settings, defender);
    let message = settings.destroy_message > 0 && defender.is_player();
    let mut summary = message.then(|| Summary::new(settings.destroy_message));
    let mut outcome = SweepOutcome::default();
    let mut removed_weight = 0.0;

    tracing::debug!(
        "sweep: {} stacks, weight {:.1}, resist {:.1}",
        pool.remaining(),
        weight,
        resist
    );

    while let Some(candidate) = pool.pull(rng) {
        let item = Arc::clone(&candidate.item);
        let available = candidate.available;
        weight -= item.weight * available as f64;

        let mut count = rng.gen_range(0..=available);
        if item.weight > 0.0 {
            let room = ((budget - removed_weight) / item.weight).floor().max(0.0) as i32;
            count = count.min(room);
        }

        if count > 0 {
            let count = count as u32;
            if let Some(summary) = summary.as_mut() {
                summary.add(&item.name, count);
            }
            defender.remove_item(item.id, count, None);
            let removed = item.weight * count as f64;
            removed_weight += removed;
            outcome.removed.push(RemovedStack {
                item: item.id,
                name: item.name.clone(),
                count,
                weight: removed,
            });
        }

        if !(weight > 0.0) || resist > rng.gen_range(0.0..weight) {
            break;
        }
    }

    if let Some(text) = summary.and_then(Summary::finish) {
        notifier.notify(&text);
        outcome.summary = Some(text);
    }
    tracing::debug!(
        "sweep removed {} units ({:.1} weight)",
        outcome.removed_count(),
        removed_weight
    );
    outcome
}
