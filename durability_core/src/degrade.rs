//! Worn item degradation - health decay and break checks per hit

use crate::config::Settings;
use crate::group::GroupActorInfo;
use crate::types::{FormId, Hand};
use crate::world::{Actor, EntryId, Notifier};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// What to degrade and by how much
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WearRequest {
    /// Probability multiplier of the acting context
    pub info: GroupActorInfo,
    /// Inventory entry carrying the worn item
    pub entry: Option<EntryId>,
    /// Side of the worn marker to use
    pub hand: Hand,
    /// Extra factor, e.g. the armor to damage-resist ratio on defense
    pub extra: f64,
}

impl WearRequest {
    pub fn new(info: GroupActorInfo, entry: Option<EntryId>, hand: Hand) -> Self {
        WearRequest {
            info,
            entry,
            hand,
            extra: 1.0,
        }
    }

    pub fn with_extra(mut self, extra: f64) -> Self {
        self.extra = extra;
        self
    }
}

/// Result of one degradation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DegradeOutcome {
    /// A precondition failed, nothing changed
    Skipped,
    /// Health was already at the floor
    Unchanged { item: FormId },
    Worn { item: FormId, from: f64, to: f64 },
    /// One unit of the item was removed
    Broken { item: FormId, name: String },
}

/// Degrade a worn item using the thread-local RNG
pub fn degrade<A, N>(
    settings: &Settings,
    subject: &mut A,
    request: WearRequest,
    notifier: &mut N,
) -> DegradeOutcome
where
    A: Actor + ?Sized,
    N: Notifier + ?Sized,
{
    let mut rng = rand::thread_rng();
    degrade_with_rng(settings, subject, request, notifier, &mut rng)
}

/// Degrade a worn item with a provided RNG (for deterministic testing)
///
/// Decay is `info * extra * material multiplier`. The new health is checked
/// against the break curve first; a broken item loses one unit and keeps no
/// health record. Otherwise the lowered health is written back to the worn
/// marker.
pub fn degrade_with_rng<A, N>(
    settings: &Settings,
    subject: &mut A,
    request: WearRequest,
    notifier: &mut N,
    rng: &mut impl Rng,
) -> DegradeOutcome
where
    A: Actor + ?Sized,
    N: Notifier + ?Sized,
{
    let Some(id) = request.entry else {
        tracing::trace!("degrade skipped: no entry");
        return DegradeOutcome::Skipped;
    };
    if request.info == 0.0 {
        return DegradeOutcome::Skipped;
    }
    let Some(entry) = subject.entry(id) else {
        tracing::trace!("degrade skipped: entry {} missing", id);
        return DegradeOutcome::Skipped;
    };
    let item = Arc::clone(&entry.item);
    if !item.playable {
        return DegradeOutcome::Skipped;
    }
    let Some(marker) = entry.worn_marker(request.hand).copied() else {
        tracing::trace!("degrade skipped: {} not worn {:?}", item.name, request.hand);
        return DegradeOutcome::Skipped;
    };
    let quest_item = entry.quest_item;

    let decay = request.info * request.extra * settings.material_mult(&item);
    if !(decay > 0.0 && decay.is_finite()) {
        return DegradeOutcome::Skipped;
    }

    let old = marker.health();
    let cur = (old - decay).max(settings.min_health).min(1.0);

    let exponent = settings.break_exponent.select(cur);
    if exponent.is_finite() {
        let mut chance = settings.breaking.actor_info(Some(&*subject), None);
        if chance > 0.0 && !quest_item {
            if exponent != 0.0 {
                chance *= cur.powf(exponent);
            }
            if rng.gen::<f64>() < chance {
                if settings.break_message && subject.is_player() {
                    notifier.notify(&format!("Destroyed worn {}", item.name));
                }
                subject.remove_item(item.id, 1, Some((id, request.hand)));
                tracing::debug!("{} broke at health {:.3}", item.name, cur);
                return DegradeOutcome::Broken {
                    item: item.id,
                    name: item.name.clone(),
                };
            }
        }
    }

    if cur < old {
        subject.set_worn_health(id, request.hand, cur);
        subject.armor_changed();
        DegradeOutcome::Worn {
            item: item.id,
            from: old,
            to: cur,
        }
    } else {
        DegradeOutcome::Unchanged { item: item.id }
    }
}
