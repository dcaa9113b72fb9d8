//! Durability Sim - seeded duel exercising durability_core
//!
//! A player and a bandit trade blows. Each hit runs weapon wear, armor wear
//! and the inventory sweep, and the simulator prints what happened plus the
//! final condition of both inventories.

use clap::Parser;
use durability_core::prelude::*;
use durability_core::HitReport;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "durability_sim")]
#[command(about = "Run a seeded duel and report item wear and losses")]
struct Args {
    /// Settings file (TOML); the bundled defaults are used when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of hits to simulate
    #[arg(long, default_value_t = 200)]
    hits: u32,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Print hit reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One simulated hit and its outcome
#[derive(Debug, Serialize)]
struct HitRecord {
    index: u32,
    attacker: String,
    defender: String,
    flags: u8,
    report: HitReport,
}

fn make_player(keywords: &mut KeywordRegistry) -> MemoryActor {
    let steel = keywords.intern("WeapMaterialSteel");
    let leather = keywords.intern("ArmorMaterialLeather");
    let sword = Item::weapon(FormId(0x0001_3989), "Steel Sword", 10.0, 0.75).with_keywords([steel]);
    let armor = Item::armor(FormId(0x0003_619E), "Leather Armor", 6.0, 26).with_keywords([leather]);
    let boots = Item::armor(FormId(0x0001_3920), "Leather Boots", 2.0, 8).with_keywords([leather]);
    let (sword, armor, boots) = (Arc::new(sword), Arc::new(armor), Arc::new(boots));

    let mut player = MemoryActor::new("Player", ActorProfile::player());
    player.damage_resist = 120.0;
    player.attack_hand = Some(Hand::Right);
    for item in [&sword, &armor, &boots] {
        player.carry(item, 1);
        player.equip(item.id, Hand::Right);
    }
    player.carry(&Arc::new(Item::misc(FormId(0x0003_9BE5), "Cabbage", 0.25)), 12);
    player.carry(&Arc::new(Item::misc(FormId(0x0005_ACE4), "Iron Ingot", 1.0)), 8);
    let potion = Arc::new(Item::misc(FormId(0x0003_EADE), "Potion of Healing", 0.5));
    let potion = player.carry(&potion, 5);
    player.entries[potion].favorited = true;
    player
}

fn make_bandit(keywords: &mut KeywordRegistry) -> MemoryActor {
    let iron = keywords.intern("WeapMaterialIron");
    let hide = keywords.intern("ArmorMaterialHide");
    let axe = Item::weapon(FormId(0x0001_3790), "Iron War Axe", 11.0, 0.85).with_keywords([iron]);
    let shield = Item::shield(FormId(0x0001_3913), "Hide Shield", 4.0, 15).with_keywords([hide]);
    let cuirass = Item::armor(FormId(0x0001_3911), "Hide Armor", 5.0, 20).with_keywords([hide]);
    let (axe, shield, cuirass) = (Arc::new(axe), Arc::new(shield), Arc::new(cuirass));

    let mut bandit = MemoryActor::new(
        "Bandit",
        ActorProfile::npc(ActorBase {
            unique: false,
            respawns: true,
        }),
    );
    bandit.damage_resist = 60.0;
    bandit.attack_hand = Some(Hand::Right);
    bandit.carry(&axe, 1);
    bandit.equip(axe.id, Hand::Right);
    bandit.carry(&shield, 1);
    bandit.equip(shield.id, Hand::Left);
    bandit.carry(&cuirass, 1);
    bandit.equip(cuirass.id, Hand::Right);
    bandit.stock(&Arc::new(Item::misc(FormId(0x0000_000F), "Gold", 0.0)), 35);
    bandit.stock(&Arc::new(Item::misc(FormId(0x0006_3B45), "Ruby", 0.1)), 2);
    bandit.carry(&Arc::new(Item::misc(FormId(0x0003_AD52), "Wolf Pelt", 2.0)), 4);
    bandit
}

fn hit_flags(rng: &mut impl rand::Rng, blocking: bool) -> HitFlags {
    let mut flags = HitFlags::NONE;
    if rng.gen_bool(0.2) {
        flags = flags | HitFlags::POWER_ATTACK;
    }
    if rng.gen_bool(0.05) {
        flags = flags | HitFlags::SNEAK_ATTACK;
    }
    if blocking && rng.gen_bool(0.3) {
        flags = flags | HitFlags::HIT_BLOCKED;
    }
    flags
}

fn print_condition(actor: &MemoryActor) {
    println!("{}:", actor.name);
    for entry in &actor.entries {
        let count = actor.count(entry.item.id);
        match entry.worn.first() {
            Some(marker) => println!(
                "  {:>3} x {:<20} worn, health {:.3}",
                count,
                entry.item.name,
                marker.health()
            ),
            None => println!("  {:>3} x {}", count, entry.item.name),
        }
    }
}

fn main() -> Result<(), serde_json::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("durability=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(target: "durability", "seed {}", seed);

    let mut keywords = KeywordRegistry::new();
    let mut player = make_player(&mut keywords);
    let mut bandit = make_bandit(&mut keywords);

    let settings = match &args.config {
        Some(path) => Settings::load_or_default(path, &keywords),
        None => Settings::bundled(&keywords),
    };
    let handler = HitHandler::new(&settings);
    let mut notes = LogNotifier;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut records = Vec::new();
    for index in 0..args.hits {
        let player_attacks = index % 2 == 0;
        let (attacker, defender) = if player_attacks {
            (&mut player, &mut bandit)
        } else {
            (&mut bandit, &mut player)
        };
        let wielded = attacker.wielded(Hand::Right);
        let Some(weapon) = wielded.map(|id| attacker.entries[id].item.id) else {
            tracing::info!(target: "durability", "{} is disarmed", attacker.name);
            continue;
        };
        let flags = hit_flags(&mut rng, !player_attacks || defender.wielded(Hand::Left).is_some());
        let event = HitEvent::melee(weapon, flags);
        let report = handler.process_with_rng(
            &event,
            Some(&mut *attacker),
            Some(&mut *defender),
            &mut notes,
            &mut rng,
        );

        if report.changed() || args.json {
            records.push(HitRecord {
                index,
                attacker: attacker.name.clone(),
                defender: defender.name.clone(),
                flags: flags.bits(),
                report,
            });
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        let report = &record.report;
        print!("#{:<4} {} -> {}", record.index, record.attacker, record.defender);
        if let Some(outcome) = &report.attacker {
            print!("  weapon: {}", describe(outcome));
        }
        if let Some(outcome) = &report.defender {
            print!("  armor: {}", describe(outcome));
        }
        if let Some(sweep) = report.sweep.as_ref().filter(|s| !s.removed.is_empty()) {
            let lost: Vec<String> = sweep
                .removed
                .iter()
                .map(|r| format!("{} {}", r.count, r.name))
                .collect();
            print!("  lost: {}", lost.join(", "));
        }
        println!();
    }

    println!();
    print_condition(&player);
    print_condition(&bandit);
    Ok(())
}

fn describe(outcome: &DegradeOutcome) -> String {
    match outcome {
        DegradeOutcome::Skipped => "-".to_string(),
        DegradeOutcome::Unchanged { .. } => "at floor".to_string(),
        DegradeOutcome::Worn { from, to, .. } => format!("{:.3} -> {:.3}", from, to),
        DegradeOutcome::Broken { name, .. } => format!("{} broke", name),
    }
}
