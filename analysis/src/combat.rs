use std::collections::BTreeMap;

use crate::events::{Event, EventKind};
use crate::roster::HeroIndex;

/// Key used for breakdown entries whose counterpart has no name.
pub const UNKNOWN_NAME: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlayerCombat {
    pub hero_damage: i64,
    pub tower_damage: i64,
    pub hero_healing: i64,
    pub gold_spent: i64,
    pub ability_uses: BTreeMap<String, i64>,
    pub item_uses: BTreeMap<String, i64>,
    /// Damage received, by attacker name.
    pub damage_taken: BTreeMap<String, i64>,
    /// Damage dealt, by target name.
    pub damage_targets: BTreeMap<String, i64>,
    /// Healing done, by target name.
    pub heal_targets: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CombatCounts {
    pub damage: usize,
    pub heal: usize,
    pub purchase: usize,
    pub ability: usize,
    pub item: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatTotals {
    players: [PlayerCombat; crate::PLAYER_SLOTS],
    pub counts: CombatCounts,
}

impl CombatTotals {
    fn new() -> Self {
        Self {
            players: std::array::from_fn(|_| PlayerCombat::default()),
            counts: CombatCounts::default(),
        }
    }

    pub fn player(&self, slot: usize) -> Option<&PlayerCombat> {
        self.players.get(slot)
    }

    pub fn players(&self) -> &[PlayerCombat] {
        &self.players
    }

    fn apply(mut self, event: &Event, heroes: &HeroIndex) -> Self {
        let value = event.int("value").unwrap_or(0);

        match event.kind() {
            EventKind::Damage => {
                self.counts.damage += 1;

                let attacker = event.str("attackername");
                let target = event.str("targetname");

                if let Some(slot) = heroes.slot_of(attacker) {
                    let player = &mut self.players[slot];
                    if event.flag("targethero") {
                        player.hero_damage = player.hero_damage.saturating_add(value);
                    } else if target.is_some_and(is_structure) {
                        player.tower_damage = player.tower_damage.saturating_add(value);
                    }
                    add(&mut player.damage_targets, target, value);
                }

                if let Some(slot) = heroes.slot_of(target) {
                    add(&mut self.players[slot].damage_taken, attacker, value);
                }
            }
            EventKind::Heal => {
                self.counts.heal += 1;

                if let Some(slot) = heroes.slot_of(event.str("attackername")) {
                    let player = &mut self.players[slot];
                    player.hero_healing = player.hero_healing.saturating_add(value);
                    add(&mut player.heal_targets, event.str("targetname"), value);
                }
            }
            EventKind::Purchase => {
                self.counts.purchase += 1;

                // The purchasing hero is the target of the event.
                if let Some(slot) = heroes.slot_of(event.str("targetname")) {
                    let player = &mut self.players[slot];
                    player.gold_spent = player.gold_spent.saturating_add(value);
                }
            }
            EventKind::Ability => {
                self.counts.ability += 1;

                let ability = event.str("inflictor").filter(|a| !a.is_empty());
                if let (Some(slot), Some(ability)) = (heroes.slot_of(event.str("attackername")), ability) {
                    *self.players[slot].ability_uses.entry(ability.to_owned()).or_default() += 1;
                }
            }
            EventKind::Item => {
                self.counts.item += 1;

                let item = event.str("inflictor").filter(|i| !i.is_empty());
                if let (Some(slot), Some(item)) = (heroes.slot_of(event.str("attackername")), item) {
                    *self.players[slot].item_uses.entry(item.to_owned()).or_default() += 1;
                }
            }
            _ => {}
        };

        self
    }
}

/// Towers and barracks, in any casing.
pub fn is_structure(unit_name: &str) -> bool {
    let lower = unit_name.to_lowercase();
    lower.contains("tower") || lower.contains("barracks")
}

fn add(breakdown: &mut BTreeMap<String, i64>, name: Option<&str>, value: i64) {
    let entry = breakdown
        .entry(name.unwrap_or(UNKNOWN_NAME).to_owned())
        .or_default();
    *entry = entry.saturating_add(value);
}

/// Attributes combat log events to player slots in a single pass.
#[tracing::instrument(name = "Combat", skip(events, heroes))]
pub fn aggregate(events: &[Event], heroes: &HeroIndex) -> CombatTotals {
    tracing::info!("Processing combat events...");

    let totals = events
        .iter()
        .fold(CombatTotals::new(), |totals, event| totals.apply(event, heroes));

    let counts = &totals.counts;
    tracing::info!(
        "Processed {} damage, {} healing, {} purchase, {} ability, {} item events",
        counts.damage,
        counts.heal,
        counts.purchase,
        counts.ability,
        counts.item
    );

    totals
}
