use std::fmt;

use serde::Serialize;

use crate::combat::rng::BattleRng;
use crate::combat::stats::{BattleCombatant, CharacterClass, Side};

/// Ally hp fraction at or below which a single heal becomes available.
pub const HEAL_SOLO_THRESHOLD: f64 = 0.25;
/// Ally hp fraction at or below which a spread heal becomes available.
pub const HEAL_SPREAD_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    AttackSolo,
    AttackSpread,
    HealSolo,
    HealSpread,
}

impl ActionType {
    pub const fn is_heal(self) -> bool {
        matches!(self, Self::HealSolo | Self::HealSpread)
    }

    pub const fn is_spread(self) -> bool {
        matches!(self, Self::AttackSpread | Self::HealSpread)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AttackSolo => "Attack Solo",
            Self::AttackSpread => "Attack Spread",
            Self::HealSolo => "Heal Solo",
            Self::HealSpread => "Heal Spread",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The party on `side`, picked from the two battle parties.
pub fn party_for_side<'a>(
    side: Side,
    player_party: &'a [BattleCombatant],
    enemy_party: &'a [BattleCombatant],
) -> &'a [BattleCombatant] {
    match side {
        Side::Player => player_party,
        Side::Enemy => enemy_party,
    }
}

/// Eligible actions and their weights, in draw order.
///
/// Allies are resolved from the actor's side, never from `defender_party`.
/// Heal eligibility counts defeated allies too.
pub fn action_options(
    actor: &BattleCombatant,
    defender_party: &[BattleCombatant],
    player_party: &[BattleCombatant],
    enemy_party: &[BattleCombatant],
) -> Vec<(ActionType, u32)> {
    let mut options = Vec::with_capacity(4);

    match actor.class {
        CharacterClass::Fighter => {
            options.push((ActionType::AttackSolo, 1));
            if defender_party.len() >= 2 {
                options.push((ActionType::AttackSpread, 1));
            }
        }
        CharacterClass::Mage => {
            options.push((ActionType::AttackSolo, 1));
            if defender_party.len() >= 3 {
                options.push((ActionType::AttackSpread, 2));
            }
            let allies = party_for_side(actor.side, player_party, enemy_party);
            if allies.iter().any(|a| a.hp_at_or_below(HEAL_SOLO_THRESHOLD)) {
                options.push((ActionType::HealSolo, 2));
            }
            let wounded = allies
                .iter()
                .filter(|a| a.hp_at_or_below(HEAL_SPREAD_THRESHOLD))
                .count();
            if wounded >= 2 {
                options.push((ActionType::HealSpread, 1));
            }
        }
        CharacterClass::Archer => {
            options.push((ActionType::AttackSolo, 2));
            if defender_party.len() >= 3 {
                options.push((ActionType::AttackSpread, 1));
            }
        }
    }

    options
}

/// Weighted draw over [action_options]: a uniform integer in
/// `[0, total_weight)` picks the first option whose cumulative weight exceeds it.
pub fn select_action<R: BattleRng + ?Sized>(
    actor: &BattleCombatant,
    defender_party: &[BattleCombatant],
    player_party: &[BattleCombatant],
    enemy_party: &[BattleCombatant],
    rng: &mut R,
) -> ActionType {
    let options = action_options(actor, defender_party, player_party, enemy_party);
    let total_weight: u32 = options.iter().map(|(_, weight)| weight).sum();
    let draw = rng.gen_weighted(total_weight);

    let mut cumulative = 0;
    for (action, weight) in &options {
        cumulative += weight;
        if draw < cumulative {
            return *action;
        }
    }
    // Every class always offers AttackSolo, so the walk above returns.
    ActionType::AttackSolo
}
