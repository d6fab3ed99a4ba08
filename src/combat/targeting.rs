use crate::combat::actions::{party_for_side, ActionType, HEAL_SOLO_THRESHOLD, HEAL_SPREAD_THRESHOLD};
use crate::combat::rng::BattleRng;
use crate::combat::stats::{BattleCombatant, CombatantId};

/// Every slot of `defender_party`, addressed on the actor's opposing side.
pub fn spread_attack_targets(actor: &BattleCombatant, defender_party: &[BattleCombatant]) -> Vec<CombatantId> {
    let side = actor.side.opposite();
    (0..defender_party.len())
        .map(|slot| CombatantId { side, slot })
        .collect()
}

/// Living allies at or below `threshold` of their max hp.
fn wounded_allies(
    actor: &BattleCombatant,
    threshold: f64,
    player_party: &[BattleCombatant],
    enemy_party: &[BattleCombatant],
) -> Vec<CombatantId> {
    party_for_side(actor.side, player_party, enemy_party)
        .iter()
        .enumerate()
        .filter(|(_, ally)| ally.hp_at_or_below(threshold) && !ally.is_defeated())
        .map(|(slot, _)| CombatantId { side: actor.side, slot })
        .collect()
}

/// Resolve an action into concrete targets.
///
/// Solo attacks draw from the whole defender party, defeated members
/// included. Heals only consider living allies and may come back empty.
pub fn select_targets<R: BattleRng + ?Sized>(
    actor: &BattleCombatant,
    action: ActionType,
    defender_party: &[BattleCombatant],
    player_party: &[BattleCombatant],
    enemy_party: &[BattleCombatant],
    rng: &mut R,
) -> Vec<CombatantId> {
    match action {
        ActionType::AttackSolo => {
            if defender_party.is_empty() {
                return Vec::new();
            }
            let slot = rng.gen_index(defender_party.len());
            vec![CombatantId {
                side: actor.side.opposite(),
                slot,
            }]
        }
        ActionType::AttackSpread => spread_attack_targets(actor, defender_party),
        ActionType::HealSolo => {
            let candidates = wounded_allies(actor, HEAL_SOLO_THRESHOLD, player_party, enemy_party);
            if candidates.is_empty() {
                return candidates;
            }
            let pick = rng.gen_index(candidates.len());
            vec![candidates[pick]]
        }
        ActionType::HealSpread => {
            wounded_allies(actor, HEAL_SPREAD_THRESHOLD, player_party, enemy_party)
        }
    }
}
