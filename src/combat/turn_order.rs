use crate::combat::stats::{BattleCombatant, CombatantId, Side};

/// Acting order for one round: every combatant from both parties, fastest
/// first. The sort is stable over the player-then-enemy concatenation, so
/// equal speeds keep that order. Defeated combatants stay in the sequence;
/// the engine skips them.
pub fn turn_order(player_party: &[BattleCombatant], enemy_party: &[BattleCombatant]) -> Vec<CombatantId> {
    let mut order: Vec<(CombatantId, i64)> = player_party
        .iter()
        .enumerate()
        .map(|(slot, c)| (CombatantId { side: Side::Player, slot }, c.battle_stats.spd))
        .chain(
            enemy_party
                .iter()
                .enumerate()
                .map(|(slot, c)| (CombatantId { side: Side::Enemy, slot }, c.battle_stats.spd)),
        )
        .collect();

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().map(|(id, _)| id).collect()
}
