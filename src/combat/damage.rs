use serde::Serialize;

use crate::combat::actions::ActionType;
use crate::combat::rng::BattleRng;
use crate::combat::stats::{BattleCombatant, BattleStats, CharacterClass};
use crate::combat::targeting::spread_attack_targets;

pub const DAMAGE_MODIFIER: f64 = 2.0;
pub const CRIT_MODIFIER: f64 = 2.0;
/// Divisor applied to `crit_chance / crit_resist`.
pub const CRIT_SCALE: f64 = 16.0;
/// Fraction of max hp restored per heal target.
pub const HEAL_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub magnitude: i64,
    pub critical: bool,
}

/// Probability that `actor` lands a critical on `target`.
pub fn crit_threshold(actor: &BattleCombatant, target: &BattleCombatant) -> f64 {
    actor.battle_stats.crit_c / target.battle_stats.crit_r / CRIT_SCALE
}

/// Offensive and defensive stat pair: magical for mages, physical otherwise.
fn stat_pair(actor: &BattleCombatant, target: &BattleCombatant) -> (f64, f64) {
    match actor.class {
        CharacterClass::Mage => (
            actor.battle_stats.m_atk as f64,
            target.battle_stats.m_def as f64,
        ),
        CharacterClass::Fighter | CharacterClass::Archer => (
            actor.battle_stats.p_atk as f64,
            target.battle_stats.p_def as f64,
        ),
    }
}

/// `round(((atk * 2 * crit * (1 / n)) / def) * atk)`.
///
/// The per-target division happens before the second multiplication by the
/// attack stat; keep the operation order when touching this.
pub fn attack_magnitude(attack: f64, defense: f64, critical: bool, num_targets: usize) -> i64 {
    let crit_modifier = if critical { CRIT_MODIFIER } else { 1.0 };
    let defense = if defense == 0.0 { 1.0 } else { defense };
    let share = 1.0 / num_targets.max(1) as f64;
    let magnitude = ((attack * DAMAGE_MODIFIER * crit_modifier * share) / defense) * attack;
    (magnitude.round() as i64).max(0)
}

pub fn heal_magnitude(target: &BattleCombatant) -> i64 {
    (target.battle_stats.max_hp as f64 * HEAL_FRACTION).round() as i64
}

/// Numeric effect of `action` from `actor` on `target`.
///
/// Attacks consume one critical draw; heals draw nothing. Spread attacks split
/// damage across the whole spread target set, not just `target`.
pub fn resolve_effect<R: BattleRng + ?Sized>(
    actor: &BattleCombatant,
    target: &BattleCombatant,
    action: ActionType,
    defender_party: &[BattleCombatant],
    rng: &mut R,
) -> Effect {
    if action.is_heal() {
        return Effect {
            magnitude: heal_magnitude(target),
            critical: false,
        };
    }

    let critical = rng.next_f64() < crit_threshold(actor, target);
    let (attack, defense) = stat_pair(actor, target);
    let num_targets = if action.is_spread() {
        spread_attack_targets(actor, defender_party).len()
    } else {
        1
    };

    Effect {
        magnitude: attack_magnitude(attack, defense, critical, num_targets),
        critical,
    }
}

/// Apply `effect` to `stats` and return the amount actually applied.
///
/// Attacks subtract the full magnitude, saturating so repeated blows on a
/// defeated target never wrap. Heals add at most up to `max_hp`.
pub fn apply_effect(stats: &mut BattleStats, action: ActionType, effect: Effect) -> i64 {
    if action.is_heal() {
        let before = stats.hp;
        stats.hp = stats.hp.saturating_add(effect.magnitude).min(stats.max_hp);
        stats.hp.saturating_sub(before)
    } else {
        stats.hp = stats.hp.saturating_sub(effect.magnitude);
        effect.magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::stats::{BattleStats, Side};

    struct Fixed(f64);

    impl BattleRng for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn combatant(class: CharacterClass, side: Side, atk: i64, def: i64) -> BattleCombatant {
        BattleCombatant {
            name: "c".to_string(),
            class,
            side,
            battle_stats: BattleStats {
                spd: 10,
                p_atk: atk,
                p_def: def,
                m_atk: atk * 2,
                m_def: def * 2,
                crit_c: 100.0,
                crit_r: 100.0,
                hp: 1500,
                max_hp: 1500,
            },
        }
    }

    #[test]
    fn solo_attack_matches_reference_value() {
        let actor = combatant(CharacterClass::Fighter, Side::Player, 150, 90);
        let target = combatant(CharacterClass::Archer, Side::Enemy, 100, 100);
        let party = vec![target.clone()];

        let hit = resolve_effect(&actor, &target, ActionType::AttackSolo, &party, &mut Fixed(0.5));
        assert_eq!(hit, Effect { magnitude: 450, critical: false });
    }

    #[test]
    fn critical_doubles_damage() {
        let actor = combatant(CharacterClass::Fighter, Side::Player, 150, 90);
        let target = combatant(CharacterClass::Archer, Side::Enemy, 100, 100);
        let party = vec![target.clone()];

        let hit = resolve_effect(&actor, &target, ActionType::AttackSolo, &party, &mut Fixed(0.0));
        assert_eq!(hit, Effect { magnitude: 900, critical: true });
    }

    #[test]
    fn crit_draw_at_threshold_is_not_critical() {
        let actor = combatant(CharacterClass::Fighter, Side::Player, 150, 90);
        let target = combatant(CharacterClass::Archer, Side::Enemy, 100, 100);
        let threshold = crit_threshold(&actor, &target);
        assert_eq!(threshold, 0.0625);

        let hit = resolve_effect(&actor, &target, ActionType::AttackSolo, &[], &mut Fixed(threshold));
        assert!(!hit.critical);
    }

    #[test]
    fn spread_divides_by_full_party_size() {
        let actor = combatant(CharacterClass::Fighter, Side::Player, 150, 90);
        let party = vec![
            combatant(CharacterClass::Archer, Side::Enemy, 100, 100),
            combatant(CharacterClass::Fighter, Side::Enemy, 100, 100),
        ];

        let hit = resolve_effect(&actor, &party[1], ActionType::AttackSpread, &party, &mut Fixed(0.9));
        assert_eq!(hit.magnitude, 225);
    }

    #[test]
    fn mage_uses_magical_pair() {
        let actor = combatant(CharacterClass::Mage, Side::Player, 75, 40);
        let target = combatant(CharacterClass::Fighter, Side::Enemy, 100, 50);
        // m_atk 150 against m_def 100
        let hit = resolve_effect(&actor, &target, ActionType::AttackSolo, &[], &mut Fixed(0.9));
        assert_eq!(hit.magnitude, 450);
    }

    #[test]
    fn zero_defense_stays_finite() {
        assert_eq!(attack_magnitude(10.0, 0.0, false, 1), 200);
    }

    #[test]
    fn heal_restores_half_max_hp_without_drawing() {
        let actor = combatant(CharacterClass::Mage, Side::Player, 10, 10);
        let mut target = combatant(CharacterClass::Fighter, Side::Player, 10, 10);
        target.battle_stats.hp = 100;

        struct Panicking;
        impl BattleRng for Panicking {
            fn next_f64(&mut self) -> f64 {
                panic!("heals must not consume randomness");
            }
        }

        let heal = resolve_effect(&actor, &target, ActionType::HealSolo, &[], &mut Panicking);
        assert_eq!(heal, Effect { magnitude: 750, critical: false });
    }

    #[test]
    fn heal_is_clamped_at_max_hp() {
        let mut stats = combatant(CharacterClass::Fighter, Side::Player, 10, 10).battle_stats;
        stats.hp = stats.max_hp - 1;

        let restored = apply_effect(
            &mut stats,
            ActionType::HealSolo,
            Effect { magnitude: 750, critical: false },
        );
        assert_eq!(stats.hp, stats.max_hp);
        assert_eq!(restored, 1);
    }

    #[test]
    fn attack_subtracts_full_magnitude() {
        let mut stats = combatant(CharacterClass::Fighter, Side::Enemy, 10, 10).battle_stats;
        let dealt = apply_effect(
            &mut stats,
            ActionType::AttackSpread,
            Effect { magnitude: 2000, critical: true },
        );
        assert_eq!(dealt, 2000);
        assert_eq!(stats.hp, -500);
    }

    #[test]
    fn repeated_huge_blows_saturate_instead_of_wrapping() {
        let mut stats = combatant(CharacterClass::Archer, Side::Enemy, 10, 10).battle_stats;
        let blow = Effect { magnitude: i64::MAX, critical: false };
        apply_effect(&mut stats, ActionType::AttackSolo, blow);
        apply_effect(&mut stats, ActionType::AttackSolo, blow);
        assert_eq!(stats.hp, i64::MIN);
        assert!(stats.hp <= 0);
    }

    #[test]
    fn magnitude_never_goes_negative() {
        assert_eq!(attack_magnitude(150.0, -100.0, false, 1), 0);
        assert_eq!(attack_magnitude(1e300, 1.0, true, 1), i64::MAX);
    }
}
