pub mod actions;
pub mod damage;
pub mod engine;
pub mod export_csv;
pub mod log;
pub mod rng;
pub mod stats;
pub mod targeting;
pub mod turn_order;

pub use actions::{
    action_options, party_for_side, select_action, ActionType, HEAL_SOLO_THRESHOLD,
    HEAL_SPREAD_THRESHOLD,
};
pub use damage::{
    apply_effect, attack_magnitude, crit_threshold, heal_magnitude, resolve_effect, Effect, CRIT_MODIFIER,
    CRIT_SCALE, DAMAGE_MODIFIER, HEAL_FRACTION,
};
pub use crate::error::CombatError;
pub use engine::{
    determine_verdict, is_party_defeated, simulate_battle, simulate_battle_with_config, Battle,
    BattleConfig, BattleOutcome, BattleState, Verdict, DEFAULT_MAX_ROUNDS,
};
pub use export_csv::{export_events_csv, ExportError};
pub use log::{BattleEvent, BattleLog};
pub use rng::{entropy_seed, BattleRng, Rng};
pub use stats::{
    derive_battle_stats, BaseStats, BattleCombatant, BattleStats, CharacterClass,
    CharacterDefinition, CombatantId, Heart, Rarity, Side,
};
pub use targeting::{select_targets, spread_attack_targets};
pub use turn_order::turn_order;
