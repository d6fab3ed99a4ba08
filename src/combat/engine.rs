//! Round loop, effect application and termination for one battle.
//!
//! A [Battle] owns both parties for its whole lifetime. Each round orders
//! every combatant by speed, lets each living one pick an action and
//! targets, applies the resolved effects in place and logs one line per
//! (actor, target) pair. The battle resolves as soon as one side is wiped
//! out; the enemy side is checked first, so a simultaneous wipe is a victory.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::combat::actions::{select_action, ActionType};
use crate::combat::damage::{apply_effect, resolve_effect};
use crate::combat::log::{BattleEvent, BattleLog};
use crate::combat::rng::BattleRng;
use crate::combat::stats::{
    derive_battle_stats, BattleCombatant, CharacterDefinition, CombatantId, Side,
};
use crate::combat::targeting::select_targets;
use crate::combat::turn_order::turn_order;
use crate::error::CombatError;

pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Victory,
    Defeat,
    Ongoing,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => write!(f, "Victory"),
            Self::Defeat => write!(f, "Defeat"),
            Self::Ongoing => write!(f, "Ongoing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Active,
    Resolved(Verdict),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleConfig {
    /// Starting a round past this count aborts the battle.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleOutcome {
    pub log: Vec<String>,
    pub result: Verdict,
    pub rounds: u32,
    pub events: Vec<BattleEvent>,
}

/// Every member at or below 0 hp.
pub fn is_party_defeated(party: &[BattleCombatant]) -> bool {
    party.iter().all(BattleCombatant::is_defeated)
}

pub fn determine_verdict(player_party: &[BattleCombatant], enemy_party: &[BattleCombatant]) -> Verdict {
    if is_party_defeated(enemy_party) {
        Verdict::Victory
    } else if is_party_defeated(player_party) {
        Verdict::Defeat
    } else {
        Verdict::Ongoing
    }
}

fn derive_party(definitions: &[CharacterDefinition], side: Side) -> Result<Vec<BattleCombatant>, CombatError> {
    if definitions.is_empty() {
        return Err(CombatError::EmptyParty(side));
    }
    definitions
        .iter()
        .map(|definition| {
            definition.validate()?;
            Ok(derive_battle_stats(definition, side))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Battle {
    player: Vec<BattleCombatant>,
    enemy: Vec<BattleCombatant>,
    state: BattleState,
    round: u32,
    log: BattleLog,
}

impl Battle {
    /// Derive both parties. Fails on an empty side or an invalid definition.
    pub fn new(
        player_definitions: &[CharacterDefinition],
        enemy_definitions: &[CharacterDefinition],
    ) -> Result<Self, CombatError> {
        Ok(Self::from_parties(
            derive_party(player_definitions, Side::Player)?,
            derive_party(enemy_definitions, Side::Enemy)?,
        ))
    }

    /// Start from already-derived parties.
    pub fn from_parties(player: Vec<BattleCombatant>, enemy: Vec<BattleCombatant>) -> Self {
        Self {
            player,
            enemy,
            state: BattleState::Active,
            round: 0,
            log: BattleLog::new(),
        }
    }

    pub fn party(&self, side: Side) -> &[BattleCombatant] {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// `None` when `id.slot` is outside its party.
    pub fn combatant(&self, id: CombatantId) -> Option<&BattleCombatant> {
        self.party(id.side).get(id.slot)
    }

    // Ids handed out by `turn_order` and `select_targets` are always in range.
    fn member(&self, id: CombatantId) -> &BattleCombatant {
        &self.party(id.side)[id.slot]
    }

    fn combatant_mut(&mut self, id: CombatantId) -> &mut BattleCombatant {
        match id.side {
            Side::Player => &mut self.player[id.slot],
            Side::Enemy => &mut self.enemy[id.slot],
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn rounds_played(&self) -> u32 {
        self.round
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Move to `Resolved` once a side is wiped out. Idempotent.
    pub fn check_termination(&mut self) -> BattleState {
        if self.state == BattleState::Active {
            let verdict = determine_verdict(&self.player, &self.enemy);
            if verdict != Verdict::Ongoing {
                self.state = BattleState::Resolved(verdict);
            }
        }
        self.state
    }

    /// Play one full round. Every combatant alive at its turn acts, even if
    /// the opposing side was wiped out earlier in the same round.
    pub fn play_round<R: BattleRng + ?Sized>(&mut self, rng: &mut R) {
        self.round += 1;
        self.log.push(BattleEvent::RoundStarted { round: self.round });

        for id in turn_order(&self.player, &self.enemy) {
            self.take_turn(id, rng);
        }
    }

    fn take_turn<R: BattleRng + ?Sized>(&mut self, id: CombatantId, rng: &mut R) {
        let actor = self.member(id);
        if actor.is_defeated() {
            return;
        }

        let defender_party = self.party(actor.side.opposite());
        let action = select_action(actor, defender_party, &self.player, &self.enemy, rng);
        let targets = select_targets(actor, action, defender_party, &self.player, &self.enemy, rng);

        if targets.is_empty() {
            debug!(actor = %actor.name, %action, round = self.round, "no eligible targets, turn skipped");
            return;
        }

        for target_id in targets {
            self.apply_action(id, target_id, action, rng);
        }
    }

    fn apply_action<R: BattleRng + ?Sized>(
        &mut self,
        actor_id: CombatantId,
        target_id: CombatantId,
        action: ActionType,
        rng: &mut R,
    ) {
        let actor = self.member(actor_id);
        let effect = resolve_effect(
            actor,
            self.member(target_id),
            action,
            self.party(actor.side.opposite()),
            rng,
        );
        let actor_name = actor.name.clone();

        let target = self.combatant_mut(target_id);
        let was_standing = !target.is_defeated();
        let amount = apply_effect(&mut target.battle_stats, action, effect);
        let target_name = target.name.clone();
        let knocked_out = was_standing && target.is_defeated();

        trace!(
            actor = %actor_name,
            target = %target_name,
            %action,
            amount,
            critical = effect.critical,
            "action resolved"
        );

        let round = self.round;
        self.log.push(BattleEvent::Action {
            round,
            actor: actor_name,
            action,
            target: target_name.clone(),
            amount,
            critical: effect.critical,
        });
        if knocked_out {
            self.log.push(BattleEvent::Defeated {
                round,
                name: target_name,
            });
        }
    }

    /// Play rounds until a side is wiped out.
    pub fn run<R: BattleRng + ?Sized>(
        mut self,
        rng: &mut R,
        config: &BattleConfig,
    ) -> Result<BattleOutcome, CombatError> {
        let verdict = loop {
            if let BattleState::Resolved(verdict) = self.check_termination() {
                break verdict;
            }
            if self.round >= config.max_rounds {
                return Err(CombatError::RoundLimitExceeded {
                    limit: config.max_rounds,
                });
            }
            self.play_round(rng);
        };

        self.log.push(BattleEvent::Concluded { verdict });
        debug!(%verdict, rounds = self.round, "battle resolved");

        Ok(BattleOutcome {
            log: self.log.lines(),
            result: verdict,
            rounds: self.round,
            events: self.log.into_events(),
        })
    }
}

/// Run a battle between two rosters to completion with the default round ceiling.
pub fn simulate_battle<R: BattleRng + ?Sized>(
    player_definitions: &[CharacterDefinition],
    enemy_definitions: &[CharacterDefinition],
    rng: &mut R,
) -> Result<BattleOutcome, CombatError> {
    simulate_battle_with_config(player_definitions, enemy_definitions, rng, &BattleConfig::default())
}

pub fn simulate_battle_with_config<R: BattleRng + ?Sized>(
    player_definitions: &[CharacterDefinition],
    enemy_definitions: &[CharacterDefinition],
    rng: &mut R,
    config: &BattleConfig,
) -> Result<BattleOutcome, CombatError> {
    Battle::new(player_definitions, enemy_definitions)?.run(rng, config)
}
