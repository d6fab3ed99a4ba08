//! Structured battle events. Each event renders to exactly one log line.

use std::fmt;

use serde::Serialize;

use crate::combat::actions::ActionType;
use crate::combat::engine::Verdict;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
    },
    Action {
        round: u32,
        actor: String,
        action: ActionType,
        target: String,
        amount: i64,
        critical: bool,
    },
    Defeated {
        round: u32,
        name: String,
    },
    Concluded {
        verdict: Verdict,
    },
}

impl BattleEvent {
    pub fn round(&self) -> Option<u32> {
        match self {
            Self::RoundStarted { round }
            | Self::Action { round, .. }
            | Self::Defeated { round, .. } => Some(*round),
            Self::Concluded { .. } => None,
        }
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round } => write!(f, "Round {round}:"),
            Self::Action {
                actor,
                action,
                target,
                amount,
                ..
            } => {
                let unit = if action.is_heal() { "healing" } else { "damage" };
                write!(f, "{actor} uses {action} on {target} for {amount} {unit}.")
            }
            Self::Defeated { name, .. } => write!(f, "{name} is defeated!"),
            Self::Concluded { verdict } => write!(f, "Result: {verdict}"),
        }
    }
}

/// Append-only event list for one battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_log_lines() {
        let mut log = BattleLog::new();
        log.push(BattleEvent::RoundStarted { round: 1 });
        log.push(BattleEvent::Action {
            round: 1,
            actor: "Fighter1".to_string(),
            action: ActionType::AttackSpread,
            target: "Enemy1".to_string(),
            amount: 225,
            critical: false,
        });
        log.push(BattleEvent::Action {
            round: 1,
            actor: "Mage1".to_string(),
            action: ActionType::HealSolo,
            target: "Fighter1".to_string(),
            amount: 750,
            critical: false,
        });
        log.push(BattleEvent::Defeated {
            round: 1,
            name: "Enemy1".to_string(),
        });
        log.push(BattleEvent::Concluded {
            verdict: Verdict::Victory,
        });

        assert_eq!(
            log.lines(),
            vec![
                "Round 1:",
                "Fighter1 uses Attack Spread on Enemy1 for 225 damage.",
                "Mage1 uses Heal Solo on Fighter1 for 750 healing.",
                "Enemy1 is defeated!",
                "Result: Victory",
            ]
        );
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = BattleEvent::Defeated {
            round: 3,
            name: "Boss1".to_string(),
        };
        let value = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(value["kind"], "defeated");
        assert_eq!(value["round"], 3);
        assert_eq!(event.round(), Some(3));
    }
}
