use thiserror::Error;

use crate::combat::stats::Side;

/// Failures that abort a battle before or while it runs. A battle never
/// returns a partial log alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("unknown rarity '{0}'")]
    UnknownRarity(String),

    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("character '{name}' has level 0; levels start at 1")]
    InvalidLevel { name: String },

    #[error("character '{name}' has an invalid {stat}; base stats must be finite and non-negative")]
    InvalidStat { name: String, stat: &'static str },

    #[error("{0} party is empty")]
    EmptyParty(Side),

    #[error("battle did not resolve within {limit} rounds")]
    RoundLimitExceeded { limit: u32 },
}
