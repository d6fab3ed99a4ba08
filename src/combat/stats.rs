//! Character definitions and their battle-ready derivation.
//!
//! Field names on the wire follow the stored character records (`baseStats`,
//! `pAtk`, `critC`, ...). Class and rarity are closed enums; an unrecognised
//! string is rejected while parsing, so a derivation never sees a missing
//! multiplier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CombatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CharacterClass {
    Fighter,
    Mage,
    Archer,
}

impl CharacterClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fighter => "Fighter",
            Self::Mage => "Mage",
            Self::Archer => "Archer",
        }
    }
}

impl FromStr for CharacterClass {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fighter" => Ok(Self::Fighter),
            "Mage" => Ok(Self::Mage),
            "Archer" => Ok(Self::Archer),
            other => Err(CombatError::UnknownClass(other.to_string())),
        }
    }
}

impl TryFrom<String> for CharacterClass {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CharacterClass> for String {
    fn from(value: CharacterClass) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personality tag carried by stored characters. Not used in combat math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heart {
    Beauty,
    Kindness,
    Humility,
    Diligence,
    Faith,
    Feral,
}

/// Rarity tiers in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rarity {
    R,
    RPlus,
    Sr,
    SrPlus,
    Ssr,
    SsrPlus,
    Ur,
    UrPlus,
    Lr,
}

impl Rarity {
    pub const ALL: [Rarity; 9] = [
        Self::R,
        Self::RPlus,
        Self::Sr,
        Self::SrPlus,
        Self::Ssr,
        Self::SsrPlus,
        Self::Ur,
        Self::UrPlus,
        Self::Lr,
    ];

    /// Scalar applied to base stats during derivation.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::R => 1.0,
            Self::RPlus => 1.05,
            Self::Sr => 1.15,
            Self::SrPlus => 1.3,
            Self::Ssr => 1.5,
            Self::SsrPlus => 1.75,
            Self::Ur => 2.05,
            Self::UrPlus => 2.5,
            Self::Lr => 3.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::RPlus => "R+",
            Self::Sr => "SR",
            Self::SrPlus => "SR+",
            Self::Ssr => "SSR",
            Self::SsrPlus => "SSR+",
            Self::Ur => "UR",
            Self::UrPlus => "UR+",
            Self::Lr => "LR",
        }
    }
}

impl FromStr for Rarity {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str() == s)
            .ok_or_else(|| CombatError::UnknownRarity(s.to_string()))
    }
}

impl TryFrom<String> for Rarity {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rarity> for String {
    fn from(value: Rarity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub spd: f64,
    pub p_atk: f64,
    pub p_def: f64,
    pub m_atk: f64,
    pub m_def: f64,
    pub crit_c: f64,
    pub crit_r: f64,
    pub hp: f64,
}

fn default_level() -> u32 {
    1
}

/// A stored character as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDefinition {
    pub name: String,
    pub class: CharacterClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart: Option<Heart>,
    #[serde(default = "default_level")]
    pub level: u32,
    pub rarity: Rarity,
    pub base_stats: BaseStats,
}

impl BaseStats {
    /// Every stat paired with its record field name.
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("spd", self.spd),
            ("pAtk", self.p_atk),
            ("pDef", self.p_def),
            ("mAtk", self.m_atk),
            ("mDef", self.m_def),
            ("critC", self.crit_c),
            ("critR", self.crit_r),
            ("hp", self.hp),
        ]
    }
}

impl CharacterDefinition {
    pub fn validate(&self) -> Result<(), CombatError> {
        if self.level == 0 {
            return Err(CombatError::InvalidLevel {
                name: self.name.clone(),
            });
        }
        if let Some((stat, _)) = self
            .base_stats
            .fields()
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(CombatError::InvalidStat {
                name: self.name.clone(),
                stat,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStats {
    pub spd: i64,
    pub p_atk: i64,
    pub p_def: i64,
    pub m_atk: i64,
    pub m_def: i64,
    pub crit_c: f64,
    pub crit_r: f64,
    pub hp: i64,
    pub max_hp: i64,
}

/// Addresses one combatant inside a battle: its side and its slot in that
/// side's party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CombatantId {
    pub side: Side,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleCombatant {
    pub name: String,
    pub class: CharacterClass,
    pub side: Side,
    pub battle_stats: BattleStats,
}

impl BattleCombatant {
    pub fn is_defeated(&self) -> bool {
        self.battle_stats.hp <= 0
    }

    /// `hp <= fraction * max_hp`. Defeated combatants satisfy every threshold.
    pub fn hp_at_or_below(&self, fraction: f64) -> bool {
        (self.battle_stats.hp as f64) <= fraction * self.battle_stats.max_hp as f64
    }
}

fn scale(base: f64, level: u32, multiplier: f64) -> i64 {
    (base * f64::from(level) * multiplier).round() as i64
}

/// Derive battle stats once, at battle start. Critical chance and resistance
/// are copied unscaled; every other stat is `round(base * level * multiplier)`.
pub fn derive_battle_stats(definition: &CharacterDefinition, side: Side) -> BattleCombatant {
    let base = &definition.base_stats;
    let level = definition.level;
    let multiplier = definition.rarity.multiplier();
    let hp = scale(base.hp, level, multiplier);

    BattleCombatant {
        name: definition.name.clone(),
        class: definition.class,
        side,
        battle_stats: BattleStats {
            spd: scale(base.spd, level, multiplier),
            p_atk: scale(base.p_atk, level, multiplier),
            p_def: scale(base.p_def, level, multiplier),
            m_atk: scale(base.m_atk, level, multiplier),
            m_def: scale(base.m_def, level, multiplier),
            crit_c: base.crit_c,
            crit_r: base.crit_r,
            hp,
            max_hp: hp,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss() -> CharacterDefinition {
        CharacterDefinition {
            name: "Boss1".to_string(),
            class: CharacterClass::Fighter,
            heart: None,
            level: 1,
            rarity: Rarity::RPlus,
            base_stats: BaseStats {
                spd: 126.0,
                p_atk: 147.0,
                p_def: 105.0,
                m_atk: 105.0,
                m_def: 126.0,
                crit_c: 210.0,
                crit_r: 105.0,
                hp: 3150.0,
            },
        }
    }

    #[test]
    fn derivation_scales_by_level_and_rarity() {
        let combatant = derive_battle_stats(&boss(), Side::Enemy);
        let stats = combatant.battle_stats;
        assert_eq!(stats.spd, 132);
        assert_eq!(stats.p_atk, 154);
        assert_eq!(stats.p_def, 110);
        assert_eq!(stats.m_def, 132);
        assert_eq!(stats.hp, 3308);
        assert_eq!(stats.max_hp, 3308);
        assert_eq!(stats.crit_c, 210.0);
        assert_eq!(stats.crit_r, 105.0);
        assert_eq!(combatant.side, Side::Enemy);
    }

    #[test]
    fn level_multiplies_before_rounding() {
        let mut definition = boss();
        definition.level = 3;
        definition.rarity = Rarity::Lr;
        let stats = derive_battle_stats(&definition, Side::Player).battle_stats;
        assert_eq!(stats.p_atk, 1323);
        assert_eq!(stats.hp, 28350);
    }

    #[test]
    fn rarity_table_round_trips_its_labels() {
        for rarity in Rarity::ALL {
            assert_eq!(rarity.as_str().parse::<Rarity>(), Ok(rarity));
        }
        assert!(Rarity::R < Rarity::Lr);
    }

    #[test]
    fn unknown_rarity_and_class_are_rejected() {
        assert_eq!(
            "SSS".parse::<Rarity>(),
            Err(CombatError::UnknownRarity("SSS".to_string()))
        );
        assert_eq!(
            "Rogue".parse::<CharacterClass>(),
            Err(CombatError::UnknownClass("Rogue".to_string()))
        );
    }

    #[test]
    fn definition_deserializes_from_record_json() {
        let raw = r#"{
            "name": "Mage1", "class": "Mage", "heart": "Faith", "rarity": "SR+",
            "baseStats": { "spd": 40, "pAtk": 50, "pDef": 80, "mAtk": 150,
                           "mDef": 150, "critC": 50, "critR": 40, "hp": 1500 }
        }"#;
        let definition: CharacterDefinition = serde_json::from_str(raw).expect("valid record");
        assert_eq!(definition.level, 1);
        assert_eq!(definition.rarity, Rarity::SrPlus);
        assert_eq!(definition.heart, Some(Heart::Faith));
        assert_eq!(definition.base_stats.m_atk, 150.0);
    }

    #[test]
    fn level_zero_fails_validation() {
        let mut definition = boss();
        definition.level = 0;
        assert!(matches!(
            definition.validate(),
            Err(CombatError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn negative_or_non_finite_stats_fail_validation() {
        let mut negative = boss();
        negative.base_stats.p_def = -100.0;
        assert_eq!(
            negative.validate(),
            Err(CombatError::InvalidStat {
                name: "Boss1".to_string(),
                stat: "pDef",
            })
        );

        let mut infinite = boss();
        infinite.base_stats.hp = f64::INFINITY;
        assert!(matches!(
            infinite.validate(),
            Err(CombatError::InvalidStat { stat: "hp", .. })
        ));

        let mut nan = boss();
        nan.base_stats.crit_c = f64::NAN;
        assert!(matches!(
            nan.validate(),
            Err(CombatError::InvalidStat { stat: "critC", .. })
        ));

        assert_eq!(boss().validate(), Ok(()));
    }
}
