//! Roster files: both parties of a battle in one JSON or YAML document.
//!
//! ```yaml
//! player:
//!   - name: Fighter1
//!     class: Fighter
//!     rarity: R
//!     baseStats: { spd: 100, pAtk: 150, pDef: 90, mAtk: 60, mDef: 50, critC: 100, critR: 100, hp: 1500 }
//! enemy:
//!   - ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::CharacterDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterFile {
    #[serde(alias = "playerParty")]
    pub player: Vec<CharacterDefinition>,
    #[serde(alias = "enemyParty")]
    pub enemy: Vec<CharacterDefinition>,
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid roster json '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid roster yaml '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Load a roster. `.yaml`/`.yml` files are read as YAML, everything else as JSON.
pub fn load_roster(path: impl AsRef<Path>) -> Result<RosterFile, RosterError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&raw).map_err(|source| RosterError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&raw).map_err(|source| RosterError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
