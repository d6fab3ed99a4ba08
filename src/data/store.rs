//! In-memory character records keyed by UUID. Nothing is persisted; the
//! store lives as long as the process that owns it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::combat::CharacterDefinition;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCharacter {
    pub id: Uuid,
    #[serde(flatten)]
    pub definition: CharacterDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("character {0} not found")]
    NotFound(Uuid),
}

/// Cheap to clone; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct CharacterStore {
    records: Arc<RwLock<HashMap<Uuid, CharacterDefinition>>>,
}

impl CharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, definition: CharacterDefinition) -> StoredCharacter {
        let id = Uuid::new_v4();
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, definition.clone());
        StoredCharacter { id, definition }
    }

    /// All records, sorted by name then id so listings are stable.
    pub fn list(&self) -> Vec<StoredCharacter> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut list: Vec<StoredCharacter> = records
            .iter()
            .map(|(id, definition)| StoredCharacter {
                id: *id,
                definition: definition.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.definition.name.cmp(&b.definition.name).then(a.id.cmp(&b.id)));
        list
    }

    pub fn get(&self, id: Uuid) -> Option<StoredCharacter> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|definition| StoredCharacter {
                id,
                definition: definition.clone(),
            })
    }

    /// Replace a record. Returns `None` when the id is unknown.
    pub fn update(&self, id: Uuid, definition: CharacterDefinition) -> Option<StoredCharacter> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let slot = records.get_mut(&id)?;
        *slot = definition.clone();
        Some(StoredCharacter { id, definition })
    }

    pub fn delete(&self, id: Uuid) -> Option<StoredCharacter> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|definition| StoredCharacter { id, definition })
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Definitions for `ids`, in request order. Fails on the first unknown id.
    pub fn resolve_party(&self, ids: &[Uuid]) -> Result<Vec<CharacterDefinition>, StoreError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        ids.iter()
            .map(|id| records.get(id).cloned().ok_or(StoreError::NotFound(*id)))
            .collect()
    }
}
