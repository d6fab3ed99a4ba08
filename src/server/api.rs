use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::combat::{
    entropy_seed, simulate_battle_with_config, CharacterDefinition, CombatError, Rng, Verdict,
};
use crate::data::{write_battle_log, StoreError, StoredCharacter};
use crate::parallel::{run_battles_parallel, BattleSummary};
use crate::server::state::AppState;

pub const INVALID_PARTY_DATA: &str = "Invalid party data";

const DEFAULT_SWEEP_ITERATIONS: usize = 1000;
const MAX_SWEEP_ITERATIONS: usize = 100_000;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Combat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::NotFound(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

pub fn health_payload() -> HealthResponse {
    HealthResponse {
        status: "ok",
        service: "skirmish-api",
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterList {
    pub characters: Vec<StoredCharacter>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid character id '{raw}'")))
}

fn parse_definition(body: &str) -> Result<CharacterDefinition, ApiError> {
    let definition: CharacterDefinition = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid character data: {err}")))?;
    definition
        .validate()
        .map_err(|err| ApiError::BadRequest(format!("Invalid character data: {err}")))?;
    Ok(definition)
}

pub fn list_characters_payload(state: &AppState) -> CharacterList {
    CharacterList {
        characters: state.store.list(),
    }
}

pub fn create_character_payload(state: &AppState, body: &str) -> Result<StoredCharacter, ApiError> {
    let definition = parse_definition(body)?;
    let created = state.store.create(definition);
    tracing::info!(id = %created.id, name = %created.definition.name, "character created");
    Ok(created)
}

pub fn get_character_payload(state: &AppState, id: &str) -> Result<StoredCharacter, ApiError> {
    let id = parse_id(id)?;
    state.store.get(id).ok_or_else(|| StoreError::NotFound(id).into())
}

pub fn update_character_payload(
    state: &AppState,
    id: &str,
    body: &str,
) -> Result<StoredCharacter, ApiError> {
    let id = parse_id(id)?;
    let definition = parse_definition(body)?;
    state
        .store
        .update(id, definition)
        .ok_or_else(|| StoreError::NotFound(id).into())
}

pub fn delete_character_payload(state: &AppState, id: &str) -> Result<StoredCharacter, ApiError> {
    let id = parse_id(id)?;
    let removed = state.store.delete(id).ok_or(StoreError::NotFound(id))?;
    tracing::info!(%id, "character deleted");
    Ok(removed)
}

/// Both sides of a battle, either as stored character ids or inline
/// definitions. Inline definitions win when a side carries both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySelection {
    pub player_party_ids: Option<Vec<Uuid>>,
    pub enemy_party_ids: Option<Vec<Uuid>>,
    pub player_party: Option<Vec<CharacterDefinition>>,
    pub enemy_party: Option<Vec<CharacterDefinition>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BattleRequest {
    #[serde(flatten)]
    pub parties: PartySelection,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepRequest {
    #[serde(flatten)]
    pub parties: PartySelection,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleResponse {
    pub log: Vec<String>,
    pub result: Verdict,
    pub rounds: u32,
    pub seed: u64,
}

fn resolve_side(
    state: &AppState,
    inline: Option<Vec<CharacterDefinition>>,
    ids: Option<Vec<Uuid>>,
) -> Result<Vec<CharacterDefinition>, ApiError> {
    let party = match (inline, ids) {
        (Some(inline), _) => inline,
        (None, Some(ids)) => state.store.resolve_party(&ids)?,
        (None, None) => Vec::new(),
    };
    if party.is_empty() {
        return Err(ApiError::BadRequest(INVALID_PARTY_DATA.to_string()));
    }
    Ok(party)
}

fn resolve_parties(
    state: &AppState,
    selection: PartySelection,
) -> Result<(Vec<CharacterDefinition>, Vec<CharacterDefinition>), ApiError> {
    let player = resolve_side(state, selection.player_party, selection.player_party_ids)?;
    let enemy = resolve_side(state, selection.enemy_party, selection.enemy_party_ids)?;
    Ok((player, enemy))
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("{INVALID_PARTY_DATA}: {err}")))
}

/// Run one battle. Blocking: writes the log file when a log directory is
/// configured, so async callers should run it on the blocking pool.
pub fn battle_payload(state: &AppState, body: &str) -> Result<BattleResponse, ApiError> {
    let request: BattleRequest = parse_body(body)?;
    let (player, enemy) = resolve_parties(state, request.parties)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);

    let mut rng = Rng::new(seed);
    let outcome =
        simulate_battle_with_config(&player, &enemy, &mut rng, &state.config.battle_config())?;
    tracing::info!(
        seed,
        result = %outcome.result,
        rounds = outcome.rounds,
        players = player.len(),
        enemies = enemy.len(),
        "battle resolved"
    );

    if let Some(dir) = state.config.log_dir.as_deref() {
        // The battle already happened; a failed write is reported but not fatal.
        if let Err(err) = write_battle_log(dir, &outcome) {
            tracing::warn!(error = %err, "battle log not written");
        }
    }

    Ok(BattleResponse {
        log: outcome.log,
        result: outcome.result,
        rounds: outcome.rounds,
        seed,
    })
}

pub fn sweep_payload(state: &AppState, body: &str) -> Result<BattleSummary, ApiError> {
    let request: SweepRequest = parse_body(body)?;
    let iterations = request.iterations.unwrap_or(DEFAULT_SWEEP_ITERATIONS);
    if !(1..=MAX_SWEEP_ITERATIONS).contains(&iterations) {
        return Err(ApiError::BadRequest(format!(
            "iterations must be between 1 and {MAX_SWEEP_ITERATIONS}"
        )));
    }
    let (player, enemy) = resolve_parties(state, request.parties)?;
    let seed = request.seed.unwrap_or_else(entropy_seed);

    let summary =
        run_battles_parallel(&player, &enemy, iterations, seed, &state.config.battle_config())?;
    tracing::info!(
        seed,
        iterations,
        win_rate = summary.win_rate,
        "sweep finished"
    );
    Ok(summary)
}
