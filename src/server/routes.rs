use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::data::StoredCharacter;
use crate::parallel::BattleSummary;
use crate::server::api::{self, ApiError, BattleResponse, CharacterList, HealthResponse};
use crate::server::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/characters", get(list_characters).post(create_character))
        .route(
            "/api/characters/:id",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/api/battles", post(create_battle))
        .route("/api/battles/sweep", post(sweep_battles))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(api::health_payload())
}

async fn list_characters(State(state): State<AppState>) -> Json<CharacterList> {
    Json(api::list_characters_payload(&state))
}

async fn create_character(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<StoredCharacter>), ApiError> {
    let created = api::create_character_payload(&state, &body)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredCharacter>, ApiError> {
    api::get_character_payload(&state, &id).map(Json)
}

async fn update_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<StoredCharacter>, ApiError> {
    api::update_character_payload(&state, &id, &body).map(Json)
}

async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredCharacter>, ApiError> {
    api::delete_character_payload(&state, &id).map(Json)
}

async fn create_battle(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<BattleResponse>, ApiError> {
    run_blocking(move || api::battle_payload(&state, &body)).await.map(Json)
}

async fn sweep_battles(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<BattleSummary>, ApiError> {
    run_blocking(move || api::sweep_payload(&state, &body)).await.map(Json)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Battles and sweeps are CPU bound and may write log files.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::Internal(format!("battle task failed: {err}")))?
}
