use crate::{
    game::{GameError, GameSession, SubmitOutcome},
    models::{EngineSnapshot, GameSettings, ScoreSummary},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Overrides the server's configured round limit for this game
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuessRequest {
    pub word: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub state: EngineSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScoreSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub outcome: SubmitOutcome,
    pub state: EngineSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScoreSummary>,
}

impl GameResponse {
    fn from_session(session: &GameSession) -> Self {
        Self {
            game_id: session.game_id,
            state: session.snapshot(),
            summary: session.summary(),
        }
    }
}

fn config_error_status(e: &GameError) -> StatusCode {
    tracing::warn!("Rejected game configuration: {}", e);
    StatusCode::UNPROCESSABLE_ENTITY
}

/// Start a new game
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), StatusCode> {
    let defaults = state.config.game.settings();
    let settings = GameSettings {
        max_rounds: payload.max_rounds.unwrap_or(defaults.max_rounds),
        ..defaults
    };

    let session = GameSession::new(state.words.clone(), settings)
        .map_err(|e| config_error_status(&e))?;
    let response = GameResponse::from_session(&session);

    tracing::info!(
        "Created game {} ({} rounds)",
        session.game_id,
        settings.max_rounds
    );
    state.games.insert(session.game_id, session);

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, StatusCode> {
    let session = state.games.get(&game_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(GameResponse::from_session(&session)))
}

/// Check a guess; a correct one moves the game to the next word
pub async fn submit_guess(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<TurnResponse>, StatusCode> {
    let mut session = state.games.get_mut(&game_id).ok_or(StatusCode::NOT_FOUND)?;
    let outcome = session.submit(&payload.word);

    tracing::debug!("Game {}: guess outcome {:?}", game_id, outcome);

    Ok(Json(TurnResponse {
        outcome,
        state: session.snapshot(),
        summary: session.summary(),
    }))
}

pub async fn skip_word(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<TurnResponse>, StatusCode> {
    let mut session = state.games.get_mut(&game_id).ok_or(StatusCode::NOT_FOUND)?;
    let outcome = session.skip();

    Ok(Json(TurnResponse {
        outcome,
        state: session.snapshot(),
        summary: session.summary(),
    }))
}

pub async fn restart_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, StatusCode> {
    let mut session = state.games.get_mut(&game_id).ok_or(StatusCode::NOT_FOUND)?;
    session.restart().map_err(|e| config_error_status(&e))?;
    Ok(Json(GameResponse::from_session(&session)))
}

pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> StatusCode {
    match state.games.remove(&game_id) {
        Some(_) => {
            tracing::info!("Deleted game {}", game_id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
