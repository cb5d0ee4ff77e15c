mod config;
mod dictionary;
mod game;
mod models;
mod routes;
mod websocket;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use config::Config;
use dashmap::DashMap;
use dictionary::WordPool;
use game::{GameSession, RoundEngine};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How often idle HTTP sessions are swept
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub words: Arc<WordPool>,
    /// Sessions played over the HTTP API, keyed by game id
    pub games: DashMap<Uuid, GameSession>,
}

impl AppState {
    pub fn new(config: Config, words: Arc<WordPool>) -> Self {
        Self {
            config,
            words,
            games: DashMap::new(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unscramble_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Unscramble server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load word pool
    let words = match &config.game.word_list_path {
        Some(path) => match WordPool::load(path).await {
            Ok(pool) => Arc::new(pool),
            Err(e) => {
                tracing::warn!("Failed to load word list: {:#}. Using built-in words.", e);
                dictionary::builtin_pool()
            }
        },
        None => {
            tracing::info!("No WORD_LIST_PATH set, using built-in words");
            dictionary::builtin_pool()
        }
    };

    // A pool that cannot support the configured rounds would fail every game
    RoundEngine::new(words.clone(), config.game.settings())
        .context("word pool cannot support the configured game settings")?;
    tracing::info!(
        "Word pool ready: {} words, {} rounds per game",
        words.len(),
        config.game.max_rounds
    );

    let state = Arc::new(AppState::new(config.clone(), words));

    // Spawn background task to drop abandoned sessions
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        session_cleanup_task(cleanup_state).await;
    });

    let app = build_router(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Background task that periodically drops HTTP sessions nobody is playing
async fn session_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);

    loop {
        interval.tick().await;
        remove_idle_sessions(&state, Instant::now());
    }
}

/// Remove sessions idle longer than the configured timeout, returning how many went
fn remove_idle_sessions(state: &AppState, now: Instant) -> usize {
    let timeout = state.config.game.idle_timeout();
    let before = state.games.len();

    state.games.retain(|game_id, session| {
        let keep = session.idle_for(now) <= timeout;
        if !keep {
            tracing::info!("Removed idle game {} (timeout expired)", game_id);
        }
        keep
    });

    before.saturating_sub(state.games.len())
}
