use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

use crate::models::{GameSettings, DEFAULT_MAX_ROUNDS, DEFAULT_SCORE_INCREASE};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Optional word list file; the built-in pool is used when unset
    pub word_list_path: Option<String>,
    pub max_rounds: u32,
    pub score_increase: u32,
    /// Seconds of inactivity before an HTTP session is dropped
    pub session_idle_timeout: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000)
                .context("PORT must be a number")?,
        };

        let game = GameConfig {
            word_list_path: env::var("WORD_LIST_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            max_rounds: env_or("MAX_ROUNDS", DEFAULT_MAX_ROUNDS)
                .context("MAX_ROUNDS must be a positive number")?,
            score_increase: env_or("SCORE_INCREASE", DEFAULT_SCORE_INCREASE)
                .context("SCORE_INCREASE must be a number")?,
            session_idle_timeout: env_or("SESSION_IDLE_TIMEOUT", 1800)
                .context("SESSION_IDLE_TIMEOUT must be a number of seconds")?,
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GameConfig {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            max_rounds: self.max_rounds,
            score_increase: self.score_increase,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout)
    }
}

/// Read and parse an environment variable, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid value '{}' for {}", value, key)),
        Err(_) => Ok(default),
    }
}
