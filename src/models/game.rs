use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of words presented per session
pub const DEFAULT_MAX_ROUNDS: u32 = 10;
/// Default points awarded for a correct guess
pub const DEFAULT_SCORE_INCREASE: u32 = 20;

/// Rules a session is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub max_rounds: u32,
    pub score_increase: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            score_increase: DEFAULT_SCORE_INCREASE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// A scrambled word is on display, awaiting a guess or skip
    InRound,
    /// The last round has been played; only a restart leaves this state
    Complete,
}

/// Public view of a session. Never carries the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub score: u32,
    pub round: u32,
    pub max_rounds: u32,
    pub scrambled_word: String,
    pub status: GameStatus,
}

/// Final-score summary shown once a session completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub final_score: u32,
    pub rounds_played: u32,
    pub max_rounds: u32,
    pub started_at: DateTime<Utc>,
}
