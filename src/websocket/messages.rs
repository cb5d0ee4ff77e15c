use serde::{Deserialize, Serialize};

use crate::models::EngineSnapshot;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    NewGame {
        #[serde(default)]
        max_rounds: Option<u32>,
    },
    SubmitWord {
        word: String,
    },
    SkipWord,
    Restart,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        game_id: String,
        state: EngineSnapshot,
    },
    WordAccepted {
        score: u32,
    },
    WordRejected {
        reason: String,
    },
    GameOver {
        final_score: u32,
        rounds_played: u32,
        max_rounds: u32,
    },
    Error {
        message: String,
    },
}
