pub mod game;

pub use game::{
    EngineSnapshot, GameSettings, GameStatus, ScoreSummary, DEFAULT_MAX_ROUNDS,
    DEFAULT_SCORE_INCREASE,
};
