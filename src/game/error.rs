use thiserror::Error;

/// Configuration problems detected when a session starts or restarts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("word pool too small: {available} unique words for {required} rounds")]
    PoolTooSmall { available: usize, required: usize },

    #[error("word '{0}' cannot be scrambled into a different arrangement")]
    UnshuffleableWord(String),

    #[error("invalid game settings: {0}")]
    InvalidSettings(String),
}
