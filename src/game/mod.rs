// Game engine modules

pub mod engine;
pub mod error;
pub mod scrambler;
pub mod session;
pub mod validator;

pub use engine::RoundEngine;
pub use error::GameError;
pub use scrambler::Scrambler;
pub use session::{GameSession, SubmitOutcome};
pub use validator::GuessValidator;
