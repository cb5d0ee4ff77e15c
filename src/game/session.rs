use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dictionary::WordPool,
    game::{GameError, RoundEngine},
    models::{EngineSnapshot, GameSettings, ScoreSummary},
};

/// What happened to a submission or skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Guess matched; the next word is on display
    Correct,
    /// Guess did not match; nothing changed
    Incorrect,
    /// Word skipped without scoring; the next word is on display
    Skipped,
    /// The last round is over and the final score stands
    Finished,
}

/// One play-through driven by a client: submit-then-advance, skip and restart.
#[derive(Debug)]
pub struct GameSession<R: Rng = StdRng> {
    pub game_id: Uuid,
    engine: RoundEngine<R>,
    started_at: DateTime<Utc>,
    last_active: Instant,
}

impl GameSession<StdRng> {
    pub fn new(pool: Arc<WordPool>, settings: GameSettings) -> Result<Self, GameError> {
        Ok(Self::from_engine(RoundEngine::new(pool, settings)?))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn from_engine(engine: RoundEngine<R>) -> Self {
        Self {
            game_id: Uuid::new_v4(),
            engine,
            started_at: Utc::now(),
            last_active: Instant::now(),
        }
    }

    /// Check the player's word; a correct guess moves straight on to the next round.
    pub fn submit(&mut self, word: &str) -> SubmitOutcome {
        self.touch();

        if !self.engine.submit_guess(word) {
            return SubmitOutcome::Incorrect;
        }

        if self.engine.advance() {
            SubmitOutcome::Correct
        } else {
            SubmitOutcome::Finished
        }
    }

    pub fn skip(&mut self) -> SubmitOutcome {
        self.touch();

        if self.engine.skip() {
            SubmitOutcome::Skipped
        } else {
            SubmitOutcome::Finished
        }
    }

    pub fn restart(&mut self) -> Result<(), GameError> {
        self.touch();
        self.engine.restart()?;
        self.started_at = Utc::now();
        tracing::info!("Game {} restarted", self.game_id);
        Ok(())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    /// Final score, available once the session is complete
    pub fn summary(&self) -> Option<ScoreSummary> {
        self.engine.is_complete().then(|| ScoreSummary {
            final_score: self.engine.score(),
            rounds_played: self.engine.round_count(),
            max_rounds: self.engine.max_rounds(),
            started_at: self.started_at,
        })
    }

    pub fn engine(&self) -> &RoundEngine<R> {
        &self.engine
    }

    /// Time since the last client interaction
    pub fn idle_for(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.last_active)
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}
