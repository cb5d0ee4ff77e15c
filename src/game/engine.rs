use std::collections::HashSet;
use std::sync::Arc;

use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::{
    dictionary::WordPool,
    game::{GameError, GuessValidator, Scrambler},
    models::{EngineSnapshot, GameSettings, GameStatus},
};

/// Random draws tried before picking directly from the unused words
pub const MAX_DRAW_ATTEMPTS: usize = 256;

/// Authoritative state of one unscramble session.
///
/// A round is started as soon as the engine exists: `start` runs on construction
/// and selects the first word.
#[derive(Debug)]
pub struct RoundEngine<R: Rng = StdRng> {
    pool: Arc<WordPool>,
    settings: GameSettings,
    rng: R,
    score: u32,
    round_count: u32,
    used_words: HashSet<String>,
    current_word: String,
    current_scrambled_word: String,
    complete: bool,
}

impl RoundEngine<StdRng> {
    /// Create an engine seeded from the thread-local generator
    pub fn new(pool: Arc<WordPool>, settings: GameSettings) -> Result<Self, GameError> {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(pool, settings, rng)
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(
        pool: Arc<WordPool>,
        settings: GameSettings,
        rng: R,
    ) -> Result<Self, GameError> {
        let mut engine = Self {
            pool,
            settings,
            rng,
            score: 0,
            round_count: 0,
            used_words: HashSet::new(),
            current_word: String::new(),
            current_scrambled_word: String::new(),
            complete: false,
        };
        engine.start()?;
        Ok(engine)
    }

    /// Reset all progress and begin round 1.
    ///
    /// Configuration problems are reported here rather than surfacing mid-session.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.validate()?;

        self.score = 0;
        self.round_count = 0;
        self.used_words.clear();
        self.complete = false;
        self.select_next_word()?;

        tracing::debug!(
            "Session started: {} rounds from a pool of {} words",
            self.settings.max_rounds,
            self.pool.len()
        );
        Ok(())
    }

    /// Same as `start`; safe to call any number of times.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.start()
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.settings.max_rounds == 0 {
            return Err(GameError::InvalidSettings(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        let required = self.settings.max_rounds as usize;
        if self.pool.len() < required {
            return Err(GameError::PoolTooSmall {
                available: self.pool.len(),
                required,
            });
        }

        if let Some(word) = self.pool.first_unshuffleable() {
            return Err(GameError::UnshuffleableWord(word.to_string()));
        }

        Ok(())
    }

    /// Pick an unused word, scramble it and open the next round.
    ///
    /// Must only be called while `round_count < max_rounds`; `validate` guarantees
    /// enough unused, shuffleable words remain.
    fn select_next_word(&mut self) -> Result<(), GameError> {
        let word = self.draw_unused_word()?;
        let scrambled = self.scramble_word(&word)?;

        self.used_words.insert(word.clone());
        self.current_word = word;
        self.current_scrambled_word = scrambled;
        self.round_count += 1;

        tracing::debug!(
            "Round {}/{}: presenting '{}'",
            self.round_count,
            self.settings.max_rounds,
            self.current_scrambled_word
        );
        Ok(())
    }

    fn scramble_word(&mut self, word: &str) -> Result<String, GameError> {
        Scrambler::scramble(word, &mut self.rng)
            .ok_or_else(|| GameError::UnshuffleableWord(word.to_string()))
    }

    fn draw_unused_word(&mut self) -> Result<String, GameError> {
        let words = self.pool.words();

        for _ in 0..MAX_DRAW_ATTEMPTS {
            if let Some(word) = words.choose(&mut self.rng) {
                if !self.used_words.contains(word) {
                    return Ok(word.clone());
                }
            }
        }

        tracing::debug!("Draw attempts exhausted, choosing among remaining words");
        let remaining: Vec<&String> = words
            .iter()
            .filter(|word| !self.used_words.contains(*word))
            .collect();
        remaining
            .choose(&mut self.rng)
            .map(|word| (*word).clone())
            .ok_or(GameError::PoolTooSmall {
                available: words.len(),
                required: self.settings.max_rounds as usize,
            })
    }

    /// Check a guess against the current word, ignoring case.
    ///
    /// A correct guess adds to the score but does not advance the round.
    pub fn submit_guess(&mut self, candidate: &str) -> bool {
        if self.complete {
            return false;
        }

        if GuessValidator::is_correct(candidate, &self.current_word) {
            self.score = self.score.saturating_add(self.settings.score_increase);
            true
        } else {
            false
        }
    }

    /// Move to the next round. Returns `false` once every round has been played,
    /// after which the session is complete until restarted.
    pub fn advance(&mut self) -> bool {
        if !self.complete && self.round_count < self.settings.max_rounds {
            match self.select_next_word() {
                Ok(()) => return true,
                Err(e) => tracing::error!("Ending session early: {}", e),
            }
        }

        if !self.complete {
            tracing::debug!("Session complete with score {}", self.score);
        }
        self.complete = true;
        false
    }

    /// Give up on the current word without scoring
    pub fn skip(&mut self) -> bool {
        self.advance()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn max_rounds(&self) -> u32 {
        self.settings.max_rounds
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn current_scrambled_word(&self) -> &str {
        &self.current_scrambled_word
    }

    pub fn used_words(&self) -> &HashSet<String> {
        &self.used_words
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn status(&self) -> GameStatus {
        if self.complete {
            GameStatus::Complete
        } else {
            GameStatus::InRound
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            score: self.score,
            round: self.round_count,
            max_rounds: self.settings.max_rounds,
            scrambled_word: self.current_scrambled_word.clone(),
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(words: &[&str]) -> Arc<WordPool> {
        Arc::new(WordPool::from_words(words.iter().copied()))
    }

    fn settings(max_rounds: u32) -> GameSettings {
        GameSettings {
            max_rounds,
            score_increase: 20,
        }
    }

    fn seeded(words: &[&str], max_rounds: u32, seed: u64) -> RoundEngine<StdRng> {
        RoundEngine::with_rng(pool(words), settings(max_rounds), StdRng::seed_from_u64(seed))
            .unwrap()
    }

    fn assert_round_invariants(engine: &RoundEngine<StdRng>) {
        let word = engine.current_word();
        let scrambled = engine.current_scrambled_word();
        assert_ne!(word, scrambled, "scramble must differ from the answer");
        assert!(Scrambler::is_permutation(word, scrambled));
        assert!(engine.round_count() <= engine.max_rounds());
        assert_eq!(engine.used_words().len(), engine.round_count() as usize);
        assert!(engine.used_words().contains(word));
    }

    #[test]
    fn test_start_opens_first_round() {
        let engine = seeded(&["cat", "dog", "sun"], 3, 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
        assert!(!engine.is_complete());
        assert_eq!(engine.status(), GameStatus::InRound);
        assert_round_invariants(&engine);
    }

    #[test]
    fn test_scenario_three_words_three_rounds() {
        let mut engine = seeded(&["cat", "dog", "sun"], 3, 42);

        // Round 1: correct guess
        let first = engine.current_word().to_string();
        assert!(engine.submit_guess(&first));
        assert_eq!(engine.score(), 20);
        assert!(engine.advance());
        assert_eq!(engine.round_count(), 2);
        assert_ne!(engine.current_word(), first);
        assert_round_invariants(&engine);

        // Round 2: wrong guess, then skip
        assert!(!engine.submit_guess("zebra"));
        assert_eq!(engine.score(), 20);
        assert!(engine.advance());
        assert_eq!(engine.round_count(), 3);
        assert_round_invariants(&engine);

        // Round 3: last one
        assert!(!engine.advance());
        assert!(engine.is_complete());
        assert_eq!(engine.status(), GameStatus::Complete);
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.round_count(), 3);

        let mut seen: Vec<&String> = engine.used_words().iter().collect();
        seen.sort();
        assert_eq!(seen, vec!["cat", "dog", "sun"]);
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        let mut engine = seeded(&["apple", "grape"], 2, 5);
        let upper = engine.current_word().to_uppercase();
        assert!(engine.submit_guess(&upper));
        assert_eq!(engine.score(), 20);
    }

    #[test]
    fn test_wrong_guess_never_changes_score() {
        let mut engine = seeded(&["apple", "grape"], 2, 9);
        let scrambled = engine.current_scrambled_word().to_string();
        for guess in ["", "   ", "nope", scrambled.as_str(), "🍎"] {
            assert!(!engine.submit_guess(guess));
        }
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
    }

    #[test]
    fn test_round_count_never_exceeds_max() {
        let mut engine = seeded(DEFAULT_TEST_WORDS, 10, 11);
        let mut successful = 0;
        while engine.advance() {
            successful += 1;
            assert_round_invariants(&engine);
        }
        assert_eq!(successful, 9);
        assert_eq!(engine.round_count(), 10);

        // Further calls stay complete and leave state alone
        assert!(!engine.advance());
        assert!(!engine.skip());
        assert_eq!(engine.round_count(), 10);
        assert!(engine.is_complete());
    }

    #[test]
    fn test_no_guessing_after_completion() {
        let mut engine = seeded(&["cat", "dog"], 1, 3);
        let word = engine.current_word().to_string();
        assert!(!engine.advance());
        assert!(!engine.submit_guess(&word));
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_words_never_repeat_within_session() {
        for seed in 0..50 {
            let mut engine = seeded(&["cat", "dog", "sun", "moon"], 4, seed);
            let mut presented = vec![engine.current_word().to_string()];
            while engine.advance() {
                presented.push(engine.current_word().to_string());
            }
            let unique: HashSet<_> = presented.iter().collect();
            assert_eq!(unique.len(), presented.len());
            assert_eq!(presented.len(), 4);
        }
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut engine = seeded(&["cat", "dog", "sun"], 3, 21);
        let word = engine.current_word().to_string();
        engine.submit_guess(&word);
        engine.advance();
        engine.advance();
        assert!(!engine.advance());

        engine.restart().unwrap();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
        assert_eq!(engine.used_words().len(), 1);
        assert!(!engine.is_complete());
        assert_round_invariants(&engine);

        // Idempotent
        engine.restart().unwrap();
        engine.restart().unwrap();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round_count(), 1);
    }

    #[test]
    fn test_pool_too_small() {
        let result = RoundEngine::new(pool(&["cat", "dog", "sun"]), settings(5));
        assert_eq!(
            result.unwrap_err(),
            GameError::PoolTooSmall {
                available: 3,
                required: 5
            }
        );
    }

    #[test]
    fn test_duplicates_do_not_count_towards_pool_size() {
        let result = RoundEngine::new(pool(&["cat", "cat", "dog"]), settings(3));
        assert!(matches!(
            result,
            Err(GameError::PoolTooSmall {
                available: 2,
                required: 3
            })
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let result = RoundEngine::new(pool(&[]), settings(1));
        assert!(matches!(result, Err(GameError::PoolTooSmall { available: 0, .. })));
    }

    #[test]
    fn test_unshuffleable_word_rejected() {
        let result = RoundEngine::new(pool(&["cat", "aaa", "dog"]), settings(2));
        assert_eq!(
            result.unwrap_err(),
            GameError::UnshuffleableWord("aaa".to_string())
        );

        let result = RoundEngine::new(pool(&["cat", "I"]), settings(1));
        assert_eq!(
            result.unwrap_err(),
            GameError::UnshuffleableWord("I".to_string())
        );
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let result = RoundEngine::new(pool(&["cat"]), settings(0));
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_snapshot_hides_answer() {
        let engine = seeded(&["cat", "dog", "sun"], 3, 8);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.max_rounds, 3);
        assert_eq!(snapshot.status, GameStatus::InRound);
        assert_eq!(snapshot.scrambled_word, engine.current_scrambled_word());
        assert_ne!(snapshot.scrambled_word, engine.current_word());
    }

    #[test]
    fn test_pool_exactly_max_rounds_uses_every_word() {
        let words = ["ab", "cd", "ef", "gh", "ij", "kl"];
        let mut engine = seeded(&words, 6, 99);
        while engine.advance() {}
        assert_eq!(engine.used_words().len(), 6);
        for word in words {
            assert!(engine.used_words().contains(word));
        }
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let generous = GameSettings {
            max_rounds: 3,
            score_increase: u32::MAX,
        };
        let words = pool(&["cat", "dog", "sun"]);
        let mut engine =
            RoundEngine::with_rng(words, generous, StdRng::seed_from_u64(4)).unwrap();

        let word = engine.current_word().to_string();
        assert!(engine.submit_guess(&word));
        assert!(engine.advance());
        let word = engine.current_word().to_string();
        assert!(engine.submit_guess(&word));
        assert_eq!(engine.score(), u32::MAX);

        // Scoring the same round twice saturates as well
        assert!(engine.submit_guess(&word));
        assert_eq!(engine.score(), u32::MAX);
    }

    #[test]
    fn test_unscramblable_word_is_an_error_not_a_reversal() {
        let mut engine = seeded(&["cat", "dog"], 2, 6);
        assert_eq!(
            engine.scramble_word("aaa"),
            Err(GameError::UnshuffleableWord("aaa".to_string()))
        );
        assert_eq!(
            engine.scramble_word("x"),
            Err(GameError::UnshuffleableWord("x".to_string()))
        );

        // Palindromes still come back as a genuine rearrangement
        for _ in 0..100 {
            let scrambled = engine.scramble_word("level").unwrap();
            assert_ne!(scrambled, "level");
            assert!(Scrambler::is_permutation("level", &scrambled));
        }
    }

    const DEFAULT_TEST_WORDS: &[&str] = &[
        "animal", "balloon", "camera", "dance", "elephant", "frame", "guitar", "honey", "igloo",
        "joke", "koala", "lemon",
    ];
}
