pub struct GuessValidator;

impl GuessValidator {
    /// Check a player's guess against the answer, ignoring case.
    ///
    /// Anything that is not the answer (including empty input) is simply wrong.
    pub fn is_correct(candidate: &str, answer: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        candidate == answer || candidate.to_lowercase() == answer.to_lowercase()
    }
}
