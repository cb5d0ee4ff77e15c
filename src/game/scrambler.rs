use rand::{seq::SliceRandom, Rng};

/// Upper bound on reshuffles before falling back to a rotation
pub const MAX_SHUFFLE_ATTEMPTS: usize = 64;

pub struct Scrambler;

impl Scrambler {
    /// A word can be scrambled only if it has at least two distinct characters.
    pub fn is_shuffleable(word: &str) -> bool {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => chars.any(|c| c != first),
            None => false,
        }
    }

    /// Produce a random permutation of `word` that differs from it (case-sensitive).
    ///
    /// Returns `None` for words that have no distinct arrangement.
    pub fn scramble(word: &str, rng: &mut impl Rng) -> Option<String> {
        if !Self::is_shuffleable(word) {
            return None;
        }

        let mut letters: Vec<char> = word.chars().collect();
        for _ in 0..MAX_SHUFFLE_ATTEMPTS {
            letters.shuffle(rng);
            let candidate: String = letters.iter().collect();
            if candidate != word {
                return Some(candidate);
            }
        }

        // Rotating by one only reproduces the word when every character is equal
        tracing::debug!("Shuffle attempts exhausted, rotating word instead");
        let mut letters: Vec<char> = word.chars().collect();
        letters.rotate_left(1);
        Some(letters.into_iter().collect())
    }

    /// Check that `scrambled` uses exactly the characters of `word`
    pub fn is_permutation(word: &str, scrambled: &str) -> bool {
        let mut a: Vec<char> = word.chars().collect();
        let mut b: Vec<char> = scrambled.chars().collect();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}
