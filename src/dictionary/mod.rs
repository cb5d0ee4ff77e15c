mod builtin;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use crate::game::Scrambler;

pub use builtin::builtin_pool;

/// Fixed, ordered list of candidate words shared read-only by every session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Build a pool from raw entries. Entries are trimmed, blanks dropped and
    /// duplicates removed (first occurrence wins).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .filter(|word| seen.insert(word.clone()))
            .collect();

        Self { words }
    }

    /// Load a pool from a file with one word per line.
    ///
    /// Words that can never be scrambled are excluded here so sessions can start.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read word list {}", path.display()))?;

        let pool = Self::from_words(content.lines()).without_unshuffleable();
        tracing::info!("Loaded {} words into word pool", pool.len());

        Ok(pool)
    }

    /// Drop words that have no distinct arrangement, logging each one
    pub fn without_unshuffleable(self) -> Self {
        let words = self
            .words
            .into_iter()
            .filter(|word| {
                let keep = Scrambler::is_shuffleable(word);
                if !keep {
                    tracing::warn!("Excluding unshuffleable word '{}' from pool", word);
                }
                keep
            })
            .collect();

        Self { words }
    }

    /// First word in the pool that cannot be scrambled, if any
    pub fn first_unshuffleable(&self) -> Option<&str> {
        self.words
            .iter()
            .find(|word| !Scrambler::is_shuffleable(word))
            .map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of unique words in the pool
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
