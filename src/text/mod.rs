//! Token-frequency extraction for text sonification.
//!
//! Text becomes a numeric sequence in three steps: tokenize on whitespace
//! and strip punctuation with case normalization, prune tokens found in an
//! exclusion set, then count occurrences per distinct token. The resulting
//! counts, ordered by each token's first occurrence, feed the same pipeline
//! as any float sequence — text sonification has no separate code path
//! beyond extraction.

mod stopwords;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

pub use stopwords::{stopword_set, STOPWORDS};

/// Distinct token → occurrence count, in first-occurrence order.
///
/// First-occurrence order is what makes the output audible as a sequence:
/// the melody follows the order words enter the text, not an arbitrary hash
/// order.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    /// Occurrence counts as a numeric sequence, one entry per distinct token.
    pub fn counts(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, n)| *n as f64).collect()
    }

    /// Total number of counted (post-pruning) tokens.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits text on whitespace and normalizes each word: punctuation stripped,
/// lowercased. Words that normalize to nothing (pure punctuation) are
/// dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(normalize)
        .filter(|token| !token.is_empty())
        .collect()
}

fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tokenizes `input`, prunes tokens present in `exclusions`, and counts the
/// rest. Pruning long texts with [`STOPWORDS`] helps discriminate between
/// texts of different subject matter, since pronouns and prepositions appear
/// often regardless of context.
pub fn frequency_table(input: &str, exclusions: &HashSet<String>) -> FrequencyTable {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for token in tokenize(input) {
        if exclusions.contains(&token) {
            continue;
        }
        match counts.entry(token) {
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(1);
            }
            Entry::Occupied(mut slot) => *slot.get_mut() += 1,
        }
    }

    let entries = order
        .into_iter()
        .map(|token| {
            let count = counts[&token];
            (token, count)
        })
        .collect();
    FrequencyTable { entries }
}
