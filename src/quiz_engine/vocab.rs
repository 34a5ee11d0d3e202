//! Vocabulary source adapter.
//!
//! Normalizes the two word-pool origins — the bundled word list shipped with
//! the app and the user's captured list — into a uniform [`VocabularyItem`]
//! sequence. Also home of the uniform shuffle used everywhere a permutation
//! is needed.

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::quiz_engine::models::{CapturedWord, VocabularyItem};

/// The bundled list is truncated to this many entries.
pub const MAX_BUNDLED_WORDS: usize = 218;

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("failed to parse bundled word list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One entry of the bundled `word.json` file.
#[derive(Debug, Deserialize)]
struct BundledEntry {
    english: String,
    japanese: String,
}

/// Load the bundled word list from its JSON source.
///
/// The list is truncated to [`MAX_BUNDLED_WORDS`] entries; meanings are split
/// into variants on the full-width comma.
pub fn load_bundled(json: &str) -> Result<Vec<VocabularyItem>, VocabError> {
    let entries: Vec<BundledEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .take(MAX_BUNDLED_WORDS)
        .map(|e| VocabularyItem::new(e.english, e.japanese))
        .collect())
}

/// Build a word pool from the persisted capture table.
pub fn from_captured(rows: Vec<CapturedWord>) -> Vec<VocabularyItem> {
    rows.into_iter()
        .map(|r| VocabularyItem::new(r.word, r.meaning))
        .collect()
}

/// Uniform in-place Fisher-Yates shuffle.
///
/// Used for the session-start pool permutation and for mixing the correct
/// answer into the distractors. (A comparator-based "sort by coin flip" is
/// not uniform, so it is not used anywhere in this crate.)
pub fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bundled_list_parses_and_splits_variants() {
        let json = r#"[
            {"english": "dog", "japanese": "犬、イヌ"},
            {"english": "apple", "japanese": "りんご"}
        ]"#;
        let pool = load_bundled(json).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].word, "dog");
        assert_eq!(pool[0].meaning_variants, vec!["犬", "イヌ"]);
        assert!(pool[0].matches_meaning("イヌ"));
        assert!(!pool[0].matches_meaning("猫"));
    }

    #[test]
    fn bundled_list_is_truncated() {
        let entries: Vec<String> = (0..MAX_BUNDLED_WORDS + 50)
            .map(|i| format!(r#"{{"english": "word{i}", "japanese": "意味{i}"}}"#))
            .collect();
        let json = format!("[{}]", entries.join(","));
        let pool = load_bundled(&json).unwrap();
        assert_eq!(pool.len(), MAX_BUNDLED_WORDS);
    }

    #[test]
    fn malformed_bundled_list_is_an_error() {
        assert!(load_bundled("not json").is_err());
    }

    #[test]
    fn shuffle_is_deterministic_with_seed_and_keeps_elements() {
        let make = |seed: u64| -> Vec<u32> {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items: Vec<u32> = (0..20).collect();
            fisher_yates(&mut items, &mut rng);
            items
        };
        assert_eq!(make(7), make(7));
        assert_ne!(make(7), make(8));

        let mut sorted = make(7);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
    }
}
