use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Question primitives
// ---------------------------------------------------------------------------

/// Which way a round asks the question.
///
/// `WordToMeaning` shows the English word and asks for the Japanese meaning;
/// `MeaningToWord` is the reverse. The two directions cache their distractor
/// sets independently because they are semantically different result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionDirection {
    WordToMeaning,
    MeaningToWord,
}

impl fmt::Display for QuestionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionDirection::WordToMeaning => write!(f, "word → meaning"),
            QuestionDirection::MeaningToWord => write!(f, "meaning → word"),
        }
    }
}

impl QuestionDirection {
    /// The text shown as the question for this direction.
    pub fn prompt<'a>(self, item: &'a VocabularyItem) -> &'a str {
        match self {
            QuestionDirection::WordToMeaning => &item.word,
            QuestionDirection::MeaningToWord => &item.meaning,
        }
    }

    /// The text that counts as the correct answer for this direction.
    ///
    /// This is also the projection used when sampling fallback distractors
    /// from the word pool.
    pub fn answer<'a>(self, item: &'a VocabularyItem) -> &'a str {
        match self {
            QuestionDirection::WordToMeaning => &item.meaning,
            QuestionDirection::MeaningToWord => &item.word,
        }
    }
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// List separator inside a meaning string ("犬、イヌ" → ["犬", "イヌ"]).
pub const MEANING_SEPARATOR: char = '、';

/// One word pair in the quiz pool. Immutable once loaded for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    pub meaning: String,
    /// The meaning split on `、` and trimmed, used for exact-match
    /// validation in free-text modes.
    pub meaning_variants: Vec<String>,
}

impl VocabularyItem {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        let word = word.into();
        let meaning = meaning.into();
        let meaning_variants = meaning
            .split(MEANING_SEPARATOR)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        VocabularyItem { word, meaning, meaning_variants }
    }

    /// Exact match against any meaning variant (free-text answer check).
    pub fn matches_meaning(&self, input: &str) -> bool {
        let input = input.trim();
        self.meaning_variants.iter().any(|m| m == input)
    }
}

// ---------------------------------------------------------------------------
// Cached distractors
// ---------------------------------------------------------------------------

/// Durable per-word cache entry, keyed 1:1 by `word`.
///
/// Each direction's distractor set is cached independently; generating one
/// direction never erases the other. Records are merged on update and never
/// deleted by the quiz path — see [`crate::quiz_engine::store::WordStore::prune_options_older_than`]
/// for the explicit maintenance hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedOptionRecord {
    pub word: String,
    /// Distractors for "see word, choose meaning".
    pub forward_options: Option<Vec<String>>,
    /// Distractors for "see meaning, choose word".
    pub reverse_options: Option<Vec<String>>,
    /// Epoch milliseconds of the last upsert.
    pub updated_at: i64,
}

impl CachedOptionRecord {
    /// The cached set for `direction`, if present and non-empty.
    pub fn options_for(&self, direction: QuestionDirection) -> Option<&[String]> {
        let cached = match direction {
            QuestionDirection::WordToMeaning => self.forward_options.as_deref(),
            QuestionDirection::MeaningToWord => self.reverse_options.as_deref(),
        };
        cached.filter(|opts| !opts.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Round output
// ---------------------------------------------------------------------------

/// Number of wrong answers accompanying the correct one in a full round.
pub const DISTRACTORS_PER_ROUND: usize = 3;

/// The answer set produced for one round, ready for display.
///
/// `correct_answer` is always contained in `options`; `options` is a uniform
/// random permutation of the distractors plus the correct answer. Note that a
/// distractor is *not* deduplicated against the correct answer — if the pool
/// legitimately contains a colliding meaning it may appear twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAnswerSet {
    pub correct_answer: String,
    pub options: Vec<String>,
}

impl RoundAnswerSet {
    pub fn is_correct(&self, selection: &str) -> bool {
        selection == self.correct_answer
    }
}

// ---------------------------------------------------------------------------
// Captured vocabulary
// ---------------------------------------------------------------------------

/// A user-captured word pair persisted in the append-only capture table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedWord {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    /// Epoch milliseconds of the capture.
    pub created_at: i64,
}

/// A raw `(word, meaning)` candidate produced by the extraction pipeline,
/// before the user has confirmed it. The meaning may still be empty (OCR
/// extracts words only; the user fills meanings in by hand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCandidate {
    pub word: String,
    pub meaning: String,
}
