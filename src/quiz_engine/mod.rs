//! Core quiz engine — option resolution, caching, and session control.
//!
//! ## Module overview
//!
//! | Module     | Purpose |
//! |------------|---------|
//! | `models`   | All shared types: vocabulary items, directions, answer sets, cache records |
//! | `vocab`    | Word-pool loading (bundled list / captured list) and the uniform shuffle |
//! | `store`    | Embedded SQLite store: captured words + per-word distractor cache |
//! | `oracle`   | Remote distractor generation: prompts, wire types, response parsing |
//! | `resolver` | The resolution algorithm: cache → oracle → pool fallback → shuffle |
//! | `session`  | Round sequencing, scoring, direction bias, epoch-based stale discard |
//! | `capture`  | Extraction output contracts and captured-word persistence |

pub mod capture;
pub mod models;
pub mod oracle;
pub mod resolver;
pub mod session;
pub mod store;
pub mod vocab;

// Re-export the public API surface so callers can use
// `quiz_engine::QuizSession` without reaching into sub-modules.
pub use capture::{candidates_from_ocr_text, parse_vision_reply, save_candidates, CaptureError};
pub use models::{
    CachedOptionRecord, CapturedWord, QuestionDirection, RoundAnswerSet, VocabularyItem,
    WordCandidate, DISTRACTORS_PER_ROUND, MEANING_SEPARATOR,
};
pub use oracle::{DistractorSource, OracleClient, OracleConfig, OracleError};
pub use resolver::OptionResolver;
pub use session::{
    play_round, AnswerOutcome, QuizSession, RoundPrompt, SessionError, SessionMode, SessionPhase,
    FORWARD_DIRECTION_BIAS, POINTS_PER_CORRECT,
};
pub use store::{StoreError, WordStore};
pub use vocab::{from_captured, load_bundled, VocabError, MAX_BUNDLED_WORDS};
