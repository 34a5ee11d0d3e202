//! # vocab_battle
//!
//! Core engine for an English/Japanese vocabulary quiz game: it turns a word
//! pair and a question direction into a stable four-option multiple-choice
//! round, caching generated wrong answers durably and degrading gracefully
//! when no generation backend is reachable.
//!
//! ## How it works
//!
//! 1. Load a word pool with [`load_bundled`] (the shipped word list) or
//!    [`from_captured`] (words the user photographed and saved).
//! 2. Create a [`QuizSession`] — the pool is permuted once, then rounds walk
//!    it cyclically, each drawing a fresh direction (80% word → meaning).
//! 3. For each round, [`play_round`] asks the [`OptionResolver`] for an
//!    answer set: a cached distractor set is reused as-is; on a miss the
//!    remote oracle is asked for three plausible wrong answers (and the
//!    result cached per word *and* direction); if the oracle is missing or
//!    misbehaves, distractors are sampled from the pool instead. A playable
//!    round always comes back.
//! 4. Feed selections into [`QuizSession::submit`] — correct answers score
//!    and advance, wrong ones just shake.
//!
//! ## Key properties
//!
//! - **At most one correct answer**: the correct string is mixed in exactly
//!   once, with a uniform Fisher-Yates shuffle.
//! - **Idempotent regeneration**: a cached `(word, direction)` pair never
//!   re-invokes the oracle and always yields the same distractors.
//! - **Stale-result safety**: every round carries an epoch; answer sets
//!   arriving for a superseded round are discarded, never applied.
//!
//! ## Quick start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use vocab_battle::{
//!     load_bundled, play_round, OptionResolver, OracleClient, QuizSession, SessionMode,
//!     WordStore,
//! };
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let pool = load_bundled(
//!     r#"[
//!         {"english": "apple", "japanese": "りんご"},
//!         {"english": "dog",   "japanese": "犬"},
//!         {"english": "cat",   "japanese": "猫"},
//!         {"english": "bird",  "japanese": "鳥"}
//!     ]"#,
//! )
//! .unwrap();
//!
//! // No oracle configured: every round uses the pool-sampling fallback.
//! let resolver: OptionResolver<OracleClient> =
//!     OptionResolver::new(WordStore::open_in_memory().unwrap(), None);
//! let mut session = QuizSession::new(pool, SessionMode::FixedRounds(3), &mut rng).unwrap();
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     while let Some(prompt) = play_round(&mut session, &resolver, &mut rng).await {
//!         let answers = session.current_answers().unwrap().clone();
//!         println!("Q: {} ({})", prompt.direction.prompt(&prompt.item), prompt.direction);
//!         // Always answer correctly in this example.
//!         session.submit(&answers.correct_answer);
//!     }
//! });
//! assert_eq!(session.score(), 30);
//! ```

pub mod quiz_engine;

// Convenience re-exports so callers can use `vocab_battle::QuizSession`
// directly without reaching into `quiz_engine::`.
pub use quiz_engine::{
    candidates_from_ocr_text, from_captured, load_bundled, parse_vision_reply, play_round,
    save_candidates, AnswerOutcome, CachedOptionRecord, CaptureError, CapturedWord,
    DistractorSource, OptionResolver, OracleClient, OracleConfig, OracleError, QuestionDirection,
    QuizSession, RoundAnswerSet, RoundPrompt, SessionError, SessionMode, SessionPhase, StoreError,
    VocabError, VocabularyItem, WordCandidate, WordStore, DISTRACTORS_PER_ROUND,
    FORWARD_DIRECTION_BIAS, MAX_BUNDLED_WORDS, MEANING_SEPARATOR, POINTS_PER_CORRECT,
};
