//! Option resolution engine.
//!
//! For each round this orchestrates: cache lookup → oracle call on a miss →
//! random-pool fallback when the oracle fails → uniform shuffle of the final
//! answer set. It is the one place the cache-consistency and
//! at-most-one-correct-answer guarantees live.
//!
//! Resolution never fails: a playable answer set always comes back, with
//! quality degrading (random pool distractors) rather than an error
//! surfacing. Oracle failures are expected conditions; storage failures are
//! logged and treated as a cache miss.

use chrono::Utc;
use rand::Rng;

use crate::quiz_engine::models::{
    QuestionDirection, RoundAnswerSet, VocabularyItem, DISTRACTORS_PER_ROUND,
};
use crate::quiz_engine::oracle::{DistractorSource, OracleClient, OracleError};
use crate::quiz_engine::store::WordStore;
use crate::quiz_engine::vocab::fisher_yates;

pub struct OptionResolver<O = OracleClient> {
    store: WordStore,
    oracle: Option<O>,
}

impl<O: DistractorSource> OptionResolver<O> {
    /// `oracle: None` runs permanently in fallback mode (no credential
    /// configured); the engine behaves identically to an oracle that always
    /// reports itself unavailable.
    pub fn new(store: WordStore, oracle: Option<O>) -> Self {
        OptionResolver { store, oracle }
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn oracle(&self) -> Option<&O> {
        self.oracle.as_ref()
    }

    /// Produce the answer set for one round.
    ///
    /// 1. Cache hit for `(word, direction)` → use it, skip the oracle.
    /// 2. Cache miss → ask the oracle; on success upsert the result before
    ///    returning.
    /// 3. Any oracle failure → sample distractors from `pool` (excluding the
    ///    current word) without replacement, projected through `direction`.
    /// 4. Shuffle distractors ∪ {correct answer} with a uniform permutation.
    ///
    /// With fewer than four usable pool items the answer set degrades to
    /// however many options are available, correct answer included.
    pub async fn resolve<R: Rng>(
        &self,
        item: &VocabularyItem,
        direction: QuestionDirection,
        pool: &[VocabularyItem],
        rng: &mut R,
    ) -> RoundAnswerSet {
        let correct_answer = direction.answer(item).to_string();

        let mut distractors = self.cached_distractors(&item.word, direction);

        if distractors.is_none() {
            distractors = self.generated_distractors(item, direction).await;
        }

        let mut options = distractors
            .unwrap_or_else(|| fallback_distractors(item, direction, pool, rng));
        options.push(correct_answer.clone());
        fisher_yates(&mut options, rng);

        RoundAnswerSet { correct_answer, options }
    }

    fn cached_distractors(
        &self,
        word: &str,
        direction: QuestionDirection,
    ) -> Option<Vec<String>> {
        match self.store.cached_options(word) {
            Ok(record) => record
                .as_ref()
                .and_then(|r| r.options_for(direction))
                .map(|opts| opts.to_vec()),
            Err(err) => {
                // Treat a broken cache like a miss so the round still plays.
                log::warn!("cache lookup failed for {word:?}: {err}");
                None
            }
        }
    }

    async fn generated_distractors(
        &self,
        item: &VocabularyItem,
        direction: QuestionDirection,
    ) -> Option<Vec<String>> {
        let oracle = self.oracle.as_ref()?;
        match oracle.generate(&item.word, &item.meaning, direction).await {
            Ok(options) => {
                debug_assert_eq!(options.len(), DISTRACTORS_PER_ROUND);
                let now = Utc::now().timestamp_millis();
                if let Err(err) = self.store.upsert_options(&item.word, direction, &options, now) {
                    log::warn!("failed to cache options for {:?}: {err}", item.word);
                }
                Some(options)
            }
            Err(OracleError::Unavailable { reason }) => {
                log::debug!("oracle unavailable for {:?}, using pool fallback: {reason}", item.word);
                None
            }
            Err(err @ OracleError::MalformedResponse { .. }) => {
                log::warn!("discarding oracle result for {:?}: {err}", item.word);
                None
            }
        }
    }
}

/// Sample up to three distractors from the pool, excluding the current word,
/// without replacement, projected through the question direction.
fn fallback_distractors<R: Rng>(
    item: &VocabularyItem,
    direction: QuestionDirection,
    pool: &[VocabularyItem],
    rng: &mut R,
) -> Vec<String> {
    let mut others: Vec<&VocabularyItem> =
        pool.iter().filter(|w| w.word != item.word).collect();
    fisher_yates(&mut others, rng);
    others
        .into_iter()
        .take(DISTRACTORS_PER_ROUND)
        .map(|w| direction.answer(w).to_string())
        .collect()
}
