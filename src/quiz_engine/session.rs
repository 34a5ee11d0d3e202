//! Quiz round controller.
//!
//! A session walks `AwaitingNext → Loading → InRound` per round and ends in
//! `Finished`. The controller owns the shuffled pool, the score, the round
//! index, and the epoch counter used to discard stale asynchronous
//! resolution results.
//!
//! ## Epochs
//!
//! Resolution is asynchronous (cache read, oracle network call), so a result
//! can arrive after its round has been superseded. Each `begin_round`
//! increments the session epoch and stamps it on the returned
//! [`RoundPrompt`]; [`QuizSession::apply_answer_set`] silently drops any
//! result carrying an older epoch. In-flight calls are not aborted — their
//! results are simply ignored on arrival.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz_engine::models::{QuestionDirection, RoundAnswerSet, VocabularyItem};
use crate::quiz_engine::oracle::DistractorSource;
use crate::quiz_engine::resolver::OptionResolver;
use crate::quiz_engine::vocab::fisher_yates;

/// Score awarded per correct answer.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Probability of a round asking word → meaning. The bias toward the
/// pedagogically primary direction is deliberate.
pub const FORWARD_DIRECTION_BIAS: f64 = 0.8;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no words available for this source")]
    EmptyWordPool,
}

/// How a session decides it is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Ends after this many correct answers.
    FixedRounds(usize),
    /// Ends when the countdown reaches zero; wrong answers cost time.
    Timed { time_limit_ms: u64, miss_penalty_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Between rounds; `begin_round` starts the next one.
    AwaitingNext,
    /// An answer set is being resolved; input is ignored.
    Loading,
    /// Options are on screen, waiting for a selection.
    InRound,
    Finished,
}

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct { awarded: u32 },
    /// Transient signal (the UI shakes); the round does not advance.
    Incorrect,
}

/// Everything the presentation layer needs to start resolving a round.
#[derive(Debug, Clone)]
pub struct RoundPrompt {
    pub epoch: u64,
    pub item: VocabularyItem,
    pub direction: QuestionDirection,
}

pub struct QuizSession {
    pool: Vec<VocabularyItem>,
    mode: SessionMode,
    phase: SessionPhase,
    score: u32,
    round_index: usize,
    epoch: u64,
    remaining_ms: Option<u64>,
    current: Option<(QuestionDirection, RoundAnswerSet)>,
}

impl QuizSession {
    /// Start a session over `pool`, permuting it once up front.
    ///
    /// An empty pool is terminal: the caller shows a "no words available"
    /// state instead of starting.
    pub fn new<R: Rng>(
        mut pool: Vec<VocabularyItem>,
        mode: SessionMode,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::EmptyWordPool);
        }
        fisher_yates(&mut pool, rng);
        let remaining_ms = match mode {
            SessionMode::Timed { time_limit_ms, .. } => Some(time_limit_ms),
            SessionMode::FixedRounds(_) => None,
        };
        Ok(QuizSession {
            pool,
            mode,
            phase: SessionPhase::AwaitingNext,
            score: 0,
            round_index: 0,
            epoch: 0,
            remaining_ms,
            current: None,
        })
    }

    /// Weighted direction draw: 80% word → meaning, 20% meaning → word.
    pub fn pick_direction<R: Rng>(rng: &mut R) -> QuestionDirection {
        if rng.gen::<f64>() < FORWARD_DIRECTION_BIAS {
            QuestionDirection::WordToMeaning
        } else {
            QuestionDirection::MeaningToWord
        }
    }

    /// Enter the next round: pick a direction, select the current word by
    /// modulo index, bump the epoch, and move to `Loading`.
    ///
    /// Calling this while a previous round is still resolving supersedes it —
    /// the old epoch's result will be discarded on arrival. Returns `None`
    /// once the session is finished.
    pub fn begin_round<R: Rng>(&mut self, rng: &mut R) -> Option<RoundPrompt> {
        if self.phase == SessionPhase::Finished {
            return None;
        }
        self.epoch += 1;
        self.current = None;
        self.phase = SessionPhase::Loading;

        let item = self.pool[self.round_index % self.pool.len()].clone();
        let direction = Self::pick_direction(rng);
        Some(RoundPrompt { epoch: self.epoch, item, direction })
    }

    /// Deliver a resolved answer set for the round started at `epoch`.
    ///
    /// Returns `true` if it was applied. A set for any epoch other than the
    /// current one is stale and dropped without side effects.
    pub fn apply_answer_set(
        &mut self,
        epoch: u64,
        direction: QuestionDirection,
        answers: RoundAnswerSet,
    ) -> bool {
        if epoch != self.epoch || self.phase != SessionPhase::Loading {
            log::debug!("discarding stale answer set for epoch {epoch} (current {})", self.epoch);
            return false;
        }
        self.current = Some((direction, answers));
        self.phase = SessionPhase::InRound;
        true
    }

    /// Feed a user selection into the session.
    ///
    /// Returns `None` outside `InRound` (input during `Loading` is ignored,
    /// matching the UI's disabled state).
    pub fn submit(&mut self, selection: &str) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::InRound {
            return None;
        }
        let (_, answers) = self.current.as_ref()?;

        if answers.is_correct(selection) {
            self.score += POINTS_PER_CORRECT;
            self.round_index += 1;
            self.current = None;
            self.phase = SessionPhase::AwaitingNext;
            if let SessionMode::FixedRounds(count) = self.mode {
                if self.round_index >= count {
                    self.phase = SessionPhase::Finished;
                }
            }
            Some(AnswerOutcome::Correct { awarded: POINTS_PER_CORRECT })
        } else {
            if let SessionMode::Timed { miss_penalty_ms, .. } = self.mode {
                self.deduct_time(miss_penalty_ms);
            }
            Some(AnswerOutcome::Incorrect)
        }
    }

    /// Advance the countdown in timed mode. No effect in fixed-round mode.
    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        self.deduct_time(elapsed_ms);
    }

    fn deduct_time(&mut self, ms: u64) {
        if self.phase == SessionPhase::Finished {
            return;
        }
        if let Some(remaining) = self.remaining_ms.as_mut() {
            *remaining = remaining.saturating_sub(ms);
            if *remaining == 0 {
                self.current = None;
                self.phase = SessionPhase::Finished;
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rounds answered correctly so far.
    pub fn rounds_completed(&self) -> usize {
        self.round_index
    }

    pub fn pool(&self) -> &[VocabularyItem] {
        &self.pool
    }

    /// The answer set currently on screen, if any.
    pub fn current_answers(&self) -> Option<&RoundAnswerSet> {
        self.current.as_ref().map(|(_, answers)| answers)
    }

    pub fn current_direction(&self) -> Option<QuestionDirection> {
        self.current.as_ref().map(|(direction, _)| *direction)
    }

    /// Countdown remaining in timed mode.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.remaining_ms
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }
}

/// Drive one full round: begin it, resolve the answer set, and apply it.
///
/// This is the intended wiring between controller and resolver; hosts that
/// need to interleave UI work run the same three calls themselves.
pub async fn play_round<O: DistractorSource, R: Rng>(
    session: &mut QuizSession,
    resolver: &OptionResolver<O>,
    rng: &mut R,
) -> Option<RoundPrompt> {
    let prompt = session.begin_round(rng)?;
    let answers = resolver
        .resolve(&prompt.item, prompt.direction, session.pool(), rng)
        .await;
    session.apply_answer_set(prompt.epoch, prompt.direction, answers);
    Some(prompt)
}
