//! Per-attempt quiz state machine.
//!
//! Each question is played in two phases: the player picks an option
//! ([`QuizPhase::AwaitingAnswer`]), then sees which option was right
//! ([`QuizPhase::ShowingResult`]) before moving on. After the last question the
//! session sits in [`QuizPhase::Finished`] until the player acknowledges it.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::quiz::{PresentedQuestion, Score, present};
use crate::Question;

/// Semantic inputs understood by a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    /// Highlight the previous option.
    MoveUp,
    /// Highlight the next option.
    MoveDown,
    /// Submit the highlighted option, advance, or acknowledge the result.
    Confirm,
    /// Leave the quiz.
    Quit,
}

/// Where a session is within the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for the player to submit an option.
    AwaitingAnswer,
    /// Showing feedback for the submitted option.
    ShowingResult {
        /// Presented index the player submitted.
        submitted: usize,
    },
    /// Every question has been answered.
    Finished,
}

/// What the caller should do after an input was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    /// Keep showing the quiz.
    Continue,
    /// The quiz finished normally; the score is ready to persist.
    Completed(Score),
    /// The player quit mid-quiz; nothing is recorded.
    Aborted,
    /// The player left a quiz that had no questions.
    Exited,
}

/// One player's in-progress attempt.
///
/// Invariants: `position <= questions.len()` and
/// `correct <= answered() <= questions.len()`, where `answered()` counts the
/// question currently shown in [`QuizPhase::ShowingResult`].
#[derive(Debug, Clone, Getters)]
pub struct QuizSession {
    player: String,
    category: String,
    questions: Vec<PresentedQuestion>,
    position: usize,
    cursor: usize,
    correct: usize,
    phase: QuizPhase,
    #[getter(skip)]
    completed_at: Option<NaiveDateTime>,
}

impl QuizSession {
    /// Starts a session over `questions`, shuffling each one's options with `rng`.
    #[instrument(skip(questions, rng), fields(count = questions.len()))]
    pub fn new<R: Rng + ?Sized>(
        player: String,
        category: String,
        questions: &[Question],
        rng: &mut R,
    ) -> Self {
        let presented = questions.iter().map(|q| present(q, rng)).collect();
        Self::from_presented(player, category, presented)
    }

    /// Starts a session over already-presented questions.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn from_presented(
        player: String,
        category: String,
        questions: Vec<PresentedQuestion>,
    ) -> Self {
        info!(player = %player, category = %category, "Quiz session started");
        Self {
            player,
            category,
            questions,
            position: 0,
            cursor: 0,
            correct: 0,
            phase: QuizPhase::AwaitingAnswer,
            completed_at: None,
        }
    }

    /// Returns true when the session has no questions to ask.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the number of questions in the session.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns the question at the current position, if any.
    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        self.questions.get(self.position)
    }

    /// Number of questions answered so far, including one awaiting acknowledgement.
    pub fn answered(&self) -> usize {
        match self.phase {
            QuizPhase::ShowingResult { .. } => self.position + 1,
            _ => self.position,
        }
    }

    /// Builds the final score once the session is finished.
    #[instrument(skip(self))]
    pub fn score(&self) -> Option<Score> {
        let completed_at = self.completed_at?;
        Some(Score::new(
            self.player.clone(),
            self.category.clone(),
            i32::try_from(self.correct).unwrap_or(i32::MAX),
            i32::try_from(self.questions.len()).unwrap_or(i32::MAX),
            completed_at,
        ))
    }

    /// Applies one input and reports what the caller should do next.
    #[instrument(skip(self), fields(phase = ?self.phase, position = self.position))]
    pub fn handle(&mut self, input: QuizInput) -> QuizStep {
        if self.is_empty() {
            return match input {
                QuizInput::Confirm | QuizInput::Quit => QuizStep::Exited,
                QuizInput::MoveUp | QuizInput::MoveDown => QuizStep::Continue,
            };
        }

        match (self.phase, input) {
            (QuizPhase::AwaitingAnswer, QuizInput::MoveUp) => {
                self.cursor = self.cursor.saturating_sub(1);
                QuizStep::Continue
            }
            (QuizPhase::AwaitingAnswer, QuizInput::MoveDown) => {
                let last = self
                    .current_question()
                    .map(|q| q.option_count().saturating_sub(1))
                    .unwrap_or(0);
                self.cursor = (self.cursor + 1).min(last);
                QuizStep::Continue
            }
            (QuizPhase::AwaitingAnswer, QuizInput::Confirm) => {
                self.submit();
                QuizStep::Continue
            }
            (QuizPhase::ShowingResult { .. }, QuizInput::Confirm) => {
                self.advance();
                QuizStep::Continue
            }
            (QuizPhase::ShowingResult { .. }, QuizInput::MoveUp | QuizInput::MoveDown) => {
                QuizStep::Continue
            }
            (QuizPhase::AwaitingAnswer | QuizPhase::ShowingResult { .. }, QuizInput::Quit) => {
                info!(
                    player = %self.player,
                    position = self.position,
                    "Quiz aborted, discarding partial result"
                );
                QuizStep::Aborted
            }
            (QuizPhase::Finished, QuizInput::Confirm | QuizInput::Quit) => match self.score() {
                Some(score) => QuizStep::Completed(score),
                None => QuizStep::Continue,
            },
            (QuizPhase::Finished, QuizInput::MoveUp | QuizInput::MoveDown) => QuizStep::Continue,
        }
    }

    /// Records the highlighted option as the answer to the current question.
    #[instrument(skip(self))]
    fn submit(&mut self) {
        let submitted = self.cursor;
        let is_correct = self
            .current_question()
            .is_some_and(|q| q.is_correct(submitted));
        if is_correct {
            self.correct += 1;
        }
        debug!(submitted, is_correct, correct = self.correct, "Answer submitted");
        self.phase = QuizPhase::ShowingResult { submitted };
    }

    /// Moves past the result screen to the next question or to the end.
    #[instrument(skip(self))]
    fn advance(&mut self) {
        self.position += 1;
        if self.position >= self.questions.len() {
            self.position = self.questions.len();
            self.phase = QuizPhase::Finished;
            self.completed_at = Some(Utc::now().naive_utc());
            info!(
                player = %self.player,
                correct = self.correct,
                total = self.questions.len(),
                "Quiz finished"
            );
        } else {
            self.cursor = 0;
            self.phase = QuizPhase::AwaitingAnswer;
            debug!(position = self.position, "Next question");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank() -> Vec<Question> {
        crate::QuestionBank::defaults().questions().to_vec()
    }

    fn session() -> QuizSession {
        let mut rng = StdRng::seed_from_u64(7);
        QuizSession::new("amy".into(), "all".into(), &bank(), &mut rng)
    }

    fn assert_invariants(s: &QuizSession) {
        assert!(*s.correct() <= s.answered());
        assert!(s.answered() <= s.question_count());
        assert!(*s.position() <= s.question_count());
    }

    /// Moves the cursor onto `target` from the top.
    fn select(s: &mut QuizSession, target: usize) {
        for _ in 0..8 {
            s.handle(QuizInput::MoveUp);
        }
        for _ in 0..target {
            s.handle(QuizInput::MoveDown);
        }
        assert_eq!(*s.cursor(), target);
    }

    #[test]
    fn cursor_is_clamped_without_wraparound() {
        let mut s = session();
        s.handle(QuizInput::MoveUp);
        assert_eq!(*s.cursor(), 0);
        for _ in 0..10 {
            s.handle(QuizInput::MoveDown);
        }
        assert_eq!(*s.cursor(), 3);
    }

    #[test]
    fn correct_submission_increments_by_one() {
        let mut s = session();
        let idx = s.current_question().and_then(|q| *q.correct_index()).expect("correct");
        select(&mut s, idx);
        assert_eq!(s.handle(QuizInput::Confirm), QuizStep::Continue);
        assert_eq!(*s.correct(), 1);
        assert_eq!(*s.phase(), QuizPhase::ShowingResult { submitted: idx });
        assert_invariants(&s);
    }

    #[test]
    fn wrong_submission_leaves_count_unchanged() {
        let mut s = session();
        let idx = s.current_question().and_then(|q| *q.correct_index()).expect("correct");
        select(&mut s, (idx + 1) % 4);
        s.handle(QuizInput::Confirm);
        assert_eq!(*s.correct(), 0);
        assert_invariants(&s);
    }

    #[test]
    fn result_confirm_advances_and_resets_cursor() {
        let mut s = session();
        select(&mut s, 2);
        s.handle(QuizInput::Confirm);
        s.handle(QuizInput::Confirm);
        assert_eq!(*s.position(), 1);
        assert_eq!(*s.cursor(), 0);
        assert_eq!(*s.phase(), QuizPhase::AwaitingAnswer);
    }

    #[test]
    fn full_run_completes_with_one_score() {
        let mut s = session();
        let total = s.question_count();
        let mut expected = 0;
        for i in 0..total {
            let idx = s.current_question().and_then(|q| *q.correct_index()).expect("correct");
            let pick = if i % 2 == 0 { idx } else { (idx + 1) % 4 };
            if pick == idx {
                expected += 1;
            }
            select(&mut s, pick);
            assert_eq!(s.handle(QuizInput::Confirm), QuizStep::Continue);
            assert_invariants(&s);
            assert_eq!(s.handle(QuizInput::Confirm), QuizStep::Continue);
            assert_invariants(&s);
        }
        assert_eq!(*s.phase(), QuizPhase::Finished);

        match s.handle(QuizInput::Confirm) {
            QuizStep::Completed(score) => {
                assert_eq!(*score.total(), total as i32);
                assert_eq!(*score.correct(), expected);
                assert_eq!(score.player(), "amy");
                assert_eq!(score.category(), "all");
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn quit_on_finished_also_completes() {
        let mut s = session();
        for _ in 0..s.question_count() {
            s.handle(QuizInput::Confirm);
            s.handle(QuizInput::Confirm);
        }
        assert!(matches!(s.handle(QuizInput::Quit), QuizStep::Completed(_)));
    }

    #[test]
    fn quit_while_answering_or_reviewing_aborts() {
        let mut s = session();
        assert_eq!(s.handle(QuizInput::Quit), QuizStep::Aborted);

        let mut s = session();
        s.handle(QuizInput::Confirm);
        assert_eq!(s.handle(QuizInput::Quit), QuizStep::Aborted);
        assert_eq!(s.score(), None);
    }

    #[test]
    fn empty_session_only_exits() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = QuizSession::new("amy".into(), "Web".into(), &[], &mut rng);
        assert!(s.is_empty());
        assert!(s.current_question().is_none());
        assert_eq!(s.handle(QuizInput::MoveDown), QuizStep::Continue);
        assert_eq!(s.handle(QuizInput::Confirm), QuizStep::Exited);
        assert_eq!(s.handle(QuizInput::Quit), QuizStep::Exited);
        assert_eq!(s.score(), None);
    }
}
