//! Lesson practice loop: lecture, then a quiz that ends in completion or game over.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{Exercise, ExerciseId, LessonId};

pub const MAX_LIVES: u8 = 3;
pub const TARGET_CORRECT: u8 = 5;

/// How long a front end keeps answer feedback on screen before calling `next`.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonPhase {
    Lecture,
    Quiz,
    Completed,
    GameOver,
}

impl LessonPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, LessonPhase::Completed | LessonPhase::GameOver)
    }
}

impl fmt::Display for LessonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LessonPhase::Lecture => "lecture",
            LessonPhase::Quiz => "quiz",
            LessonPhase::Completed => "completed",
            LessonPhase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("lesson has no exercises")]
    NoExercises,
    #[error("quiz can only start from the lecture (currently {0})")]
    NotInLecture(LessonPhase),
    #[error("no quiz in progress (currently {0})")]
    NotInQuiz(LessonPhase),
    #[error("previous answer is still awaiting next")]
    AwaitingNext,
    #[error("no answered exercise to move past")]
    NotAwaiting,
}

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub exercise_id: ExerciseId,
    pub correct: bool,
    pub expected: String,
    pub phase: LessonPhase,
}

/// State machine for one lesson's practice loop.
///
/// A submission sets the awaiting-next guard; every further submission is
/// rejected until `next` clears it. Terminal phases never clear.
#[derive(Debug)]
pub struct LessonEngine {
    lesson_id: LessonId,
    lecture: Option<String>,
    pool: Vec<Exercise>,
    queue: VecDeque<Exercise>,
    current: Option<Exercise>,
    last_answered: Option<ExerciseId>,
    phase: LessonPhase,
    lives: u8,
    correct_count: u8,
    awaiting_next: bool,
    feedback: Option<AnswerFeedback>,
    rng: StdRng,
}

impl LessonEngine {
    #[must_use]
    pub fn new(lesson_id: LessonId, lecture: Option<String>, pool: Vec<Exercise>) -> Self {
        Self::with_rng(lesson_id, lecture, pool, StdRng::from_os_rng())
    }

    /// Deterministic shuffling, for tests and replays.
    #[must_use]
    pub fn with_seed(
        lesson_id: LessonId,
        lecture: Option<String>,
        pool: Vec<Exercise>,
        seed: u64,
    ) -> Self {
        Self::with_rng(lesson_id, lecture, pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        lesson_id: LessonId,
        lecture: Option<String>,
        pool: Vec<Exercise>,
        rng: StdRng,
    ) -> Self {
        let lecture = lecture
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        let mut engine = Self {
            lesson_id,
            lecture,
            pool,
            queue: VecDeque::new(),
            current: None,
            last_answered: None,
            phase: LessonPhase::Lecture,
            lives: MAX_LIVES,
            correct_count: 0,
            awaiting_next: false,
            feedback: None,
            rng,
        };
        if engine.lecture.is_none() && !engine.pool.is_empty() {
            engine.begin_quiz();
        }
        engine
    }

    // ─── accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn lecture(&self) -> Option<&str> {
        self.lecture.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> LessonPhase {
        self.phase
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn correct_count(&self) -> u8 {
        self.correct_count
    }

    #[must_use]
    pub fn current(&self) -> Option<&Exercise> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_awaiting_next(&self) -> bool {
        self.awaiting_next
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    // ─── transitions ───────────────────────────────────────────────────────

    /// Leave the lecture and show the first question.
    ///
    /// # Errors
    ///
    /// `NoExercises` when the pool is empty (the engine stays in `Lecture`),
    /// `NotInLecture` when the quiz already started or ended.
    pub fn start_quiz(&mut self) -> Result<(), EngineError> {
        if self.phase != LessonPhase::Lecture {
            return Err(EngineError::NotInLecture(self.phase));
        }
        if self.pool.is_empty() {
            return Err(EngineError::NoExercises);
        }
        self.begin_quiz();
        Ok(())
    }

    /// Grade `answer` against the current exercise.
    ///
    /// # Errors
    ///
    /// `NotInQuiz` outside the quiz, `AwaitingNext` while the previous
    /// submission has not been moved past.
    pub fn submit(&mut self, answer: &str) -> Result<AnswerFeedback, EngineError> {
        if self.phase != LessonPhase::Quiz {
            return Err(EngineError::NotInQuiz(self.phase));
        }
        if self.awaiting_next {
            return Err(EngineError::AwaitingNext);
        }
        let Some(exercise) = self.current.as_ref() else {
            return Err(EngineError::NoExercises);
        };

        let correct = exercise.accepts(answer);
        let exercise_id = exercise.id;
        let expected = exercise.answer.clone();

        if correct {
            self.correct_count = self.correct_count.saturating_add(1).min(TARGET_CORRECT);
            if self.correct_count >= TARGET_CORRECT {
                self.phase = LessonPhase::Completed;
            }
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.phase = LessonPhase::GameOver;
            }
        }

        self.last_answered = Some(exercise_id);
        if self.phase.is_terminal() {
            self.current = None;
            self.queue.clear();
        } else {
            self.awaiting_next = true;
        }

        let feedback = AnswerFeedback {
            exercise_id,
            correct,
            expected,
            phase: self.phase,
        };
        self.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Clear the guard and move to the next exercise.
    ///
    /// # Errors
    ///
    /// `NotInQuiz` outside the quiz, `NotAwaiting` when nothing was answered.
    pub fn next(&mut self) -> Result<&Exercise, EngineError> {
        if self.phase != LessonPhase::Quiz {
            return Err(EngineError::NotInQuiz(self.phase));
        }
        if !self.awaiting_next {
            return Err(EngineError::NotAwaiting);
        }
        self.awaiting_next = false;
        self.feedback = None;
        self.advance();
        self.current.as_ref().ok_or(EngineError::NoExercises)
    }

    // ─── internals ─────────────────────────────────────────────────────────

    fn begin_quiz(&mut self) {
        self.phase = LessonPhase::Quiz;
        self.lives = MAX_LIVES;
        self.correct_count = 0;
        self.awaiting_next = false;
        self.feedback = None;
        self.queue.clear();
        self.advance();
    }

    fn advance(&mut self) {
        if self.queue.is_empty() {
            self.refill();
        }
        self.current = self.queue.pop_front();
    }

    fn refill(&mut self) {
        let mut fresh = self.pool.clone();
        fresh.shuffle(&mut self.rng);
        if fresh.len() > 1 && Some(fresh[0].id) == self.last_answered {
            let swap_with = fresh
                .iter()
                .position(|exercise| Some(exercise.id) != self.last_answered);
            if let Some(index) = swap_with {
                fresh.swap(0, index);
            }
        }
        self.queue = fresh.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExerciseOption;

    fn pool(n: u64) -> Vec<Exercise> {
        (1..=n)
            .map(|i| Exercise::free_text(ExerciseId::new(i), format!("Q{i}"), format!("a{i}")))
            .collect()
    }

    fn engine(n: u64, seed: u64) -> LessonEngine {
        LessonEngine::with_seed(LessonId::new(1), None, pool(n), seed)
    }

    fn right(engine: &LessonEngine) -> String {
        engine.current().unwrap().answer.clone()
    }

    fn answer_and_next(engine: &mut LessonEngine, correct: bool) -> AnswerFeedback {
        let answer = if correct { right(engine) } else { "nope".to_owned() };
        let feedback = engine.submit(&answer).unwrap();
        if !engine.is_terminal() {
            engine.next().unwrap();
        }
        feedback
    }

    #[test]
    fn starts_in_lecture_when_content_present() {
        let engine =
            LessonEngine::with_seed(LessonId::new(1), Some("# Loops".into()), pool(3), 7);
        assert_eq!(engine.phase(), LessonPhase::Lecture);
        assert!(engine.current().is_none());
        assert_eq!(engine.lecture(), Some("# Loops"));
    }

    #[test]
    fn blank_lecture_auto_starts_quiz() {
        let engine = LessonEngine::with_seed(LessonId::new(1), Some("   ".into()), pool(3), 7);
        assert_eq!(engine.phase(), LessonPhase::Quiz);
        assert!(engine.current().is_some());
        assert_eq!(engine.lives(), MAX_LIVES);
    }

    #[test]
    fn empty_pool_never_leaves_lecture() {
        let mut engine = LessonEngine::with_seed(LessonId::new(1), None, Vec::new(), 7);
        assert_eq!(engine.phase(), LessonPhase::Lecture);
        assert_eq!(engine.start_quiz(), Err(EngineError::NoExercises));
        assert_eq!(engine.phase(), LessonPhase::Lecture);
        assert_eq!(
            engine.submit("x"),
            Err(EngineError::NotInQuiz(LessonPhase::Lecture))
        );
    }

    #[test]
    fn start_quiz_from_lecture() {
        let mut engine =
            LessonEngine::with_seed(LessonId::new(1), Some("intro".into()), pool(2), 7);
        engine.start_quiz().unwrap();
        assert_eq!(engine.phase(), LessonPhase::Quiz);
        assert_eq!(
            engine.start_quiz(),
            Err(EngineError::NotInLecture(LessonPhase::Quiz))
        );
    }

    #[test]
    fn correct_answer_never_costs_a_life() {
        for seed in 0..20 {
            let mut engine = engine(4, seed);
            let answer = format!("  {}  ", right(&engine).to_uppercase());
            let feedback = engine.submit(&answer).unwrap();
            assert!(feedback.correct);
            assert_eq!(engine.correct_count(), 1);
            assert_eq!(engine.lives(), MAX_LIVES);
        }
    }

    #[test]
    fn wrong_answer_costs_exactly_one_life() {
        let mut engine = engine(4, 3);
        answer_and_next(&mut engine, true);
        let feedback = answer_and_next(&mut engine, false);
        assert!(!feedback.correct);
        assert_eq!(engine.lives(), MAX_LIVES - 1);
        assert_eq!(engine.correct_count(), 1);
    }

    #[test]
    fn five_correct_in_a_row_completes_with_full_lives() {
        let mut engine = engine(6, 11);
        for _ in 0..TARGET_CORRECT {
            answer_and_next(&mut engine, true);
        }
        assert_eq!(engine.phase(), LessonPhase::Completed);
        assert_eq!(engine.lives(), 3);
        assert!(engine.current().is_none());
        assert!(!engine.is_awaiting_next());
        assert_eq!(engine.next().unwrap_err(), EngineError::NotInQuiz(LessonPhase::Completed));
    }

    #[test]
    fn three_wrong_answers_end_the_game() {
        let mut engine = engine(6, 5);
        for _ in 0..MAX_LIVES {
            answer_and_next(&mut engine, false);
        }
        assert_eq!(engine.phase(), LessonPhase::GameOver);
        assert_eq!(engine.lives(), 0);
        assert_eq!(engine.correct_count(), 0);
        assert_eq!(
            engine.submit("x"),
            Err(EngineError::NotInQuiz(LessonPhase::GameOver))
        );
    }

    #[test]
    fn mixed_run_ends_in_game_over_with_queue_left() {
        let mut engine = engine(10, 9);
        answer_and_next(&mut engine, true);
        answer_and_next(&mut engine, false);
        answer_and_next(&mut engine, true);
        answer_and_next(&mut engine, false);
        let last = answer_and_next(&mut engine, false);
        assert_eq!(last.phase, LessonPhase::GameOver);
        assert_eq!(engine.correct_count(), 2);
    }

    #[test]
    fn double_submit_is_rejected_until_next() {
        let mut engine = engine(3, 1);
        let answer = right(&engine);
        engine.submit(&answer).unwrap();
        assert!(engine.is_awaiting_next());
        assert_eq!(engine.submit(&answer), Err(EngineError::AwaitingNext));
        assert_eq!(engine.correct_count(), 1);
        engine.next().unwrap();
        assert!(!engine.is_awaiting_next());
        assert_eq!(engine.next().unwrap_err(), EngineError::NotAwaiting);
    }

    #[test]
    fn refill_never_repeats_just_answered_exercise() {
        for seed in 0..50 {
            let mut engine = engine(3, seed);
            let mut previous = engine.current().unwrap().id;
            // alternate so the run survives several refills
            for round in 0..8 {
                answer_and_next(&mut engine, round % 2 == 0);
                if engine.is_terminal() {
                    break;
                }
                let now = engine.current().unwrap().id;
                assert_ne!(now, previous, "seed {seed} repeated {now}");
                previous = now;
            }
        }
    }

    #[test]
    fn single_exercise_pool_repeats() {
        let mut engine = engine(1, 2);
        let first = engine.current().unwrap().id;
        answer_and_next(&mut engine, true);
        assert_eq!(engine.current().unwrap().id, first);
    }

    #[test]
    fn option_text_is_a_mismatch_for_multiple_choice() {
        let exercise = Exercise::multiple_choice(
            ExerciseId::new(1),
            "Which keyword defines a function in Python?",
            vec![ExerciseOption::new("a", "func"), ExerciseOption::new("b", "def")],
            "b",
        );
        let mut engine = LessonEngine::with_seed(LessonId::new(1), None, vec![exercise], 0);
        let feedback = engine.submit("DEF").unwrap();
        assert!(!feedback.correct);
        assert_eq!(engine.lives(), MAX_LIVES - 1);
        assert_eq!(engine.correct_count(), 0);
        engine.next().unwrap();
        assert!(engine.submit("B").unwrap().correct);
    }
}
