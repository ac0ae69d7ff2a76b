//! Daily challenge: a short list of tasks, each answered once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answer::normalize_collapsed;
use crate::model::ExerciseOption;

/// XP credited per correctly answered daily task.
pub const DAILY_TASK_XP: u32 = 50;

/// Payload of `GET /daily-challenge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tasks: Vec<DailyTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    #[serde(rename = "type", default)]
    pub task_type: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<ExerciseOption>>,
    /// Code shown above a `code` task's input.
    #[serde(default)]
    pub context: Option<String>,
    pub answer: String,
}

impl DailyTask {
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.task_type == "multiple_choice"
    }

    /// Whitespace runs collapse; comparison is case-insensitive.
    #[must_use]
    pub fn accepts(&self, given: &str) -> bool {
        normalize_collapsed(given) == normalize_collapsed(&self.answer)
    }
}

#[derive(Debug)]
pub enum DailyStatus {
    AlreadyCompleted,
    Empty,
    Ready(DailyRun),
}

impl DailyChallenge {
    #[must_use]
    pub fn into_status(self) -> DailyStatus {
        if self.completed {
            DailyStatus::AlreadyCompleted
        } else if self.tasks.is_empty() {
            DailyStatus::Empty
        } else {
            DailyStatus::Ready(DailyRun::new(self.tasks))
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DailyError {
    #[error("previous answer is still awaiting next")]
    AwaitingNext,
    #[error("no answered task to move past")]
    NotAwaiting,
    #[error("all daily tasks are done")]
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFeedback {
    pub correct: bool,
    pub xp_awarded: u32,
    pub expected: String,
}

/// Progress through today's tasks.
#[derive(Debug, Clone)]
pub struct DailyRun {
    tasks: Vec<DailyTask>,
    index: usize,
    score: u32,
    awaiting_next: bool,
}

impl DailyRun {
    #[must_use]
    pub fn new(tasks: Vec<DailyTask>) -> Self {
        Self {
            tasks,
            index: 0,
            score: 0,
            awaiting_next: false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&DailyTask> {
        self.tasks.get(self.index)
    }

    /// 0-based position and total count.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index.min(self.tasks.len()), self.tasks.len())
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_awaiting_next(&self) -> bool {
        self.awaiting_next
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.tasks.len()
    }

    /// # Errors
    ///
    /// `Finished` after the last task, `AwaitingNext` while the previous
    /// answer has not been moved past.
    pub fn submit(&mut self, answer: &str) -> Result<DailyFeedback, DailyError> {
        if self.awaiting_next {
            return Err(DailyError::AwaitingNext);
        }
        let task = self.current().ok_or(DailyError::Finished)?;
        let correct = task.accepts(answer);
        let expected = task.answer.clone();
        let xp_awarded = if correct { DAILY_TASK_XP } else { 0 };
        self.score = self.score.saturating_add(xp_awarded);
        self.awaiting_next = true;
        Ok(DailyFeedback {
            correct,
            xp_awarded,
            expected,
        })
    }

    /// Move to the next task; returns `None` once every task is answered.
    ///
    /// # Errors
    ///
    /// `NotAwaiting` when the current task has not been answered.
    pub fn next(&mut self) -> Result<Option<&DailyTask>, DailyError> {
        if !self.awaiting_next {
            return Err(DailyError::NotAwaiting);
        }
        self.awaiting_next = false;
        self.index += 1;
        Ok(self.current())
    }
}
