use quest_core::engine::{AnswerFeedback, LessonEngine, LessonPhase};
use quest_core::model::{CompletionReward, Exercise, Lesson, SessionContext};
use serde::Serialize;

use crate::api::Api;
use crate::error::{ApiError, LessonError};

#[derive(Serialize)]
struct CompletionRequest {
    lives_remaining: u8,
}

/// What the backend said about a finished lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Rewarded(CompletionReward),
    /// The report failed; the lesson still counts as completed locally.
    Unreported(ApiError),
}

/// Result of answering one question in the lesson loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub feedback: AnswerFeedback,
    /// Present only on the submission that completed the lesson.
    pub completion: Option<Completion>,
}

/// Orchestrates a lesson's practice loop and its completion report.
#[derive(Clone)]
pub struct LessonLoopService {
    api: Api,
    seed: Option<u64>,
}

impl LessonLoopService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api, seed: None }
    }

    /// Shuffle deterministically.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fetch the lesson's exercises and build its engine.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::Api` if the exercises cannot be fetched.
    pub async fn start(
        &self,
        ctx: &SessionContext,
        lesson: &Lesson,
    ) -> Result<LessonEngine, LessonError> {
        let pool: Vec<Exercise> = self
            .api
            .get_list(&format!("exercises/{}", lesson.id), ctx.token())
            .await?;
        tracing::debug!(lesson_id = %lesson.id, exercises = pool.len(), "lesson started");
        let lecture = lesson.lecture().map(str::to_owned);
        Ok(match self.seed {
            Some(seed) => LessonEngine::with_seed(lesson.id, lecture, pool, seed),
            None => LessonEngine::new(lesson.id, lecture, pool),
        })
    }

    /// Grade an answer; on the transition to `Completed` report the result.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::Engine` when the engine refuses the submission.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        engine: &mut LessonEngine,
        answer: &str,
    ) -> Result<SubmitOutcome, LessonError> {
        let feedback = engine.submit(answer)?;
        let completion = if feedback.phase == LessonPhase::Completed {
            Some(match self.report(ctx, engine).await {
                Ok(reward) => Completion::Rewarded(reward),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        lesson_id = %engine.lesson_id(),
                        "lesson completion could not be reported"
                    );
                    Completion::Unreported(err)
                }
            })
        } else {
            None
        };
        Ok(SubmitOutcome {
            feedback,
            completion,
        })
    }

    async fn report(
        &self,
        ctx: &SessionContext,
        engine: &LessonEngine,
    ) -> Result<CompletionReward, ApiError> {
        let body = CompletionRequest {
            lives_remaining: engine.lives(),
        };
        let reward: Option<CompletionReward> = self
            .api
            .post(
                &format!("lessons/{}/complete", engine.lesson_id()),
                ctx.token(),
                &body,
            )
            .await?;
        Ok(reward.unwrap_or_default())
    }
}
