use quest_core::daily::{DailyChallenge, DailyFeedback, DailyRun, DailyStatus};
use quest_core::model::SessionContext;

use crate::api::Api;
use crate::error::DailyChallengeError;

#[derive(Clone)]
pub struct DailyChallengeService {
    api: Api,
}

impl DailyChallengeService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// `NotLoggedIn` without a session, `Api` on request failure.
    pub async fn load(&self, ctx: &SessionContext) -> Result<DailyStatus, DailyChallengeError> {
        let token = ctx.token().ok_or(DailyChallengeError::NotLoggedIn)?;
        let challenge: DailyChallenge = self.api.get("daily-challenge", Some(token)).await?;
        Ok(challenge.into_status())
    }

    /// Grade the current task; a correct answer is credited with the backend.
    /// A failed credit is logged and does not undo the local score.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn`, or `Daily` when the run refuses the answer.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        run: &mut DailyRun,
        answer: &str,
    ) -> Result<DailyFeedback, DailyChallengeError> {
        let token = ctx.token().ok_or(DailyChallengeError::NotLoggedIn)?;
        let feedback = run.submit(answer)?;
        if feedback.correct {
            if let Err(err) = self
                .api
                .post_empty("daily-challenge/complete-task", Some(token))
                .await
            {
                tracing::warn!(error = %err, "daily task credit failed");
            }
        }
        Ok(feedback)
    }

    /// Mark today's challenge as done and return the XP earned.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn`, `Unfinished` while tasks remain, or `Api` when the
    /// backend rejects the finish call.
    pub async fn finish(
        &self,
        ctx: &SessionContext,
        run: &DailyRun,
    ) -> Result<u32, DailyChallengeError> {
        let token = ctx.token().ok_or(DailyChallengeError::NotLoggedIn)?;
        if !run.is_finished() {
            return Err(DailyChallengeError::Unfinished);
        }
        self.api
            .post_empty("daily-challenge/finish", Some(token))
            .await?;
        Ok(run.score())
    }
}
