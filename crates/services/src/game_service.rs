use quest_core::games::{GameRun, GameStep};
use quest_core::model::{GameInfo, GameKind, GameTask, ProgrammingLanguage, SessionContext};

use crate::api::Api;
use crate::error::GameServiceError;

/// A game in progress together with the language its tasks are drawn from.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub run: GameRun,
    pub language: ProgrammingLanguage,
}

/// Fetches one random task per round for the mini-games.
#[derive(Clone)]
pub struct GameService {
    api: Api,
}

impl GameService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Api` on request failure.
    pub async fn catalog(&self, ctx: &SessionContext) -> Result<Vec<GameInfo>, GameServiceError> {
        Ok(self.api.get_list("games", ctx.token()).await?)
    }

    /// Start a run and load the first round's task.
    ///
    /// # Errors
    ///
    /// `Api` if the task cannot be fetched, `Game` if it is malformed.
    pub async fn start(
        &self,
        ctx: &SessionContext,
        kind: GameKind,
        language: ProgrammingLanguage,
    ) -> Result<GameSession, GameServiceError> {
        let mut run = GameRun::new(kind);
        let task = self.random_task(ctx, kind, language).await?;
        run.load_task(task)?;
        Ok(GameSession { run, language })
    }

    /// Move past a scored round, fetching the next task when another round
    /// follows. `Finished` carries the run's total XP.
    ///
    /// # Errors
    ///
    /// `Game` when the round is not scored yet or the next task is
    /// malformed, `Api` if the next task cannot be fetched.
    pub async fn advance(
        &self,
        ctx: &SessionContext,
        session: &mut GameSession,
    ) -> Result<GameStep, GameServiceError> {
        let step = session.run.advance()?;
        match step {
            GameStep::NextRound { .. } => {
                let task = self
                    .random_task(ctx, session.run.kind(), session.language)
                    .await?;
                session.run.load_task(task)?;
            }
            GameStep::Finished { total_xp } => {
                tracing::info!(game = %session.run.kind(), total_xp, "game finished");
            }
        }
        Ok(step)
    }

    async fn random_task(
        &self,
        ctx: &SessionContext,
        kind: GameKind,
        language: ProgrammingLanguage,
    ) -> Result<GameTask, GameServiceError> {
        let path = format!(
            "games/{}/tasks/random?language={}",
            kind.slug(),
            language.wire_id()
        );
        Ok(self.api.get(&path, ctx.token()).await?)
    }
}
