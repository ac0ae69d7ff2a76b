use quest_core::ValidationError;
use quest_core::model::{
    AccessToken, Exercise, ExerciseDraft, ExerciseId, GameId, GameInfo, GameTask, GameTaskDraft,
    GameTaskId, LessonId, SessionContext, UserSummary,
};

use crate::api::Api;
use crate::error::AdminError;

/// Admin CRUD surface. The role is checked locally before any request; the
/// backend remains the authority.
#[derive(Clone)]
pub struct AdminService {
    api: Api,
}

impl AdminService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    // ─── users ─────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn users(&self, ctx: &SessionContext) -> Result<Vec<UserSummary>, AdminError> {
        let token = admin_token(ctx)?;
        Ok(self.api.get_list("users", Some(token)).await?)
    }

    // ─── exercises ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn exercises(
        &self,
        ctx: &SessionContext,
        lesson: LessonId,
    ) -> Result<Vec<Exercise>, AdminError> {
        let token = admin_token(ctx)?;
        Ok(self
            .api
            .get_list(&format!("exercises/{lesson}"), Some(token))
            .await?)
    }

    /// # Errors
    ///
    /// `NotAdmin`, `Validation` for an incomplete draft, `Api`.
    pub async fn create_exercise(
        &self,
        ctx: &SessionContext,
        draft: ExerciseDraft,
    ) -> Result<Exercise, AdminError> {
        let token = admin_token(ctx)?;
        let draft = draft.validate().map_err(ValidationError::from)?;
        Ok(self.api.post("exercises", Some(token), &draft).await?)
    }

    /// # Errors
    ///
    /// `NotAdmin`, `Validation` for an incomplete draft, `Api`.
    pub async fn update_exercise(
        &self,
        ctx: &SessionContext,
        id: ExerciseId,
        draft: ExerciseDraft,
    ) -> Result<(), AdminError> {
        let token = admin_token(ctx)?;
        let draft = draft.validate().map_err(ValidationError::from)?;
        let _: serde_json::Value = self
            .api
            .put(&format!("exercises/{id}"), Some(token), &draft)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn delete_exercise(
        &self,
        ctx: &SessionContext,
        id: ExerciseId,
    ) -> Result<(), AdminError> {
        let token = admin_token(ctx)?;
        Ok(self
            .api
            .delete(&format!("exercises/{id}"), Some(token))
            .await?)
    }

    // ─── games & tasks ─────────────────────────────────────────────────────

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn games(&self, ctx: &SessionContext) -> Result<Vec<GameInfo>, AdminError> {
        let token = admin_token(ctx)?;
        Ok(self.api.get_list("admin/games", Some(token)).await?)
    }

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn tasks(
        &self,
        ctx: &SessionContext,
        game: GameId,
    ) -> Result<Vec<GameTask>, AdminError> {
        let token = admin_token(ctx)?;
        let mut tasks: Vec<GameTask> = self
            .api
            .get_list(&format!("admin/games/{game}/tasks"), Some(token))
            .await?;
        tasks.sort_by_key(|t| (t.order, t.id));
        Ok(tasks)
    }

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn create_task(
        &self,
        ctx: &SessionContext,
        game: GameId,
        draft: &GameTaskDraft,
    ) -> Result<(), AdminError> {
        let token = admin_token(ctx)?;
        let _: serde_json::Value = self
            .api
            .post(&format!("admin/games/{game}/tasks"), Some(token), draft)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn update_task(
        &self,
        ctx: &SessionContext,
        game: GameId,
        task: GameTaskId,
        draft: &GameTaskDraft,
    ) -> Result<(), AdminError> {
        let token = admin_token(ctx)?;
        let _: serde_json::Value = self
            .api
            .put(&format!("admin/games/{game}/tasks/{task}"), Some(token), draft)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// `NotAdmin` or `Api`.
    pub async fn delete_task(
        &self,
        ctx: &SessionContext,
        game: GameId,
        task: GameTaskId,
    ) -> Result<(), AdminError> {
        let token = admin_token(ctx)?;
        Ok(self
            .api
            .delete(&format!("admin/games/{game}/tasks/{task}"), Some(token))
            .await?)
    }
}

fn admin_token(ctx: &SessionContext) -> Result<&AccessToken, AdminError> {
    match ctx.auth() {
        Some(auth) if auth.is_admin() => Ok(&auth.token),
        _ => Err(AdminError::NotAdmin),
    }
}
