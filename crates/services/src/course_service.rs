use std::collections::HashSet;

use quest_core::model::{
    CoursePath, Exercise, Language, LanguageId, Lesson, LessonHistoryEntry, LessonId, Module,
    ModuleId, PathError, SessionContext,
};

use crate::api::Api;
use crate::error::CourseError;

/// Read-only course catalog: languages, modules, lessons and exercises.
#[derive(Clone)]
pub struct CourseService {
    api: Api,
}

impl CourseService {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `CourseError::Api` on request failure.
    pub async fn languages(&self, ctx: &SessionContext) -> Result<Vec<Language>, CourseError> {
        Ok(self.api.get_list("languages", ctx.token()).await?)
    }

    /// # Errors
    ///
    /// Returns `CourseError::Api` on request failure.
    pub async fn modules(
        &self,
        ctx: &SessionContext,
        language: LanguageId,
    ) -> Result<Vec<Module>, CourseError> {
        let mut modules: Vec<Module> = self
            .api
            .get_list(&format!("modules/{language}"), ctx.token())
            .await?;
        modules.sort_by_key(|m| (m.order, m.id));
        Ok(modules)
    }

    /// # Errors
    ///
    /// Returns `CourseError::Api` on request failure.
    pub async fn lessons(
        &self,
        ctx: &SessionContext,
        module: ModuleId,
    ) -> Result<Vec<Lesson>, CourseError> {
        let mut lessons: Vec<Lesson> = self
            .api
            .get_list(&format!("lessons/{module}"), ctx.token())
            .await?;
        lessons.sort_by_key(|l| (l.order, l.id));
        Ok(lessons)
    }

    /// # Errors
    ///
    /// Returns `CourseError::Api` on request failure.
    pub async fn exercises(
        &self,
        ctx: &SessionContext,
        lesson: LessonId,
    ) -> Result<Vec<Exercise>, CourseError> {
        Ok(self
            .api
            .get_list(&format!("exercises/{lesson}"), ctx.token())
            .await?)
    }

    /// Lesson path of a module, unlocked by the user's completion history.
    /// Without a session (or when history cannot be fetched) only the first
    /// lesson is open.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::Api` if the lessons cannot be fetched.
    pub async fn course_path(
        &self,
        ctx: &SessionContext,
        module: ModuleId,
    ) -> Result<(CoursePath, Vec<Lesson>), CourseError> {
        let lessons = self.lessons(ctx, module).await?;
        let completed = self.completed_lessons(ctx).await;
        Ok((CoursePath::build(&lessons, &completed), lessons))
    }

    /// Open a lesson from a module's path; locked lessons are refused.
    ///
    /// # Errors
    ///
    /// `CourseError::Path` for unknown or locked lessons, `Api` on failure.
    pub async fn open_lesson(
        &self,
        ctx: &SessionContext,
        module: ModuleId,
        lesson: LessonId,
    ) -> Result<Lesson, CourseError> {
        let (path, lessons) = self.course_path(ctx, module).await?;
        path.select(lesson)?;
        lessons
            .into_iter()
            .find(|l| l.id == lesson)
            .ok_or(CourseError::Path(PathError::UnknownLesson(lesson)))
    }

    async fn completed_lessons(&self, ctx: &SessionContext) -> HashSet<LessonId> {
        let Some(token) = ctx.token() else {
            return HashSet::new();
        };
        match self
            .api
            .get_list::<LessonHistoryEntry>("me/lessons-history", Some(token))
            .await
        {
            Ok(history) => history.into_iter().map(|entry| entry.lesson_id).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "lesson history unavailable; path starts locked");
                HashSet::new()
            }
        }
    }
}
