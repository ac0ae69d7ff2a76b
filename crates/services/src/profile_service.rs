use std::sync::Arc;

use quest_core::ValidationError;
use quest_core::model::{
    LessonHistoryEntry, ProfileUpdate, ProgressSnapshot, SessionContext, UserProfile,
};
use storage::repository::SessionRepository;

use crate::api::Api;
use crate::error::{ApiError, ProfileError};

/// How the current profile was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLoad {
    Fresh(UserProfile),
    /// Backend unreachable; cached or session-derived data.
    Cached(UserProfile),
    /// The backend rejected the token; the session was cleared.
    SessionExpired,
    LoggedOut,
}

impl ProfileLoad {
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            ProfileLoad::Fresh(profile) | ProfileLoad::Cached(profile) => Some(profile),
            ProfileLoad::SessionExpired | ProfileLoad::LoggedOut => None,
        }
    }
}

#[derive(Clone)]
pub struct ProfileService {
    api: Api,
    sessions: Arc<dyn SessionRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: Api, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { api, sessions }
    }

    /// Fetch `GET me`, degrading to cached data on non-auth failures.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the session store fails.
    pub async fn load(&self, ctx: &SessionContext) -> Result<ProfileLoad, ProfileError> {
        let Some(auth) = ctx.auth() else {
            return Ok(ProfileLoad::LoggedOut);
        };
        match self.api.get::<UserProfile>("me", Some(&auth.token)).await {
            Ok(profile) => {
                self.sessions.cache_profile(&profile).await?;
                Ok(ProfileLoad::Fresh(profile))
            }
            Err(ApiError::Unauthorized(message)) => {
                tracing::warn!(%message, "backend rejected session; logging out");
                self.sessions.clear_session().await?;
                Ok(ProfileLoad::SessionExpired)
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch failed; using cached profile");
                let cached = self.sessions.cached_profile().await?;
                Ok(ProfileLoad::Cached(cached.unwrap_or_else(|| {
                    UserProfile::fallback(auth.email.clone(), auth.role)
                })))
            }
        }
    }

    /// `PUT me` with trimmed fields, then refresh the cached profile.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn`, `Validation` for a blank email or empty update, `Api`.
    pub async fn update(
        &self,
        ctx: &SessionContext,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfileError> {
        let token = ctx.token().ok_or(ProfileError::NotLoggedIn)?;
        let update = update.validate().map_err(ValidationError::from)?;
        let _: serde_json::Value = self.api.put("me", Some(token), &update).await?;
        let profile: UserProfile = self.api.get("me", Some(token)).await?;
        self.sessions.cache_profile(&profile).await?;
        Ok(profile)
    }

    /// Level and XP numbers with display defaults applied.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn` or `SessionExpired` when no profile is available.
    pub async fn progress(&self, ctx: &SessionContext) -> Result<ProgressSnapshot, ProfileError> {
        match self.load(ctx).await? {
            ProfileLoad::Fresh(profile) | ProfileLoad::Cached(profile) => {
                Ok(ProgressSnapshot::from_profile(&profile))
            }
            ProfileLoad::SessionExpired => Err(ProfileError::SessionExpired),
            ProfileLoad::LoggedOut => Err(ProfileError::NotLoggedIn),
        }
    }

    /// # Errors
    ///
    /// `NotLoggedIn` or `Api`.
    pub async fn history(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<LessonHistoryEntry>, ProfileError> {
        let token = ctx.token().ok_or(ProfileError::NotLoggedIn)?;
        Ok(self.api.get_list("me/lessons-history", Some(token)).await?)
    }
}
