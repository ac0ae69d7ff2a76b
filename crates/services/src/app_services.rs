use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::admin_service::AdminService;
use crate::api::{Api, ApiClient, HttpApiClient};
use crate::auth_service::AuthService;
use crate::config::ClientConfig;
use crate::course_service::CourseService;
use crate::daily_challenge_service::DailyChallengeService;
use crate::error::AppServicesError;
use crate::game_service::GameService;
use crate::leaderboard_service::LeaderboardService;
use crate::lessons::LessonLoopService;
use crate::profile_service::ProfileService;
use crate::shop_service::ShopService;

/// Assembles app-facing services over one API client and one local store.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    auth: Arc<AuthService>,
    profile: Arc<ProfileService>,
    courses: Arc<CourseService>,
    lesson_loop: Arc<LessonLoopService>,
    games: Arc<GameService>,
    daily: Arc<DailyChallengeService>,
    shop: Arc<ShopService>,
    leaderboard: Arc<LeaderboardService>,
    admin: Arc<AdminService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(config: &ClientConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        let client: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(config));
        Ok(Self::with_parts(storage, client, clock))
    }

    /// Wire services over any storage and transport.
    #[must_use]
    pub fn with_parts(storage: Storage, client: Arc<dyn ApiClient>, clock: Clock) -> Self {
        let api = Api::new(client);
        Self {
            auth: Arc::new(AuthService::new(
                clock,
                api.clone(),
                Arc::clone(&storage.sessions),
            )),
            profile: Arc::new(ProfileService::new(
                api.clone(),
                Arc::clone(&storage.sessions),
            )),
            courses: Arc::new(CourseService::new(api.clone())),
            lesson_loop: Arc::new(LessonLoopService::new(api.clone())),
            games: Arc::new(GameService::new(api.clone())),
            daily: Arc::new(DailyChallengeService::new(api.clone())),
            shop: Arc::new(ShopService::new(
                api.clone(),
                Arc::clone(&storage.preferences),
            )),
            leaderboard: Arc::new(LeaderboardService::new(api.clone())),
            admin: Arc::new(AdminService::new(api)),
            storage,
        }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn lesson_loop(&self) -> Arc<LessonLoopService> {
        Arc::clone(&self.lesson_loop)
    }

    #[must_use]
    pub fn games(&self) -> Arc<GameService> {
        Arc::clone(&self.games)
    }

    #[must_use]
    pub fn daily(&self) -> Arc<DailyChallengeService> {
        Arc::clone(&self.daily)
    }

    #[must_use]
    pub fn shop(&self) -> Arc<ShopService> {
        Arc::clone(&self.shop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}
