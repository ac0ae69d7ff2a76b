#![forbid(unsafe_code)]

pub mod admin_service;
pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod config;
pub mod course_service;
pub mod daily_challenge_service;
pub mod error;
pub mod game_service;
pub mod leaderboard_service;
pub mod lessons;
pub mod profile_service;
pub mod shop_service;

pub use quest_core::Clock;

pub use admin_service::AdminService;
pub use api::{Api, ApiClient, HttpApiClient, HttpMethod};
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use config::ClientConfig;
pub use course_service::CourseService;
pub use daily_challenge_service::DailyChallengeService;
pub use error::{
    AdminError, ApiError, AppServicesError, AuthError, ConfigError, CourseError,
    DailyChallengeError, GameServiceError, LessonError, ProfileError, ShopError,
};
pub use game_service::{GameService, GameSession};
pub use leaderboard_service::{DEFAULT_LEADERBOARD_LIMIT, Leaderboard, LeaderboardService};
pub use lessons::{Completion, LessonLoopService, SubmitOutcome};
pub use profile_service::{ProfileLoad, ProfileService};
pub use shop_service::{PurchaseOutcome, ShopCatalog, ShopService};
