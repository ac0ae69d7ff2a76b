//! Shared error types for the services crate.

use thiserror::Error;

use quest_core::ValidationError;
use quest_core::daily::DailyError;
use quest_core::engine::EngineError;
use quest_core::games::GameError;
use quest_core::model::{PathError, TokenError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failure of one backend request, classified for the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response from its status and body text.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        let lowered = message.to_lowercase();
        if lowered.contains("not enough coins") || lowered.contains("not enough xp") {
            return Self::InsufficientFunds(message);
        }
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Status { status, message },
        }
    }
}

/// `{"error": ...}` or `{"message": ...}`, else the trimmed body.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        return ["error", "message", "msg"]
            .iter()
            .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
            .map(str::to_owned);
    }
    Some(body.to_owned())
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base URL {raw}: {source}")]
    InvalidApiUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("API base URL must be http or https: {0}")]
    UnsupportedScheme(String),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("backend returned an unusable token: {0}")]
    Token(#[from] TokenError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("session expired, log in again")]
    SessionExpired,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the lesson loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `DailyChallengeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DailyChallengeError {
    #[error("log in to play the daily challenge")]
    NotLoggedIn,
    #[error("answer every daily task before finishing")]
    Unfinished,
    #[error(transparent)]
    Daily(#[from] DailyError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ShopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShopError {
    #[error("log in to use the shop")]
    NotLoggedIn,
    #[error("item {0} is not in the shop")]
    UnknownItem(quest_core::model::ShopItemId),
    #[error("item {0} is not owned")]
    NotOwned(quest_core::model::ShopItemId),
    #[error("item {0} cannot be equipped that way")]
    WrongItemType(quest_core::model::ShopItemId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("admin access required")]
    NotAdmin,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
