use async_trait::async_trait;
use quest_core::model::{Role, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Preference key for the UI locale.
pub const PREF_LOCALE: &str = "locale";
/// Preference key for the equipped theme.
pub const PREF_THEME: &str = "theme";

/// Persisted login: what the browser kept in local storage.
///
/// The token is kept as raw text; callers parse it and clear the session
/// when it no longer parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub role: Role,
    pub email: String,
    pub avatar: Option<String>,
}

/// Repository contract for the logged-in session and its cached profile.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Replace the stored session and drop the profile cached for the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn save_session(&self, session: &StoredSession) -> Result<(), StorageError>;

    /// Remove the session and the cached profile. Clearing twice is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn clear_session(&self) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or if the profile cannot be encoded.
    async fn cache_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or if the cached payload is corrupt.
    async fn cached_profile(&self) -> Result<Option<UserProfile>, StorageError>;
}

/// Key/value store for local preferences (locale, theme).
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get_preference(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn set_preference(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<StoredSession>>>,
    profile: Arc<Mutex<Option<UserProfile>>>,
    preferences: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError> {
        let guard = self.session.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save_session(&self, session: &StoredSession) -> Result<(), StorageError> {
        let mut guard = self.session.lock().map_err(poisoned)?;
        *guard = Some(session.clone());
        self.profile.lock().map_err(poisoned)?.take();
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        self.session.lock().map_err(poisoned)?.take();
        self.profile.lock().map_err(poisoned)?.take();
        Ok(())
    }

    async fn cache_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self.profile.lock().map_err(poisoned)?;
        *guard = Some(profile.clone());
        Ok(())
    }

    async fn cached_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        let guard = self.profile.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryRepository {
    async fn get_preference(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.preferences.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    async fn set_preference(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.preferences.lock().map_err(poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates the session and preference repositories behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let preferences: Arc<dyn PreferenceRepository> = Arc::new(repo);
        Self {
            sessions,
            preferences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            token: "a.b.c".into(),
            role: Role::Admin,
            email: "ada@example.com".into(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn clear_drops_session_and_cached_profile() {
        let repo = InMemoryRepository::new();
        repo.save_session(&session()).await.unwrap();
        repo.cache_profile(&UserProfile::fallback("ada@example.com", Role::Admin))
            .await
            .unwrap();

        assert_eq!(repo.load_session().await.unwrap(), Some(session()));
        repo.clear_session().await.unwrap();
        assert!(repo.load_session().await.unwrap().is_none());
        assert!(repo.cached_profile().await.unwrap().is_none());
        repo.clear_session().await.unwrap();
    }

    #[tokio::test]
    async fn saving_a_new_session_drops_cached_profile() {
        let repo = InMemoryRepository::new();
        repo.save_session(&session()).await.unwrap();
        repo.cache_profile(&UserProfile::fallback("ada@example.com", Role::Admin))
            .await
            .unwrap();
        repo.save_session(&session()).await.unwrap();
        assert!(repo.cached_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn preferences_overwrite() {
        let storage = Storage::in_memory();
        assert!(storage.preferences.get_preference(PREF_LOCALE).await.unwrap().is_none());
        storage.preferences.set_preference(PREF_LOCALE, "pl").await.unwrap();
        storage.preferences.set_preference(PREF_LOCALE, "en").await.unwrap();
        assert_eq!(
            storage.preferences.get_preference(PREF_LOCALE).await.unwrap().as_deref(),
            Some("en")
        );
    }
}
