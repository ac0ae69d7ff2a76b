use async_trait::async_trait;
use chrono::Utc;
use quest_core::model::{Role, UserProfile};
use sqlx::Row;

use crate::repository::{SessionRepository, StorageError, StoredSession};

use super::SqliteRepository;

fn conn_err(err: sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

fn ser_err(err: impl std::fmt::Display) -> StorageError {
    StorageError::Serialization(err.to_string())
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<Option<StoredSession>, StorageError> {
        let row = sqlx::query("SELECT token, role, email, avatar FROM auth_session WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row.try_get("token").map_err(ser_err)?;
        let role: String = row.try_get("role").map_err(ser_err)?;
        let email: String = row.try_get("email").map_err(ser_err)?;
        let avatar: Option<String> = row.try_get("avatar").map_err(ser_err)?;

        Ok(Some(StoredSession {
            token,
            role: Role::from_wire(&role),
            email,
            avatar,
        }))
    }

    async fn save_session(&self, session: &StoredSession) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn_err)?;
        sqlx::query(
            r"
            INSERT INTO auth_session (id, token, role, email, avatar, saved_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                role = excluded.role,
                email = excluded.email,
                avatar = excluded.avatar,
                saved_at = excluded.saved_at
            ",
        )
        .bind(&session.token)
        .bind(session.role.as_str())
        .bind(&session.email)
        .bind(session.avatar.as_deref())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn_err)?;
        // the cached profile belongs to the previous login
        sqlx::query("DELETE FROM profile_cache")
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        tx.commit().await.map_err(conn_err)
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn_err)?;
        sqlx::query("DELETE FROM auth_session")
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        sqlx::query("DELETE FROM profile_cache")
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        tx.commit().await.map_err(conn_err)
    }

    async fn cache_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let payload = serde_json::to_string(profile).map_err(ser_err)?;
        sqlx::query(
            r"
            INSERT INTO profile_cache (id, payload, cached_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                cached_at = excluded.cached_at
            ",
        )
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn_err)?;
        Ok(())
    }

    async fn cached_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query("SELECT payload FROM profile_cache WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser_err)?;
        serde_json::from_str(&payload).map(Some).map_err(ser_err)
    }
}
