use std::sync::Arc;

use quest_core::Clock;
use quest_core::model::{AccessToken, AuthSession, Role, SessionContext};
use serde::{Deserialize, Serialize};
use storage::repository::{SessionRepository, StoredSession};

use crate::api::Api;
use crate::error::AuthError;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_code: Option<&'a str>,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    role: Role,
}

/// Login lifecycle: obtain, persist, restore and drop the session.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    api: Api,
    sessions: Arc<dyn SessionRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, api: Api, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            clock,
            api,
            sessions,
        }
    }

    /// Create an account. A matching `secret_code` makes the backend grant admin.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` for blank input, `Api` when the backend refuses.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        secret_code: Option<&str>,
    ) -> Result<Role, AuthError> {
        let (email, password) = credentials(email, password)?;
        let body = Credentials {
            email,
            password,
            secret_code: secret_code.map(str::trim).filter(|c| !c.is_empty()),
        };
        let response: RegisterResponse = self.api.post("register", None, &body).await?;
        tracing::info!(email, role = %response.role, "registered");
        Ok(response.role)
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// `MissingCredentials`, `Api` (e.g. wrong password), `Token` when the
    /// returned token cannot be read, or `Storage`.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext, AuthError> {
        let (email, password) = credentials(email, password)?;
        let body = Credentials {
            email,
            password,
            secret_code: None,
        };
        let response: LoginResponse = self.api.post("login", None, &body).await?;
        let token = AccessToken::parse(response.access_token)?;
        let role = response
            .role
            .or(token.claims().role)
            .unwrap_or_default();

        self.sessions
            .save_session(&StoredSession {
                token: token.as_str().to_owned(),
                role,
                email: email.to_owned(),
                avatar: None,
            })
            .await?;
        tracing::info!(email, %role, "logged in");

        Ok(SessionContext::authenticated(AuthSession {
            token,
            role,
            email: email.to_owned(),
        }))
    }

    /// Load the persisted session. Unreadable or expired tokens are cleared
    /// and the result is anonymous.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` on storage failure.
    pub async fn restore(&self) -> Result<SessionContext, AuthError> {
        let Some(stored) = self.sessions.load_session().await? else {
            return Ok(SessionContext::anonymous());
        };
        let token = match AccessToken::parse(stored.token) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "clearing unreadable persisted token");
                self.sessions.clear_session().await?;
                return Ok(SessionContext::anonymous());
            }
        };
        if token.is_expired(self.clock.unix_seconds()) {
            tracing::warn!(email = %stored.email, "clearing expired persisted token");
            self.sessions.clear_session().await?;
            return Ok(SessionContext::anonymous());
        }
        Ok(SessionContext::authenticated(AuthSession {
            token,
            role: stored.role,
            email: stored.email,
        }))
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` on storage failure.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear_session().await?;
        Ok(())
    }
}

fn credentials<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok((email, password))
}
