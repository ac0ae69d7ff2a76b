use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Unknown role names degrade to `User`.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::from_wire).unwrap_or_default())
    }
}

//
// ─── ACCESS TOKEN ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token does not have three segments")]
    Shape,
    #[error("token payload is not valid base64")]
    Encoding,
    #[error("token payload is not a JSON object")]
    Payload,
}

/// Claims the client reads from the token payload. The signature is never
/// checked client-side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenClaims {
    pub user_id: Option<UserId>,
    pub role: Option<Role>,
    pub expires_at: Option<i64>,
}

/// Bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    raw: String,
    claims: TokenClaims,
}

impl AccessToken {
    /// Parse a JWT-shaped token and decode its payload claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is blank, is not three dot-separated
    /// segments, or its payload cannot be decoded as a JSON object.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TokenError> {
        let raw = raw.into().trim().to_owned();
        if raw.is_empty() {
            return Err(TokenError::Empty);
        }
        let segments: Vec<&str> = raw.split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(TokenError::Shape);
        };
        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|_| TokenError::Encoding)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|_| TokenError::Payload)?;
        let object = value.as_object().ok_or(TokenError::Payload)?;

        let user_id = object
            .get("user_id")
            .or_else(|| object.get("sub"))
            .and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .map(UserId::new);
        let role = object
            .get("role")
            .and_then(serde_json::Value::as_str)
            .map(Role::from_wire);
        let expires_at = object.get("exp").and_then(serde_json::Value::as_i64);

        Ok(Self {
            raw,
            claims: TokenClaims {
                user_id,
                role,
                expires_at,
            },
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.claims.user_id
    }

    /// A token without an `exp` claim never expires client-side.
    #[must_use]
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.claims.expires_at.is_some_and(|exp| exp < now_unix)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

//
// ─── SESSION CONTEXT ───────────────────────────────────────────────────────────
//

/// A logged-in user's credentials, passed explicitly to anything that needs auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: AccessToken,
    pub role: Role,
    pub email: String,
}

impl AuthSession {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.token.user_id()
    }
}

/// Explicit session object replacing globally read browser storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    auth: Option<AuthSession>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { auth: None }
    }

    #[must_use]
    pub fn authenticated(auth: AuthSession) -> Self {
        Self { auth: Some(auth) }
    }

    #[must_use]
    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&AccessToken> {
        self.auth.as_ref().map(|a| &a.token)
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.auth.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.auth.as_ref().is_some_and(AuthSession::is_admin)
    }
}

/// Builds an unsigned JWT-shaped token for tests.
#[must_use]
pub fn test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
