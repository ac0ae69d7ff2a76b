use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::auth::Role;
use crate::model::ids::{LessonId, UserId};

/// Current-user profile as returned by `GET /me`.
///
/// Only `email` is guaranteed; everything computed by the backend is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub xp: Option<u64>,
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub level_title: Option<String>,
    #[serde(default)]
    pub next_level_title: Option<String>,
    #[serde(default)]
    pub xp_to_next_level: Option<u64>,
    #[serde(default)]
    pub progress_percentage: Option<f64>,
    #[serde(default)]
    pub streak: Option<u32>,
}

impl UserProfile {
    /// Minimal profile rebuilt from the persisted session when the backend is unreachable.
    #[must_use]
    pub fn fallback(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            xp: Some(0),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Level/progress numbers for display, with the defaults the progress page uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub xp: u64,
    pub level: u32,
    pub level_title: String,
    pub next_level_title: String,
    pub xp_to_next_level: u64,
    pub progress_percentage: f64,
    pub streak: u32,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            xp: profile.xp.unwrap_or(0),
            level: profile.level.unwrap_or(1),
            level_title: profile
                .level_title
                .clone()
                .unwrap_or_else(|| "Beginner".to_owned()),
            next_level_title: profile
                .next_level_title
                .clone()
                .unwrap_or_else(|| "Next Level".to_owned()),
            xp_to_next_level: profile.xp_to_next_level.unwrap_or(100),
            progress_percentage: profile.progress_percentage.unwrap_or(0.0).clamp(0.0, 100.0),
            streak: profile.streak.unwrap_or(0),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileUpdateError {
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("nothing to update")]
    NoChanges,
}

/// Body of `PUT /me`. Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn avatar(url: impl Into<String>) -> Self {
        Self {
            avatar: Some(url.into()),
            ..Self::default()
        }
    }

    /// Trim every field and reject blank emails or empty updates.
    ///
    /// # Errors
    ///
    /// Returns `ProfileUpdateError` when the email is blank or no field is set.
    pub fn validate(self) -> Result<Self, ProfileUpdateError> {
        let username = self.username.map(|u| u.trim().to_owned());
        let email = match self.email {
            Some(email) if email.trim().is_empty() => return Err(ProfileUpdateError::EmptyEmail),
            Some(email) => Some(email.trim().to_owned()),
            None => None,
        };
        let avatar = self
            .avatar
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty());
        if username.is_none() && email.is_none() && avatar.is_none() {
            return Err(ProfileUpdateError::NoChanges);
        }
        Ok(Self {
            username,
            email,
            avatar,
        })
    }
}

/// One row of `GET /me/lessons-history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonHistoryEntry {
    pub lesson_id: LessonId,
    #[serde(default, alias = "title")]
    pub lesson_title: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Row of the admin users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}
