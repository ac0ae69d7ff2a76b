use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{GameId, GameTaskId};

/// XP granted for a solved round when a task does not declare its own reward.
pub const DEFAULT_TASK_XP: u32 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {raw}")]
pub struct UnknownVariant {
    kind: &'static str,
    raw: String,
}

//
// ─── GAME KIND ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    MemoryCode,
    RefactorRush,
    VariableHunt,
    BugInfection,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::MemoryCode,
        GameKind::RefactorRush,
        GameKind::VariableHunt,
        GameKind::BugInfection,
    ];

    /// Route segment used by `/games/{slug}/...`.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::MemoryCode => "memory-code",
            GameKind::RefactorRush => "refactor-rush",
            GameKind::VariableHunt => "variable-hunt",
            GameKind::BugInfection => "bug-infection",
        }
    }

    /// Memory Code shows its snippet for a few seconds before input opens.
    #[must_use]
    pub fn memorize_seconds(self) -> Option<u64> {
        match self {
            GameKind::MemoryCode => Some(5),
            _ => None,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GameKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s.trim())
            .ok_or_else(|| UnknownVariant {
                kind: "game",
                raw: s.to_owned(),
            })
    }
}

//
// ─── PROGRAMMING LANGUAGE ──────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammingLanguage {
    Python,
    #[default]
    JavaScript,
    Java,
    HtmlCss,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 4] = [
        ProgrammingLanguage::Python,
        ProgrammingLanguage::JavaScript,
        ProgrammingLanguage::Java,
        ProgrammingLanguage::HtmlCss,
    ];

    #[must_use]
    pub fn wire_id(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "python",
            ProgrammingLanguage::JavaScript => "javascript",
            ProgrammingLanguage::Java => "java",
            ProgrammingLanguage::HtmlCss => "htmlcss",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "Python",
            ProgrammingLanguage::JavaScript => "JavaScript",
            ProgrammingLanguage::Java => "Java",
            ProgrammingLanguage::HtmlCss => "HTML/CSS",
        }
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for ProgrammingLanguage {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ProgrammingLanguage::ALL
            .into_iter()
            .find(|lang| lang.wire_id() == needle)
            .ok_or_else(|| UnknownVariant {
                kind: "language",
                raw: s.to_owned(),
            })
    }
}

//
// ─── GAMES & TASKS ─────────────────────────────────────────────────────────────
//

/// Row of `GET /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: GameId,
    pub game_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub xp_reward: Option<u32>,
}

impl GameInfo {
    #[must_use]
    pub fn kind(&self) -> Option<GameKind> {
        self.game_id.parse().ok()
    }
}

/// A round's task. `task_data` stays raw JSON; its shape depends on the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTask {
    pub id: GameTaskId,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub task_data: serde_json::Value,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub xp_reward: Option<u32>,
}

impl GameTask {
    #[must_use]
    pub fn reward(&self) -> u32 {
        match self.xp_reward {
            Some(xp) if xp > 0 => xp,
            _ => DEFAULT_TASK_XP,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameTaskDraftError {
    #[error("Task data must be valid JSON")]
    InvalidTaskData,
    #[error("task type cannot be empty")]
    EmptyTaskType,
}

/// Admin payload for creating or editing a game task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameTaskDraft {
    pub task_type: String,
    pub language: String,
    pub task_data: serde_json::Value,
    pub order: i64,
    pub xp_reward: u32,
}

impl GameTaskDraft {
    /// Build a draft from form text. Order defaults to 0 and reward to 50.
    ///
    /// # Errors
    ///
    /// Returns `GameTaskDraftError::InvalidTaskData` if `task_data` is not JSON.
    pub fn from_form(
        task_type: &str,
        language: ProgrammingLanguage,
        task_data: &str,
        order: Option<i64>,
        xp_reward: Option<u32>,
    ) -> Result<Self, GameTaskDraftError> {
        let task_type = task_type.trim();
        if task_type.is_empty() {
            return Err(GameTaskDraftError::EmptyTaskType);
        }
        let task_data = serde_json::from_str(task_data)
            .map_err(|_| GameTaskDraftError::InvalidTaskData)?;
        Ok(Self {
            task_type: task_type.to_owned(),
            language: language.wire_id().to_owned(),
            task_data,
            order: order.unwrap_or(0),
            xp_reward: xp_reward.unwrap_or(DEFAULT_TASK_XP),
        })
    }
}
