use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LanguageId, LessonId, ModuleId};

/// A course language (Python, JavaScript, Java, HTML/CSS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A themed group of lessons inside a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default = "default_lesson_type")]
    pub lesson_type: String,
    #[serde(default)]
    pub order: i64,
    /// Lecture narrative (Markdown or HTML). Blank means "go straight to the quiz".
    #[serde(default)]
    pub content: Option<String>,
}

fn default_lesson_type() -> String {
    "theory".to_owned()
}

impl Lesson {
    #[must_use]
    pub fn is_exam(&self) -> bool {
        self.lesson_type.eq_ignore_ascii_case("exam")
    }

    #[must_use]
    pub fn lecture(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Rewards granted by the backend after a lesson is completed.
///
/// Read-only display data; every field may be missing on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReward {
    #[serde(default)]
    pub xp_earned: Option<u32>,
    #[serde(default)]
    pub coins_earned: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

//
// ─── COURSE PATH ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathNodeKind {
    Lesson,
    Exam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathNodeStatus {
    Completed,
    Current,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    pub lesson_id: LessonId,
    pub title: String,
    pub kind: PathNodeKind,
    pub status: PathNodeStatus,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("lesson {0} is not part of this module")]
    UnknownLesson(LessonId),
    #[error("lesson {0} is locked")]
    Locked(LessonId),
}

/// Ordered lesson path of a module, with progression status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoursePath {
    nodes: Vec<PathNode>,
}

impl CoursePath {
    /// Orders lessons by `order` and marks completed lessons, the first
    /// unfinished lesson as current, and everything after it as locked.
    #[must_use]
    pub fn build(lessons: &[Lesson], completed: &HashSet<LessonId>) -> Self {
        let mut ordered: Vec<&Lesson> = lessons.iter().collect();
        ordered.sort_by_key(|l| (l.order, l.id));

        let mut current_assigned = false;
        let nodes = ordered
            .into_iter()
            .map(|lesson| {
                let status = if completed.contains(&lesson.id) {
                    PathNodeStatus::Completed
                } else if current_assigned {
                    PathNodeStatus::Locked
                } else {
                    current_assigned = true;
                    PathNodeStatus::Current
                };
                PathNode {
                    lesson_id: lesson.id,
                    title: lesson.title.clone(),
                    kind: if lesson.is_exam() {
                        PathNodeKind::Exam
                    } else {
                        PathNodeKind::Lesson
                    },
                    status,
                }
            })
            .collect();

        Self { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    #[must_use]
    pub fn current(&self) -> Option<&PathNode> {
        self.nodes
            .iter()
            .find(|n| n.status == PathNodeStatus::Current)
    }

    /// Selecting a node opens its lesson unless it is locked.
    ///
    /// # Errors
    ///
    /// Returns `PathError::UnknownLesson` or `PathError::Locked`.
    pub fn select(&self, lesson_id: LessonId) -> Result<&PathNode, PathError> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.lesson_id == lesson_id)
            .ok_or(PathError::UnknownLesson(lesson_id))?;
        if node.status == PathNodeStatus::Locked {
            return Err(PathError::Locked(lesson_id));
        }
        Ok(node)
    }
}
