//! Round loops for the four mini-games.
//!
//! Every game is the same shape: load a task, (memorize,) answer, score,
//! then either load the next round's task or finish after the last round.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::answer::trimmed_eq;
use crate::model::{GameKind, GameTask, GameTaskId};

pub const ROUNDS_PER_GAME: u8 = 3;

/// How long Memory Code shows its snippet before input opens.
pub const MEMORIZE_WINDOW: Duration = Duration::from_secs(5);

//
// ─── TASK DATA ─────────────────────────────────────────────────────────────────
//

/// The typed puzzle inside a task's `task_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskData {
    MemoryCode {
        code: String,
    },
    RefactorRush {
        bad_code: String,
        refactored_code: String,
        instruction: Option<String>,
    },
    VariableHunt {
        code: String,
        variables: Vec<String>,
        correct_variable: String,
        instruction: Option<String>,
    },
    BugInfection {
        code: String,
        bugs: Vec<String>,
        correct_bugs: BTreeSet<usize>,
        instruction: Option<String>,
    },
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireTaskData {
    code: Option<String>,
    bad_code: Option<String>,
    refactored_code: Option<String>,
    instruction: Option<String>,
    variables: Option<Vec<String>>,
    correct_variable: Option<String>,
    bugs: Option<Vec<String>>,
    correct_bugs: Option<Vec<usize>>,
}

impl TaskData {
    /// Decode `task.task_data` for `kind`. Missing or null fields default to empty.
    ///
    /// # Errors
    ///
    /// `GameError::MalformedTask` when the data is not an object of the
    /// expected field types.
    pub fn parse(kind: GameKind, task: &GameTask) -> Result<Self, GameError> {
        let data = if task.task_data.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            task.task_data.clone()
        };
        let wire: WireTaskData =
            serde_json::from_value(data).map_err(|err| GameError::MalformedTask {
                task_id: task.id,
                reason: err.to_string(),
            })?;

        let instruction = wire.instruction.filter(|text| !text.trim().is_empty());
        let code = wire.code.unwrap_or_default();
        Ok(match kind {
            GameKind::MemoryCode => TaskData::MemoryCode { code },
            GameKind::RefactorRush => TaskData::RefactorRush {
                bad_code: wire.bad_code.unwrap_or_default(),
                refactored_code: wire.refactored_code.unwrap_or_default(),
                instruction,
            },
            GameKind::VariableHunt => TaskData::VariableHunt {
                code,
                variables: wire.variables.unwrap_or_default(),
                correct_variable: wire.correct_variable.unwrap_or_default(),
                instruction,
            },
            GameKind::BugInfection => TaskData::BugInfection {
                code,
                bugs: wire.bugs.unwrap_or_default(),
                correct_bugs: wire.correct_bugs.unwrap_or_default().into_iter().collect(),
                instruction,
            },
        })
    }

    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            TaskData::MemoryCode { .. } => GameKind::MemoryCode,
            TaskData::RefactorRush { .. } => GameKind::RefactorRush,
            TaskData::VariableHunt { .. } => GameKind::VariableHunt,
            TaskData::BugInfection { .. } => GameKind::BugInfection,
        }
    }

    /// The snippet the player works on.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            TaskData::MemoryCode { code }
            | TaskData::VariableHunt { code, .. }
            | TaskData::BugInfection { code, .. } => code,
            TaskData::RefactorRush { bad_code, .. } => bad_code,
        }
    }

    #[must_use]
    pub fn instruction(&self) -> Option<&str> {
        match self {
            TaskData::MemoryCode { .. } => None,
            TaskData::RefactorRush { instruction, .. }
            | TaskData::VariableHunt { instruction, .. }
            | TaskData::BugInfection { instruction, .. } => instruction.as_deref(),
        }
    }

    /// Human-readable correct answer, shown after scoring.
    #[must_use]
    pub fn solution(&self) -> String {
        match self {
            TaskData::MemoryCode { code } => code.clone(),
            TaskData::RefactorRush {
                refactored_code, ..
            } => refactored_code.clone(),
            TaskData::VariableHunt {
                correct_variable, ..
            } => correct_variable.clone(),
            TaskData::BugInfection {
                bugs, correct_bugs, ..
            } => correct_bugs
                .iter()
                .map(|&i| bugs.get(i).cloned().unwrap_or_else(|| format!("#{i}")))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn score(&self, answer: &GameAnswer) -> Result<bool, GameError> {
        match (self, answer) {
            (TaskData::MemoryCode { code }, GameAnswer::Text(text)) => Ok(trimmed_eq(text, code)),
            (
                TaskData::RefactorRush {
                    refactored_code, ..
                },
                GameAnswer::Text(text),
            ) => Ok(trimmed_eq(text, refactored_code)),
            (
                TaskData::VariableHunt {
                    correct_variable, ..
                },
                GameAnswer::Text(name),
            ) => Ok(trimmed_eq(name, correct_variable)),
            (
                TaskData::BugInfection {
                    bugs, correct_bugs, ..
                },
                GameAnswer::Selection(selected),
            ) => {
                if selected.is_empty() {
                    return Err(GameError::EmptySelection);
                }
                if let Some(&index) = selected.iter().find(|&&i| i >= bugs.len()) {
                    return Err(GameError::SelectionOutOfRange {
                        index,
                        len: bugs.len(),
                    });
                }
                Ok(selected == correct_bugs)
            }
            _ => Err(GameError::AnswerShape(self.kind())),
        }
    }
}

//
// ─── RUN ───────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAnswer {
    /// Typed code, or the chosen variable name for Variable Hunt.
    Text(String),
    /// Bug Infection: indices into the task's bug list.
    Selection(BTreeSet<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    AwaitingTask,
    Memorize,
    Answering,
    Scored,
    Finished,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::AwaitingTask => "awaiting task",
            GamePhase::Memorize => "memorize",
            GamePhase::Answering => "answering",
            GamePhase::Scored => "scored",
            GamePhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("task {task_id} has malformed data: {reason}")]
    MalformedTask { task_id: GameTaskId, reason: String },
    #[error("select at least one bug")]
    EmptySelection,
    #[error("bug #{index} does not exist (task lists {len})")]
    SelectionOutOfRange { index: usize, len: usize },
    #[error("answer does not fit a {0} task")]
    AnswerShape(GameKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round: u8,
    pub correct: bool,
    pub xp_awarded: u32,
    pub solution: String,
}

/// What happens after a scored round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStep {
    NextRound { round: u8 },
    Finished { total_xp: u32 },
}

#[derive(Debug, Clone)]
struct LoadedTask {
    task: GameTask,
    data: TaskData,
}

/// One play-through of a mini-game.
#[derive(Debug, Clone)]
pub struct GameRun {
    kind: GameKind,
    round: u8,
    phase: GamePhase,
    total_xp: u32,
    loaded: Option<LoadedTask>,
    last_result: Option<RoundResult>,
}

impl GameRun {
    #[must_use]
    pub fn new(kind: GameKind) -> Self {
        Self {
            kind,
            round: 1,
            phase: GamePhase::AwaitingTask,
            total_xp: 0,
            loaded: None,
            last_result: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// 1-based.
    #[must_use]
    pub fn round(&self) -> u8 {
        self.round
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    #[must_use]
    pub fn task(&self) -> Option<&GameTask> {
        self.loaded.as_ref().map(|l| &l.task)
    }

    #[must_use]
    pub fn task_data(&self) -> Option<&TaskData> {
        self.loaded.as_ref().map(|l| &l.data)
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// The snippet to display now. Memory Code hides it while answering.
    #[must_use]
    pub fn visible_code(&self) -> Option<&str> {
        let data = self.task_data()?;
        match (data, self.phase) {
            (TaskData::MemoryCode { .. }, GamePhase::Answering) => None,
            _ => Some(data.code()),
        }
    }

    /// Install the current round's task.
    ///
    /// # Errors
    ///
    /// `WrongPhase` unless awaiting a task; `MalformedTask` if the task data
    /// cannot be decoded.
    pub fn load_task(&mut self, task: GameTask) -> Result<&TaskData, GameError> {
        self.expect_phase(GamePhase::AwaitingTask, "load a task")?;
        let data = TaskData::parse(self.kind, &task)?;
        self.phase = if self.kind.memorize_seconds().is_some() {
            GamePhase::Memorize
        } else {
            GamePhase::Answering
        };
        self.last_result = None;
        let loaded = self.loaded.insert(LoadedTask { task, data });
        Ok(&loaded.data)
    }

    /// Close the memorize window and open input.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside the memorize window.
    pub fn end_memorize(&mut self) -> Result<(), GameError> {
        self.expect_phase(GamePhase::Memorize, "end memorizing")?;
        self.phase = GamePhase::Answering;
        Ok(())
    }

    /// Score the round. A correct answer adds the task's reward once.
    ///
    /// # Errors
    ///
    /// `WrongPhase` unless answering; `EmptySelection`,
    /// `SelectionOutOfRange` or `AnswerShape` for unusable answers (the
    /// round stays open).
    pub fn submit(&mut self, answer: &GameAnswer) -> Result<RoundResult, GameError> {
        self.expect_phase(GamePhase::Answering, "answer")?;
        let Some(loaded) = self.loaded.as_ref() else {
            return Err(GameError::WrongPhase {
                action: "answer",
                phase: GamePhase::AwaitingTask,
            });
        };
        let correct = loaded.data.score(answer)?;
        let xp_awarded = if correct { loaded.task.reward() } else { 0 };
        let result = RoundResult {
            round: self.round,
            correct,
            xp_awarded,
            solution: loaded.data.solution(),
        };
        self.total_xp = self.total_xp.saturating_add(xp_awarded);
        self.phase = GamePhase::Scored;
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Move past a scored round.
    ///
    /// # Errors
    ///
    /// `WrongPhase` unless the round was scored.
    pub fn advance(&mut self) -> Result<GameStep, GameError> {
        self.expect_phase(GamePhase::Scored, "advance")?;
        if self.round < ROUNDS_PER_GAME {
            self.round += 1;
            self.phase = GamePhase::AwaitingTask;
            self.loaded = None;
            Ok(GameStep::NextRound { round: self.round })
        } else {
            self.phase = GamePhase::Finished;
            Ok(GameStep::Finished {
                total_xp: self.total_xp,
            })
        }
    }

    fn expect_phase(&self, expected: GamePhase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
