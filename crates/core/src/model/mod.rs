pub mod auth;
mod course;
mod exercise;
pub mod game;
mod ids;
mod leaderboard;
mod profile;
pub mod shop;

pub use auth::{AccessToken, AuthSession, Role, SessionContext, TokenClaims, TokenError};
pub use course::{
    CompletionReward, CoursePath, Language, Lesson, Module, PathError, PathNode, PathNodeKind,
    PathNodeStatus,
};
pub use exercise::{Exercise, ExerciseDraft, ExerciseDraftError, ExerciseOption};
pub use game::{
    DEFAULT_TASK_XP, GameInfo, GameKind, GameTask, GameTaskDraft, GameTaskDraftError,
    ProgrammingLanguage, UnknownVariant,
};
pub use ids::{
    ExerciseId, GameId, GameTaskId, LanguageId, LessonId, ModuleId, ParseIdError, ShopItemId,
    UserId,
};
pub use leaderboard::{LeaderboardEntry, Standing, podium, rank_entries};
pub use profile::{
    LessonHistoryEntry, ProfileUpdate, ProfileUpdateError, ProgressSnapshot, UserProfile,
    UserSummary,
};
pub use shop::{ItemFilter, ItemType, ShopItem, SortOrder, arrange, can_afford};
