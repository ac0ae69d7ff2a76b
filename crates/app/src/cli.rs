use clap::{Args, Parser, Subcommand};
use quest_core::model::{
    ExerciseId, GameId, GameKind, GameTaskId, ItemFilter, LanguageId, LessonId, ModuleId,
    ProgrammingLanguage, ShopItemId, SortOrder,
};
use services::config::{DEFAULT_API_URL, DEFAULT_DB_URL};

/// CodeQuest in the terminal: lessons, mini-games, daily challenge and shop.
#[derive(Parser, Debug)]
#[command(name = "codequest", version, about)]
pub struct Cli {
    /// Backend API base URL
    #[arg(long, env = "QUEST_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// SQLite database for the local session store
    #[arg(long, env = "QUEST_DB_URL", default_value = DEFAULT_DB_URL, global = true)]
    pub db: String,

    /// Interface language (en, pl)
    #[arg(long, env = "QUEST_LOCALE", global = true)]
    pub locale: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register(Credentials),
    /// Log in and remember the session
    Login(Credentials),
    Logout,
    /// Show or edit the profile
    Profile(ProfileArgs),
    /// Level, XP and streak
    Progress,
    /// Completed lessons
    History,
    /// Available programming languages
    Courses,
    /// Modules of a language
    Modules { language: LanguageId },
    /// Lesson path of a module
    Lessons { module: ModuleId },
    /// Play a lesson: lecture, then quiz
    Lesson { module: ModuleId, lesson: LessonId },
    /// Play a mini-game
    Game {
        /// memory-code, refactor-rush, variable-hunt or bug-infection
        kind: GameKind,
        #[arg(long, default_value_t = ProgrammingLanguage::default())]
        language: ProgrammingLanguage,
    },
    /// List the mini-games
    Games,
    /// Today's daily challenge
    Daily,
    #[command(subcommand)]
    Shop(ShopCommand),
    Leaderboard {
        #[arg(long)]
        limit: Option<u32>,
    },
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Switch the interface language
    Locale { code: String },
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    /// Prompted for when omitted
    #[arg(long, env = "QUEST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Admin registration code
    #[arg(long)]
    pub secret_code: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub avatar: Option<String>,
}

impl ProfileArgs {
    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.username.is_some() || self.email.is_some() || self.avatar.is_some()
    }
}

#[derive(Subcommand, Debug)]
pub enum ShopCommand {
    List {
        /// default, price-asc or price-desc
        #[arg(long, default_value = "default")]
        sort: SortOrder,
        /// all, owned or available
        #[arg(long, default_value = "all")]
        filter: ItemFilter,
    },
    Buy { item: ShopItemId },
    /// Equip an owned avatar or theme
    Equip { item: ShopItemId },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Users,
    Games,
    Tasks { game: GameId },
    AddTask {
        game: GameId,
        #[command(flatten)]
        args: TaskArgs,
    },
    UpdateTask {
        game: GameId,
        task: GameTaskId,
        #[command(flatten)]
        args: TaskArgs,
    },
    DeleteTask { game: GameId, task: GameTaskId },
    Exercises { lesson: LessonId },
    AddExercise(ExerciseArgs),
    UpdateExercise {
        exercise: ExerciseId,
        #[command(flatten)]
        args: ExerciseArgs,
    },
    DeleteExercise { exercise: ExerciseId },
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[arg(long = "type")]
    pub task_type: String,
    #[arg(long, default_value_t = ProgrammingLanguage::default())]
    pub language: ProgrammingLanguage,
    /// Task data as JSON text
    #[arg(long)]
    pub data: String,
    #[arg(long)]
    pub order: Option<i64>,
    #[arg(long)]
    pub xp: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ExerciseArgs {
    pub lesson: LessonId,
    #[arg(long)]
    pub question: String,
    #[arg(long)]
    pub answer: String,
    /// Repeatable `key=text` option
    #[arg(long = "option")]
    pub options: Vec<String>,
    #[arg(long = "type", default_value = "multiple_choice")]
    pub exercise_type: String,
}
