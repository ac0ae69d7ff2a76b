//! One module per command group. Every command talks to the services through
//! [`Context`] and reports through localized messages.

mod account;
mod admin;
mod courses;
mod daily;
mod game;
mod leaderboard;
mod lesson;
mod shop;

use quest_core::model::SessionContext;
use rust_i18n::t;
use services::{
    AdminError, ApiError, AppServices, AuthError, CourseError, DailyChallengeError,
    GameServiceError, LessonError, ProfileError, ShopError,
};

use crate::cli::Command;
use crate::i18n;
use crate::prompt::Prompt;

/// What every command gets: the assembled services and the restored session.
pub struct Context {
    pub services: AppServices,
    pub session: SessionContext,
}

/// # Errors
///
/// Propagates the failing service call; see [`describe`].
pub async fn dispatch(command: Command, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Command::Register(credentials) => account::register(ctx, credentials).await,
        Command::Login(credentials) => account::login(ctx, credentials).await,
        Command::Logout => account::logout(ctx).await,
        Command::Profile(args) => account::profile(ctx, args).await,
        Command::Progress => account::progress(ctx).await,
        Command::History => account::history(ctx).await,
        Command::Courses => courses::languages(ctx).await,
        Command::Modules { language } => courses::modules(ctx, language).await,
        Command::Lessons { module } => courses::lessons(ctx, module).await,
        Command::Lesson { module, lesson } => {
            lesson::play(ctx, &mut Prompt::stdin(), module, lesson).await
        }
        Command::Game { kind, language } => {
            game::play(ctx, &mut Prompt::stdin(), kind, language).await
        }
        Command::Games => game::catalog(ctx).await,
        Command::Daily => daily::play(ctx, &mut Prompt::stdin()).await,
        Command::Shop(command) => shop::run(ctx, command).await,
        Command::Leaderboard { limit } => leaderboard::show(ctx, limit).await,
        Command::Admin(command) => admin::run(ctx, command).await,
        Command::Locale { code } => set_locale(ctx, &code).await,
    }
}

async fn set_locale(ctx: &Context, code: &str) -> anyhow::Result<()> {
    let Some(locale) = i18n::normalize(code) else {
        println!(
            "{}",
            t!(
                "locale.unsupported",
                code = code,
                supported = i18n::SUPPORTED_LOCALES.join(", ")
            )
        );
        return Ok(());
    };
    i18n::activate(ctx.services.storage().preferences.as_ref(), locale).await?;
    println!("{}", t!("locale.changed", locale = locale));
    Ok(())
}

/// Localized one-line explanation of a failed command.
#[must_use]
pub fn describe(err: &anyhow::Error) -> String {
    if let Some(api) = api_error(err) {
        return describe_api(api);
    }
    let profile = err.downcast_ref::<ProfileError>();
    if matches!(profile, Some(ProfileError::NotLoggedIn))
        || matches!(err.downcast_ref::<ShopError>(), Some(ShopError::NotLoggedIn))
        || matches!(
            err.downcast_ref::<DailyChallengeError>(),
            Some(DailyChallengeError::NotLoggedIn)
        )
    {
        return t!("error.not_logged_in").into_owned();
    }
    if matches!(profile, Some(ProfileError::SessionExpired)) {
        return t!("error.session_expired").into_owned();
    }
    if matches!(err.downcast_ref::<AdminError>(), Some(AdminError::NotAdmin)) {
        return t!("error.not_admin").into_owned();
    }
    if matches!(err.downcast_ref::<AuthError>(), Some(AuthError::MissingCredentials)) {
        return t!("error.missing_credentials").into_owned();
    }
    match err.downcast_ref::<ShopError>() {
        Some(ShopError::UnknownItem(id)) => return t!("shop.unknown_item", id = id).into_owned(),
        Some(ShopError::NotOwned(id)) => return t!("shop.not_owned", id = id).into_owned(),
        Some(ShopError::WrongItemType(id)) => return t!("shop.wrong_type", id = id).into_owned(),
        _ => {}
    }
    t!("error.failed", reason = err.to_string()).into_owned()
}

fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return Some(api);
    }
    match err.downcast_ref::<AuthError>() {
        Some(AuthError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<ProfileError>() {
        Some(ProfileError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<CourseError>() {
        Some(CourseError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<LessonError>() {
        Some(LessonError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<GameServiceError>() {
        Some(GameServiceError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<DailyChallengeError>() {
        Some(DailyChallengeError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<ShopError>() {
        Some(ShopError::Api(api)) => return Some(api),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<AdminError>() {
        Some(AdminError::Api(api)) => Some(api),
        _ => None,
    }
}

fn describe_api(err: &ApiError) -> String {
    match err {
        ApiError::Network(_) => t!("error.network").into_owned(),
        ApiError::Unauthorized(_) => t!("error.session_expired").into_owned(),
        ApiError::Forbidden(_) => t!("error.forbidden").into_owned(),
        ApiError::NotFound(_) => t!("error.not_found").into_owned(),
        ApiError::InsufficientFunds(_) => t!("shop.insufficient_funds_generic").into_owned(),
        other => t!("error.failed", reason = other.to_string()).into_owned(),
    }
}
