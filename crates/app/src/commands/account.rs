use anyhow::Context as _;
use quest_core::model::{ProfileUpdate, ProgressSnapshot, UserProfile};
use rust_i18n::t;
use services::ProfileLoad;

use super::Context;
use crate::cli::{Credentials, ProfileArgs};
use crate::prompt::Prompt;

async fn password(credentials: &Credentials) -> anyhow::Result<String> {
    if let Some(password) = &credentials.password {
        return Ok(password.clone());
    }
    Prompt::stdin()
        .line(&t!("auth.password_prompt"))
        .await?
        .context("no password given")
}

pub async fn register(ctx: &Context, credentials: Credentials) -> anyhow::Result<()> {
    let password = password(&credentials).await?;
    let role = ctx
        .services
        .auth()
        .register(
            &credentials.email,
            &password,
            credentials.secret_code.as_deref(),
        )
        .await?;
    println!("{}", t!("auth.registered", role = role));
    Ok(())
}

pub async fn login(ctx: &Context, credentials: Credentials) -> anyhow::Result<()> {
    let password = password(&credentials).await?;
    let session = ctx
        .services
        .auth()
        .login(&credentials.email, &password)
        .await?;
    if let Some(auth) = session.auth() {
        println!(
            "{}",
            t!("auth.logged_in", email = auth.email, role = auth.role)
        );
    }
    Ok(())
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.services.auth().logout().await?;
    println!("{}", t!("auth.logged_out"));
    Ok(())
}

pub async fn profile(ctx: &Context, args: ProfileArgs) -> anyhow::Result<()> {
    let profiles = ctx.services.profile();
    if args.is_edit() {
        let update = ProfileUpdate {
            username: args.username,
            email: args.email,
            avatar: args.avatar,
        };
        let profile = profiles.update(&ctx.session, update).await?;
        println!("{}", t!("profile.updated"));
        print_profile(&profile);
        return Ok(());
    }

    match profiles.load(&ctx.session).await? {
        ProfileLoad::Fresh(profile) => print_profile(&profile),
        ProfileLoad::Cached(profile) => {
            println!("{}", t!("profile.offline"));
            print_profile(&profile);
        }
        ProfileLoad::SessionExpired => println!("{}", t!("error.session_expired")),
        ProfileLoad::LoggedOut => println!("{}", t!("error.not_logged_in")),
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("{}", t!("profile.name", name = profile.display_name()));
    println!("{}", t!("profile.email", email = profile.email));
    println!("{}", t!("profile.role", role = profile.role));
    if let Some(avatar) = &profile.avatar {
        println!("{}", t!("profile.avatar", avatar = avatar));
    }
    print_progress(&ProgressSnapshot::from_profile(profile));
    if let Some(coins) = profile.coins {
        println!("{}", t!("profile.coins", coins = coins));
    }
}

fn print_progress(progress: &ProgressSnapshot) {
    println!(
        "{}",
        t!(
            "progress.level",
            level = progress.level,
            title = progress.level_title
        )
    );
    println!(
        "{}",
        t!(
            "progress.xp",
            xp = progress.xp,
            remaining = progress.xp_to_next_level,
            next = progress.next_level_title
        )
    );
    println!(
        "{}",
        t!(
            "progress.bar",
            bar = progress_bar(progress.progress_percentage),
            percent = format!("{:.0}", progress.progress_percentage)
        )
    );
    println!("{}", t!("progress.streak", days = progress.streak));
}

fn progress_bar(percentage: f64) -> String {
    const WIDTH: usize = 20;
    let clamped = percentage.clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((clamped / 100.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

pub async fn progress(ctx: &Context) -> anyhow::Result<()> {
    let progress = ctx.services.profile().progress(&ctx.session).await?;
    print_progress(&progress);
    Ok(())
}

pub async fn history(ctx: &Context) -> anyhow::Result<()> {
    let entries = ctx.services.profile().history(&ctx.session).await?;
    if entries.is_empty() {
        println!("{}", t!("history.empty"));
        return Ok(());
    }
    for entry in entries {
        let when = entry
            .completed_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let language = entry.language.unwrap_or_default();
        println!("{when:>10}  {language:<12} {}", entry.lesson_title);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::progress_bar;

    #[test]
    fn progress_bar_is_clamped() {
        assert_eq!(progress_bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(250.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(-3.0), format!("[{}]", "-".repeat(20)));
    }
}
