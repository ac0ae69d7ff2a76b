use quest_core::model::Standing;
use rust_i18n::t;

use super::Context;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

pub async fn show(ctx: &Context, limit: Option<u32>) -> anyhow::Result<()> {
    let board = ctx
        .services
        .leaderboard()
        .standings(&ctx.session, limit)
        .await?;
    if board.standings.is_empty() {
        println!("{}", t!("leaderboard.empty"));
        return Ok(());
    }

    let (podium, rest) = board.podium();
    for (standing, medal) in podium.iter().zip(MEDALS) {
        println!("{}", line(medal, standing));
    }
    if !rest.is_empty() {
        println!();
    }
    for standing in rest {
        println!("{}", line(&format!("{:>2}.", standing.rank), standing));
    }

    if let Some(me) = board.current_user() {
        println!();
        println!("{}", t!("leaderboard.you", rank = me.rank, xp = me.entry.xp));
    }
    Ok(())
}

fn line(prefix: &str, standing: &Standing) -> String {
    let marker = if standing.is_current_user { " ◀" } else { "" };
    format!(
        "{prefix} {:<24} {:>7} XP{marker}",
        standing.entry.name, standing.entry.xp
    )
}
