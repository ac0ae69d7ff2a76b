use quest_core::daily::{DailyStatus, DailyTask};
use quest_core::engine::FEEDBACK_DELAY;
use rust_i18n::t;
use services::DailyChallengeError;
use tokio::io::AsyncBufRead;

use super::Context;
use crate::prompt::Prompt;

pub async fn play<R: AsyncBufRead + Unpin>(
    ctx: &Context,
    prompt: &mut Prompt<R>,
) -> anyhow::Result<()> {
    let daily = ctx.services.daily();
    let mut run = match daily.load(&ctx.session).await? {
        DailyStatus::AlreadyCompleted => {
            println!("{}", t!("daily.already_completed"));
            return Ok(());
        }
        DailyStatus::Empty => {
            println!("{}", t!("daily.empty"));
            return Ok(());
        }
        DailyStatus::Ready(run) => run,
    };

    while let Some(task) = run.current() {
        let (position, total) = run.position();
        println!();
        println!("{}", t!("daily.task", position = position + 1, total = total));
        print_task(task);

        let Some(answer) = prompt.line(">").await? else {
            return Ok(());
        };
        if answer.trim().is_empty() {
            continue;
        }
        let feedback = daily.submit(&ctx.session, &mut run, &answer).await?;
        if feedback.correct {
            println!("{}", t!("daily.correct", xp = feedback.xp_awarded));
        } else {
            println!("{}", t!("daily.wrong", expected = feedback.expected));
        }
        tokio::time::sleep(FEEDBACK_DELAY).await;
        run.next()?;
    }

    match daily.finish(&ctx.session, &run).await {
        Ok(score) => println!("{}", t!("daily.finished", xp = score)),
        Err(DailyChallengeError::Api(err)) => {
            tracing::warn!(error = %err, "daily challenge finish was not recorded");
            println!("{}", t!("daily.finish_failed", xp = run.score()));
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn print_task(task: &DailyTask) {
    println!("{}", task.question);
    if let Some(context) = task.context.as_deref().filter(|c| !c.trim().is_empty()) {
        println!("{context}");
    }
    if task.is_multiple_choice() {
        for option in task.options.iter().flatten() {
            println!("  {}) {}", option.key, option.text);
        }
    }
}
