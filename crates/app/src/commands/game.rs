use quest_core::games::{
    GameAnswer, GameError, GamePhase, GameStep, MEMORIZE_WINDOW, ROUNDS_PER_GAME, TaskData,
};
use quest_core::model::{GameKind, ProgrammingLanguage};
use rust_i18n::t;
use services::GameServiceError;
use tokio::io::AsyncBufRead;

use super::Context;
use crate::prompt::{Prompt, parse_selection};

/// Blank lines pushed out after the memorize window so the snippet scrolls away.
const SCROLL_AWAY: usize = 40;

pub async fn catalog(ctx: &Context) -> anyhow::Result<()> {
    let games = ctx.services.games().catalog(&ctx.session).await?;
    for game in games {
        let xp = game.xp_reward.unwrap_or_default();
        let difficulty = game.difficulty.unwrap_or_default();
        println!("{:<16} {:<24} {difficulty:<8} {xp} XP", game.game_id, game.title);
        if let Some(description) = game.description {
            println!("    {description}");
        }
    }
    Ok(())
}

pub async fn play<R: AsyncBufRead + Unpin>(
    ctx: &Context,
    prompt: &mut Prompt<R>,
    kind: GameKind,
    language: ProgrammingLanguage,
) -> anyhow::Result<()> {
    let games = ctx.services.games();
    let mut session = games.start(&ctx.session, kind, language).await?;
    println!(
        "{}",
        t!("game.started", game = kind, language = language.display_name())
    );

    loop {
        println!();
        println!(
            "{}",
            t!("game.round", round = session.run.round(), total = ROUNDS_PER_GAME)
        );

        if session.run.phase() == GamePhase::Memorize {
            if let Some(code) = session.run.visible_code() {
                println!("{}", t!("game.memorize", seconds = MEMORIZE_WINDOW.as_secs()));
                println!("{code}");
            }
            tokio::time::sleep(MEMORIZE_WINDOW).await;
            println!("{}", "\n".repeat(SCROLL_AWAY));
            session.run.end_memorize()?;
        }

        let Some(data) = session.run.task_data().cloned() else {
            break;
        };
        show_puzzle(&data, session.run.visible_code());

        let result = loop {
            let Some(answer) = read_answer(prompt, &data).await? else {
                return Ok(());
            };
            match session.run.submit(&answer) {
                Ok(result) => break result,
                Err(GameError::EmptySelection) => println!("{}", t!("game.empty_selection")),
                Err(GameError::SelectionOutOfRange { .. }) => {
                    println!("{}", t!("game.selection_out_of_range"));
                }
                Err(err) => return Err(err.into()),
            }
        };

        if result.correct {
            println!("{}", t!("game.correct", xp = result.xp_awarded));
        } else {
            println!("{}", t!("game.wrong"));
            println!("{}", result.solution);
        }

        match games.advance(&ctx.session, &mut session).await {
            Ok(GameStep::NextRound { .. }) => {}
            Ok(GameStep::Finished { total_xp }) => {
                println!();
                println!("{}", t!("game.finished", xp = total_xp));
                break;
            }
            Err(GameServiceError::Api(err)) => {
                tracing::warn!(error = %err, "next round could not be loaded");
                println!("{}", t!("game.aborted", xp = session.run.total_xp()));
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn show_puzzle(data: &TaskData, code: Option<&str>) {
    if let Some(instruction) = data.instruction() {
        println!("{instruction}");
    }
    match data {
        TaskData::MemoryCode { .. } => println!("{}", t!("game.memory_prompt")),
        TaskData::RefactorRush { bad_code, .. } => {
            println!("{bad_code}");
            println!("{}", t!("game.refactor_prompt"));
        }
        TaskData::VariableHunt { variables, .. } => {
            if let Some(code) = code {
                println!("{code}");
            }
            println!("{}", t!("game.variables", list = variables.join(", ")));
        }
        TaskData::BugInfection { bugs, .. } => {
            if let Some(code) = code {
                println!("{code}");
            }
            for (index, bug) in bugs.iter().enumerate() {
                println!("  {}. {bug}", index + 1);
            }
            println!("{}", t!("game.bugs_prompt"));
        }
    }
}

async fn read_answer<R: AsyncBufRead + Unpin>(
    prompt: &mut Prompt<R>,
    data: &TaskData,
) -> anyhow::Result<Option<GameAnswer>> {
    match data {
        TaskData::MemoryCode { .. } | TaskData::RefactorRush { .. } => {
            let code = prompt.block(&t!("game.code_prompt")).await?;
            Ok(code.map(GameAnswer::Text))
        }
        TaskData::VariableHunt { .. } => {
            let line = prompt.line(">").await?;
            Ok(line.map(GameAnswer::Text))
        }
        TaskData::BugInfection { .. } => loop {
            let Some(line) = prompt.line(">").await? else {
                return Ok(None);
            };
            match parse_selection(&line) {
                Some(selection) => return Ok(Some(GameAnswer::Selection(selection))),
                None => println!("{}", t!("game.selection_format")),
            }
        },
    }
}
