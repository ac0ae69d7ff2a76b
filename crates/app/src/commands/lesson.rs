use quest_core::engine::{EngineError, FEEDBACK_DELAY, LessonPhase, MAX_LIVES, TARGET_CORRECT};
use quest_core::model::{CompletionReward, Exercise, LessonId, ModuleId};
use rust_i18n::t;
use services::Completion;
use tokio::io::AsyncBufRead;

use super::Context;
use crate::prompt::Prompt;
use crate::render;

pub async fn play<R: AsyncBufRead + Unpin>(
    ctx: &Context,
    prompt: &mut Prompt<R>,
    module: ModuleId,
    lesson: LessonId,
) -> anyhow::Result<()> {
    let lesson = ctx
        .services
        .courses()
        .open_lesson(&ctx.session, module, lesson)
        .await?;
    let lessons = ctx.services.lesson_loop();
    let mut engine = lessons.start(&ctx.session, &lesson).await?;
    println!("== {} ==", lesson.title);

    if engine.phase() == LessonPhase::Lecture {
        if let Some(lecture) = engine.lecture() {
            println!("{}\n", render::lecture_to_text(lecture));
        }
        if prompt.line(&t!("lesson.start_prompt")).await?.is_none() {
            return Ok(());
        }
        match engine.start_quiz() {
            Ok(()) => {}
            Err(EngineError::NoExercises) => {
                println!("{}", t!("lesson.no_exercises"));
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }

    while let Some(exercise) = engine.current() {
        print_exercise(exercise, engine.lives(), engine.correct_count());
        let Some(answer) = prompt.line(">").await? else {
            return Ok(());
        };
        if answer.trim().is_empty() {
            continue;
        }
        let expected = expected_label(exercise);

        let outcome = lessons.submit(&ctx.session, &mut engine, &answer).await?;
        if outcome.feedback.correct {
            println!("{}", t!("lesson.correct"));
        } else {
            println!("{}", t!("lesson.wrong", expected = expected));
        }
        match outcome.completion {
            Some(Completion::Rewarded(reward)) => print_reward(&reward),
            Some(Completion::Unreported(_)) => println!("{}", t!("lesson.completed_offline")),
            None => {}
        }
        if engine.is_terminal() {
            break;
        }
        tokio::time::sleep(FEEDBACK_DELAY).await;
        engine.next()?;
    }

    if engine.phase() == LessonPhase::GameOver {
        println!("{}", t!("lesson.game_over"));
    }
    Ok(())
}

fn print_exercise(exercise: &Exercise, lives: u8, correct: u8) {
    let hearts = format!(
        "{}{}",
        "♥".repeat(usize::from(lives)),
        "♡".repeat(usize::from(MAX_LIVES.saturating_sub(lives)))
    );
    println!();
    println!("{hearts}  {correct}/{TARGET_CORRECT}");
    println!("{}", exercise.question);
    for option in exercise.options.iter().flatten() {
        println!("  {}) {}", option.key, option.text);
    }
}

/// Multiple-choice answers are option keys; show the key with its text.
fn expected_label(exercise: &Exercise) -> String {
    match exercise.correct_option() {
        Some(option) => format!("{}) {}", option.key, option.text),
        None => exercise.answer.clone(),
    }
}

fn print_reward(reward: &CompletionReward) {
    println!("{}", t!("lesson.completed"));
    if let Some(message) = reward.message.as_deref().filter(|m| !m.trim().is_empty()) {
        println!("{message}");
    }
    println!(
        "{}",
        t!(
            "lesson.reward",
            xp = reward.xp_earned.unwrap_or(0),
            coins = reward.coins_earned.unwrap_or(0)
        )
    );
}
