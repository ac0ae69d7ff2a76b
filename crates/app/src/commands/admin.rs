use anyhow::bail;
use quest_core::ValidationError;
use quest_core::model::{ExerciseDraft, ExerciseOption, GameTaskDraft};
use rust_i18n::t;
use services::AdminError;

use super::Context;
use crate::cli::{AdminCommand, ExerciseArgs, TaskArgs};

pub async fn run(ctx: &Context, command: AdminCommand) -> anyhow::Result<()> {
    let admin = ctx.services.admin();
    let session = &ctx.session;
    match command {
        AdminCommand::Users => {
            for user in admin.users(session).await? {
                println!("{:>4}  {:<32} {}", user.id.value(), user.email, user.role);
            }
        }
        AdminCommand::Games => {
            for game in admin.games(session).await? {
                println!("{:>4}  {:<16} {}", game.id.value(), game.game_id, game.title);
            }
        }
        AdminCommand::Tasks { game } => {
            for task in admin.tasks(session, game).await? {
                println!(
                    "{:>4}  #{:<3} {:<16} {:<10} {} XP  {}",
                    task.id.value(),
                    task.order,
                    task.task_type,
                    task.language,
                    task.reward(),
                    task.task_data
                );
            }
        }
        AdminCommand::AddTask { game, args } => {
            admin.create_task(session, game, &task_draft(&args)?).await?;
            println!("{}", t!("admin.task_saved"));
        }
        AdminCommand::UpdateTask { game, task, args } => {
            admin
                .update_task(session, game, task, &task_draft(&args)?)
                .await?;
            println!("{}", t!("admin.task_saved"));
        }
        AdminCommand::DeleteTask { game, task } => {
            admin.delete_task(session, game, task).await?;
            println!("{}", t!("admin.deleted"));
        }
        AdminCommand::Exercises { lesson } => {
            for exercise in admin.exercises(session, lesson).await? {
                println!(
                    "{:>4}  {:<60} {}",
                    exercise.id.value(),
                    exercise.question,
                    exercise.answer
                );
            }
        }
        AdminCommand::AddExercise(args) => {
            let created = admin
                .create_exercise(session, exercise_draft(args)?)
                .await?;
            println!("{}", t!("admin.exercise_created", id = created.id));
        }
        AdminCommand::UpdateExercise { exercise, args } => {
            admin
                .update_exercise(session, exercise, exercise_draft(args)?)
                .await?;
            println!("{}", t!("admin.exercise_saved"));
        }
        AdminCommand::DeleteExercise { exercise } => {
            admin.delete_exercise(session, exercise).await?;
            println!("{}", t!("admin.deleted"));
        }
    }
    Ok(())
}

fn task_draft(args: &TaskArgs) -> Result<GameTaskDraft, AdminError> {
    GameTaskDraft::from_form(&args.task_type, args.language, &args.data, args.order, args.xp)
        .map_err(|err| AdminError::Validation(ValidationError::from(err)))
}

fn exercise_draft(args: ExerciseArgs) -> anyhow::Result<ExerciseDraft> {
    let mut options = Vec::with_capacity(args.options.len());
    for raw in &args.options {
        let Some((key, text)) = raw.split_once('=') else {
            bail!(t!("admin.option_format", option = raw).into_owned());
        };
        options.push(ExerciseOption::new(key.trim(), text.trim()));
    }
    Ok(ExerciseDraft {
        lesson_id: args.lesson,
        question: args.question,
        options,
        answer: args.answer,
        exercise_type: args.exercise_type,
    })
}
