mod common;

use common::{FakeApi, services, session};
use quest_core::model::{
    ExerciseDraft, ExerciseId, ExerciseOption, GameId, GameTaskDraft, GameTaskId, LessonId,
    ProgrammingLanguage, Role, SessionContext,
};
use serde_json::json;
use services::{AdminError, HttpMethod};

#[tokio::test]
async fn non_admins_are_refused_locally() {
    let api = FakeApi::new();
    let (app, _) = services(&api);
    for ctx in [SessionContext::anonymous(), session(2, Role::User)] {
        assert!(matches!(app.admin().users(&ctx).await, Err(AdminError::NotAdmin)));
        assert!(matches!(
            app.admin().delete_task(&ctx, GameId::new(1), GameTaskId::new(2)).await,
            Err(AdminError::NotAdmin)
        ));
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn admin_manages_exercises_and_tasks() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Post,
        "exercises",
        json!({"id": 9, "question": "Q", "options": {"a": "yes", "b": "no"}, "answer": "a"}),
    );
    api.ok(HttpMethod::Put, "exercises/9", json!({"message": "updated"}));
    api.ok(HttpMethod::Post, "admin/games/1/tasks", json!({"id": 4}));
    api.ok(HttpMethod::Delete, "admin/games/1/tasks/4", serde_json::Value::Null);
    api.ok(
        HttpMethod::Get,
        "admin/games/1/tasks",
        json!([{"id": 5, "order": 2}, {"id": 4, "order": 1}]),
    );
    let (app, _) = services(&api);
    let ctx = session(1, Role::Admin);
    let admin = app.admin();

    let draft = ExerciseDraft {
        lesson_id: LessonId::new(3),
        question: " Q ".into(),
        options: vec![ExerciseOption::new("a", "yes"), ExerciseOption::new("b", "no")],
        answer: "a".into(),
        exercise_type: "multiple_choice".into(),
    };
    let created = admin.create_exercise(&ctx, draft.clone()).await.unwrap();
    assert_eq!(created.options.as_ref().map(Vec::len), Some(2));
    assert_eq!(
        api.calls_to(HttpMethod::Post, "exercises")[0].body.as_ref().unwrap()["question"],
        "Q"
    );

    admin
        .update_exercise(&ctx, ExerciseId::new(9), draft.clone())
        .await
        .unwrap();
    assert_eq!(api.calls_to(HttpMethod::Put, "exercises/9").len(), 1);

    let empty = ExerciseDraft {
        answer: "  ".into(),
        ..draft
    };
    assert!(matches!(
        admin.create_exercise(&ctx, empty).await,
        Err(AdminError::Validation(_))
    ));

    let task = GameTaskDraft::from_form(
        "memory_code",
        ProgrammingLanguage::Python,
        r#"{"code": "print(1)"}"#,
        None,
        None,
    )
    .unwrap();
    admin.create_task(&ctx, GameId::new(1), &task).await.unwrap();
    let body = api.calls_to(HttpMethod::Post, "admin/games/1/tasks")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["order"], 0);
    assert_eq!(body["xp_reward"], 50);
    assert_eq!(body["task_data"]["code"], "print(1)");

    let tasks = admin.tasks(&ctx, GameId::new(1)).await.unwrap();
    assert_eq!(tasks[0].id, GameTaskId::new(4));
    admin
        .delete_task(&ctx, GameId::new(1), GameTaskId::new(4))
        .await
        .unwrap();
}

#[tokio::test]
async fn leaderboard_flags_current_user_and_splits_podium() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Get,
        "leaderboard?limit=20",
        json!([
            {"id": 5, "username": "ada", "xp": 900},
            {"id": 7, "username": "bob", "xp": 800},
            {"id": 1, "username": "cy", "xp": 700},
            {"id": 9, "username": "dee", "xp": 10}
        ]),
    );
    let (app, _) = services(&api);

    let board = app
        .leaderboard()
        .standings(&session(9, Role::User), None)
        .await
        .unwrap();
    let (top, rest) = board.podium();
    assert_eq!(top.len(), 3);
    assert_eq!(rest.len(), 1);
    let me = board.current_user().unwrap();
    assert_eq!(me.rank, 4);
    assert_eq!(me.entry.name, "dee");
    assert!(api.calls_to(HttpMethod::Get, "leaderboard?limit=20")[0].token.is_none());
}
