mod common;

use std::collections::BTreeSet;

use common::{FakeApi, services, session};
use quest_core::games::{GameAnswer, GamePhase, GameStep};
use quest_core::model::{GameKind, ProgrammingLanguage, Role, SessionContext};
use serde_json::json;
use services::{GameServiceError, HttpMethod};

const RANDOM_BUGS: &str = "games/bug-infection/tasks/random?language=java";

#[tokio::test]
async fn three_rounds_then_finished_with_total() {
    let api = FakeApi::new();
    for (id, xp) in [(1, 30), (2, 40), (3, 0)] {
        api.ok(
            HttpMethod::Get,
            RANDOM_BUGS,
            json!({
                "id": id,
                "task_type": "bug_infection",
                "language": "java",
                "xp_reward": xp,
                "task_data": {"code": "int x", "bugs": ["a", "b", "c"], "correct_bugs": [0, 2]}
            }),
        );
    }
    let (app, _) = services(&api);
    let ctx = session(1, Role::User);
    let games = app.games();

    let mut game = games
        .start(&ctx, GameKind::BugInfection, ProgrammingLanguage::Java)
        .await
        .unwrap();
    let right: BTreeSet<usize> = [0, 2].into_iter().collect();
    let wrong: BTreeSet<usize> = [1].into_iter().collect();

    assert!(game.run.submit(&GameAnswer::Selection(right.clone())).unwrap().correct);
    assert_eq!(
        games.advance(&ctx, &mut game).await.unwrap(),
        GameStep::NextRound { round: 2 }
    );
    assert!(!game.run.submit(&GameAnswer::Selection(wrong)).unwrap().correct);
    games.advance(&ctx, &mut game).await.unwrap();
    // xp_reward 0 falls back to the default reward
    game.run.submit(&GameAnswer::Selection(right)).unwrap();
    assert_eq!(
        games.advance(&ctx, &mut game).await.unwrap(),
        GameStep::Finished { total_xp: 80 }
    );
    assert_eq!(game.run.phase(), GamePhase::Finished);
    assert_eq!(api.calls_to(HttpMethod::Get, RANDOM_BUGS).len(), 3);
}

#[tokio::test]
async fn advancing_before_scoring_is_refused() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Get,
        "games/memory-code/tasks/random?language=javascript",
        json!({"id": 5, "task_data": {"code": "let a = 1;"}}),
    );
    let (app, _) = services(&api);
    let ctx = SessionContext::anonymous();

    let mut game = app
        .games()
        .start(&ctx, GameKind::MemoryCode, ProgrammingLanguage::default())
        .await
        .unwrap();
    assert_eq!(game.run.phase(), GamePhase::Memorize);
    assert!(matches!(
        app.games().advance(&ctx, &mut game).await,
        Err(GameServiceError::Game(_))
    ));
}

#[tokio::test]
async fn catalog_lists_games() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Get,
        "games",
        json!([{"id": 1, "game_id": "refactor-rush", "title": "Refactor Rush", "xp_reward": 50}]),
    );
    let (app, _) = services(&api);
    let games = app.games().catalog(&SessionContext::anonymous()).await.unwrap();
    assert_eq!(games[0].kind(), Some(GameKind::RefactorRush));
}
