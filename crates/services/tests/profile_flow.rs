mod common;

use common::{FakeApi, services, session, token_for};
use quest_core::model::{ProfileUpdate, Role, UserProfile};
use serde_json::json;
use services::{ApiError, HttpMethod, ProfileError, ProfileLoad};

#[tokio::test]
async fn fresh_profile_is_cached_and_reused_offline() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Get,
        "me",
        json!({"id": 1, "email": "user1@example.com", "xp": 250, "coins": 30, "level": 3}),
    );
    api.respond(HttpMethod::Get, "me", Err(ApiError::Network("offline".into())));
    let (app, storage) = services(&api);
    let ctx = session(1, Role::User);

    let fresh = app.profile().load(&ctx).await.unwrap();
    let ProfileLoad::Fresh(profile) = fresh else {
        panic!("expected fresh profile");
    };
    assert_eq!(profile.xp, Some(250));
    assert_eq!(
        storage.sessions.cached_profile().await.unwrap(),
        Some(profile.clone())
    );

    let offline = app.profile().load(&ctx).await.unwrap();
    assert_eq!(offline, ProfileLoad::Cached(profile));
}

#[tokio::test]
async fn offline_without_cache_falls_back_to_session() {
    let api = FakeApi::new();
    api.respond(HttpMethod::Get, "me", Err(ApiError::Network("offline".into())));
    let (app, _) = services(&api);
    let ctx = session(4, Role::Admin);

    let load = app.profile().load(&ctx).await.unwrap();
    assert_eq!(
        load,
        ProfileLoad::Cached(UserProfile::fallback("user4@example.com", Role::Admin))
    );
    let progress = app.profile().progress(&ctx).await.unwrap();
    assert_eq!(progress.level, 1);
    assert_eq!(progress.level_title, "Beginner");
    assert_eq!(progress.xp_to_next_level, 100);
}

#[tokio::test]
async fn next_login_does_not_see_previous_users_profile() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Post,
        "login",
        json!({"access_token": token_for(1, "user"), "role": "user"}),
    );
    api.ok(
        HttpMethod::Post,
        "login",
        json!({"access_token": token_for(2, "user"), "role": "user"}),
    );
    api.ok(
        HttpMethod::Get,
        "me",
        json!({"id": 1, "email": "alice@example.com", "xp": 5000, "coins": 999}),
    );
    api.respond(HttpMethod::Get, "me", Err(ApiError::Network("offline".into())));
    let (app, _) = services(&api);

    let alice = app.auth().login("alice@example.com", "pw").await.unwrap();
    assert!(matches!(
        app.profile().load(&alice).await.unwrap(),
        ProfileLoad::Fresh(_)
    ));

    let bob = app.auth().login("bob@example.com", "pw").await.unwrap();
    assert_eq!(
        app.profile().load(&bob).await.unwrap(),
        ProfileLoad::Cached(UserProfile::fallback("bob@example.com", Role::User))
    );
}

#[tokio::test]
async fn rejected_token_expires_the_session() {
    let api = FakeApi::new();
    api.respond(
        HttpMethod::Get,
        "me",
        Err(ApiError::from_response(401, r#"{"error":"Token has expired"}"#)),
    );
    let (app, storage) = services(&api);
    let ctx = session(1, Role::User);

    assert_eq!(
        app.profile().load(&ctx).await.unwrap(),
        ProfileLoad::SessionExpired
    );
    assert!(storage.sessions.load_session().await.unwrap().is_none());
    assert!(matches!(
        app.profile().progress(&ctx).await,
        Err(ProfileError::SessionExpired)
    ));
}

#[tokio::test]
async fn update_trims_fields_and_refreshes() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Put, "me", json!({"message": "ok"}));
    api.ok(
        HttpMethod::Get,
        "me",
        json!({"email": "new@example.com", "username": "neo"}),
    );
    let (app, _) = services(&api);
    let ctx = session(1, Role::User);

    let update = ProfileUpdate {
        username: Some("  neo ".into()),
        email: Some(" new@example.com ".into()),
        avatar: None,
    };
    let profile = app.profile().update(&ctx, update).await.unwrap();
    assert_eq!(profile.display_name(), "neo");
    let put = &api.calls_to(HttpMethod::Put, "me")[0];
    assert_eq!(
        put.body,
        Some(json!({"username": "neo", "email": "new@example.com"}))
    );

    let blank = ProfileUpdate {
        email: Some("   ".into()),
        ..ProfileUpdate::default()
    };
    assert!(matches!(
        app.profile().update(&ctx, blank).await,
        Err(ProfileError::Validation(_))
    ));
}

#[tokio::test]
async fn history_requires_login_and_skips_bad_rows() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Get,
        "me/lessons-history",
        json!([
            {"lesson_id": 3, "title": "Variables", "completed_at": "2024-05-01T10:00:00Z"},
            {"lesson_title": "missing id"}
        ]),
    );
    let (app, _) = services(&api);

    let history = app.profile().history(&session(1, Role::User)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].lesson_title, "Variables");

    let anonymous = quest_core::model::SessionContext::anonymous();
    assert!(matches!(
        app.profile().history(&anonymous).await,
        Err(ProfileError::NotLoggedIn)
    ));
}
