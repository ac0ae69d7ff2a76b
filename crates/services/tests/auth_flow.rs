mod common;

use common::{FakeApi, services, token_for};
use quest_core::model::Role;
use quest_core::model::auth::test_token;
use serde_json::json;
use services::{ApiError, AuthError, HttpMethod, ProfileLoad};
use storage::repository::StoredSession;

#[tokio::test]
async fn login_persists_and_restore_reads_back() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Post,
        "login",
        json!({"access_token": token_for(12, "admin"), "role": "admin"}),
    );
    let (app, storage) = services(&api);

    let ctx = app.auth().login(" ada@example.com ", "pw").await.unwrap();
    assert!(ctx.is_admin());
    assert_eq!(ctx.auth().unwrap().user_id().map(|id| id.value()), Some(12));

    let login = &api.calls_to(HttpMethod::Post, "login")[0];
    assert_eq!(
        login.body,
        Some(json!({"email": "ada@example.com", "password": "pw"}))
    );

    let stored = storage.sessions.load_session().await.unwrap().unwrap();
    assert_eq!(stored.email, "ada@example.com");
    assert_eq!(stored.role, Role::Admin);

    let restored = app.auth().restore().await.unwrap();
    assert_eq!(restored, ctx);

    app.auth().logout().await.unwrap();
    assert!(!app.auth().restore().await.unwrap().is_logged_in());
}

#[tokio::test]
async fn wrong_password_is_an_api_error() {
    let api = FakeApi::new();
    api.respond(
        HttpMethod::Post,
        "login",
        Err(ApiError::from_response(401, r#"{"error":"Invalid email or password"}"#)),
    );
    let (app, storage) = services(&api);
    let err = app.auth().login("a@b.c", "bad").await.unwrap_err();
    assert!(matches!(err, AuthError::Api(ApiError::Unauthorized(_))));
    assert!(storage.sessions.load_session().await.unwrap().is_none());
}

#[tokio::test]
async fn blank_credentials_never_reach_the_backend() {
    let api = FakeApi::new();
    let (app, _) = services(&api);
    assert!(matches!(
        app.auth().login("  ", "pw").await,
        Err(AuthError::MissingCredentials)
    ));
    assert!(matches!(
        app.auth().register("a@b.c", "", None).await,
        Err(AuthError::MissingCredentials)
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn register_forwards_secret_code() {
    let api = FakeApi::new();
    api.ok(
        HttpMethod::Post,
        "register",
        json!({"message": "User successfully registered", "role": "admin"}),
    );
    let (app, _) = services(&api);
    let role = app
        .auth()
        .register("a@b.c", "pw", Some("MY_CODE"))
        .await
        .unwrap();
    assert_eq!(role, Role::Admin);
    let call = &api.calls_to(HttpMethod::Post, "register")[0];
    assert_eq!(call.body.as_ref().unwrap()["secret_code"], "MY_CODE");
}

#[tokio::test]
async fn malformed_or_expired_tokens_are_cleared() {
    let api = FakeApi::new();
    let (app, storage) = services(&api);

    for token in [
        "garbage".to_owned(),
        test_token(&json!({"user_id": 1, "exp": 1_000})),
    ] {
        storage
            .sessions
            .save_session(&StoredSession {
                token,
                role: Role::User,
                email: "a@b.c".into(),
                avatar: None,
            })
            .await
            .unwrap();
        let ctx = app.auth().restore().await.unwrap();
        assert!(!ctx.is_logged_in());
        assert!(storage.sessions.load_session().await.unwrap().is_none());
        assert_eq!(app.profile().load(&ctx).await.unwrap(), ProfileLoad::LoggedOut);
    }
}
