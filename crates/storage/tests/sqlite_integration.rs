use quest_core::model::{Role, UserProfile};
use storage::repository::{
    PREF_LOCALE, PREF_THEME, PreferenceRepository, SessionRepository, Storage, StoredSession,
};
use storage::sqlite::SqliteRepository;

fn stored(email: &str) -> StoredSession {
    StoredSession {
        token: "header.payload.sig".into(),
        role: Role::Admin,
        email: email.into(),
        avatar: Some("/avatars/fox.png".into()),
    }
}

#[tokio::test]
async fn sqlite_session_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_session?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_session().await.unwrap().is_none());
    repo.save_session(&stored("ada@example.com")).await.unwrap();
    repo.save_session(&stored("grace@example.com")).await.unwrap();

    let loaded = repo.load_session().await.unwrap().expect("session");
    assert_eq!(loaded.email, "grace@example.com");
    assert_eq!(loaded.role, Role::Admin);
    assert_eq!(loaded.avatar.as_deref(), Some("/avatars/fox.png"));
}

#[tokio::test]
async fn sqlite_clear_removes_cached_profile() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_profile?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut profile = UserProfile::fallback("ada@example.com", Role::User);
    profile.coins = Some(120);
    profile.progress_percentage = Some(42.5);
    repo.save_session(&stored("ada@example.com")).await.unwrap();
    repo.cache_profile(&profile).await.unwrap();
    assert_eq!(repo.cached_profile().await.unwrap(), Some(profile));

    repo.clear_session().await.unwrap();
    assert!(repo.load_session().await.unwrap().is_none());
    assert!(repo.cached_profile().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_new_login_drops_previous_profile() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_relogin?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_session(&stored("ada@example.com")).await.unwrap();
    repo.cache_profile(&UserProfile::fallback("ada@example.com", Role::Admin))
        .await
        .unwrap();
    repo.save_session(&stored("grace@example.com")).await.unwrap();

    assert!(repo.cached_profile().await.unwrap().is_none());
    let loaded = repo.load_session().await.unwrap().expect("session");
    assert_eq!(loaded.email, "grace@example.com");
}

#[tokio::test]
async fn sqlite_storage_preferences_survive_migrate_twice() {
    let url = "sqlite:file:memdb_prefs?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("storage");
    storage
        .preferences
        .set_preference(PREF_LOCALE, "pl")
        .await
        .unwrap();
    storage
        .preferences
        .set_preference(PREF_THEME, "dark")
        .await
        .unwrap();

    let again = SqliteRepository::connect(url).await.expect("connect");
    again.migrate().await.expect("second migrate is a no-op");
    assert_eq!(
        again.get_preference(PREF_LOCALE).await.unwrap().as_deref(),
        Some("pl")
    );
    assert_eq!(
        again.get_preference(PREF_THEME).await.unwrap().as_deref(),
        Some("dark")
    );
    assert!(again.get_preference("missing").await.unwrap().is_none());
}
