mod common;

use common::{FakeApi, services, session};
use quest_core::model::{ItemFilter, Role, SessionContext, ShopItemId, SortOrder};
use serde_json::json;
use services::{ApiError, HttpMethod, PurchaseOutcome, ShopError};

fn items() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Fox", "item_type": "avatar", "price_coins": 50, "asset_url": "/a/fox.png"},
        {"id": 2, "name": "Dark", "item_type": "theme", "price_coins": 20, "asset_url": "dark", "owned": true},
        {"id": 3, "name": "Crown", "item_type": "avatar", "price_coins": 500, "asset_url": "/a/crown.png"},
        {"id": 4, "name": "Broken"}
    ])
}

#[tokio::test]
async fn catalog_reads_balance_and_sorts() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Get, "shop/items", items());
    api.ok(HttpMethod::Get, "me", json!({"email": "a@b.c", "coins": 60, "avatar": "/a/cat.png"}));
    let (app, _) = services(&api);

    let catalog = app.shop().catalog(&session(1, Role::User)).await.unwrap();
    assert_eq!(catalog.items.len(), 3);
    assert_eq!(catalog.balance, Some(60));
    assert_eq!(catalog.avatar.as_deref(), Some("/a/cat.png"));

    let cheapest_first: Vec<u64> = catalog
        .arranged(ItemFilter::All, SortOrder::PriceAsc)
        .iter()
        .map(|i| i.id.value())
        .collect();
    assert_eq!(cheapest_first, vec![2, 1, 3]);
    let available: Vec<u64> = catalog
        .arranged(ItemFilter::Available, SortOrder::PriceDesc)
        .iter()
        .map(|i| i.id.value())
        .collect();
    assert_eq!(available, vec![3, 1]);
}

#[tokio::test]
async fn anonymous_catalog_has_unknown_balance() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Get, "shop/items", items());
    let (app, _) = services(&api);
    let anonymous = SessionContext::anonymous();

    let mut catalog = app.shop().catalog(&anonymous).await.unwrap();
    assert_eq!(catalog.balance, None);
    assert!(!catalog.can_afford(catalog.find(ShopItemId::new(1)).unwrap()));
    assert!(api.calls_to(HttpMethod::Get, "me").is_empty());
    assert!(matches!(
        app.shop().buy(&anonymous, &mut catalog, ShopItemId::new(1)).await,
        Err(ShopError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn insufficient_funds_is_detected_locally_and_remotely() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Get, "shop/items", items());
    api.ok(HttpMethod::Get, "me", json!({"email": "a@b.c", "coins": 60}));
    api.respond(
        HttpMethod::Post,
        "shop/buy",
        Err(ApiError::from_response(400, r#"{"error":"Not enough coins"}"#)),
    );
    let (app, _) = services(&api);
    let ctx = session(1, Role::User);
    let mut catalog = app.shop().catalog(&ctx).await.unwrap();

    let local = app.shop().buy(&ctx, &mut catalog, ShopItemId::new(3)).await.unwrap();
    assert_eq!(
        local,
        PurchaseOutcome::InsufficientFunds {
            price: 500,
            balance: Some(60)
        }
    );
    assert!(api.calls_to(HttpMethod::Post, "shop/buy").is_empty());

    let remote = app.shop().buy(&ctx, &mut catalog, ShopItemId::new(1)).await.unwrap();
    assert!(matches!(remote, PurchaseOutcome::InsufficientFunds { price: 50, .. }));
    assert!(!catalog.find(ShopItemId::new(1)).unwrap().owned);
}

#[tokio::test]
async fn purchase_marks_owned_and_equips() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Get, "shop/items", items());
    api.ok(HttpMethod::Get, "me", json!({"email": "a@b.c", "coins": 60}));
    api.ok(HttpMethod::Post, "shop/buy", json!({"message": "Purchased"}));
    api.ok(HttpMethod::Put, "me", json!({"message": "ok"}));
    let (app, _) = services(&api);
    let ctx = session(1, Role::User);
    let mut catalog = app.shop().catalog(&ctx).await.unwrap();

    let outcome = app.shop().buy(&ctx, &mut catalog, ShopItemId::new(1)).await.unwrap();
    assert!(matches!(outcome, PurchaseOutcome::Purchased(ref item) if item.owned));
    assert_eq!(catalog.balance, Some(10));
    assert_eq!(
        api.calls_to(HttpMethod::Post, "shop/buy")[0].body,
        Some(json!({"item_id": 1}))
    );
    assert_eq!(
        app.shop().buy(&ctx, &mut catalog, ShopItemId::new(1)).await.unwrap(),
        PurchaseOutcome::AlreadyOwned
    );

    let avatar = app
        .shop()
        .equip_avatar(&ctx, &mut catalog, ShopItemId::new(1))
        .await
        .unwrap();
    assert_eq!(avatar, "/a/fox.png");
    assert_eq!(
        api.calls_to(HttpMethod::Put, "me")[0].body,
        Some(json!({"avatar": "/a/fox.png"}))
    );
}

#[tokio::test]
async fn themes_must_be_owned_and_are_stored_locally() {
    let api = FakeApi::new();
    api.ok(HttpMethod::Get, "shop/items", items());
    let (app, _) = services(&api);
    let catalog = app.shop().catalog(&SessionContext::anonymous()).await.unwrap();

    assert!(matches!(
        app.shop().equip_theme(&catalog, ShopItemId::new(3)).await,
        Err(ShopError::NotOwned(_))
    ));
    assert_eq!(
        app.shop().equip_theme(&catalog, ShopItemId::new(2)).await.unwrap(),
        "dark"
    );
    assert_eq!(app.shop().current_theme().await.unwrap().as_deref(), Some("dark"));
}
