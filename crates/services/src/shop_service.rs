use std::sync::Arc;

use quest_core::model::{
    ItemFilter, ItemType, ProfileUpdate, SessionContext, ShopItem, ShopItemId, SortOrder,
    UserProfile, arrange, can_afford,
};
use serde::Serialize;
use storage::repository::{PREF_THEME, PreferenceRepository};

use crate::api::Api;
use crate::error::{ApiError, ShopError};

#[derive(Serialize)]
struct BuyRequest {
    item_id: ShopItemId,
}

/// Shop items plus what is known about the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
    /// `None` when logged out or when the balance could not be fetched.
    pub balance: Option<u32>,
    pub avatar: Option<String>,
}

impl ShopCatalog {
    #[must_use]
    pub fn arranged(&self, filter: ItemFilter, sort: SortOrder) -> Vec<&ShopItem> {
        arrange(&self.items, filter, sort)
    }

    #[must_use]
    pub fn find(&self, id: ShopItemId) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn can_afford(&self, item: &ShopItem) -> bool {
        can_afford(self.balance, item.price_coins)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased(ShopItem),
    AlreadyOwned,
    /// Dedicated "earn more first" path, distinct from a generic failure.
    InsufficientFunds { price: u32, balance: Option<u32> },
}

#[derive(Clone)]
pub struct ShopService {
    api: Api,
    preferences: Arc<dyn PreferenceRepository>,
}

impl ShopService {
    #[must_use]
    pub fn new(api: Api, preferences: Arc<dyn PreferenceRepository>) -> Self {
        Self { api, preferences }
    }

    /// Items from `GET shop/items`; when logged in, the coin balance and
    /// avatar from `GET me` (a failure there only leaves them unknown).
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Api` if the item list cannot be fetched.
    pub async fn catalog(&self, ctx: &SessionContext) -> Result<ShopCatalog, ShopError> {
        let items: Vec<ShopItem> = self.api.get_list("shop/items", ctx.token()).await?;
        let mut catalog = ShopCatalog {
            items,
            ..ShopCatalog::default()
        };
        if let Some(token) = ctx.token() {
            match self.api.get::<UserProfile>("me", Some(token)).await {
                Ok(profile) => {
                    catalog.balance = Some(profile.coins.unwrap_or(0));
                    catalog.avatar = profile.avatar;
                }
                Err(err) => tracing::warn!(error = %err, "shop balance unavailable"),
            }
        }
        Ok(catalog)
    }

    /// Buy an item. Insufficient funds is an outcome, not an error: it is
    /// detected locally when the balance is known, otherwise from the
    /// backend's message.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn`, `UnknownItem`, or `Api` for any other failure.
    pub async fn buy(
        &self,
        ctx: &SessionContext,
        catalog: &mut ShopCatalog,
        item_id: ShopItemId,
    ) -> Result<PurchaseOutcome, ShopError> {
        let token = ctx.token().ok_or(ShopError::NotLoggedIn)?;
        let item = catalog
            .find(item_id)
            .cloned()
            .ok_or(ShopError::UnknownItem(item_id))?;
        if item.owned {
            return Ok(PurchaseOutcome::AlreadyOwned);
        }
        if catalog.balance.is_some_and(|coins| coins < item.price_coins) {
            return Ok(PurchaseOutcome::InsufficientFunds {
                price: item.price_coins,
                balance: catalog.balance,
            });
        }

        let response: Result<serde_json::Value, ApiError> = self
            .api
            .post("shop/buy", Some(token), &BuyRequest { item_id })
            .await;
        match response {
            Ok(_) => {}
            Err(ApiError::InsufficientFunds(message)) => {
                tracing::info!(%item_id, %message, "purchase refused for funds");
                return Ok(PurchaseOutcome::InsufficientFunds {
                    price: item.price_coins,
                    balance: catalog.balance,
                });
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(owned) = catalog.items.iter_mut().find(|i| i.id == item_id) {
            owned.owned = true;
        }
        catalog.balance = catalog
            .balance
            .map(|coins| coins.saturating_sub(item.price_coins));
        let mut bought = item;
        bought.owned = true;
        Ok(PurchaseOutcome::Purchased(bought))
    }

    /// Set an owned avatar as the profile picture (`PUT me {avatar}`).
    ///
    /// # Errors
    ///
    /// `NotLoggedIn`, `UnknownItem`, `NotOwned`, `WrongItemType`, `Api`.
    pub async fn equip_avatar(
        &self,
        ctx: &SessionContext,
        catalog: &mut ShopCatalog,
        item_id: ShopItemId,
    ) -> Result<String, ShopError> {
        let token = ctx.token().ok_or(ShopError::NotLoggedIn)?;
        let item = owned_item(catalog, item_id)?;
        let asset = match (&item.item_type, item.asset_url.as_deref()) {
            (ItemType::Avatar, Some(url)) if !url.trim().is_empty() => url.to_owned(),
            _ => return Err(ShopError::WrongItemType(item_id)),
        };
        let _: serde_json::Value = self
            .api
            .put("me", Some(token), &ProfileUpdate::avatar(asset.clone()))
            .await?;
        catalog.avatar = Some(asset.clone());
        Ok(asset)
    }

    /// Apply an owned theme. Themes are a local preference.
    ///
    /// # Errors
    ///
    /// `UnknownItem`, `NotOwned`, `WrongItemType`, `Storage`.
    pub async fn equip_theme(
        &self,
        catalog: &ShopCatalog,
        item_id: ShopItemId,
    ) -> Result<String, ShopError> {
        let item = owned_item(catalog, item_id)?;
        if item.item_type != ItemType::Theme {
            return Err(ShopError::WrongItemType(item_id));
        }
        let theme = item
            .asset_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| item.name.clone());
        self.preferences.set_preference(PREF_THEME, &theme).await?;
        Ok(theme)
    }

    /// # Errors
    ///
    /// Returns `ShopError::Storage` on storage failure.
    pub async fn current_theme(&self) -> Result<Option<String>, ShopError> {
        Ok(self.preferences.get_preference(PREF_THEME).await?)
    }
}

fn owned_item(catalog: &ShopCatalog, item_id: ShopItemId) -> Result<&ShopItem, ShopError> {
    let item = catalog.find(item_id).ok_or(ShopError::UnknownItem(item_id))?;
    if !item.owned {
        return Err(ShopError::NotOwned(item_id));
    }
    Ok(item)
}
