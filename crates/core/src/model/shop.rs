use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::ShopItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Avatar,
    Theme,
    #[serde(untagged)]
    Other(String),
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "avatar" => Self::Avatar,
            "theme" => Self::Theme,
            _ => Self::Other(raw),
        })
    }
}

/// A cosmetic item from `GET /shop/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: ShopItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub item_type: ItemType,
    #[serde(default)]
    pub price_coins: u32,
    #[serde(default)]
    pub asset_url: Option<String>,
    #[serde(default)]
    pub owned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Owned,
    Available,
}

impl FromStr for ItemFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "owned" => Ok(Self::Owned),
            "available" => Ok(Self::Available),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Filter then sort a catalog. Sorting is stable so `Default` keeps backend order.
#[must_use]
pub fn arrange<'a>(items: &'a [ShopItem], filter: ItemFilter, sort: SortOrder) -> Vec<&'a ShopItem> {
    let mut result: Vec<&ShopItem> = items
        .iter()
        .filter(|item| match filter {
            ItemFilter::All => true,
            ItemFilter::Owned => item.owned,
            ItemFilter::Available => !item.owned,
        })
        .collect();
    match sort {
        SortOrder::Default => {}
        SortOrder::PriceAsc => result.sort_by_key(|item| item.price_coins),
        SortOrder::PriceDesc => result.sort_by_key(|item| std::cmp::Reverse(item.price_coins)),
    }
    result
}

/// An unknown balance (logged out or not yet loaded) never affords anything.
#[must_use]
pub fn can_afford(balance: Option<u32>, price: u32) -> bool {
    balance.is_some_and(|coins| coins >= price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, price: u32, owned: bool) -> ShopItem {
        ShopItem {
            id: ShopItemId::new(id),
            name: format!("item {id}"),
            description: None,
            item_type: ItemType::Avatar,
            price_coins: price,
            asset_url: None,
            owned,
        }
    }

    #[test]
    fn arrange_filters_and_sorts() {
        let items = vec![item(1, 30, false), item(2, 10, true), item(3, 20, false)];
        let asc: Vec<_> = arrange(&items, ItemFilter::All, SortOrder::PriceAsc)
            .iter()
            .map(|i| i.id.value())
            .collect();
        assert_eq!(asc, vec![2, 3, 1]);

        let available: Vec<_> = arrange(&items, ItemFilter::Available, SortOrder::PriceDesc)
            .iter()
            .map(|i| i.id.value())
            .collect();
        assert_eq!(available, vec![1, 3]);

        let owned = arrange(&items, ItemFilter::Owned, SortOrder::Default);
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn affordability_requires_known_balance() {
        assert!(can_afford(Some(50), 50));
        assert!(!can_afford(Some(49), 50));
        assert!(!can_afford(None, 0));
    }

    #[test]
    fn unknown_item_types_are_kept() {
        let parsed: ShopItem = serde_json::from_str(
            r#"{"id":4,"name":"Frame","item_type":"frame","price_coins":5}"#,
        )
        .unwrap();
        assert_eq!(parsed.item_type, ItemType::Other("frame".into()));
        assert!(!parsed.owned);
        let theme: ItemType = serde_json::from_str(r#""Theme""#).unwrap();
        assert_eq!(theme, ItemType::Theme);
    }
}
