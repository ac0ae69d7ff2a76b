use quest_core::model::{ItemFilter, ItemType, ShopItem, ShopItemId, SortOrder};
use rust_i18n::t;
use services::{PurchaseOutcome, ShopCatalog, ShopError};

use super::Context;
use crate::cli::ShopCommand;

pub async fn run(ctx: &Context, command: ShopCommand) -> anyhow::Result<()> {
    match command {
        ShopCommand::List { sort, filter } => list(ctx, sort, filter).await,
        ShopCommand::Buy { item } => buy(ctx, item).await,
        ShopCommand::Equip { item } => equip(ctx, item).await,
    }
}

async fn list(ctx: &Context, sort: SortOrder, filter: ItemFilter) -> anyhow::Result<()> {
    let shop = ctx.services.shop();
    let catalog = shop.catalog(&ctx.session).await?;
    match catalog.balance {
        Some(coins) => println!("{}", t!("shop.balance", coins = coins)),
        None => println!("{}", t!("shop.balance_unknown")),
    }
    if let Some(theme) = shop.current_theme().await? {
        println!("{}", t!("shop.theme", theme = theme));
    }

    let items = catalog.arranged(filter, sort);
    if items.is_empty() {
        println!("{}", t!("shop.empty"));
    }
    for item in items {
        println!("{}", describe_item(&catalog, item));
    }
    Ok(())
}

fn describe_item(catalog: &ShopCatalog, item: &ShopItem) -> String {
    let kind = match &item.item_type {
        ItemType::Avatar => t!("shop.type_avatar").into_owned(),
        ItemType::Theme => t!("shop.type_theme").into_owned(),
        ItemType::Other(other) => other.clone(),
    };
    let state = if item.owned {
        t!("shop.owned")
    } else if catalog.can_afford(item) {
        t!("shop.affordable")
    } else {
        t!("shop.locked")
    };
    format!(
        "{:>4}  {:<20} {kind:<8} {:>6}  {state}",
        item.id.value(),
        item.name,
        item.price_coins
    )
}

async fn buy(ctx: &Context, item: ShopItemId) -> anyhow::Result<()> {
    let shop = ctx.services.shop();
    let mut catalog = shop.catalog(&ctx.session).await?;
    match shop.buy(&ctx.session, &mut catalog, item).await? {
        PurchaseOutcome::Purchased(bought) => {
            println!("{}", t!("shop.purchased", name = bought.name));
            if let Some(coins) = catalog.balance {
                println!("{}", t!("shop.balance", coins = coins));
            }
        }
        PurchaseOutcome::AlreadyOwned => println!("{}", t!("shop.already_owned")),
        PurchaseOutcome::InsufficientFunds { price, balance } => {
            let balance = balance.map_or_else(|| "?".to_owned(), |coins| coins.to_string());
            println!(
                "{}",
                t!("shop.insufficient_funds", price = price, balance = balance)
            );
        }
    }
    Ok(())
}

async fn equip(ctx: &Context, item: ShopItemId) -> anyhow::Result<()> {
    let shop = ctx.services.shop();
    let mut catalog = shop.catalog(&ctx.session).await?;
    let kind = catalog
        .find(item)
        .map(|found| found.item_type.clone())
        .ok_or(ShopError::UnknownItem(item))?;
    match kind {
        ItemType::Avatar => {
            let avatar = shop.equip_avatar(&ctx.session, &mut catalog, item).await?;
            println!("{}", t!("shop.avatar_equipped", avatar = avatar));
        }
        ItemType::Theme => {
            let theme = shop.equip_theme(&catalog, item).await?;
            println!("{}", t!("shop.theme_equipped", theme = theme));
        }
        ItemType::Other(_) => return Err(ShopError::WrongItemType(item).into()),
    }
    Ok(())
}
