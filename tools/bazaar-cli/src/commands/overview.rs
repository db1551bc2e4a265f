//! Dashboard numbers.

use anyhow::Result;
use serde_json::json;

use super::OverviewArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the overview command.
pub async fn run(args: OverviewArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let operator = ctx.operator();

    let overview = shop.admin.overview(&operator).await?;
    let tree = if args.tree {
        Some(shop.admin.catalog_tree(&operator).await?)
    } else {
        None
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "overview": overview, "tree": tree }));
        return Ok(());
    }

    ctx.output.header(&ctx.config.shop.name);
    ctx.output.kv("categories", &overview.categories.to_string());
    ctx.output.kv("subcategories", &overview.subcategories.to_string());
    ctx.output.kv(
        "products",
        &format!("{} ({} featured)", overview.products, overview.featured_products),
    );
    ctx.output.kv("orders", &overview.orders.to_string());
    for entry in &overview.orders_by_status {
        ctx.output
            .list_item(&format!("{}: {}", status_badge(entry.status), entry.count));
    }
    ctx.output.kv("revenue", &overview.revenue.display());

    if let Some(tree) = tree {
        ctx.output.header("Catalog");
        for node in &tree {
            ctx.output.list_item(&format!(
                "{} ({} products)",
                node.category.name, node.product_count
            ));
            for sub in &node.subcategories {
                ctx.output.list_item(&format!("  └ {}", sub.name));
            }
        }
    }

    Ok(())
}
