//! Category tree commands.

use anyhow::Result;
use bazaar_commerce::ids::CategoryId;
use dialoguer::Confirm;

use super::{CategoryArgs, CategoryCommand};
use crate::context::Context;

/// Run the category command.
pub async fn run(args: CategoryArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let operator = ctx.operator();

    match args.command {
        CategoryCommand::List => {
            let categories = shop.categories.list_categories().await?;
            if ctx.output.is_json() {
                ctx.output.json(&categories);
                return Ok(());
            }
            if categories.is_empty() {
                ctx.output.info("No categories yet. Add one with `bazaar category add <name>`.");
                return Ok(());
            }

            ctx.output.header("Categories");
            for root in categories.iter().filter(|c| c.is_root()) {
                ctx.output.list_item(&format!("{}  ({})", root.name, root.id));
                for child in categories.iter().filter(|c| root.is_parent_of(c)) {
                    ctx.output.list_item(&format!("  └ {}  ({})", child.name, child.id));
                }
            }
        }
        CategoryCommand::Add { name, parent } => {
            let parent = parent.map(CategoryId::new);
            let category = shop
                .categories
                .create_category(&operator, &name, parent.is_some(), parent.as_ref())
                .await?;
            if ctx.output.is_json() {
                ctx.output.json(&category);
            } else {
                ctx.output.success(&format!("Created {} ({})", category.name, category.id));
            }
        }
        CategoryCommand::Rename { id, name } => {
            let category = shop
                .categories
                .update_category(&operator, &CategoryId::new(id), &name)
                .await?;
            ctx.output.success(&format!("Renamed {} to {}", category.id, category.name));
        }
        CategoryCommand::Delete { id, yes } => {
            let id = CategoryId::new(id);
            let category = shop.categories.get_category(&id).await?;

            if category.is_root() {
                let children = shop.categories.list_subcategories(&id).await?;
                if !yes && !children.is_empty() {
                    ctx.output.warn(&format!(
                        "{} has {} subcategories that will be deleted too",
                        category.name,
                        children.len()
                    ));
                }
                if !yes && !confirm(&format!("Delete category {}?", category.name))? {
                    ctx.output.info("Aborted");
                    return Ok(());
                }
                let removed = shop.categories.delete_category(&operator, &id).await?;
                ctx.output.success(&format!("Deleted {} categories", removed));
            } else {
                if !yes && !confirm(&format!("Delete subcategory {}?", category.name))? {
                    ctx.output.info("Aborted");
                    return Ok(());
                }
                shop.categories.delete_subcategory(&operator, &id).await?;
                ctx.output.success(&format!("Deleted subcategory {}", category.name));
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
