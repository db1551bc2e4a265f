//! Product catalog commands.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use bazaar_commerce::catalog::{Product, ProductDraft, ProductPatch};
use bazaar_commerce::ids::{CategoryId, ProductId};
use bazaar_commerce::money::{Currency, Money};
use bazaar_core::{ProductQuery, ProductUploads, Upload};
use dialoguer::Confirm;

use super::{ProductArgs, ProductCommand};
use crate::context::Context;
use crate::output::{format_timestamp, truncate};

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let operator = ctx.operator();
    let currency = Currency::from_code(&ctx.config.shop.currency).unwrap_or_default();

    match args.command {
        ProductCommand::List {
            category,
            search,
            featured,
            page,
        } => {
            let query = ProductQuery {
                category_id: category.map(CategoryId::new),
                search,
                featured_only: featured,
                page,
                ..Default::default()
            };
            let products = shop.products.list_products(&query).await?;
            if ctx.output.is_json() {
                ctx.output.json(&products);
                return Ok(());
            }
            if products.is_empty() {
                ctx.output.info("No products match");
                return Ok(());
            }

            let widths = [24, 32, 12, 8];
            ctx.output.header(&format!(
                "Products {}-{} of {}",
                products.pagination.start_item(),
                products.pagination.end_item(),
                products.pagination.total
            ));
            ctx.output.table_row(&["ID", "NAME", "PRICE", "FEATURED"], &widths);
            for product in &products.items {
                let name = truncate(&product.name, 32);
                let price = product.price.display();
                let featured = if product.featured { "yes" } else { "" };
                ctx.output
                    .table_row(&[product.id.as_str(), &name, &price, featured], &widths);
            }
            if products.pagination.has_next {
                ctx.output
                    .info(&format!("More on page {}", products.pagination.page + 1));
            }
        }
        ProductCommand::Show { id } => {
            let product = shop.products.get_product(&ProductId::new(id)).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                print_product(ctx, &product);
            }
        }
        ProductCommand::Add {
            name,
            price,
            category,
            subcategory,
            description,
            featured,
            features,
            image,
            video_url,
        } => {
            let draft = ProductDraft {
                name,
                price: parse_price(&price, currency)?,
                description,
                category_id: CategoryId::new(category),
                subcategory_id: subcategory.map(CategoryId::new),
                featured,
                rating: 0.0,
                reviews: 0,
                features,
                video_url,
            };
            let uploads = ProductUploads {
                image: image.as_deref().map(read_upload).transpose()?,
                ..Default::default()
            };
            let product = shop.products.create_product(&operator, draft, uploads).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.success(&format!("Created {} ({})", product.name, product.id));
            }
        }
        ProductCommand::Update {
            id,
            name,
            price,
            featured,
        } => {
            let patch = ProductPatch {
                name,
                price: price.map(|p| parse_price(&p, currency)).transpose()?,
                featured,
                ..Default::default()
            };
            let product = shop
                .products
                .update_product(&operator, &ProductId::new(id), patch, ProductUploads::default())
                .await?;
            ctx.output.success(&format!("Updated {} ({})", product.name, product.id));
        }
        ProductCommand::Delete { id, yes } => {
            let id = ProductId::new(id);
            let product = shop.products.get_product(&id).await?;
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {}? It will be removed from every cart.", product.name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.info("Aborted");
                    return Ok(());
                }
            }
            shop.products.delete_product(&operator, &id).await?;
            ctx.output.success(&format!("Deleted {}", product.name));
        }
    }

    Ok(())
}

fn print_product(ctx: &Context, product: &Product) {
    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("price", &product.price.display());
    ctx.output.kv("category", product.category_id.as_str());
    if let Some(ref sub) = product.subcategory_id {
        ctx.output.kv("subcategory", sub.as_str());
    }
    ctx.output.kv("featured", &product.featured.to_string());
    ctx.output.kv(
        "rating",
        &format!("{:.1} ({} reviews)", product.rating, product.reviews),
    );
    if !product.description.is_empty() {
        ctx.output.kv("description", &product.description);
    }
    if let Some(ref image) = product.image_url {
        ctx.output.kv("image", image);
    }
    if let Some(video) = product.video.url() {
        ctx.output.kv("video", video);
    }
    for feature in &product.features {
        ctx.output.list_item(feature);
    }
    for doc in &product.documents {
        ctx.output.list_item(&format!("{}: {}", doc.name, doc.url));
    }
    ctx.output.kv("created", &format_timestamp(product.created_at));
    ctx.output.kv("updated", &format_timestamp(product.updated_at));
}

fn parse_price(input: &str, currency: Currency) -> Result<Money> {
    match Money::parse(input, currency) {
        Some(price) => Ok(price),
        None => bail!("Invalid price for {}: {}", currency, input),
    }
}

fn read_upload(path: &str) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(Upload::new(file_name, bytes))
}
