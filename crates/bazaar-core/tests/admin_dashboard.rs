//! Back-office aggregation over a populated shop.

use std::sync::Arc;

use bazaar_commerce::prelude::*;
use bazaar_core::{
    LocalFileStorage, OfflineGateway, OrderQuery, ProductUploads, RequestContext, Storefront,
    StorefrontOptions,
};
use bazaar_store::InMemoryStore;

fn shop(dir: &tempfile::TempDir) -> Storefront {
    Storefront::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(LocalFileStorage::new(dir.path(), "/static")),
        Arc::new(OfflineGateway::new("rzp_test")),
        StorefrontOptions::default(),
    )
}

fn draft(name: &str, price: i64, category: &Category, sub: Option<&Category>) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price: Money::new(price, Currency::INR),
        description: String::new(),
        category_id: category.id.clone(),
        subcategory_id: sub.map(|s| s.id.clone()),
        featured: name.starts_with("Solar"),
        rating: 4.5,
        reviews: 3,
        features: Vec::new(),
        video_url: None,
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "1".to_string(),
        address: "12 MG Road".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_overview_and_tree() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop(&dir);
    let admin = RequestContext::admin("admin");
    let customer = RequestContext::customer("u1");

    let energy = shop.categories.create_category(&admin, "Energy", false, None).await.unwrap();
    let solar = shop
        .categories
        .create_category(&admin, "Solar", true, Some(&energy.id))
        .await
        .unwrap();
    let lighting = shop.categories.create_category(&admin, "Lighting", false, None).await.unwrap();

    let panel = shop
        .products
        .create_product(&admin, draft("Solar Panel", 1000, &energy, Some(&solar)), ProductUploads::default())
        .await
        .unwrap();
    let bulb = shop
        .products
        .create_product(&admin, draft("LED Bulb", 200, &lighting, None), ProductUploads::default())
        .await
        .unwrap();

    shop.carts.add_item(&customer, &panel.id, 1).await.unwrap();
    let kept = shop
        .orders
        .create_order(&customer, &PaymentConfirmation::new("p1", "o1", "s"), address())
        .await
        .unwrap();
    shop.carts.add_item(&customer, &bulb.id, 2).await.unwrap();
    let dropped = shop
        .orders
        .create_order(&customer, &PaymentConfirmation::new("p2", "o2", "s"), address())
        .await
        .unwrap();
    shop.orders.cancel_order(&customer, &dropped.id).await.unwrap();
    shop.orders
        .update_status(&admin, &kept.id, OrderStatus::Shipped)
        .await
        .unwrap();

    let overview = shop.admin.overview(&admin).await.unwrap();
    assert_eq!(overview.categories, 2);
    assert_eq!(overview.subcategories, 1);
    assert_eq!(overview.products, 2);
    assert_eq!(overview.featured_products, 1);
    assert_eq!(overview.orders, 2);
    assert_eq!(overview.revenue, Money::new(1000, Currency::INR));
    let shipped = overview
        .orders_by_status
        .iter()
        .find(|s| s.status == OrderStatus::Shipped)
        .unwrap();
    assert_eq!(shipped.count, 1);
    assert_eq!(overview.orders_by_status.len(), OrderStatus::ALL.len());

    let tree = shop.admin.catalog_tree(&admin).await.unwrap();
    assert_eq!(tree.len(), 2);
    let energy_node = tree.iter().find(|n| n.category.id == energy.id).unwrap();
    assert_eq!(energy_node.subcategories, vec![solar]);
    assert_eq!(energy_node.product_count, 1);

    // Delegates reach the same data.
    let page = shop
        .admin
        .orders()
        .list_orders(&admin, &OrderQuery::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);
    assert_eq!(shop.admin.categories().list_categories().await.unwrap().len(), 3);
    assert!(shop.admin.products().get_product(&bulb.id).await.is_ok());
}

#[tokio::test]
async fn test_dashboard_is_admin_only() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop(&dir);
    let customer = RequestContext::customer("u1");

    let err = shop.admin.overview(&customer).await.unwrap_err();
    assert_eq!(err.status_code(), http::StatusCode::FORBIDDEN);
    assert!(shop.admin.catalog_tree(&customer).await.is_err());
}

#[tokio::test]
async fn test_empty_shop_overview() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop(&dir);
    let overview = shop.admin.overview(&RequestContext::admin("a")).await.unwrap();
    assert_eq!(overview.products, 0);
    assert!(overview.revenue.is_zero());
    assert!(overview.orders_by_status.iter().all(|s| s.count == 0));
}

#[tokio::test]
async fn test_foreign_price_cannot_poison_totals() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop(&dir);
    let admin = RequestContext::admin("admin");
    let customer = RequestContext::customer("u1");

    let energy = shop.categories.create_category(&admin, "Energy", false, None).await.unwrap();
    let panel = shop
        .products
        .create_product(&admin, draft("Solar Panel", 1000, &energy, None), ProductUploads::default())
        .await
        .unwrap();

    let mut imported = draft("Imported Panel", 1000, &energy, None);
    imported.price = Money::new(1000, Currency::USD);
    let err = shop
        .products
        .create_product(&admin, imported, ProductUploads::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    shop.carts.add_item(&customer, &panel.id, 2).await.unwrap();
    let priced = shop.carts.priced_cart(&customer).await.unwrap();
    assert_eq!(priced.total, Money::new(2000, Currency::INR));

    shop.orders
        .create_order(&customer, &PaymentConfirmation::new("p1", "o1", "s"), address())
        .await
        .unwrap();
    let overview = shop.admin.overview(&admin).await.unwrap();
    assert_eq!(overview.products, 1);
    assert_eq!(overview.revenue, Money::new(2000, Currency::INR));
}
