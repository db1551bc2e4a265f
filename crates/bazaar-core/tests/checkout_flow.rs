//! End-to-end checkout through the storefront services.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bazaar_commerce::prelude::*;
use bazaar_core::{
    LocalFileStorage, OfflineGateway, ProductUploads, RequestContext, ShopError, Storefront,
    StorefrontOptions,
};
use bazaar_store::{
    DocumentStore, InMemoryStore, JsonFileStore, StoreError, StoreResult, WriteBatch,
};
use serde_json::Value;

/// Store wrapper whose batch commits can be switched off.
struct FlakyStore {
    inner: InMemoryStore,
    fail_commits: AtomicBool,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        self.inner.list(collection).await
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.inner.put(collection, id, document).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.inner.delete(collection, id).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::StoreError("disk full".to_string()));
        }
        self.inner.commit(batch).await
    }
}

fn shop_on(store: Arc<dyn DocumentStore>, dir: &tempfile::TempDir) -> Storefront {
    Storefront::new(
        store,
        Arc::new(LocalFileStorage::new(dir.path(), "/static")),
        Arc::new(OfflineGateway::new("rzp_test")),
        StorefrontOptions::default(),
    )
}

fn draft(name: &str, price: i64, category: &CategoryId) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price: Money::new(price, Currency::INR),
        description: String::new(),
        category_id: category.clone(),
        subcategory_id: None,
        featured: false,
        rating: 0.0,
        reviews: 0,
        features: Vec::new(),
        video_url: None,
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 98450 00000".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        zip_code: "560001".to_string(),
        country: "India".to_string(),
    }
}

/// Creates products A (100) and B (50) and returns them.
async fn seed_catalog(shop: &Storefront) -> (Product, Product) {
    let admin = RequestContext::admin("admin");
    let energy = shop
        .categories
        .create_category(&admin, "Energy", false, None)
        .await
        .unwrap();
    let a = shop
        .products
        .create_product(&admin, draft("A", 100, &energy.id), ProductUploads::default())
        .await
        .unwrap();
    let b = shop
        .products
        .create_product(&admin, draft("B", 50, &energy.id), ProductUploads::default())
        .await
        .unwrap();
    (a, b)
}

#[tokio::test]
async fn test_checkout_two_products() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop_on(Arc::new(InMemoryStore::new()), &dir);
    let (a, b) = seed_catalog(&shop).await;
    let customer = RequestContext::customer("u1");

    shop.carts.add_item(&customer, &a.id, 1).await.unwrap();
    shop.carts.add_item(&customer, &a.id, 1).await.unwrap();
    shop.carts.add_item(&customer, &b.id, 1).await.unwrap();

    let gateway_order = shop.orders.initiate_payment(&customer).await.unwrap();
    assert_eq!(gateway_order.amount, Money::new(250, Currency::INR));

    let confirmation = PaymentConfirmation::new("pay_1", gateway_order.id.clone(), "sig");
    let order = shop
        .orders
        .create_order(&customer, &confirmation, address())
        .await
        .unwrap();

    assert_eq!(order.total, Money::new(250, Currency::INR));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.line_items.len(), 2);
    assert_eq!(order.payment.gateway_order_id, gateway_order.id);
    assert!(shop.carts.get_cart(&customer).await.unwrap().is_empty());

    let mine = shop.orders.list_user_orders(&customer).await.unwrap();
    assert_eq!(mine, vec![order]);
}

#[tokio::test]
async fn test_order_total_ignores_later_price_changes() {
    let dir = tempfile::tempdir().unwrap();
    let shop = shop_on(Arc::new(InMemoryStore::new()), &dir);
    let (a, _) = seed_catalog(&shop).await;
    let customer = RequestContext::customer("u1");
    let admin = RequestContext::admin("admin");

    shop.carts.add_item(&customer, &a.id, 3).await.unwrap();
    let order = shop
        .orders
        .create_order(&customer, &PaymentConfirmation::new("p", "o", "s"), address())
        .await
        .unwrap();

    let patch = ProductPatch {
        price: Some(Money::new(999, Currency::INR)),
        ..Default::default()
    };
    shop.products
        .update_product(&admin, &a.id, patch, ProductUploads::default())
        .await
        .unwrap();
    shop.products.delete_product(&admin, &a.id).await.unwrap();

    let stored = shop.orders.get_order(&customer, &order.id).await.unwrap();
    assert_eq!(stored.total, Money::new(300, Currency::INR));
    assert_eq!(stored.line_items[0].unit_price, Money::new(100, Currency::INR));
    assert_eq!(stored.line_items[0].name, "A");
}

#[tokio::test]
async fn test_failed_commit_reports_payment_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore {
        inner: InMemoryStore::new(),
        fail_commits: AtomicBool::new(false),
    });
    let shop = shop_on(store.clone(), &dir);
    let (a, _) = seed_catalog(&shop).await;
    let customer = RequestContext::customer("u1");
    shop.carts.add_item(&customer, &a.id, 1).await.unwrap();

    store.fail_commits.store(true, Ordering::SeqCst);
    let err = shop
        .orders
        .create_order(
            &customer,
            &PaymentConfirmation::new("pay_42", "order_42", "sig"),
            address(),
        )
        .await
        .unwrap_err();

    match &err {
        ShopError::OrderPersistence {
            payment_id,
            gateway_order_id,
            ..
        } => {
            assert_eq!(payment_id, "pay_42");
            assert_eq!(gateway_order_id, "order_42");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing half-written: no order, cart still full.
    assert!(shop.orders.list_user_orders(&customer).await.unwrap().is_empty());
    assert_eq!(shop.carts.get_cart(&customer).await.unwrap().item_count(), 1);
}

#[tokio::test]
async fn test_checkout_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bazaar.json");
    let customer = RequestContext::customer("u1");

    let order_id = {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let shop = shop_on(store, &dir);
        let (a, b) = seed_catalog(&shop).await;
        shop.carts.add_item(&customer, &a.id, 2).await.unwrap();
        shop.carts.add_item(&customer, &b.id, 1).await.unwrap();
        shop.orders
            .create_order(&customer, &PaymentConfirmation::new("p", "o", "s"), address())
            .await
            .unwrap()
            .id
    };

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let shop = shop_on(store, &dir);
    let order = shop.orders.get_order(&customer, &order_id).await.unwrap();
    assert_eq!(order.total, Money::new(250, Currency::INR));
    assert!(shop.carts.get_cart(&customer).await.unwrap().is_empty());
}
