//! Product store.

use std::sync::Arc;

use bazaar_commerce::cart::Cart;
use bazaar_commerce::catalog::{validate_placement, Category, Product, ProductDraft, ProductPatch};
use bazaar_commerce::ids::{CategoryId, ProductId};
use bazaar_commerce::money::{Currency, Money};
use bazaar_commerce::search::{matches_text, Page, DEFAULT_PER_PAGE};
use bazaar_commerce::CommerceError;
use bazaar_store::{Collection, DocumentStore, WriteBatch};
use serde::{Deserialize, Serialize};

use crate::files::{FileStorage, Upload, UploadKind};
use crate::{RequestContext, ShopError, ShopResult};

/// Files sent along with a product create or update.
#[derive(Debug, Clone, Default)]
pub struct ProductUploads {
    /// New main image.
    pub image: Option<Upload>,
    /// New video file; replaces any external video link.
    pub video: Option<Upload>,
    /// Documents to append, with their display names.
    pub documents: Vec<DocumentUpload>,
}

impl ProductUploads {
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.video.is_none() && self.documents.is_empty()
    }
}

/// A document attachment and the name to show for it.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Display name; the file name is used when blank.
    pub name: String,
    pub upload: Upload,
}

/// Catalog listing filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProductQuery {
    /// Products filed under this category or subcategory.
    pub category_id: Option<CategoryId>,
    /// Products filed under this subcategory.
    pub subcategory_id: Option<CategoryId>,
    /// Case-insensitive name search.
    pub search: Option<String>,
    pub featured_only: bool,
    pub page: i64,
    pub per_page: i64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            subcategory_id: None,
            search: None,
            featured_only: false,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ProductQuery {
    fn matches(&self, product: &Product) -> bool {
        self.category_id
            .as_ref()
            .map_or(true, |id| product.is_in_category(id))
            && self
                .subcategory_id
                .as_ref()
                .map_or(true, |id| product.subcategory_id.as_ref() == Some(id))
            && self
                .search
                .as_deref()
                .map_or(true, |needle| matches_text(&product.name, needle))
            && (!self.featured_only || product.featured)
    }
}

/// Product catalog with media handling.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn DocumentStore>,
    products: Collection<Product>,
    categories: Collection<Category>,
    carts: Collection<Cart>,
    files: Arc<dyn FileStorage>,
    currency: Currency,
}

impl ProductService {
    /// Prices must be given in `currency`, the shop currency.
    pub fn new(store: Arc<dyn DocumentStore>, files: Arc<dyn FileStorage>, currency: Currency) -> Self {
        Self {
            products: Collection::new(store.clone()),
            categories: Collection::new(store.clone()),
            carts: Collection::new(store.clone()),
            store,
            files,
            currency,
        }
    }

    /// Create a product and store its uploads.
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        draft: ProductDraft,
        uploads: ProductUploads,
    ) -> ShopResult<Product> {
        ctx.require_admin()?;
        self.check_currency(&draft.price)?;
        let mut product = Product::new(draft)?;
        self.check_placement(&product).await?;
        self.store_uploads(&mut product, uploads).await?;

        self.products.save(&product).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            product_id = %product.id,
            category_id = %product.category_id,
            "Created product"
        );
        Ok(product)
    }

    /// Apply a partial update and store any new uploads.
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: &ProductId,
        patch: ProductPatch,
        uploads: ProductUploads,
    ) -> ShopResult<Product> {
        ctx.require_admin()?;
        if let Some(price) = &patch.price {
            self.check_currency(price)?;
        }
        let mut product = self.get_product(id).await?;

        let moves = patch.category_id.is_some() || patch.subcategory_id.is_some();
        product.apply(patch)?;
        if moves {
            self.check_placement(&product).await?;
        }
        self.store_uploads(&mut product, uploads).await?;

        self.products.save(&product).await?;
        tracing::info!(request_id = %ctx.request_id, product_id = %id, "Updated product");
        Ok(product)
    }

    /// Delete a product and drop it from every cart.
    ///
    /// Orders keep their own snapshot and are left alone.
    pub async fn delete_product(&self, ctx: &RequestContext, id: &ProductId) -> ShopResult<()> {
        ctx.require_admin()?;
        let product = self.get_product(id).await?;

        let carts = self.carts.filter(|cart| cart.contains(&product.id)).await?;
        let mut batch = WriteBatch::new();
        batch.delete::<Product>(product.id.as_str());
        for mut cart in carts.iter().cloned() {
            cart.remove_item(&product.id);
            batch.put(&cart)?;
        }
        self.store.commit(batch).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            product_id = %id,
            carts_updated = carts.len(),
            "Deleted product"
        );
        Ok(())
    }

    pub async fn get_product(&self, id: &ProductId) -> ShopResult<Product> {
        self.products
            .get(id.as_str())
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()).into())
    }

    /// Filtered listing, newest first.
    pub async fn list_products(&self, query: &ProductQuery) -> ShopResult<Page<Product>> {
        let mut products = self.products.filter(|p| query.matches(p)).await?;
        sort_newest_first(&mut products);
        Ok(Page::paginate(products, query.page, query.per_page))
    }

    /// Featured products, newest first.
    pub async fn list_featured(&self) -> ShopResult<Vec<Product>> {
        let mut products = self.products.filter(|p| p.featured).await?;
        sort_newest_first(&mut products);
        Ok(products)
    }

    fn check_currency(&self, price: &Money) -> ShopResult<()> {
        if price.currency != self.currency {
            return Err(ShopError::validation(
                "price",
                format!("must be in {}, got {}", self.currency, price.currency),
            ));
        }
        Ok(())
    }

    async fn check_placement(&self, product: &Product) -> ShopResult<()> {
        let category = self.load_category(&product.category_id).await?;
        let subcategory = match &product.subcategory_id {
            Some(id) => Some(self.load_category(id).await?),
            None => None,
        };
        validate_placement(&category, subcategory.as_ref())?;
        Ok(())
    }

    async fn load_category(&self, id: &CategoryId) -> ShopResult<Category> {
        self.categories
            .get(id.as_str())
            .await?
            .ok_or_else(|| CommerceError::CategoryNotFound(id.to_string()).into())
    }

    async fn store_uploads(&self, product: &mut Product, uploads: ProductUploads) -> ShopResult<()> {
        if let Some(image) = &uploads.image {
            let url = self.files.store(UploadKind::Image, image).await?;
            product.set_image(url);
        }
        if let Some(video) = &uploads.video {
            let url = self.files.store(UploadKind::Video, video).await?;
            product.set_uploaded_video(url);
        }
        for doc in &uploads.documents {
            let url = self.files.store(UploadKind::Document, &doc.upload).await?;
            let name = match doc.name.trim() {
                "" => doc.upload.file_name.as_str(),
                name => name,
            };
            product.attach_document(name, url);
        }
        Ok(())
    }
}

fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
}
