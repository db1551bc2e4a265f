//! Category store.

use std::sync::Arc;

use bazaar_commerce::catalog::{Category, Product};
use bazaar_commerce::ids::CategoryId;
use bazaar_commerce::CommerceError;
use bazaar_store::{Collection, DocumentStore, WriteBatch};

use crate::{RequestContext, ShopError, ShopResult};

/// Two-level category hierarchy.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn DocumentStore>,
    categories: Collection<Category>,
    products: Collection<Product>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            categories: Collection::new(store.clone()),
            products: Collection::new(store.clone()),
            store,
        }
    }

    /// Create a top-level category or, with a parent, a subcategory.
    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        name: &str,
        is_subcategory: bool,
        parent_id: Option<&CategoryId>,
    ) -> ShopResult<Category> {
        ctx.require_admin()?;

        let category = match (is_subcategory, parent_id) {
            (false, None) => Category::new_root(name)?,
            (true, Some(parent_id)) => {
                let parent = self.get_category(parent_id).await?;
                Category::new_child(&parent, name)?
            }
            (true, None) => {
                return Err(ShopError::validation(
                    "parent_id",
                    "a subcategory requires a parent",
                ))
            }
            (false, Some(_)) => {
                return Err(ShopError::validation(
                    "parent_id",
                    "a top-level category cannot have a parent",
                ))
            }
        };

        self.categories.save(&category).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            category_id = %category.id,
            parent = ?category.parent,
            "Created category"
        );
        Ok(category)
    }

    /// All categories, oldest first.
    pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        let mut categories = self.categories.all().await?;
        categories.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(categories)
    }

    /// Subcategories of `category_id`, oldest first. Empty if there are none.
    pub async fn list_subcategories(&self, category_id: &CategoryId) -> ShopResult<Vec<Category>> {
        let mut children = self
            .categories
            .filter(|c| c.parent.as_ref() == Some(category_id))
            .await?;
        children.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(children)
    }

    pub async fn get_category(&self, id: &CategoryId) -> ShopResult<Category> {
        self.categories
            .get(id.as_str())
            .await?
            .ok_or_else(|| CommerceError::CategoryNotFound(id.to_string()).into())
    }

    /// Rename a category.
    pub async fn update_category(
        &self,
        ctx: &RequestContext,
        id: &CategoryId,
        name: &str,
    ) -> ShopResult<Category> {
        ctx.require_admin()?;
        let mut category = self.get_category(id).await?;
        category.rename(name)?;
        self.categories.save(&category).await?;
        tracing::info!(request_id = %ctx.request_id, category_id = %id, "Renamed category");
        Ok(category)
    }

    /// Delete a category together with its subcategories.
    ///
    /// Refused with `CategoryInUse` while any product is filed under the
    /// category or one of its subcategories. Returns the number of
    /// categories removed.
    pub async fn delete_category(&self, ctx: &RequestContext, id: &CategoryId) -> ShopResult<usize> {
        ctx.require_admin()?;
        let category = self.get_category(id).await?;
        let children = self.list_subcategories(&category.id).await?;

        let mut doomed: Vec<&CategoryId> = children.iter().map(|c| &c.id).collect();
        doomed.push(&category.id);
        self.ensure_unused(ctx, &category.id, &doomed).await?;

        let mut batch = WriteBatch::new();
        for id in &doomed {
            batch.delete::<Category>(id.as_str());
        }
        self.store.commit(batch).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            category_id = %category.id,
            subcategories = children.len(),
            "Deleted category"
        );
        Ok(doomed.len())
    }

    /// Delete a single subcategory.
    pub async fn delete_subcategory(&self, ctx: &RequestContext, id: &CategoryId) -> ShopResult<()> {
        ctx.require_admin()?;
        let category = self.get_category(id).await?;
        if category.is_root() {
            return Err(ShopError::validation(
                "id",
                format!("{} is a top-level category", id),
            ));
        }
        self.ensure_unused(ctx, id, &[id]).await?;
        self.categories.remove(id.as_str()).await?;
        tracing::info!(request_id = %ctx.request_id, category_id = %id, "Deleted subcategory");
        Ok(())
    }

    async fn ensure_unused(
        &self,
        ctx: &RequestContext,
        category: &CategoryId,
        ids: &[&CategoryId],
    ) -> ShopResult<()> {
        let in_use = self
            .products
            .filter(|p| ids.iter().any(|id| p.is_in_category(id)))
            .await?
            .len();
        if in_use > 0 {
            tracing::warn!(
                request_id = %ctx.request_id,
                category_id = %category,
                products = in_use,
                "Refused to delete category in use"
            );
            return Err(CommerceError::CategoryInUse {
                category: category.to_string(),
                products: in_use,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_store::InMemoryStore;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryStore::new()))
    }

    fn admin() -> RequestContext {
        RequestContext::admin("admin")
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let svc = service();
        let root = svc.create_category(&admin(), "Energy", false, None).await.unwrap();
        let sub = svc
            .create_category(&admin(), "Solar", true, Some(&root.id))
            .await
            .unwrap();

        assert_eq!(sub.parent.as_ref(), Some(&root.id));
        assert_eq!(svc.list_categories().await.unwrap().len(), 2);
        assert_eq!(svc.list_subcategories(&root.id).await.unwrap(), vec![sub]);
    }

    #[tokio::test]
    async fn test_flag_and_parent_must_agree() {
        let svc = service();
        let root = svc.create_category(&admin(), "Energy", false, None).await.unwrap();

        let err = svc.create_category(&admin(), "Orphan", true, None).await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        let err = svc
            .create_category(&admin(), "Confused", false, Some(&root.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_no_third_level() {
        let svc = service();
        let root = svc.create_category(&admin(), "Energy", false, None).await.unwrap();
        let sub = svc
            .create_category(&admin(), "Solar", true, Some(&root.id))
            .await
            .unwrap();

        let err = svc
            .create_category(&admin(), "Panels", true, Some(&sub.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_missing_parent() {
        let svc = service();
        let err = svc
            .create_category(&admin(), "Solar", true, Some(&CategoryId::new("ghost")))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_customer_cannot_create() {
        let svc = service();
        let err = svc
            .create_category(&RequestContext::customer("u1"), "Energy", false, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::FORBIDDEN);
        assert!(svc.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_subcategories() {
        let svc = service();
        let root = svc.create_category(&admin(), "Energy", false, None).await.unwrap();
        svc.create_category(&admin(), "Solar", true, Some(&root.id)).await.unwrap();
        svc.create_category(&admin(), "Wind", true, Some(&root.id)).await.unwrap();
        let other = svc.create_category(&admin(), "Lighting", false, None).await.unwrap();

        assert_eq!(svc.delete_category(&admin(), &root.id).await.unwrap(), 3);
        assert_eq!(svc.list_categories().await.unwrap(), vec![other]);
        assert!(svc.list_subcategories(&root.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename() {
        let svc = service();
        let root = svc.create_category(&admin(), "Enrgy", false, None).await.unwrap();
        let renamed = svc.update_category(&admin(), &root.id, "Energy").await.unwrap();
        assert_eq!(renamed.name, "Energy");
        assert_eq!(svc.get_category(&root.id).await.unwrap().name, "Energy");

        let err = svc
            .update_category(&admin(), &CategoryId::new("ghost"), "X")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_subcategory_rejects_root() {
        let svc = service();
        let root = svc.create_category(&admin(), "Energy", false, None).await.unwrap();
        let sub = svc
            .create_category(&admin(), "Solar", true, Some(&root.id))
            .await
            .unwrap();

        let err = svc.delete_subcategory(&admin(), &root.id).await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        svc.delete_subcategory(&admin(), &sub.id).await.unwrap();
        assert_eq!(svc.list_categories().await.unwrap(), vec![root]);
    }
}
