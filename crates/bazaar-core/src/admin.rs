//! Back-office aggregation.

use bazaar_commerce::catalog::{Category, Product};
use bazaar_commerce::checkout::{Order, OrderStatus};
use bazaar_commerce::money::{Currency, Money};
use bazaar_commerce::CommerceError;
use bazaar_store::Collection;
use serde::Serialize;

use crate::catalog::CategoryService;
use crate::orders::OrderService;
use crate::products::ProductService;
use crate::{RequestContext, ShopResult};

/// Dashboard numbers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminOverview {
    pub categories: usize,
    pub subcategories: usize,
    pub products: usize,
    pub featured_products: usize,
    pub orders: usize,
    /// Order count per status, in status order; zero counts included.
    pub orders_by_status: Vec<StatusCount>,
    /// Sum of the totals of all orders that were not canceled.
    pub revenue: Money,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// A top-level category with its subcategories.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogNode {
    pub category: Category,
    pub subcategories: Vec<Category>,
    /// Products filed under the category or any of its subcategories.
    pub product_count: usize,
}

/// Single entry point for back-office screens.
#[derive(Clone)]
pub struct AdminService {
    categories: CategoryService,
    products: ProductService,
    orders: OrderService,
    all_products: Collection<Product>,
    all_orders: Collection<Order>,
    currency: Currency,
}

impl AdminService {
    pub fn new(
        categories: CategoryService,
        products: ProductService,
        orders: OrderService,
        all_products: Collection<Product>,
        all_orders: Collection<Order>,
        currency: Currency,
    ) -> Self {
        Self {
            categories,
            products,
            orders,
            all_products,
            all_orders,
            currency,
        }
    }

    pub fn categories(&self) -> &CategoryService {
        &self.categories
    }

    pub fn products(&self) -> &ProductService {
        &self.products
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Counts and revenue for the dashboard.
    pub async fn overview(&self, ctx: &RequestContext) -> ShopResult<AdminOverview> {
        ctx.require_admin()?;
        let categories = self.categories.list_categories().await?;
        let products = self.all_products.all().await?;
        let orders = self.all_orders.all().await?;

        let orders_by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let mut revenue = Money::zero(self.currency);
        for order in orders.iter().filter(|o| o.is_billable()) {
            if order.total.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: order.total.currency.code().to_string(),
                }
                .into());
            }
            revenue = revenue
                .try_add(&order.total)
                .ok_or(CommerceError::Overflow)?;
        }

        let subcategories = categories.iter().filter(|c| c.is_subcategory).count();
        Ok(AdminOverview {
            categories: categories.len() - subcategories,
            subcategories,
            products: products.len(),
            featured_products: products.iter().filter(|p| p.featured).count(),
            orders: orders.len(),
            orders_by_status,
            revenue,
        })
    }

    /// Top-level categories, oldest first, each with its subcategories.
    pub async fn catalog_tree(&self, ctx: &RequestContext) -> ShopResult<Vec<CatalogNode>> {
        ctx.require_admin()?;
        let categories = self.categories.list_categories().await?;
        let products = self.all_products.all().await?;

        let tree = categories
            .iter()
            .filter(|c| c.is_root())
            .map(|root| {
                let subcategories: Vec<Category> = categories
                    .iter()
                    .filter(|c| root.is_parent_of(c))
                    .cloned()
                    .collect();
                let product_count = products
                    .iter()
                    .filter(|p| p.is_in_category(&root.id))
                    .count();
                CatalogNode {
                    category: root.clone(),
                    subcategories,
                    product_count,
                }
            })
            .collect();
        Ok(tree)
    }
}
