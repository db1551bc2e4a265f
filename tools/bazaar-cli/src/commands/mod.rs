//! CLI command implementations.

pub mod category;
pub mod config;
pub mod order;
pub mod overview;
pub mod product;

use clap::{Args, Subcommand};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Shop name (default: directory name).
        #[arg(short, long)]
        name: Option<String>,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Arguments for the category command.
#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List categories as a tree.
    List,
    /// Add a category, or a subcategory with --parent.
    Add {
        /// Category name.
        name: String,
        /// Parent category ID.
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a category.
    Rename {
        /// Category ID.
        id: String,
        /// New name.
        name: String,
    },
    /// Delete a category (with its subcategories) or a subcategory.
    Delete {
        /// Category ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List products, newest first.
    List {
        /// Only products under this category or subcategory.
        #[arg(short, long)]
        category: Option<String>,
        /// Case-insensitive name search.
        #[arg(short, long)]
        search: Option<String>,
        /// Only featured products.
        #[arg(long)]
        featured: bool,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },
    /// Add a product.
    Add {
        /// Product name.
        name: String,
        /// Price in major units, e.g. 499.00.
        #[arg(long)]
        price: String,
        /// Category ID.
        #[arg(short, long)]
        category: String,
        /// Subcategory ID.
        #[arg(long)]
        subcategory: Option<String>,
        /// Description.
        #[arg(short, long, default_value = "")]
        description: String,
        /// Mark as featured.
        #[arg(long)]
        featured: bool,
        /// Feature bullet (repeatable).
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Image file to upload.
        #[arg(long)]
        image: Option<String>,
        /// YouTube video URL.
        #[arg(long)]
        video_url: Option<String>,
    },
    /// Change price, name or featured flag.
    Update {
        /// Product ID.
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Price in major units.
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        featured: Option<bool>,
    },
    /// Delete a product and drop it from carts.
    Delete {
        /// Product ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// List orders, newest first.
    List {
        /// Filter by status.
        #[arg(short, long)]
        status: Option<String>,
        /// Match order number or customer name.
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Show one order.
    Show {
        /// Order ID.
        id: String,
    },
    /// Move an order to a new status.
    Status {
        /// Order ID.
        id: String,
        /// pending, processing, shipped, delivered or canceled.
        status: String,
        /// Skip confirmation for cancellation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the overview command.
#[derive(Args)]
pub struct OverviewArgs {
    /// Also print the category tree.
    #[arg(short, long)]
    pub tree: bool,
}
