//! Bazaar CLI - back-office tool for a Bazaar storefront.
//!
//! Commands:
//! - `bazaar config` - Manage bazaar.toml
//! - `bazaar category` - Manage the category tree
//! - `bazaar product` - Manage the product catalog
//! - `bazaar order` - Inspect orders and move them through fulfilment
//! - `bazaar overview` - Dashboard numbers

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CategoryArgs, ConfigArgs, OrderArgs, OverviewArgs, ProductArgs};

/// Bazaar CLI - manage a storefront from the terminal
#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment whose overrides apply
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(ConfigArgs),

    /// Manage categories and subcategories
    Category(CategoryArgs),

    /// Manage products
    Product(ProductArgs),

    /// Inspect and update orders
    Order(OrderArgs),

    /// Show dashboard numbers
    Overview(OverviewArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output)?;

    logging::init(&ctx.config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Category(args) => commands::category::run(args, &ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Overview(args) => commands::overview::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
