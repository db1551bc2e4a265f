//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use bazaar_commerce::money::Currency;
use bazaar_core::{LocalFileStorage, OfflineGateway, RequestContext, Storefront, StorefrontOptions};
use bazaar_store::JsonFileStore;

use crate::config::{BazaarConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, environment overrides applied.
    pub config: BazaarConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config_file(&cwd),
        };
        let config = match config_path {
            Some(ref path) => BazaarConfig::load(&path.to_string_lossy())?,
            None => BazaarConfig::default(),
        };
        let config = match env {
            Some(env) => config.for_environment(env)?,
            None => config,
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory that relative paths in the config are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Resolve a config path relative to the base directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.base_dir().join(path)
        }
    }

    /// Open the store and wire up the storefront services.
    pub async fn storefront(&self) -> Result<Storefront> {
        let currency = Currency::from_code(&self.config.shop.currency)
            .with_context(|| format!("Unsupported currency: {}", self.config.shop.currency))?;

        let store_path = self.resolve_path(&self.config.store.path);
        if let Some(parent) = store_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.output.debug(&format!("Opening store {}", store_path.display()));
        let store = JsonFileStore::open(&store_path)
            .await
            .with_context(|| format!("Failed to open store: {}", store_path.display()))?;

        let files = LocalFileStorage::new(
            self.resolve_path(&self.config.uploads.root),
            self.config.uploads.public_base.clone(),
        );

        Ok(Storefront::new(
            Arc::new(store),
            Arc::new(files),
            Arc::new(OfflineGateway::new(self.config.payment.key_id.clone())),
            StorefrontOptions {
                currency,
                receipt_prefix: self.config.payment.receipt_prefix.clone(),
            },
        ))
    }

    /// Request context of the operator running the CLI.
    pub fn operator(&self) -> RequestContext {
        let user = std::env::var("USER").unwrap_or_else(|_| "operator".to_string());
        RequestContext::admin(format!("cli:{}", user))
    }
}

/// Find a config file in the directory tree above `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
