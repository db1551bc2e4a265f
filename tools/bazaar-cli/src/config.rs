//! CLI configuration.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["bazaar.toml", ".bazaar.toml", "bazaar.json"];

/// Contents of `bazaar.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BazaarConfig {
    #[serde(default)]
    pub shop: ShopConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub uploads: UploadsConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl BazaarConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text; JSON when the path ends in `.json`, TOML otherwise.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Config with the overrides of `env` applied.
    pub fn for_environment(&self, env: &str) -> Result<BazaarConfig> {
        let overrides = self
            .environments
            .get(env)
            .with_context(|| format!("Unknown environment: {}", env))?;

        let mut config = self.clone();
        if let Some(ref store) = overrides.store {
            config.store = store.clone();
        }
        if let Some(ref uploads) = overrides.uploads {
            config.uploads = uploads.clone();
        }
        if let Some(ref payment) = overrides.payment {
            config.payment = payment.clone();
        }
        if let Some(ref logging) = overrides.logging {
            config.logging = logging.clone();
        }
        Ok(config)
    }

    /// Check the values the storefront needs; returns errors and warnings.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.shop.name.trim().is_empty() {
            errors.push("shop.name is required".to_string());
        }
        if bazaar_commerce::money::Currency::from_code(&self.shop.currency).is_none() {
            errors.push(format!("shop.currency '{}' is not supported", self.shop.currency));
        }
        if self.store.path.trim().is_empty() {
            errors.push("store.path is required".to_string());
        }
        if !self.uploads.public_base.starts_with('/') && !self.uploads.public_base.contains("://") {
            warnings.push(format!(
                "uploads.public_base '{}' is neither an absolute path nor a URL",
                self.uploads.public_base
            ));
        }
        if self.payment.key_id.is_empty() {
            warnings.push("payment.key_id is empty".to_string());
        }
        if !matches!(self.logging.format.as_str(), "human" | "json") {
            errors.push(format!(
                "logging.format must be 'human' or 'json', got '{}'",
                self.logging.format
            ));
        }

        (errors, warnings)
    }
}

/// Shop identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub name: String,

    /// ISO currency code for prices and totals.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: "bazaar".to_string(),
            currency: default_currency(),
        }
    }
}

/// Document store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store file.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "data/bazaar.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Where uploaded media lands and how it is addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_root")]
    pub root: String,

    /// Prefix of the public URLs handed back for stored files.
    #[serde(default = "default_public_base")]
    pub public_base: String,
}

fn default_uploads_root() -> String {
    "public".to_string()
}

fn default_public_base() -> String {
    "/static".to_string()
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            root: default_uploads_root(),
            public_base: default_public_base(),
        }
    }
}

/// Payment gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub key_id: String,

    #[serde(default = "default_receipt_prefix")]
    pub receipt_prefix: String,
}

fn default_receipt_prefix() -> String {
    "rcpt_".to_string()
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            receipt_prefix: default_receipt_prefix(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// `human` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "human".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub store: Option<StoreConfig>,

    #[serde(default)]
    pub uploads: Option<UploadsConfig>,

    #[serde(default)]
    pub payment: Option<PaymentConfig>,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Generate a default bazaar.toml config file.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# Bazaar storefront configuration

[shop]
name = "{name}"
currency = "INR"

[store]
path = "data/bazaar.json"

[uploads]
root = "public"
public_base = "/static"

[payment]
# key_id = "rzp_live_..."
receipt_prefix = "rcpt_"

[logging]
level = "warn"
format = "human"

[environments.staging.store]
path = "data/bazaar-staging.json"

[environments.staging.logging]
level = "debug"
format = "json"
"#,
        name = name
    )
}
