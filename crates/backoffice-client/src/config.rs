//! # Client Configuration
//!
//! Base addresses of the four services plus local storage settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BACKOFFICE_USERS_API_URL=http://users.internal:3001                │
//! │     BACKOFFICE_PRODUCTION=true                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice/backoffice.toml (Linux)                       │
//! │     ~/Library/Application Support/com.backoffice.backoffice/... (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost:3001 .. localhost:3004                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # backoffice.toml
//! production = false
//!
//! [services]
//! users = "http://localhost:3001"
//! products = "http://localhost:3002"
//! sales = "http://localhost:3003"
//! refunds = "http://localhost:3004"
//!
//! [storage]
//! session_file = "/var/lib/backoffice/session.json"   # optional
//! ```

use std::path::PathBuf;

use backoffice_core::ServiceKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "backoffice.toml";

/// Session file name inside the platform data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

// =============================================================================
// Service URLs
// =============================================================================

/// Base address of each service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUrls {
    #[serde(default = "default_users_url")]
    pub users: String,

    #[serde(default = "default_products_url")]
    pub products: String,

    #[serde(default = "default_sales_url")]
    pub sales: String,

    #[serde(default = "default_refunds_url")]
    pub refunds: String,
}

fn default_users_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_products_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_sales_url() -> String {
    "http://localhost:3003".to_string()
}

fn default_refunds_url() -> String {
    "http://localhost:3004".to_string()
}

impl Default for ServiceUrls {
    fn default() -> Self {
        ServiceUrls {
            users: default_users_url(),
            products: default_products_url(),
            sales: default_sales_url(),
            refunds: default_refunds_url(),
        }
    }
}

impl ServiceUrls {
    pub fn get(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::Users => &self.users,
            ServiceKind::Products => &self.products,
            ServiceKind::Sales => &self.sales,
            ServiceKind::Refunds => &self.refunds,
        }
    }

    pub fn set(&mut self, service: ServiceKind, url: String) {
        match service {
            ServiceKind::Users => self.users = url,
            ServiceKind::Products => self.products = url,
            ServiceKind::Sales => self.sales = url,
            ServiceKind::Refunds => self.refunds = url,
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the session is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit session file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

// =============================================================================
// Client Config
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Production deployment flag. Only lowers log verbosity.
    #[serde(default)]
    pub production: bool,

    #[serde(default)]
    pub services: ServiceUrls,

    #[serde(default)]
    pub storage: StorageSettings,
}

/// Environment variable carrying each service's base URL.
pub fn service_env_var(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Users => "BACKOFFICE_USERS_API_URL",
        ServiceKind::Products => "BACKOFFICE_PRODUCTS_API_URL",
        ServiceKind::Sales => "BACKOFFICE_SALES_API_URL",
        ServiceKind::Refunds => "BACKOFFICE_REFUNDS_API_URL",
    }
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (backoffice.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates every service URL.
    pub fn validate(&self) -> ClientResult<()> {
        for service in ServiceKind::ALL {
            self.service_url(service)?;
        }
        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for service in ServiceKind::ALL {
            if let Some(url) = lookup(service_env_var(service)) {
                debug!(%service, url = %url, "Overriding service URL from environment");
                self.services.set(service, url);
            }
        }

        if let Some(flag) = lookup("BACKOFFICE_PRODUCTION") {
            self.production = flag == "true";
        }

        if let Some(path) = lookup("BACKOFFICE_SESSION_FILE") {
            debug!(path = %path, "Overriding session file from environment");
            self.storage.session_file = Some(PathBuf::from(path));
        }
    }

    /// Parsed base address of `service`.
    pub fn service_url(&self, service: ServiceKind) -> ClientResult<Url> {
        let raw = self.services.get(service);
        let url = Url::parse(raw)
            .map_err(|e| ClientError::InvalidUrl(format!("{} ({}): {}", service, raw, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ClientError::InvalidUrl(format!(
                "{} URL must start with http:// or https://, got {}://",
                service, scheme
            ))),
        }
    }

    /// Session file location: the configured path, else the platform data
    /// directory.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.storage
            .session_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME)))
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "backoffice", "backoffice")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(!config.production);
        assert_eq!(config.services.users, "http://localhost:3001");
        assert_eq!(config.services.refunds, "http://localhost:3004");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[
            ("BACKOFFICE_SALES_API_URL", "https://sales.example.com/api"),
            ("BACKOFFICE_PRODUCTION", "true"),
            ("BACKOFFICE_SESSION_FILE", "/tmp/s.json"),
        ]));
        assert_eq!(config.services.sales, "https://sales.example.com/api");
        assert_eq!(config.services.users, "http://localhost:3001");
        assert!(config.production);
        assert_eq!(config.session_path(), Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_production_requires_literal_true() {
        for value in ["1", "TRUE", "yes", ""] {
            let mut config = ClientConfig {
                production: true,
                ..Default::default()
            };
            config.apply_overrides(env(&[("BACKOFFICE_PRODUCTION", value)]));
            assert!(!config.production, "value {:?}", value);
        }
    }

    #[test]
    fn test_validation_rejects_bad_urls() {
        let mut config = ClientConfig::default();
        config.services.products = "ftp://files.example.com".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.services.products = "not a url".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.services.products = "https://products.example.com".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing_with_partial_sections() {
        let config: ClientConfig = toml::from_str(
            r#"
            production = true
            [services]
            users = "http://users:9000"
            "#,
        )
        .unwrap();
        assert!(config.production);
        assert_eq!(config.services.users, "http://users:9000");
        assert_eq!(config.services.sales, "http://localhost:3003");
        assert_eq!(config.storage.session_file, None);
    }

    #[test]
    fn test_load_reads_explicit_file() {
        let path = crate::storage::tests::temp_path(CONFIG_FILE_NAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "[services]\nrefunds = \"http://refunds:8080\"\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.services.refunds, "http://refunds:8080");
        assert_eq!(config.services.users, "http://localhost:3001");

        std::fs::write(&path, "[services]\nusers = 42\n").unwrap();
        assert!(matches!(
            ClientConfig::load(Some(path.clone())),
            Err(ClientError::ConfigLoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
