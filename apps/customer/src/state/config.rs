//! # Terminal Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KIOSK_*`)
//! 2. Config file (`customer.toml`)
//! 3. Defaults (this file)
//!
//! ## Example `customer.toml`
//! ```toml
//! store_name = "Catshop Brighton"
//! database_path = "/var/lib/kiosk/kiosk.db"
//! image_dir = "/usr/share/kiosk/images"
//! currency_symbol = "£"
//! ```
//!
//! Configuration is read-only after start-up, so no lock is needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use kiosk_core::{Money, ProductImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

const CONFIG_FILE: &str = "customer.toml";
const DATABASE_FILE: &str = "kiosk.db";

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Store name shown in the banner and on the basket.
    pub store_name: String,

    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Directory holding the product pictures.
    pub image_dir: PathBuf,

    /// Currency symbol for display.
    pub currency_symbol: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        KioskConfig {
            store_name: "Kiosk".to_string(),
            database_path: None,
            image_dir: PathBuf::from("images"),
            currency_symbol: "£".to_string(),
        }
    }
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(AppError::validation("store_name must not be empty"));
        }

        if self.currency_symbol.chars().count() > 3 {
            return Err(AppError::validation(format!(
                "currency_symbol must be at most 3 characters, got: {}",
                self.currency_symbol
            )));
        }

        if let Some(ref path) = self.database_path {
            if path.as_os_str().is_empty() {
                return Err(AppError::validation("database_path must not be empty"));
            }
        }

        Ok(())
    }

    /// Applies `KIOSK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("KIOSK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("KIOSK_IMAGE_DIR") {
            debug!(dir = %dir, "Overriding image directory from environment");
            self.image_dir = PathBuf::from(dir);
        }

        if let Some(name) = lookup("KIOSK_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("KIOSK_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "kiosk", "customer").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolves the database file, creating the data directory if needed.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/com.kiosk.customer/kiosk.db`
    /// - **Windows**: `%APPDATA%\kiosk\customer\data\kiosk.db`
    /// - **Linux**: `~/.local/share/customer/kiosk.db`
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "kiosk", "customer")
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Full path of a product picture.
    pub fn picture_path(&self, image: &ProductImage) -> PathBuf {
        Path::new(&self.image_dir).join(&image.filename)
    }

    /// Formats an amount with the currency symbol.
    ///
    /// ```rust,ignore
    /// let config = KioskConfig::default();
    /// assert_eq!(config.format_price(Money::from_cents(1475)), "£14.75");
    /// ```
    pub fn format_price(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        assert!(KioskConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: KioskConfig = toml::from_str(r#"store_name = "Catshop""#).unwrap();
        assert_eq!(config.store_name, "Catshop");
        assert_eq!(config.currency_symbol, "£");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("KIOSK_DB_PATH", "/tmp/kiosk.db"),
            ("KIOSK_IMAGE_DIR", "/srv/pics"),
            ("KIOSK_STORE_NAME", "Night Shop"),
            ("KIOSK_CURRENCY_SYMBOL", "$"),
        ]
        .into_iter()
        .collect();

        let mut config = KioskConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/kiosk.db")));
        assert_eq!(config.image_dir, PathBuf::from("/srv/pics"));
        assert_eq!(config.store_name, "Night Shop");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/kiosk.db"));
    }

    #[test]
    fn test_validation() {
        let mut config = KioskConfig::default();
        config.store_name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = KioskConfig::default();
        config.currency_symbol = "EURO".to_string();
        assert!(config.validate().is_err());

        let mut config = KioskConfig::default();
        config.database_path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("kiosk-no-such-config.toml");
        let config = KioskConfig::load(Some(path)).unwrap();
        assert!(!config.store_name.is_empty());
    }

    #[test]
    fn test_picture_path_and_price() {
        let config = KioskConfig::default();
        assert_eq!(
            config.picture_path(&ProductImage::new("pic0001.jpg")),
            PathBuf::from("images/pic0001.jpg")
        );
        assert_eq!(config.format_price(Money::from_cents(1475)), "£14.75");
    }
}
