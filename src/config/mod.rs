use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::{Result, Context};
use lazy_static::lazy_static;
use log::debug;
use std::sync::RwLock;

/// Storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub data_dir: String,
    /// Key under which the registered users are stored
    pub users_key: String,
}

/// Profile photo configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhotoConfig {
    /// Largest accepted photo in bytes
    pub max_bytes: u64,
    /// Required prefix of the declared media type
    pub accepted_prefix: String,
}

/// Form validation limits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Maximum first/last name length in characters
    pub name_max_len: usize,
    /// Maximum email length in characters
    pub email_max_len: usize,
    /// Maximum password length in characters
    pub password_max_len: usize,
}

/// Global application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Application version
    pub version: String,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Photo configuration
    pub photo: PhotoConfig,
    /// Validation configuration
    pub validation: ValidationConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            users_key: crate::storage::USERS_KEY.to_string(),
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_bytes: crate::user::MAX_PHOTO_BYTES,
            accepted_prefix: "image/".to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_max_len: crate::user::MAX_NAME_LENGTH,
            email_max_len: crate::user::MAX_EMAIL_LENGTH,
            password_max_len: crate::user::MAX_PASSWORD_LENGTH,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Profile Registration".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageConfig::default(),
            photo: PhotoConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

// Global configuration instance
lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// Load configuration from file
pub fn load_config(path: &str) -> Result<()> {
    // Write out the defaults on first run
    if !Path::new(path).exists() {
        debug!("No config at {}, writing defaults", path);
        let default_config = Config::default();
        save_config(path, &default_config)?;
        *CONFIG.write().unwrap() = default_config;
        return Ok(());
    }

    let mut file = File::open(path).context(format!("Failed to open config file: {}", path))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).context("Failed to read config file")?;

    let config: Config = match path.ends_with(".toml") {
        true => toml::from_str(&contents).context("Failed to parse TOML config")?,
        false => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    *CONFIG.write().unwrap() = config;

    Ok(())
}

/// Save configuration to file
pub fn save_config(path: &str, config: &Config) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    let serialized = match path.ends_with(".toml") {
        true => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        false => serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?,
    };

    std::fs::write(path, serialized).context(format!("Failed to write config to file: {}", path))?;

    Ok(())
}

/// Get a copy of the current config
pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

/// Update the current config
pub fn update_config(config: Config) -> Result<()> {
    *CONFIG.write().unwrap() = config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Tests that touch the global config run one at a time
    lazy_static! {
        static ref GLOBAL_CONFIG_LOCK: Mutex<()> = Mutex::new(());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "Profile Registration");
        assert_eq!(config.storage.users_key, "users");
        assert_eq!(config.photo.max_bytes, 2 * 1024 * 1024);
        assert_eq!(config.photo.accepted_prefix, "image/");
        assert_eq!(config.validation.name_max_len, 255);
        assert_eq!(config.validation.email_max_len, 255);
        assert_eq!(config.validation.password_max_len, 10);
    }

    #[test]
    fn test_load_save_config() {
        let _guard = GLOBAL_CONFIG_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("test_config.toml");
        let config_path_str = config_path.to_str().unwrap();

        let mut config = Config::default();
        config.storage.data_dir = "/var/lib/registration".to_string();
        save_config(config_path_str, &config).unwrap();

        load_config(config_path_str).unwrap();
        let loaded_config = get_config();

        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_json_config_round_trip() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let config_path_str = config_path.to_str().unwrap();

        let mut config = Config::default();
        config.photo.max_bytes = 1024;
        save_config(config_path_str, &config).unwrap();

        let contents = std::fs::read_to_string(&config_path).unwrap();
        let parsed: Config = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.photo.max_bytes, 1024);
    }

    #[test]
    fn test_missing_config_writes_defaults() {
        let _guard = GLOBAL_CONFIG_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_str().unwrap();

        load_config(config_path_str).unwrap();

        assert!(config_path.exists());
        let contents = std::fs::read_to_string(&config_path).unwrap();
        let parsed: Config = toml::from_str(&contents).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
