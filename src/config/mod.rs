//! Configuration module

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Which store backs memo operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Local or remote store
    #[serde(default)]
    pub backend: Backend,

    /// Explicit database path (overrides discovery)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Remote server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server URL (e.g., "http://localhost:3000")
    #[serde(default)]
    pub url: Option<String>,

    /// Authentication token
    #[serde(default)]
    pub token: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_api_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Category assigned when `add` gets no --category flag
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Rows shown by `list` before truncating
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            page_size: default_page_size(),
        }
    }
}

fn default_category() -> String {
    "other".to_string()
}

fn default_page_size() -> usize {
    50
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        // Return default config
        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .memo/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(".memo").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find local .memo/memos.db walking up directories
    pub fn find_local_db() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let db_path = current.join(".memo").join("memos.db");
            if db_path.exists() {
                return Some(db_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Global memo directory (~/.memo, or $MEMO_HOME when set)
    pub fn global_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("MEMO_HOME") {
            return Some(PathBuf::from(home));
        }
        dirs::home_dir().map(|h| h.join(".memo"))
    }

    /// Get global config path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|d| d.join("config.toml"))
    }

    /// Get global database path
    pub fn global_db_path() -> Option<PathBuf> {
        Self::global_dir().map(|d| d.join("memos.db"))
    }

    /// Get database path with priority:
    /// 1. MEMO_DATABASE env var
    /// 2. storage.path from config
    /// 3. Local .memo/memos.db (walking up from CWD)
    /// 4. Global ~/.memo/memos.db
    pub fn db_path(&self) -> PathBuf {
        // 1. Environment variable
        if let Ok(env_path) = std::env::var("MEMO_DATABASE") {
            return PathBuf::from(env_path);
        }

        // 2. Explicit config override
        if let Some(path) = &self.storage.path {
            return path.clone();
        }

        // 3. Local .memo/memos.db (search up from current directory)
        if let Some(local_db) = Self::find_local_db() {
            return local_db;
        }

        // 4. Local .memo/ directory exists (even without memos.db yet)
        if let Some(local_config) = Self::find_local_config() {
            return local_config.parent().unwrap().join("memos.db");
        }

        // 5. Global ~/.memo/memos.db
        if let Some(global) = Self::global_db_path() {
            return global;
        }

        // 6. Fallback to current directory
        PathBuf::from(".memo").join("memos.db")
    }

    /// Preference file path
    ///
    /// Preferences are user-scoped, not project-scoped, so they always live
    /// in the global directory.
    pub fn prefs_path() -> PathBuf {
        Self::global_dir()
            .map(|d| d.join("prefs.toml"))
            .unwrap_or_else(|| PathBuf::from(".memo").join("prefs.toml"))
    }
}

/// Flat key-value preference file
///
/// Backs the persisted theme choice. Read/write errors propagate to the
/// caller; a missing file just means no stored value yet.
#[derive(Debug, Clone)]
pub struct PrefStore {
    path: PathBuf,
}

impl PrefStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Open the user-global preference file
    pub fn open_default() -> Self {
        Self::new(Config::prefs_path())
    }

    /// Read a stored value
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let table: toml::Table = toml::from_str(&content)?;
        Ok(table
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    /// Write a value, creating the file if needed
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut table = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            toml::from_str::<toml::Table>(&content)?
        } else {
            toml::Table::new()
        };

        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }
}

/// Helper to get directories crate functionality
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE").ok().map(PathBuf::from)
        }
        #[cfg(not(windows))]
        {
            std::env::var("HOME").ok().map(PathBuf::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, Backend::Local);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.default_category, "other");
        assert_eq!(config.ui.page_size, 50);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "http://localhost:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.backend, Backend::Local);
    }

    #[test]
    fn test_backend_parse() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "remote"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, Backend::Remote);
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.api.url = Some("http://example.com".to_string());
        config.save_to(&path)?;

        let reloaded = Config::load_from(&path)?;
        assert_eq!(reloaded.api.url.as_deref(), Some("http://example.com"));

        Ok(())
    }

    #[test]
    fn test_pref_store_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = PrefStore::new(dir.path().join("prefs.toml"));
        assert_eq!(store.get("anything")?, None);
        Ok(())
    }

    #[test]
    fn test_pref_store_set_get() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = PrefStore::new(dir.path().join("prefs.toml"));

        store.set("memo-app-theme", "dark")?;
        assert_eq!(store.get("memo-app-theme")?.as_deref(), Some("dark"));

        // Overwrite keeps other keys intact
        store.set("other-key", "x")?;
        store.set("memo-app-theme", "light")?;
        assert_eq!(store.get("memo-app-theme")?.as_deref(), Some("light"));
        assert_eq!(store.get("other-key")?.as_deref(), Some("x"));

        Ok(())
    }
}
