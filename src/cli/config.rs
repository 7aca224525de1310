//! `memo config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! memo config                      # Show all config
//! memo config api.url              # Get specific value
//! memo config api.url https://...  # Set value
//! memo config --list               # List all
//! memo config --edit               # Open in $EDITOR
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., api.url, ui.page_size, storage.backend)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// List all config values
    #[arg(long)]
    pub list: bool,

    /// Edit config file in $EDITOR
    #[arg(short, long)]
    pub edit: bool,

    /// Show config file paths
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.memo/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool) -> PathBuf {
    if global {
        Config::global_config_path()
            .unwrap_or_else(|| PathBuf::from(".memo").join("config.toml"))
    } else {
        Config::find_local_config()
            .unwrap_or_else(|| PathBuf::from(".memo").join("config.toml"))
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global);

    if args.path {
        println!("Global: {}", get_config_path(true).display());
        println!("Local:  {}", get_config_path(false).display());
        println!();
        if config_path.exists() {
            println!("✓ Active: {}", config_path.display());
        } else {
            println!("⚠ No config file found at {}", config_path.display());
        }
        return Ok(());
    }

    if args.edit {
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, "# memo configuration\n\n")?;
            println!("Created {}", config_path.display());
        }

        std::process::Command::new(&editor)
            .arg(&config_path)
            .status()
            .with_context(|| format!("Failed to open editor: {}", editor))?;
        return Ok(());
    }

    if args.list || (args.key.is_none() && args.value.is_none()) {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            println!("Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("No config file at {}", config_path.display());
            println!();
            println!("Create one with:");
            println!("  memo init");
            println!("  memo config api.url https://memo.example.com");
        }
        return Ok(());
    }

    if let Some(key) = &args.key {
        if let Some(value) = &args.value {
            set_config_value(&config_path, key, value)?;
            println!("✅ Set {} = {} (in {})", key, value, config_path.display());
        } else {
            let val = get_config_value(&config_path, key)?;
            match val {
                Some(v) => println!("{}", v),
                None => println!("(not set)"),
            }
        }
    }

    Ok(())
}

/// Set a nested config value using dot notation (e.g., "api.url")
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    use toml_edit::{value, DocumentMut};

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() == 1 {
        doc[parts[0]] = value(parse_toml_value(val));
    } else if parts.len() == 2 {
        if doc.get(parts[0]).is_none() {
            doc[parts[0]] = toml_edit::table();
        }
        doc[parts[0]][parts[1]] = value(parse_toml_value(val));
    } else {
        anyhow::bail!("Key too deep: {}. Max depth is section.key", key);
    }

    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Get a config value by dot notation key
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Value = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    let val = if parts.len() == 1 {
        doc.get(parts[0])
    } else if parts.len() == 2 {
        doc.get(parts[0]).and_then(|t| t.get(parts[1]))
    } else {
        None
    };

    Ok(val.map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// Parse string value to appropriate TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if s == "true" {
        return true.into();
    }
    if s == "false" {
        return false.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.into();
    }
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set_config_value(&path, "api.url", "https://example.com").unwrap();
        set_config_value(&path, "ui.page_size", "25").unwrap();

        let url = get_config_value(&path, "api.url").unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com"));

        let size = get_config_value(&path, "ui.page_size").unwrap();
        assert_eq!(size.as_deref(), Some("25"));
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nurl = \"x\"\n").unwrap();

        assert!(get_config_value(&path, "api.token").unwrap().is_none());
        assert!(get_config_value(&path, "nope.nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_preserves_existing_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\nbackend = \"local\"\n").unwrap();

        set_config_value(&path, "api.url", "https://example.com").unwrap();

        let backend = get_config_value(&path, "storage.backend").unwrap();
        assert_eq!(backend.as_deref(), Some("local"));
    }

    #[test]
    fn test_deep_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value(&path, "a.b.c", "1").is_err());
    }

    #[test]
    fn test_values_keep_their_toml_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set_config_value(&path, "ui.page_size", "25").unwrap();
        set_config_value(&path, "api.url", "plain").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("page_size = 25"));
        assert!(content.contains("url = \"plain\""));
    }
}
