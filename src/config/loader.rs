//! Configuration loading and discovery for `figure.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::FigureConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up by discovery
pub const CONFIG_FILE_NAME: &str = "figure.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse figure.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the source catalog document path
    pub figuredata: Option<PathBuf>,
    /// Override the classification document path
    pub furnidata: Option<PathBuf>,
    /// Override the fetch timeout
    pub fetch_timeout_ms: Option<u64>,
}

/// Find figure.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for figure.toml
/// 2. Check XDG_CONFIG_HOME/figurekit/figure.toml (or ~/.config/figurekit/figure.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find figure.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("figurekit").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find figure.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a figure.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// Relative document paths in the `[catalog]` section are resolved against
/// the directory containing the config file.
pub fn load_config(path: Option<&Path>) -> Result<FigureConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(FigureConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<FigureConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: FigureConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = path.parent() {
        config.catalog.figuredata = config.catalog.figuredata.map(|p| resolve_path(root, &p));
        config.catalog.furnidata = config.catalog.furnidata.map(|p| resolve_path(root, &p));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut FigureConfig, overrides: &CliOverrides) {
    if let Some(ref figuredata) = overrides.figuredata {
        config.catalog.figuredata = Some(figuredata.clone());
    }

    if let Some(ref furnidata) = overrides.furnidata {
        config.catalog.furnidata = Some(furnidata.clone());
    }

    if let Some(timeout) = overrides.fetch_timeout_ms {
        config.catalog.fetch_timeout_ms = timeout;
    }
}

/// Resolve a path relative to the config directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("data").join("catalog");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_resolves_relative_documents() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            "[catalog]\nfiguredata = \"data/figuredata.xml\"\nfurnidata = \"/abs/furnidata.json\"\n",
        );

        let config = load_config(Some(config_path.as_path())).expect("config should load");
        assert_eq!(config.catalog.figuredata, Some(temp.path().join("data/figuredata.xml")));
        assert_eq!(config.catalog.furnidata, Some(PathBuf::from("/abs/furnidata.json")));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[catalog]\ncategories = []\n");

        let err = load_config(Some(config_path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("catalog.categories"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[catalog\n");

        assert!(matches!(load_config(Some(config_path.as_path())), Err(ConfigError::Parse(_))));
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("figurekit");
        fs::create_dir_all(&dir).expect("should create xdg dir");
        let config_path = write_config(&dir, "");

        let previous = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = FigureConfig::default();
        let overrides = CliOverrides {
            figuredata: Some(PathBuf::from("figuredata.xml")),
            fetch_timeout_ms: Some(250),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.catalog.figuredata, Some(PathBuf::from("figuredata.xml")));
        assert_eq!(config.catalog.furnidata, None);
        assert_eq!(config.catalog.fetch_timeout_ms, 250);
    }
}
