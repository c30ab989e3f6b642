//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the database file inside the root folder
pub const DATABASE_FILE: &str = "scoutline.db";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SCOUTLINE_ROOT_FOLDER";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder if missing and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Cannot create root folder {}: {}", root.display(), e)))?;
    Ok(root.join(DATABASE_FILE))
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/scoutline/config.toml first, then /etc/scoutline/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("scoutline").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/scoutline/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let path = dirs::config_dir()
        .map(|d| d.join("scoutline").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("scoutline"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/scoutline"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("scoutline"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/scoutline"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("scoutline"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\scoutline"))
    } else {
        PathBuf::from("./scoutline_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let root = resolve_root_folder(Some("/tmp/scoutline-test"));
        assert_eq!(root, PathBuf::from("/tmp/scoutline-test"));
    }

    #[test]
    fn test_ensure_root_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        let db_path = ensure_root_folder(&nested).unwrap();
        assert!(nested.exists());
        assert!(db_path.ends_with(DATABASE_FILE));
    }
}
