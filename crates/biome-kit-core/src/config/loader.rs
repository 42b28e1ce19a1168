//! Options file discovery and loading

use std::path::{Path, PathBuf};

use super::kit_config::KitConfig;
use crate::error::BiomeKitError;
use crate::result::Result;

/// Options file names, in discovery priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "biome-kit.json",
    "biome-kit.jsonc",
    "biome-kit.yaml",
    "biome-kit.yml",
    "biome-kit.toml",
];

/// Discovers and loads biome-kit options files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover an options file by traversing upward from `start_path`.
    ///
    /// Each directory is checked for the names in [`CONFIG_FILE_NAMES`], in
    /// order, until a file is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| BiomeKitError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load options from a specific file
    pub fn load_from_file(path: &Path) -> Result<KitConfig> {
        KitConfig::load(path).map_err(|e| {
            BiomeKitError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load options from `custom_path`, or discover them from `start_dir`
    /// (default: the current directory).
    ///
    /// Returns the file that was used alongside the options.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<(PathBuf, KitConfig)> {
        let config_path = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(BiomeKitError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        } else {
            let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
            Self::auto_discover(search_dir)?.ok_or_else(|| {
                BiomeKitError::config_error(
                    "No config file found (biome-kit.json, biome-kit.jsonc, biome-kit.yaml, biome-kit.yml or biome-kit.toml). Run 'biome-kit config init' to create one",
                )
            })?
        };

        let config = Self::load_from_file(&config_path)?;
        Ok((config_path, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_auto_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "biome-kit.yaml", "biome:\n  formatter: true\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "biome-kit.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "biome-kit.toml", "[biome]\nlinter = true\n");
        create_temp_config(temp_dir.path(), "biome-kit.jsonc", "{}");
        create_temp_config(temp_dir.path(), "biome-kit.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "biome-kit.json");
    }

    #[test]
    fn test_load_from_file_jsonc() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "biome-kit.jsonc",
            r#"{
                // enable formatting
                "biome": { "formatter": true, },
            }"#,
        );

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.biome.formatter, Some(true));
    }

    #[test]
    fn test_load_with_custom_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "custom.toml", "[biome]\nlinter = false\n");

        let (used, config) = ConfigLoader::load(Some(&path), None).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.biome.linter, Some(false));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.json")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "biome-kit.json", "{ invalid json");

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "biome-kit.ini", "x=1");
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
