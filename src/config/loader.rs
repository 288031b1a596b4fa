//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/cuentas/config.toml)
//! 3. Environment variables (CUENTAS_* prefix, `__` as section separator)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use super::types::Config;
use crate::types::{CuentasError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global file → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // e.g. CUENTAS_EXTRACTION__TIMEOUT_SECS -> extraction.timeout_secs
        figment = figment.merge(Env::prefixed("CUENTAS_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| CuentasError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CuentasError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to the global config directory
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cuentas").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file path and whether it exists
    pub fn show_path() {
        match Self::global_config_path() {
            Some(path) => {
                let exists = if path.exists() { "✓" } else { "✗" };
                println!("  Global: {} {}", exists, path.display());
            }
            None => println!("  Global: (not available)"),
        }
    }

    /// Print the current effective configuration as TOML
    pub fn show_config() -> Result<()> {
        let config = Self::load()?;
        println!(
            "{}",
            toml::to_string_pretty(&config).map_err(|e| CuentasError::Config(e.to_string()))?
        );
        Ok(())
    }

    /// Write the default configuration to the global config file
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let dir = Self::global_dir().ok_or_else(|| {
            CuentasError::Config("Cannot determine global config directory".to_string())
        })?;
        let path = dir.join("config.toml");

        if path.exists() && !force {
            return Err(CuentasError::Config(format!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }

        fs::create_dir_all(&dir)?;
        let contents = toml::to_string_pretty(&Config::default())
            .map_err(|e| CuentasError::Config(e.to_string()))?;
        fs::write(&path, contents)?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[extraction]
models = ["gemini-1.5-flash"]
timeout_secs = 30

[image]
normalize = false
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.extraction.models, vec!["gemini-1.5-flash"]);
        assert_eq!(config.extraction.timeout_secs, 30);
        assert!(!config.image.normalize);
        // Untouched sections keep their defaults
        assert_eq!(config.image.max_edge, 1024);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[extraction]
models = []
"#
        )
        .unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }
}
