//! # ds-config
//!
//! Layered configuration loading for diffshame using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DIFFSHAME_*` prefix, `__` as separator)
//! 2. Project-level `.diffshame/config.toml`
//! 3. User-level `~/.config/diffshame/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DIFFSHAME_GITHUB__TOKEN` -> `github.token`,
//! `DIFFSHAME_GEMINI__API_KEY` -> `gemini.api_key`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ds_config::DsConfig;
//!
//! let config = DsConfig::load_with_dotenv_from(Path::new(".")).expect("config");
//!
//! if config.gemini.is_configured() {
//!     println!("Analysis model: {}", config.gemini.model);
//! }
//! ```

mod error;
mod gemini;
mod general;
mod github;
mod storage;

pub use error::ConfigError;
pub use gemini::GeminiConfig;
pub use general::GeneralConfig;
pub use github::GitHubConfig;
pub use storage::{StorageBackend, StorageConfig};

use ds_core::{Sector, StorageLayout};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the project-local config file.
pub const PROJECT_DIR: &str = ".diffshame";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DsConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DsConfig {
    /// Load configuration with the project-local file taken from `project_root`.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv_from`] for `.env` support.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(project_root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load `project_root/.env` (or the nearest `.env` above the current
    /// directory when the project has none), then the layered configuration.
    ///
    /// Variables already set in the environment win over the `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if a `.env` file exists but cannot be
    /// read or parsed, and [`ConfigError::Figment`] if extraction fails.
    pub fn load_with_dotenv_from(project_root: &Path) -> Result<Self, ConfigError> {
        load_dotenv(project_root)?;
        Self::load_from(project_root)
    }

    /// Build the figment provider chain with `project_root/.diffshame/config.toml`
    /// as the project layer.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("DIFFSHAME_").split("__"))
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unusable sector name, an
    /// empty sector list, or a zero analysis timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sectors()?;
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gemini.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The configured sectors, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the list is empty or a name is
    /// not a valid sector.
    pub fn sectors(&self) -> Result<Vec<Sector>, ConfigError> {
        if self.general.sectors.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.sectors".into(),
                reason: "at least one sector is required".into(),
            });
        }
        self.general
            .sectors
            .iter()
            .map(|name| {
                Sector::new(name).map_err(|e| ConfigError::InvalidValue {
                    field: "general.sectors".into(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Storage layout rooted at `general.data_root`.
    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(&self.general.data_root)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("diffshame").join("config.toml"))
    }
}

/// Load `.env` from the project root, falling back to the usual lookup from
/// the current directory. A missing file is not an error.
fn load_dotenv(project_root: &Path) -> Result<(), ConfigError> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        return dotenvy::from_path(&env_path).map_err(|source| ConfigError::Dotenv {
            path: env_path,
            source,
        });
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(source) => Err(ConfigError::Dotenv {
            path: PathBuf::from(".env"),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DsConfig::default();
        assert!(!config.github.is_configured());
        assert!(!config.gemini.is_configured());
        assert_eq!(config.storage.backend, StorageBackend::Github);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: DsConfig = DsConfig::figment_for(Path::new(".")).extract()?;
            assert!(!config.github.is_configured());
            assert_eq!(config.general.data_root, "data");
            assert_eq!(config.layout().root(), "data");
            Ok(())
        });
    }

    #[test]
    fn validate_rejects_bad_sector() {
        let mut config = DsConfig::default();
        config.general.sectors = vec!["Desk".into(), "../etc".into()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_sectors_and_zero_timeout() {
        let mut config = DsConfig::default();
        config.general.sectors.clear();
        assert!(config.validate().is_err());

        let mut config = DsConfig::default();
        config.gemini.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn project_dotenv_fills_unset_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(".env", "DIFFSHAME_GEMINI__MODEL=gemini-from-dotenv\n")?;
            let config = DsConfig::load_with_dotenv_from(jail.directory())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.gemini.model, "gemini-from-dotenv");
            Ok(())
        });
    }

    #[test]
    fn shell_environment_wins_over_dotenv() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DIFFSHAME_GEMINI__API_KEY", "from-shell");
            jail.create_file(".env", "DIFFSHAME_GEMINI__API_KEY=from-dotenv\n")?;
            let config = DsConfig::load_with_dotenv_from(jail.directory())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.gemini.api_key, "from-shell");
            Ok(())
        });
    }

    #[test]
    fn unparsable_dotenv_is_reported() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(".env", "this line has no equals sign\n")?;
            let err = DsConfig::load_with_dotenv_from(jail.directory()).unwrap_err();
            assert!(matches!(err, ConfigError::Dotenv { ref path, .. } if path.ends_with(".env")));
            Ok(())
        });
    }

    #[test]
    fn missing_dotenv_is_not_an_error() {
        figment::Jail::expect_with(|jail| {
            let config = DsConfig::load_with_dotenv_from(jail.directory())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.general.data_root, "data");
            Ok(())
        });
    }
}
