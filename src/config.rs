//! Configuration file handling for fintrack.
//!
//! The configuration file is stored at `$FINTRACK_HOME/config.json`. Next to it live the `data`
//! directory, which holds one JSON file per storage key, and the `backups` directory where
//! exports are written by default.

use crate::backup::{Backup, DEFAULT_HISTORY_LIMIT};
use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::model::DEFAULT_OVERFUND_FACTOR;
use crate::storage::FileStorage;
use crate::store::Store;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "fintrack";
const APP_LABEL: &str = "fintrack";
const CONFIG_VERSION: u8 = 1;
const DATA: &str = "data";
const BACKUPS: &str = "backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINTRACK_HOME` and from there it loads `$FINTRACK_HOME/config.json`. It
/// provides the paths of the data and backups directories and builds the `Store` over them.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its subdirectories and an initial `config.json` with default
    /// settings. An existing `config.json` is kept as it is.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/fintrack`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or an existing config file is invalid.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the fintrack home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let data = root.join(DATA);
        utils::make_dir(&data).await?;
        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            data,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `fintrack_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the data and backups directories exist
    /// - return the loaded configuration object
    pub async fn load(fintrack_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(fintrack_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        if !maybe_relative.is_dir() {
            bail!(
                "The fintrack home directory is missing '{}', run 'fintrack init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            data: root.join(DATA),
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.data.is_dir() {
            bail!("The data directory is missing '{}'", config.data.display())
        }
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    /// The application name written into backup documents and used for backup filenames.
    pub fn app_label(&self) -> &str {
        &self.config_file.app_label
    }

    pub fn backup_history_limit(&self) -> usize {
        self.config_file.backup_history_limit
    }

    pub fn overfund_factor(&self) -> u32 {
        self.config_file.overfund_factor
    }

    /// Builds a `Store` over the files in the data directory.
    pub fn store(&self) -> Store {
        Store::new(Arc::new(FileStorage::new(&self.data)))
            .with_overfund_factor(self.overfund_factor())
    }

    /// Creates a `Backup` for `store` using the configured name and history limit.
    pub fn backup<'a>(&'a self, store: &'a Store) -> Backup<'a> {
        Backup::new(store, self.app_label(), self.backup_history_limit())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fintrack",
///   "config_version": 1,
///   "app_label": "My Finances",
///   "backup_history_limit": 10,
///   "overfund_factor": 2
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fintrack"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Name written into backup documents and used as the backup filename prefix
    #[serde(default = "default_app_label")]
    app_label: String,

    /// Number of export history entries to keep
    #[serde(default = "default_backup_history_limit")]
    backup_history_limit: usize,

    /// Contributions may take a goal up to this multiple of its target
    #[serde(default = "default_overfund_factor")]
    overfund_factor: u32,
}

fn default_app_label() -> String {
    APP_LABEL.to_string()
}

fn default_backup_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_overfund_factor() -> u32 {
    DEFAULT_OVERFUND_FACTOR
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            app_label: default_app_label(),
            backup_history_limit: default_backup_history_limit(),
            overfund_factor: default_overfund_factor(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it holds invalid settings.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.overfund_factor >= 1,
            "Invalid overfund_factor in config file: expected at least 1, got {}",
            config.overfund_factor
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
