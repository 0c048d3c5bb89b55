use crate::error::Res;
use crate::storage::Storage;
use crate::utils;
use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::trace;

/// Implements `Storage` with one `{key}.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` for storage. The directory is expected to exist; see `Config::create`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> Res<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Res<Option<String>> {
        trace!("get {key}");
        let path = self.path(key)?;
        utils::read_optional(&path)
            .await
            .with_context(|| format!("Unable to read '{key}' from storage"))
    }

    async fn set(&self, key: &str, value: &str) -> Res<()> {
        trace!("set {key} ({} bytes)", value.len());
        let path = self.path(key)?;
        utils::write_atomic(&path, value)
            .await
            .with_context(|| format!("Unable to write '{key}' to storage"))
    }

    async fn remove(&self, key: &str) -> Res<()> {
        trace!("remove {key}");
        let path = self.path(key)?;
        utils::remove(&path)
            .await
            .with_context(|| format!("Unable to remove '{key}' from storage"))
    }
}
