//! Export, import and reset of the whole data set as a single versioned JSON document.

use crate::error::{Error, ErrorType, IntoResult, Res, Result};
use crate::model::{Category, Goal, Transaction};
use crate::storage;
use crate::store::{decode_list, Store};
use crate::utils;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The version tag written into every backup document.
pub const BACKUP_VERSION: &str = "1.0";

/// The default number of export history entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// The document written by an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub app_name: String,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub categories: Vec<Category>,
}

/// One line of the export history log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub filename: String,
    pub tx_count: usize,
    pub goals_count: usize,
    pub date: DateTime<Utc>,
}

/// The result of an export: a suggested filename and the document text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Export {
    pub filename: String,
    pub contents: String,
    pub entry: HistoryEntry,
}

/// A parsed import document in which all three collections are present. Only a value of this
/// type can be restored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBackup {
    version: Option<String>,
    exported_at: Option<String>,
    app_name: Option<String>,
    transactions: Value,
    goals: Value,
    categories: Value,
}

impl ValidatedBackup {
    /// Parses `text` and checks that `transactions`, `goals` and `categories` are present and
    /// not null. Returns a `Parse` error for text that is not JSON and a `Validation` error for
    /// JSON that is not a backup document.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .context("The backup is not valid JSON")
            .pub_result(ErrorType::Parse)?;
        let Value::Object(mut object) = value else {
            return Err(Error::msg(
                ErrorType::Validation,
                "The backup must be a JSON object",
            ));
        };
        let mut take = |field: &str| match object.remove(field) {
            Some(Value::Null) | None => Err(Error::msg(
                ErrorType::Validation,
                format!("Invalid backup: the '{field}' field is missing"),
            )),
            Some(value) => Ok(value),
        };
        let transactions = take("transactions")?;
        let goals = take("goals")?;
        let categories = take("categories")?;
        let text_field = |field: &str| {
            object
                .get(field)
                .and_then(Value::as_str)
                .map(String::from)
        };
        Ok(Self {
            version: text_field("version"),
            exported_at: text_field("exportedAt"),
            app_name: text_field("appName"),
            transactions,
            goals,
            categories,
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn exported_at(&self) -> Option<&str> {
        self.exported_at.as_deref()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn transactions_count(&self) -> usize {
        count(&self.transactions)
    }

    pub fn goals_count(&self) -> usize {
        count(&self.goals)
    }

    pub fn categories_count(&self) -> usize {
        count(&self.categories)
    }
}

fn count(value: &Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or_default()
}

/// Backup operations over a `Store`.
#[derive(Clone, Copy)]
pub struct Backup<'a> {
    store: &'a Store,
    app_name: &'a str,
    history_limit: usize,
}

impl<'a> Backup<'a> {
    pub fn new(store: &'a Store, app_name: &'a str, history_limit: usize) -> Self {
        Self {
            store,
            app_name,
            history_limit,
        }
    }

    /// Serializes the current data set and records the export in the history log. The caller
    /// decides where the contents go.
    pub async fn export(&self, now: DateTime<Utc>) -> Result<Export> {
        let (filename, contents, doc) = self.prepare(now).await?;
        let entry = self.record(&filename, &doc).await?;
        Ok(Export {
            filename,
            contents,
            entry,
        })
    }

    /// Exports into `dir`, which must exist. An existing file is never overwritten; a sequence
    /// number is appended to the name instead. Returns the path written and its history entry.
    pub async fn export_to(
        &self,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<(PathBuf, HistoryEntry)> {
        let (filename, contents, doc) = self.prepare(now).await?;
        let path = unique_path(dir, &filename)
            .await
            .pub_result(ErrorType::Storage)?;
        utils::write(&path, &contents)
            .await
            .pub_result(ErrorType::Storage)?;
        let written = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or(filename);
        let entry = self.record(&written, &doc).await?;
        info!("Exported backup to {}", path.display());
        Ok((path, entry))
    }

    /// Overwrites all three collections with the contents of `backup`. Collections are written
    /// one key at a time, so a storage failure part way leaves the earlier keys replaced.
    pub async fn restore(&self, backup: &ValidatedBackup) -> Result<()> {
        let _guard = self.store.lock().await;
        let res: Res<()> = async {
            let medium = self.store.storage();
            for (key, value) in [
                (storage::TRANSACTIONS, &backup.transactions),
                (storage::GOALS, &backup.goals),
                (storage::CATEGORIES, &backup.categories),
            ] {
                let json = serde_json::to_string(value)?;
                medium
                    .set(key, &json)
                    .await
                    .with_context(|| format!("Unable to restore '{key}'"))?;
            }
            Ok(())
        }
        .await;
        res.pub_result(ErrorType::Storage)?;
        info!(
            "Restored {} transactions, {} goals and {} categories",
            backup.transactions_count(),
            backup.goals_count(),
            backup.categories_count()
        );
        Ok(())
    }

    /// Removes all three collections. The next `Store::init` seeds the sample data again.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.store.lock().await;
        let res: Res<()> = async {
            let medium = self.store.storage();
            for key in [storage::TRANSACTIONS, storage::GOALS, storage::CATEGORIES] {
                medium
                    .remove(key)
                    .await
                    .with_context(|| format!("Unable to remove '{key}'"))?;
            }
            Ok(())
        }
        .await;
        res.pub_result(ErrorType::Storage)?;
        info!("Removed all transactions, goals and categories");
        Ok(())
    }

    /// The export history, most recent first. Unreadable history reads as empty.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        match self.store.storage().get(storage::BACKUP_HISTORY).await {
            Ok(Some(text)) => decode_list(storage::BACKUP_HISTORY, &text),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Unable to read the backup history: {e:#}");
                Vec::new()
            }
        }
    }

    async fn prepare(&self, now: DateTime<Utc>) -> Result<(String, String, BackupDocument)> {
        let data = self.store.snapshot().await;
        let doc = BackupDocument {
            version: BACKUP_VERSION.to_string(),
            exported_at: now,
            app_name: self.app_name.to_string(),
            transactions: data.transactions,
            goals: data.goals,
            categories: data.categories,
        };
        let contents = serde_json::to_string_pretty(&doc)
            .context("Unable to serialize the backup document")
            .pub_result(ErrorType::Internal)?;
        let filename = format!("{}-{}.json", slug(self.app_name), now.format("%Y-%m-%d"));
        Ok((filename, contents, doc))
    }

    async fn record(&self, filename: &str, doc: &BackupDocument) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            filename: filename.to_string(),
            tx_count: doc.transactions.len(),
            goals_count: doc.goals.len(),
            date: doc.exported_at,
        };
        let _guard = self.store.lock().await;
        let mut history = self.history().await;
        history.insert(0, entry.clone());
        history.truncate(self.history_limit);
        let json = serde_json::to_string(&history)
            .context("Unable to serialize the backup history")
            .pub_result(ErrorType::Internal)?;
        self.store
            .storage()
            .set(storage::BACKUP_HISTORY, &json)
            .await
            .pub_result(ErrorType::Storage)?;
        debug!("Backup history now holds {} entries", history.len());
        Ok(entry)
    }
}

/// Lowercases `name` and joins its alphanumeric runs with `-`.
fn slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "backup".to_string()
    } else {
        slug
    }
}

/// `dir/filename`, or `dir/{stem}-{n}.json` with the smallest `n` that does not exist yet.
async fn unique_path(dir: &Path, filename: &str) -> Res<PathBuf> {
    let path = dir.join(filename);
    if !utils::exists(&path).await? {
        return Ok(path);
    }
    let stem = filename.strip_suffix(".json").unwrap_or(filename);
    let mut seq = 2u32;
    loop {
        let candidate = dir.join(format!("{stem}-{seq}.json"));
        if !utils::exists(&candidate).await? {
            return Ok(candidate);
        }
        seq += 1;
    }
}
