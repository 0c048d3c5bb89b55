//! The key-value persistence medium underneath the `Store`.
//!
//! The `Storage` trait holds string values under fixed string keys, with whole
//! value overwrite as the only write. `FileStorage` keeps one file per key on disk and
//! `MemoryStorage` keeps everything in a map, which makes it handy for tests.

mod file;
mod memory;

use crate::error::Res;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Holds the JSON array of transactions.
pub const TRANSACTIONS: &str = "transactions";

/// Holds the JSON array of goals.
pub const GOALS: &str = "goals";

/// Holds the JSON array of categories. Its absence means the store has never been initialized.
pub const CATEGORIES: &str = "categories";

/// Holds `"true"` or `"false"`.
pub const DARK_MODE: &str = "dark_mode";

/// Holds the JSON array of export history entries.
pub const BACKUP_HISTORY: &str = "backup_history";

/// A string key-value store. Writes replace the whole value of a key atomically.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value stored at `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Res<Option<String>>;

    /// Stores `value` at `key`, replacing what was there.
    async fn set(&self, key: &str, value: &str) -> Res<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Res<()>;
}
