//! The `Store` is the only component that reads or writes the entity collections.
//!
//! Every collection lives as one JSON array under a fixed key. Reads always fetch the whole
//! array and writes always replace the whole array. Mutations run under a single async lock so
//! that concurrent writers sharing a `Store` cannot interleave their read-modify-write cycles.
//! Two processes pointed at the same data directory can still lose updates (last write wins).

mod seed;

pub(crate) use seed::sample_data;

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::model::{
    Amount, Category, Contribution, FinanceData, Goal, GoalUpdate, Transaction, TransactionUpdate,
    DEFAULT_OVERFUND_FACTOR,
};
use crate::storage::{self, Storage};
use anyhow::Context;
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// An entity kept in one of the persisted collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The storage key of the collection.
    const KEY: &'static str;

    fn id(&self) -> &str;
}

/// A record that callers may add, update and delete. Categories are records but not editable.
pub trait Editable: Record {
    /// A partial change where absent fields are left as they are.
    type Update: Send + Sync;

    fn apply(&mut self, update: &Self::Update);
}

impl Record for Transaction {
    const KEY: &'static str = storage::TRANSACTIONS;

    fn id(&self) -> &str {
        Transaction::id(self)
    }
}

impl Editable for Transaction {
    type Update = TransactionUpdate;

    fn apply(&mut self, update: &TransactionUpdate) {
        Transaction::apply(self, update)
    }
}

impl Record for Goal {
    const KEY: &'static str = storage::GOALS;

    fn id(&self) -> &str {
        Goal::id(self)
    }
}

impl Editable for Goal {
    type Update = GoalUpdate;

    fn apply(&mut self, update: &GoalUpdate) {
        Goal::apply(self, update)
    }
}

impl Record for Category {
    const KEY: &'static str = storage::CATEGORIES;

    fn id(&self) -> &str {
        Category::id(self)
    }
}

/// The repository over a `Storage`. Construct one per process and pass it by reference.
pub struct Store {
    storage: Arc<dyn Storage>,
    write_lock: Mutex<()>,
    overfund_factor: u32,
}

impl Store {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            overfund_factor: DEFAULT_OVERFUND_FACTOR,
        }
    }

    /// Sets the multiple of a goal's target that contributions may accumulate up to.
    pub fn with_overfund_factor(mut self, overfund_factor: u32) -> Self {
        self.overfund_factor = overfund_factor.max(1);
        self
    }

    pub fn overfund_factor(&self) -> u32 {
        self.overfund_factor
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Serializes writers. Held for the whole read-modify-write of a mutation.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Seeds the sample data set if the store has never been initialized, which is detected by
    /// the absence of the categories key. Returns true if data was seeded.
    pub async fn init(&self, now: DateTime<Local>) -> Result<bool> {
        let _guard = self.lock().await;
        self.init_locked(now).await.pub_result(ErrorType::Storage)
    }

    async fn init_locked(&self, now: DateTime<Local>) -> Res<bool> {
        if self.storage.get(storage::CATEGORIES).await?.is_some() {
            debug!("Store already initialized");
            return Ok(false);
        }
        let data = sample_data(now)?;
        self.save(&data.transactions).await?;
        self.save(&data.goals).await?;
        // Written last so that a failed seed is retried by the next init
        self.save(&data.categories).await?;
        info!(
            "Seeded the store with {} categories, {} transactions and {} goals",
            data.categories.len(),
            data.transactions.len(),
            data.goals.len()
        );
        Ok(true)
    }

    /// Returns every record of the collection. Never fails: an absent key, unreadable storage
    /// or malformed content all yield an empty collection.
    pub async fn get_all<R: Record>(&self) -> Vec<R> {
        match self.load::<R>().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Unable to read '{}', treating it as empty: {e:#}", R::KEY);
                Vec::new()
            }
        }
    }

    /// Finds a record by id.
    pub async fn find<R: Record>(&self, id: &str) -> Option<R> {
        self.get_all::<R>()
            .await
            .into_iter()
            .find(|item| item.id() == id)
    }

    /// Appends `item` to its collection. Ids are not checked for uniqueness.
    pub async fn add<E: Editable>(&self, item: E) -> Result<()> {
        let _guard = self.lock().await;
        let res: Res<()> = async {
            let mut all = self.load::<E>().await?;
            all.push(item);
            self.save(&all).await
        }
        .await;
        res.pub_result(ErrorType::Storage)
    }

    /// Merges `update` into the record with `id`. Returns the updated record, or `None` without
    /// writing anything if no record has that id.
    pub async fn update<E: Editable>(&self, id: &str, update: &E::Update) -> Result<Option<E>> {
        let _guard = self.lock().await;
        let res: Res<Option<E>> = async {
            let mut all = self.load::<E>().await?;
            let mut updated = None;
            for item in all.iter_mut().filter(|item| item.id() == id) {
                item.apply(update);
                updated = Some(item.clone());
            }
            if updated.is_some() {
                self.save(&all).await?;
            }
            Ok(updated)
        }
        .await;
        res.pub_result(ErrorType::Storage)
    }

    /// Removes the record with `id`. Returns false without writing anything if it was not found.
    pub async fn delete<E: Editable>(&self, id: &str) -> Result<bool> {
        let _guard = self.lock().await;
        let res: Res<bool> = async {
            let mut all = self.load::<E>().await?;
            let before = all.len();
            all.retain(|item| item.id() != id);
            if all.len() == before {
                return Ok(false);
            }
            self.save(&all).await?;
            Ok(true)
        }
        .await;
        res.pub_result(ErrorType::Storage)
    }

    /// Adds `amount` to a goal, capped at `overfund_factor × target`. Returns `None` if the goal
    /// does not exist.
    pub async fn contribute(&self, goal_id: &str, amount: Amount) -> Result<Option<Contribution>> {
        let _guard = self.lock().await;
        let mut all = self.load::<Goal>().await.pub_result(ErrorType::Storage)?;
        let Some(goal) = all.iter_mut().find(|g| g.id() == goal_id) else {
            return Ok(None);
        };
        let completed_now = goal.contribute(amount, self.overfund_factor)?;
        let contribution = Contribution {
            goal: goal.clone(),
            requested: amount,
            completed_now,
        };
        self.save(&all).await.pub_result(ErrorType::Storage)?;
        Ok(Some(contribution))
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.get_all().await
    }

    pub async fn goals(&self) -> Vec<Goal> {
        self.get_all().await
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.get_all().await
    }

    /// Looks up a category, falling back to `Category::fallback()` for an unknown id.
    pub async fn category(&self, id: &str) -> Category {
        self.find(id).await.unwrap_or_else(Category::fallback)
    }

    /// Reads all three collections.
    pub async fn snapshot(&self) -> FinanceData {
        FinanceData {
            transactions: self.transactions().await,
            goals: self.goals().await,
            categories: self.categories().await,
        }
    }

    /// Dark mode is on unless it has been explicitly stored as `"false"`.
    pub async fn dark_mode(&self) -> bool {
        match self.storage.get(storage::DARK_MODE).await {
            Ok(value) => value.as_deref().map(str::trim) != Some("false"),
            Err(e) => {
                warn!("Unable to read the dark mode preference: {e:#}");
                true
            }
        }
    }

    pub async fn set_dark_mode(&self, on: bool) -> Result<()> {
        self.storage
            .set(storage::DARK_MODE, if on { "true" } else { "false" })
            .await
            .pub_result(ErrorType::Storage)
    }

    /// Reads a collection. Storage failures are returned, malformed content is not.
    pub(crate) async fn load<R: Record>(&self) -> Res<Vec<R>> {
        let raw = self.storage.get(R::KEY).await?;
        Ok(match raw {
            Some(text) => decode_list(R::KEY, &text),
            None => Vec::new(),
        })
    }

    async fn save<R: Record>(&self, items: &[R]) -> Res<()> {
        let json = serde_json::to_string(items)
            .with_context(|| format!("Unable to serialize '{}'", R::KEY))?;
        self.storage
            .set(R::KEY, &json)
            .await
            .with_context(|| format!("Unable to save {} {}", items.len(), R::KEY))
    }
}

/// Decodes a stored JSON array leniently. Content that is not an array yields an empty list, and
/// elements that do not decode are skipped.
pub(crate) fn decode_list<T: DeserializeOwned>(key: &str, text: &str) -> Vec<T> {
    let values = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(other) => {
            warn!("Stored '{key}' is not a JSON array ({other}), treating it as empty");
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored '{key}' is not valid JSON, treating it as empty: {e}");
            return Vec::new();
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(ix, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed entry {ix} in '{key}': {e}");
                None
            }
        })
        .collect()
}
