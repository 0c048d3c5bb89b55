//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::store::Store;
use crate::Config;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tempfile::TempDir;

/// Test environment that sets up a fintrack home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a Config and an empty data directory.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("fintrack");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose data directory holds the sample data, seeded at `now()`.
    pub async fn seeded() -> Self {
        let env = Self::new().await;
        env.store().init(env.now()).await.unwrap();
        env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A new `Store` over the data directory.
    pub fn store(&self) -> Store {
        self.config.store()
    }

    /// The fixed clock used by tests: Friday 2026-10-16, 09:00 local time.
    pub fn now(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
