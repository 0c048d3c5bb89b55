//! Command handlers for the fintrack CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler takes the loaded
//! `Config`, its arguments and, where needed, the current time, and returns an `Out` describing
//! the result.

mod backup;
mod categories;
mod dashboard;
mod goals;
mod init;
mod prefs;
mod transactions;

use crate::error::{Error, ErrorType, Result};
use crate::store::Store;
use crate::Config;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use backup::{export, history, import, reset};
pub use categories::categories;
pub use dashboard::dashboard;
pub use goals::{add_goal, contribute, delete_goal, list_goals, update_goal};
pub use init::init;
pub use prefs::dark_mode;
pub use transactions::{add_transaction, delete_transaction, list_transactions, update_transaction};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Logs the message with `info!` and prints the structured data, if any, as JSON to stdout.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            match serde_json::to_string_pretty(structure) {
                Ok(json) => println!("{json}"),
                Err(e) => debug!("Unable to serialize command output: {e}"),
            }
        }
    }
}

/// Builds the `Store` and seeds it if this is the first time the data directory is used.
async fn open(config: &Config, now: DateTime<Local>) -> Result<Store> {
    let store = config.store();
    if store.init(now).await? {
        info!("This looks like a new data directory, sample data has been added");
    }
    Ok(store)
}

fn not_found(what: &str, id: &str) -> Error {
    Error::msg(ErrorType::NotFound, format!("No {what} with id '{id}'"))
}
