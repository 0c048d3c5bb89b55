pub mod args;
pub mod backup;
pub mod commands;
mod config;
mod error;
pub mod metrics;
pub mod model;
pub mod storage;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use store::Store;
