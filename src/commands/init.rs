use crate::commands::Out;
use crate::{Config, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub home: PathBuf,
    /// True if the sample data set was written.
    pub seeded: bool,
}

/// Creates the home directory, its subdirectories and `config.json`, then seeds the sample data
/// if the data directory is empty. Running it again on an existing home is harmless.
///
/// # Arguments
/// - `fintrack_home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/fintrack`
pub async fn init(fintrack_home: &Path, now: DateTime<Local>) -> Result<Out<InitReport>> {
    let config = Config::create(fintrack_home).await?;
    let seeded = config.store().init(now).await?;
    let message = if seeded {
        format!(
            "Created the fintrack directory at {} with sample data",
            config.root().display()
        )
    } else {
        format!(
            "The fintrack directory at {} is ready, existing data was kept",
            config.root().display()
        )
    };
    Ok(Out::new(
        message,
        InitReport {
            home: config.root().to_path_buf(),
            seeded,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_twice() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("fintrack");
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

        let out = init(&home, now).await.unwrap();
        assert!(out.structure().unwrap().seeded);
        assert!(home.join("data").join("categories.json").is_file());

        let out = init(&home, now).await.unwrap();
        assert!(!out.structure().unwrap().seeded);
        assert!(out.message().contains("existing data was kept"));
    }
}
