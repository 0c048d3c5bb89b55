use crate::args::{ExportArgs, ImportArgs, ResetArgs};
use crate::backup::{HistoryEntry, ValidatedBackup};
use crate::commands::{open, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::{utils, Config, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub transactions: usize,
    pub goals: usize,
}

/// Writes a backup of all data into the backups directory, or into `--output` if given.
pub async fn export(
    config: &Config,
    args: &ExportArgs,
    now: DateTime<Local>,
) -> Result<Out<ExportReport>> {
    let store = open(config, now).await?;
    let dir = args.output().unwrap_or(config.backups());
    if !dir.is_dir() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("The output directory does not exist '{}'", dir.display()),
        ));
    }
    let (path, entry) = config
        .backup(&store)
        .export_to(dir, now.with_timezone(&Utc))
        .await?;
    let (transactions, goals) = (entry.tx_count, entry.goals_count);
    Ok(Out::new(
        format!(
            "Exported {transactions} transactions and {goals} goals to {}",
            path.display()
        ),
        ExportReport {
            path,
            transactions,
            goals,
        },
    ))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub file: PathBuf,
    pub app_name: Option<String>,
    pub version: Option<String>,
    pub exported_at: Option<String>,
    pub transactions: usize,
    pub goals: usize,
    pub categories: usize,
    /// False when the backup was only checked because `--yes` was not given.
    pub applied: bool,
}

/// Checks a backup file and, with `--yes`, replaces all data with its contents.
pub async fn import(config: &Config, args: &ImportArgs) -> Result<Out<ImportReport>> {
    let file = args.file();
    let is_json = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("Please select a .json backup file, got '{}'", file.display()),
        ));
    }
    let text = utils::read(file).await.pub_result(ErrorType::Storage)?;
    let backup = ValidatedBackup::parse(&text)?;

    let mut report = ImportReport {
        file: file.to_path_buf(),
        app_name: backup.app_name().map(String::from),
        version: backup.version().map(String::from),
        exported_at: backup.exported_at().map(String::from),
        transactions: backup.transactions_count(),
        goals: backup.goals_count(),
        categories: backup.categories_count(),
        applied: false,
    };
    let counts = format!(
        "{} transactions, {} goals and {} categories",
        report.transactions, report.goals, report.categories
    );
    if !args.yes() {
        return Ok(Out::new(
            format!(
                "The backup holds {counts}. Importing replaces ALL current data, run again with \
                --yes to continue"
            ),
            report,
        ));
    }

    let store = config.store();
    config.backup(&store).restore(&backup).await?;
    report.applied = true;
    info!("Imported {}", file.display());
    Ok(Out::new(format!("Imported {counts}"), report))
}

/// Deletes all transactions, goals and categories. Requires `--yes`.
pub async fn reset(config: &Config, args: &ResetArgs) -> Result<Out<()>> {
    if !args.yes() {
        return Ok(
            "This deletes ALL transactions, goals and categories. Export a backup first, then run \
            again with --yes to continue"
                .into(),
        );
    }
    let store = config.store();
    config.backup(&store).reset().await?;
    Ok("All data was deleted. Sample data will be added the next time fintrack runs".into())
}

/// Lists the most recent exports, newest first.
pub async fn history(config: &Config) -> Result<Out<Vec<HistoryEntry>>> {
    let store = config.store();
    let entries = config.backup(&store).history().await;
    let message = match entries.first() {
        Some(last) => format!(
            "{} exports recorded, the last one was {} on {}",
            entries.len(),
            last.filename,
            last.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => "No exports recorded yet".to_string(),
    };
    Ok(Out::new(message, entries))
}
