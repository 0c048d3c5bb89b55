use crate::commands::{open, Out};
use crate::metrics::{self, DashboardSummary};
use crate::{Config, Result};
use chrono::{DateTime, Local};

/// Computes the dashboard for the month of `now`.
pub async fn dashboard(config: &Config, now: DateTime<Local>) -> Result<Out<DashboardSummary>> {
    let store = open(config, now).await?;
    let data = store.snapshot().await;
    let summary = metrics::dashboard(&data, now.date_naive());
    let month = &summary.current_month;
    let mut message = format!(
        "{}: income {}, expenses {}, savings {}. Total balance {}",
        summary.month, month.income, month.expense, month.balance, summary.total_balance
    );
    if let Some(top) = summary.breakdown.first() {
        message.push_str(&format!(
            ". Top expense: {} {} ({}%)",
            top.icon, top.name, top.percent
        ));
    }
    Ok(Out::new(message, summary))
}
