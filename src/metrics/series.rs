use crate::metrics::month_index;
use crate::model::{Amount, Transaction};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Income and expense of one calendar month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Short month name, e.g. `Oct`.
    pub label: String,
    pub income: Amount,
    pub expense: Amount,
}

/// The cumulative balance at the end of a month, relative to the start of the series.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BalancePoint {
    pub month: String,
    pub label: String,
    pub balance: Amount,
}

/// One point per month for the `months` months ending with the month of `today`, oldest first.
/// Months without transactions are present with zero totals.
pub fn monthly_series(
    transactions: &[Transaction],
    today: NaiveDate,
    months: u32,
) -> Vec<MonthPoint> {
    let Some(first_of_month) = today.with_day(1) else {
        return Vec::new();
    };
    (0..months)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|month| {
            let ix = month_index(month);
            let mut point = MonthPoint {
                month: month.format("%Y-%m").to_string(),
                label: month.format("%b").to_string(),
                income: Amount::ZERO,
                expense: Amount::ZERO,
            };
            for t in transactions.iter().filter(|t| month_index(t.date()) == ix) {
                if t.is_income() {
                    point.income += t.amount();
                } else {
                    point.expense += t.amount();
                }
            }
            point
        })
        .collect()
}

/// Accumulates income minus expense across `series`, starting from zero.
pub fn running_balance(series: &[MonthPoint]) -> Vec<BalancePoint> {
    let mut balance = Amount::ZERO;
    series
        .iter()
        .map(|point| {
            balance = balance + point.income - point.expense;
            BalancePoint {
                month: point.month.clone(),
                label: point.label.clone(),
                balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::{date, expense, income};

    #[test]
    fn test_series_is_oldest_first_and_fills_gaps() {
        let txs = vec![
            income("a", 1000, date(2026, 1, 5)),
            expense("b", 300, "cat_1", date(2026, 1, 9)),
            expense("c", 200, "cat_1", date(2025, 11, 9)),
            // Outside the window
            income("d", 5000, date(2025, 10, 30)),
        ];
        let series = monthly_series(&txs, date(2026, 1, 20), 3);
        let months: Vec<&str> = series.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2025-11", "2025-12", "2026-01"]);
        assert_eq!(series[0].label, "Nov");
        assert_eq!(series[0].expense, Amount::from(200));
        assert!(series[1].income.is_zero() && series[1].expense.is_zero());
        assert_eq!(series[2].income, Amount::from(1000));
        assert_eq!(series[2].expense, Amount::from(300));
    }

    #[test]
    fn test_running_balance_starts_at_zero() {
        let txs = vec![
            expense("a", 200, "cat_1", date(2025, 11, 9)),
            income("b", 1000, date(2026, 1, 5)),
            expense("c", 300, "cat_1", date(2026, 1, 9)),
        ];
        let series = monthly_series(&txs, date(2026, 1, 20), 3);
        let balances: Vec<Amount> = running_balance(&series)
            .into_iter()
            .map(|p| p.balance)
            .collect();
        assert_eq!(
            balances,
            vec![Amount::from(-200), Amount::from(-200), Amount::from(500)]
        );
    }

    #[test]
    fn test_empty_series() {
        assert!(monthly_series(&[], date(2026, 1, 20), 0).is_empty());
        assert!(running_balance(&[]).is_empty());
    }
}
