use crate::metrics::Window;
use crate::model::{Transaction, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The field a transaction listing is ordered by.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Description,
    Amount,
    Category,
}

serde_plain::derive_display_from_serialize!(SortField);
serde_plain::derive_fromstr_from_deserialize!(SortField);

/// Filters and ordering for a transaction listing. The default lists everything, newest first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionQuery {
    pub window: Window,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub sort: SortField,
    pub descending: bool,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            window: Window::All,
            category: None,
            kind: None,
            search: None,
            sort: SortField::Date,
            descending: true,
        }
    }
}

impl TransactionQuery {
    pub fn matches(&self, t: &Transaction, today: NaiveDate) -> bool {
        if !self.window.contains(t.date(), today) {
            return false;
        }
        if let Some(category) = &self.category {
            if t.category() != category {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if t.kind() != kind {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => t
                .description()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Returns the matching transactions in the requested order. Equal keys keep their stored
    /// order.
    pub fn run(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let mut found: Vec<Transaction> = transactions
            .iter()
            .filter(|t| self.matches(t, today))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            let ord = compare(self.sort, a, b);
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        found
    }
}

fn compare(field: SortField, a: &Transaction, b: &Transaction) -> Ordering {
    match field {
        SortField::Date => a.date().cmp(&b.date()),
        SortField::Description => a
            .description()
            .to_lowercase()
            .cmp(&b.description().to_lowercase()),
        SortField::Amount => a.amount().cmp(&b.amount()),
        SortField::Category => a.category().cmp(b.category()),
    }
}

/// The `n` most recent transactions, newest first.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::{date, expense, income};

    fn sample() -> Vec<Transaction> {
        vec![
            income("Salary", 5800, date(2026, 10, 5)),
            expense("Supermarket", 480, "cat_1", date(2026, 10, 7)),
            expense("Rent", 1500, "cat_3", date(2026, 9, 10)),
            expense("Restaurant", 120, "cat_1", date(2026, 10, 16)),
        ]
    }

    fn ids(txs: &[Transaction]) -> Vec<&str> {
        txs.iter().map(|t| t.id()).collect()
    }

    #[test]
    fn test_default_is_everything_newest_first() {
        let found = TransactionQuery::default().run(&sample(), date(2026, 10, 16));
        assert_eq!(
            ids(&found),
            vec!["Restaurant", "Supermarket", "Salary", "Rent"]
        );
    }

    #[test]
    fn test_filters_combine() {
        let query = TransactionQuery {
            window: Window::Month,
            category: Some("cat_1".to_string()),
            kind: Some(TransactionType::Expense),
            search: Some("  SUPER ".to_string()),
            ..Default::default()
        };
        let found = query.run(&sample(), date(2026, 10, 16));
        assert_eq!(ids(&found), vec!["Supermarket"]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let query = TransactionQuery {
            search: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.run(&sample(), date(2026, 10, 16)).len(), 4);
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let query = TransactionQuery {
            sort: SortField::Amount,
            descending: false,
            ..Default::default()
        };
        let found = query.run(&sample(), date(2026, 10, 16));
        assert_eq!(
            ids(&found),
            vec!["Restaurant", "Supermarket", "Rent", "Salary"]
        );
    }

    #[test]
    fn test_sort_by_description_ignores_case() {
        let txs = vec![
            expense("b", 1, "cat_1", date(2026, 10, 1)),
            expense("A", 1, "cat_1", date(2026, 10, 1)),
        ];
        let query = TransactionQuery {
            sort: SortField::Description,
            descending: false,
            ..Default::default()
        };
        assert_eq!(ids(&query.run(&txs, date(2026, 10, 1))), vec!["A", "b"]);
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("amount".parse::<SortField>().unwrap(), SortField::Amount);
        assert_eq!(SortField::Category.to_string(), "category");
    }

    #[test]
    fn test_recent() {
        let found = recent(&sample(), 2);
        assert_eq!(ids(&found), vec!["Restaurant", "Supermarket"]);
        assert_eq!(recent(&sample(), 10).len(), 4);
    }
}
