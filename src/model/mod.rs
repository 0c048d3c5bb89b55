//! Types that represent the core data model, such as `Transaction`, `Goal` and `Category`.
mod amount;
mod category;
mod goal;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryLookup, UNCATEGORIZED};
pub use goal::{
    percent_of_target, Contribution, Goal, GoalStatus, GoalUpdate, NewGoal,
    DEFAULT_OVERFUND_FACTOR,
};
use serde::{Deserialize, Serialize};
pub use transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate};

/// A full snapshot of the three collections.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceData {
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub categories: Vec<Category>,
}

/// Generates an id of the form `{prefix}_{unix millis}_{5 random chars}`, e.g.
/// `tx_1760630400000_k3x9a`.
pub(crate) fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{millis}_{}", &random[..5])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id("tx");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "tx");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id("goal"), generate_id("goal"));
    }
}
