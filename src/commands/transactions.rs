use crate::args::{IdArgs, TxAddArgs, TxListArgs, TxUpdateArgs};
use crate::commands::{not_found, open, Out};
use crate::error::{Error, ErrorType};
use crate::metrics::Totals;
use crate::model::{Category, CategoryLookup, Transaction};
use crate::{Config, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

/// A transaction as listed, with its category resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category_name: String,
    pub category_icon: String,
}

impl TransactionView {
    fn new(transaction: Transaction, category: &Category) -> Self {
        Self {
            category_name: category.name().to_string(),
            category_icon: category.icon().to_string(),
            transaction,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionList {
    pub totals: Totals,
    pub transactions: Vec<TransactionView>,
}

/// Lists the transactions matching `args`.
pub async fn list_transactions(
    config: &Config,
    args: &TxListArgs,
    now: DateTime<Local>,
) -> Result<Out<TransactionList>> {
    let store = open(config, now).await?;
    let all = store.transactions().await;
    let categories = store.categories().await;
    let lookup = CategoryLookup::new(&categories);

    let found = args.query().run(&all, now.date_naive());
    let totals = Totals::of(&found);
    let message = format!(
        "{} transactions: income {}, expense {}, balance {}",
        found.len(),
        totals.income,
        totals.expense,
        totals.balance
    );
    let transactions = found
        .into_iter()
        .map(|t| {
            let category = lookup.get(t.category()).clone();
            TransactionView::new(t, &category)
        })
        .collect();
    Ok(Out::new(
        message,
        TransactionList {
            totals,
            transactions,
        },
    ))
}

/// Validates and records a new transaction.
pub async fn add_transaction(
    config: &Config,
    args: &TxAddArgs,
    now: DateTime<Local>,
) -> Result<Out<Transaction>> {
    let store = open(config, now).await?;
    let transaction = args.new_transaction(now.date_naive()).build()?;
    warn_unknown_category(&store.categories().await, transaction.category());
    store.add(transaction.clone()).await?;
    info!("Added transaction {}", transaction.id());
    Ok(Out::new(
        format!(
            "Added {} '{}' of {}",
            transaction.kind(),
            transaction.description(),
            transaction.amount()
        ),
        transaction,
    ))
}

/// Applies the fields given in `args` to an existing transaction.
pub async fn update_transaction(
    config: &Config,
    args: &TxUpdateArgs,
    now: DateTime<Local>,
) -> Result<Out<Transaction>> {
    let update = args.update();
    if update.is_empty() {
        return Err(Error::msg(
            ErrorType::Validation,
            "Nothing to update, pass at least one field to change",
        ));
    }
    update.validate()?;

    let store = open(config, now).await?;
    if let Some(category) = &update.category {
        warn_unknown_category(&store.categories().await, category);
    }
    let updated = store
        .update::<Transaction>(args.id(), &update)
        .await?
        .ok_or_else(|| not_found("transaction", args.id()))?;
    Ok(Out::new(
        format!("Updated transaction '{}'", updated.description()),
        updated,
    ))
}

pub async fn delete_transaction(
    config: &Config,
    args: &IdArgs,
    now: DateTime<Local>,
) -> Result<Out<()>> {
    let store = open(config, now).await?;
    if !store.delete::<Transaction>(args.id()).await? {
        return Err(not_found("transaction", args.id()));
    }
    Ok(format!("Deleted transaction {}", args.id()).into())
}

fn warn_unknown_category(categories: &[Category], id: &str) {
    if !CategoryLookup::new(categories).contains(id) {
        warn!("There is no category '{id}', the transaction will be shown under 'Other'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{SortField, TransactionQuery, Window};
    use crate::model::{Amount, TransactionType, TransactionUpdate};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_this_month() {
        let env = TestEnv::seeded().await;
        let args = TxListArgs::from(TransactionQuery {
            window: Window::Month,
            ..Default::default()
        });
        let out = list_transactions(env.config(), &args, env.now())
            .await
            .unwrap();
        let list = out.structure().unwrap();
        assert_eq!(list.transactions.len(), 9);
        assert_eq!(list.totals.income, Amount::from(7000));
        assert_eq!(list.totals.expense, Amount::from(2500));
        assert_eq!(list.transactions[0].transaction.id(), "tx_09");
        assert_eq!(list.transactions[0].category_name, "Leisure");
    }

    #[tokio::test]
    async fn test_list_first_run_seeds() {
        let env = TestEnv::new().await;
        let args = TxListArgs::from(TransactionQuery::default());
        let out = list_transactions(env.config(), &args, env.now())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().transactions.len(), 18);
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let env = TestEnv::seeded().await;
        let args = TxAddArgs::new(
            "  Bookshop ",
            35,
            TransactionType::Expense,
            "cat_8",
            None,
        );
        let out = add_transaction(env.config(), &args, env.now())
            .await
            .unwrap();
        let added = out.structure().unwrap().clone();
        assert_eq!(added.description(), "Bookshop");
        assert_eq!(added.date(), env.today());
        assert!(added.id().starts_with("tx_"));

        let query = TransactionQuery {
            search: Some("book".to_string()),
            sort: SortField::Amount,
            ..Default::default()
        };
        let out = list_transactions(env.config(), &query.into(), env.now())
            .await
            .unwrap();
        let list = out.structure().unwrap();
        assert_eq!(list.transactions.len(), 1);
        assert_eq!(list.transactions[0].category_name, "Education");
    }

    #[tokio::test]
    async fn test_add_rejects_zero_amount() {
        let env = TestEnv::seeded().await;
        let args = TxAddArgs::new("Nothing", 0, TransactionType::Expense, "cat_1", None);
        let err = add_transaction(env.config(), &args, env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(env.store().transactions().await.len(), 18);
    }

    #[tokio::test]
    async fn test_add_with_dangling_category_is_listed_as_other() {
        let env = TestEnv::seeded().await;
        let args = TxAddArgs::new("Mystery", 5, TransactionType::Expense, "cat_404", None);
        add_transaction(env.config(), &args, env.now())
            .await
            .unwrap();
        let query = TransactionQuery {
            search: Some("mystery".to_string()),
            ..Default::default()
        };
        let out = list_transactions(env.config(), &query.into(), env.now())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().transactions[0].category_name, "Other");
    }

    #[tokio::test]
    async fn test_update() {
        let env = TestEnv::seeded().await;
        let update = TransactionUpdate {
            amount: Some(Amount::from(130)),
            ..Default::default()
        };
        let args = TxUpdateArgs::new("tx_07", update);
        let out = update_transaction(env.config(), &args, env.now())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().amount(), Amount::from(130));
        assert_eq!(out.structure().unwrap().description(), "Restaurant");
    }

    #[tokio::test]
    async fn test_update_errors() {
        let env = TestEnv::seeded().await;
        let empty = TxUpdateArgs::new("tx_07", TransactionUpdate::default());
        let err = update_transaction(env.config(), &empty, env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);

        let update = TransactionUpdate {
            description: Some("x".to_string()),
            ..Default::default()
        };
        let missing = TxUpdateArgs::new("tx_nope", update);
        let err = update_transaction(env.config(), &missing, env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::seeded().await;
        delete_transaction(env.config(), &IdArgs::new("tx_01"), env.now())
            .await
            .unwrap();
        assert_eq!(env.store().transactions().await.len(), 17);
        let err = delete_transaction(env.config(), &IdArgs::new("tx_01"), env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }
}
