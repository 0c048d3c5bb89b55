use crate::error::{Error, ErrorType, Result};
use crate::model::{generate_id, Amount};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether money came in or went out. Amounts are always positive; direction lives here.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single income or expense entry.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: String,
    description: String,
    amount: Amount,
    #[serde(rename = "type")]
    kind: TransactionType,
    category: String,
    date: NaiveDate,
}

impl Transaction {
    /// Creates a transaction as-is, without validation. Use `NewTransaction` for user input.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<Amount>,
        kind: TransactionType,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount: amount.into(),
            kind,
            category: category.into(),
            date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The `YYYY-MM` month this transaction falls in.
    pub fn year_month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Applies every field that is `Some` in `update`. The id never changes.
    pub(crate) fn apply(&mut self, update: &TransactionUpdate) {
        if let Some(description) = &update.description {
            self.description = description.trim().to_string();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

/// The fields a user supplies to create a transaction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Amount,
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Validates the input and assigns a fresh `tx_` id.
    pub fn build(self) -> Result<Transaction> {
        let description = self.description.trim();
        validate_description(description)?;
        validate_amount(self.amount)?;
        Ok(Transaction::new(
            generate_id("tx"),
            description,
            self.amount,
            self.kind,
            self.category,
            self.date,
        ))
    }
}

/// A partial change to a transaction. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            validate_description(description.trim())?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.is_empty() {
        return Err(Error::msg(
            ErrorType::Validation,
            "A transaction needs a description",
        ));
    }
    Ok(())
}

fn validate_amount(amount: Amount) -> Result<()> {
    if !amount.is_positive() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("A transaction amount must be greater than zero, got {amount}"),
        ));
    }
    Ok(())
}
