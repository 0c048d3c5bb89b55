use crate::error::{Error, ErrorType, Result};
use crate::model::{generate_id, Amount};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The default cap on savings, as a multiple of the target, applied when contributing.
pub const DEFAULT_OVERFUND_FACTOR: u32 = 2;

const DEFAULT_ICON: &str = "🎯";

/// A savings goal.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    id: String,
    name: String,
    icon: String,
    target_amount: Amount,
    current_amount: Amount,
    deadline: NaiveDate,
    created_at: DateTime<Utc>,
}

/// Where a goal stands relative to its target and deadline.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Completed,
    Overdue,
    InProgress,
}

serde_plain::derive_display_from_serialize!(GoalStatus);

/// The outcome of adding money to a goal.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub goal: Goal,
    /// The amount the caller asked to add.
    pub requested: Amount,
    /// True when this contribution moved the goal from incomplete to complete.
    pub completed_now: bool,
}

impl Goal {
    /// Creates a goal as-is, without validation. Use `NewGoal` for user input.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        target_amount: impl Into<Amount>,
        current_amount: impl Into<Amount>,
        deadline: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            target_amount: target_amount.into(),
            current_amount: current_amount.into(),
            deadline,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn target_amount(&self) -> Amount {
        self.target_amount
    }

    pub fn current_amount(&self) -> Amount {
        self.current_amount
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// The amount still missing, never negative.
    pub fn remaining(&self) -> Amount {
        if self.is_completed() {
            Amount::ZERO
        } else {
            self.target_amount - self.current_amount
        }
    }

    /// `current / target`, unclamped. A target of zero yields zero and a quotient too large for
    /// `Decimal` yields `Decimal::MAX`.
    pub fn ratio(&self) -> Decimal {
        let target = self.target_amount.value();
        if target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.current_amount
            .value()
            .checked_div(target)
            .unwrap_or(Decimal::MAX)
    }

    /// Progress as a whole percentage, clamped to 0..=100.
    pub fn percent(&self) -> u32 {
        percent_of_target(self.current_amount, self.target_amount)
    }

    pub fn status(&self, today: NaiveDate) -> GoalStatus {
        if self.is_completed() {
            GoalStatus::Completed
        } else if self.deadline < today {
            GoalStatus::Overdue
        } else {
            GoalStatus::InProgress
        }
    }

    /// Adds `amount` to the goal, capping the saved amount at `overfund_factor × target`. A sum
    /// that does not fit in a `Decimal` is rejected and leaves the goal unchanged.
    pub(crate) fn contribute(&mut self, amount: Amount, overfund_factor: u32) -> Result<bool> {
        if !amount.is_positive() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("A contribution must be greater than zero, got {amount}"),
            ));
        }
        let saved = self.current_amount.checked_add(amount).ok_or_else(|| {
            Error::msg(
                ErrorType::Validation,
                format!(
                    "Adding {amount} to {} is larger than an amount can hold",
                    self.current_amount
                ),
            )
        })?;
        // A cap beyond the largest amount does not limit anything
        let cap = self
            .target_amount
            .checked_mul(Decimal::from(overfund_factor))
            .unwrap_or(Amount::new(Decimal::MAX));
        let was_completed = self.is_completed();
        self.current_amount = saved.min(cap);
        Ok(!was_completed && self.is_completed())
    }

    pub(crate) fn apply(&mut self, update: &GoalUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(icon) = &update.icon {
            self.icon = icon.clone();
        }
        if let Some(target_amount) = update.target_amount {
            self.target_amount = target_amount;
        }
        if let Some(current_amount) = update.current_amount {
            self.current_amount = current_amount;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
    }
}

/// `round(min(current / target, 1) × 100)`. Returns 0 when `target` is not positive, and never
/// goes below 0.
pub fn percent_of_target(current: Amount, target: Amount) -> u32 {
    let target = target.value();
    if target <= Decimal::ZERO {
        return 0;
    }
    let ratio = match current.value().checked_div(target) {
        Some(ratio) => ratio.min(Decimal::ONE).max(Decimal::ZERO),
        // Only a quotient far outside 0..=1 overflows
        None if current.is_positive() => Decimal::ONE,
        None => Decimal::ZERO,
    };
    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or_default()
}

/// The fields a user supplies to create a goal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub icon: Option<String>,
    pub target_amount: Amount,
    pub deadline: NaiveDate,
}

impl NewGoal {
    /// Validates the input and creates a goal with nothing saved yet.
    pub fn build(self, now: DateTime<Utc>) -> Result<Goal> {
        let name = self.name.trim();
        validate_name(name)?;
        validate_target(self.target_amount)?;
        let icon = self
            .icon
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());
        Ok(Goal::new(
            generate_id("goal"),
            name,
            icon,
            self.target_amount,
            Amount::ZERO,
            self.deadline,
            now,
        ))
    }
}

/// A partial change to a goal. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub target_amount: Option<Amount>,
    pub current_amount: Option<Amount>,
    pub deadline: Option<NaiveDate>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name.trim())?;
        }
        if let Some(target) = self.target_amount {
            validate_target(target)?;
        }
        if let Some(current) = self.current_amount {
            if current.is_negative() {
                return Err(Error::msg(
                    ErrorType::Validation,
                    format!("The saved amount cannot be negative, got {current}"),
                ));
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::msg(ErrorType::Validation, "A goal needs a name"));
    }
    Ok(())
}

fn validate_target(target: Amount) -> Result<()> {
    if !target.is_positive() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("A goal target must be greater than zero, got {target}"),
        ));
    }
    Ok(())
}
