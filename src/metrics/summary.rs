use crate::metrics::{
    active_months, category_breakdown, filter, monthly_series, recent, running_balance,
    BalancePoint, CategoryTotal, MonthPoint, Totals, Window,
};
use crate::model::{Amount, FinanceData, Goal, GoalStatus, Transaction};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many months the dashboard charts cover.
pub const DASHBOARD_MONTHS: u32 = 6;

/// How many transactions the dashboard lists.
pub const DASHBOARD_RECENT: usize = 5;

/// Everything the dashboard shows.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// `YYYY-MM` of the reference date.
    pub month: String,
    /// Income, expense and savings of the current month.
    pub current_month: Totals,
    /// Balance over all transactions ever recorded.
    pub total_balance: Amount,
    /// Current month expenses by category.
    pub breakdown: Vec<CategoryTotal>,
    pub monthly: Vec<MonthPoint>,
    pub running_balance: Vec<BalancePoint>,
    pub recent: Vec<Transaction>,
}

pub fn dashboard(data: &FinanceData, today: NaiveDate) -> DashboardSummary {
    let this_month = filter(&data.transactions, Window::Month, today);
    let monthly = monthly_series(&data.transactions, today, DASHBOARD_MONTHS);
    DashboardSummary {
        month: today.format("%Y-%m").to_string(),
        current_month: Totals::of(this_month.iter().copied()),
        total_balance: Totals::of(&data.transactions).balance,
        breakdown: category_breakdown(this_month.iter().copied(), &data.categories),
        running_balance: running_balance(&monthly),
        monthly,
        recent: recent(&data.transactions, DASHBOARD_RECENT),
    }
}

/// The goal closest to completion and how long it should take at the current savings pace.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextGoal {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub remaining: Amount,
    /// `None` when nothing has been saved yet, so no pace can be estimated.
    pub months_to_go: Option<u64>,
}

/// Aggregate figures across all goals.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub total_saved: Amount,
    /// Total saved divided by the number of months with transactions.
    pub monthly_average: Amount,
    pub completed: usize,
    pub overdue: usize,
    pub in_progress: usize,
    /// `None` if there are no goals or all of them are completed.
    pub next_goal: Option<NextGoal>,
}

pub fn goal_summary(data: &FinanceData, today: NaiveDate) -> GoalSummary {
    let total_saved: Amount = data.goals.iter().map(Goal::current_amount).sum();
    let months = Decimal::from(active_months(&data.transactions));
    // months is at least 1, so the division cannot overflow
    let monthly = total_saved.value() / months;

    let mut summary = GoalSummary {
        total_saved,
        monthly_average: Amount::new(monthly.round_dp(2)),
        completed: 0,
        overdue: 0,
        in_progress: 0,
        next_goal: None,
    };
    for goal in &data.goals {
        match goal.status(today) {
            GoalStatus::Completed => summary.completed += 1,
            GoalStatus::Overdue => summary.overdue += 1,
            GoalStatus::InProgress => summary.in_progress += 1,
        }
    }

    // The first goal wins a tie on progress
    let next = data
        .goals
        .iter()
        .filter(|g| !g.is_completed())
        .fold(None::<&Goal>, |best, g| match best {
            Some(b) if b.ratio() >= g.ratio() => Some(b),
            _ => Some(g),
        });
    summary.next_goal = next.map(|goal| {
        let remaining = goal.remaining();
        NextGoal {
            id: goal.id().to_string(),
            name: goal.name().to_string(),
            icon: goal.icon().to_string(),
            months_to_go: months_to_go(remaining, total_saved, months),
            remaining,
        }
    });
    summary
}

/// `ceil(remaining / (total_saved / months))`, computed as `remaining × months / total_saved` so
/// the unrounded monthly pace is used. `None` when nothing is saved or the result does not fit.
fn months_to_go(remaining: Amount, total_saved: Amount, months: Decimal) -> Option<u64> {
    if !total_saved.is_positive() {
        return None;
    }
    remaining
        .value()
        .checked_mul(months)?
        .checked_div(total_saved.value())?
        .ceil()
        .to_u64()
}

/// The order in which goals are listed.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalOrder {
    /// Closest to completion first.
    #[default]
    Progress,
    /// Earliest deadline first.
    Deadline,
    /// Largest target first.
    Amount,
}

serde_plain::derive_display_from_serialize!(GoalOrder);
serde_plain::derive_fromstr_from_deserialize!(GoalOrder);

/// Sorts `goals` in place. The sort is stable.
pub fn sort_goals(goals: &mut [Goal], order: GoalOrder) {
    match order {
        GoalOrder::Progress => goals.sort_by(|a, b| b.ratio().cmp(&a.ratio())),
        GoalOrder::Deadline => goals.sort_by_key(Goal::deadline),
        GoalOrder::Amount => goals.sort_by(|a, b| b.target_amount().cmp(&a.target_amount())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::{date, income};
    use crate::model::Category;
    use chrono::{DateTime, Utc};

    fn goal(id: &str, target: i64, current: i64, deadline: NaiveDate) -> Goal {
        Goal::new(
            id,
            id,
            "🎯",
            target,
            current,
            deadline,
            DateTime::<Utc>::default(),
        )
    }

    fn seeded() -> FinanceData {
        use chrono::{Local, TimeZone};
        let now = Local.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        crate::store::sample_data(now).unwrap()
    }

    #[test]
    fn test_dashboard_on_seeded_data() {
        let data = seeded();
        let summary = dashboard(&data, date(2026, 10, 16));
        assert_eq!(summary.month, "2026-10");
        assert_eq!(summary.current_month.income, Amount::from(7000));
        assert_eq!(summary.current_month.expense, Amount::from(2500));
        assert_eq!(summary.current_month.balance, Amount::from(4500));
        // 7000 + 6600 + 5800 income against 2500 + 2270 + 1960 expense
        assert_eq!(summary.total_balance, Amount::from(12670));
        assert_eq!(summary.monthly.len(), 6);
        assert_eq!(summary.monthly[5].month, "2026-10");
        assert_eq!(
            summary.running_balance.last().map(|p| p.balance),
            Some(Amount::from(12670))
        );
        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.recent[0].id(), "tx_09");
        assert_eq!(summary.breakdown[0].category, "cat_3");
        assert_eq!(summary.breakdown[0].total, Amount::from(1685));
        let sum: Amount = summary.breakdown.iter().map(|c| c.total).sum();
        assert_eq!(sum, summary.current_month.expense);
    }

    #[test]
    fn test_dashboard_on_empty_data() {
        let summary = dashboard(&FinanceData::default(), date(2026, 10, 16));
        assert_eq!(summary.current_month, Totals::default());
        assert!(summary.breakdown.is_empty());
        assert!(summary.recent.is_empty());
        assert!(summary
            .running_balance
            .iter()
            .all(|p| p.balance.is_zero()));
    }

    #[test]
    fn test_goal_summary() {
        let d = date(2027, 1, 1);
        let data = FinanceData {
            transactions: vec![
                income("a", 1, date(2026, 9, 1)),
                income("b", 1, date(2026, 10, 1)),
            ],
            goals: vec![
                goal("g1", 1000, 100, d),
                goal("g2", 1000, 700, d),
                goal("g3", 500, 500, d),
                goal("g4", 1000, 0, date(2026, 1, 1)),
            ],
            categories: vec![Category::new("cat_6", "Salary", "💼", "#4f8ef7")],
        };
        let summary = goal_summary(&data, date(2026, 10, 16));
        assert_eq!(summary.total_saved, Amount::from(1300));
        assert_eq!(summary.monthly_average, Amount::from(650));
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.in_progress, 2);
        let next = summary.next_goal.unwrap();
        assert_eq!(next.id, "g2");
        assert_eq!(next.remaining, Amount::from(300));
        assert_eq!(next.months_to_go, Some(1));
    }

    #[test]
    fn test_months_to_go_uses_unrounded_pace() {
        let d = date(2027, 1, 1);
        let data = FinanceData {
            transactions: vec![
                income("a", 1, date(2026, 8, 1)),
                income("b", 1, date(2026, 9, 1)),
                income("c", 1, date(2026, 10, 1)),
            ],
            // 100 saved over 3 months is 33.33 a month when rounded; 100 / 33.33 would be 4 months
            goals: vec![goal("g1", 200, 100, d)],
            categories: Vec::new(),
        };
        let summary = goal_summary(&data, date(2026, 10, 16));
        assert_eq!(summary.monthly_average.value(), Decimal::new(3333, 2));
        assert_eq!(summary.next_goal.unwrap().months_to_go, Some(3));
    }

    #[test]
    fn test_dashboard_and_goals_with_huge_amounts() {
        use crate::model::TransactionType;
        use std::str::FromStr;
        let huge = Amount::from_str("50000000000000000000000000000").unwrap();
        let today = date(2026, 10, 16);
        let data = FinanceData {
            transactions: vec![
                Transaction::new("a", "a", huge, TransactionType::Income, "cat_6", today),
                Transaction::new("b", "b", huge, TransactionType::Income, "cat_6", today),
                Transaction::new("c", "c", huge, TransactionType::Expense, "cat_1", today),
            ],
            goals: vec![
                Goal::new("g1", "g1", "🎯", huge, huge, today, DateTime::<Utc>::default()),
                Goal::new("g2", "g2", "🎯", huge, 1, today, DateTime::<Utc>::default()),
            ],
            categories: vec![Category::new("cat_1", "Food", "", "")],
        };
        let summary = dashboard(&data, today);
        let max = Amount::new(Decimal::MAX);
        assert_eq!(summary.current_month.income, max);
        assert_eq!(summary.monthly[5].income, max);

        let goals = goal_summary(&data, today);
        assert_eq!(goals.total_saved, huge + Amount::from(1));
        assert_eq!(goals.next_goal.unwrap().id, "g2");
    }

    #[test]
    fn test_goal_summary_without_savings() {
        let data = FinanceData {
            goals: vec![goal("g1", 1000, 0, date(2027, 1, 1))],
            ..Default::default()
        };
        let summary = goal_summary(&data, date(2026, 10, 16));
        assert!(summary.monthly_average.is_zero());
        assert_eq!(summary.next_goal.unwrap().months_to_go, None);
    }

    #[test]
    fn test_goal_summary_all_completed() {
        let data = FinanceData {
            goals: vec![goal("g1", 10, 10, date(2027, 1, 1))],
            ..Default::default()
        };
        assert!(goal_summary(&data, date(2026, 10, 16)).next_goal.is_none());
    }

    #[test]
    fn test_sort_goals() {
        let mut goals = vec![
            goal("a", 1000, 100, date(2027, 3, 1)),
            goal("b", 5000, 4000, date(2026, 12, 1)),
            goal("c", 200, 50, date(2027, 1, 1)),
        ];
        let ids = |goals: &[Goal]| goals.iter().map(|g| g.id().to_string()).collect::<Vec<_>>();

        sort_goals(&mut goals, GoalOrder::Progress);
        assert_eq!(ids(&goals), vec!["b", "c", "a"]);
        sort_goals(&mut goals, GoalOrder::Deadline);
        assert_eq!(ids(&goals), vec!["b", "c", "a"]);
        sort_goals(&mut goals, GoalOrder::Amount);
        assert_eq!(ids(&goals), vec!["b", "a", "c"]);
        assert_eq!("deadline".parse::<GoalOrder>().unwrap(), GoalOrder::Deadline);
    }
}
