use crate::args::{ContributeArgs, GoalAddArgs, GoalListArgs, GoalUpdateArgs, IdArgs};
use crate::commands::{not_found, open, Out};
use crate::error::{Error, ErrorType};
use crate::metrics::{goal_summary, sort_goals, GoalSummary};
use crate::model::{Amount, Contribution, Goal, GoalStatus};
use crate::{Config, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

/// A goal as listed, with its progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub percent: u32,
    pub remaining: Amount,
    pub status: GoalStatus,
}

impl GoalView {
    fn new(goal: Goal, today: NaiveDate) -> Self {
        Self {
            percent: goal.percent(),
            remaining: goal.remaining(),
            status: goal.status(today),
            goal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalList {
    pub summary: GoalSummary,
    pub goals: Vec<GoalView>,
}

/// Lists all goals in the requested order along with the summary figures.
pub async fn list_goals(
    config: &Config,
    args: &GoalListArgs,
    now: DateTime<Local>,
) -> Result<Out<GoalList>> {
    let store = open(config, now).await?;
    let today = now.date_naive();
    let data = store.snapshot().await;
    let summary = goal_summary(&data, today);

    let mut goals = data.goals;
    sort_goals(&mut goals, args.sort());
    let message = match &summary.next_goal {
        Some(next) => format!(
            "{} goals, {} saved. Next up: {} {} with {} to go",
            goals.len(),
            summary.total_saved,
            next.icon,
            next.name,
            next.remaining
        ),
        None if goals.is_empty() => "There are no goals yet".to_string(),
        None => format!("All {} goals are completed", goals.len()),
    };
    Ok(Out::new(
        message,
        GoalList {
            summary,
            goals: goals.into_iter().map(|g| GoalView::new(g, today)).collect(),
        },
    ))
}

/// Validates and creates a new goal with nothing saved yet.
pub async fn add_goal(
    config: &Config,
    args: &GoalAddArgs,
    now: DateTime<Local>,
) -> Result<Out<Goal>> {
    let store = open(config, now).await?;
    let goal = args.new_goal().build(now.with_timezone(&Utc))?;
    store.add(goal.clone()).await?;
    info!("Added goal {}", goal.id());
    Ok(Out::new(
        format!("Created goal {} {} of {}", goal.icon(), goal.name(), goal.target_amount()),
        goal,
    ))
}

/// Applies the fields given in `args` to an existing goal.
pub async fn update_goal(
    config: &Config,
    args: &GoalUpdateArgs,
    now: DateTime<Local>,
) -> Result<Out<Goal>> {
    let update = args.update();
    if update.is_empty() {
        return Err(Error::msg(
            ErrorType::Validation,
            "Nothing to update, pass at least one field to change",
        ));
    }
    update.validate()?;

    let store = open(config, now).await?;
    let updated = store
        .update::<Goal>(args.id(), &update)
        .await?
        .ok_or_else(|| not_found("goal", args.id()))?;
    Ok(Out::new(
        format!("Updated goal '{}'", updated.name()),
        updated,
    ))
}

/// Adds money to a goal.
pub async fn contribute(
    config: &Config,
    args: &ContributeArgs,
    now: DateTime<Local>,
) -> Result<Out<Contribution>> {
    let store = open(config, now).await?;
    let contribution = store
        .contribute(args.id(), args.amount())
        .await?
        .ok_or_else(|| not_found("goal", args.id()))?;
    let goal = &contribution.goal;
    let message = if contribution.completed_now {
        format!(
            "🎉 Goal {} {} reached! {} saved of {}",
            goal.icon(),
            goal.name(),
            goal.current_amount(),
            goal.target_amount()
        )
    } else {
        format!(
            "Added {} to {}, now at {}% ({} of {})",
            args.amount(),
            goal.name(),
            goal.percent(),
            goal.current_amount(),
            goal.target_amount()
        )
    };
    Ok(Out::new(message, contribution))
}

pub async fn delete_goal(config: &Config, args: &IdArgs, now: DateTime<Local>) -> Result<Out<()>> {
    let store = open(config, now).await?;
    if !store.delete::<Goal>(args.id()).await? {
        return Err(not_found("goal", args.id()));
    }
    Ok(format!("Deleted goal {}", args.id()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::GoalOrder;
    use crate::model::GoalUpdate;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_by_progress() {
        let env = TestEnv::seeded().await;
        let out = list_goals(env.config(), &GoalListArgs::new(GoalOrder::Progress), env.now())
            .await
            .unwrap();
        let list = out.structure().unwrap();
        let ids: Vec<&str> = list.goals.iter().map(|g| g.goal.id()).collect();
        assert_eq!(ids, vec!["goal_3", "goal_2", "goal_1", "goal_4"]);
        assert_eq!(list.goals[0].status, GoalStatus::Completed);
        assert_eq!(list.goals[0].percent, 100);
        assert_eq!(list.goals[3].status, GoalStatus::Overdue);
        // 6200 + 12500 + 4500 + 400
        assert_eq!(list.summary.total_saved, Amount::from(23600));
        assert_eq!(list.summary.next_goal.as_ref().unwrap().id, "goal_2");
        assert!(out.message().contains("Emergency fund"));
    }

    #[tokio::test]
    async fn test_add_and_contribute() {
        let env = TestEnv::seeded().await;
        let deadline = NaiveDate::from_ymd_opt(2027, 6, 1).unwrap();
        let args = GoalAddArgs::new("Bike", 1000, deadline, None);
        let out = add_goal(env.config(), &args, env.now()).await.unwrap();
        let goal = out.structure().unwrap().clone();
        assert_eq!(goal.icon(), "🎯");
        assert!(goal.current_amount().is_zero());

        let out = contribute(env.config(), &ContributeArgs::new(goal.id(), 400), env.now())
            .await
            .unwrap();
        assert!(!out.structure().unwrap().completed_now);
        assert!(out.message().contains("40%"));

        let out = contribute(env.config(), &ContributeArgs::new(goal.id(), 5000), env.now())
            .await
            .unwrap();
        let c = out.structure().unwrap();
        assert!(c.completed_now);
        assert_eq!(c.goal.current_amount(), Amount::from(2000));
        assert!(out.message().contains("reached"));
    }

    #[tokio::test]
    async fn test_contribute_errors() {
        let env = TestEnv::seeded().await;
        let err = contribute(env.config(), &ContributeArgs::new("goal_x", 10), env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);

        let err = contribute(env.config(), &ContributeArgs::new("goal_1", 0), env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let env = TestEnv::seeded().await;
        let update = GoalUpdate {
            name: Some("Trip to Japan".to_string()),
            ..Default::default()
        };
        let out = update_goal(env.config(), &GoalUpdateArgs::new("goal_1", update), env.now())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().name(), "Trip to Japan");

        delete_goal(env.config(), &IdArgs::new("goal_1"), env.now())
            .await
            .unwrap();
        assert_eq!(env.store().goals().await.len(), 3);
        let err = delete_goal(env.config(), &IdArgs::new("goal_1"), env.now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }
}
