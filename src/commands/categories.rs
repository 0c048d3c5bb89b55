use crate::commands::{open, Out};
use crate::model::Category;
use crate::{Config, Result};
use chrono::{DateTime, Local};

/// Lists the categories. Categories are seeded once and cannot be changed from the CLI.
pub async fn categories(config: &Config, now: DateTime<Local>) -> Result<Out<Vec<Category>>> {
    let store = open(config, now).await?;
    let categories = store.categories().await;
    let names: Vec<String> = categories
        .iter()
        .map(|c| format!("{} {} ({})", c.icon(), c.name(), c.id()))
        .collect();
    Ok(Out::new(
        format!("{} categories: {}", categories.len(), names.join(", ")),
        categories,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_categories() {
        let env = TestEnv::new().await;
        let out = categories(env.config(), env.now()).await.unwrap();
        let list = out.structure().unwrap();
        assert_eq!(list.len(), 9);
        assert_eq!(list[0].name(), "Food");
        assert!(out.message().contains("Salary (cat_6)"));
    }
}
