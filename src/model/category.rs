use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The id of the bucket that collects amounts whose category no longer exists.
pub const UNCATEGORIZED: &str = "uncategorized";

const FALLBACK_NAME: &str = "Other";
const FALLBACK_ICON: &str = "💳";
const FALLBACK_COLOR: &str = "#8892b0";

/// A category that transactions refer to by `id`. Categories are seeded once and then treated as
/// static lookup data.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: String,
    name: String,
    icon: String,
    color: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// The sentinel used in place of a category that cannot be found.
    pub fn fallback() -> Self {
        Self::new(UNCATEGORIZED, FALLBACK_NAME, FALLBACK_ICON, FALLBACK_COLOR)
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

    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Resolves category ids to categories. A dangling id resolves to `Category::fallback()` instead
/// of `None`, so callers never need to handle a missing category.
#[derive(Debug, Clone)]
pub struct CategoryLookup<'a> {
    by_id: HashMap<&'a str, &'a Category>,
    fallback: Category,
}

impl<'a> CategoryLookup<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        for category in categories {
            // First one wins if ids are duplicated
            by_id.entry(category.id()).or_insert(category);
        }
        Self {
            by_id,
            fallback: Category::fallback(),
        }
    }

    pub fn get(&self, id: &str) -> &Category {
        self.by_id.get(id).copied().unwrap_or(&self.fallback)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns `id` if it refers to a known category, otherwise `UNCATEGORIZED`.
    pub fn resolve_id<'b>(&self, id: &'b str) -> &'b str {
        if self.contains(id) {
            id
        } else {
            UNCATEGORIZED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new("cat_1", "Food", "🍽️", "#f87171"),
            Category::new("cat_2", "Transport", "🚗", "#fb923c"),
        ]
    }

    #[test]
    fn test_lookup_found() {
        let categories = categories();
        let lookup = CategoryLookup::new(&categories);
        assert_eq!(lookup.get("cat_2").name(), "Transport");
        assert_eq!(lookup.resolve_id("cat_1"), "cat_1");
    }

    #[test]
    fn test_lookup_dangling_uses_fallback() {
        let categories = categories();
        let lookup = CategoryLookup::new(&categories);
        let found = lookup.get("cat_99");
        assert_eq!(found.name(), "Other");
        assert_eq!(found.icon(), "💳");
        assert_eq!(found.color(), "#8892b0");
        assert_eq!(lookup.resolve_id("cat_99"), UNCATEGORIZED);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Category::new("cat_1", "Food", "x", "#fff")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "cat_1", "name": "Food", "icon": "x", "color": "#fff"})
        );
    }
}
