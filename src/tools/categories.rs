/// Tool for listing the reference categories
///
/// This module implements the category_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Category;
use crate::storage::{HabitStorage, StorageError};

/// The category tool takes no parameters
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CategoryListParams {}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
    pub message: String,
}

pub fn list_categories<S: HabitStorage>(
    storage: &S,
    _params: CategoryListParams,
) -> Result<CategoryListResponse, StorageError> {
    let categories = storage.list_categories()?;
    let message = format!(
        "Categories: {}",
        categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(CategoryListResponse {
        categories,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_list_seeded_categories() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let response = list_categories(&storage, CategoryListParams::default()).unwrap();

        assert_eq!(response.categories.len(), 8);
        assert_eq!(response.categories[0].name, "General");
        assert!(response.message.starts_with("Categories: General, Health"));
    }
}
