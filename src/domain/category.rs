/// Category reference data
///
/// Categories are a fixed seed set used to organize habits. Habits store the
/// category name as plain text; it is not foreign-key enforced.

use serde::{Deserialize, Serialize};

/// A category with its display color and icon tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Hex color, e.g. "#e74c3c"
    pub color: String,
    pub icon: String,
}

/// Categories seeded into every new database: (name, color, icon)
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 8] = [
    ("General", "#3498db", "general"),
    ("Health", "#e74c3c", "health"),
    ("Study", "#9b59b6", "study"),
    ("Worship", "#f39c12", "prayer"),
    ("Sport", "#27ae60", "sport"),
    ("Work", "#34495e", "work"),
    ("Social", "#e67e22", "social"),
    ("Hobby", "#1abc9c", "hobby"),
];

impl Category {
    /// The default seed set as owned values
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color, icon)| Category {
                name: name.to_string(),
                color: color.to_string(),
                icon: icon.to_string(),
            })
            .collect()
    }
}
