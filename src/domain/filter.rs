/// Habit list filtering
///
/// A HabitFilter is a small tagged configuration: every field is optional and
/// every field that is set becomes one predicate. Predicates are ANDed.
/// Storage backends translate predicates into parameterized queries; the
/// in-memory `matches` gives the same answer without a database.

use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitStatus, Priority};

/// Optional constraints for listing habits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitFilter {
    /// Exact category name
    pub category: Option<String>,
    pub status: Option<HabitStatus>,
    pub priority: Option<Priority>,
    /// Substring of the name or the notes, ASCII case-insensitive
    pub search: Option<String>,
}

/// One constraint derived from a HabitFilter field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    CategoryIs(String),
    StatusIs(HabitStatus),
    PriorityIs(Priority),
    NameOrNotesContains(String),
}

impl HabitFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: HabitStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The predicates this filter imposes. Empty text fields impose nothing.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            predicates.push(Predicate::CategoryIs(category.to_string()));
        }
        if let Some(status) = self.status {
            predicates.push(Predicate::StatusIs(status));
        }
        if let Some(priority) = self.priority {
            predicates.push(Predicate::PriorityIs(priority));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Predicate::NameOrNotesContains(search.to_string()));
        }

        predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Evaluate the filter against a habit in memory
    pub fn matches(&self, habit: &Habit) -> bool {
        self.predicates().iter().all(|p| p.matches(habit))
    }
}

impl Predicate {
    pub fn matches(&self, habit: &Habit) -> bool {
        match self {
            Predicate::CategoryIs(category) => habit.category == *category,
            Predicate::StatusIs(status) => habit.status == *status,
            Predicate::PriorityIs(priority) => habit.priority == *priority,
            Predicate::NameOrNotesContains(needle) => {
                let needle = needle.to_ascii_lowercase();
                habit.name.to_ascii_lowercase().contains(&needle)
                    || habit.notes.to_ascii_lowercase().contains(&needle)
            }
        }
    }
}
