//! Core domain types for focusmania
//!
//! These types represent one row of a daily task log after cleaning.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Task record** | A task that was worked on, with its completion outcome |
//! | **Candidate** | A task not yet attempted, submitted for prediction |
//! | **Category** | Free-form grouping chosen by the user (Work, Study, ...) |
//! | **Priority** | One of Low, Medium, High |
//! | **Mood** | How the user felt while working: Focused, Calm, Tired, Stressed |
//!
//! Priority and mood carry fixed integer codes used as model features.
//! Categories have no fixed codes; they are assigned from history by
//! [`crate::predict::Vocabulary`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// Priority
// ============================================

/// Task priority as recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities in code order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Fixed feature code (Low=0, Medium=1, High=2).
    pub fn code(&self) -> u32 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

// ============================================
// Mood
// ============================================

/// Self-reported mood while working on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mood {
    Focused,
    Calm,
    Tired,
    Stressed,
}

impl Mood {
    /// All moods in code order.
    pub const ALL: [Mood; 4] = [Mood::Focused, Mood::Calm, Mood::Tired, Mood::Stressed];

    /// Fixed feature code (Focused=0, Calm=1, Tired=2, Stressed=3).
    pub fn code(&self) -> u32 {
        match self {
            Mood::Focused => 0,
            Mood::Calm => 1,
            Mood::Tired => 2,
            Mood::Stressed => 3,
        }
    }

    /// Tired and Stressed count as low-energy moods for risk scoring.
    pub fn is_drained(&self) -> bool {
        matches!(self, Mood::Tired | Mood::Stressed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Focused => "Focused",
            Mood::Calm => "Calm",
            Mood::Tired => "Tired",
            Mood::Stressed => "Stressed",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focused" => Ok(Mood::Focused),
            "calm" => Ok(Mood::Calm),
            "tired" => Ok(Mood::Tired),
            "stressed" => Ok(Mood::Stressed),
            _ => Err(format!("unknown mood: {}", s)),
        }
    }
}

// ============================================
// Task records
// ============================================

/// One cleaned row of the task log.
///
/// Records are immutable once loaded. `date` and `task` are kept for
/// analytics only and never reach the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Day the task was logged (absent when the source date was unparseable)
    pub date: Option<NaiveDate>,
    /// Free-text task title
    pub task: String,
    pub category: String,
    pub priority: Priority,
    pub mood: Mood,
    /// Minutes spent, always positive
    pub time_spent_minutes: f64,
    pub completed: bool,
}

impl TaskRecord {
    /// Build a record with no date or title, as used by tests and callers
    /// that only care about model features.
    pub fn new(
        category: impl Into<String>,
        priority: Priority,
        mood: Mood,
        time_spent_minutes: f64,
        completed: bool,
    ) -> Self {
        Self {
            date: None,
            task: String::new(),
            category: category.into(),
            priority,
            mood,
            time_spent_minutes,
            completed,
        }
    }
}

/// A task submitted for prediction: the feature columns of a record,
/// without an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCandidate {
    pub time_spent_minutes: f64,
    pub category: String,
    pub priority: Priority,
    pub mood: Mood,
}

impl TaskCandidate {
    pub fn new(
        category: impl Into<String>,
        priority: Priority,
        mood: Mood,
        time_spent_minutes: f64,
    ) -> Self {
        Self {
            time_spent_minutes,
            category: category.into(),
            priority,
            mood,
        }
    }
}

impl From<&TaskRecord> for TaskCandidate {
    fn from(record: &TaskRecord) -> Self {
        Self {
            time_spent_minutes: record.time_spent_minutes,
            category: record.category.clone(),
            priority: record.priority,
            mood: record.mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codes() {
        let priority_codes: Vec<u32> = Priority::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(priority_codes, vec![0, 1, 2]);

        let mood_codes: Vec<u32> = Mood::ALL.iter().map(|m| m.code()).collect();
        assert_eq!(mood_codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" high ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("STRESSED".parse::<Mood>().unwrap(), Mood::Stressed);
        assert!("urgent".parse::<Priority>().is_err());
        assert!("happy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_drained_moods() {
        assert!(Mood::Tired.is_drained());
        assert!(Mood::Stressed.is_drained());
        assert!(!Mood::Focused.is_drained());
        assert!(!Mood::Calm.is_drained());
    }

    #[test]
    fn test_candidate_from_record() {
        let record = TaskRecord::new("Work", Priority::High, Mood::Calm, 45.0, true);
        let candidate = TaskCandidate::from(&record);
        assert_eq!(candidate.category, "Work");
        assert_eq!(candidate.priority, Priority::High);
        assert_eq!(candidate.time_spent_minutes, 45.0);
    }
}
