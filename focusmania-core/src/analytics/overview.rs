//! Headline numbers for a task history.

use crate::format::{format_minutes, format_percent};
use crate::types::{Priority, TaskRecord};
use serde::Serialize;

/// Overview metrics. An empty history yields all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    /// Number of records
    pub total_tasks: usize,
    /// Records marked completed
    pub completed_tasks: usize,
    /// completed / total, 0..=1
    pub completion_rate: f64,
    /// Mean minutes spent per task
    pub avg_time_spent: f64,
    /// Records with High priority
    pub high_priority_tasks: usize,
}

impl OverviewStats {
    pub fn from_records(records: &[TaskRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let completed = records.iter().filter(|r| r.completed).count();
        let minutes: f64 = records.iter().map(|r| r.time_spent_minutes).sum();
        let high = records
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count();

        Self {
            total_tasks: total,
            completed_tasks: completed,
            completion_rate: completed as f64 / total as f64,
            avg_time_spent: minutes / total as f64,
            high_priority_tasks: high,
        }
    }

    /// Completion rate for display (e.g., "62.5%").
    pub fn format_completion_rate(&self) -> String {
        format_percent(self.completion_rate)
    }

    /// Mean time for display (e.g., "48 min").
    pub fn format_avg_time(&self) -> String {
        format_minutes(self.avg_time_spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;

    #[test]
    fn test_overview() {
        let records = vec![
            TaskRecord::new("Work", Priority::High, Mood::Stressed, 150.0, false),
            TaskRecord::new("Study", Priority::Low, Mood::Focused, 30.0, true),
            TaskRecord::new("Work", Priority::High, Mood::Calm, 60.0, true),
            TaskRecord::new("Health", Priority::Medium, Mood::Tired, 40.0, true),
        ];
        let stats = OverviewStats::from_records(&records);

        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 3);
        assert_eq!(stats.completion_rate, 0.75);
        assert_eq!(stats.avg_time_spent, 70.0);
        assert_eq!(stats.high_priority_tasks, 2);
        assert_eq!(stats.format_completion_rate(), "75.0%");
        assert_eq!(stats.format_avg_time(), "70 min");
    }

    #[test]
    fn test_empty_overview() {
        assert_eq!(OverviewStats::from_records(&[]), OverviewStats::default());
    }
}
