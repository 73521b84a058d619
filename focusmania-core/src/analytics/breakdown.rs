//! Completion breakdowns by category, priority, mood, day and duration.

use crate::error::{Error, Result};
use crate::types::{Mood, Priority, TaskRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Completion counts for one group of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRate {
    pub label: String,
    pub total: usize,
    pub completed: usize,
    /// completed / total
    pub rate: f64,
}

impl CompletionRate {
    fn new(label: impl Into<String>, total: usize, completed: usize) -> Self {
        Self {
            label: label.into(),
            total,
            completed,
            rate: if total == 0 {
                0.0
            } else {
                completed as f64 / total as f64
            },
        }
    }
}

/// Completion rate per category, in first-observed order.
pub fn completion_by_category(records: &[TaskRecord]) -> Vec<CompletionRate> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: Vec<(usize, usize)> = Vec::new();

    for record in records {
        let index = match order.iter().position(|c| *c == record.category) {
            Some(i) => i,
            None => {
                order.push(&record.category);
                counts.push((0, 0));
                order.len() - 1
            }
        };
        counts[index].0 += 1;
        counts[index].1 += usize::from(record.completed);
    }

    order
        .into_iter()
        .zip(counts)
        .map(|(label, (total, completed))| CompletionRate::new(label, total, completed))
        .collect()
}

/// Completion rate per priority, Low to High. Absent levels are omitted.
pub fn completion_by_priority(records: &[TaskRecord]) -> Vec<CompletionRate> {
    Priority::ALL
        .iter()
        .filter_map(|&priority| {
            let group = records.iter().filter(|r| r.priority == priority);
            let (total, completed) = count(group);
            (total > 0).then(|| CompletionRate::new(priority.as_str(), total, completed))
        })
        .collect()
}

/// Completed vs not-completed counts for one mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodOutcome {
    pub mood: Mood,
    pub completed: usize,
    pub not_completed: usize,
}

/// Outcome counts per mood in fixed mood order. Absent moods are omitted.
pub fn mood_vs_completion(records: &[TaskRecord]) -> Vec<MoodOutcome> {
    Mood::ALL
        .iter()
        .filter_map(|&mood| {
            let (total, completed) = count(records.iter().filter(|r| r.mood == mood));
            (total > 0).then_some(MoodOutcome {
                mood,
                completed,
                not_completed: total - completed,
            })
        })
        .collect()
}

/// Completion rate for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRate {
    pub date: NaiveDate,
    pub total: usize,
    pub completed: usize,
    pub rate: f64,
}

/// Completion rate per day, oldest first. Undated records are ignored.
pub fn daily_trend(records: &[TaskRecord]) -> Vec<DailyRate> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            let entry = days.entry(date).or_default();
            entry.0 += 1;
            entry.1 += usize::from(record.completed);
        }
    }

    days.into_iter()
        .map(|(date, (total, completed))| DailyRate {
            date,
            total,
            completed,
            rate: completed as f64 / total as f64,
        })
        .collect()
}

/// Half-open bin `[start, end)` of time spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Upper bound on the number of bins a histogram may span.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// Histogram of minutes spent with fixed-width bins aligned to multiples of
/// `bin_width`. Bins between the first and last occupied one are kept even
/// when empty.
pub fn time_spent_histogram(records: &[TaskRecord], bin_width: f64) -> Result<Vec<HistogramBin>> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(Error::Config(format!(
            "histogram bin width must be positive, got {}",
            bin_width
        )));
    }

    let slots: Vec<i64> = records
        .iter()
        .map(|r| (r.time_spent_minutes / bin_width).floor() as i64)
        .collect();
    let (Some(&first), Some(&last)) = (slots.iter().min(), slots.iter().max()) else {
        return Ok(Vec::new());
    };

    let n_bins = last
        .checked_sub(first)
        .and_then(|span| usize::try_from(span).ok())
        .and_then(|span| span.checked_add(1))
        .filter(|&n| n <= MAX_HISTOGRAM_BINS)
        .ok_or_else(|| {
            Error::Config(format!(
                "histogram bin width {} would need more than {} bins",
                bin_width, MAX_HISTOGRAM_BINS
            ))
        })?;

    let mut counts = vec![0usize; n_bins];
    for slot in slots {
        counts[(slot - first) as usize] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = (first + i as i64) as f64 * bin_width;
            HistogramBin {
                start,
                end: start + bin_width,
                count,
            }
        })
        .collect())
}

fn count<'a>(records: impl Iterator<Item = &'a TaskRecord>) -> (usize, usize) {
    records.fold((0, 0), |(total, completed), r| {
        (total + 1, completed + usize::from(r.completed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(day: u32, category: &str, priority: Priority, mood: Mood, time: f64, done: bool) -> TaskRecord {
        TaskRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            ..TaskRecord::new(category, priority, mood, time, done)
        }
    }

    fn records() -> Vec<TaskRecord> {
        vec![
            dated(2, "Work", Priority::High, Mood::Stressed, 150.0, false),
            dated(1, "Study", Priority::Low, Mood::Focused, 30.0, true),
            dated(2, "Work", Priority::Medium, Mood::Calm, 45.0, true),
            dated(1, "Health", Priority::Low, Mood::Stressed, 55.0, true),
            TaskRecord::new("Study", Priority::High, Mood::Focused, 120.0, false),
        ]
    }

    #[test]
    fn test_by_category_first_observed() {
        let rows = completion_by_category(&records());
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Work", "Study", "Health"]);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].rate, 0.5);
        assert_eq!(rows[2].rate, 1.0);
    }

    #[test]
    fn test_by_priority_fixed_order() {
        let rows = completion_by_priority(&records());
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Low", "Medium", "High"]);
        assert_eq!(rows[0].rate, 1.0);
        assert_eq!(rows[2].completed, 0);
    }

    #[test]
    fn test_mood_vs_completion() {
        let rows = mood_vs_completion(&records());
        let moods: Vec<_> = rows.iter().map(|r| r.mood).collect();
        assert_eq!(moods, vec![Mood::Focused, Mood::Calm, Mood::Stressed]);
        let stressed = &rows[2];
        assert_eq!((stressed.completed, stressed.not_completed), (1, 1));
    }

    #[test]
    fn test_daily_trend_sorted_and_skips_undated() {
        let days = daily_trend(&records());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[0].rate, 1.0);
        assert_eq!(days[1].total, 2);
        assert_eq!(days[1].rate, 0.5);
    }

    #[test]
    fn test_histogram() {
        let bins = time_spent_histogram(&records(), 50.0).unwrap();
        // 30 | 45 | 55 | 120 | 150  ->  [0,50):2 [50,100):1 [100,150):1 [150,200):1
        let counts: Vec<_> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 200.0);
    }

    #[test]
    fn test_histogram_edge_cases() {
        assert!(time_spent_histogram(&records(), 0.0).is_err());
        assert!(time_spent_histogram(&[], 10.0).unwrap().is_empty());
    }

    #[test]
    fn test_histogram_rejects_tiny_width() {
        let err = time_spent_histogram(&records(), 1e-12).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        // 30..150 min spans 9_601 bins at 0.0125 and 10_910 at 0.011
        assert!(time_spent_histogram(&records(), 0.0125).is_ok());
        assert!(time_spent_histogram(&records(), 0.011).is_err());
    }
}
