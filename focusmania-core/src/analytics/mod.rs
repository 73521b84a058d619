//! Descriptive statistics over a task history
//!
//! Provides:
//! - Overview metrics (totals, completion rate, mean time)
//! - Completion breakdowns by category, priority and mood
//! - Daily completion trend
//! - Time-spent histogram
//!
//! Everything here is a pure function of the records passed in.

pub mod breakdown;
pub mod overview;

pub use breakdown::{
    completion_by_category, completion_by_priority, daily_trend, mood_vs_completion,
    time_spent_histogram, CompletionRate, DailyRate, HistogramBin, MoodOutcome,
};
pub use overview::OverviewStats;

use crate::error::Result;
use crate::types::TaskRecord;
use serde::Serialize;

/// Default histogram bin width in minutes.
pub const DEFAULT_BIN_WIDTH: f64 = 15.0;

/// All analytics for one history, as shown by `focusmania-analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub overview: OverviewStats,
    pub by_category: Vec<CompletionRate>,
    pub by_priority: Vec<CompletionRate>,
    pub by_mood: Vec<MoodOutcome>,
    pub daily_trend: Vec<DailyRate>,
    pub time_histogram: Vec<HistogramBin>,
}

impl AnalyticsReport {
    pub fn build(records: &[TaskRecord], bin_width: f64) -> Result<Self> {
        Ok(Self {
            overview: OverviewStats::from_records(records),
            by_category: completion_by_category(records),
            by_priority: completion_by_priority(records),
            by_mood: mood_vs_completion(records),
            daily_trend: daily_trend(records),
            time_histogram: time_spent_histogram(records, bin_width)?,
        })
    }
}
