//! CSV row reading shared by the loader and the cleaner.

use super::check_columns;
use crate::error::Result;
use crate::types::{Mood, Priority, TaskRecord};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;

/// One row as text. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub(super) struct RawRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Task")]
    pub task: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Priority")]
    pub priority: Option<String>,
    #[serde(rename = "Mood")]
    pub mood: Option<String>,
    #[serde(rename = "Time_Spent_Min")]
    pub time_spent_min: Option<String>,
    #[serde(rename = "Completed")]
    pub completed: Option<String>,
}

impl RawRow {
    /// Strict conversion used for cleaned logs. Bad dates become absent.
    pub fn into_record(self) -> std::result::Result<TaskRecord, String> {
        let date = self.date.as_deref().and_then(parse_date);
        let category = required(self.category, "Category")?;
        let priority: Priority = required(self.priority, "Priority")?.parse()?;
        let mood: Mood = required(self.mood, "Mood")?.parse()?;
        let time_spent_minutes = parse_minutes(&required(self.time_spent_min, "Time_Spent_Min")?)?;
        let completed_text = required(self.completed, "Completed")?;
        let completed = parse_completed(&completed_text)
            .ok_or_else(|| format!("invalid completion flag {:?}", completed_text))?;

        Ok(TaskRecord {
            date,
            task: self.task.unwrap_or_default(),
            category,
            priority,
            mood,
            time_spent_minutes,
            completed,
        })
    }
}

fn required(value: Option<String>, column: &str) -> std::result::Result<String, String> {
    value.ok_or_else(|| format!("missing {}", column))
}

/// Read every row, collecting unreadable ones as warnings.
///
/// Returns `(line, row)` pairs; line 1 is the header.
pub(super) fn read_rows<R: Read>(input: R, warnings: &mut Vec<String>) -> Result<Vec<(u64, RawRow)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                tracing::warn!(line, error = %e, "Unreadable CSV row");
                warnings.push(format!("line {}: {}", line, e));
                continue;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(row) => rows.push((line, row)),
            Err(e) => {
                tracing::warn!(line, error = %e, "Undecodable CSV row");
                warnings.push(format!("line {}: {}", line, e));
            }
        }
    }

    Ok(rows)
}

/// Dates as ISO days or ISO timestamps.
pub(super) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Minutes must be finite and positive.
pub(super) fn parse_minutes(text: &str) -> std::result::Result<f64, String> {
    let minutes: f64 = text
        .parse()
        .map_err(|_| format!("invalid time spent {:?}", text))?;
    if minutes.is_finite() && minutes > 0.0 {
        Ok(minutes)
    } else {
        Err(format!("time spent must be positive, got {}", text))
    }
}

/// Completion flags in either the cleaned (1/0) or raw (Yes/No) form.
pub(super) fn parse_completed(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(true),
        "0" | "0.0" | "false" | "no" => Some(false),
        _ => None,
    }
}
