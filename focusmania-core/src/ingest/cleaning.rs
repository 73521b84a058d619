//! Raw log cleaning.
//!
//! Steps, in order:
//! 1. drop rows that exactly repeat an earlier row
//! 2. coerce dates, title-case text columns, map Yes/No to a flag
//! 3. forward-fill missing or unusable cells from the previous row
//! 4. drop rows still missing a model column (only possible at the top)

use super::row::{self, parse_completed, parse_date, parse_minutes, RawRow};
use crate::error::Result;
use crate::types::{Mood, Priority, TaskRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

/// Counts from one cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_read: usize,
    pub duplicates_removed: usize,
    /// Cells present but unparseable, treated as missing
    pub values_coerced: usize,
    pub values_filled: usize,
    pub rows_dropped: usize,
    pub rows_written: usize,
}

/// Cleaned records plus what happened to the input.
#[derive(Debug, Default)]
pub struct CleanResult {
    pub records: Vec<TaskRecord>,
    pub report: CleanReport,
    pub warnings: Vec<String>,
}

/// Clean one raw task log.
pub fn clean_raw<R: Read>(input: R) -> Result<CleanResult> {
    let mut warnings = Vec::new();
    let rows = row::read_rows(input, &mut warnings)?
        .into_iter()
        .map(|(line, row)| (format!("line {}", line), row))
        .collect();
    Ok(clean_rows(rows, warnings))
}

/// Clean several raw logs as one table, in the order given.
pub fn clean_raw_files(paths: &[PathBuf]) -> Result<CleanResult> {
    let mut warnings = Vec::new();
    let mut rows = Vec::new();

    for path in paths {
        let file = std::fs::File::open(path)?;
        let mut file_warnings = Vec::new();
        let file_rows = row::read_rows(file, &mut file_warnings)?;
        tracing::debug!(path = %path.display(), rows = file_rows.len(), "Read raw task log");

        let name = path.display();
        warnings.extend(file_warnings.into_iter().map(|w| format!("{}: {}", name, w)));
        rows.extend(
            file_rows
                .into_iter()
                .map(|(line, row)| (format!("{}: line {}", name, line), row)),
        );
    }

    Ok(clean_rows(rows, warnings))
}

/// A row after coercion; `None` means missing.
#[derive(Debug, Clone, Default)]
struct NormalRow {
    date: Option<NaiveDate>,
    task: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    mood: Option<Mood>,
    time_spent_minutes: Option<f64>,
    completed: Option<bool>,
}

fn clean_rows(rows: Vec<(String, RawRow)>, mut warnings: Vec<String>) -> CleanResult {
    let mut report = CleanReport {
        rows_read: rows.len(),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    let unique: Vec<(String, RawRow)> = rows
        .into_iter()
        .filter(|(_, row)| seen.insert(row.clone()))
        .collect();
    report.duplicates_removed = report.rows_read - unique.len();

    let mut previous = NormalRow::default();
    let mut records = Vec::with_capacity(unique.len());

    for (origin, raw) in unique {
        let mut row = normalize(raw, &origin, &mut report, &mut warnings);
        report.values_filled += forward_fill(&mut row, &previous);
        previous = row.clone();

        match finish(row) {
            Ok(record) => records.push(record),
            Err(missing) => {
                report.rows_dropped += 1;
                let warning = format!("{}: dropped, no earlier value for {}", origin, missing);
                tracing::warn!(%origin, %missing, "Dropping task row");
                warnings.push(warning);
            }
        }
    }

    report.rows_written = records.len();
    tracing::info!(
        rows_read = report.rows_read,
        duplicates = report.duplicates_removed,
        filled = report.values_filled,
        dropped = report.rows_dropped,
        "Cleaned task log"
    );

    CleanResult {
        records,
        report,
        warnings,
    }
}

fn normalize(
    raw: RawRow,
    origin: &str,
    report: &mut CleanReport,
    warnings: &mut Vec<String>,
) -> NormalRow {
    let mut coerce = |column: &str, text: &str| {
        report.values_coerced += 1;
        tracing::debug!(%origin, column, value = text, "Treating unusable value as missing");
        warnings.push(format!("{}: unusable {} {:?}", origin, column, text));
    };

    let date = raw.date.and_then(|text| {
        let parsed = parse_date(&text);
        if parsed.is_none() {
            coerce("Date", &text);
        }
        parsed
    });

    let task = raw.task.map(|t| title_case(&t));
    let category = raw.category.map(|c| title_case(&c));

    let priority = raw.priority.and_then(|text| match title_case(&text).parse() {
        Ok(p) => Some(p),
        Err(_) => {
            coerce("Priority", &text);
            None
        }
    });

    let mood = raw.mood.and_then(|text| match title_case(&text).parse() {
        Ok(m) => Some(m),
        Err(_) => {
            coerce("Mood", &text);
            None
        }
    });

    let time_spent_minutes = raw.time_spent_min.and_then(|text| match parse_minutes(&text) {
        Ok(m) => Some(m),
        Err(_) => {
            coerce("Time_Spent_Min", &text);
            None
        }
    });

    let completed = raw.completed.and_then(|text| {
        let parsed = parse_completed(&text);
        if parsed.is_none() {
            coerce("Completed", &text);
        }
        parsed
    });

    NormalRow {
        date,
        task,
        category,
        priority,
        mood,
        time_spent_minutes,
        completed,
    }
}

/// Fill each missing cell of `row` from `previous`. Returns the fill count.
fn forward_fill(row: &mut NormalRow, previous: &NormalRow) -> usize {
    fn fill<T: Clone>(cell: &mut Option<T>, from: &Option<T>) -> usize {
        if cell.is_none() && from.is_some() {
            cell.clone_from(from);
            1
        } else {
            0
        }
    }

    fill(&mut row.date, &previous.date)
        + fill(&mut row.task, &previous.task)
        + fill(&mut row.category, &previous.category)
        + fill(&mut row.priority, &previous.priority)
        + fill(&mut row.mood, &previous.mood)
        + fill(&mut row.time_spent_minutes, &previous.time_spent_minutes)
        + fill(&mut row.completed, &previous.completed)
}

fn finish(row: NormalRow) -> std::result::Result<TaskRecord, &'static str> {
    Ok(TaskRecord {
        date: row.date,
        task: row.task.unwrap_or_default(),
        category: row.category.ok_or("Category")?,
        priority: row.priority.ok_or("Priority")?,
        mood: row.mood.ok_or("Mood")?,
        time_spent_minutes: row.time_spent_minutes.ok_or("Time_Spent_Min")?,
        completed: row.completed.ok_or("Completed")?,
    })
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed
2024-01-01,write report,work,high,stressed,150,No
2024-01-01,write report,work,high,stressed,150,No
2024-01-02,read chapter,STUDY,low,focused,45,Yes
not a date,gym,health,medium,,60,
2024-01-03,  groceries ,personal,Someday,calm,20,Yes
";

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("deep work"), "Deep Work");
        assert_eq!(title_case("STUDY"), "Study");
        assert_eq!(title_case("self-care"), "Self-Care");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_clean_raw() {
        let cleaned = clean_raw(RAW.as_bytes()).unwrap();
        let report = &cleaned.report;

        assert_eq!(report.rows_read, 5);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.rows_written, 4);
        assert_eq!(report.rows_dropped, 0);
        // "not a date" and "Someday"
        assert_eq!(report.values_coerced, 2);
        // date, mood, completed on the gym row; priority on groceries
        assert_eq!(report.values_filled, 4);

        let records = &cleaned.records;
        assert_eq!(records[0].task, "Write Report");
        assert_eq!(records[0].category, "Work");
        assert!(!records[0].completed);

        assert_eq!(records[1].category, "Study");
        assert!(records[1].completed);

        let gym = &records[2];
        assert_eq!(gym.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(gym.mood, Mood::Focused);
        assert!(gym.completed);

        let groceries = &records[3];
        assert_eq!(groceries.task, "Groceries");
        assert_eq!(groceries.priority, Priority::Medium);
    }

    #[test]
    fn test_leading_gap_drops_row() {
        let input = "\
Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed
2024-01-01,a,work,high,,30,Yes
2024-01-01,b,work,high,calm,30,Yes
";
        let cleaned = clean_raw(input.as_bytes()).unwrap();
        assert_eq!(cleaned.report.rows_dropped, 1);
        assert_eq!(cleaned.records.len(), 1);
        assert!(cleaned.warnings[0].contains("Mood"));
    }

    #[test]
    fn test_clean_multiple_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(
            &a,
            "Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed\n2024-01-01,x,work,low,calm,10,Yes\n",
        )
        .unwrap();
        std::fs::write(
            &b,
            "Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed\n2024-01-01,x,work,low,calm,10,Yes\n2024-01-02,y,study,,tired,20,No\n",
        )
        .unwrap();

        let cleaned = clean_raw_files(&[a, b]).unwrap();
        assert_eq!(cleaned.report.rows_read, 3);
        assert_eq!(cleaned.report.duplicates_removed, 1);
        assert_eq!(cleaned.records.len(), 2);
        assert_eq!(cleaned.records[1].priority, Priority::Low);
    }
}
