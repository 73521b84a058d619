//! Ingestion of tabular task logs
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────┐     ┌────────────────────┐
//! │  Raw task log    │ ──► │  cleaning   │ ──► │  Cleaned task log  │
//! │ (Yes/No, dupes)  │     │ (clean_raw) │     │ (write_cleaned)    │
//! └──────────────────┘     └─────────────┘     └─────────┬──────────┘
//!                                                        │ load_history
//!                                                        ▼
//!                                              ┌────────────────────┐
//!                                              │  Vec<TaskRecord>   │
//!                                              └────────────────────┘
//! ```
//!
//! Both logs share the header `Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed`.
//! Bad rows are skipped with a warning instead of failing the whole file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use focusmania_core::ingest;
//!
//! let loaded = ingest::load_history(&path)?;
//! for warning in &loaded.warnings {
//!     eprintln!("{}", warning);
//! }
//! println!("{} records", loaded.records.len());
//! ```

mod cleaning;
mod row;

pub use cleaning::{clean_raw, clean_raw_files, CleanReport, CleanResult};

use crate::error::{Error, Result};
use crate::types::TaskRecord;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Header of cleaned task logs, in column order.
pub const COLUMNS: [&str; 7] = [
    "Date",
    "Task",
    "Category",
    "Priority",
    "Mood",
    "Time_Spent_Min",
    "Completed",
];

/// Columns the model cannot do without.
const REQUIRED_COLUMNS: [&str; 5] = ["Category", "Priority", "Mood", "Time_Spent_Min", "Completed"];

/// Records loaded from a cleaned log.
#[derive(Debug, Default)]
pub struct LoadResult {
    pub records: Vec<TaskRecord>,
    /// Skipped rows, one message each
    pub warnings: Vec<String>,
}

/// Parse a cleaned task log from any reader.
pub fn parse_history<R: Read>(input: R) -> Result<LoadResult> {
    let mut result = LoadResult::default();

    for (line, row) in row::read_rows(input, &mut result.warnings)? {
        match row.into_record() {
            Ok(record) => result.records.push(record),
            Err(reason) => {
                let warning = format!("line {}: {}", line, reason);
                tracing::warn!(line, %reason, "Skipping task row");
                result.warnings.push(warning);
            }
        }
    }

    tracing::debug!(
        records = result.records.len(),
        skipped = result.warnings.len(),
        "Parsed task history"
    );

    Ok(result)
}

/// Load a cleaned task log from disk.
pub fn load_history(path: &Path) -> Result<LoadResult> {
    let file = std::fs::File::open(path)?;
    let result = parse_history(file)?;
    tracing::info!(
        path = %path.display(),
        records = result.records.len(),
        "Loaded task history"
    );
    Ok(result)
}

/// Write records as a cleaned task log (`Completed` as 1/0).
pub fn write_cleaned<W: Write>(output: W, records: &[TaskRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(COLUMNS)?;

    for record in records {
        let date = record
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            date.as_str(),
            record.task.as_str(),
            record.category.as_str(),
            record.priority.as_str(),
            record.mood.as_str(),
            format_minutes(record.time_spent_minutes).as_str(),
            if record.completed { "1" } else { "0" },
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a cleaned task log to disk, creating parent directories.
pub fn write_cleaned_file(path: &Path, records: &[TaskRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_cleaned(file, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "Wrote cleaned task log");
    Ok(())
}

/// Find raw task logs in `dir` matching a glob `pattern`, sorted by path.
pub fn discover_raw_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();

    let entries = glob::glob(&full)
        .map_err(|e| Error::Config(format!("invalid file pattern {:?}: {}", pattern, e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable path while discovering task logs");
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Whole minutes print without a fraction, matching the raw logs.
fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{}", minutes as i64)
    } else {
        minutes.to_string()
    }
}

fn check_columns(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Parse {
            line: 1,
            message: format!("missing column(s): {}", missing.join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mood, Priority};
    use chrono::NaiveDate;

    const CLEANED: &str = "\
Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed
2024-01-01,Write report,Work,High,Stressed,150,0
2024-01-01,Read chapter,Study,Low,Focused,45,1
2024-01-02 00:00:00,Gym,Health,Medium,Calm,60.0,1.0
";

    #[test]
    fn test_parse_history() {
        let loaded = parse_history(CLEANED.as_bytes()).unwrap();
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        assert_eq!(loaded.records.len(), 3);

        let first = &loaded.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(first.task, "Write report");
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.mood, Mood::Stressed);
        assert_eq!(first.time_spent_minutes, 150.0);
        assert!(!first.completed);

        let third = &loaded.records[2];
        assert_eq!(third.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(third.completed);
    }

    #[test]
    fn test_bad_rows_become_warnings() {
        let input = "\
Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed
2024-01-01,A,Work,Urgent,Calm,30,1
2024-01-01,B,Work,Low,Calm,-4,1
2024-01-01,C,,Low,Calm,30,1
2024-01-01,D,Work,Low,Calm,30,maybe
2024-01-01,E,Work,Low,Calm,30,1
";
        let loaded = parse_history(input.as_bytes()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].task, "E");
        assert_eq!(loaded.warnings.len(), 4);
        assert!(loaded.warnings[0].starts_with("line 2:"));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let input = "Date,Task,Category,Priority,Time_Spent_Min,Completed\n";
        let err = parse_history(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, ref message } if message.contains("Mood")));
    }

    #[test]
    fn test_write_then_load() {
        let loaded = parse_history(CLEANED.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_cleaned(&mut buffer, &loaded.records).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Date,Task,Category,Priority,Mood,Time_Spent_Min,Completed\n"));
        assert!(text.contains("2024-01-02,Gym,Health,Medium,Calm,60,1"));

        let reloaded = parse_history(buffer.as_slice()).unwrap();
        assert_eq!(reloaded.records, loaded.records);
    }

    #[test]
    fn test_discover_raw_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("productivity_data_b.csv"), "x").unwrap();
        std::fs::write(dir.path().join("productivity_data_a.csv"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = discover_raw_files(dir.path(), "productivity_data*.csv").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["productivity_data_a.csv", "productivity_data_b.csv"]);
    }
}
