//! # focusmania-core
//!
//! Core library for FocusMania - task completion prediction from a personal
//! productivity log.
//!
//! This library provides:
//! - Domain types for tasks, priorities and moods
//! - CSV ingestion and cleaning of task logs
//! - Descriptive analytics
//! - A seeded random forest with risk scoring and recommendations
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Raw:** hand-kept CSV logs with duplicates, gaps and Yes/No flags
//! - **Cleaned:** normalised CSV, one [`TaskRecord`] per row
//! - **Derived:** analytics, trained model snapshots and predictions (regenerable)
//!
//! ## Example
//!
//! ```rust,no_run
//! use focusmania_core::predict::{evaluate, ForestParams};
//! use focusmania_core::{ingest, Config, Mood, Priority, TaskCandidate};
//!
//! let config = Config::load().expect("failed to load config");
//! let history = ingest::load_history(&config.data.cleaned_path())
//!     .expect("failed to load history")
//!     .records;
//!
//! let candidate = TaskCandidate::new("Work", Priority::High, Mood::Tired, 90.0);
//! let result = evaluate(&history, &candidate, &ForestParams::from(&config.model))
//!     .expect("failed to evaluate");
//! println!("{}", result.recommendation);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod predict;
pub mod types;
