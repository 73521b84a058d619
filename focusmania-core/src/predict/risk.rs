//! Heuristic completion risk.
//!
//! Additive policy, independent of any trained model:
//!
//! | Condition | Increment |
//! |-----------|-----------|
//! | priority is High | +0.4 |
//! | mood is Tired or Stressed | +0.4 |
//! | more than 120 minutes | +0.2 |
//!
//! The increments sum to exactly 1.0, so scores stay in `[0, 1]` without
//! clamping. Any new factor must keep that sum at or below 1.0.

use crate::types::{Mood, Priority};
use serde::Serialize;

/// Minutes above which a task counts as long.
pub const LONG_TASK_MINUTES: f64 = 120.0;

/// A condition that adds to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    HighPriority,
    DrainedMood,
    LongTask,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 3] = [
        RiskFactor::HighPriority,
        RiskFactor::DrainedMood,
        RiskFactor::LongTask,
    ];

    /// Amount this factor adds to the score.
    pub fn weight(&self) -> f64 {
        match self {
            RiskFactor::HighPriority => 0.4,
            RiskFactor::DrainedMood => 0.4,
            RiskFactor::LongTask => 0.2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::HighPriority => "high priority",
            RiskFactor::DrainedMood => "tired or stressed",
            RiskFactor::LongTask => "longer than 120 minutes",
        }
    }
}

/// Risk score together with the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Rounded to two decimals
    pub score: f64,
    pub factors: Vec<RiskFactor>,
}

/// Score a task and report which factors fired.
pub fn assess(priority: Priority, mood: Mood, time_spent_minutes: f64) -> RiskAssessment {
    let mut factors = Vec::new();
    if priority == Priority::High {
        factors.push(RiskFactor::HighPriority);
    }
    if mood.is_drained() {
        factors.push(RiskFactor::DrainedMood);
    }
    if time_spent_minutes > LONG_TASK_MINUTES {
        factors.push(RiskFactor::LongTask);
    }

    let raw: f64 = factors.iter().map(|f| f.weight()).sum();
    RiskAssessment {
        score: round2(raw),
        factors,
    }
}

/// Risk score in `[0, 1]`, rounded to two decimals.
pub fn score(priority: Priority, mood: Mood, time_spent_minutes: f64) -> f64 {
    assess(priority, mood, time_spent_minutes).score
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scores() {
        assert_eq!(score(Priority::High, Mood::Stressed, 150.0), 1.0);
        assert_eq!(score(Priority::Low, Mood::Calm, 30.0), 0.0);
        assert_eq!(score(Priority::High, Mood::Focused, 60.0), 0.4);
    }

    #[test]
    fn test_partial_combinations() {
        assert_eq!(score(Priority::Medium, Mood::Tired, 30.0), 0.4);
        assert_eq!(score(Priority::Low, Mood::Focused, 121.0), 0.2);
        assert_eq!(score(Priority::High, Mood::Calm, 180.0), 0.6);
        assert_eq!(score(Priority::Low, Mood::Stressed, 150.0), 0.6);
        assert_eq!(score(Priority::High, Mood::Tired, 60.0), 0.8);
    }

    #[test]
    fn test_long_task_boundary_is_exclusive() {
        assert_eq!(score(Priority::Low, Mood::Calm, 120.0), 0.0);
        assert_eq!(score(Priority::Low, Mood::Calm, 120.5), 0.2);
    }

    #[test]
    fn test_weights_never_exceed_one() {
        let total: f64 = RiskFactor::ALL.iter().map(|f| f.weight()).sum();
        assert!(total <= 1.0 + 1e-12);

        for priority in Priority::ALL {
            for mood in Mood::ALL {
                for time in [10.0, 120.0, 180.0] {
                    let s = score(priority, mood, time);
                    assert!((0.0..=1.0).contains(&s), "{priority} {mood} {time} -> {s}");
                }
            }
        }
    }

    #[test]
    fn test_factors_reported() {
        let assessment = assess(Priority::High, Mood::Focused, 150.0);
        assert_eq!(
            assessment.factors,
            vec![RiskFactor::HighPriority, RiskFactor::LongTask]
        );
        assert_eq!(assessment.score, 0.6);
    }
}
