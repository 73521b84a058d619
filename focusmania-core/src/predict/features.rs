//! Model feature vectors.
//!
//! Every consumer reads features through [`Feature`], never by position,
//! so training and inference cannot disagree on column order.

use super::encoder::Vocabulary;
use crate::error::{Error, Result};
use crate::types::{TaskCandidate, TaskRecord};
use serde::Serialize;

/// The four model features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Feature {
    TimeSpent,
    Category,
    Priority,
    Mood,
}

impl Feature {
    /// All features in canonical order.
    pub const ALL: [Feature; 4] = [
        Feature::TimeSpent,
        Feature::Category,
        Feature::Priority,
        Feature::Mood,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Column name in the task log.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::TimeSpent => "Time_Spent_Min",
            Feature::Category => "Category",
            Feature::Priority => "Priority",
            Feature::Mood => "Mood",
        }
    }

    /// Position in [`Feature::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Feature::TimeSpent => 0,
            Feature::Category => 1,
            Feature::Priority => 2,
            Feature::Mood => 3,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Encoded representation of one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub time_spent_minutes: f64,
    pub category_code: u32,
    pub priority_code: u32,
    pub mood_code: u32,
}

impl FeatureVector {
    /// Assemble a vector from already-encoded parts.
    pub fn build(
        time_spent_minutes: f64,
        category_code: u32,
        priority_code: u32,
        mood_code: u32,
    ) -> Self {
        Self {
            time_spent_minutes,
            category_code,
            priority_code,
            mood_code,
        }
    }

    /// Numeric value of one feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::TimeSpent => self.time_spent_minutes,
            Feature::Category => f64::from(self.category_code),
            Feature::Priority => f64::from(self.priority_code),
            Feature::Mood => f64::from(self.mood_code),
        }
    }
}

/// Encodes records and candidates against one category vocabulary.
pub struct FeatureBuilder<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Encode a candidate task.
    ///
    /// Fails with `InvalidFeature` for a non-positive or non-finite time and
    /// with `UnknownCategory` when the category is not in the vocabulary.
    pub fn encode(&self, candidate: &TaskCandidate) -> Result<FeatureVector> {
        let time = candidate.time_spent_minutes;
        if !time.is_finite() || time <= 0.0 {
            return Err(Error::InvalidFeature(format!(
                "time spent must be a positive number of minutes, got {}",
                time
            )));
        }

        let category_code = self.vocabulary.encode(&candidate.category)?;

        Ok(FeatureVector::build(
            time,
            category_code,
            candidate.priority.code(),
            candidate.mood.code(),
        ))
    }

    /// Encode a historical record.
    pub fn encode_record(&self, record: &TaskRecord) -> Result<FeatureVector> {
        self.encode(&TaskCandidate::from(record))
    }

    /// Encode every record, failing on the first bad one.
    pub fn encode_all(&self, records: &[TaskRecord]) -> Result<Vec<FeatureVector>> {
        records.iter().map(|r| self.encode_record(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mood, Priority};

    #[test]
    fn test_feature_order() {
        let names: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Time_Spent_Min", "Category", "Priority", "Mood"]);
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_get_by_name() {
        let vector = FeatureVector::build(90.0, 3, 2, 1);
        assert_eq!(vector.get(Feature::TimeSpent), 90.0);
        assert_eq!(vector.get(Feature::Category), 3.0);
        assert_eq!(vector.get(Feature::Priority), 2.0);
        assert_eq!(vector.get(Feature::Mood), 1.0);
    }

    #[test]
    fn test_encode_candidate() {
        let vocabulary = Vocabulary::fit(["Work", "Study"]);
        let builder = FeatureBuilder::new(&vocabulary);

        let vector = builder
            .encode(&TaskCandidate::new("Study", Priority::High, Mood::Tired, 75.0))
            .unwrap();

        assert_eq!(vector, FeatureVector::build(75.0, 1, 2, 2));
    }

    #[test]
    fn test_rejects_non_positive_time() {
        let vocabulary = Vocabulary::fit(["Work"]);
        let builder = FeatureBuilder::new(&vocabulary);

        for time in [0.0, -5.0, f64::NAN] {
            let err = builder
                .encode(&TaskCandidate::new("Work", Priority::Low, Mood::Calm, time))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidFeature(_)));
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        let vocabulary = Vocabulary::fit(["Work"]);
        let builder = FeatureBuilder::new(&vocabulary);

        let err = builder
            .encode(&TaskCandidate::new("Chores", Priority::Low, Mood::Calm, 30.0))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(_)));
    }
}
