//! Classifier trait shared by the random forest and the logistic baseline.
//!
//! Training consumes encoded features with their completion labels and
//! returns a fresh model; nothing is updated in place.

use super::features::FeatureVector;
use crate::error::{Error, Result};

/// A trained binary model.
pub trait Predictor {
    /// Probability that the task is completed, in `[0, 1]`.
    fn predict_proba(&self, features: &FeatureVector) -> f64;

    /// Completion label. Ties go to "not completed".
    fn predict(&self, features: &FeatureVector) -> bool {
        self.predict_proba(features) > 0.5
    }
}

/// A training algorithm.
pub trait Classifier {
    type Model: Predictor;

    /// Short identifier for reports
    fn name(&self) -> &'static str;

    /// Fit a new model. Fails when labels hold fewer than two outcomes.
    fn train(&self, features: &[FeatureVector], labels: &[bool]) -> Result<Self::Model>;
}

/// Validate a training set before any model work starts.
pub(crate) fn check_training_set(features: &[FeatureVector], labels: &[bool]) -> Result<()> {
    if features.len() != labels.len() {
        return Err(Error::InvalidFeature(format!(
            "{} feature rows but {} labels",
            features.len(),
            labels.len()
        )));
    }
    ensure_both_outcomes(labels)
}

/// Fail with `EmptyTrainingSet` unless both `true` and `false` appear.
pub fn ensure_both_outcomes(labels: &[bool]) -> Result<()> {
    let positives = labels.iter().filter(|&&l| l).count();
    let distinct = usize::from(positives > 0) + usize::from(positives < labels.len());
    if distinct < 2 {
        return Err(Error::EmptyTrainingSet {
            distinct,
            rows: labels.len(),
        });
    }
    Ok(())
}
