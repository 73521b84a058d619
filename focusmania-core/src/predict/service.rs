//! Prediction orchestration.
//!
//! A [`ModelSnapshot`] bundles the category vocabulary and the forest fitted
//! on one history. Snapshots are immutable; a new history means a new
//! snapshot. [`PredictionService`] keeps at most one snapshot and rebuilds it
//! whenever the fingerprint of the history it is given changes.

use super::classifier::{ensure_both_outcomes, Classifier, Predictor};
use super::encoder::Vocabulary;
use super::features::FeatureBuilder;
use super::forest::{FeatureImportance, ForestParams, RandomForest, TrainedForest};
use super::recommend::{recommend, Recommendation};
use super::risk::{self, RiskFactor};
use crate::error::Result;
use crate::types::{TaskCandidate, TaskRecord};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Outcome of evaluating one candidate task.
///
/// The classifier prediction and the risk score are computed independently
/// and never reconciled: a high-risk task may still be predicted completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub completed_prediction: bool,
    /// Averaged forest vote for "completed"
    pub completion_probability: f64,
    /// Heuristic risk in `[0, 1]`
    pub risk_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendation: Recommendation,
}

/// Vocabulary and trained forest for one history.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    vocabulary: Vocabulary,
    model: TrainedForest,
    fingerprint: String,
    rows: usize,
}

impl ModelSnapshot {
    /// Fit the vocabulary and train the forest on `history`.
    ///
    /// Fails with `EmptyTrainingSet` if the history is empty or holds only
    /// one outcome, and with `InvalidFeature` if a record is malformed.
    pub fn fit(history: &[TaskRecord], params: &ForestParams) -> Result<Self> {
        let labels: Vec<bool> = history.iter().map(|r| r.completed).collect();
        ensure_both_outcomes(&labels)?;

        let vocabulary = Vocabulary::fit(history.iter().map(|r| r.category.as_str()));
        let features = FeatureBuilder::new(&vocabulary).encode_all(history)?;
        let model = RandomForest::new(params.clone()).train(&features, &labels)?;
        let fingerprint = fingerprint(history);

        tracing::info!(
            rows = history.len(),
            categories = vocabulary.len(),
            trees = model.n_trees(),
            fingerprint = %&fingerprint[..12],
            "Model snapshot trained"
        );

        Ok(Self {
            vocabulary,
            model,
            fingerprint,
            rows: history.len(),
        })
    }

    /// Predict completion and score risk for a candidate.
    pub fn evaluate(&self, candidate: &TaskCandidate) -> Result<PredictionResult> {
        let features = FeatureBuilder::new(&self.vocabulary).encode(candidate)?;
        let completion_probability = self.model.predict_proba(&features);
        let completed_prediction = self.model.predict(&features);

        let assessment = risk::assess(
            candidate.priority,
            candidate.mood,
            candidate.time_spent_minutes,
        );
        let recommendation = recommend(assessment.score);

        tracing::debug!(
            category = %candidate.category,
            priority = %candidate.priority,
            mood = %candidate.mood,
            time = candidate.time_spent_minutes,
            completed_prediction,
            risk_score = assessment.score,
            "Evaluated candidate"
        );

        Ok(PredictionResult {
            completed_prediction,
            completion_probability,
            risk_score: assessment.score,
            risk_factors: assessment.factors,
            recommendation,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn model(&self) -> &TrainedForest {
        &self.model
    }

    pub fn feature_importance(&self) -> &FeatureImportance {
        self.model.feature_importance()
    }

    /// SHA-256 of the history this snapshot was trained on.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Number of training rows.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Stateless one-shot evaluation: fit a snapshot on `history` and evaluate
/// `candidate` against it.
pub fn evaluate(
    history: &[TaskRecord],
    candidate: &TaskCandidate,
    params: &ForestParams,
) -> Result<PredictionResult> {
    ModelSnapshot::fit(history, params)?.evaluate(candidate)
}

/// Evaluates candidates, reusing the last snapshot while the history is
/// unchanged.
///
/// Each service owns its snapshot; concurrent callers should each hold
/// their own service.
#[derive(Debug, Default)]
pub struct PredictionService {
    params: ForestParams,
    snapshot: Option<ModelSnapshot>,
}

impl PredictionService {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            snapshot: None,
        }
    }

    /// Evaluate `candidate` against `history`, retraining if `history`
    /// differs from the one the cached snapshot was built from.
    pub fn evaluate(
        &mut self,
        history: &[TaskRecord],
        candidate: &TaskCandidate,
    ) -> Result<PredictionResult> {
        self.snapshot_for(history)?.evaluate(candidate)
    }

    /// Snapshot for `history`, training one if needed.
    pub fn snapshot_for(&mut self, history: &[TaskRecord]) -> Result<&ModelSnapshot> {
        let current = fingerprint(history);

        // Taking the old snapshot means a failed fit leaves the cache empty.
        let snapshot = match self.snapshot.take() {
            Some(cached) if cached.fingerprint == current => {
                tracing::debug!("Reusing cached model snapshot");
                cached
            }
            _ => ModelSnapshot::fit(history, &self.params)?,
        };

        Ok(&*self.snapshot.insert(snapshot))
    }

    /// Forget the cached snapshot.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn cached(&self) -> Option<&ModelSnapshot> {
        self.snapshot.as_ref()
    }
}

/// SHA-256 over every field of every record, in order.
pub fn fingerprint(history: &[TaskRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in history {
        let date = record.date.map(|d| d.to_string()).unwrap_or_default();
        hasher.update(date.as_bytes());
        hasher.update([0x1f]);
        hasher.update(record.task.as_bytes());
        hasher.update([0x1f]);
        hasher.update(record.category.as_bytes());
        hasher.update([0x1f]);
        hasher.update(record.priority.as_str().as_bytes());
        hasher.update([0x1f]);
        hasher.update(record.mood.as_str().as_bytes());
        hasher.update([0x1f]);
        hasher.update(record.time_spent_minutes.to_bits().to_le_bytes());
        hasher.update([u8::from(record.completed), 0x1e]);
    }
    hex::encode(hasher.finalize())
}
