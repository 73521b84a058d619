//! Held-out evaluation and model comparison.
//!
//! Splits the history with a seeded shuffle, trains the random forest and
//! the logistic baseline on the training part, and scores both on the rest.

use super::classifier::{Classifier, Predictor};
use super::encoder::Vocabulary;
use super::features::{FeatureBuilder, FeatureVector};
use super::forest::{ForestParams, RandomForest};
use super::logistic::LogisticRegression;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::types::TaskRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

/// Row indices of a train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_size)` rows.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::Config(format!(
            "test size must be between 0 and 1, got {}",
            test_size
        )));
    }

    let test_len = (n as f64 * test_size).ceil() as usize;
    if test_len == 0 || test_len >= n {
        return Err(Error::InvalidFeature(format!(
            "cannot split {} row(s) with test size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = indices.split_off(test_len);

    Ok(Split {
        train,
        test: indices,
    })
}

/// Fraction of predictions matching the truth.
pub fn accuracy(truth: &[bool], predicted: &[bool]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / truth.len() as f64
}

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics with macro and weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Metrics for "not completed" (label 0)
    pub not_completed: ClassMetrics,
    /// Metrics for "completed" (label 1)
    pub completed: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Build a report. Ratios with a zero denominator are reported as 0.
    pub fn new(truth: &[bool], predicted: &[bool]) -> Self {
        let not_completed = class_metrics(truth, predicted, false);
        let completed = class_metrics(truth, predicted, true);
        let total = not_completed.support + completed.support;

        let macro_avg = ClassMetrics {
            precision: (not_completed.precision + completed.precision) / 2.0,
            recall: (not_completed.recall + completed.recall) / 2.0,
            f1: (not_completed.f1 + completed.f1) / 2.0,
            support: total,
        };

        let weigh = |a: f64, b: f64| {
            ratio(
                a * not_completed.support as f64 + b * completed.support as f64,
                total as f64,
            )
        };
        let weighted_avg = ClassMetrics {
            precision: weigh(not_completed.precision, completed.precision),
            recall: weigh(not_completed.recall, completed.recall),
            f1: weigh(not_completed.f1, completed.f1),
            support: total,
        };

        Self {
            not_completed,
            completed,
            accuracy: accuracy(truth, predicted),
            macro_avg,
            weighted_avg,
        }
    }

    /// Render in the familiar tabular layout.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{:>14} {:>9} {:>9} {:>9} {:>9}\n\n",
            "", "precision", "recall", "f1-score", "support"
        );
        for (label, m) in [("0", &self.not_completed), ("1", &self.completed)] {
            out.push_str(&row(label, m));
        }
        out.push('\n');
        out.push_str(&format!(
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}\n",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        ));
        out.push_str(&row("macro avg", &self.macro_avg));
        out.push_str(&row("weighted avg", &self.weighted_avg));
        out
    }
}

fn row(label: &str, m: &ClassMetrics) -> String {
    format!(
        "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        label, m.precision, m.recall, m.f1, m.support
    )
}

fn class_metrics(truth: &[bool], predicted: &[bool], class: bool) -> ClassMetrics {
    let mut true_positive = 0usize;
    let mut false_positive = 0usize;
    let mut false_negative = 0usize;
    for (&t, &p) in truth.iter().zip(predicted) {
        match (t == class, p == class) {
            (true, true) => true_positive += 1,
            (false, true) => false_positive += 1,
            (true, false) => false_negative += 1,
            (false, false) => {}
        }
    }

    let precision = ratio(true_positive as f64, (true_positive + false_positive) as f64);
    let recall = ratio(true_positive as f64, (true_positive + false_negative) as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    ClassMetrics {
        precision,
        recall,
        f1,
        support: true_positive + false_negative,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Held-out score of one classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ModelScore {
    pub model: String,
    pub accuracy: f64,
    pub report: ClassificationReport,
}

/// Random forest vs logistic regression on the same split.
#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    pub train_rows: usize,
    pub test_rows: usize,
    pub scores: Vec<ModelScore>,
}

impl ModelComparison {
    /// Score with the highest held-out accuracy (first wins ties).
    pub fn best(&self) -> Option<&ModelScore> {
        self.scores
            .iter()
            .reduce(|best, s| if s.accuracy > best.accuracy { s } else { best })
    }
}

/// Split `records`, train both models on the training part and score them
/// on the held-out part.
///
/// Categories are coded from the full record set so every test row encodes.
pub fn compare_models(records: &[TaskRecord], config: &ModelConfig) -> Result<ModelComparison> {
    config.validate()?;

    let vocabulary = Vocabulary::fit(records.iter().map(|r| r.category.as_str()));
    let features = FeatureBuilder::new(&vocabulary).encode_all(records)?;
    let labels: Vec<bool> = records.iter().map(|r| r.completed).collect();

    let split = train_test_split(records.len(), config.test_size, config.seed)?;
    let (train_x, train_y) = select(&features, &labels, &split.train);
    let (test_x, test_y) = select(&features, &labels, &split.test);

    let forest = RandomForest::new(ForestParams::from(config));
    let logistic = LogisticRegression::new(config.logistic_max_iter);

    let scores = vec![
        score_classifier(&logistic, &train_x, &train_y, &test_x, &test_y)?,
        score_classifier(&forest, &train_x, &train_y, &test_x, &test_y)?,
    ];

    for s in &scores {
        tracing::info!(model = %s.model, accuracy = s.accuracy, "Held-out accuracy");
    }

    Ok(ModelComparison {
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        scores,
    })
}

fn score_classifier<C: Classifier>(
    classifier: &C,
    train_x: &[FeatureVector],
    train_y: &[bool],
    test_x: &[FeatureVector],
    test_y: &[bool],
) -> Result<ModelScore> {
    let model = classifier.train(train_x, train_y)?;
    let predicted: Vec<bool> = test_x.iter().map(|x| model.predict(x)).collect();
    let report = ClassificationReport::new(test_y, &predicted);

    Ok(ModelScore {
        model: classifier.name().to_string(),
        accuracy: report.accuracy,
        report,
    })
}

fn select(
    features: &[FeatureVector],
    labels: &[bool],
    indices: &[usize],
) -> (Vec<FeatureVector>, Vec<bool>) {
    indices.iter().map(|&i| (features[i], labels[i])).unzip()
}
