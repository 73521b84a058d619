//! Logistic regression baseline for model comparison.
//!
//! Features are standardized with training-set statistics, then weights
//! are fit by full-batch gradient descent on the L2-regularized log loss.

use super::classifier::{check_training_set, Classifier, Predictor};
use super::features::{Feature, FeatureVector};
use crate::error::Result;

const LEARNING_RATE: f64 = 0.1;
const TOLERANCE: f64 = 1e-6;

/// Logistic regression trainer.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Gradient descent iterations
    pub max_iter: usize,
    /// Inverse regularization strength
    pub c: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            c: 1.0,
        }
    }
}

impl LogisticRegression {
    pub fn new(max_iter: usize) -> Self {
        Self {
            max_iter,
            ..Default::default()
        }
    }
}

impl Classifier for LogisticRegression {
    type Model = TrainedLogistic;

    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn train(&self, features: &[FeatureVector], labels: &[bool]) -> Result<TrainedLogistic> {
        check_training_set(features, labels)?;

        let n = features.len() as f64;
        let mut means = [0.0; Feature::COUNT];
        let mut scales = [1.0; Feature::COUNT];

        for feature in Feature::ALL {
            let k = feature.index();
            let mean = features.iter().map(|x| x.get(feature)).sum::<f64>() / n;
            let variance = features
                .iter()
                .map(|x| (x.get(feature) - mean).powi(2))
                .sum::<f64>()
                / n;
            means[k] = mean;
            if variance > 0.0 {
                scales[k] = variance.sqrt();
            }
        }

        let rows: Vec<[f64; Feature::COUNT]> = features
            .iter()
            .map(|x| standardize(x, &means, &scales))
            .collect();

        let lambda = 1.0 / (self.c * n);
        let mut weights = [0.0; Feature::COUNT];
        let mut bias = 0.0;
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;
            let mut grad_w = [0.0; Feature::COUNT];
            let mut grad_b = 0.0;

            for (row, &label) in rows.iter().zip(labels) {
                let error = sigmoid(dot(&weights, row) + bias) - if label { 1.0 } else { 0.0 };
                for k in 0..Feature::COUNT {
                    grad_w[k] += error * row[k];
                }
                grad_b += error;
            }

            let mut step = 0.0f64;
            for k in 0..Feature::COUNT {
                let g = grad_w[k] / n + lambda * weights[k];
                weights[k] -= LEARNING_RATE * g;
                step = step.max(g.abs());
            }
            let g_b = grad_b / n;
            bias -= LEARNING_RATE * g_b;
            step = step.max(g_b.abs());

            if step < TOLERANCE {
                break;
            }
        }

        tracing::debug!(iterations, rows = features.len(), "Trained logistic regression");

        Ok(TrainedLogistic {
            means,
            scales,
            weights,
            bias,
        })
    }
}

/// A fitted logistic model.
#[derive(Debug, Clone)]
pub struct TrainedLogistic {
    means: [f64; Feature::COUNT],
    scales: [f64; Feature::COUNT],
    weights: [f64; Feature::COUNT],
    bias: f64,
}

impl TrainedLogistic {
    /// Weight of a feature in standardized units.
    pub fn coefficient(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }
}

impl Predictor for TrainedLogistic {
    fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let row = standardize(features, &self.means, &self.scales);
        sigmoid(dot(&self.weights, &row) + self.bias)
    }
}

fn standardize(
    x: &FeatureVector,
    means: &[f64; Feature::COUNT],
    scales: &[f64; Feature::COUNT],
) -> [f64; Feature::COUNT] {
    Feature::ALL.map(|f| (x.get(f) - means[f.index()]) / scales[f.index()])
}

fn dot(a: &[f64; Feature::COUNT], b: &[f64; Feature::COUNT]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn stressed_fails() -> (Vec<FeatureVector>, Vec<bool>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30u32 {
            let mood = i % 4;
            features.push(FeatureVector::build(30.0 + f64::from(i), 0, i % 3, mood));
            labels.push(mood < 2);
        }
        (features, labels)
    }

    #[test]
    fn test_learns_mood_signal() {
        let (features, labels) = stressed_fails();
        let model = LogisticRegression::default()
            .train(&features, &labels)
            .unwrap();

        assert!(model.predict(&FeatureVector::build(40.0, 0, 1, 0)));
        assert!(!model.predict(&FeatureVector::build(40.0, 0, 1, 3)));
        assert!(model.coefficient(Feature::Mood) < 0.0);
    }

    #[test]
    fn test_probabilities_bounded() {
        let (features, labels) = stressed_fails();
        let model = LogisticRegression::new(50).train(&features, &labels).unwrap();
        for x in &features {
            let p = model.predict_proba(x);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_constant_feature_does_not_divide_by_zero() {
        let (features, labels) = stressed_fails();
        let model = LogisticRegression::default()
            .train(&features, &labels)
            .unwrap();
        assert!(model.predict_proba(&features[0]).is_finite());
    }

    #[test]
    fn test_single_class_rejected() {
        let (features, _) = stressed_fails();
        let labels = vec![false; features.len()];
        let err = LogisticRegression::default()
            .train(&features, &labels)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTrainingSet { .. }));
    }
}
