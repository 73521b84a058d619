//! Random forest classifier.
//!
//! Bagged CART trees with Gini impurity. Each tree is grown on a bootstrap
//! sample of the training rows and considers a random subset of
//! `max_features` features at every split. Predictions average the
//! completed-ratio of the leaf each tree lands in.
//!
//! All randomness flows from one seeded [`StdRng`], so training twice on the
//! same rows with the same parameters yields the same forest.

use super::classifier::{check_training_set, Classifier, Predictor};
use super::features::{Feature, FeatureVector};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Growth parameters for the forest.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: usize,
}

impl ForestParams {
    /// Reject parameters that cannot grow a usable forest.
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(Error::Config("forest needs at least one tree".to_string()));
        }
        if self.max_features == 0 {
            return Err(Error::Config(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(Error::Config(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::Config(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for ForestParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            n_estimators: config.n_estimators,
            seed: config.seed,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: ((Feature::COUNT as f64).sqrt() as usize).max(1),
        }
    }
}

/// Random forest trainer.
#[derive(Debug, Clone, Default)]
pub struct RandomForest {
    params: ForestParams,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }
}

impl Classifier for RandomForest {
    type Model = TrainedForest;

    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn train(&self, features: &[FeatureVector], labels: &[bool]) -> Result<TrainedForest> {
        self.params.validate()?;
        check_training_set(features, labels)?;

        let params = &self.params;
        let mut master = StdRng::seed_from_u64(params.seed);
        let rows = features.len();

        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut importance_sum = [0.0; Feature::COUNT];

        for _ in 0..params.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.gen());
            let samples: Vec<usize> = (0..rows).map(|_| rng.gen_range(0..rows)).collect();

            let mut builder = TreeBuilder {
                features,
                labels,
                params,
                rng,
                nodes: Vec::new(),
                impurity_decrease: [0.0; Feature::COUNT],
                depth: 0,
            };
            builder.grow(samples);

            let total: f64 = builder.impurity_decrease.iter().sum();
            if total > 0.0 {
                for (sum, decrease) in importance_sum.iter_mut().zip(builder.impurity_decrease) {
                    *sum += decrease / total;
                }
            }

            trees.push(DecisionTree {
                nodes: builder.nodes,
                depth: builder.depth,
            });
        }

        let importance = FeatureImportance::normalized(importance_sum);

        tracing::debug!(
            trees = trees.len(),
            rows,
            max_depth = trees.iter().map(|t| t.depth).max().unwrap_or(0),
            "Trained random forest"
        );

        Ok(TrainedForest { trees, importance })
    }
}

// ============================================
// Trained model
// ============================================

/// A fitted forest.
#[derive(Debug, Clone)]
pub struct TrainedForest {
    trees: Vec<DecisionTree>,
    importance: FeatureImportance,
}

impl TrainedForest {
    /// Mean decrease in impurity per feature, summing to 1.0.
    pub fn feature_importance(&self) -> &FeatureImportance {
        &self.importance
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Depth of the deepest tree (a lone leaf has depth 0).
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(|t| t.depth).max().unwrap_or(0)
    }
}

impl Predictor for TrainedForest {
    fn predict_proba(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(features)).sum();
        sum / self.trees.len() as f64
    }
}

/// Per-feature weights, non-negative and summing to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    weights: [f64; Feature::COUNT],
}

impl FeatureImportance {
    /// Normalize raw weights. All-zero input (no tree ever split) becomes
    /// a uniform distribution.
    fn normalized(raw: [f64; Feature::COUNT]) -> Self {
        let total: f64 = raw.iter().sum();
        let weights = if total > 0.0 {
            raw.map(|w| w / total)
        } else {
            [1.0 / Feature::COUNT as f64; Feature::COUNT]
        };
        Self { weights }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }

    /// Weights in canonical feature order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Weights sorted from most to least important.
    pub fn ranked(&self) -> Vec<(Feature, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Feature::COUNT))?;
        for (feature, weight) in self.iter() {
            map.serialize_entry(feature.name(), &weight)?;
        }
        map.end()
    }
}

// ============================================
// Trees
// ============================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        completed_ratio: f64,
    },
    Split {
        feature: Feature,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
    depth: usize,
}

impl DecisionTree {
    fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { completed_ratio } => return completed_ratio,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features.get(feature) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Gini impurity of a node with `positives` completed rows out of `n`.
fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

struct SplitCandidate {
    feature: Feature,
    threshold: f64,
    /// Sample-weighted impurity of both children
    child_impurity: f64,
}

struct TreeBuilder<'a> {
    features: &'a [FeatureVector],
    labels: &'a [bool],
    params: &'a ForestParams,
    rng: StdRng,
    nodes: Vec<Node>,
    impurity_decrease: [f64; Feature::COUNT],
    depth: usize,
}

impl TreeBuilder<'_> {
    /// Grow a tree over `samples`, depth-first from an explicit stack so
    /// deep trees don't recurse. The root is node 0.
    fn grow(&mut self, samples: Vec<usize>) {
        let root = self.push_placeholder();
        let mut pending = vec![(root, samples, 0usize)];

        while let Some((index, samples, depth)) = pending.pop() {
            self.depth = self.depth.max(depth);

            let n = samples.len();
            let positives = samples.iter().filter(|&&i| self.labels[i]).count();
            let impurity = gini(positives, n);

            let splittable = n >= self.params.min_samples_split
                && impurity > 0.0
                && self.params.max_depth.map_or(true, |max| depth < max);
            let split = if splittable {
                self.best_split(&samples)
            } else {
                None
            };

            let Some(split) = split else {
                self.nodes[index] = Node::Leaf {
                    completed_ratio: if n == 0 {
                        0.0
                    } else {
                        positives as f64 / n as f64
                    },
                };
                continue;
            };

            self.impurity_decrease[split.feature.index()] +=
                n as f64 * impurity - split.child_impurity;

            let (left, right): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .partition(|&&i| self.features[i].get(split.feature) <= split.threshold);

            let left_index = self.push_placeholder();
            let right_index = self.push_placeholder();
            self.nodes[index] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: left_index,
                right: right_index,
            };

            // Left is popped first, matching a recursive pre-order walk.
            pending.push((right_index, right, depth + 1));
            pending.push((left_index, left, depth + 1));
        }
    }

    fn push_placeholder(&mut self) -> usize {
        self.nodes.push(Node::Leaf {
            completed_ratio: 0.0,
        });
        self.nodes.len() - 1
    }

    /// Best Gini split over up to `max_features` non-constant features,
    /// drawn in random order.
    fn best_split(&mut self, samples: &[usize]) -> Option<SplitCandidate> {
        let mut order = Feature::ALL;
        order.shuffle(&mut self.rng);

        let min_leaf = self.params.min_samples_leaf;
        let n = samples.len();
        let total_positives = samples.iter().filter(|&&i| self.labels[i]).count();

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0;

        for feature in order {
            if visited >= self.params.max_features {
                break;
            }

            let mut values: Vec<(f64, bool)> = samples
                .iter()
                .map(|&i| (self.features[i].get(feature), self.labels[i]))
                .collect();
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Constant features don't count toward max_features.
            if values[0].0 == values[n - 1].0 {
                continue;
            }
            visited += 1;

            let mut left_n = 0;
            let mut left_positives = 0;
            for pair in values.windows(2) {
                let (value, label) = pair[0];
                let next = pair[1].0;
                left_n += 1;
                if label {
                    left_positives += 1;
                }

                if value == next {
                    continue;
                }
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let child_impurity = left_n as f64 * gini(left_positives, left_n)
                    + right_n as f64 * gini(total_positives - left_positives, right_n);

                if best
                    .as_ref()
                    .map_or(true, |b| child_impurity < b.child_impurity)
                {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        child_impurity,
                    });
                }
            }
        }

        best
    }
}
