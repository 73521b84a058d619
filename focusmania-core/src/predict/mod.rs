//! Task completion prediction
//!
//! ## Pipeline
//!
//! ```text
//! history ──► Vocabulary::fit ──► FeatureBuilder ──► RandomForest::train ─┐
//!                   │                                                     ▼
//! candidate ────────┴──────────► FeatureBuilder ──────────────► TrainedForest::predict
//!     │
//!     └──► risk::assess ──► recommend
//! ```
//!
//! The category vocabulary is learned from history; priority and mood use
//! fixed codes. The risk score never looks at the classifier output.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use focusmania_core::predict::{evaluate, ForestParams};
//! use focusmania_core::{Mood, Priority, TaskCandidate};
//!
//! let candidate = TaskCandidate::new("Work", Priority::High, Mood::Stressed, 150.0);
//! let result = evaluate(&history, &candidate, &ForestParams::default())?;
//! println!("{} (risk {:.2})", result.recommendation, result.risk_score);
//! ```

pub mod classifier;
pub mod encoder;
pub mod evaluation;
pub mod features;
pub mod forest;
pub mod logistic;
pub mod recommend;
pub mod risk;
pub mod service;

pub use classifier::{ensure_both_outcomes, Classifier, Predictor};
pub use encoder::Vocabulary;
pub use evaluation::{
    accuracy, compare_models, train_test_split, ClassMetrics, ClassificationReport,
    ModelComparison, ModelScore, Split,
};
pub use features::{Feature, FeatureBuilder, FeatureVector};
pub use forest::{FeatureImportance, ForestParams, RandomForest, TrainedForest};
pub use logistic::{LogisticRegression, TrainedLogistic};
pub use recommend::{recommend, Recommendation};
pub use risk::{RiskAssessment, RiskFactor};
pub use service::{evaluate, fingerprint, ModelSnapshot, PredictionResult, PredictionService};
