//! Model training
//!
//! Splitting, feature scaling, the classifier families and evaluation.

pub mod classifier;
pub mod metrics;
pub mod model;
pub mod scaler;
pub mod split;

pub use classifier::{BoostingParams, Classifier, ClassifierKind, GradientBoostedTrees};
pub use metrics::Evaluation;
pub use model::MatchupModel;
pub use scaler::StandardScaler;
pub use split::{split_data, SplitData};
