//! Classifier families
//!
//! A model type tag selects a [`ClassifierKind`]; each kind builds a boxed
//! [`Classifier`]. Only the boosted-tree family is registered.

use gbdt::config::Config as BoostingConfig;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;

use crate::{MadnessError, Result};

/// Binary classifier over scaled feature rows
pub trait Classifier {
    fn name(&self) -> &'static str;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()>;

    /// Probability of the positive class (team 1 wins) per row
    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Class 1 when its probability is above one half
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }
}

/// Registered classifier families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    GradientBoosting,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 1] = [ClassifierKind::GradientBoosting];

    pub fn tag(&self) -> &'static str {
        match self {
            ClassifierKind::GradientBoosting => "xgboost",
        }
    }

    /// Look up a family by tag; unknown tags are an error, never a default
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| MadnessError::UnsupportedModel(tag.to_string()))
    }

    pub fn build(&self) -> Box<dyn Classifier> {
        match self {
            ClassifierKind::GradientBoosting => Box::new(GradientBoostedTrees::default()),
        }
    }
}

/// Boosting hyperparameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub max_depth: u32,
    pub learning_rate: f32,
}

impl Default for BoostingParams {
    fn default() -> Self {
        BoostingParams {
            n_estimators: 100,
            max_depth: 5,
            learning_rate: 0.3,
        }
    }
}

/// Gradient-boosted decision trees with a logistic objective
pub struct GradientBoostedTrees {
    params: BoostingParams,
    model: Option<GBDT>,
    n_features: usize,
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self::new(BoostingParams::default())
    }
}

impl GradientBoostedTrees {
    pub fn new(params: BoostingParams) -> Self {
        GradientBoostedTrees {
            params,
            model: None,
            n_features: 0,
        }
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    fn boosting_config(&self, n_features: usize) -> BoostingConfig {
        let mut cfg = BoostingConfig::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.params.max_depth);
        cfg.set_iterations(self.params.n_estimators);
        cfg.set_shrinkage(self.params.learning_rate);
        // Labels must be -1/+1 for this loss; predictions come back as probabilities
        cfg.set_loss("LogLikelyhood");
        cfg
    }
}

/// Convert a scaled row; missing values take the training mean (0 after scaling)
fn to_tree_input(row: &[f64]) -> Vec<ValueType> {
    row.iter()
        .map(|&v| if v.is_nan() { 0.0 } else { v as ValueType })
        .collect()
}

fn check_rows(features: &[Vec<f64>], n_features: usize) -> Result<()> {
    match features.iter().position(|row| row.len() != n_features) {
        Some(i) => Err(MadnessError::Training(format!(
            "row {} has {} features, expected {}",
            i,
            features[i].len(),
            n_features
        ))),
        None => Ok(()),
    }
}

impl Classifier for GradientBoostedTrees {
    fn name(&self) -> &'static str {
        "gradient boosted trees"
    }

    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()> {
        if features.is_empty() {
            return Err(MadnessError::Training("no training rows".into()));
        }
        if features.len() != labels.len() {
            return Err(MadnessError::Training(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let n_features = features[0].len();
        check_rows(features, n_features)?;

        let mut training_data: DataVec = features
            .iter()
            .zip(labels)
            .map(|(row, &label)| {
                let target = if label == 1 { 1.0 } else { -1.0 };
                Data::new_training_data(to_tree_input(row), 1.0, target, None)
            })
            .collect();

        log::info!(
            "Fitting {} ({} trees, depth {}) on {} rows x {} features",
            self.name(),
            self.params.n_estimators,
            self.params.max_depth,
            features.len(),
            n_features
        );

        let mut model = GBDT::new(&self.boosting_config(n_features));
        model.fit(&mut training_data);

        self.model = Some(model);
        self.n_features = n_features;
        Ok(())
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(MadnessError::NoModel)?;
        check_rows(features, self.n_features)?;

        let test_data: DataVec = features
            .iter()
            .map(|row| Data::new_test_data(to_tree_input(row), None))
            .collect();

        Ok(model
            .predict(&test_data)
            .into_iter()
            .map(f64::from)
            .collect())
    }
}
