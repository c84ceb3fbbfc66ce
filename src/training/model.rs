//! Matchup model: scaler + classifier
//!
//! Starts untrained; `train` fits the scaler and the classifier selected by
//! the model type tag. Training again refits in place.

use crate::training::classifier::{Classifier, ClassifierKind};
use crate::training::metrics::{self, Evaluation};
use crate::training::scaler::StandardScaler;
use crate::training::split::{split_data, SplitData};
use crate::{MadnessError, Result, TrainingConfig};

enum ModelState {
    Untrained,
    Trained {
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
    },
}

/// Win-probability model for bracket matchups.
///
/// Holds mutable fitted state; share it across threads only behind a lock.
pub struct MatchupModel {
    model_type: String,
    state: ModelState,
}

impl Default for MatchupModel {
    fn default() -> Self {
        Self::new(ClassifierKind::GradientBoosting.tag())
    }
}

impl MatchupModel {
    pub fn new(model_type: impl Into<String>) -> Self {
        MatchupModel {
            model_type: model_type.into(),
            state: ModelState::Untrained,
        }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.model_type.clone())
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ModelState::Trained { .. })
    }

    /// Train/test split; see [`split_data`]
    pub fn split_data(
        &self,
        x: &[Vec<f64>],
        y: &[u8],
        test_size: f64,
        temporal: bool,
        seed: Option<u64>,
    ) -> Result<SplitData> {
        split_data(x, y, test_size, temporal, seed)
    }

    /// Fit the scaler on `x_train`, then the classifier on the scaled rows.
    ///
    /// An unknown model type fails with `UnsupportedModel` and leaves the
    /// model as it was.
    pub fn train(&mut self, x_train: &[Vec<f64>], y_train: &[u8]) -> Result<()> {
        let kind = ClassifierKind::from_tag(&self.model_type)?;

        let (scaler, x_scaled) = StandardScaler::fit_transform(x_train)?;
        let mut classifier = kind.build();
        classifier.fit(&x_scaled, y_train)?;

        log::info!(
            "Trained {} on {} rows",
            classifier.name(),
            x_train.len()
        );
        self.state = ModelState::Trained { scaler, classifier };
        Ok(())
    }

    /// Positive-class probabilities using the fitted scaler
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        match &self.state {
            ModelState::Untrained => Err(MadnessError::NoModel),
            ModelState::Trained { scaler, classifier } => {
                classifier.predict_proba(&scaler.transform(x)?)
            }
        }
    }

    /// Accuracy and ROC AUC on held-out rows
    pub fn evaluate(&self, x_test: &[Vec<f64>], y_test: &[u8]) -> Result<Evaluation> {
        let (scaler, classifier) = match &self.state {
            ModelState::Untrained => return Err(MadnessError::NoModel),
            ModelState::Trained { scaler, classifier } => (scaler, classifier),
        };

        let x_scaled = scaler.transform(x_test)?;
        let preds = classifier.predict(&x_scaled)?;
        let proba = classifier.predict_proba(&x_scaled)?;

        let evaluation = Evaluation {
            accuracy: metrics::accuracy(y_test, &preds)?,
            auc: metrics::roc_auc(y_test, &proba)?,
            samples: y_test.len(),
        };
        log::info!("Evaluation: {}", evaluation);
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two noisy features that favour team 1 when the first is larger
    fn matchups(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let x: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let em_1 = ((i * 37) % 29) as f64;
                let em_2 = ((i * 17) % 31) as f64;
                vec![em_1 * 1.5 + 100.0, em_2 * 1.5 + 100.0, (i % 3) as f64]
            })
            .collect();
        let y = x.iter().map(|r| u8::from(r[0] > r[1])).collect();
        (x, y)
    }

    #[test]
    fn test_evaluate_before_train() {
        let model = MatchupModel::default();
        assert!(!model.is_trained());
        assert!(matches!(
            model.evaluate(&[vec![1.0]], &[1]),
            Err(MadnessError::NoModel)
        ));
        assert!(matches!(
            model.predict_proba(&[vec![1.0]]),
            Err(MadnessError::NoModel)
        ));
    }

    #[test]
    fn test_unknown_model_type() {
        let (x, y) = matchups(20);
        let mut model = MatchupModel::new("unknown");

        match model.train(&x, &y) {
            Err(MadnessError::UnsupportedModel(tag)) => assert_eq!(tag, "unknown"),
            other => panic!("expected UnsupportedModel, got {:?}", other.err()),
        }
        assert!(!model.is_trained());
        assert!(matches!(model.evaluate(&x, &y), Err(MadnessError::NoModel)));
    }

    #[test]
    fn test_train_and_evaluate() {
        let (x, y) = matchups(200);
        let mut model = MatchupModel::default();
        let split = model.split_data(&x, &y, 0.2, true, None).unwrap();

        model.train(&split.x_train, &split.y_train).unwrap();
        assert!(model.is_trained());

        let eval = model.evaluate(&split.x_test, &split.y_test).unwrap();
        assert_eq!(eval.samples, 40);
        assert!(eval.accuracy > 0.65, "accuracy {}", eval.accuracy);
        assert!(eval.auc > 0.65, "auc {}", eval.auc);
    }

    #[test]
    fn test_retrain_refits_in_place() {
        let (x, y) = matchups(120);
        let mut model = MatchupModel::default();
        model.train(&x[..60], &y[..60]).unwrap();
        let first = model.predict_proba(&x[60..]).unwrap();

        model.train(&x, &y).unwrap();
        let second = model.predict_proba(&x[60..]).unwrap();

        assert!(model.is_trained());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_evaluate_width_mismatch() {
        let (x, y) = matchups(40);
        let mut model = MatchupModel::default();
        model.train(&x, &y).unwrap();
        assert!(model.evaluate(&[vec![1.0, 2.0]], &[1]).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = TrainingConfig {
            model_type: "lightgbm".to_string(),
            ..TrainingConfig::default()
        };
        let model = MatchupModel::from_config(&config);
        assert_eq!(model.model_type(), "lightgbm");
    }
}
