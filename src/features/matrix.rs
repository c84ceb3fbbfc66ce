//! Numeric design matrix
//!
//! Flattens the matchup feature table into row-major `f64` features and
//! 0/1 labels for the classifier.

use crate::data::{Table, Value};
use crate::features::columns::{Side, TEAM_NO, WINNER};
use crate::{MadnessError, Result};

/// Features and labels of every decided matchup
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    /// One row per labeled matchup; missing values are NaN
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
    /// Matchups left out because they have no winner yet
    pub unlabeled: usize,
}

impl FeatureMatrix {
    /// Build from a matchup feature table, keeping row order
    pub fn from_matchups(table: &Table) -> Result<Self> {
        let feature_names = feature_columns(table);
        let feature_idx = feature_names
            .iter()
            .map(|c| table.column_index(c))
            .collect::<Result<Vec<_>>>()?;
        let winner_idx = table.column_index(WINNER)?;

        let mut features = Vec::with_capacity(table.len());
        let mut labels = Vec::with_capacity(table.len());
        let mut unlabeled = 0;

        for (row_idx, row) in table.rows().iter().enumerate() {
            let label = match &row[winner_idx] {
                Value::Missing => {
                    unlabeled += 1;
                    continue;
                }
                Value::Number(n) if *n == 1.0 => 1,
                Value::Number(n) if *n == 0.0 => 0,
                other => {
                    return Err(MadnessError::Parse(format!(
                        "row {}: invalid {} value {:?}",
                        row_idx, WINNER, other
                    )))
                }
            };

            let values = feature_idx
                .iter()
                .zip(&feature_names)
                .map(|(&i, name)| match &row[i] {
                    Value::Missing => Ok(f64::NAN),
                    Value::Number(n) => Ok(*n),
                    Value::Text(s) => Err(MadnessError::Parse(format!(
                        "row {}: non-numeric value '{}' in feature column '{}'",
                        row_idx, s, name
                    ))),
                })
                .collect::<Result<Vec<f64>>>()?;

            features.push(values);
            labels.push(label);
        }

        log::info!(
            "Feature matrix: {} rows x {} features ({} unlabeled matchups skipped)",
            features.len(),
            feature_names.len(),
            unlabeled
        );

        Ok(FeatureMatrix {
            feature_names,
            features,
            labels,
            unlabeled,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Per-team columns of a matchup table, in table order, without the
/// team identifiers
pub fn feature_columns(table: &Table) -> Vec<String> {
    let identifiers: Vec<String> = Side::BOTH.iter().map(|s| s.feature_column(TEAM_NO)).collect();
    table
        .columns()
        .iter()
        .filter(|c| Side::BOTH.iter().any(|s| c.ends_with(s.suffix())))
        .filter(|c| !identifiers.contains(*c))
        .cloned()
        .collect()
}
