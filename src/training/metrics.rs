//! Evaluation metrics

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::{MadnessError, Result};

/// Held-out performance of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Fraction of correct class predictions
    pub accuracy: f64,
    /// Area under the ROC curve of the positive-class probabilities
    pub auc: f64,
    /// Number of evaluated matchups
    pub samples: usize,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc: {:.2}% | AUC: {:.4} | n={}",
            self.accuracy * 100.0,
            self.auc,
            self.samples
        )
    }
}

/// Fraction of predictions equal to the labels
pub fn accuracy(labels: &[u8], predictions: &[u8]) -> Result<f64> {
    check_lengths(labels.len(), predictions.len())?;
    let correct = labels
        .iter()
        .zip(predictions)
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// ROC AUC via the rank-sum statistic; tied scores share their average rank.
///
/// Undefined when only one class is present.
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> Result<f64> {
    check_lengths(labels.len(), scores.len())?;

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MadnessError::Metric(
            "ROC AUC needs both classes in the labels".into(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0f64; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1 ..= end
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
        start = end;
    }

    let pos_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(l, _)| **l == 1)
        .map(|(_, r)| r)
        .sum();
    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

fn check_lengths(labels: usize, other: usize) -> Result<()> {
    if labels == 0 {
        return Err(MadnessError::Metric("no samples to evaluate".into()));
    }
    if labels != other {
        return Err(MadnessError::Metric(format!(
            "{} labels but {} predictions",
            labels, other
        )));
    }
    Ok(())
}
