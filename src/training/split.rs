//! Train/test splitting

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{MadnessError, Result};

/// Train and test partitions of a feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SplitData {
    pub x_train: Vec<Vec<f64>>,
    pub x_test: Vec<Vec<f64>>,
    pub y_train: Vec<u8>,
    pub y_test: Vec<u8>,
}

/// Split features and labels into train and test sets.
///
/// Temporal splits cut by position: the first `floor(n * (1 - test_size))`
/// rows train, the rest test. Rows must already be in chronological order.
/// Random splits shuffle (seeded when `seed` is set) and hold out
/// `ceil(n * test_size)` rows.
pub fn split_data(
    x: &[Vec<f64>],
    y: &[u8],
    test_size: f64,
    temporal: bool,
    seed: Option<u64>,
) -> Result<SplitData> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MadnessError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    if x.len() != y.len() {
        return Err(MadnessError::InvalidSplit(format!(
            "{} feature rows but {} labels",
            x.len(),
            y.len()
        )));
    }

    let n = x.len();
    let (train_idx, test_idx): (Vec<usize>, Vec<usize>) = if temporal {
        let split_idx = (n as f64 * (1.0 - test_size)) as usize;
        ((0..split_idx).collect(), (split_idx..n).collect())
    } else {
        let n_test = (n as f64 * test_size).ceil() as usize;
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        indices.shuffle(&mut rng);
        let train = indices.split_off(n_test.min(n));
        (train, indices)
    };

    log::info!(
        "Split {} rows ({}): train={}, test={}",
        n,
        if temporal { "temporal" } else { "random" },
        train_idx.len(),
        test_idx.len()
    );

    Ok(SplitData {
        x_train: train_idx.iter().map(|&i| x[i].clone()).collect(),
        x_test: test_idx.iter().map(|&i| x[i].clone()).collect(),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let x = (0..n).map(|i| vec![i as f64]).collect();
        let y = (0..n).map(|i| (i % 2) as u8).collect();
        (x, y)
    }

    #[test]
    fn test_temporal_split_keeps_order() {
        let (x, y) = rows(10);
        let split = split_data(&x, &y, 0.2, true, None).unwrap();

        assert_eq!(split.x_train.len(), 8);
        assert_eq!(split.x_test, vec![vec![8.0], vec![9.0]]);
        assert_eq!(split.y_test, vec![0, 1]);
        assert_eq!(split.x_train[0], vec![0.0]);
        assert_eq!(split.x_train[7], vec![7.0]);
    }

    #[test]
    fn test_temporal_split_floors_train_size() {
        let (x, y) = rows(7);
        let split = split_data(&x, &y, 0.25, true, None).unwrap();
        // floor(7 * 0.75) = 5
        assert_eq!(split.x_train.len(), 5);
        assert_eq!(split.x_test.len(), 2);
    }

    #[test]
    fn test_random_split_is_a_partition() {
        let (x, y) = rows(11);
        let split = split_data(&x, &y, 0.2, false, Some(42)).unwrap();

        // ceil(11 * 0.2) = 3
        assert_eq!(split.x_test.len(), 3);
        assert_eq!(split.x_train.len(), 8);

        let mut seen: Vec<f64> = split
            .x_train
            .iter()
            .chain(&split.x_test)
            .map(|r| r[0])
            .collect();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, (0..11).map(|i| i as f64).collect::<Vec<_>>());

        // Labels travel with their rows
        for (row, label) in split.x_test.iter().zip(&split.y_test) {
            assert_eq!((row[0] as usize % 2) as u8, *label);
        }
    }

    #[test]
    fn test_seeded_random_split_repeats() {
        let (x, y) = rows(50);
        let a = split_data(&x, &y, 0.3, false, Some(7)).unwrap();
        let b = split_data(&x, &y, 0.3, false, Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_test_size() {
        let (x, y) = rows(4);
        for bad in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                split_data(&x, &y, bad, true, None),
                Err(MadnessError::InvalidSplit(_))
            ));
        }
    }

    #[test]
    fn test_length_mismatch() {
        let (x, _) = rows(4);
        assert!(split_data(&x, &[1, 0], 0.5, true, None).is_err());
    }
}
