//! Z-score feature scaling

use crate::{MadnessError, Result};

/// Per-column standardization: (x - mean) / std
///
/// NaN inputs are ignored when fitting and stay NaN when transforming.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Compute column means and population standard deviations
    pub fn fit(x: &[Vec<f64>]) -> Result<Self> {
        let dim = match x.first() {
            Some(row) => row.len(),
            None => return Err(MadnessError::Training("cannot fit scaler on zero rows".into())),
        };

        let mut sum = vec![0.0f64; dim];
        let mut sum_sq = vec![0.0f64; dim];
        let mut count = vec![0usize; dim];

        for (i, row) in x.iter().enumerate() {
            check_width(row, dim, i)?;
            for (j, &v) in row.iter().enumerate() {
                if v.is_nan() {
                    continue;
                }
                sum[j] += v;
                sum_sq[j] += v * v;
                count[j] += 1;
            }
        }

        let mean: Vec<f64> = sum
            .iter()
            .zip(&count)
            .map(|(s, &n)| if n == 0 { 0.0 } else { s / n as f64 })
            .collect();
        let std: Vec<f64> = sum_sq
            .iter()
            .zip(&count)
            .zip(&mean)
            .map(|((sq, &n), m)| {
                if n == 0 {
                    return 1.0;
                }
                let sd = (sq / n as f64 - m * m).max(0.0).sqrt();
                // Constant columns pass through centered
                if sd < 1e-12 {
                    1.0
                } else {
                    sd
                }
            })
            .collect();

        Ok(StandardScaler { mean, std })
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Scale rows with the fitted parameters
    pub fn transform(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        x.iter()
            .enumerate()
            .map(|(i, row)| {
                check_width(row, self.dim(), i)?;
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.std))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect())
            })
            .collect()
    }

    pub fn fit_transform(x: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }
}

fn check_width(row: &[f64], dim: usize, row_idx: usize) -> Result<()> {
    if row.len() != dim {
        return Err(MadnessError::Training(format!(
            "row {} has {} features, expected {}",
            row_idx,
            row.len(),
            dim
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_standardizes() {
        let x = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0], vec![4.0, 40.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();

        assert_eq!(scaler.mean, vec![2.5, 25.0]);
        for j in 0..2 {
            let col: Vec<f64> = scaled.iter().map(|r| r[j]).collect();
            let mean = col.iter().sum::<f64>() / col.len() as f64;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = vec![vec![5.0], vec![5.0], vec![5.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();
        assert_eq!(scaler.std, vec![1.0]);
        assert!(scaled.iter().all(|r| r[0] == 0.0));
    }

    #[test]
    fn test_nan_ignored_when_fitting() {
        let x = vec![vec![1.0], vec![f64::NAN], vec![3.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();
        assert_eq!(scaler.mean, vec![2.0]);
        assert_eq!(scaler.std, vec![1.0]);
        assert!(scaled[1][0].is_nan());
        assert_eq!(scaled[2][0], 1.0);
    }

    #[test]
    fn test_transform_uses_fitted_params() {
        let scaler = StandardScaler::fit(&[vec![0.0], vec![2.0]]).unwrap();
        let scaled = scaler.transform(&[vec![4.0]]).unwrap();
        assert_eq!(scaled, vec![vec![3.0]]);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::fit(&[vec![0.0, 1.0]]).unwrap();
        assert!(scaler.transform(&[vec![1.0]]).is_err());
        assert!(StandardScaler::fit(&[vec![0.0], vec![1.0, 2.0]]).is_err());
        assert!(StandardScaler::fit(&[]).is_err());
    }
}
