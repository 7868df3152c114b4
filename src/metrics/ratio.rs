use tracing::warn;

use crate::error::{Error, Result};

/// Rows are formats, columns are models.
pub type Matrix = Vec<Vec<f64>>;

/// Element-wise quotients; `None` where the denominator was zero.
pub type RatioMatrix = Vec<Vec<Option<f64>>>;

fn shape(m: &[Vec<f64>]) -> (usize, usize) {
    (m.len(), m.first().map_or(0, Vec::len))
}

/// `numerator / denominator` cell by cell. Both sides must have the same
/// shape; a zero denominator yields `None` instead of `inf`/`NaN`.
pub fn ratio_table(numerator: &[Vec<f64>], denominator: &[Vec<f64>]) -> Result<RatioMatrix> {
    let (left, right) = (shape(numerator), shape(denominator));
    let ragged = numerator.iter().any(|r| r.len() != left.1)
        || denominator.iter().any(|r| r.len() != right.1);
    if left != right || ragged {
        return Err(Error::ShapeMismatch { left, right });
    }

    Ok(numerator
        .iter()
        .zip(denominator)
        .map(|(num, den)| {
            num.iter()
                .zip(den)
                .map(|(&n, &d)| if d == 0.0 { None } else { Some(n / d) })
                .collect()
        })
        .collect())
}

/// Geometric mean of strictly positive values, computed in log space.
pub fn geometric_mean(values: &[f64]) -> Result<f64> {
    row_geomean(0, values.iter().map(|&v| Some(v)))
}

fn row_geomean<I>(row: usize, values: I) -> Result<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut log_sum = 0.0;
    let mut n = 0usize;
    for (column, value) in values.into_iter().enumerate() {
        match value {
            Some(v) if v > 0.0 && v.is_finite() => {
                log_sum += v.ln();
                n += 1;
            }
            other => {
                return Err(Error::DegenerateRatio {
                    row,
                    column,
                    value: other.unwrap_or(f64::NAN),
                })
            }
        }
    }
    if n == 0 {
        return Err(Error::EmptySeries { row });
    }
    Ok((log_sum / n as f64).exp())
}

/// One geometric mean per row. Any undefined or non-positive ratio fails the
/// whole computation.
pub fn row_geometric_means(ratios: &RatioMatrix) -> Result<Vec<f64>> {
    ratios
        .iter()
        .enumerate()
        .map(|(row, values)| {
            row_geomean(row, values.iter().copied()).map_err(|e| {
                warn!(row, "geometric mean rejected: {e}");
                e
            })
        })
        .collect()
}

/// Resolve every ratio and append the row geometric mean as a last column.
pub fn with_geomean_column(ratios: &RatioMatrix) -> Result<Matrix> {
    let means = row_geometric_means(ratios)?;
    Ok(ratios
        .iter()
        .zip(means)
        .map(|(row, mean)| {
            row.iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .chain(std::iter::once(mean))
                .collect()
        })
        .collect())
}

/// Copy of `m` with every cell multiplied by `factor`.
pub fn scale(m: &[Vec<f64>], factor: f64) -> Matrix {
    m.iter()
        .map(|row| row.iter().map(|v| v * factor).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geomean_of_powers_of_two() {
        let g = geometric_mean(&[2.0, 4.0, 8.0]).unwrap();
        assert!((g - 4.0).abs() < 1e-12);
    }

    #[test]
    fn geomean_rejects_non_positive() {
        assert!(matches!(
            geometric_mean(&[2.0, 0.0, 8.0]),
            Err(Error::DegenerateRatio { row: 0, column: 1, .. })
        ));
        assert!(geometric_mean(&[-1.0]).is_err());
        assert!(matches!(geometric_mean(&[]), Err(Error::EmptySeries { row: 0 })));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        let r = ratio_table(&[vec![1.0, 0.0]], &[vec![0.0, 5.0]]).unwrap();
        assert_eq!(r, vec![vec![None, Some(0.0)]]);
    }

    #[test]
    fn shape_must_match() {
        assert!(matches!(
            ratio_table(&[vec![1.0, 2.0]], &[vec![1.0], vec![2.0]]),
            Err(Error::ShapeMismatch { left: (1, 2), right: (2, 1) })
        ));
        assert!(ratio_table(&[vec![1.0, 2.0], vec![1.0]], &[vec![1.0, 2.0], vec![1.0, 3.0]]).is_err());
    }

    #[test]
    fn geomean_column_appended() {
        let r = ratio_table(&[vec![2.0, 8.0], vec![3.0, 3.0]], &[vec![1.0, 1.0], vec![1.0, 3.0]])
            .unwrap();
        let m = with_geomean_column(&r).unwrap();
        assert_eq!(m[0].len(), 3);
        assert!((m[0][2] - 4.0).abs() < 1e-12);
        assert!((m[1][2] - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn undefined_ratio_names_its_cell() {
        let r = ratio_table(&[vec![1.0, 1.0], vec![1.0, 1.0]], &[vec![1.0, 1.0], vec![1.0, 0.0]])
            .unwrap();
        assert!(matches!(
            row_geometric_means(&r),
            Err(Error::DegenerateRatio { row: 1, column: 1, .. })
        ));
    }

    #[test]
    fn scaling() {
        assert_eq!(scale(&[vec![1024.0, 2048.0]], 1.0 / 1024.0), vec![vec![1.0, 2.0]]);
    }
}
