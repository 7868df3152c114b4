use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

pub const MIB: f64 = 1024.0 * 1024.0;
pub const GIB: f64 = 1024.0 * MIB;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .copied()
            .minmax_by_key(|&v| OrderedFloat(v))
            .into_option()?;
        Some(Self {
            mean,
            min,
            max,
            std: var.sqrt(),
        })
    }
}

/// Summary of each column (model) of a `formats × models` matrix.
pub fn column_summaries(m: &[Vec<f64>]) -> Vec<Summary> {
    let n_cols = m.first().map_or(0, Vec::len);
    (0..n_cols)
        .filter_map(|c| {
            let column: Vec<f64> = m.iter().filter_map(|row| row.get(c).copied()).collect();
            Summary::of(&column)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RankedCell {
    pub format: usize,
    pub model: usize,
    pub value: f64,
}

/// Every cell in ascending value order; equal values keep row-major order.
pub fn rank_cells(m: &[Vec<f64>]) -> Vec<RankedCell> {
    m.iter()
        .enumerate()
        .flat_map(|(format, row)| {
            row.iter().enumerate().map(move |(model, &value)| RankedCell {
                format,
                model,
                value,
            })
        })
        .sorted_by_key(|c| OrderedFloat(c.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_population_std() {
        let s = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.std, 2.0);
        assert_eq!((s.min, s.max), (2.0, 9.0));
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn per_column() {
        let m = vec![vec![1.0, 10.0], vec![3.0, 30.0]];
        let s = column_summaries(&m);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].mean, 2.0);
        assert_eq!(s[1].max, 30.0);
    }

    #[test]
    fn ranking_is_stable() {
        let m = vec![vec![3.0, 1.0], vec![1.0, 2.0]];
        let r = rank_cells(&m);
        let order: Vec<_> = r.iter().map(|c| (c.format, c.model)).collect();
        assert_eq!(order, vec![(0, 1), (1, 0), (1, 1), (0, 0)]);
    }
}
