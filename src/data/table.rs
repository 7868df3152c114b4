use std::ops::Range;

use tracing::info;

use crate::data::index::LabelIndex;
use crate::data::record::{Record, Sample};
use crate::error::{Axis, Error, Result};
use crate::metrics::Matrix;

/// Dense `format × model` table of samples, built once and never mutated.
#[derive(Clone, Debug)]
pub struct BenchmarkTable<S> {
    formats: LabelIndex,
    models: LabelIndex,
    /// Row-major, `formats.len() * models.len()` cells.
    cells: Vec<S>,
}

impl<S: Sample> BenchmarkTable<S> {
    /// Build with first-seen axis order.
    pub fn from_records(records: &[Record<S>]) -> Result<Self> {
        Self::with_axes(
            records,
            LabelIndex::new(Axis::Format),
            LabelIndex::new(Axis::Model),
        )
    }

    /// Build onto the given axes. Fixed axes reject labels they do not
    /// contain. Every `(format, model)` pair must be recorded exactly once.
    pub fn with_axes(
        records: &[Record<S>],
        mut formats: LabelIndex,
        mut models: LabelIndex,
    ) -> Result<Self> {
        let mut placed = Vec::with_capacity(records.len());
        for rec in records {
            let f = formats.insert(&rec.format).map_err(|e| at_line(e, rec.line))?;
            let m = models.insert(&rec.model).map_err(|e| at_line(e, rec.line))?;
            placed.push((f, m, rec));
        }

        let n_models = models.len();
        let mut slots: Vec<Option<S>> = vec![None; formats.len() * n_models];
        for (f, m, rec) in placed {
            let slot = &mut slots[f * n_models + m];
            if slot.is_some() {
                return Err(Error::DuplicateRecord {
                    format: rec.format.clone(),
                    model: rec.model.clone(),
                    line: rec.line,
                });
            }
            *slot = Some(rec.sample);
        }

        let cells = slots
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.ok_or_else(|| Error::MissingRecord {
                    format: formats.label(i / n_models).unwrap_or_default().to_string(),
                    model: models.label(i % n_models).unwrap_or_default().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            formats = formats.len(),
            models = models.len(),
            "built benchmark table"
        );
        Ok(Self {
            formats,
            models,
            cells,
        })
    }

    pub fn formats(&self) -> &LabelIndex {
        &self.formats
    }

    pub fn models(&self) -> &LabelIndex {
        &self.models
    }

    pub fn n_formats(&self) -> usize {
        self.formats.len()
    }

    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn get(&self, format_idx: usize, model_idx: usize) -> Option<&S> {
        if format_idx >= self.n_formats() || model_idx >= self.n_models() {
            return None;
        }
        self.cells.get(format_idx * self.n_models() + model_idx)
    }

    /// Cell addressed by labels.
    pub fn cell(&self, format: &str, model: &str) -> Result<&S> {
        let f = self.formats.index_of(format)?;
        let m = self.models.index_of(model)?;
        Ok(&self.cells[f * self.n_models() + m])
    }

    /// Project one metric out of every cell, rows are formats.
    pub fn metric<F>(&self, f: F) -> Matrix
    where
        F: Fn(&S) -> f64,
    {
        self.cells
            .chunks(self.n_models().max(1))
            .take(self.n_formats())
            .map(|row| row.iter().map(&f).collect())
            .collect()
    }

    /// One model's metric over a range of formats.
    pub fn model_series<F>(&self, model_idx: usize, rows: Range<usize>, f: F) -> Vec<f64>
    where
        F: Fn(&S) -> f64,
    {
        rows.filter_map(|r| self.get(r, model_idx))
            .map(f)
            .collect()
    }

    /// Format labels of a range of rows.
    pub fn format_labels(&self, rows: Range<usize>) -> Vec<String> {
        rows.filter_map(|r| self.formats.label(r))
            .map(str::to_string)
            .collect()
    }
}

fn at_line(err: Error, line: usize) -> Error {
    match err {
        Error::UnknownLabel { axis, label, .. } => Error::UnknownLabel {
            axis,
            label,
            line: Some(line),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::SizeSample;

    fn rec(format: &str, model: &str, size: u64, line: usize) -> Record<SizeSample> {
        Record {
            format: format.to_string(),
            model: model.to_string(),
            sample: SizeSample { size },
            line,
        }
    }

    #[test]
    fn dense_layout() {
        let records = vec![
            rec("A", "x", 1, 1),
            rec("A", "y", 2, 4),
            rec("B", "y", 4, 7),
            rec("B", "x", 3, 10),
        ];
        let table = BenchmarkTable::from_records(&records).unwrap();
        assert_eq!(table.n_formats(), 2);
        assert_eq!(table.n_models(), 2);
        assert_eq!(table.get(1, 0).unwrap().size, 3);
        assert_eq!(table.cell("B", "y").unwrap().size, 4);
        assert!(table.get(2, 0).is_none());
        assert_eq!(
            table.metric(|s| s.size as f64),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]]
        );
        assert_eq!(table.model_series(1, 0..2, |s| s.size as f64), vec![2.0, 4.0]);
        assert_eq!(table.format_labels(1..2), vec!["B".to_string()]);
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let records = vec![rec("A", "x", 1, 1), rec("A", "x", 2, 4)];
        assert!(matches!(
            BenchmarkTable::from_records(&records),
            Err(Error::DuplicateRecord { line: 4, .. })
        ));
    }

    #[test]
    fn missing_pair_is_rejected() {
        let records = vec![rec("A", "x", 1, 1), rec("B", "y", 2, 4)];
        match BenchmarkTable::from_records(&records) {
            Err(Error::MissingRecord { format, model }) => {
                assert_eq!((format.as_str(), model.as_str()), ("A", "y"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fixed_axes_order_and_reject() {
        let records = vec![rec("A", "x", 1, 1), rec("B", "x", 2, 4)];
        let table = BenchmarkTable::with_axes(
            &records,
            LabelIndex::fixed(Axis::Format, ["B", "A"]),
            LabelIndex::new(Axis::Model),
        )
        .unwrap();
        assert_eq!(table.formats().index_of("B").unwrap(), 0);
        assert_eq!(table.get(0, 0).unwrap().size, 2);

        let err = BenchmarkTable::with_axes(
            &records,
            LabelIndex::fixed(Axis::Format, ["A"]),
            LabelIndex::new(Axis::Model),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownLabel { axis: Axis::Format, line: Some(4), .. }
        ));
    }

    #[test]
    fn unknown_cell_lookup() {
        let table = BenchmarkTable::from_records(&[rec("A", "x", 1, 1)]).unwrap();
        assert!(matches!(
            table.cell("A", "sponza"),
            Err(Error::UnknownLabel { axis: Axis::Model, .. })
        ));
    }
}
