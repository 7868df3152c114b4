//! Ratios between two equally sized groups of formats, one column per model
//! plus the geometric mean across models.

use comfy_table::Table;
use serde::Serialize;
use tracing::info;

use crate::config::{Comparison, Config, Side};
use crate::data::record::{RenderSample, Sample, SizeSample};
use crate::data::table::BenchmarkTable;
use crate::error::Result;
use crate::labels::{model_color, order_by_label_length, AGGREGATE_COLOR};
use crate::metrics::ratio::{ratio_table, with_geomean_column};
use crate::report::common::{fmt_value, model_names, new_table, TextSummary};

pub const GEOMEAN: &str = "Geomean";

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonReport {
    pub metric: &'static str,
    /// Model names followed by `Geomean`.
    pub columns: Vec<String>,
    pub colors: Vec<&'static str>,
    pub comparisons: Vec<ComparisonTable>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonTable {
    pub name: String,
    /// Rows ordered by label length of the formats on the comparison's
    /// `labels` side: the numerator for size, the denominator for rate.
    pub rows: Vec<ComparisonRow>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonRow {
    pub format: String,
    pub numerator: String,
    pub denominator: String,
    pub ratios: Vec<f64>,
    pub geomean: f64,
}

/// Baseline size over variant size.
pub fn size_comparison(table: &BenchmarkTable<SizeSample>, cfg: &Config) -> Result<ComparisonReport> {
    build(table, &cfg.comparison.size, "size", |s| s.size as f64, cfg)
}

/// Variant frame rate over baseline frame rate.
pub fn rate_comparison(table: &BenchmarkTable<RenderSample>, cfg: &Config) -> Result<ComparisonReport> {
    build(table, &cfg.comparison.rate, "fps", |s| s.fps, cfg)
}

pub fn build<S, F>(
    table: &BenchmarkTable<S>,
    comparisons: &[Comparison],
    metric: &'static str,
    value: F,
    cfg: &Config,
) -> Result<ComparisonReport>
where
    S: Sample,
    F: Fn(&S) -> f64,
{
    let matrix = table.metric(value);
    let mut columns = model_names(table, &cfg.labels.model_suffix);
    columns.push(GEOMEAN.to_string());
    let colors = (0..table.n_models())
        .map(|m| model_color(m, false))
        .chain(std::iter::once(AGGREGATE_COLOR))
        .collect();

    let mut tables = Vec::with_capacity(comparisons.len());
    for cmp in comparisons {
        let num = cmp.numerator.resolve(table.n_formats())?;
        let den = cmp.denominator.resolve(table.n_formats())?;
        let ratios = ratio_table(&matrix[num.clone()], &matrix[den.clone()])?;
        let with_mean = with_geomean_column(&ratios)?;

        let num_labels = table.format_labels(num);
        let den_labels = table.format_labels(den);
        let names = match cmp.labels {
            Side::Numerator => &num_labels,
            Side::Denominator => &den_labels,
        };

        let rows = order_by_label_length(names.as_slice())
            .into_iter()
            .map(|i| {
                let mut ratios = with_mean[i].clone();
                let geomean = ratios.pop().unwrap_or(f64::NAN);
                ComparisonRow {
                    format: names[i].clone(),
                    numerator: num_labels[i].clone(),
                    denominator: den_labels[i].clone(),
                    ratios,
                    geomean,
                }
            })
            .collect();
        info!(comparison = %cmp.name, metric, "computed ratios");
        tables.push(ComparisonTable {
            name: cmp.name.clone(),
            rows,
        });
    }

    Ok(ComparisonReport {
        metric,
        columns,
        colors,
        comparisons: tables,
    })
}

impl TextSummary for ComparisonReport {
    fn sections(&self) -> Vec<(String, Table)> {
        self.comparisons
            .iter()
            .map(|cmp| {
                let mut header = vec!["format".to_string()];
                header.extend(self.columns.iter().cloned());
                let mut table = new_table(header);
                for row in &cmp.rows {
                    let mut cells = vec![row.format.clone()];
                    cells.extend(row.ratios.iter().map(|&v| fmt_value(v)));
                    cells.push(fmt_value(row.geomean));
                    table.add_row(cells);
                }
                (format!("{} ({} ratio)", cmp.name, self.metric), table)
            })
            .collect()
    }
}
