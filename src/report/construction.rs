use comfy_table::Table;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::data::record::ConstructionSample;
use crate::data::table::BenchmarkTable;
use crate::error::Result;
use crate::labels::model_color;
use crate::metrics::ratio::scale;
use crate::metrics::stats::{column_summaries, rank_cells, Summary, GIB, MIB};
use crate::report::common::{fmt_value, legend, model_names, new_table, FormatLegend, TextSummary};

#[derive(Clone, Debug, Serialize)]
pub struct ConstructionReport {
    pub models: Vec<String>,
    pub slices: Vec<SliceTimes>,
    pub memory: MemoryReport,
}

#[derive(Clone, Debug, Serialize)]
pub struct SliceTimes {
    pub name: String,
    pub formats: Vec<FormatLegend>,
    pub models: Vec<ModelTimes>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelTimes {
    pub model: String,
    pub color: &'static str,
    pub seconds: Vec<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MemoryReport {
    pub budget_gib: f64,
    /// Peak memory per model, in MiB.
    pub per_model: Vec<ModelMemory>,
    /// Every format/model run, ascending.
    pub ranking: Vec<RankedMemory>,
    pub over_budget: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelMemory {
    pub model: String,
    pub mib: Summary,
}

#[derive(Clone, Debug, Serialize)]
pub struct RankedMemory {
    pub format: String,
    pub model: String,
    pub gib: f64,
}

pub fn build(table: &BenchmarkTable<ConstructionSample>, cfg: &Config) -> Result<ConstructionReport> {
    let models = model_names(table, &cfg.labels.model_suffix);

    let mut slices = Vec::with_capacity(cfg.construction.slices.len());
    for slice in &cfg.construction.slices {
        let rows = slice.span.resolve(table.n_formats())?;
        slices.push(SliceTimes {
            name: slice.name.clone(),
            formats: legend(table, rows.clone()),
            models: models
                .iter()
                .enumerate()
                .map(|(m, model)| ModelTimes {
                    model: model.clone(),
                    color: model_color(m, false),
                    seconds: table.model_series(m, rows.clone(), |s| s.seconds),
                })
                .collect(),
        });
    }

    let memory = table.metric(|s| s.peak_memory as f64);
    let per_model = column_summaries(&scale(&memory, 1.0 / MIB))
        .into_iter()
        .zip(&models)
        .map(|(mib, model)| ModelMemory {
            model: model.clone(),
            mib,
        })
        .collect();

    let budget = cfg.construction.memory_budget_gib;
    let ranking: Vec<RankedMemory> = rank_cells(&scale(&memory, 1.0 / GIB))
        .into_iter()
        .map(|c| RankedMemory {
            format: table.formats().label(c.format).unwrap_or_default().to_string(),
            model: models[c.model].clone(),
            gib: c.value,
        })
        .collect();
    let over_budget = ranking.iter().filter(|r| r.gib > budget).count();
    info!(runs = ranking.len(), over_budget, "memory ranking");

    Ok(ConstructionReport {
        models,
        slices,
        memory: MemoryReport {
            budget_gib: budget,
            per_model,
            ranking,
            over_budget,
        },
    })
}

impl TextSummary for ConstructionReport {
    fn sections(&self) -> Vec<(String, Table)> {
        let mut out = Vec::new();
        for slice in &self.slices {
            let mut header = vec!["label".to_string()];
            header.extend(self.models.iter().cloned());
            let mut times = new_table(header);
            for (i, f) in slice.formats.iter().enumerate() {
                let mut row = vec![f.label.clone()];
                row.extend(slice.models.iter().map(|m| fmt_value(m.seconds[i])));
                times.add_row(row);
            }
            out.push((format!("Construction time (s), {}", slice.name), times));
        }

        let mut mem = new_table(["model", "mean MiB", "min MiB", "max MiB", "std MiB"]);
        for m in &self.memory.per_model {
            mem.add_row(vec![
                m.model.clone(),
                fmt_value(m.mib.mean),
                fmt_value(m.mib.min),
                fmt_value(m.mib.max),
                fmt_value(m.mib.std),
            ]);
        }
        out.push((
            format!(
                "Peak memory, {} of {} runs over {} GiB",
                self.memory.over_budget,
                self.memory.ranking.len(),
                self.memory.budget_gib
            ),
            mem,
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatSlice, Span};
    use crate::data::loader::build_table;

    const LOG: &str = "\
SVO(11)\nsan-miguel-low-poly\n1:30\n1073741824
SVO(11)\nsponza\n0:45\n6442450944
SVDAG(11)\nsan-miguel-low-poly\n2:00\n2147483648
SVDAG(11)\nsponza\n1:00.5\n3221225472
";

    fn cfg() -> Config {
        let mut cfg = Config::default();
        cfg.construction.slices = vec![
            FormatSlice { name: "first".into(), span: Span::new(0, 1) },
            FormatSlice { name: "rest".into(), span: Span::open(1) },
        ];
        cfg
    }

    #[test]
    fn times_and_memory() {
        let cfg = cfg();
        let table = build_table::<ConstructionSample>(LOG, &cfg).unwrap();
        let report = build(&table, &cfg).unwrap();

        assert_eq!(report.models, vec!["san-miguel", "sponza"]);
        assert_eq!(report.slices[0].models[0].seconds, vec![90.0]);
        assert_eq!(report.slices[1].models[1].seconds, vec![60.5]);
        assert_eq!(report.slices[1].formats[0].label, "I");

        let san_miguel = &report.memory.per_model[0].mib;
        assert_eq!(san_miguel.mean, 1536.0);
        assert_eq!(san_miguel.min, 1024.0);

        let gib: Vec<f64> = report.memory.ranking.iter().map(|r| r.gib).collect();
        assert_eq!(gib, vec![1.0, 2.0, 3.0, 6.0]);
        assert_eq!(report.memory.ranking[3].format, "SVO(11)");
        assert_eq!(report.memory.over_budget, 1);
    }

    #[test]
    fn summary_mentions_budget() {
        let cfg = cfg();
        let table = build_table::<ConstructionSample>(LOG, &cfg).unwrap();
        let text = build(&table, &cfg).unwrap().render();
        assert!(text.contains("1 of 4 runs over 4 GiB"));
    }
}
