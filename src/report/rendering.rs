//! Compression against rendering speed: per model Pareto frontiers for each
//! resolution slice, and the formats that sit on every model's frontier.

use std::collections::BTreeSet;

use comfy_table::Table;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::data::record::RenderSample;
use crate::data::table::BenchmarkTable;
use crate::error::Result;
use crate::labels::model_color;
use crate::metrics::pareto::{common_frontier, frontier, pareto_mask, ParetoPolicy, Point};
use crate::report::common::{fmt_value, legend, model_names, new_table, FormatLegend, TextSummary};

#[derive(Clone, Debug, Serialize)]
pub struct RenderingReport {
    pub policy: ParetoPolicy,
    /// `fps` or `frame_time_ms`.
    pub value_axis: &'static str,
    pub slices: Vec<SliceFrontiers>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SliceFrontiers {
    pub name: String,
    pub formats: Vec<FormatLegend>,
    pub models: Vec<ModelFrontier>,
    /// Formats on every model's frontier, in format order.
    pub common_frontier: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelFrontier {
    pub model: String,
    pub points: Vec<FrontierPoint>,
    /// Roman labels of the frontier, by ascending size.
    pub frontier: Vec<String>,
    /// Formats without a frame rate measurement.
    pub unmeasured: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct FrontierPoint {
    pub label: String,
    pub size: f64,
    pub value: f64,
    pub on_frontier: bool,
    pub color: &'static str,
}

pub fn build(table: &BenchmarkTable<RenderSample>, cfg: &Config) -> Result<RenderingReport> {
    let policy = cfg.rendering.policy;
    let value_of = |s: &RenderSample| {
        if policy.maximizes_value() {
            s.fps
        } else {
            s.frame_time_ms()
        }
    };
    let models = model_names(table, &cfg.labels.model_suffix);

    let mut slices = Vec::with_capacity(cfg.rendering.slices.len());
    for slice in &cfg.rendering.slices {
        let rows = slice.span.resolve(table.n_formats())?;
        let formats = legend(table, rows.clone());

        let mut per_model = Vec::with_capacity(models.len());
        let mut member_sets: Vec<BTreeSet<usize>> = Vec::with_capacity(models.len());
        for (m, model) in models.iter().enumerate() {
            let sizes = table.model_series(m, rows.clone(), |s| s.size as f64);
            let values = table.model_series(m, rows.clone(), value_of);
            let points: Vec<Point> = sizes
                .iter()
                .zip(&values)
                .map(|(&size, &value)| Point::new(size, value))
                .collect();

            let mask = pareto_mask(&points, policy);
            let order = frontier(&points, policy);
            let unmeasured = values.iter().filter(|&&v| v == 0.0).count();
            if unmeasured == points.len() {
                warn!(slice = %slice.name, model = %model, "no measured formats");
            }

            member_sets.push(order.iter().map(|&i| rows.start + i).collect());
            per_model.push(ModelFrontier {
                model: model.clone(),
                points: points
                    .iter()
                    .zip(&mask)
                    .zip(&formats)
                    .map(|((p, &on), f)| FrontierPoint {
                        label: f.label.clone(),
                        size: p.size,
                        value: p.value,
                        on_frontier: on,
                        color: model_color(m, on),
                    })
                    .collect(),
                frontier: order.iter().map(|&i| formats[i].label.clone()).collect(),
                unmeasured,
            });
        }

        let common: Vec<String> = common_frontier(&member_sets)
            .into_iter()
            .filter_map(|f| table.formats().label(f).map(str::to_string))
            .collect();
        info!(slice = %slice.name, common = common.len(), "common Pareto frontier");

        slices.push(SliceFrontiers {
            name: slice.name.clone(),
            formats,
            models: per_model,
            common_frontier: common,
        });
    }

    Ok(RenderingReport {
        policy,
        value_axis: if policy.maximizes_value() {
            "fps"
        } else {
            "frame_time_ms"
        },
        slices,
    })
}

impl TextSummary for RenderingReport {
    fn sections(&self) -> Vec<(String, Table)> {
        let mut out = Vec::new();
        for slice in &self.slices {
            let mut header = vec!["label".to_string()];
            header.extend(slice.models.iter().map(|m| m.model.clone()));
            let mut points = new_table(header);
            for (i, f) in slice.formats.iter().enumerate() {
                let mut row = vec![f.label.clone()];
                row.extend(slice.models.iter().map(|m| {
                    let p = &m.points[i];
                    let mark = if p.on_frontier { " *" } else { "" };
                    format!("{:.0} B / {}{mark}", p.size, fmt_value(p.value))
                }));
                points.add_row(row);
            }
            out.push((
                format!("{} ({}, * = Pareto-optimal)", slice.name, self.value_axis),
                points,
            ));

            let mut common = new_table(["common Pareto frontier"]);
            for f in &slice.common_frontier {
                common.add_row(vec![f.clone()]);
            }
            out.push((format!("Common Pareto frontier for {}", slice.name), common));

            let mut labels = new_table(["format", "label"]);
            for f in &slice.formats {
                labels.add_row(vec![f.format.clone(), f.label.clone()]);
            }
            out.push((format!("Format labels for {}", slice.name), labels));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatSlice, Span};
    use crate::data::loader::build_table;

    const LOG: &str = "\
A\nsponza\n100\nINFO: Final FPS measurement: 50.0
A\nbuddha\n100\nINFO: Final FPS measurement: 40.0
B\nsponza\n200\nINFO: Final FPS measurement: 100.0
B\nbuddha\n200\nINFO: Final FPS measurement: 20.0
C\nsponza\n50\nerror: out of memory
C\nbuddha\n50\nINFO: Final FPS measurement: 10.0
";

    fn cfg(policy: ParetoPolicy) -> Config {
        let mut cfg = Config::default();
        cfg.rendering.policy = policy;
        cfg.rendering.slices = vec![FormatSlice {
            name: "all".into(),
            span: Span::open(0),
        }];
        cfg
    }

    #[test]
    fn frame_time_frontiers() {
        let cfg = cfg(ParetoPolicy::FrameTimeStrict);
        let table = build_table::<RenderSample>(LOG, &cfg).unwrap();
        let report = build(&table, &cfg).unwrap();
        let slice = &report.slices[0];

        // sponza: A(100, 20ms) B(200, 10ms) C unmeasured
        assert_eq!(slice.models[0].frontier, vec!["I", "II"]);
        assert_eq!(slice.models[0].unmeasured, 1);
        // buddha: C(50, 100ms) A(100, 25ms) B(200, 50ms) -> B dominated by A
        assert_eq!(slice.models[1].frontier, vec!["III", "I"]);
        assert_eq!(slice.common_frontier, vec!["A"]);
        assert_eq!(report.value_axis, "frame_time_ms");
        assert!((slice.models[0].points[0].value - 20.0).abs() < 1e-12);
    }

    #[test]
    fn rate_policy_uses_fps() {
        let cfg = cfg(ParetoPolicy::RateStrict);
        let table = build_table::<RenderSample>(LOG, &cfg).unwrap();
        let report = build(&table, &cfg).unwrap();
        assert_eq!(report.value_axis, "fps");
        assert_eq!(report.slices[0].models[0].points[1].value, 100.0);
        assert_eq!(report.slices[0].models[0].frontier, vec!["I", "II"]);
    }

    #[test]
    fn slice_out_of_range_fails() {
        let mut cfg = cfg(ParetoPolicy::FrameTimeStrict);
        cfg.rendering.slices[0].span = Span::new(0, 20);
        let table = build_table::<RenderSample>(LOG, &cfg).unwrap();
        assert!(build(&table, &cfg).is_err());
    }

    #[test]
    fn summary_lists_common_frontier() {
        let cfg = cfg(ParetoPolicy::FrameTimeStrict);
        let table = build_table::<RenderSample>(LOG, &cfg).unwrap();
        let text = build(&table, &cfg).unwrap().render();
        assert!(text.contains("Common Pareto frontier for all"));
        assert!(text.contains("Format labels for all"));
    }
}
