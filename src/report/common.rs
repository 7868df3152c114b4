use std::ops::Range;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use crate::data::record::Sample;
use crate::data::table::BenchmarkTable;
use crate::labels::{display_model, roman_labels};

/// Plain-text rendering of a report, one titled table per section.
pub trait TextSummary {
    fn sections(&self) -> Vec<(String, Table)>;

    fn render(&self) -> String {
        self.sections()
            .into_iter()
            .map(|(title, table)| format!("{title}\n{table}\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn new_table<I, T>(header: I) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Into::into).collect::<Vec<comfy_table::Cell>>());
    table
}

pub(crate) fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.3}")
    }
}

/// A format with its roman numeral, numbered from the start of its slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormatLegend {
    pub format: String,
    pub label: String,
}

pub(crate) fn legend<S: Sample>(table: &BenchmarkTable<S>, rows: Range<usize>) -> Vec<FormatLegend> {
    let formats = table.format_labels(rows);
    let labels = roman_labels(formats.len());
    formats
        .into_iter()
        .zip(labels)
        .map(|(format, label)| FormatLegend { format, label })
        .collect()
}

pub(crate) fn model_names<S: Sample>(table: &BenchmarkTable<S>, suffix: &str) -> Vec<String> {
    table
        .models()
        .iter()
        .map(|m| display_model(m, suffix))
        .collect()
}
