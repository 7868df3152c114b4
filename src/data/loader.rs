use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{Config, IngestConfig};
use crate::data::index::LabelIndex;
use crate::data::record::{Record, Sample};
use crate::data::table::BenchmarkTable;
use crate::error::{Axis, Error, Result};

/// Split a log into fixed-stride records of shape `S`.
pub fn parse_records<S: Sample>(text: &str, cfg: &IngestConfig) -> Result<Vec<Record<S>>> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() % S::STRIDE != 0 {
        // first line the truncated record is missing
        let missing = lines.len() + 1;
        return Err(Error::malformed(
            missing,
            format!(
                "{} lines is not a multiple of the {}-line record",
                lines.len(),
                S::STRIDE
            ),
        ));
    }

    lines
        .chunks(S::STRIDE)
        .enumerate()
        .map(|(i, chunk)| {
            let line = i * S::STRIDE + 1;
            let format = label(chunk[0], line, "format")?;
            let model = label(chunk[1], line + 1, "model")?;
            let sample = S::parse_fields(&chunk[2..], line + 2, cfg)?;
            Ok(Record {
                format,
                model,
                sample,
                line,
            })
        })
        .collect()
}

fn label(text: &str, line: usize, what: &str) -> Result<String> {
    let label = text.trim_end();
    if label.is_empty() {
        return Err(Error::malformed(line, format!("empty {what} label")));
    }
    Ok(label.to_string())
}

/// Parse `text` into a table, honouring any fixed axis order in `cfg`.
pub fn build_table<S: Sample>(text: &str, cfg: &Config) -> Result<BenchmarkTable<S>> {
    let records = parse_records::<S>(text, &cfg.ingest)?;
    info!(records = records.len(), stride = S::STRIDE, "parsed records");
    BenchmarkTable::with_axes(
        &records,
        axis(Axis::Format, &cfg.axes.formats),
        axis(Axis::Model, &cfg.axes.models),
    )
}

fn axis(axis: Axis, order: &[String]) -> LabelIndex {
    if order.is_empty() {
        LabelIndex::new(axis)
    } else {
        LabelIndex::fixed(axis, order.iter().cloned())
    }
}

/// Read a benchmark log from disk and build its table.
pub fn load_dataset<S: Sample>(path: &Path, cfg: &Config) -> Result<BenchmarkTable<S>> {
    info!(path = %path.display(), "loading benchmark log");
    let text = fs::read_to_string(path)?;
    build_table(&text, cfg)
}
