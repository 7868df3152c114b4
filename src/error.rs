use std::fmt;

use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which table axis a label belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Format,
    Model,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Format => f.write_str("format"),
            Axis::Model => f.write_str("model"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("line {line}: cannot parse {field} from {text:?}")]
    NumericParse {
        line: usize,
        field: &'static str,
        text: String,
    },
    #[error("unknown {axis} label {label:?}{}", at_line(.line))]
    UnknownLabel {
        axis: Axis,
        label: String,
        line: Option<usize>,
    },
    #[error("degenerate ratio {value} at row {row}, column {column}")]
    DegenerateRatio { row: usize, column: usize, value: f64 },
    #[error("empty series at row {row}")]
    EmptySeries { row: usize },
    #[error("duplicate record for ({format}, {model}) at line {line}")]
    DuplicateRecord {
        format: String,
        model: String,
        line: usize,
    },
    #[error("no record for ({format}, {model})")]
    MissingRecord { format: String, model: String },
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("format span {start}..{end} out of range for {len} formats")]
    SliceOutOfRange { start: usize, end: usize, len: usize },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl Error {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn numeric(line: usize, field: &'static str, text: impl Into<String>) -> Self {
        Self::NumericParse {
            line,
            field,
            text: text.into(),
        }
    }
}
