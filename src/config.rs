use std::fs::File;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::pareto::ParetoPolicy;

/// Marker the renderer prints in front of its final frame rate.
pub const FPS_MARKER: &str = "INFO: Final FPS measurement: ";

/// Analysis settings. Every field has a default so a config file only needs
/// the keys it overrides.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub labels: LabelConfig,
    pub axes: AxesConfig,
    pub rendering: RenderingConfig,
    pub construction: ConstructionConfig,
    pub comparison: ComparisonConfig,
}

impl Config {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub fps_marker: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fps_marker: FPS_MARKER.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Suffix stripped from model names when they are displayed.
    pub model_suffix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            model_suffix: "-low-poly".to_string(),
        }
    }
}

/// Fixed axis order. An empty list keeps first-seen order for that axis.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub formats: Vec<String>,
    pub models: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub slices: Vec<FormatSlice>,
    pub policy: ParetoPolicy,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            slices: resolution_slices(),
            policy: ParetoPolicy::FrameTimeStrict,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    pub slices: Vec<FormatSlice>,
    pub memory_budget_gib: f64,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            slices: resolution_slices(),
            memory_budget_gib: 4.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Size ratios, baseline over variant.
    pub size: Vec<Comparison>,
    /// Frame rate ratios, variant over baseline.
    pub rate: Vec<Comparison>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            size: vec![
                Comparison::new("whole-level-dedup", Span::new(0, 8), Span::new(8, 16))
                    .labelled_by(Side::Numerator),
                Comparison::new("df-packing", Span::new(16, 24), Span::new(24, 32))
                    .labelled_by(Side::Numerator),
            ],
            rate: vec![
                Comparison::new("restart", Span::new(8, 16), Span::new(0, 8))
                    .labelled_by(Side::Denominator),
                Comparison::new("unroll", Span::new(16, 24), Span::new(0, 8))
                    .labelled_by(Side::Denominator),
            ],
        }
    }
}

fn resolution_slices() -> Vec<FormatSlice> {
    vec![
        FormatSlice {
            name: "2048^3".to_string(),
            span: Span::new(0, 20),
        },
        FormatSlice {
            name: "512^3".to_string(),
            span: Span::open(20),
        },
    ]
}

/// Half-open range of format indices; a missing `end` runs to the last format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Resolve against a table with `len` formats. Empty or out of range
    /// spans are rejected.
    pub fn resolve(&self, len: usize) -> Result<Range<usize>> {
        let end = self.end.unwrap_or(len);
        if self.start >= end || end > len {
            return Err(Error::SliceOutOfRange {
                start: self.start,
                end,
                len,
            });
        }
        Ok(self.start..end)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormatSlice {
    pub name: String,
    pub span: Span,
}

/// Which side of a comparison names the rows: the baseline formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    #[default]
    Numerator,
    Denominator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub name: String,
    pub numerator: Span,
    pub denominator: Span,
    #[serde(default)]
    pub labels: Side,
}

impl Comparison {
    pub fn new(name: &str, numerator: Span, denominator: Span) -> Self {
        Self {
            name: name.to_string(),
            numerator,
            denominator,
            labels: Side::Numerator,
        }
    }

    pub fn labelled_by(mut self, side: Side) -> Self {
        self.labels = side;
        self
    }
}
