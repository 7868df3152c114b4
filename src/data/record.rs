use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IngestConfig;
use crate::error::{Error, Result};

/// One logged measurement: the format/model pair plus the metrics of shape `S`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record<S> {
    pub format: String,
    pub model: String,
    pub sample: S,
    /// 1-based line number of the record's first line.
    pub line: usize,
}

/// Metrics carried by one record. `STRIDE` counts every line of a record,
/// including the format and model lines.
pub trait Sample: Copy + Default + std::fmt::Debug + Serialize {
    const STRIDE: usize;

    /// Parse the metric lines that follow the format and model lines.
    /// `first_line` is the 1-based line number of `fields[0]`.
    fn parse_fields(fields: &[&str], first_line: usize, cfg: &IngestConfig) -> Result<Self>;
}

/// Compressed size plus rendering frame rate. A frame rate of `0.0` means the
/// renderer produced no measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSample {
    pub size: u64,
    pub fps: f64,
}

impl RenderSample {
    pub fn frame_time_ms(&self) -> f64 {
        frame_time_ms(self.fps)
    }
}

impl Sample for RenderSample {
    const STRIDE: usize = 4;

    fn parse_fields(fields: &[&str], first_line: usize, cfg: &IngestConfig) -> Result<Self> {
        Ok(Self {
            size: parse_bytes(fields[0], first_line, "size")?,
            fps: parse_rate(fields[1], first_line + 1, &cfg.fps_marker)?,
        })
    }
}

/// Wall-clock construction time and peak resident memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSample {
    pub seconds: f64,
    pub peak_memory: u64,
}

impl Sample for ConstructionSample {
    const STRIDE: usize = 4;

    fn parse_fields(fields: &[&str], first_line: usize, _cfg: &IngestConfig) -> Result<Self> {
        Ok(Self {
            seconds: parse_duration(fields[0], first_line)?,
            peak_memory: parse_bytes(fields[1], first_line + 1, "peak memory")?,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeSample {
    pub size: u64,
}

impl Sample for SizeSample {
    const STRIDE: usize = 3;

    fn parse_fields(fields: &[&str], first_line: usize, _cfg: &IngestConfig) -> Result<Self> {
        Ok(Self {
            size: parse_bytes(fields[0], first_line, "size")?,
        })
    }
}

/// Frame time in milliseconds; an unmeasured rate stays `0.0`.
pub fn frame_time_ms(fps: f64) -> f64 {
    if fps != 0.0 {
        1000.0 / fps
    } else {
        0.0
    }
}

pub fn parse_bytes(text: &str, line: usize, field: &'static str) -> Result<u64> {
    text.trim()
        .parse()
        .map_err(|_| Error::numeric(line, field, text))
}

/// `MM:SS` or `H:MM:SS` into seconds. Every component may carry a fraction.
pub fn parse_duration(text: &str, line: usize) -> Result<f64> {
    let parts = text
        .trim()
        .split(':')
        .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::numeric(line, "duration", text))?;

    match parts.as_slice() {
        [minutes, seconds] => Ok(minutes * 60.0 + seconds),
        [hours, minutes, seconds] => Ok(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => Err(Error::numeric(line, "duration", text)),
    }
}

/// Frame rate from a free-text line. A line carrying `marker` must be followed
/// by a non-negative float; a bare non-negative float is taken as is; anything
/// else is an absent measurement, recorded as `0.0`.
pub fn parse_rate(text: &str, line: usize, marker: &str) -> Result<f64> {
    let text = text.trim_end();
    if let Some((_, value)) = text.split_once(marker) {
        return value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| Error::numeric(line, "frame rate", text));
    }

    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => {
            debug!(line, text, "no frame rate measurement");
            Ok(0.0)
        }
    }
}
