//! Two-objective Pareto frontiers over one model's `(size, value)` series.
//!
//! The analyses disagree on dominance, so each rule is a named policy rather
//! than one unified predicate. In every policy a value of `0.0` marks a run
//! without a measurement. A point whose value is not positive is never on
//! the frontier, and under the strict policies it never dominates.

use std::collections::BTreeSet;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub size: f64,
    pub value: f64,
}

impl Point {
    pub fn new(size: f64, value: f64) -> Self {
        Self { size, value }
    }

    fn is_measured(&self) -> bool {
        self.value > 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParetoPolicy {
    /// Smaller size, higher frame rate. A point is dropped when a measured
    /// point is no larger, no slower and strictly better on one axis.
    RateStrict,
    /// Smaller size, lower frame time, same strict rule as `RateStrict`.
    #[default]
    FrameTimeStrict,
    /// Point `i` survives iff it is measured and every point `j`, measured
    /// or not, has `size_i <= size_j` or `value_i <= value_j`.
    FrameTimeLiteral,
}

impl ParetoPolicy {
    /// Whether the value axis is a frame rate (otherwise a frame time).
    pub fn maximizes_value(&self) -> bool {
        matches!(self, ParetoPolicy::RateStrict)
    }
}

/// `a` strictly dominates `b`: no worse on both axes, better on at least one.
fn dominates(a: &Point, b: &Point, maximize: bool) -> bool {
    let (value_ok, value_better) = if maximize {
        (a.value >= b.value, a.value > b.value)
    } else {
        (a.value <= b.value, a.value < b.value)
    };
    a.size <= b.size && value_ok && (a.size < b.size || value_better)
}

/// Frontier membership for every point.
pub fn pareto_mask(points: &[Point], policy: ParetoPolicy) -> Vec<bool> {
    points
        .iter()
        .map(|p| {
            p.is_measured()
                && match policy {
                    ParetoPolicy::RateStrict | ParetoPolicy::FrameTimeStrict => {
                        let maximize = policy.maximizes_value();
                        !points
                            .iter()
                            .any(|o| o.is_measured() && dominates(o, p, maximize))
                    }
                    ParetoPolicy::FrameTimeLiteral => points
                        .iter()
                        .all(|o| p.size <= o.size || p.value <= o.value),
                }
        })
        .collect()
}

/// Indices of frontier points, ordered by ascending size then value so they
/// can be joined into a polyline.
pub fn frontier(points: &[Point], policy: ParetoPolicy) -> Vec<usize> {
    pareto_mask(points, policy)
        .into_iter()
        .positions(|on| on)
        .sorted_by_key(|&i| (OrderedFloat(points[i].size), OrderedFloat(points[i].value)))
        .collect()
}

/// Members shared by every per-model frontier. No frontiers, no members.
pub fn common_frontier<T: Ord + Clone>(frontiers: &[BTreeSet<T>]) -> BTreeSet<T> {
    let Some((first, rest)) = frontiers.split_first() else {
        return BTreeSet::new();
    };
    rest.iter().fold(first.clone(), |acc, set| {
        acc.intersection(set).cloned().collect()
    })
}
