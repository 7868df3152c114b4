pub mod config;
pub mod error;
pub mod labels;

pub mod data {
    pub mod index;
    pub mod loader;
    pub mod record;
    pub mod table;
}

pub mod metrics {
    pub mod pareto;
    pub mod ratio;
    pub mod stats;

    pub use ratio::{Matrix, RatioMatrix};
}

pub mod report {
    pub mod common;
    pub mod comparison;
    pub mod construction;
    pub mod rendering;

    pub use common::TextSummary;
}

pub use error::{Error, Result};
