use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("x and y must have same first dimension, but have shapes ({x},) and ({y},)")]
    DimensionMismatch { x: usize, y: usize },

    #[error("cannot plot an empty series")]
    EmptySeries,

    #[error("plotting backend failed: {0}")]
    Backend(String),

    #[error("failed to open {path} in viewer: {source}")]
    Viewer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("hash table needs at least one slot")]
    ZeroCapacity,
}
