use thiserror::Error;
use vg_core::{ColorError, ImportError, SnapshotError};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid viewport {width}×{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown property: {0}")]
    UnknownProperty(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("load {generation} was superseded by a newer load")]
    Superseded { generation: u64 },
    #[error("failed to import document: {0}")]
    Import(#[from] ImportError),
}
