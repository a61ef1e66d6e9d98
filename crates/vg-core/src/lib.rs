pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod snapshot;
pub mod svg_export;
pub mod svg_import;

pub use id::NodeId;
pub use layout::{ViewTransform, Viewport, fit_to_viewport, insert_grid};
pub use model::*;
pub use snapshot::{Snapshot, SnapshotError};
pub use svg_export::export_svg;
pub use svg_import::{ImportError, import_svg};

// Re-export geometry and graph types so downstream crates don't need direct dependencies
pub use kurbo;
pub use petgraph::graph::NodeIndex;
