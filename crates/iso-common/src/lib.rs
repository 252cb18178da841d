//! Common types shared across the travel-time contour crates.

pub mod bbox;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod sample;

pub use bbox::BoundingBox;
pub use config::RunConfig;
pub use coord::Coordinate;
pub use error::{IsoError, IsoResult};
pub use grid::{EvaluationMesh, MAX_MESH_POINTS};
pub use sample::{SampleOutcome, SamplePoint};
