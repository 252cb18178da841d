//! Sampling and surface fitting for travel-time contours.
//!
//! # Architecture
//!
//! ```text
//! RunConfig
//!      │
//!      ▼
//! planner::plan(budget, width, height) ──► GridShape
//!      │
//!      ▼
//! SampleGrid::sample(source, table)
//!      │
//!      ├─► DurationSource::duration() per grid point, sequentially
//!      │
//!      └─► TableWriter (lon,lat,seconds; failures as # comments)
//!               │
//!               ▼
//!          table::read_samples ──► TrainingSet (minutes)
//!               │
//!               ▼
//!          KnnRegressor::fit ──► Surface::evaluate_mesh
//!               │
//!               ▼
//!          Return to renderer
//! ```

pub mod error;
pub mod interpolation;
pub mod planner;
pub mod sampler;
pub mod table;

// Re-export commonly used types at crate root
pub use error::{GridProcessorError, Result};
pub use interpolation::{KnnRegressor, Surface, TrainingSample, TrainingSet, DEFAULT_NEIGHBORS};
pub use planner::{plan, GridPlanner, GridShape};
pub use sampler::{enumerate, sample_stats, DurationSource, SampleGrid, SampleStats};
pub use table::{read_samples, TableWriter, END_MARKER};

// Re-export common types for convenience
pub use iso_common::{BoundingBox, Coordinate, EvaluationMesh, SampleOutcome, SamplePoint};
