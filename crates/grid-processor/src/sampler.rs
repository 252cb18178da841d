//! Sampling grid traversal.
//!
//! Grid points are visited column by column (full latitude sweep for each
//! longitude). Each point is resolved by a [`DurationSource`] one at a
//! time; the next request is only issued once the previous one returned.

use std::io::Write;

use async_trait::async_trait;
use chrono::Local;
use iso_common::grid::axis_positions;
use iso_common::{BoundingBox, Coordinate, SampleOutcome, SamplePoint};
use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::planner::GridShape;
use crate::table::TableWriter;

/// Resolves the travel duration between two coordinates.
///
/// `Ok(SampleOutcome::Failed(..))` is a per-point failure the run survives.
/// Any `Err` aborts sampling; implementations report quota exhaustion and
/// denied requests as [`GridProcessorError::SourceFatal`].
///
/// [`GridProcessorError::SourceFatal`]: crate::GridProcessorError::SourceFatal
#[async_trait]
pub trait DurationSource: Send + Sync {
    async fn duration(&self, origin: Coordinate, destination: Coordinate)
        -> Result<SampleOutcome>;
}

/// All grid coordinates of `shape` over `bbox`, longitude-major.
pub fn enumerate(shape: GridShape, bbox: &BoundingBox) -> Vec<(f64, f64)> {
    let xs = axis_positions(bbox.min_x, bbox.max_x, shape.nx);
    let ys = axis_positions(bbox.min_y, bbox.max_y, shape.ny);

    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .collect()
}

/// Counts of a finished sampling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleStats {
    pub valid: usize,
    pub failed: usize,
}

/// A sampling grid anchored at an origin.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    origin: Coordinate,
    bbox: BoundingBox,
    shape: GridShape,
}

impl SampleGrid {
    pub fn new(origin: Coordinate, bbox: BoundingBox, shape: GridShape) -> Self {
        Self {
            origin,
            bbox,
            shape,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Grid coordinates in traversal order.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        enumerate(self.shape, &self.bbox)
    }

    /// Resolve every grid point and stream the results into `table`.
    ///
    /// The table footer is only written once every point has been
    /// resolved, so an aborted run leaves no end marker.
    #[instrument(skip(self, source, table), fields(shape = %self.shape, origin = %self.origin))]
    pub async fn sample<S, W>(
        &self,
        source: &S,
        table: &mut TableWriter<W>,
    ) -> Result<Vec<SamplePoint>>
    where
        S: DurationSource + ?Sized,
        W: Write,
    {
        let coordinates = self.coordinates();
        info!(points = coordinates.len(), "Starting sampling");

        table.write_header(self.origin, &Local::now())?;

        let mut samples = Vec::with_capacity(coordinates.len());
        let mut stats = SampleStats::default();

        for (x, y) in coordinates {
            let outcome = match source.duration(self.origin, Coordinate::new(x, y)).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(x, y, error = %e, "Duration source failed, aborting run");
                    return Err(e);
                }
            };

            match &outcome {
                SampleOutcome::Duration(secs) => {
                    debug!(x, y, secs, "Sampled");
                    stats.valid += 1;
                }
                SampleOutcome::Failed(reason) => {
                    warn!(x, y, reason = %reason, "No duration for grid point");
                    stats.failed += 1;
                }
            }

            let sample = SamplePoint::new(x, y, outcome);
            table.write_sample(&sample)?;
            samples.push(sample);
        }

        table.write_footer(&Local::now())?;
        info!(valid = stats.valid, failed = stats.failed, "Sampling complete");

        Ok(samples)
    }
}

/// Tally valid and failed samples.
pub fn sample_stats(samples: &[SamplePoint]) -> SampleStats {
    samples.iter().fold(SampleStats::default(), |mut stats, s| {
        if s.is_valid() {
            stats.valid += 1;
        } else {
            stats.failed += 1;
        }
        stats
    })
}
