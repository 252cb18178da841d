//! Sampling-grid shape selection.
//!
//! For a budget of `N` points over a box of width `L` and height `H`, every
//! column count `n` in `2..=N/2` is scored as
//!
//! ```text
//! m  = N / n            (integer division)
//! r  = N - n * m        (points left unused)
//! dl = L / n
//! dh = H / m
//! score = r + (dl - dh)^2
//! ```
//!
//! The lowest score wins; the first `n` wins ties.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridProcessorError, Result};

/// Columns (longitude) and rows (latitude) of the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
}

impl GridShape {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}

/// Score of using `n` columns for a budget of `budget` points.
///
/// Returns the row count alongside the score.
pub fn shape_score(budget: usize, n: usize, width: f64, height: f64) -> (usize, f64) {
    let m = budget / n;
    let unused = budget - n * m;
    let dl = width / n as f64;
    let dh = height / m as f64;
    (m, unused as f64 + (dl - dh) * (dl - dh))
}

/// Pick the grid shape for `budget` points over a `width` x `height` box.
pub fn plan(budget: usize, width: f64, height: f64) -> Result<GridShape> {
    if budget < 4 {
        return Err(GridProcessorError::domain(format!(
            "sample budget {} leaves no grid shape with at least 2 columns and 2 rows",
            budget
        )));
    }
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(GridProcessorError::domain(format!(
            "grid extent must be positive, got {}x{}",
            width, height
        )));
    }

    let mut best: Option<(GridShape, f64)> = None;
    for n in 2..=budget / 2 {
        let (m, score) = shape_score(budget, n, width, height);
        if best.map_or(true, |(_, min_score)| score < min_score) {
            best = Some((GridShape::new(n, m), score));
        }
    }

    let (shape, score) = best.ok_or_else(|| {
        GridProcessorError::domain(format!("no grid shape candidate for budget {}", budget))
    })?;
    debug!(budget, nx = shape.nx, ny = shape.ny, score, "Planned sampling grid");
    Ok(shape)
}

/// Grid planner bound to a fixed budget.
#[derive(Debug, Clone, Copy)]
pub struct GridPlanner {
    budget: usize,
}

impl GridPlanner {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Pick the grid shape for a bounding box.
    pub fn plan_for(&self, bbox: &iso_common::BoundingBox) -> Result<GridShape> {
        plan(self.budget, bbox.width(), bbox.height())
    }
}
