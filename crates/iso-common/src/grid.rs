//! Regular grids laid over a bounding box.

use crate::error::{IsoError, IsoResult};
use crate::BoundingBox;

/// Largest mesh the contour stage will evaluate.
pub const MAX_MESH_POINTS: usize = 4_000_000;

/// `count` evenly spaced positions from `min` to `max` inclusive.
///
/// Positions are computed from their index so that no rounding error
/// accumulates; the last position is pinned to `max`.
pub fn axis_positions(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        max
                    } else {
                        min + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Positions `min + i * step` strictly below `max`.
fn stepped_positions(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut count = ((max - min) / step).ceil() as usize;
    while count > 0 && min + (count - 1) as f64 * step >= max {
        count -= 1;
    }
    (0..count).map(|i| min + i as f64 * step).collect()
}

/// Dense evaluation grid used for contour extraction.
///
/// Values laid over this mesh are stored row-major: row `j` holds the
/// points with latitude `ys[j]`, ordered by `xs`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMesh {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl EvaluationMesh {
    /// Mesh with a fixed step, starting at the lower-left corner.
    ///
    /// The upper edges are excluded, so a 0.01 step over a 0.7 wide box
    /// gives 70 columns.
    pub fn with_step(bbox: &BoundingBox, step: f64) -> IsoResult<Self> {
        Self::check_step(bbox, step)?;

        let mesh = Self {
            xs: stepped_positions(bbox.min_x, bbox.max_x, step),
            ys: stepped_positions(bbox.min_y, bbox.max_y, step),
        };
        mesh.check_size()?;
        Ok(mesh)
    }

    /// Reject steps that are not positive or that would exceed
    /// [`MAX_MESH_POINTS`], before anything is allocated.
    pub fn check_step(bbox: &BoundingBox, step: f64) -> IsoResult<()> {
        if !(step.is_finite() && step > 0.0) {
            return Err(IsoError::invalid_parameter(
                "mesh_step",
                format!("must be positive, got {}", step),
            ));
        }
        bbox.validate()?;

        let points = (bbox.width() / step).ceil() * (bbox.height() / step).ceil();
        if points > MAX_MESH_POINTS as f64 {
            return Err(IsoError::invalid_parameter(
                "mesh_step",
                format!(
                    "step {} over {} gives about {:.0} mesh points, limit is {}",
                    step, bbox, points, MAX_MESH_POINTS
                ),
            ));
        }
        Ok(())
    }

    /// Mesh with `nx` by `ny` points spanning the box edge to edge.
    pub fn with_shape(bbox: &BoundingBox, nx: usize, ny: usize) -> IsoResult<Self> {
        bbox.validate()?;
        if nx.saturating_mul(ny) > MAX_MESH_POINTS {
            return Err(IsoError::invalid_parameter(
                "mesh_shape",
                format!("{}x{} exceeds {} mesh points", nx, ny, MAX_MESH_POINTS),
            ));
        }
        let mesh = Self {
            xs: axis_positions(bbox.min_x, bbox.max_x, nx),
            ys: axis_positions(bbox.min_y, bbox.max_y, ny),
        };
        mesh.check_size()?;
        Ok(mesh)
    }

    fn check_size(&self) -> IsoResult<()> {
        if self.width() < 2 || self.height() < 2 {
            return Err(IsoError::invalid_parameter(
                "mesh_step",
                format!(
                    "mesh must be at least 2x2 points, got {}x{}",
                    self.width(),
                    self.height()
                ),
            ));
        }
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.xs.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.ys.len()
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of column `i`, row `j`.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.width() + i
    }

    /// All mesh points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }
}
