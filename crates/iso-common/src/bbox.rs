//! Bounding box types and operations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IsoError, IsoResult};

/// A rectangular region in planar longitude/latitude coordinates.
///
/// Coordinates are treated as Euclidean; no projection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box, rejecting empty or inverted extents.
    pub fn try_new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> IsoResult<Self> {
        let bbox = Self::new(min_x, min_y, max_x, max_y);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that both extents are finite and strictly positive.
    pub fn validate(&self) -> IsoResult<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(IsoError::InvalidBbox(format!(
                "non-finite corner in {}",
                self
            )));
        }
        if self.max_x <= self.min_x {
            return Err(IsoError::InvalidBbox(format!(
                "max_x ({}) must be greater than min_x ({})",
                self.max_x, self.min_x
            )));
        }
        if self.max_y <= self.min_y {
            return Err(IsoError::InvalidBbox(format!(
                "max_y ({}) must be greater than min_y ({})",
                self.max_y, self.min_y
            )));
        }
        Ok(())
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Parses "minx,miny,maxx,maxy" and validates the result.
impl FromStr for BoundingBox {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(IsoError::InvalidBbox(format!(
                "{}. Expected 'minx,miny,maxx,maxy'",
                s
            )));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| IsoError::InvalidBbox(format!("invalid number '{}'", part)))?;
        }

        Self::try_new(values[0], values[1], values[2], values[3])
    }
}
