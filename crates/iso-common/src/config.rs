//! Run configuration.
//!
//! A run is fully described by one immutable [`RunConfig`], loaded from
//! YAML and then threaded explicitly into every stage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IsoError, IsoResult};
use crate::{BoundingBox, Coordinate, EvaluationMesh};

/// Smallest budget that leaves at least one grid-shape candidate.
pub const MIN_SAMPLE_BUDGET: usize = 4;

/// Configuration for one contour run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base name for the output artifacts (`<name>.csv`, `<name>.kml`)
    #[serde(default = "default_name")]
    pub name: String,

    /// Where every trip starts
    #[serde(default = "default_origin")]
    pub origin: Coordinate,

    /// Region to sample and contour
    #[serde(default = "default_bbox")]
    pub bbox: BoundingBox,

    /// Target number of grid points to query
    #[serde(default = "default_sample_budget")]
    pub sample_budget: usize,

    /// Step of the dense evaluation mesh, in degrees
    #[serde(default = "default_mesh_step")]
    pub mesh_step: f64,

    /// Neighbor count for the distance-weighted regression
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Travel mode passed to the duration source
    #[serde(default = "default_travel_mode")]
    pub travel_mode: String,

    /// Directory receiving the artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_name() -> String {
    "time".to_string()
}

fn default_origin() -> Coordinate {
    // Notre-Dame parvis, Paris
    Coordinate::new(2.34880, 48.85330)
}

fn default_bbox() -> BoundingBox {
    BoundingBox::new(2.0, 48.6, 2.7, 49.1)
}

fn default_sample_budget() -> usize {
    100
}

fn default_mesh_step() -> f64 {
    0.01
}

fn default_neighbors() -> usize {
    4
}

fn default_travel_mode() -> String {
    "driving".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            origin: default_origin(),
            bbox: default_bbox(),
            sample_budget: default_sample_budget(),
            mesh_step: default_mesh_step(),
            neighbors: default_neighbors(),
            travel_mode: default_travel_mode(),
            output_dir: default_output_dir(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> IsoResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| IsoError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> IsoResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reject configurations that cannot produce a contour document.
    pub fn validate(&self) -> IsoResult<()> {
        self.bbox.validate()?;

        if self.name.trim().is_empty() {
            return Err(IsoError::invalid_parameter("name", "must not be empty"));
        }
        if self.sample_budget < MIN_SAMPLE_BUDGET {
            return Err(IsoError::invalid_parameter(
                "sample_budget",
                format!(
                    "must be at least {}, got {}",
                    MIN_SAMPLE_BUDGET, self.sample_budget
                ),
            ));
        }
        if self.neighbors == 0 || self.neighbors > self.sample_budget {
            return Err(IsoError::invalid_parameter(
                "neighbors",
                format!(
                    "must be between 1 and the sample budget ({}), got {}",
                    self.sample_budget, self.neighbors
                ),
            ));
        }
        EvaluationMesh::check_step(&self.bbox, self.mesh_step)?;
        Ok(())
    }

    /// Path of the intermediate sample table.
    pub fn samples_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.name))
    }

    /// Path of the contour document.
    pub fn document_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.kml", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sample_budget, 100);
        assert_eq!(config.neighbors, 4);
        assert_eq!(config.samples_path(), PathBuf::from("./time.csv"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = RunConfig::from_yaml(
            r#"
name: lyon
origin: { lon: 4.8357, lat: 45.7640 }
bbox: { min_x: 4.6, min_y: 45.6, max_x: 5.1, max_y: 45.9 }
sample_budget: 64
"#,
        )
        .unwrap();
        assert_eq!(config.name, "lyon");
        assert_eq!(config.sample_budget, 64);
        assert_eq!(config.mesh_step, 0.01);
        assert_eq!(config.travel_mode, "driving");
        config.validate().unwrap();
    }

    #[test]
    fn test_small_budget_rejected() {
        let config = RunConfig {
            sample_budget: 3,
            neighbors: 3,
            ..RunConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IsoError::InvalidParameter { ref param, .. }) if param == "sample_budget"
        ));
    }

    #[test]
    fn test_neighbors_above_budget_rejected() {
        let config = RunConfig {
            sample_budget: 4,
            neighbors: 5,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_mesh_step_rejected() {
        let config = RunConfig {
            mesh_step: 1e-9,
            ..RunConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(IsoError::InvalidParameter { ref param, .. }) if param == "mesh_step"
        ));
    }
}
