//! End-to-end contour run.
//!
//! ```text
//! plan ─► sample ─► <name>.csv ─► re-read ─► fit ─► mesh ─► contour ─► <name>.kml
//! ```
//!
//! Both artifacts are written under a `.partial` name and renamed once
//! complete. On failure the partial file is removed, so an output file
//! that exists is always whole.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grid_processor::{
    read_samples, sample_stats, DurationSource, GridPlanner, GridShape, KnnRegressor, SampleGrid,
    SampleStats, TableWriter, TrainingSet,
};
use iso_common::{EvaluationMesh, RunConfig};
use renderer::{ContourSet, KmlWriter, LinearGradient};
use tracing::{error, info, instrument, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Sampling grid, absent when contouring an existing table
    pub shape: Option<GridShape>,
    /// Sampling counts, absent when contouring an existing table
    pub sampled: Option<SampleStats>,
    /// Samples the surface was fitted on
    pub training_samples: usize,
    pub mesh_width: usize,
    pub mesh_height: usize,
    pub levels: Vec<f64>,
    pub polylines: usize,
    pub samples_path: PathBuf,
    pub document_path: PathBuf,
}

/// `<path>.partial`
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Runs the stages for one [`RunConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    /// Validate the configuration. Nothing touches the network or the
    /// output directory before this succeeds.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate().context("Invalid run configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Sample the grid through `source`, then contour the table.
    #[instrument(skip(self, source), fields(name = %self.config.name))]
    pub async fn run<S>(&self, source: &S) -> Result<RunSummary>
    where
        S: DurationSource + ?Sized,
    {
        let shape = GridPlanner::new(self.config.sample_budget)
            .plan_for(&self.config.bbox)
            .context("Failed to plan sampling grid")?;
        info!(
            shape = %shape,
            points = shape.len(),
            budget = self.config.sample_budget,
            "Planned sampling grid"
        );

        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let samples_path = self.config.samples_path();
        let grid = SampleGrid::new(self.config.origin, self.config.bbox, shape);
        let partial = partial_path(&samples_path);
        let file = File::create(&partial)
            .with_context(|| format!("Failed to create {}", partial.display()))?;
        let mut table = TableWriter::new(BufWriter::new(file));
        let sampled = grid
            .sample(source, &mut table)
            .await
            .context("Sampling aborted");
        drop(table);
        let samples = commit(&partial, &samples_path, sampled)?;

        let stats = sample_stats(&samples);
        if stats.failed > 0 {
            warn!(failed = stats.failed, "Some grid points have no duration");
        }

        let mut summary = self.contour(&samples_path)?;
        summary.shape = Some(shape);
        summary.sampled = Some(stats);
        log_summary(&summary);
        Ok(summary)
    }

    /// Contour an existing sample table without sampling.
    #[instrument(skip(self), fields(name = %self.config.name))]
    pub fn run_from_samples(&self, samples_path: &Path) -> Result<RunSummary> {
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let summary = self.contour(samples_path)?;
        log_summary(&summary);
        Ok(summary)
    }

    /// Re-read the table, fit, evaluate, extract and write the document.
    fn contour(&self, samples_path: &Path) -> Result<RunSummary> {
        let file = File::open(samples_path)
            .with_context(|| format!("Failed to open {}", samples_path.display()))?;
        let samples = read_samples(BufReader::new(file))
            .with_context(|| format!("Failed to read {}", samples_path.display()))?;

        let training = TrainingSet::from_samples(&samples);
        let surface = KnnRegressor::new(self.config.neighbors)
            .fit(&training)
            .context("Failed to fit travel-time surface")?;

        let mesh = EvaluationMesh::with_step(&self.config.bbox, self.config.mesh_step)
            .context("Failed to build evaluation mesh")?;
        let values = surface.evaluate_mesh(&mesh);
        info!(
            width = mesh.width(),
            height = mesh.height(),
            training = training.len(),
            "Evaluated surface"
        );

        let contours = renderer::extract(&mesh, &values).context("Contour extraction failed")?;
        if contours.is_empty() {
            warn!("Surface is flat, document will contain no levels");
        }

        let document_path = self.config.document_path();
        write_atomically(&document_path, |mut file| {
            let bytes = self.render(&contours)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(())
        })?;
        info!(path = %document_path.display(), levels = contours.len(), "Wrote KML document");

        Ok(RunSummary {
            shape: None,
            sampled: None,
            training_samples: training.len(),
            mesh_width: mesh.width(),
            mesh_height: mesh.height(),
            levels: contours.values(),
            polylines: contours.polyline_count(),
            samples_path: samples_path.to_path_buf(),
            document_path,
        })
    }

    fn render(&self, contours: &ContourSet) -> Result<Vec<u8>> {
        let writer = KmlWriter::new().with_name(self.config.name.as_str());
        let styles = writer.styles(contours, &LinearGradient::default());
        Ok(writer.write(contours, &styles)?)
    }
}

/// Create `<path>.partial`, fill it with `fill`, then rename it to `path`.
/// The partial file is removed if `fill` or the rename fails.
fn write_atomically<T, F>(path: &Path, fill: F) -> Result<T>
where
    F: FnOnce(File) -> Result<T>,
{
    let partial = partial_path(path);
    let file = File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;
    let filled = fill(file);
    commit(&partial, path, filled)
}

/// Rename `partial` to `path` if `result` is a success, remove it otherwise.
fn commit<T>(partial: &Path, path: &Path, result: Result<T>) -> Result<T> {
    let result = result.and_then(|value| {
        std::fs::rename(partial, path)
            .with_context(|| format!("Failed to move output to {}", path.display()))?;
        Ok(value)
    });

    if let Err(e) = &result {
        error!(path = %partial.display(), error = %e, "Discarding partial output");
        if let Err(remove_err) = std::fs::remove_file(&partial) {
            warn!(path = %partial.display(), error = %remove_err, "Failed to remove partial output");
        }
    }
    result
}

fn log_summary(summary: &RunSummary) {
    info!(
        shape = %summary.shape.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
        valid = summary.sampled.map(|s| s.valid).unwrap_or(summary.training_samples),
        failed = summary.sampled.map(|s| s.failed).unwrap_or(0),
        mesh = %format!("{}x{}", summary.mesh_width, summary.mesh_height),
        levels = summary.levels.len(),
        polylines = summary.polylines,
        document = %summary.document_path.display(),
        "Run complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("out/time.csv")),
            PathBuf::from("out/time.csv.partial")
        );
    }

    #[test]
    fn test_write_atomically_discards_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.kml");
        let result: Result<()> = write_atomically(&path, |mut file| {
            file.write_all(b"half")?;
            anyhow::bail!("boom")
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            sample_budget: 3,
            output_dir: dir.path().join("never-created"),
            ..RunConfig::default()
        };
        assert!(Pipeline::new(config).is_err());
        assert!(!dir.path().join("never-created").exists());
    }
}
